use std::collections::HashMap;

use crate::model::{CheckpointQuestion, FrameworkCard, Lesson, LessonId, TrainingPack};

/// Authored training packs keyed by lesson id.
///
/// Not every lesson has authored content. `pack_for` falls back to the
/// deterministic generated pack, so a consumer never has to care which
/// lessons were hand-written.
#[derive(Debug, Clone, Default)]
pub struct TrainingLibrary {
    packs: HashMap<LessonId, TrainingPack>,
}

impl TrainingLibrary {
    /// An empty library: every lesson resolves to the fallback pack.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in library with authored packs for the two lessons that
    /// carry hand-written deep-training content.
    #[must_use]
    pub fn standard() -> Self {
        let mut packs = HashMap::new();
        packs.insert(LessonId::new("business-models"), business_models_pack());
        packs.insert(LessonId::new("fair-value"), fair_value_pack());
        Self { packs }
    }

    pub fn insert(&mut self, id: LessonId, pack: TrainingPack) {
        self.packs.insert(id, pack);
    }

    #[must_use]
    pub fn authored(&self, id: &LessonId) -> Option<&TrainingPack> {
        self.packs.get(id)
    }

    #[must_use]
    pub fn has_authored(&self, id: &LessonId) -> bool {
        self.packs.contains_key(id)
    }

    /// The training pack for a lesson: authored if present, otherwise the
    /// generated fallback.
    #[must_use]
    pub fn pack_for(&self, lesson: &Lesson) -> TrainingPack {
        self.packs
            .get(lesson.id())
            .cloned()
            .unwrap_or_else(|| TrainingPack::fallback_for(lesson))
    }
}

//
// ─── AUTHORED PACKS ────────────────────────────────────────────────────────────
//

fn question(
    prompt: &str,
    options: &[&str],
    correct_index: usize,
    explanation: &str,
) -> CheckpointQuestion {
    CheckpointQuestion::new(
        prompt,
        options.iter().map(|s| (*s).to_string()).collect(),
        correct_index,
        explanation,
    )
    .expect("authored question is valid")
}

fn business_models_pack() -> TrainingPack {
    TrainingPack {
        overview: vec![
            "A business model describes how a company turns what it sells into durable cash flow.".into(),
            "Industry forces decide how much of that cash flow the company actually keeps.".into(),
            "Strong models pair a defensible position with customers who are expensive to lose.".into(),
        ],
        framework_cards: vec![
            FrameworkCard::new(
                "Revenue engine",
                "Trace one revenue stream from customer decision to reported revenue.",
            ),
            FrameworkCard::new(
                "Cost structure",
                "Split the cost base into what scales with volume and what does not.",
            ),
            FrameworkCard::new(
                "Switching costs",
                "Estimate what it would cost a core customer to leave within a year.",
            ),
            FrameworkCard::new(
                "Erosion watch",
                "Name the force most likely to compress margins over five years.",
            ),
        ],
        worked_examples: vec![
            "Compare a subscription software vendor with a commodity steel producer: map revenue \
             predictability, pricing power, and reinvestment needs side by side."
                .into(),
        ],
        research_tasks: vec![
            "From a recent annual report, extract the revenue mix by segment and decide which \
             segment carries the structural advantage."
                .into(),
        ],
        checkpoint: vec![
            question(
                "A company sells through long-term contracts with penalties for early exit. Which force does this blunt most directly?",
                &[
                    "Supplier power",
                    "Buyer power",
                    "Substitution risk",
                ],
                1,
                "Exit penalties raise the cost of switching, which is the main lever buyers have.",
            ),
            question(
                "Two competitors earn the same margin, but one reinvests at twice the return. Which statement follows?",
                &[
                    "The higher-return reinvestor compounds value faster at the same margin.",
                    "Margins are all that matter; the two are equivalent.",
                    "The lower-return reinvestor is safer and therefore more valuable.",
                ],
                0,
                "Margin is a snapshot; reinvestment return decides how the snapshot changes over time.",
            ),
            question(
                "Barriers to entry are best rated by looking at…",
                &[
                    "the company's own marketing material",
                    "the share price trend over the last quarter",
                    "what a funded newcomer would actually have to build or buy",
                ],
                2,
                "A barrier is only as high as the cheapest credible path around it.",
            ),
        ],
    }
}

fn fair_value_pack() -> TrainingPack {
    TrainingPack {
        overview: vec![
            "Fair value is a range built from explicit assumptions, not a single point.".into(),
            "Baseline, optimistic, and conservative cases bound what you would pay.".into(),
            "Margin of safety is the gap between price and the conservative case.".into(),
        ],
        framework_cards: vec![
            FrameworkCard::new(
                "Assumptions",
                "Write every growth and margin assumption in one plain sentence each.",
            ),
            FrameworkCard::new(
                "Range",
                "Derive the value range implied by the three cases before looking at price.",
            ),
            FrameworkCard::new(
                "Safety",
                "Compute how far price sits below the conservative case, if at all.",
            ),
            FrameworkCard::new(
                "Kill switch",
                "Decide which assumption breaking would invalidate the whole range.",
            ),
        ],
        worked_examples: vec![
            "Value a stable consumer staple three ways: hold growth at inflation, add two points, \
             subtract two points. Note how the range moves against the current price."
                .into(),
        ],
        research_tasks: vec![
            "Pick one holding and restate its consensus growth assumption in plain language, then \
             argue the conservative case against it using filings only."
                .into(),
        ],
        checkpoint: vec![
            question(
                "Price sits above your optimistic case. What does the framework say?",
                &[
                    "The opportunity is high priced relative to your assumptions.",
                    "Your assumptions must be wrong.",
                    "Buy a smaller position to compensate.",
                ],
                0,
                "The classification follows from the range; revisiting assumptions is a separate, deliberate step.",
            ),
            question(
                "Margin of safety is measured against which case?",
                &[
                    "The optimistic case",
                    "The baseline case",
                    "The conservative case",
                ],
                2,
                "Safety means the investment works even if the cautious assumptions are the right ones.",
            ),
            question(
                "Why write assumptions in plain language?",
                &[
                    "So a spreadsheet can parse them",
                    "So they can be checked and challenged without the model",
                    "To make the valuation look rigorous",
                ],
                1,
                "An assumption nobody can restate is an assumption nobody can falsify.",
            ),
        ],
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
