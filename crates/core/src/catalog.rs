use std::collections::HashMap;

use crate::model::{Lesson, LessonError, LessonId};

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Immutable lesson catalog with id lookup.
///
/// The catalog is read-only reference data: it is built once and never
/// mutated for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Catalog {
    lessons: Vec<Lesson>,
    index: HashMap<LessonId, usize>,
}

impl Catalog {
    /// Builds a catalog from a list of lessons.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::DuplicateId` if two lessons share an id.
    pub fn new(lessons: Vec<Lesson>) -> Result<Self, LessonError> {
        let mut index = HashMap::with_capacity(lessons.len());
        for (position, lesson) in lessons.iter().enumerate() {
            if index.insert(lesson.id().clone(), position).is_some() {
                return Err(LessonError::DuplicateId(lesson.id().clone()));
            }
        }
        Ok(Self { lessons, index })
    }

    /// The built-in intermediate curriculum.
    ///
    /// # Panics
    ///
    /// Panics if the built-in lesson table is malformed.
    #[must_use]
    pub fn intermediate() -> Self {
        Self::new(intermediate_lessons()).expect("built-in curriculum has unique ids")
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.index.get(id).map(|&position| &self.lessons[position])
    }

    #[must_use]
    pub fn contains(&self, id: &LessonId) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Total number of activities across every lesson in the catalog.
    #[must_use]
    pub fn total_activities(&self) -> usize {
        self.lessons.iter().map(Lesson::activity_count).sum()
    }
}

//
// ─── BUILT-IN CONTENT ──────────────────────────────────────────────────────────
//

/// The four-step research workflow learners complete before the
/// intermediate modules.
#[must_use]
pub fn foundational_checklist() -> Vec<String> {
    [
        "Select one listed business and map what it sells, who buys it, and how it makes money.",
        "Identify major revenue streams, major costs, and one long-term growth driver.",
        "Document competitive pressure, barriers to entry, and key business risks.",
        "Write one reflection on how evidence changed your original assumption.",
    ]
    .map(String::from)
    .to_vec()
}

fn lesson(
    id: &str,
    title: &str,
    objective: &str,
    activities: &[&str],
    mastery_signals: &[&str],
) -> Lesson {
    Lesson::new(
        LessonId::new(id),
        title,
        objective,
        activities.iter().map(|s| (*s).to_string()).collect(),
        mastery_signals.iter().map(|s| (*s).to_string()).collect(),
    )
    .expect("built-in lesson titles are non-empty")
}

fn intermediate_lessons() -> Vec<Lesson> {
    vec![
        lesson(
            "business-models",
            "Business Models and Industry Forces",
            "Compare three listed businesses and explain which has stronger structural advantages.",
            &[
                "Map each business model: revenue sources, cost base, and customer type.",
                "Score industry forces: buyer power, supplier power, substitution risk, and rivalry.",
                "Rate barriers to entry as high, medium, or low with reasoning.",
            ],
            &[
                "Complete a 3-business comparison worksheet.",
                "Explain one durable advantage and one possible erosion risk.",
            ],
        ),
        lesson(
            "management-quality",
            "Assessing Leadership and Capital Allocation",
            "Evaluate leadership quality from decisions, communication, and ownership alignment.",
            &[
                "Collect examples of clear and unclear decision-making from investor updates.",
                "Review reinvestment choices, debt usage, and return goals.",
                "Score transparency using a reusable rubric.",
            ],
            &["Provide one positive and one negative leadership case with three evidence points each."],
        ),
        lesson(
            "portfolio-management",
            "Portfolio Construction and Risk Positioning",
            "Position holdings according to conviction, downside risk, and diversification need.",
            &[
                "Identify highest and lowest sector exposure.",
                "Set target position sizes using probability-weighted risk/reward.",
                "Create rebalance rules for new information and thesis breaks.",
            ],
            &["Submit a portfolio map with risk notes and action triggers."],
        ),
        lesson(
            "fair-value",
            "Estimating Fair Value",
            "Use simple valuation assumptions to classify opportunities as fair, high, or low priced.",
            &[
                "Build baseline, optimistic, and conservative cases.",
                "Estimate value range and margin of safety.",
                "Document assumptions in plain language.",
            ],
            &["Label three opportunities with valuation rationale."],
        ),
        lesson(
            "idea-discovery",
            "Discovering New Ideas",
            "Expand beyond current holdings into underrepresented sectors.",
            &[
                "Use screeners to find one opportunity in an unfamiliar segment.",
                "Run a quick quality and risk triage.",
                "Decide whether to watch, research deeper, or reject.",
            ],
            &["Add at least one new sector exposure to watchlist or portfolio plan."],
        ),
        lesson(
            "investor-psychology",
            "Investor Psychology",
            "Reduce bias-driven decisions with a personal checklist.",
            &[
                "Identify one previous mistake and the bias behind it.",
                "Build a pre-buy checklist for evidence quality, position sizing, and downside planning.",
                "Practice journaling before and after decisions.",
            ],
            &["Submit a personal anti-bias checklist and one reflection entry."],
        ),
    ]
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
