use thiserror::Error;

use crate::model::lesson::Lesson;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrainingError {
    #[error("checkpoint question needs at least two options, got {len}")]
    NotEnoughOptions { len: usize },

    #[error("correct option index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

//
// ─── CHECKPOINT QUESTION ───────────────────────────────────────────────────────
//

/// One scored multiple-choice question in a lesson checkpoint.
///
/// The explanation is shown after submission regardless of whether the
/// learner answered correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointQuestion {
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
}

impl CheckpointQuestion {
    /// Creates a validated checkpoint question.
    ///
    /// # Errors
    ///
    /// Returns `TrainingError::NotEnoughOptions` for fewer than two options
    /// and `TrainingError::CorrectIndexOutOfRange` if `correct_index` does
    /// not point into `options`.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, TrainingError> {
        if options.len() < 2 {
            return Err(TrainingError::NotEnoughOptions { len: options.len() });
        }
        if correct_index >= options.len() {
            return Err(TrainingError::CorrectIndexOutOfRange {
                index: correct_index,
                len: options.len(),
            });
        }

        Ok(Self {
            prompt: prompt.into(),
            options,
            correct_index,
            explanation: explanation.into(),
        })
    }

    // Accessors
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Returns true if the given option index is the correct answer.
    #[must_use]
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }
}

//
// ─── FRAMEWORK CARD ────────────────────────────────────────────────────────────
//

/// A short thinking prompt shown during deep training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkCard {
    pub title: String,
    pub prompt: String,
}

impl FrameworkCard {
    #[must_use]
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
        }
    }
}

//
// ─── TRAINING PACK ─────────────────────────────────────────────────────────────
//

/// Supplementary content bundle for a lesson: overview notes, framework
/// cards, worked examples, open-source research tasks, and the checkpoint
/// question bank.
///
/// Packs are authored for some lessons; the rest get a deterministic
/// fallback synthesized from the lesson itself, so every lesson is
/// checkpoint-capable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPack {
    pub overview: Vec<String>,
    pub framework_cards: Vec<FrameworkCard>,
    pub worked_examples: Vec<String>,
    pub research_tasks: Vec<String>,
    pub checkpoint: Vec<CheckpointQuestion>,
}

impl TrainingPack {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.checkpoint.len()
    }

    /// Synthesizes a pack from the lesson's own title, objective, and
    /// activities.
    ///
    /// The shape is fixed: a three-line overview, the four framework cards
    /// (Claim / Evidence / Risk / Decision), one generic worked example, one
    /// open-source research task, and one checkpoint question per activity
    /// capped at three. Every generated question offers the same three
    /// options with the middle option correct.
    #[must_use]
    pub fn fallback_for(lesson: &Lesson) -> Self {
        let overview = vec![
            format!("{}: {}", lesson.title(), lesson.objective()),
            format!(
                "Work the {} guided activities in order before deep training.",
                lesson.activity_count()
            ),
            "Finish with a short checkpoint to confirm the ideas stuck.".to_string(),
        ];

        let framework_cards = vec![
            FrameworkCard::new(
                "Claim",
                "State the single claim this lesson asks you to defend.",
            ),
            FrameworkCard::new(
                "Evidence",
                "List the strongest data points for and against the claim.",
            ),
            FrameworkCard::new(
                "Risk",
                "Name what would have to be true for the claim to fail.",
            ),
            FrameworkCard::new(
                "Decision",
                "Write the action you would take and the trigger to revisit it.",
            ),
        ];

        let example_subject = lesson
            .activities()
            .first()
            .map_or_else(|| lesson.objective().to_string(), Clone::clone);
        let worked_examples = vec![format!(
            "Apply \"{example_subject}\" to one listed business and write down each step."
        )];

        let research_tasks = vec![format!(
            "Repeat one activity from \"{}\" using only primary sources from a public filing archive.",
            lesson.title()
        )];

        let checkpoint = lesson
            .activities()
            .iter()
            .take(3)
            .map(|activity| {
                CheckpointQuestion::new(
                    format!("While working \"{activity}\", what keeps the exercise honest?"),
                    vec![
                        "Skip the written reasoning and trust your first impression.".to_string(),
                        "Apply the step to a real business and write the reasoning down."
                            .to_string(),
                        "Copy a conclusion from a commentator you trust.".to_string(),
                    ],
                    1,
                    "Evidence you wrote down yourself is the only kind later modules can build on.",
                )
                .expect("generated question shape is fixed and valid")
            })
            .collect();

        Self {
            overview,
            framework_cards,
            worked_examples,
            research_tasks,
            checkpoint,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
