use thiserror::Error;

use crate::model::ids::LessonId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("duplicate lesson id: {0}")]
    DuplicateId(LessonId),
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A single curriculum lesson.
///
/// Lessons are read-only reference data for the process lifetime. Activity
/// order is meaningful — it defines guided-practice sequencing. Mastery
/// signal order is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    objective: String,
    activities: Vec<String>,
    mastery_signals: Vec<String>,
}

impl Lesson {
    /// Creates a new Lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` if the title is empty or
    /// whitespace-only.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        objective: impl Into<String>,
        activities: Vec<String>,
        mastery_signals: Vec<String>,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            objective: objective.into().trim().to_owned(),
            activities,
            mastery_signals,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn objective(&self) -> &str {
        &self.objective
    }

    /// Guided-practice activities, in the order they should be worked.
    #[must_use]
    pub fn activities(&self) -> &[String] {
        &self.activities
    }

    #[must_use]
    pub fn mastery_signals(&self) -> &[String] {
        &self.mastery_signals
    }

    #[must_use]
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
