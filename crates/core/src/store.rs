use std::collections::HashMap;

use thiserror::Error;

use crate::catalog::Catalog;
use crate::model::{Lesson, LessonId, LessonProgress, Stage};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("activity index {index} is out of range for {len} activities")]
    ActivityOutOfRange { index: usize, len: usize },

    #[error("question index {index} is out of range for {len} questions")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("option index {index} is out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },
}

//
// ─── PROGRESS STORE ────────────────────────────────────────────────────────────
//

/// In-memory per-lesson progress, keyed by lesson id.
///
/// Records are created lazily the first time a lesson is touched, never
/// deleted within a session, and discarded with the process. All mutation
/// goes through the store's operations (or the stage machine working on a
/// record borrowed from here); operations that need lesson metadata take
/// `&Lesson`, so resolving an unknown id stays a catalog-boundary concern.
#[derive(Debug, Clone, Default)]
pub struct ProgressStore {
    records: HashMap<LessonId, LessonProgress>,
}

impl ProgressStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of a lesson's record, if it was ever touched.
    #[must_use]
    pub fn progress(&self, id: &LessonId) -> Option<&LessonProgress> {
        self.records.get(id)
    }

    /// The lesson's record, created on first touch.
    pub fn entry(&mut self, id: &LessonId) -> &mut LessonProgress {
        self.records.entry(id.clone()).or_default()
    }

    /// Current stage for a lesson; untouched lessons are at `Brief`.
    #[must_use]
    pub fn stage(&self, id: &LessonId) -> Stage {
        self.records
            .get(id)
            .map_or(Stage::Brief, LessonProgress::stage)
    }

    #[must_use]
    pub fn is_activity_complete(&self, id: &LessonId, index: usize) -> bool {
        self.records
            .get(id)
            .is_some_and(|record| record.is_activity_complete(index))
    }

    /// Marks an activity complete. Idempotent: marking twice has the same
    /// observable effect as marking once.
    ///
    /// # Errors
    ///
    /// Rejects indices outside the lesson's activity list without touching
    /// any state.
    pub fn mark_activity_complete(
        &mut self,
        lesson: &Lesson,
        index: usize,
    ) -> Result<(), ProgressError> {
        if index >= lesson.activity_count() {
            return Err(ProgressError::ActivityOutOfRange {
                index,
                len: lesson.activity_count(),
            });
        }

        self.entry(lesson.id()).mark_activity(index);
        Ok(())
    }

    /// Fraction of the lesson's activities completed, in `[0, 1]`.
    ///
    /// A lesson with no activities reports 0.
    #[must_use]
    pub fn completion_ratio(&self, lesson: &Lesson) -> f64 {
        let total = lesson.activity_count();
        if total == 0 {
            return 0.0;
        }
        let completed = self
            .records
            .get(lesson.id())
            .map_or(0, LessonProgress::completed_count);

        completed as f64 / total as f64
    }

    /// Course-wide completion: completed activities over all catalog
    /// activities.
    ///
    /// A catalog with zero total activities reports 0 rather than failing.
    #[must_use]
    pub fn overall_completion_ratio(&self, catalog: &Catalog) -> f64 {
        let total = catalog.total_activities();
        if total == 0 {
            return 0.0;
        }
        let completed: usize = catalog
            .lessons()
            .iter()
            .map(|lesson| {
                self.records
                    .get(lesson.id())
                    .map_or(0, LessonProgress::completed_count)
            })
            .sum();

        completed as f64 / total as f64
    }

    /// Number of catalog lessons holding the ever-completed mark.
    #[must_use]
    pub fn completed_lessons(&self, catalog: &Catalog) -> usize {
        catalog
            .lessons()
            .iter()
            .filter(|lesson| {
                self.records
                    .get(lesson.id())
                    .is_some_and(LessonProgress::ever_completed)
            })
            .count()
    }

    /// Whether every catalog lesson has been completed at least once.
    ///
    /// Uses the monotonic ever-completed mark, not the current stage:
    /// navigating back into a finished module keeps course-level credit.
    #[must_use]
    pub fn course_complete(&self, catalog: &Catalog) -> bool {
        self.completed_lessons(catalog) == catalog.len()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
