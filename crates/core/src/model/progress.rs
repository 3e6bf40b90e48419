use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

//
// ─── STAGE ─────────────────────────────────────────────────────────────────────
//

/// The five fixed progression states a module passes through, in order.
///
/// `Completion` is reached exclusively through a passing checkpoint
/// submission. It is not a hard terminal: learners may navigate backward to
/// review, and course-level credit is tracked separately as an
/// ever-completed mark on the progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Brief,
    GuidedPractice,
    DeepTraining,
    Checkpoint,
    Completion,
}

impl Stage {
    /// Ordinal position, 0 for `Brief` through 4 for `Completion`.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Stage::Brief => 0,
            Stage::GuidedPractice => 1,
            Stage::DeepTraining => 2,
            Stage::Checkpoint => 3,
            Stage::Completion => 4,
        }
    }

    /// The stage after this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Brief => Some(Stage::GuidedPractice),
            Stage::GuidedPractice => Some(Stage::DeepTraining),
            Stage::DeepTraining => Some(Stage::Checkpoint),
            Stage::Checkpoint => Some(Stage::Completion),
            Stage::Completion => None,
        }
    }

    /// The stage before this one, if any.
    #[must_use]
    pub fn prev(self) -> Option<Stage> {
        match self {
            Stage::Brief => None,
            Stage::GuidedPractice => Some(Stage::Brief),
            Stage::DeepTraining => Some(Stage::GuidedPractice),
            Stage::Checkpoint => Some(Stage::DeepTraining),
            Stage::Completion => Some(Stage::Checkpoint),
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::Brief
    }
}

//
// ─── LESSON PROGRESS ───────────────────────────────────────────────────────────
//

/// Per-lesson progress record.
///
/// One cohesive record per lesson id: activity completion flags, current
/// stage, checkpoint answers, and the submission flag. Created lazily the
/// first time a lesson is touched and kept for the rest of the session.
///
/// `completed_at` is monotonic: it is stamped the first time the lesson
/// reaches `Completion` and survives backward navigation, so course-level
/// credit is never lost by reviewing a finished module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonProgress {
    stage: Stage,
    completed_activities: BTreeSet<usize>,
    answers: BTreeMap<usize, usize>,
    submitted: bool,
    completed_at: Option<DateTime<Utc>>,
}

impl LessonProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    #[must_use]
    pub fn is_activity_complete(&self, index: usize) -> bool {
        self.completed_activities.contains(&index)
    }

    #[must_use]
    pub fn completed_activities(&self) -> &BTreeSet<usize> {
        &self.completed_activities
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_activities.len()
    }

    /// Records an activity as complete. Idempotent.
    pub(crate) fn mark_activity(&mut self, index: usize) {
        self.completed_activities.insert(index);
    }

    #[must_use]
    pub fn answer_for(&self, question: usize) -> Option<usize> {
        self.answers.get(&question).copied()
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<usize, usize> {
        &self.answers
    }

    /// Stores an answer. Selecting any answer after submission clears the
    /// submitted flag: the learner must resubmit.
    pub(crate) fn set_answer(&mut self, question: usize, option: usize) {
        self.answers.insert(question, option);
        self.submitted = false;
    }

    #[must_use]
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub(crate) fn set_submitted(&mut self) {
        self.submitted = true;
    }

    /// True once the lesson has reached `Completion` at least once.
    #[must_use]
    pub fn ever_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Stamps first completion. Later passes keep the original timestamp.
    pub(crate) fn record_completion(&mut self, now: DateTime<Utc>) {
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
