use studio_core::catalog::Catalog;
use studio_core::library::TrainingLibrary;
use studio_core::machine::{CheckpointOutcome, StageMachine};
use studio_core::model::{
    LearnerProfile, Lesson, LessonId, LessonProgress, Stage, TrainingPack,
};
use studio_core::store::ProgressStore;
use studio_core::time::Clock;
use studio_core::{recommend, sequencing};

use crate::error::CourseError;

//
// ─── COURSE PROGRESS ───────────────────────────────────────────────────────────
//

/// Presentation-agnostic course-wide progress counters.
///
/// No pre-formatted strings and no localization assumptions; a UI can
/// render these however it likes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseProgress {
    pub lessons: usize,
    pub lessons_completed: usize,
    pub activities: usize,
    pub activities_completed: usize,
    pub overall_ratio: f64,
    pub is_complete: bool,
}

//
// ─── COURSE SERVICE ────────────────────────────────────────────────────────────
//

/// Drives a learner session against the catalog, training library, and
/// progress store.
///
/// The service is the single logical thread of control: every mutation is
/// synchronous, applied atomically per user action, and total-ordered by
/// call order. The only async collaborator (the coach) lives outside and
/// never feeds back into progression state.
#[derive(Debug, Clone)]
pub struct CourseService {
    catalog: Catalog,
    library: TrainingLibrary,
    store: ProgressStore,
    profile: LearnerProfile,
    clock: Clock,
}

fn require<'a>(catalog: &'a Catalog, id: &LessonId) -> Result<&'a Lesson, CourseError> {
    catalog
        .lesson(id)
        .ok_or_else(|| CourseError::UnknownLesson { id: id.clone() })
}

impl CourseService {
    #[must_use]
    pub fn new(catalog: Catalog, library: TrainingLibrary, profile: LearnerProfile) -> Self {
        Self {
            catalog,
            library,
            store: ProgressStore::new(),
            profile,
            clock: Clock::default_clock(),
        }
    }

    /// The built-in intermediate curriculum with the standard library.
    #[must_use]
    pub fn standard(profile: LearnerProfile) -> Self {
        Self::new(Catalog::intermediate(), TrainingLibrary::standard(), profile)
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    // Accessors
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn profile(&self) -> LearnerProfile {
        self.profile
    }

    /// Replaces the learner profile wholesale. The recommendation is a pure
    /// function of the profile, so it is simply recomputed on demand.
    pub fn set_profile(&mut self, profile: LearnerProfile) {
        self.profile = profile;
    }

    // ── Sequencing ────────────────────────────────────────────────────────

    /// Ranked lesson ids for the current profile.
    #[must_use]
    pub fn recommended_path(&self) -> Vec<LessonId> {
        recommend(&self.profile)
    }

    /// Need-scores alongside the ranking, for consumers that display them.
    #[must_use]
    pub fn ranked_needs(&self) -> Vec<sequencing::RankedLesson> {
        sequencing::ranked(&self.profile)
    }

    /// Titles of the next recommended lessons, resolved through the
    /// catalog, capped at four. Ids the catalog does not know are skipped.
    /// This is the input shape the coach expects.
    #[must_use]
    pub fn recommended_titles(&self) -> Vec<String> {
        self.recommended_path()
            .iter()
            .filter_map(|id| self.catalog.lesson(id))
            .map(|lesson| lesson.title().to_string())
            .take(4)
            .collect()
    }

    // ── Lesson resolution ─────────────────────────────────────────────────

    /// Resolves a lesson id against the catalog.
    ///
    /// # Errors
    ///
    /// `CourseError::UnknownLesson` — the one hard failure in the system.
    pub fn lesson(&self, id: &LessonId) -> Result<&Lesson, CourseError> {
        require(&self.catalog, id)
    }

    /// The training pack for a lesson: authored if available, otherwise the
    /// generated fallback.
    ///
    /// # Errors
    ///
    /// `CourseError::UnknownLesson` for ids outside the catalog.
    pub fn pack(&self, id: &LessonId) -> Result<TrainingPack, CourseError> {
        let lesson = require(&self.catalog, id)?;
        Ok(self.library.pack_for(lesson))
    }

    // ── Progress ──────────────────────────────────────────────────────────

    /// Current stage; untouched lessons report `Brief`.
    #[must_use]
    pub fn stage(&self, id: &LessonId) -> Stage {
        self.store.stage(id)
    }

    #[must_use]
    pub fn lesson_progress(&self, id: &LessonId) -> Option<&LessonProgress> {
        self.store.progress(id)
    }

    #[must_use]
    pub fn is_activity_complete(&self, id: &LessonId, index: usize) -> bool {
        self.store.is_activity_complete(id, index)
    }

    /// Marks a guided-practice activity complete. Idempotent.
    ///
    /// # Errors
    ///
    /// Unknown lesson ids and out-of-range activity indices are rejected
    /// without touching the store.
    pub fn mark_activity_complete(
        &mut self,
        id: &LessonId,
        index: usize,
    ) -> Result<(), CourseError> {
        let lesson = require(&self.catalog, id)?;
        self.store.mark_activity_complete(lesson, index)?;
        Ok(())
    }

    /// Fraction of the lesson's activities completed.
    ///
    /// # Errors
    ///
    /// `CourseError::UnknownLesson` for ids outside the catalog.
    pub fn completion_ratio(&self, id: &LessonId) -> Result<f64, CourseError> {
        let lesson = require(&self.catalog, id)?;
        Ok(self.store.completion_ratio(lesson))
    }

    #[must_use]
    pub fn overall_completion_ratio(&self) -> f64 {
        self.store.overall_completion_ratio(&self.catalog)
    }

    // ── Stage transitions ─────────────────────────────────────────────────

    /// Whether the lesson could advance one stage right now.
    ///
    /// # Errors
    ///
    /// `CourseError::UnknownLesson` for ids outside the catalog.
    pub fn can_advance(&self, id: &LessonId) -> Result<bool, CourseError> {
        let lesson = require(&self.catalog, id)?;
        let machine = StageMachine::new(lesson);
        Ok(match self.store.progress(id) {
            Some(record) => machine.can_advance(record),
            None => machine.can_advance(&LessonProgress::new()),
        })
    }

    /// Advances the lesson one stage. A refused transition returns
    /// `Ok(None)` and changes nothing.
    ///
    /// # Errors
    ///
    /// `CourseError::UnknownLesson` for ids outside the catalog.
    pub fn advance(&mut self, id: &LessonId) -> Result<Option<Stage>, CourseError> {
        let lesson = require(&self.catalog, id)?;
        let machine = StageMachine::new(lesson);
        let record = self.store.entry(id);
        Ok(machine.advance(record))
    }

    /// Steps the lesson back one stage for review. Never mutates
    /// completion data.
    ///
    /// # Errors
    ///
    /// `CourseError::UnknownLesson` for ids outside the catalog.
    pub fn go_back(&mut self, id: &LessonId) -> Result<Option<Stage>, CourseError> {
        let lesson = require(&self.catalog, id)?;
        let machine = StageMachine::new(lesson);
        let record = self.store.entry(id);
        Ok(machine.go_back(record))
    }

    /// Records a checkpoint answer. Selecting an answer after submission
    /// clears the submitted flag.
    ///
    /// # Errors
    ///
    /// Unknown lesson ids and out-of-range question or option indices are
    /// rejected without touching the store.
    pub fn select_answer(
        &mut self,
        id: &LessonId,
        question: usize,
        option: usize,
    ) -> Result<(), CourseError> {
        let lesson = require(&self.catalog, id)?;
        let pack = self.library.pack_for(lesson);
        let machine = StageMachine::new(lesson);
        let record = self.store.entry(id);
        machine.select_answer(record, &pack, question, option)?;
        Ok(())
    }

    /// Submits the lesson checkpoint atomically. `Ok(None)` when the lesson
    /// is not at the checkpoint stage.
    ///
    /// # Errors
    ///
    /// `CourseError::UnknownLesson` for ids outside the catalog.
    pub fn submit_checkpoint(
        &mut self,
        id: &LessonId,
    ) -> Result<Option<CheckpointOutcome>, CourseError> {
        let lesson = require(&self.catalog, id)?;
        let pack = self.library.pack_for(lesson);
        let machine = StageMachine::new(lesson);
        let now = self.clock.now();
        let record = self.store.entry(id);
        Ok(machine.submit_checkpoint(record, &pack, now))
    }

    // ── Aggregation ───────────────────────────────────────────────────────

    /// Course completion uses the monotonic ever-completed mark, so
    /// reviewing a finished module never costs course-level credit.
    #[must_use]
    pub fn course_complete(&self) -> bool {
        self.store.course_complete(&self.catalog)
    }

    /// Snapshot of course-wide counters.
    #[must_use]
    pub fn progress(&self) -> CourseProgress {
        let activities_completed = self
            .catalog
            .lessons()
            .iter()
            .map(|lesson| {
                self.store
                    .progress(lesson.id())
                    .map_or(0, LessonProgress::completed_count)
            })
            .sum();

        CourseProgress {
            lessons: self.catalog.len(),
            lessons_completed: self.store.completed_lessons(&self.catalog),
            activities: self.catalog.total_activities(),
            activities_completed,
            overall_ratio: self.store.overall_completion_ratio(&self.catalog),
            is_complete: self.store.course_complete(&self.catalog),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::time::fixed_clock;

    fn service() -> CourseService {
        CourseService::standard(LearnerProfile::new(4, 3, 6)).with_clock(fixed_clock())
    }

    #[test]
    fn unknown_lesson_is_the_hard_failure() {
        let mut svc = service();
        let bogus = LessonId::new("no-such-lesson");

        assert!(matches!(
            svc.lesson(&bogus),
            Err(CourseError::UnknownLesson { .. })
        ));
        assert!(matches!(
            svc.mark_activity_complete(&bogus, 0),
            Err(CourseError::UnknownLesson { .. })
        ));
        assert!(matches!(
            svc.advance(&bogus),
            Err(CourseError::UnknownLesson { .. })
        ));
        // The store was never touched.
        assert!(svc.lesson_progress(&bogus).is_none());
    }

    #[test]
    fn profile_replacement_reorders_the_path() {
        let mut svc = service();
        assert_eq!(svc.recommended_path()[0], LessonId::new("fair-value"));

        svc.set_profile(LearnerProfile::new(1, 10, 10));
        assert_eq!(svc.recommended_path()[0], LessonId::new("business-models"));
    }

    #[test]
    fn recommended_titles_resolve_through_the_catalog() {
        let svc = service();
        let titles = svc.recommended_titles();
        assert_eq!(titles.len(), 4);
        assert_eq!(titles[0], "Estimating Fair Value");
    }

    #[test]
    fn course_progress_counts_catalog_wide() {
        let mut svc = service();
        let id = LessonId::new("business-models");
        svc.mark_activity_complete(&id, 0).unwrap();
        svc.mark_activity_complete(&id, 1).unwrap();

        let snapshot = svc.progress();
        assert_eq!(snapshot.lessons, 6);
        assert_eq!(snapshot.lessons_completed, 0);
        assert_eq!(snapshot.activities, 18);
        assert_eq!(snapshot.activities_completed, 2);
        assert!(!snapshot.is_complete);
        assert!((snapshot.overall_ratio - 2.0 / 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pack_prefers_authored_then_falls_back() {
        let svc = service();
        let authored = svc.pack(&LessonId::new("fair-value")).unwrap();
        assert!(!authored.overview.is_empty());

        let generated = svc.pack(&LessonId::new("idea-discovery")).unwrap();
        assert_eq!(generated.framework_cards[0].title, "Claim");
    }
}
