use chrono::{DateTime, Utc};

use crate::model::{Lesson, LessonProgress, Stage, TrainingPack};
use crate::store::ProgressError;

//
// ─── CHECKPOINT OUTCOME ────────────────────────────────────────────────────────
//

/// Result of an atomic checkpoint submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointOutcome {
    pub score: usize,
    pub total: usize,
    pub threshold: usize,
    pub passed: bool,
    /// Stage after the submission was applied.
    pub stage: Stage,
}

/// Minimum score required to pass a checkpoint with `question_count`
/// questions: two thirds, rounded up.
///
/// A checkpoint with zero questions has a threshold of zero and therefore
/// auto-passes.
#[must_use]
pub fn pass_threshold(question_count: usize) -> usize {
    (2 * question_count).div_ceil(3)
}

//
// ─── STAGE MACHINE ─────────────────────────────────────────────────────────────
//

/// Drives one lesson's progress record through the five stages.
///
/// Transition table:
///
/// | From             | To               | Guard                         |
/// |------------------|------------------|-------------------------------|
/// | `Brief`          | `GuidedPractice` | always                        |
/// | `GuidedPractice` | `DeepTraining`   | every activity complete       |
/// | `DeepTraining`   | `Checkpoint`     | always                        |
/// | `Checkpoint`     | `Completion`     | passing submission only       |
/// | any non-initial  | previous stage   | always (keeps completion data)|
///
/// A refused transition is a silent no-op, never an error. The machine is
/// independent of any display layer; it only reads the lesson's activity
/// list and, for checkpoint operations, the training pack.
#[derive(Debug, Clone, Copy)]
pub struct StageMachine<'a> {
    lesson: &'a Lesson,
}

impl<'a> StageMachine<'a> {
    #[must_use]
    pub fn new(lesson: &'a Lesson) -> Self {
        Self { lesson }
    }

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        self.lesson
    }

    /// Whether `advance` would move the record forward.
    ///
    /// `Checkpoint` always answers false here: the only way into
    /// `Completion` is a passing `submit_checkpoint`.
    #[must_use]
    pub fn can_advance(&self, progress: &LessonProgress) -> bool {
        match progress.stage() {
            Stage::Brief | Stage::DeepTraining => true,
            Stage::GuidedPractice => self.all_activities_complete(progress),
            Stage::Checkpoint | Stage::Completion => false,
        }
    }

    /// Moves to the next stage if the guard allows it.
    ///
    /// Returns the new stage, or `None` when the transition was refused.
    pub fn advance(&self, progress: &mut LessonProgress) -> Option<Stage> {
        if !self.can_advance(progress) {
            return None;
        }
        let next = progress.stage().next()?;
        progress.set_stage(next);
        Some(next)
    }

    /// Moves one stage backward for review.
    ///
    /// Permitted from any non-initial stage. Never mutates completion data:
    /// activity flags, answers, and the ever-completed mark all survive.
    pub fn go_back(&self, progress: &mut LessonProgress) -> Option<Stage> {
        let prev = progress.stage().prev()?;
        progress.set_stage(prev);
        Some(prev)
    }

    /// Records an answer for a checkpoint question.
    ///
    /// Selecting an answer while the checkpoint is already submitted clears
    /// the submitted flag; the learner must resubmit.
    ///
    /// # Errors
    ///
    /// Rejects question or option indices outside the pack without touching
    /// the record.
    pub fn select_answer(
        &self,
        progress: &mut LessonProgress,
        pack: &TrainingPack,
        question: usize,
        option: usize,
    ) -> Result<(), ProgressError> {
        let Some(entry) = pack.checkpoint.get(question) else {
            return Err(ProgressError::QuestionOutOfRange {
                index: question,
                len: pack.question_count(),
            });
        };
        if option >= entry.options().len() {
            return Err(ProgressError::OptionOutOfRange {
                index: option,
                len: entry.options().len(),
            });
        }

        progress.set_answer(question, option);
        Ok(())
    }

    /// Submits the checkpoint as one atomic action.
    ///
    /// Refused (`None`) unless the record is at `Checkpoint`. Otherwise the
    /// submission flag is set, the score is evaluated against
    /// `pass_threshold`, and on a pass the record moves to `Completion` and
    /// receives its (monotonic) completion stamp in the same action. A
    /// failed submission keeps the learner at `Checkpoint`.
    pub fn submit_checkpoint(
        &self,
        progress: &mut LessonProgress,
        pack: &TrainingPack,
        now: DateTime<Utc>,
    ) -> Option<CheckpointOutcome> {
        if progress.stage() != Stage::Checkpoint {
            return None;
        }

        progress.set_submitted();

        let score = pack
            .checkpoint
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                progress
                    .answer_for(*index)
                    .is_some_and(|selected| question.is_correct(selected))
            })
            .count();

        let total = pack.question_count();
        let threshold = pass_threshold(total);
        let passed = score >= threshold;

        if passed {
            progress.set_stage(Stage::Completion);
            progress.record_completion(now);
        }

        Some(CheckpointOutcome {
            score,
            total,
            threshold,
            passed,
            stage: progress.stage(),
        })
    }

    fn all_activities_complete(&self, progress: &LessonProgress) -> bool {
        (0..self.lesson.activity_count()).all(|index| progress.is_activity_complete(index))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LessonId;
    use crate::time::fixed_now;

    fn lesson() -> Lesson {
        Lesson::new(
            LessonId::new("sample"),
            "Sample Lesson",
            "Practice the sample workflow.",
            vec!["First.".into(), "Second.".into()],
            Vec::new(),
        )
        .unwrap()
    }

    fn pack(lesson: &Lesson) -> TrainingPack {
        TrainingPack::fallback_for(lesson)
    }

    /// Drives a fresh record to the checkpoint stage with all activities done.
    fn at_checkpoint(lesson: &Lesson) -> LessonProgress {
        let machine = StageMachine::new(lesson);
        let mut progress = LessonProgress::new();
        progress.mark_activity(0);
        progress.mark_activity(1);
        assert_eq!(machine.advance(&mut progress), Some(Stage::GuidedPractice));
        assert_eq!(machine.advance(&mut progress), Some(Stage::DeepTraining));
        assert_eq!(machine.advance(&mut progress), Some(Stage::Checkpoint));
        progress
    }

    fn answer_all_correct(
        machine: &StageMachine<'_>,
        progress: &mut LessonProgress,
        pack: &TrainingPack,
    ) {
        for (index, question) in pack.checkpoint.iter().enumerate() {
            machine
                .select_answer(progress, pack, index, question.correct_index())
                .unwrap();
        }
    }

    #[test]
    fn pass_threshold_is_two_thirds_rounded_up() {
        assert_eq!(pass_threshold(0), 0);
        assert_eq!(pass_threshold(1), 1);
        assert_eq!(pass_threshold(2), 2);
        assert_eq!(pass_threshold(3), 2);
        assert_eq!(pass_threshold(4), 3);
        assert_eq!(pass_threshold(5), 4);
        assert_eq!(pass_threshold(6), 4);
    }

    #[test]
    fn brief_advances_unconditionally() {
        let lesson = lesson();
        let machine = StageMachine::new(&lesson);
        let mut progress = LessonProgress::new();

        assert!(machine.can_advance(&progress));
        assert_eq!(machine.advance(&mut progress), Some(Stage::GuidedPractice));
    }

    #[test]
    fn guided_practice_is_gated_on_activities() {
        let lesson = lesson();
        let machine = StageMachine::new(&lesson);
        let mut progress = LessonProgress::new();
        machine.advance(&mut progress);

        // One of two activities done: refused, state unchanged.
        progress.mark_activity(0);
        assert!(!machine.can_advance(&progress));
        assert_eq!(machine.advance(&mut progress), None);
        assert_eq!(progress.stage(), Stage::GuidedPractice);

        // Last activity lands: the same transition succeeds immediately.
        progress.mark_activity(1);
        assert_eq!(machine.advance(&mut progress), Some(Stage::DeepTraining));
    }

    #[test]
    fn advance_never_reaches_completion() {
        let lesson = lesson();
        let machine = StageMachine::new(&lesson);
        let mut progress = at_checkpoint(&lesson);

        assert!(!machine.can_advance(&progress));
        assert_eq!(machine.advance(&mut progress), None);
        assert_eq!(progress.stage(), Stage::Checkpoint);
    }

    #[test]
    fn submission_score_of_two_of_three_passes() {
        let lesson = lesson();
        let machine = StageMachine::new(&lesson);
        let lesson3 = Lesson::new(
            LessonId::new("three"),
            "Three",
            "Three activities.",
            vec!["A.".into(), "B.".into(), "C.".into()],
            Vec::new(),
        )
        .unwrap();
        let pack = pack(&lesson3);
        assert_eq!(pack.question_count(), 3);

        let mut progress = at_checkpoint(&lesson);
        // Two correct, one wrong.
        machine.select_answer(&mut progress, &pack, 0, 1).unwrap();
        machine.select_answer(&mut progress, &pack, 1, 1).unwrap();
        machine.select_answer(&mut progress, &pack, 2, 0).unwrap();

        let outcome = machine
            .submit_checkpoint(&mut progress, &pack, fixed_now())
            .unwrap();
        assert_eq!(outcome.score, 2);
        assert_eq!(outcome.threshold, 2);
        assert!(outcome.passed);
        assert_eq!(progress.stage(), Stage::Completion);
        assert!(progress.ever_completed());
    }

    #[test]
    fn submission_score_of_one_of_three_fails() {
        let lesson = lesson();
        let machine = StageMachine::new(&lesson);
        let lesson3 = Lesson::new(
            LessonId::new("three"),
            "Three",
            "Three activities.",
            vec!["A.".into(), "B.".into(), "C.".into()],
            Vec::new(),
        )
        .unwrap();
        let pack = pack(&lesson3);

        let mut progress = at_checkpoint(&lesson);
        machine.select_answer(&mut progress, &pack, 0, 1).unwrap();
        machine.select_answer(&mut progress, &pack, 1, 0).unwrap();
        machine.select_answer(&mut progress, &pack, 2, 2).unwrap();

        let outcome = machine
            .submit_checkpoint(&mut progress, &pack, fixed_now())
            .unwrap();
        assert_eq!(outcome.score, 1);
        assert!(!outcome.passed);
        assert!(progress.submitted());
        assert_eq!(progress.stage(), Stage::Checkpoint);
        assert!(!progress.ever_completed());
    }

    #[test]
    fn changing_an_answer_after_submission_regates() {
        let lesson = lesson();
        let machine = StageMachine::new(&lesson);
        let pack = pack(&lesson);

        let mut progress = at_checkpoint(&lesson);
        answer_all_correct(&machine, &mut progress, &pack);
        // Sabotage one answer so the submission fails but is recorded.
        machine.select_answer(&mut progress, &pack, 0, 0).unwrap();
        machine.select_answer(&mut progress, &pack, 1, 0).unwrap();
        machine
            .submit_checkpoint(&mut progress, &pack, fixed_now())
            .unwrap();
        assert!(progress.submitted());

        machine.select_answer(&mut progress, &pack, 0, 1).unwrap();
        assert!(!progress.submitted());
        assert_eq!(progress.stage(), Stage::Checkpoint);
    }

    #[test]
    fn submission_outside_checkpoint_is_refused() {
        let lesson = lesson();
        let machine = StageMachine::new(&lesson);
        let pack = pack(&lesson);
        let mut progress = LessonProgress::new();

        assert_eq!(
            machine.submit_checkpoint(&mut progress, &pack, fixed_now()),
            None
        );
        assert!(!progress.submitted());
    }

    #[test]
    fn zero_question_checkpoint_auto_passes() {
        let bare = Lesson::new(
            LessonId::new("bare"),
            "Bare",
            "No activities.",
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        let machine = StageMachine::new(&bare);
        let pack = TrainingPack::fallback_for(&bare);
        assert_eq!(pack.question_count(), 0);

        let mut progress = LessonProgress::new();
        machine.advance(&mut progress);
        machine.advance(&mut progress);
        machine.advance(&mut progress);
        assert_eq!(progress.stage(), Stage::Checkpoint);

        let outcome = machine
            .submit_checkpoint(&mut progress, &pack, fixed_now())
            .unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.threshold, 0);
        assert_eq!(progress.stage(), Stage::Completion);
    }

    #[test]
    fn go_back_preserves_completion_data() {
        let lesson = lesson();
        let machine = StageMachine::new(&lesson);
        let pack = pack(&lesson);

        let mut progress = at_checkpoint(&lesson);
        answer_all_correct(&machine, &mut progress, &pack);
        let outcome = machine
            .submit_checkpoint(&mut progress, &pack, fixed_now())
            .unwrap();
        assert!(outcome.passed);

        assert_eq!(machine.go_back(&mut progress), Some(Stage::Checkpoint));
        assert_eq!(machine.go_back(&mut progress), Some(Stage::DeepTraining));
        assert!(progress.ever_completed());
        assert_eq!(progress.completed_count(), 2);
        assert!(!progress.answers().is_empty());
    }

    #[test]
    fn go_back_from_brief_is_refused() {
        let lesson = lesson();
        let machine = StageMachine::new(&lesson);
        let mut progress = LessonProgress::new();
        assert_eq!(machine.go_back(&mut progress), None);
        assert_eq!(progress.stage(), Stage::Brief);
    }

    #[test]
    fn select_answer_rejects_bad_indices() {
        let lesson = lesson();
        let machine = StageMachine::new(&lesson);
        let pack = pack(&lesson);
        let mut progress = at_checkpoint(&lesson);

        let err = machine
            .select_answer(&mut progress, &pack, 99, 0)
            .unwrap_err();
        assert!(matches!(err, ProgressError::QuestionOutOfRange { index: 99, .. }));

        let err = machine
            .select_answer(&mut progress, &pack, 0, 99)
            .unwrap_err();
        assert!(matches!(err, ProgressError::OptionOutOfRange { index: 99, .. }));
        assert!(progress.answers().is_empty());
    }
}
