use thiserror::Error;

use crate::model::{LessonError, TrainingError};
use crate::store::ProgressError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Training(#[from] TrainingError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}
