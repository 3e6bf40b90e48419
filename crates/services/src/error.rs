//! Shared error types for the services crate.

use thiserror::Error;

use studio_core::ProgressError;
use studio_core::model::LessonId;

/// Errors emitted by `CoachService`.
///
/// None of these are fatal to the caller: `CoachService::fetch_guidance`
/// absorbs every variant into `CoachOutcome::Unavailable`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoachError {
    #[error("coaching is not configured")]
    Disabled,
    #[error("at least one recommended lesson title is required")]
    NoLessons,
    #[error("coach returned an empty response")]
    EmptyResponse,
    #[error("coach response was superseded by a newer request")]
    Superseded,
    #[error("coach request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("coach returned malformed guidance: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors emitted by `CourseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseError {
    #[error("unknown lesson id: {id}")]
    UnknownLesson { id: LessonId },
    #[error(transparent)]
    Progress(#[from] ProgressError),
}
