#![forbid(unsafe_code)]

pub mod coach_service;
pub mod course_service;
pub mod error;

pub use studio_core::Clock;

pub use coach_service::{CoachConfig, CoachGuidance, CoachOutcome, CoachService};
pub use course_service::{CourseProgress, CourseService};
pub use error::{CoachError, CourseError};
