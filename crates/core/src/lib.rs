#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod library;
pub mod machine;
pub mod model;
pub mod sequencing;
pub mod store;
pub mod time;

pub use catalog::{Catalog, foundational_checklist};
pub use error::Error;
pub use library::TrainingLibrary;
pub use machine::{CheckpointOutcome, StageMachine, pass_threshold};
pub use sequencing::{RankedLesson, ranked, recommend};
pub use store::{ProgressError, ProgressStore};
pub use time::Clock;
