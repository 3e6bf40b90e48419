mod ids;
mod lesson;
mod profile;
mod progress;
mod training;

pub use ids::LessonId;
pub use lesson::{Lesson, LessonError};
pub use profile::LearnerProfile;
pub use progress::{LessonProgress, Stage};
pub use training::{CheckpointQuestion, FrameworkCard, TrainingError, TrainingPack};
