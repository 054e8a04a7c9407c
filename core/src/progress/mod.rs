pub mod model;
pub mod stats;
pub mod tracker;

pub use model::ProgressRecord;
pub use stats::{user_stats, UserStats};
pub use tracker::ProgressTracker;
