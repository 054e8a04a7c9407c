pub mod session;

pub use session::{GradingPolicy, GradingSession, SubmissionOutcome};
