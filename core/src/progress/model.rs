use serde::{Deserialize, Serialize};

use crate::admin::UserId;
use crate::bank::QuestionId;

/// Per-user, per-question grading outcome. `completed_at` is set exactly
/// when the record closes: answered correctly, or the attempt budget spent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub attempts: u32,
    pub completed_at: Option<String>,
}
