use std::collections::BTreeMap;

use crate::admin::UserId;
use crate::bank::QuestionId;
use crate::clock::now_rfc3339_utc;

use super::model::ProgressRecord;

/// In-memory progress store, one record per `(user, question)`.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    records: BTreeMap<(UserId, QuestionId), ProgressRecord>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Upsert the outcome for a question. The completion timestamp is set
    /// when the submission was correct or the attempt budget is spent, and
    /// cleared otherwise, recomputed on every save.
    pub fn record_outcome(
        &mut self,
        user_id: UserId,
        question_id: QuestionId,
        is_correct: bool,
        attempts: u32,
        max_attempts: u32,
    ) -> &ProgressRecord {
        let completed_at = if is_correct || attempts >= max_attempts {
            Some(now_rfc3339_utc())
        } else {
            None
        };
        let record = ProgressRecord {
            user_id,
            question_id,
            is_correct,
            attempts,
            completed_at,
        };
        self.records.insert((user_id, question_id), record);
        &self.records[&(user_id, question_id)]
    }

    pub fn get(&self, user_id: UserId, question_id: QuestionId) -> Option<&ProgressRecord> {
        self.records.get(&(user_id, question_id))
    }

    /// All of a user's records, in question-id order.
    pub fn for_user(&self, user_id: UserId) -> Vec<&ProgressRecord> {
        self.records
            .range((user_id, QuestionId::MIN)..=(user_id, QuestionId::MAX))
            .map(|(_, r)| r)
            .collect()
    }

    /// Drop every record belonging to a user; returns how many were removed.
    pub fn delete_user(&mut self, user_id: UserId) -> usize {
        let keys: Vec<(UserId, QuestionId)> = self
            .records
            .range((user_id, QuestionId::MIN)..=(user_id, QuestionId::MAX))
            .map(|(k, _)| *k)
            .collect();
        for k in &keys {
            self.records.remove(k);
        }
        keys.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
