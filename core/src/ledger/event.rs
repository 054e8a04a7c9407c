use serde::{Deserialize, Serialize};

use crate::admin::UserId;
use crate::error::{CoreError, CoreResult};

use super::canonical::{sha256_hex, to_canonical_bytes};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Learner,
    Admin,
    System,
}

/// One line of the activity ledger. `event_hash` is the SHA-256 of the
/// canonical JSON of the event with `event_hash` zeroed; `prev_event_hash`
/// links to the previous line (all zeros at genesis).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEvent {
    pub ts_utc: String, // RFC3339 UTC string
    pub event_type: String,
    pub session_id: String,
    pub user_id: Option<UserId>,
    pub actor: Actor,
    pub details: serde_json::Value,
    pub prev_event_hash: String, // hex 64
    pub event_hash: String,      // hex 64
}

pub const ZERO_HASH_64: &str = "0000000000000000000000000000000000000000000000000000000000000000";

pub fn compute_event_hash(event: &LedgerEvent) -> CoreResult<String> {
    let mut e = event.clone();
    e.event_hash = ZERO_HASH_64.to_string();
    let bytes = to_canonical_bytes(&e)?;
    Ok(sha256_hex(&bytes))
}

pub fn finalize_event(mut event: LedgerEvent) -> CoreResult<LedgerEvent> {
    if event.prev_event_hash.len() != 64
        || !event.prev_event_hash.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(CoreError::InvalidInput(
            "prev_event_hash must be 64 hex chars".to_string(),
        ));
    }
    validate_event_taxonomy(&event)?;
    let eh = compute_event_hash(&event)?;
    event.event_hash = eh;
    Ok(event)
}

fn validate_event_taxonomy(event: &LedgerEvent) -> CoreResult<()> {
    let allowed = [
        "BANK_SEEDED",
        "SESSION_STARTED",
        "ANSWER_SUBMITTED",
        "QUESTION_COMPLETED",
        "REPORT_FILED",
        "REPORT_RESOLVED",
        "USER_REGISTERED",
        "USER_DELETED",
    ];
    if !allowed.contains(&event.event_type.as_str()) {
        return Err(CoreError::InvalidInput(format!(
            "unknown event_type {}",
            event.event_type
        )));
    }
    let required = required_detail_keys(&event.event_type);
    for k in required {
        if event.details.get(k).is_none() {
            return Err(CoreError::InvalidInput(format!(
                "event {} missing details.{}",
                event.event_type, k
            )));
        }
    }
    Ok(())
}

fn required_detail_keys(event_type: &str) -> &'static [&'static str] {
    match event_type {
        "BANK_SEEDED" => &["course_count", "category_count", "question_count"],
        "SESSION_STARTED" => &["max_attempts"],
        "ANSWER_SUBMITTED" => &["question_id", "attempt", "accepted"],
        "QUESTION_COMPLETED" => &["question_id", "is_correct", "attempts"],
        "REPORT_FILED" => &["report_id", "question_id", "issue_type"],
        "REPORT_RESOLVED" => &["report_id"],
        "USER_REGISTERED" => &["user_id", "provider"],
        "USER_DELETED" => &["user_id", "progress_rows_removed"],
        _ => &[],
    }
}
