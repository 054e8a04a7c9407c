use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;
use ulid::Ulid;

use crate::admin::UserId;
use crate::answer::{match_rule, MatchRule};
use crate::bank::{Question, QuestionId};
use crate::clock::now_rfc3339_utc;
use crate::error::{CoreError, CoreResult};
use crate::ledger::{Actor, LedgerEvent, LedgerLog};
use crate::progress::ProgressTracker;

/// Attempt budget for a session. Upstream retry/lockout policy lives here,
/// not in the equivalence checker.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct GradingPolicy {
    pub max_attempts: u32,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Accepted; the question is closed.
    Correct { attempts: u32, rule: MatchRule },
    /// Rejected with budget left.
    Incorrect { attempts: u32, remaining: u32 },
    /// Rejected on the final attempt; the question is closed and answer
    /// reveal unlocks.
    Exhausted { attempts: u32 },
    /// The question was already closed; nothing was consumed.
    AlreadyCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuestionState {
    Open,
    Correct,
    Exhausted,
}

#[derive(Debug, Clone, Copy)]
struct AttemptState {
    wrong: u32,
    state: QuestionState,
}

/// Per-learner grading state across questions. The equivalence checker
/// stays stateless; all attempt bookkeeping lives here.
pub struct GradingSession {
    session_id: String,
    user_id: Option<UserId>,
    policy: GradingPolicy,
    attempts: BTreeMap<QuestionId, AttemptState>,
}

impl GradingSession {
    /// Start a session. `user_id` of `None` is a guest: grading works but no
    /// progress is persisted. Logs `SESSION_STARTED` when a ledger is given.
    pub fn start(
        user_id: Option<UserId>,
        policy: GradingPolicy,
        ledger: Option<&mut LedgerLog>,
    ) -> CoreResult<Self> {
        let session = Self {
            session_id: session_id_ulid(),
            user_id,
            policy,
            attempts: BTreeMap::new(),
        };
        if let Some(ledger) = ledger {
            ledger.append(LedgerEvent {
                ts_utc: now_rfc3339_utc(),
                event_type: "SESSION_STARTED".to_string(),
                session_id: session.session_id.clone(),
                user_id,
                actor: Actor::Learner,
                details: json!({ "max_attempts": policy.max_attempts }),
                prev_event_hash: String::new(),
                event_hash: String::new(),
            })?;
        }
        Ok(session)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Preload attempt state from saved progress so a returning learner
    /// cannot re-answer questions already closed in an earlier session.
    pub fn hydrate_from_tracker(&mut self, tracker: &ProgressTracker) {
        let Some(user_id) = self.user_id else {
            return;
        };
        for record in tracker.for_user(user_id) {
            let state = if record.is_correct {
                QuestionState::Correct
            } else if record.attempts >= self.policy.max_attempts {
                QuestionState::Exhausted
            } else {
                QuestionState::Open
            };
            self.attempts.insert(
                record.question_id,
                AttemptState {
                    wrong: if record.is_correct {
                        record.attempts.saturating_sub(1)
                    } else {
                        record.attempts
                    },
                    state,
                },
            );
        }
    }

    /// Grade one submission. Empty input is an error and consumes nothing;
    /// closed questions report `AlreadyCompleted`. On close the outcome is
    /// written to the tracker (signed-in users only) and, when a ledger is
    /// given, `ANSWER_SUBMITTED` / `QUESTION_COMPLETED` events are appended.
    pub fn submit(
        &mut self,
        question: &Question,
        raw_input: &str,
        tracker: &mut ProgressTracker,
        mut ledger: Option<&mut LedgerLog>,
    ) -> CoreResult<SubmissionOutcome> {
        if raw_input.trim().is_empty() {
            return Err(CoreError::InvalidInput("empty answer".to_string()));
        }

        let entry = self.attempts.entry(question.id).or_insert(AttemptState {
            wrong: 0,
            state: QuestionState::Open,
        });
        if entry.state != QuestionState::Open {
            return Ok(SubmissionOutcome::AlreadyCompleted);
        }

        let rule = match_rule(raw_input, &question.normalized_answer, &question.alternatives);
        let attempt_number = entry.wrong + 1;

        if let Some(ledger) = ledger.as_deref_mut() {
            let mut details = json!({
                "question_id": question.id,
                "attempt": attempt_number,
                "accepted": rule.is_some(),
            });
            if let Some(rule) = rule {
                details["rule"] = json!(rule.as_str());
            }
            ledger.append(LedgerEvent {
                ts_utc: now_rfc3339_utc(),
                event_type: "ANSWER_SUBMITTED".to_string(),
                session_id: self.session_id.clone(),
                user_id: self.user_id,
                actor: Actor::Learner,
                details,
                prev_event_hash: String::new(),
                event_hash: String::new(),
            })?;
        }

        match rule {
            Some(rule) => {
                entry.state = QuestionState::Correct;
                let attempts = attempt_number;
                if let Some(user_id) = self.user_id {
                    tracker.record_outcome(
                        user_id,
                        question.id,
                        true,
                        attempts,
                        self.policy.max_attempts,
                    );
                }
                self.log_completed(question.id, true, attempts, ledger)?;
                Ok(SubmissionOutcome::Correct { attempts, rule })
            }
            None => {
                entry.wrong += 1;
                let remaining = self.policy.max_attempts.saturating_sub(entry.wrong);
                if remaining > 0 {
                    Ok(SubmissionOutcome::Incorrect {
                        attempts: entry.wrong,
                        remaining,
                    })
                } else {
                    entry.state = QuestionState::Exhausted;
                    let attempts = entry.wrong;
                    if let Some(user_id) = self.user_id {
                        tracker.record_outcome(
                            user_id,
                            question.id,
                            false,
                            attempts,
                            self.policy.max_attempts,
                        );
                    }
                    self.log_completed(question.id, false, attempts, ledger)?;
                    Ok(SubmissionOutcome::Exhausted { attempts })
                }
            }
        }
    }

    /// The stored answer may be shown only once the budget is spent.
    pub fn reveal_allowed(&self, question_id: QuestionId) -> bool {
        matches!(
            self.attempts.get(&question_id),
            Some(AttemptState {
                state: QuestionState::Exhausted,
                ..
            })
        )
    }

    pub fn is_closed(&self, question_id: QuestionId) -> bool {
        matches!(
            self.attempts.get(&question_id),
            Some(AttemptState {
                state: QuestionState::Correct | QuestionState::Exhausted,
                ..
            })
        )
    }

    fn log_completed(
        &self,
        question_id: QuestionId,
        is_correct: bool,
        attempts: u32,
        ledger: Option<&mut LedgerLog>,
    ) -> CoreResult<()> {
        if let Some(ledger) = ledger {
            ledger.append(LedgerEvent {
                ts_utc: now_rfc3339_utc(),
                event_type: "QUESTION_COMPLETED".to_string(),
                session_id: self.session_id.clone(),
                user_id: self.user_id,
                actor: Actor::Learner,
                details: json!({
                    "question_id": question_id,
                    "is_correct": is_correct,
                    "attempts": attempts,
                }),
                prev_event_hash: String::new(),
                event_hash: String::new(),
            })?;
        }
        Ok(())
    }
}

fn session_id_ulid() -> String {
    format!("s_{}", Ulid::new())
}
