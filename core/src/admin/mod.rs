use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::clock::now_rfc3339_utc;
use crate::error::{CoreError, CoreResult};
use crate::ledger::{Actor, LedgerEvent, LedgerLog};
use crate::progress::ProgressTracker;

pub type UserId = u32;

/// An identity-provider-backed account. Emails are unique, as is the
/// `(provider, provider_id)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub provider: String,
    pub provider_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<UserAccount>,
    next_id: UserId,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a user. A repeat `(provider, provider_id)` pair returns the
    /// existing account's id (an identity-provider revisit); a new pair with
    /// an already-taken email is rejected.
    pub fn register(
        &mut self,
        email: &str,
        provider: &str,
        provider_id: &str,
        ledger: Option<&mut LedgerLog>,
    ) -> CoreResult<UserId> {
        if email.trim().is_empty() {
            return Err(CoreError::InvalidInput("email cannot be empty".to_string()));
        }
        if let Some(existing) = self
            .users
            .iter()
            .find(|u| u.provider == provider && u.provider_id == provider_id)
        {
            return Ok(existing.id);
        }
        if self.users.iter().any(|u| u.email == email) {
            return Err(CoreError::InvalidInput(format!(
                "email {} is already registered",
                email
            )));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.users.push(UserAccount {
            id,
            email: email.to_string(),
            provider: provider.to_string(),
            provider_id: provider_id.to_string(),
            created_at: now_rfc3339_utc(),
        });
        if let Some(ledger) = ledger {
            ledger.append(LedgerEvent {
                ts_utc: now_rfc3339_utc(),
                event_type: "USER_REGISTERED".to_string(),
                session_id: format!("u_{}", id),
                user_id: Some(id),
                actor: Actor::System,
                details: json!({ "user_id": id, "provider": provider }),
                prev_event_hash: String::new(),
                event_hash: String::new(),
            })?;
        }
        Ok(id)
    }

    pub fn get(&self, id: UserId) -> CoreResult<&UserAccount> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("user {}", id)))
    }

    /// All accounts, newest first.
    pub fn list(&self) -> Vec<&UserAccount> {
        let mut out: Vec<&UserAccount> = self.users.iter().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        out
    }

    /// Delete a user and cascade into their progress records. The ledger is
    /// append-only history and is not rewritten. Returns the number of
    /// progress rows removed.
    pub fn delete(
        &mut self,
        id: UserId,
        tracker: &mut ProgressTracker,
        ledger: Option<&mut LedgerLog>,
    ) -> CoreResult<usize> {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        if self.users.len() == before {
            return Err(CoreError::NotFound(format!("user {}", id)));
        }
        let removed = tracker.delete_user(id);
        if let Some(ledger) = ledger {
            ledger.append(LedgerEvent {
                ts_utc: now_rfc3339_utc(),
                event_type: "USER_DELETED".to_string(),
                session_id: format!("u_{}", id),
                user_id: Some(id),
                actor: Actor::Admin,
                details: json!({ "user_id": id, "progress_rows_removed": removed }),
                prev_event_hash: String::new(),
                event_hash: String::new(),
            })?;
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_revisit_returns_the_existing_account() {
        let mut dir = UserDirectory::new();
        let a = dir.register("kid@example.com", "google", "g-1", None).unwrap();
        let b = dir.register("kid@example.com", "google", "g-1", None).unwrap();
        assert_eq!(a, b);
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn duplicate_email_on_a_new_provider_pair_is_rejected() {
        let mut dir = UserDirectory::new();
        dir.register("kid@example.com", "google", "g-1", None).unwrap();
        assert!(dir.register("kid@example.com", "github", "gh-9", None).is_err());
    }

    #[test]
    fn delete_cascades_into_progress() {
        let mut dir = UserDirectory::new();
        let id = dir.register("kid@example.com", "google", "g-1", None).unwrap();
        let mut tracker = ProgressTracker::new();
        tracker.record_outcome(id, 1, true, 1, 3);
        tracker.record_outcome(id, 2, false, 3, 3);

        let removed = dir.delete(id, &mut tracker, None).unwrap();
        assert_eq!(removed, 2);
        assert!(dir.get(id).is_err());
        assert!(dir.delete(id, &mut tracker, None).is_err());
    }
}
