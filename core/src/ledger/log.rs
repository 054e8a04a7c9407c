use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

use super::canonical::{sha256_hex, to_canonical_bytes};
use super::event::{finalize_event, LedgerEvent, ZERO_HASH_64};

/// Append-only NDJSON activity ledger. Reopening an existing file resumes
/// the hash chain from its last line.
pub struct LedgerLog {
    path: std::path::PathBuf,
    last_hash: String,
}

impl LedgerLog {
    pub fn open_or_create(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            File::create(&path)?;
            return Ok(Self {
                path,
                last_hash: ZERO_HASH_64.to_string(),
            });
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let mut last_hash = ZERO_HASH_64.to_string();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let v: Value = serde_json::from_str(&line)?;
            let eh = v
                .get("event_hash")
                .and_then(|x| x.as_str())
                .ok_or_else(|| {
                    CoreError::LedgerIntegrity("ledger line missing event_hash".to_string())
                })?;
            last_hash = eh.to_string();
        }
        Ok(Self { path, last_hash })
    }

    pub fn append(&mut self, mut event: LedgerEvent) -> CoreResult<LedgerEvent> {
        event.prev_event_hash = self.last_hash.clone();
        let event = finalize_event(event)?;
        let line = serde_json::to_string(&event)?; // hashing uses canonical bytes; log lines stay compact JSON
        let mut f = OpenOptions::new().append(true).open(&self.path)?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
        self.last_hash = event.event_hash.clone();
        Ok(event)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Re-verify a persisted ledger end to end: required keys on every line,
/// every `prev_event_hash` linking to the line before it, and every
/// `event_hash` matching a recomputation over canonical bytes. Returns the
/// number of verified events.
pub fn verify_chain(path: impl AsRef<Path>) -> CoreResult<usize> {
    let text = fs::read_to_string(path)?;
    let mut prev = ZERO_HASH_64.to_string();
    let mut count = 0usize;
    let required = [
        "ts_utc",
        "event_type",
        "session_id",
        "user_id",
        "actor",
        "details",
        "prev_event_hash",
        "event_hash",
    ];

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut v: Value = serde_json::from_str(line).map_err(|e| {
            CoreError::LedgerIntegrity(format!("invalid json at line {}: {}", idx + 1, e))
        })?;

        for k in required {
            if v.get(k).is_none() {
                return Err(CoreError::LedgerIntegrity(format!(
                    "missing key {} at line {}",
                    k,
                    idx + 1
                )));
            }
        }

        let prev_hash = v
            .get("prev_event_hash")
            .and_then(|x| x.as_str())
            .unwrap_or("");
        if prev_hash != prev {
            return Err(CoreError::LedgerIntegrity(format!(
                "prev_event_hash mismatch at line {} (expected {})",
                idx + 1,
                prev
            )));
        }

        let stored_hash = v
            .get("event_hash")
            .and_then(|x| x.as_str())
            .unwrap_or("")
            .to_string();
        // Force event_hash to zeros before hashing, matching append-time rules.
        v.as_object_mut()
            .ok_or_else(|| {
                CoreError::LedgerIntegrity(format!("line {} is not an object", idx + 1))
            })?
            .insert(
                "event_hash".to_string(),
                Value::String(ZERO_HASH_64.to_string()),
            );
        let canonical = to_canonical_bytes(&v)?;
        let computed = sha256_hex(&canonical);
        if computed != stored_hash {
            return Err(CoreError::LedgerIntegrity(format!(
                "event_hash mismatch at line {} (computed {})",
                idx + 1,
                computed
            )));
        }
        prev = stored_hash;
        count += 1;
    }

    Ok(count)
}
