use drill_core::ledger::{verify_chain, Actor, LedgerEvent, LedgerLog, ZERO_HASH_64};
use serde_json::json;

fn seeded_event(n: u32) -> LedgerEvent {
    LedgerEvent {
        ts_utc: "2026-08-07T00:00:00Z".to_string(),
        event_type: "ANSWER_SUBMITTED".to_string(),
        session_id: "s_chain_test".to_string(),
        user_id: Some(1),
        actor: Actor::Learner,
        details: json!({"question_id": n, "attempt": 1, "accepted": false}),
        prev_event_hash: String::new(),
        event_hash: String::new(),
    }
}

#[test]
fn chain_links_and_verifies_across_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("ledger.ndjson");

    let mut log = LedgerLog::open_or_create(&path).unwrap();
    let first = log.append(seeded_event(1)).unwrap();
    assert_eq!(first.prev_event_hash, ZERO_HASH_64);
    let second = log.append(seeded_event(2)).unwrap();
    assert_eq!(second.prev_event_hash, first.event_hash);
    drop(log);

    // Reopen resumes the chain from the last persisted line.
    let mut reopened = LedgerLog::open_or_create(&path).unwrap();
    let third = reopened.append(seeded_event(3)).unwrap();
    assert_eq!(third.prev_event_hash, second.event_hash);

    assert_eq!(verify_chain(&path).unwrap(), 3);
}

#[test]
fn tampering_with_a_line_breaks_verification() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("ledger.ndjson");

    let mut log = LedgerLog::open_or_create(&path).unwrap();
    log.append(seeded_event(1)).unwrap();
    log.append(seeded_event(2)).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let tampered = text.replace("\"accepted\":false", "\"accepted\":true");
    assert_ne!(text, tampered);
    std::fs::write(&path, tampered).unwrap();

    assert!(verify_chain(&path).is_err());
}

#[test]
fn append_rejects_events_outside_the_taxonomy() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("ledger.ndjson");
    let mut log = LedgerLog::open_or_create(&path).unwrap();

    let mut event = seeded_event(1);
    event.event_type = "SOMETHING_NEW".to_string();
    assert!(log.append(event).is_err());

    let mut event = seeded_event(1);
    event.details = json!({"question_id": 1});
    assert!(log.append(event).is_err());

    // A rejected append leaves the file empty and the chain intact.
    assert_eq!(verify_chain(&path).unwrap(), 0);
    assert!(log.append(seeded_event(1)).is_ok());
    assert_eq!(verify_chain(&path).unwrap(), 1);
}
