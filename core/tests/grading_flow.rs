use drill_core::bank::seed::seed_bank;
use drill_core::grading::{GradingPolicy, GradingSession, SubmissionOutcome};
use drill_core::ledger::{verify_chain, LedgerLog};
use drill_core::progress::ProgressTracker;

#[test]
fn a_full_session_grades_persists_and_logs() {
    let bank = seed_bank().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let ledger_path = tmp.path().join("ledger.ndjson");
    let mut ledger = LedgerLog::open_or_create(&ledger_path).unwrap();

    let mut tracker = ProgressTracker::new();
    let mut session =
        GradingSession::start(Some(7), GradingPolicy::default(), Some(&mut ledger)).unwrap();

    // Question 1: canonical answer 181/15, answered with an unreduced form.
    let q1 = bank.question(1).unwrap();
    let outcome = session
        .submit(q1, "362/30", &mut tracker, Some(&mut ledger))
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Correct { attempts: 1, .. }));

    // Question 10: "No solution", answered wrong twice then with a phrase variant.
    let q10 = bank.question(10).unwrap();
    assert!(matches!(
        session
            .submit(q10, "(1,1)", &mut tracker, Some(&mut ledger))
            .unwrap(),
        SubmissionOutcome::Incorrect {
            attempts: 1,
            remaining: 2
        }
    ));
    assert!(matches!(
        session
            .submit(q10, "(0,0)", &mut tracker, Some(&mut ledger))
            .unwrap(),
        SubmissionOutcome::Incorrect {
            attempts: 2,
            remaining: 1
        }
    ));
    let outcome = session
        .submit(q10, "None", &mut tracker, Some(&mut ledger))
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Correct { attempts: 3, .. }));

    // Question 40: exhaust the budget.
    let q40 = bank.question(40).unwrap();
    for _ in 0..2 {
        session
            .submit(q40, "m<=1", &mut tracker, Some(&mut ledger))
            .unwrap();
    }
    let outcome = session
        .submit(q40, "m<=1", &mut tracker, Some(&mut ledger))
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Exhausted { attempts: 3 }));
    assert!(session.reveal_allowed(40));

    // Tracker state mirrors the outcomes.
    assert!(tracker.get(7, 1).unwrap().is_correct);
    assert_eq!(tracker.get(7, 10).unwrap().attempts, 3);
    assert!(tracker.get(7, 10).unwrap().is_correct);
    assert!(!tracker.get(7, 40).unwrap().is_correct);
    assert!(tracker.get(7, 40).unwrap().completed_at.is_some());

    // SESSION_STARTED + 7 ANSWER_SUBMITTED + 3 QUESTION_COMPLETED.
    let events = verify_chain(&ledger_path).unwrap();
    assert_eq!(events, 11);
}

#[test]
fn a_returning_learner_resumes_closed_questions() {
    let bank = seed_bank().unwrap();
    let mut tracker = ProgressTracker::new();

    let mut first = GradingSession::start(Some(3), GradingPolicy::default(), None).unwrap();
    let q5 = bank.question(5).unwrap();
    first.submit(q5, "-6", &mut tracker, None).unwrap();

    let mut second = GradingSession::start(Some(3), GradingPolicy::default(), None).unwrap();
    second.hydrate_from_tracker(&tracker);
    assert!(second.is_closed(5));
    assert_eq!(
        second.submit(q5, "-6", &mut tracker, None).unwrap(),
        SubmissionOutcome::AlreadyCompleted
    );
}

#[test]
fn a_custom_attempt_budget_is_honored() {
    let bank = seed_bank().unwrap();
    let mut tracker = ProgressTracker::new();
    let mut session =
        GradingSession::start(Some(1), GradingPolicy { max_attempts: 1 }, None).unwrap();

    let q9 = bank.question(9).unwrap();
    let outcome = session.submit(q9, "(9,9)", &mut tracker, None).unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Exhausted { attempts: 1 }));
    assert!(session.reveal_allowed(9));
}
