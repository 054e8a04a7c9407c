use drill_core::admin::UserDirectory;
use drill_core::bank::csv::export_bank_csv;
use drill_core::bank::seed::seed_bank;
use drill_core::clock::now_rfc3339_utc;
use drill_core::grading::{GradingPolicy, GradingSession, SubmissionOutcome};
use drill_core::ledger::{verify_chain, Actor, LedgerEvent, LedgerLog};
use drill_core::progress::{user_stats, ProgressTracker};
use drill_core::validator::BankValidator;
use serde_json::json;

fn main() {
    // Self-check over the embedded bank:
    // 1) seed determinism (two loads render identically)
    // 2) bank checklist
    // 3) a scripted grading sweep exercising the acceptance rules
    // 4) ledger chain re-verification
    //
    // Prints CHECK/DRILL lines and exits non-zero on any failure.
    let mut failed = false;

    let bank = seed_bank().expect("embedded seed bank");
    let bank2 = seed_bank().expect("embedded seed bank (2)");
    let render1 = export_bank_csv(&bank).expect("render bank");
    let render2 = export_bank_csv(&bank2).expect("render bank (2)");
    if render1 == render2 {
        println!("DRILL SEED_DETERMINISM PASS identical renders");
    } else {
        println!("DRILL SEED_DETERMINISM FAIL renders differ");
        failed = true;
    }

    let summary = BankValidator::new_v1().validate(&bank);
    for c in &summary.checks {
        println!("CHECK {} {} {}", c.check_id, c.result, c.message);
    }
    if summary.overall != "PASS" {
        failed = true;
    }

    let tmp = tempfile::tempdir().expect("tempdir");
    let ledger_path = tmp.path().join("activity_ledger.ndjson");
    let mut ledger = LedgerLog::open_or_create(&ledger_path).expect("ledger open");
    ledger
        .append(LedgerEvent {
            ts_utc: now_rfc3339_utc(),
            event_type: "BANK_SEEDED".to_string(),
            session_id: "boot".to_string(),
            user_id: None,
            actor: Actor::System,
            details: json!({
                "course_count": bank.courses().len(),
                "category_count": bank.categories().len(),
                "question_count": bank.questions().len(),
            }),
            prev_event_hash: String::new(),
            event_hash: String::new(),
        })
        .expect("log bank seed");

    let mut directory = UserDirectory::new();
    let user_id = directory
        .register("drill@localhost", "local", "drill", Some(&mut ledger))
        .expect("register drill user");
    let mut tracker = ProgressTracker::new();
    let mut session =
        GradingSession::start(Some(user_id), GradingPolicy::default(), Some(&mut ledger))
            .expect("start session");

    // Sweep 1: the stored comparison form, typed with noise (spaces and
    // uppercase), must be accepted for every question.
    let mut accepted = 0usize;
    for question in bank.questions() {
        let noisy = format!(" {} ", question.normalized_answer.to_uppercase());
        match session.submit(question, &noisy, &mut tracker, Some(&mut ledger)) {
            Ok(SubmissionOutcome::Correct { .. }) => accepted += 1,
            other => {
                println!(
                    "DRILL CANONICAL_ACCEPT FAIL question {} got {:?}",
                    question.question_number, other
                );
                failed = true;
            }
        }
    }
    println!(
        "DRILL CANONICAL_ACCEPT {} {}/{} accepted",
        if accepted == bank.questions().len() { "PASS" } else { "FAIL" },
        accepted,
        bank.questions().len()
    );

    // Sweep 2: unreduced fractions must be accepted by cross-multiplication.
    let mut fraction_session =
        GradingSession::start(None, GradingPolicy::default(), Some(&mut ledger))
            .expect("start guest session");
    let mut fraction_checked = 0usize;
    let mut fraction_ok = 0usize;
    for question in bank.questions() {
        if let Some((num, den)) = parse_fraction(&question.normalized_answer) {
            fraction_checked += 1;
            let unreduced = format!("{}/{}", num * 2, den * 2);
            match fraction_session.submit(question, &unreduced, &mut tracker, Some(&mut ledger)) {
                Ok(SubmissionOutcome::Correct { .. }) => fraction_ok += 1,
                _ => {
                    println!(
                        "DRILL FRACTION_ACCEPT FAIL question {} rejected {}",
                        question.question_number, unreduced
                    );
                    failed = true;
                }
            }
        }
    }
    println!(
        "DRILL FRACTION_ACCEPT {} {}/{} accepted",
        if fraction_ok == fraction_checked { "PASS" } else { "FAIL" },
        fraction_ok,
        fraction_checked
    );

    // Sweep 3: a wrong answer consumes the budget and unlocks reveal.
    let mut wrong_session =
        GradingSession::start(Some(user_id), GradingPolicy::default(), Some(&mut ledger))
            .expect("start session");
    let question = &bank.questions()[0];
    let mut last = None;
    for _ in 0..3 {
        last = Some(
            wrong_session
                .submit(question, "definitely wrong", &mut tracker, Some(&mut ledger))
                .expect("submit wrong answer"),
        );
    }
    let exhausted = matches!(last, Some(SubmissionOutcome::Exhausted { attempts: 3 }));
    if exhausted && wrong_session.reveal_allowed(question.id) {
        println!("DRILL BUDGET_EXHAUSTION PASS reveal unlocked after 3 attempts");
    } else {
        println!("DRILL BUDGET_EXHAUSTION FAIL outcome {:?}", last);
        failed = true;
    }

    let stats = user_stats(&tracker, &bank, user_id);
    println!(
        "DRILL STATS overall {}/{} ({}%)",
        stats.overall.correct, stats.overall.total, stats.overall.percentage
    );

    match verify_chain(&ledger_path) {
        Ok(events) => println!("DRILL LEDGER_CHAIN PASS {} events verified", events),
        Err(e) => {
            println!("DRILL LEDGER_CHAIN FAIL {}", e);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn parse_fraction(s: &str) -> Option<(i64, i64)> {
    let (num, den) = s.split_once('/')?;
    Some((num.parse().ok()?, den.parse().ok()?))
}
