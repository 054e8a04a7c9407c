use drill_core::bank::csv::import_bank_csv;
use drill_core::bank::seed::seed_bank;
use drill_core::validator::BankValidator;

fn main() {
    // Validates a question bank CSV given as the first argument, or the
    // embedded seed bank with no arguments. Prints one CHECK line per
    // checklist entry and exits non-zero when the bank fails.
    let bank = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).expect("read bank csv");
            import_bank_csv(&text).expect("parse bank csv")
        }
        None => seed_bank().expect("embedded seed bank"),
    };

    let validator = BankValidator::new_v1();
    let summary = validator.validate(&bank);
    println!(
        "BANK_VALIDATOR overall={} questions={}",
        summary.overall,
        bank.questions().len()
    );
    for c in &summary.checks {
        println!("CHECK {} {} {}", c.check_id, c.result, c.message);
    }

    if summary.overall != "PASS" {
        std::process::exit(1);
    }
}
