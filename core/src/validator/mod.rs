pub mod checklist;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::answer::normalize;
use crate::bank::QuestionBank;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_id: String,
    pub severity: String,
    pub result: String, // PASS|FAIL
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub checklist_version: String,
    pub overall: String, // PASS|FAIL
    pub checks: Vec<CheckResult>,
}

impl ValidationSummary {
    pub fn result_for_check(&self, check_id: &str) -> (String, String) {
        for c in &self.checks {
            if c.check_id == check_id {
                return (c.result.clone(), c.message.clone());
            }
        }
        (
            "FAIL".to_string(),
            format!("missing check result for {}", check_id),
        )
    }
}

/// Integrity checklist over a question bank: the invariants an author-facing
/// panel must not break (dangling references, non-canonical comparison
/// forms, duplicate numbering).
pub struct BankValidator {
    checklist: checklist::Checklist,
}

impl BankValidator {
    pub fn new_v1() -> Self {
        let checklist = checklist::checklist_v1();
        Self { checklist }
    }

    pub fn validate(&self, bank: &QuestionBank) -> ValidationSummary {
        let checks_out = vec![
            check_course_refs(bank),
            check_category_refs(bank),
            check_answer_nonempty(bank),
            check_normalized_canonical(bank),
            check_question_number_unique(bank),
            check_alternatives_canonical(bank),
        ];

        let overall = if checks_out
            .iter()
            .any(|c| c.severity == "BLOCKER" && c.result != "PASS")
        {
            "FAIL"
        } else {
            "PASS"
        };

        ValidationSummary {
            checklist_version: self.checklist.checklist_version.clone(),
            overall: overall.to_string(),
            checks: checks_out,
        }
    }
}

fn check_course_refs(bank: &QuestionBank) -> CheckResult {
    let mut dangling = Vec::new();
    for q in bank.questions() {
        if bank.course(q.course_id).is_none() {
            dangling.push(q.question_number.to_string());
        }
    }
    if dangling.is_empty() {
        pass("CHK.BANK.COURSE_REFS")
    } else {
        fail(
            "CHK.BANK.COURSE_REFS",
            "BLOCKER",
            format!("questions with unknown course: {}", dangling.join(", ")),
        )
    }
}

fn check_category_refs(bank: &QuestionBank) -> CheckResult {
    let mut dangling = Vec::new();
    for q in bank.questions() {
        if bank.category(q.category_id).is_none() {
            dangling.push(q.question_number.to_string());
        }
    }
    if dangling.is_empty() {
        pass("CHK.BANK.CATEGORY_REFS")
    } else {
        fail(
            "CHK.BANK.CATEGORY_REFS",
            "BLOCKER",
            format!("questions with unknown category: {}", dangling.join(", ")),
        )
    }
}

fn check_answer_nonempty(bank: &QuestionBank) -> CheckResult {
    // An empty comparison form would make the degenerate empty submission
    // gradeable as correct.
    let mut empty = Vec::new();
    for q in bank.questions() {
        if normalize(&q.normalized_answer).is_empty() {
            empty.push(q.question_number.to_string());
        }
    }
    if empty.is_empty() {
        pass("CHK.BANK.ANSWER_NONEMPTY")
    } else {
        fail(
            "CHK.BANK.ANSWER_NONEMPTY",
            "BLOCKER",
            format!("questions with empty normalized answer: {}", empty.join(", ")),
        )
    }
}

fn check_normalized_canonical(bank: &QuestionBank) -> CheckResult {
    let mut drifted = Vec::new();
    for q in bank.questions() {
        if normalize(&q.normalized_answer) != q.normalized_answer {
            drifted.push(q.question_number.to_string());
        }
    }
    if drifted.is_empty() {
        pass("CHK.BANK.NORMALIZED_CANONICAL")
    } else {
        fail(
            "CHK.BANK.NORMALIZED_CANONICAL",
            "BLOCKER",
            format!(
                "questions whose normalized answer is not canonical: {}",
                drifted.join(", ")
            ),
        )
    }
}

fn check_question_number_unique(bank: &QuestionBank) -> CheckResult {
    let mut seen: BTreeSet<(u32, u32)> = BTreeSet::new();
    let mut dupes = Vec::new();
    for q in bank.questions() {
        if !seen.insert((q.course_id, q.question_number)) {
            dupes.push(q.question_number.to_string());
        }
    }
    if dupes.is_empty() {
        pass("CHK.BANK.QUESTION_NUMBER_UNIQUE")
    } else {
        fail(
            "CHK.BANK.QUESTION_NUMBER_UNIQUE",
            "BLOCKER",
            format!("duplicate question numbers: {}", dupes.join(", ")),
        )
    }
}

fn check_alternatives_canonical(bank: &QuestionBank) -> CheckResult {
    let mut offending = Vec::new();
    for q in bank.questions() {
        for alt in &q.alternatives {
            if normalize(alt) != *alt || *alt == q.normalized_answer {
                offending.push(format!("{}:{}", q.question_number, alt));
            }
        }
    }
    if offending.is_empty() {
        CheckResult {
            check_id: "CHK.BANK.ALTERNATIVES_CANONICAL".to_string(),
            severity: "MAJOR".to_string(),
            result: "PASS".to_string(),
            message: "ok".to_string(),
        }
    } else {
        fail(
            "CHK.BANK.ALTERNATIVES_CANONICAL",
            "MAJOR",
            format!("non-canonical or redundant alternatives: {}", offending.join(", ")),
        )
    }
}

fn pass(check_id: &str) -> CheckResult {
    CheckResult {
        check_id: check_id.to_string(),
        severity: "BLOCKER".to_string(),
        result: "PASS".to_string(),
        message: "ok".to_string(),
    }
}

fn fail(check_id: &str, severity: &str, msg: String) -> CheckResult {
    CheckResult {
        check_id: check_id.to_string(),
        severity: severity.to_string(),
        result: "FAIL".to_string(),
        message: msg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::seed::seed_bank;
    use crate::bank::QuestionDraft;

    #[test]
    fn seed_bank_passes_the_checklist() {
        let bank = seed_bank().unwrap();
        let summary = BankValidator::new_v1().validate(&bank);
        assert_eq!(summary.overall, "PASS");
        assert_eq!(summary.checklist_version, "bank_checklist_v1");
    }

    #[test]
    fn non_canonical_normalized_answer_fails() {
        let mut bank = QuestionBank::new();
        bank.add_question(QuestionDraft {
            course: "Algebra".to_string(),
            category: "inequalities".to_string(),
            question_number: 1,
            question_text: "solve".to_string(),
            answer: "m ≥ 1".to_string(),
            // Stored with whitespace and a unicode symbol, so not a fixed point.
            normalized_answer: Some("m ≥ 1".to_string()),
            alternatives: Vec::new(),
        })
        .unwrap();
        let summary = BankValidator::new_v1().validate(&bank);
        assert_eq!(summary.overall, "FAIL");
        let (result, _) = summary.result_for_check("CHK.BANK.NORMALIZED_CANONICAL");
        assert_eq!(result, "FAIL");
    }

    #[test]
    fn duplicate_question_numbers_fail() {
        let mut bank = QuestionBank::new();
        for _ in 0..2 {
            bank.add_question(QuestionDraft {
                course: "Algebra".to_string(),
                category: "fractions".to_string(),
                question_number: 1,
                question_text: "add".to_string(),
                answer: "2/3".to_string(),
                normalized_answer: Some("2/3".to_string()),
                alternatives: Vec::new(),
            })
            .unwrap();
        }
        let summary = BankValidator::new_v1().validate(&bank);
        let (result, _) = summary.result_for_check("CHK.BANK.QUESTION_NUMBER_UNIQUE");
        assert_eq!(result, "FAIL");
        assert_eq!(summary.overall, "FAIL");
    }

    #[test]
    fn redundant_alternative_is_major_not_blocker() {
        let mut bank = QuestionBank::new();
        bank.add_question(QuestionDraft {
            course: "Algebra".to_string(),
            category: "fractions".to_string(),
            question_number: 1,
            question_text: "add".to_string(),
            answer: "2/3".to_string(),
            normalized_answer: Some("2/3".to_string()),
            alternatives: vec!["2/3".to_string()],
        })
        .unwrap();
        let summary = BankValidator::new_v1().validate(&bank);
        let (result, _) = summary.result_for_check("CHK.BANK.ALTERNATIVES_CANONICAL");
        assert_eq!(result, "FAIL");
        // MAJOR findings do not flip the overall result.
        assert_eq!(summary.overall, "PASS");
    }
}
