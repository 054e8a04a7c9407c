use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

use super::model::QuestionDraft;
use super::store::QuestionBank;

pub const SEED_BANK_VERSION: &str = "honors_algebra_2_v1";

#[derive(Debug, Deserialize)]
struct SeedCourse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SeedCategory {
    name: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct SeedBank {
    bank_version: String,
    courses: Vec<SeedCourse>,
    categories: Vec<SeedCategory>,
    questions: Vec<QuestionDraft>,
}

/// Load the embedded Honors Algebra 2 bank (1 course, 7 categories,
/// 40 questions). Courses and categories are registered before the questions
/// so their ids stay in authoring order.
pub fn seed_bank() -> CoreResult<QuestionBank> {
    let json = include_str!("seed_bank.json");
    let seed: SeedBank = serde_json::from_str(json)?;
    if seed.bank_version != SEED_BANK_VERSION {
        return Err(CoreError::BankValidation(format!(
            "embedded bank is not {}",
            SEED_BANK_VERSION
        )));
    }

    let mut bank = QuestionBank::new();
    for course in &seed.courses {
        bank.ensure_course(&course.name);
    }
    for category in &seed.categories {
        bank.ensure_category(&category.name, &category.description);
    }
    for draft in seed.questions {
        bank.add_question(draft)?;
    }
    Ok(bank)
}
