use crate::error::CoreResult;

use super::model::QuestionDraft;
use super::store::QuestionBank;

const HEADER: [&str; 8] = [
    "course",
    "category",
    "category_description",
    "question_number",
    "question_text",
    "answer",
    "normalized_answer",
    "alternatives",
];

/// Render a bank as CSV, one row per question, rows sorted by course name
/// then question number. Alternatives are `;`-joined in one column.
pub fn export_bank_csv(bank: &QuestionBank) -> CoreResult<String> {
    let mut rows: Vec<_> = bank.questions().to_vec();
    rows.sort_by(|a, b| {
        let ca = bank.course(a.course_id).map(|c| c.name.as_str()).unwrap_or("");
        let cb = bank.course(b.course_id).map(|c| c.name.as_str()).unwrap_or("");
        ca.cmp(cb).then(a.question_number.cmp(&b.question_number))
    });

    let mut wtr = csv::WriterBuilder::new().from_writer(vec![]);
    wtr.write_record(HEADER)?;
    for q in rows {
        let course = bank.course(q.course_id).map(|c| c.name.clone()).unwrap_or_default();
        let (category, category_description) = bank
            .category(q.category_id)
            .map(|c| (c.name.clone(), c.description.clone()))
            .unwrap_or_default();
        wtr.write_record(&[
            course,
            category,
            category_description,
            q.question_number.to_string(),
            q.question_text.clone(),
            q.answer.clone(),
            q.normalized_answer.clone(),
            q.alternatives.join(";"),
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).replace("\r\n", "\n"))
}

/// Build a bank from CSV in the [`export_bank_csv`] column layout. Unseen
/// courses and categories are registered as rows arrive; a blank normalized
/// answer is derived from the display answer.
pub fn import_bank_csv(csv_text: &str) -> CoreResult<QuestionBank> {
    let mut bank = QuestionBank::new();
    let mut rdr = csv::Reader::from_reader(csv_text.as_bytes());
    for rec in rdr.records() {
        let rec = rec?;
        let course = rec.get(0).unwrap_or("").to_string();
        let category = rec.get(1).unwrap_or("").to_string();
        let category_description = rec.get(2).unwrap_or("").to_string();
        let question_number: u32 = rec.get(3).unwrap_or("0").parse().unwrap_or(0);
        let question_text = rec.get(4).unwrap_or("").to_string();
        let answer = rec.get(5).unwrap_or("").to_string();
        let normalized_answer = rec.get(6).unwrap_or("").to_string();
        let alternatives: Vec<String> = rec
            .get(7)
            .unwrap_or("")
            .split(';')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        bank.ensure_category(&category, &category_description);
        bank.add_question(QuestionDraft {
            course,
            category,
            question_number,
            question_text,
            answer,
            normalized_answer: if normalized_answer.is_empty() {
                None
            } else {
                Some(normalized_answer)
            },
            alternatives,
        })?;
    }
    Ok(bank)
}
