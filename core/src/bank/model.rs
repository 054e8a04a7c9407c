use serde::{Deserialize, Serialize};

pub type CourseId = u32;
pub type CategoryId = u32;
pub type QuestionId = u32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

/// A question as stored: the display answer may carry typeset markup, the
/// normalized answer is the comparison form persisted alongside it.
/// Alternative answers are held normalized and deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub course_id: CourseId,
    pub category_id: CategoryId,
    pub question_text: String,
    pub answer: String,
    pub normalized_answer: String,
    pub question_number: u32,
    pub alternatives: Vec<String>,
}

/// Author-side input for a new question. Courses and categories are named,
/// not id-referenced, and the normalized answer may be omitted, in which case
/// it is derived from the display answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub course: String,
    pub category: String,
    pub question_number: u32,
    pub question_text: String,
    pub answer: String,
    #[serde(default)]
    pub normalized_answer: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
}
