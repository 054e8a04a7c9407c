use rand::seq::SliceRandom;
use rand::Rng;

use crate::answer::normalize;
use crate::error::{CoreError, CoreResult};

use super::model::{Category, CategoryId, Course, CourseId, Question, QuestionDraft, QuestionId};

/// Listing filter mirroring the question-listing semantics of the study API:
/// optional course, optional category-name set, optional result cap, and
/// either question-number order or a shuffle.
#[derive(Debug, Clone, Default)]
pub struct QuestionQuery {
    pub course: Option<String>,
    pub categories: Option<Vec<String>>,
    pub count: Option<usize>,
    pub shuffle: bool,
}

/// In-memory store for courses, categories, and questions.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    courses: Vec<Course>,
    categories: Vec<Category>,
    questions: Vec<Question>,
    next_course_id: CourseId,
    next_category_id: CategoryId,
    next_question_id: QuestionId,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self {
            courses: Vec::new(),
            categories: Vec::new(),
            questions: Vec::new(),
            next_course_id: 1,
            next_category_id: 1,
            next_question_id: 1,
        }
    }

    /// Return the course id for `name`, inserting the course if unseen.
    pub fn ensure_course(&mut self, name: &str) -> CourseId {
        if let Some(c) = self.courses.iter().find(|c| c.name == name) {
            return c.id;
        }
        let id = self.next_course_id;
        self.next_course_id += 1;
        self.courses.push(Course {
            id,
            name: name.to_string(),
        });
        id
    }

    /// Return the category id for `name`, inserting it (with `description`)
    /// if unseen. An existing category keeps its original description.
    pub fn ensure_category(&mut self, name: &str, description: &str) -> CategoryId {
        if let Some(c) = self.categories.iter().find(|c| c.name == name) {
            return c.id;
        }
        let id = self.next_category_id;
        self.next_category_id += 1;
        self.categories.push(Category {
            id,
            name: name.to_string(),
            description: description.to_string(),
        });
        id
    }

    /// Insert a question from a draft. The referenced course and category are
    /// created on demand; a missing normalized answer is derived from the
    /// display answer; alternatives are normalized and deduplicated.
    pub fn add_question(&mut self, draft: QuestionDraft) -> CoreResult<QuestionId> {
        if draft.answer.trim().is_empty() {
            return Err(CoreError::InvalidInput(format!(
                "question {} has an empty answer",
                draft.question_number
            )));
        }
        let course_id = self.ensure_course(&draft.course);
        let category_id = self.ensure_category(&draft.category, "");

        let normalized_answer = match draft.normalized_answer {
            Some(n) if !n.trim().is_empty() => n,
            _ => normalize(&draft.answer),
        };

        let mut alternatives: Vec<String> = Vec::new();
        for alt in &draft.alternatives {
            let n = normalize(alt);
            if !n.is_empty() && !alternatives.contains(&n) {
                alternatives.push(n);
            }
        }

        let id = self.next_question_id;
        self.next_question_id += 1;
        self.questions.push(Question {
            id,
            course_id,
            category_id,
            question_text: draft.question_text,
            answer: draft.answer,
            normalized_answer,
            question_number: draft.question_number,
            alternatives,
        });
        Ok(id)
    }

    pub fn question(&self, id: QuestionId) -> CoreResult<&Question> {
        self.questions
            .iter()
            .find(|q| q.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("question {}", id)))
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn course_by_name(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.name == name)
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// All courses, ordered by name.
    pub fn courses(&self) -> Vec<&Course> {
        let mut out: Vec<&Course> = self.courses.iter().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// All categories, in id order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Categories that have at least one question in the named course.
    pub fn categories_for_course(&self, course_name: &str) -> Vec<&Category> {
        let Some(course) = self.course_by_name(course_name) else {
            return Vec::new();
        };
        self.categories
            .iter()
            .filter(|cat| {
                self.questions
                    .iter()
                    .any(|q| q.course_id == course.id && q.category_id == cat.id)
            })
            .collect()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Add an alternative accepted answer to a question. The raw form is
    /// normalized first; returns false when the normalized form is already
    /// present (or empty).
    pub fn add_alternative(&mut self, id: QuestionId, raw: &str) -> CoreResult<bool> {
        let n = normalize(raw);
        let q = self
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("question {}", id)))?;
        if n.is_empty() || q.alternatives.contains(&n) {
            return Ok(false);
        }
        q.alternatives.push(n);
        Ok(true)
    }

    /// Remove an alternative by raw or normalized form; returns whether one
    /// was removed.
    pub fn remove_alternative(&mut self, id: QuestionId, raw: &str) -> CoreResult<bool> {
        let n = normalize(raw);
        let q = self
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("question {}", id)))?;
        let before = q.alternatives.len();
        q.alternatives.retain(|a| a != &n);
        Ok(q.alternatives.len() != before)
    }

    /// Run a listing query with the thread-local RNG for shuffles.
    pub fn select(&self, query: &QuestionQuery) -> Vec<&Question> {
        self.select_with_rng(query, &mut rand::thread_rng())
    }

    /// Run a listing query with a caller-supplied RNG (seedable in tests).
    pub fn select_with_rng<R: Rng + ?Sized>(
        &self,
        query: &QuestionQuery,
        rng: &mut R,
    ) -> Vec<&Question> {
        let mut out: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| match &query.course {
                Some(name) => self
                    .course(q.course_id)
                    .map(|c| c.name == *name)
                    .unwrap_or(false),
                None => true,
            })
            .filter(|q| match &query.categories {
                Some(names) => self
                    .category(q.category_id)
                    .map(|c| names.iter().any(|n| n == &c.name))
                    .unwrap_or(false),
                None => true,
            })
            .collect();

        if query.shuffle {
            out.shuffle(rng);
        } else {
            out.sort_by_key(|q| q.question_number);
        }

        if let Some(count) = query.count {
            out.truncate(count);
        }
        out
    }
}
