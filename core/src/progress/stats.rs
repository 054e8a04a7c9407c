use std::collections::BTreeMap;

use serde::Serialize;

use crate::admin::UserId;
use crate::bank::{CategoryId, CourseId, QuestionBank, QuestionId};

use super::tracker::ProgressTracker;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OverallStats {
    pub correct: u32,
    pub total: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CourseStats {
    pub course_id: CourseId,
    pub course_name: String,
    pub correct: u32,
    pub total: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryStats {
    pub category_id: CategoryId,
    pub category_name: String,
    pub correct: u32,
    pub total: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MultiAttemptQuestion {
    pub question_id: QuestionId,
    pub attempts: u32,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MultiAttemptCategory {
    pub category_id: CategoryId,
    pub category_name: String,
    pub avg_attempts: f64,
    pub question_count: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MultiAttemptStats {
    pub questions: Vec<MultiAttemptQuestion>,
    pub categories: Vec<MultiAttemptCategory>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserStats {
    pub overall: OverallStats,
    pub by_course: Vec<CourseStats>,
    pub by_category: Vec<CategoryStats>,
    pub multi_attempt: MultiAttemptStats,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn percentage(correct: u32, total: u32) -> f64 {
    if total > 0 {
        round2(correct as f64 / total as f64 * 100.0)
    } else {
        0.0
    }
}

/// Aggregate a user's **completed** records into the statistics panel shape:
/// overall counts, per-course and per-category breakdowns (sorted by name),
/// and the multi-attempt drilldown (completed records that took more than
/// one attempt). Records whose question is no longer in the bank are skipped.
pub fn user_stats(tracker: &ProgressTracker, bank: &QuestionBank, user_id: UserId) -> UserStats {
    let completed: Vec<_> = tracker
        .for_user(user_id)
        .into_iter()
        .filter(|r| r.completed_at.is_some())
        .filter_map(|r| bank.question(r.question_id).ok().map(|q| (r, q)))
        .collect();

    let total = completed.len() as u32;
    let correct = completed.iter().filter(|(r, _)| r.is_correct).count() as u32;

    let mut course_counts: BTreeMap<CourseId, (u32, u32)> = BTreeMap::new();
    let mut category_counts: BTreeMap<CategoryId, (u32, u32)> = BTreeMap::new();
    for (r, q) in &completed {
        let c = course_counts.entry(q.course_id).or_insert((0, 0));
        c.1 += 1;
        if r.is_correct {
            c.0 += 1;
        }
        let c = category_counts.entry(q.category_id).or_insert((0, 0));
        c.1 += 1;
        if r.is_correct {
            c.0 += 1;
        }
    }

    let mut by_course: Vec<CourseStats> = course_counts
        .into_iter()
        .filter_map(|(id, (correct, total))| {
            bank.course(id).map(|c| CourseStats {
                course_id: id,
                course_name: c.name.clone(),
                correct,
                total,
                percentage: percentage(correct, total),
            })
        })
        .collect();
    by_course.sort_by(|a, b| a.course_name.cmp(&b.course_name));

    let mut by_category: Vec<CategoryStats> = category_counts
        .into_iter()
        .filter_map(|(id, (correct, total))| {
            bank.category(id).map(|c| CategoryStats {
                category_id: id,
                category_name: c.name.clone(),
                correct,
                total,
                percentage: percentage(correct, total),
            })
        })
        .collect();
    by_category.sort_by(|a, b| a.category_name.cmp(&b.category_name));

    // Multi-attempt drilldown: completed records that took more than one try.
    let mut questions: Vec<MultiAttemptQuestion> = completed
        .iter()
        .filter(|(r, _)| r.attempts > 1)
        .map(|(r, _)| MultiAttemptQuestion {
            question_id: r.question_id,
            attempts: r.attempts,
            is_correct: r.is_correct,
        })
        .collect();
    questions.sort_by(|a, b| b.attempts.cmp(&a.attempts).then(a.question_id.cmp(&b.question_id)));

    let mut category_attempts: BTreeMap<CategoryId, (u32, u32)> = BTreeMap::new();
    for (r, q) in &completed {
        if r.attempts > 1 {
            let c = category_attempts.entry(q.category_id).or_insert((0, 0));
            c.0 += r.attempts;
            c.1 += 1;
        }
    }
    let mut categories: Vec<MultiAttemptCategory> = category_attempts
        .into_iter()
        .filter_map(|(id, (attempt_sum, count))| {
            bank.category(id).map(|c| MultiAttemptCategory {
                category_id: id,
                category_name: c.name.clone(),
                avg_attempts: round2(attempt_sum as f64 / count as f64),
                question_count: count,
            })
        })
        .collect();
    categories.sort_by(|a, b| {
        b.avg_attempts
            .partial_cmp(&a.avg_attempts)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.category_name.cmp(&b.category_name))
    });

    UserStats {
        overall: OverallStats {
            correct,
            total,
            percentage: percentage(correct, total),
        },
        by_course,
        by_category,
        multi_attempt: MultiAttemptStats {
            questions,
            categories,
        },
    }
}
