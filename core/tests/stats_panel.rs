use drill_core::bank::seed::seed_bank;
use drill_core::progress::{user_stats, ProgressTracker};

#[test]
fn stats_cover_only_completed_records() {
    let bank = seed_bank().unwrap();
    let mut tracker = ProgressTracker::new();

    // Questions 1-2 (fractions) correct, question 10 (graphing) failed out,
    // question 11 (substitution) still open.
    tracker.record_outcome(1, 1, true, 1, 3);
    tracker.record_outcome(1, 2, true, 2, 3);
    tracker.record_outcome(1, 10, false, 3, 3);
    tracker.record_outcome(1, 11, false, 1, 3);

    let stats = user_stats(&tracker, &bank, 1);

    assert_eq!(stats.overall.total, 3);
    assert_eq!(stats.overall.correct, 2);
    assert_eq!(stats.overall.percentage, 66.67);

    assert_eq!(stats.by_course.len(), 1);
    assert_eq!(stats.by_course[0].course_name, "Honors Algebra 2");
    assert_eq!(stats.by_course[0].total, 3);

    // Sorted by category name: fractions before graphing.
    assert_eq!(stats.by_category.len(), 2);
    assert_eq!(stats.by_category[0].category_name, "fractions");
    assert_eq!(stats.by_category[0].correct, 2);
    assert_eq!(stats.by_category[0].percentage, 100.0);
    assert_eq!(stats.by_category[1].category_name, "graphing");
    assert_eq!(stats.by_category[1].percentage, 0.0);
}

#[test]
fn multi_attempt_drilldown_orders_by_difficulty() {
    let bank = seed_bank().unwrap();
    let mut tracker = ProgressTracker::new();

    tracker.record_outcome(1, 1, true, 1, 3); // single attempt, excluded
    tracker.record_outcome(1, 2, true, 2, 3); // fractions
    tracker.record_outcome(1, 10, false, 3, 3); // graphing
    tracker.record_outcome(1, 9, true, 3, 3); // graphing

    let stats = user_stats(&tracker, &bank, 1);

    let ids: Vec<u32> = stats
        .multi_attempt
        .questions
        .iter()
        .map(|q| q.question_id)
        .collect();
    assert_eq!(ids, vec![9, 10, 2]);

    assert_eq!(stats.multi_attempt.categories.len(), 2);
    assert_eq!(stats.multi_attempt.categories[0].category_name, "graphing");
    assert_eq!(stats.multi_attempt.categories[0].avg_attempts, 3.0);
    assert_eq!(stats.multi_attempt.categories[0].question_count, 2);
    assert_eq!(stats.multi_attempt.categories[1].category_name, "fractions");
    assert_eq!(stats.multi_attempt.categories[1].avg_attempts, 2.0);
}

#[test]
fn an_empty_history_yields_zeroed_stats() {
    let bank = seed_bank().unwrap();
    let tracker = ProgressTracker::new();
    let stats = user_stats(&tracker, &bank, 42);
    assert_eq!(stats.overall.total, 0);
    assert_eq!(stats.overall.percentage, 0.0);
    assert!(stats.by_course.is_empty());
    assert!(stats.multi_attempt.questions.is_empty());
}
