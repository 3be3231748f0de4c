use assessor::assess::{
    GradeSummary, SummaryHeader,
    report::render,
};

fn header() -> SummaryHeader {
    SummaryHeader {
        student_name:    "Ada Lovelace".to_string(),
        date:            Some("2024-10-06".to_string()),
        assessment_name: Some("Quiz 1".to_string()),
        subject:         Some("Intermediate Mathematics".to_string()),
        section:         Some("1.1".to_string()),
    }
}

#[test]
fn report_layout_is_exact() {
    let summary = GradeSummary {
        header: header(),
        correct: vec![(1, 10), (3, 5)],
        partially_correct: vec![(2, 3)],
        partially_correct_diffs: vec![(2, 3)],
        incorrect: vec![(4, 2)],
        total_points_earned: 19,
        total_points_possible: 24,
        grade_percentage: 19.0 / 24.0 * 100.0,
        performance_overview: Some("Great effort overall.".to_string()),
    };

    let expected = "\
Student Name: Ada Lovelace
Date: 2024-10-06
Assessment Subject: Intermediate Mathematics
Assessment Name: Quiz 1

Correct Answers: 1, 3 (15 points)
Partially Correct Answers: 2 (3 points, -3 points)
Incorrect Answers: 4 (-2 points)
Points Subtracted: -5 points
Total Points: 19 points

Great effort overall.
";

    assert_eq!(render(&summary), expected);
}

#[test]
fn missing_header_fields_render_as_unknown() {
    let summary = GradeSummary {
        header: SummaryHeader {
            student_name:    "Charles Babbage".to_string(),
            date:            None,
            assessment_name: None,
            subject:         None,
            section:         None,
        },
        correct: vec![(1, 10)],
        partially_correct: vec![],
        partially_correct_diffs: vec![],
        incorrect: vec![],
        total_points_earned: 10,
        total_points_possible: 10,
        grade_percentage: 100.0,
        performance_overview: Some("Flawless.".to_string()),
    };

    let report = render(&summary);
    assert!(report.contains("Date: Unknown\n"));
    assert!(report.contains("Assessment Subject: Unknown\n"));
    assert!(report.contains("Assessment Name: Unknown\n"));
    assert!(report.contains("Student Name: Charles Babbage\n"));
}

#[test]
fn total_points_reflects_the_awarded_half_not_the_displayed_half() {
    // One question worth 7, partially correct: awarded 4, displayed 3.
    let summary = GradeSummary {
        header: header(),
        correct: vec![],
        partially_correct: vec![(1, 3)],
        partially_correct_diffs: vec![(1, 3)],
        incorrect: vec![],
        total_points_earned: 4,
        total_points_possible: 7,
        grade_percentage: 4.0 / 7.0 * 100.0,
        performance_overview: None,
    };

    let report = render(&summary);
    assert!(report.contains("Partially Correct Answers: 1 (3 points, -3 points)\n"));
    assert!(report.contains("Points Subtracted: -3 points\n"));
    assert!(report.contains("Total Points: 4 points\n"));
}

#[test]
fn empty_categories_render_with_zero_totals() {
    let summary = GradeSummary {
        header: header(),
        correct: vec![],
        partially_correct: vec![],
        partially_correct_diffs: vec![],
        incorrect: vec![(1, 10), (2, 5)],
        total_points_earned: 0,
        total_points_possible: 15,
        grade_percentage: 0.0,
        performance_overview: Some("Needs review.".to_string()),
    };

    let report = render(&summary);
    assert!(report.contains("Correct Answers:  (0 points)\n"));
    assert!(report.contains("Incorrect Answers: 1, 2 (-15 points)\n"));
    assert!(report.contains("Points Subtracted: -15 points\n"));
    assert!(report.contains("Total Points: 0 points\n"));
}

#[test]
fn rendering_is_deterministic() {
    let summary = GradeSummary {
        header: header(),
        correct: vec![(2, 4)],
        partially_correct: vec![(1, 2)],
        partially_correct_diffs: vec![(1, 3)],
        incorrect: vec![(3, 1)],
        total_points_earned: 7,
        total_points_possible: 10,
        grade_percentage: 70.0,
        performance_overview: Some("Mixed results.".to_string()),
    };

    assert_eq!(render(&summary), render(&summary));
}
