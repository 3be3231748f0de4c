#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Renders a grade summary into the fixed-layout text report.

use itertools::Itertools;

use super::score::GradeSummary;

/// Joins the question numbers of a category list with commas, preserving
/// insertion order.
fn numbers(pairs: &[(u32, u32)]) -> String {
    pairs.iter().map(|(number, _)| number).join(", ")
}

/// Sums the point column of a category list.
fn points(pairs: &[(u32, u32)]) -> i64 {
    pairs.iter().map(|(_, value)| i64::from(*value)).sum()
}

/// Renders the report. A deterministic pure function of the summary.
///
/// Withheld and incorrect totals are displayed negated, so the
/// `Points Subtracted` line is their (non-positive) sum. `Total Points` is
/// the awarded total, which for odd-valued partial-credit questions is one
/// more than the partial bucket displays.
pub fn render(summary: &GradeSummary) -> String {
    let header = &summary.header;
    let unknown = || "Unknown".to_string();

    let correct_points = points(&summary.correct);
    let partial_points = points(&summary.partially_correct);
    let withheld = points(&summary.partially_correct_diffs);
    let incorrect_points = -points(&summary.incorrect);

    format!(
        "Student Name: {student_name}\n\
         Date: {date}\n\
         Assessment Subject: {subject}\n\
         Assessment Name: {name}\n\
         \n\
         Correct Answers: {correct_numbers} ({correct_points} points)\n\
         Partially Correct Answers: {partial_numbers} ({partial_points} points, {neg_withheld} points)\n\
         Incorrect Answers: {incorrect_numbers} ({incorrect_points} points)\n\
         Points Subtracted: {subtracted} points\n\
         Total Points: {earned} points\n\
         \n\
         {overview}\n",
        student_name = header.student_name,
        date = header.date.clone().unwrap_or_else(unknown),
        subject = header.subject.clone().unwrap_or_else(unknown),
        name = header.assessment_name.clone().unwrap_or_else(unknown),
        correct_numbers = numbers(&summary.correct),
        partial_numbers = numbers(&summary.partially_correct),
        incorrect_numbers = numbers(&summary.incorrect),
        neg_withheld = -withheld,
        subtracted = incorrect_points - withheld,
        earned = summary.total_points_earned,
        overview = summary.performance_overview.as_deref().unwrap_or(""),
    )
}
