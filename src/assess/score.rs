#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Point aggregation: turns a list of evaluated answers into a grade
//! summary.

use serde::{Deserialize, Serialize};

use super::{
    error::GradingError,
    evaluate::{Adjudication, EvaluatedAnswer},
    submission::StudentSubmission,
};

/// Identity and context fields carried from the submission into the
/// summary, for the report header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryHeader {
    /// The student's name.
    pub student_name:    String,
    /// Assessment date, if extracted.
    pub date:            Option<String>,
    /// Assessment identifier, if extracted.
    pub assessment_name: Option<String>,
    /// Assessment subject, if extracted.
    pub subject:         Option<String>,
    /// Assessment section, if extracted.
    pub section:         Option<String>,
}

impl From<&StudentSubmission> for SummaryHeader {
    fn from(submission: &StudentSubmission) -> Self {
        Self {
            student_name:    submission.student_name.clone(),
            date:            submission.date.clone(),
            assessment_name: submission.name.clone(),
            subject:         submission.subject.clone(),
            section:         submission.section.clone(),
        }
    }
}

/// The grade breakdown for one submission. Produced once, immutable,
/// consumed by the report formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSummary {
    /// Report header fields.
    pub header: SummaryHeader,
    /// `(question_number, point_value)` pairs for fully-credited answers, in
    /// evaluation order.
    pub correct: Vec<(u32, u32)>,
    /// `(question_number, floor(value / 2))` pairs for partially-credited
    /// answers. The displayed amount uses `floor`; the awarded amount added
    /// to the running total uses `ceil`. For odd values the two differ by
    /// one, and the true awarded amount is only reconstructable as
    /// `value - withheld`.
    pub partially_correct: Vec<(u32, u32)>,
    /// `(question_number, points_withheld)` pairs parallel to
    /// `partially_correct`, where `withheld = value - ceil(value / 2)`.
    pub partially_correct_diffs: Vec<(u32, u32)>,
    /// `(question_number, point_value)` pairs for zero-credit answers,
    /// including answers the oracle could not judge.
    pub incorrect: Vec<(u32, u32)>,
    /// Points awarded across all answers.
    pub total_points_earned: u32,
    /// Sum of every evaluated answer's value, regardless of category.
    pub total_points_possible: u32,
    /// `earned / possible * 100`.
    pub grade_percentage: f64,
    /// Free-text performance overview; populated by the summarizer step,
    /// never by aggregation.
    pub performance_overview: Option<String>,
}

/// The credit category an evaluated answer falls into.
enum Category {
    /// Full credit: exact match or oracle-correct.
    Full,
    /// Half credit with the floor/ceil split.
    Partial,
    /// Zero credit: judged incorrect, or the oracle result was unavailable.
    Zero,
}

/// Classifies one evaluated answer. Priority order: exact match, then
/// oracle-correct, then partial credit, then zero.
fn category(answer: &EvaluatedAnswer) -> Category {
    if answer.answer_match {
        return Category::Full;
    }
    match &answer.adjudication {
        Adjudication::Judged(verdict) if verdict.correct => Category::Full,
        Adjudication::Judged(verdict) if verdict.partial_credit => Category::Partial,
        _ => Category::Zero,
    }
}

/// Points actually awarded for one evaluated answer under the
/// partial-credit policy.
pub fn points_awarded(answer: &EvaluatedAnswer) -> u32 {
    match category(answer) {
        Category::Full => answer.value,
        Category::Partial => answer.value.div_ceil(2),
        Category::Zero => 0,
    }
}

/// Aggregates evaluated answers into a grade summary.
///
/// A deterministic pure fold: re-aggregating the same list always yields an
/// identical summary, even though the upstream oracle is not deterministic.
/// Signals [`GradingError::DegenerateAssessment`] when the answers are worth
/// zero points in total rather than dividing by zero.
pub fn aggregate(
    header: SummaryHeader,
    answers: &[EvaluatedAnswer],
) -> Result<GradeSummary, GradingError> {
    let total_points_possible: u32 = answers.iter().map(|answer| answer.value).sum();
    if total_points_possible == 0 {
        return Err(GradingError::DegenerateAssessment);
    }

    let mut correct = Vec::new();
    let mut partially_correct = Vec::new();
    let mut partially_correct_diffs = Vec::new();
    let mut incorrect = Vec::new();
    let mut total_points_earned: u32 = 0;

    for answer in answers {
        match category(answer) {
            Category::Full => {
                total_points_earned += answer.value;
                correct.push((answer.number, answer.value));
            }
            Category::Partial => {
                let awarded = answer.value.div_ceil(2);
                let withheld = answer.value - awarded;
                total_points_earned += awarded;
                partially_correct.push((answer.number, answer.value / 2));
                partially_correct_diffs.push((answer.number, withheld));
            }
            Category::Zero => {
                incorrect.push((answer.number, answer.value));
            }
        }
    }

    let grade_percentage =
        f64::from(total_points_earned) / f64::from(total_points_possible) * 100.0;

    Ok(GradeSummary {
        header,
        correct,
        partially_correct,
        partially_correct_diffs,
        incorrect,
        total_points_earned,
        total_points_possible,
        grade_percentage,
        performance_overview: None,
    })
}
