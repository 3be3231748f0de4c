#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Consistency analysis across repeated grading runs.
//!
//! The oracle is non-deterministic, so grading the same submission twice can
//! yield different results. This module quantifies that drift: aggregate
//! grade statistics across runs, plus a per-question breakdown of every
//! question whose awarded points varied.

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use super::{GradedAssessment, score::points_awarded};

/// Summary statistics over the final grade percentages of all runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeStatistics {
    /// Arithmetic mean.
    pub mean:       f64,
    /// Median.
    pub median:     f64,
    /// Sample standard deviation; zero for a single run.
    pub std_dev:    f64,
    /// Lowest grade observed.
    pub min:        f64,
    /// Highest grade observed.
    pub max:        f64,
    /// Every grade, in run order.
    pub all_grades: Vec<f64>,
}

/// How often one particular awarded score occurred for a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreShare {
    /// Number of runs that awarded this score.
    pub count:      usize,
    /// Share of all runs, as a percentage.
    pub percentage: f64,
}

/// Score distribution for a question that was not graded identically in
/// every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionConsistency {
    /// The question's point value.
    pub max_points:         u32,
    /// Observed awarded scores and how often each occurred.
    pub score_distribution: BTreeMap<u32, ScoreShare>,
}

/// The full consistency analysis over a batch of runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyAnalysis {
    /// Statistics over the final grades.
    pub grade_statistics:       GradeStatistics,
    /// Number of runs analyzed.
    pub total_runs:             usize,
    /// Number of distinct final grades observed.
    pub unique_final_grades:    usize,
    /// Spread between the best and worst final grade.
    pub grade_range:            f64,
    /// True when every run produced the same final grade.
    pub is_consistent:          bool,
    /// Questions whose awarded points varied across runs, keyed by number.
    pub inconsistent_questions: BTreeMap<u32, QuestionConsistency>,
}

/// Analyzes repeated grading runs of the same submission.
pub fn analyze(runs: &[GradedAssessment]) -> Result<ConsistencyAnalysis> {
    if runs.is_empty() {
        bail!("consistency analysis requires at least one grading run");
    }

    let grades: Vec<f64> = runs
        .iter()
        .map(|run| run.summary.grade_percentage)
        .collect();

    // Per-question awarded points, observed across runs.
    let mut question_scores: BTreeMap<u32, (u32, BTreeMap<u32, usize>)> = BTreeMap::new();
    for run in runs {
        for answer in &run.answers {
            let entry = question_scores
                .entry(answer.number)
                .or_insert_with(|| (answer.value, BTreeMap::new()));
            *entry.1.entry(points_awarded(answer)).or_insert(0) += 1;
        }
    }

    let total_runs = runs.len();
    let inconsistent_questions = question_scores
        .into_iter()
        .filter(|(_, (_, distribution))| distribution.len() > 1)
        .map(|(number, (max_points, distribution))| {
            let score_distribution = distribution
                .into_iter()
                .map(|(score, count)| {
                    (score, ScoreShare {
                        count,
                        percentage: count as f64 / total_runs as f64 * 100.0,
                    })
                })
                .collect();
            (number, QuestionConsistency {
                max_points,
                score_distribution,
            })
        })
        .collect();

    let mut unique = grades.to_vec();
    unique.sort_by(|a, b| a.partial_cmp(b).expect("grades are finite"));
    unique.dedup();

    let min = unique.first().copied().unwrap_or(0.0);
    let max = unique.last().copied().unwrap_or(0.0);

    Ok(ConsistencyAnalysis {
        grade_statistics: GradeStatistics {
            mean: mean(&grades),
            median: median(&grades),
            std_dev: sample_std_dev(&grades),
            min,
            max,
            all_grades: grades,
        },
        total_runs,
        unique_final_grades: unique.len(),
        grade_range: max - min,
        is_consistent: unique.len() == 1,
        inconsistent_questions,
    })
}

/// Arithmetic mean of a non-empty slice.
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of a non-empty slice.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("grades are finite"));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation; zero when fewer than two values.
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

impl Display for ConsistencyAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Consistency Analysis:")?;
        writeln!(f, "Number of runs: {}", self.total_runs)?;
        writeln!(f, "Grade Statistics:")?;
        writeln!(f, "  Mean: {:.2}", self.grade_statistics.mean)?;
        writeln!(f, "  Median: {:.2}", self.grade_statistics.median)?;
        writeln!(f, "  Standard Deviation: {:.2}", self.grade_statistics.std_dev)?;
        writeln!(
            f,
            "  Range: {:.2} - {:.2}",
            self.grade_statistics.min, self.grade_statistics.max
        )?;

        if self.inconsistent_questions.is_empty() {
            write!(f, "\nAll questions were graded consistently across runs.")?;
        } else {
            write!(f, "\nInconsistent Questions:")?;
            for (number, details) in &self.inconsistent_questions {
                write!(f, "\n\n  Question {} (max points: {}):", number, details.max_points)?;
                for (score, share) in &details.score_distribution {
                    write!(
                        f,
                        "\n    {}/{} points: {} times ({:.1}% of runs)",
                        score, details.max_points, share.count, share.percentage
                    )?;
                }
            }
        }
        Ok(())
    }
}
