#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The grading engine.
//!
//! [`Grader`] drives the whole pipeline for one submission: locate the
//! assessment's answer key, evaluate every answer (consulting the oracle
//! only on exact-match misses), aggregate points under the partial-credit
//! policy, and ask the oracle for a performance overview. The caller renders
//! the result with [`report::render`].

/// Consistency analysis across repeated grading runs.
pub mod consistency;
/// The fault taxonomy for a grading run.
pub mod error;
/// Key/submission joining and oracle delegation.
pub mod evaluate;
/// The static answer key and its wire format.
pub mod key;
/// Report rendering.
pub mod report;
/// Point aggregation and the grade summary.
pub mod score;
/// The extracted student submission and its wire format.
pub mod submission;

use std::sync::Arc;

use bon::Builder;
use futures::{StreamExt, stream};
use tracing::warn;

pub use error::GradingError;
pub use evaluate::{Adjudication, EvaluatedAnswer, MatchEvaluator};
pub use key::{AnswerKey, AnswerKeyFile, Question};
pub use score::{GradeSummary, SummaryHeader};
pub use submission::{StudentAnswer, StudentSubmission};

use crate::oracle::{ImageContent, Oracle};

/// Sentinel stored in place of the performance overview when the oracle
/// could not produce one. Never silently omitted.
pub const OVERVIEW_UNAVAILABLE: &str = "Performance overview unavailable.";

/// Everything produced by grading one submission: the per-answer evaluation
/// trail and the aggregated summary.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedAssessment {
    /// Evaluated answers, in submission order.
    pub answers: Vec<EvaluatedAnswer>,
    /// The aggregated grade summary, overview included.
    pub summary: GradeSummary,
}

impl GradedAssessment {
    /// Renders the plain-text report for this assessment.
    pub fn report(&self) -> String {
        report::render(&self.summary)
    }
}

/// The grading pipeline for one or more submissions against a key catalog.
#[derive(Builder)]
pub struct Grader {
    /// The oracle consulted for non-matching answers and the overview.
    oracle:      Arc<dyn Oracle>,
    /// Maximum number of oracle calls in flight at once.
    #[builder(default = 5)]
    concurrency: usize,
    /// Optional worksheet image attached to adjudication requests.
    image:       Option<ImageContent>,
}

impl Grader {
    /// Grades one submission against the named assessment's key.
    ///
    /// Integrity faults abort with no partial summary. Oracle faults do not:
    /// affected answers score as incorrect and a failed overview request
    /// degrades to [`OVERVIEW_UNAVAILABLE`].
    pub async fn grade(
        &self,
        keys: &AnswerKeyFile,
        assessment: &str,
        submission: &StudentSubmission,
    ) -> Result<GradedAssessment, GradingError> {
        let key = keys
            .assessment(assessment)
            .ok_or_else(|| GradingError::UnknownAssessment(assessment.to_string()))?;

        let mut evaluator = MatchEvaluator::new(Arc::clone(&self.oracle), self.concurrency);
        if let Some(image) = &self.image {
            evaluator = evaluator.with_image(image.clone());
        }

        let answers = evaluator.evaluate(key, submission).await?;
        let mut summary = score::aggregate(SummaryHeader::from(submission), &answers)?;
        summary.performance_overview = Some(self.overview(&answers).await);

        Ok(GradedAssessment { answers, summary })
    }

    /// Grades many submissions concurrently, preserving input order. Each
    /// submission succeeds or fails on its own.
    pub async fn grade_batch(
        &self,
        keys: &AnswerKeyFile,
        assessment: &str,
        submissions: &[StudentSubmission],
    ) -> Vec<Result<GradedAssessment, GradingError>> {
        stream::iter(
            submissions
                .iter()
                .map(|submission| self.grade(keys, assessment, submission)),
        )
        .buffered(self.concurrency.max(1))
        .collect()
        .await
    }

    /// Requests the performance overview from the oracle. Failure never
    /// invalidates the summary already computed.
    async fn overview(&self, answers: &[EvaluatedAnswer]) -> String {
        let explanations = answers
            .iter()
            .filter_map(EvaluatedAnswer::explanation)
            .collect::<Vec<_>>()
            .join("\n");

        match self.oracle.summarize(&explanations).await {
            Ok(overview) => overview,
            Err(e) => {
                warn!(error = %e, "oracle could not summarize performance");
                OVERVIEW_UNAVAILABLE.to_string()
            }
        }
    }
}
