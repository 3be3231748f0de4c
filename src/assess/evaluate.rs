#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Joins the answer key and the submission, short-circuits exact matches,
//! and delegates everything else to the oracle.

use std::{collections::HashSet, sync::Arc};

use futures::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{
    error::GradingError,
    key::{AnswerKey, Question},
    submission::{StudentAnswer, StudentSubmission},
};
use crate::oracle::{AdjudicationRequest, ImageContent, Oracle, Verdict};

/// How a non-exact answer was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjudication {
    /// The trimmed answer was in the accepted set; the oracle was never
    /// consulted.
    ExactMatch,
    /// The oracle returned a verdict.
    Judged(Verdict),
    /// The oracle could not judge the answer (transport fault, timeout, or
    /// malformed response). Scores as incorrect, but remains distinguishable
    /// from a genuine "incorrect" verdict.
    Unavailable(String),
}

/// One student answer joined with its key entry and resolved. Created once
/// per answer and read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedAnswer {
    /// Question number, copied from the key.
    pub number:       u32,
    /// Point value, copied from the key.
    pub value:        u32,
    /// True iff the trimmed answer was in the accepted set. Exact and
    /// case-sensitive: answer keys may rely on precise notation, e.g. `<`
    /// versus `<=`.
    pub answer_match: bool,
    /// The oracle's involvement, if any.
    pub adjudication: Adjudication,
}

impl EvaluatedAnswer {
    /// The oracle's free-text rationale, when one exists.
    pub fn explanation(&self) -> Option<&str> {
        match &self.adjudication {
            Adjudication::Judged(verdict) => verdict.explanation.as_deref(),
            _ => None,
        }
    }
}

/// Evaluates submissions against an answer key, consulting the injected
/// oracle for answers that fail exact matching.
pub struct MatchEvaluator {
    /// The oracle consulted for non-matching answers.
    oracle:      Arc<dyn Oracle>,
    /// Maximum number of oracle calls in flight at once.
    concurrency: usize,
    /// Optional worksheet image attached to every adjudication request.
    image:       Option<ImageContent>,
}

impl MatchEvaluator {
    /// Creates an evaluator with the given oracle and concurrency limit.
    pub fn new(oracle: Arc<dyn Oracle>, concurrency: usize) -> Self {
        Self {
            oracle,
            concurrency: concurrency.max(1),
            image: None,
        }
    }

    /// Attaches a worksheet image to every adjudication request.
    pub fn with_image(mut self, image: ImageContent) -> Self {
        self.image = Some(image);
        self
    }

    /// Evaluates every answered question in the submission.
    ///
    /// Integrity faults (a question number missing from the key, or the same
    /// number answered twice) abort the run with no partial results. Oracle
    /// faults do not: the affected answer is marked
    /// [`Adjudication::Unavailable`] and evaluation continues.
    ///
    /// The output preserves the submission's question order.
    pub async fn evaluate(
        &self,
        key: &AnswerKey,
        submission: &StudentSubmission,
    ) -> Result<Vec<EvaluatedAnswer>, GradingError> {
        let mut seen = HashSet::new();
        let mut joined = Vec::with_capacity(submission.questions.len());

        for answer in &submission.questions {
            let question =
                key.question(answer.number)
                    .ok_or_else(|| GradingError::UnknownQuestion {
                        number:     answer.number,
                        assessment: key.name().to_string(),
                    })?;
            if !seen.insert(answer.number) {
                return Err(GradingError::DuplicateQuestion {
                    number: answer.number,
                });
            }

            let matched = question
                .accepted_answers
                .iter()
                .any(|accepted| accepted == answer.student_answer.trim());
            joined.push((question, answer, matched));
        }

        // Exact matches resolve immediately; misses go through a bounded,
        // order-preserving stream of oracle calls. Each call is independent,
        // so one failure never blocks or corrupts its siblings.
        let evaluated = stream::iter(
            joined
                .into_iter()
                .map(|(question, answer, matched)| self.resolve(question, answer, matched)),
        )
        .buffered(self.concurrency)
        .collect::<Vec<_>>()
        .await;

        Ok(evaluated)
    }

    /// Resolves a single joined answer, consulting the oracle on a miss.
    async fn resolve(
        &self,
        question: &Question,
        answer: &StudentAnswer,
        matched: bool,
    ) -> EvaluatedAnswer {
        let adjudication = if matched {
            Adjudication::ExactMatch
        } else {
            let request = AdjudicationRequest {
                question_text:    &question.text,
                accepted_answers: &question.accepted_answers,
                student_answer:   &answer.student_answer,
                image:            self.image.as_ref(),
            };
            match self.oracle.adjudicate(&request).await {
                Ok(verdict) => Adjudication::Judged(verdict),
                Err(e) => {
                    warn!(question = question.number, error = %e, "oracle could not judge answer");
                    Adjudication::Unavailable(e.to_string())
                }
            }
        };

        EvaluatedAnswer {
            number: question.number,
            value: question.value,
            answer_match: matched,
            adjudication,
        }
    }
}
