#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The static answer key: per-assessment questions with accepted answers and
//! point values.
//!
//! The on-disk format is a single JSON file covering every assessment,
//! keyed by lowercase assessment name:
//!
//! ```json
//! {
//!   "quiz 1": {
//!     "questions": {
//!       "1": { "answer": ["42"], "value": 10, "question_text": "..." }
//!     }
//!   }
//! }
//! ```
//!
//! The loosely-typed wire shape is validated into explicit records here, at
//! the boundary, so the scoring logic never does ad hoc field lookups.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::error::GradingError;

/// Wire shape of one answer-key question entry.
#[derive(Deserialize)]
struct QuestionWire {
    /// Accepted literal answer strings.
    answer:        Vec<String>,
    /// Point value of the question.
    value:         u32,
    /// Reference question text, used only as oracle context.
    #[serde(default)]
    question_text: String,
}

/// Wire shape of one assessment's key.
#[derive(Deserialize)]
struct AssessmentWire {
    /// Questions keyed by stringified question number.
    questions: HashMap<String, QuestionWire>,
}

/// A single answer-key entry: the reference answer set and point value for
/// one question. Immutable for the duration of a grading run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Question number; unique within an assessment and the join key against
    /// the submission.
    pub number:           u32,
    /// Non-empty set of acceptable literal answers. Matching is exact and
    /// case-sensitive, trimmed only at the ends.
    pub accepted_answers: Vec<String>,
    /// Non-negative point weight.
    pub value:            u32,
    /// Reference question text, used only as oracle context.
    pub text:             String,
}

/// The answer key for one assessment.
#[derive(Debug, Clone)]
pub struct AnswerKey {
    /// Lowercase assessment name.
    name:      String,
    /// Questions ordered by number.
    questions: BTreeMap<u32, Question>,
}

impl AnswerKey {
    /// Returns the assessment name (lowercased).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a question by number.
    pub fn question(&self, number: u32) -> Option<&Question> {
        self.questions.get(&number)
    }

    /// Iterates over questions in ascending number order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.values()
    }

    /// Number of questions in the key.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the key has no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Validates one assessment's wire entries into typed records.
    fn from_wire(name: String, wire: AssessmentWire) -> Result<Self, GradingError> {
        let mut questions = BTreeMap::new();
        for (raw_number, entry) in wire.questions {
            let number = raw_number.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(
                || GradingError::InvalidQuestionNumber {
                    raw:        raw_number.clone(),
                    assessment: name.clone(),
                },
            )?;
            if entry.answer.is_empty() {
                return Err(GradingError::EmptyAnswerSet {
                    number,
                    assessment: name.clone(),
                });
            }
            questions.insert(number, Question {
                number,
                accepted_answers: entry.answer,
                value: entry.value,
                text: entry.question_text,
            });
        }
        Ok(Self { name, questions })
    }
}

/// The full multi-assessment answer key catalog, loaded once from static
/// configuration.
#[derive(Debug, Clone)]
pub struct AnswerKeyFile {
    /// Assessments keyed by lowercase name.
    assessments: HashMap<String, AnswerKey>,
}

impl AnswerKeyFile {
    /// Parses and validates the catalog from its JSON wire format.
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: HashMap<String, AssessmentWire> =
            serde_json::from_str(json).context("Could not parse the answer key file as JSON")?;

        let mut assessments = HashMap::with_capacity(wire.len());
        for (name, entry) in wire {
            let name = name.to_lowercase();
            let key = AnswerKey::from_wire(name.clone(), entry)?;
            assessments.insert(name, key);
        }
        Ok(Self { assessments })
    }

    /// Loads the catalog from a file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read answer key file: {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Looks up an assessment's key by name, case-insensitively.
    pub fn assessment(&self, name: &str) -> Option<&AnswerKey> {
        self.assessments.get(&name.to_lowercase())
    }

    /// Number of assessments in the catalog.
    pub fn len(&self) -> usize {
        self.assessments.len()
    }

    /// Whether the catalog holds no assessments.
    pub fn is_empty(&self) -> bool {
        self.assessments.is_empty()
    }
}
