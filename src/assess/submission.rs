#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The normalized extraction of a student's worksheet, as produced by the
//! (external) multimodal extraction collaborator.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::error::GradingError;

/// One answered question as extracted from the worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAnswer {
    /// Question number; must match exactly one entry in the answer key.
    pub number:         u32,
    /// Question text as the extractor read it. May diverge from the key's
    /// text and is not authoritative.
    #[serde(default)]
    pub text:           Option<String>,
    /// The student's raw answer, possibly with surrounding whitespace.
    pub student_answer: String,
}

/// Wire shape of a submission, before validation.
#[derive(Deserialize)]
struct SubmissionWire {
    /// Student name; required.
    student_name: Option<String>,
    /// Assessment date as extracted.
    #[serde(default)]
    date:         Option<String>,
    /// Assessment identifier, e.g. "Quiz 1".
    #[serde(default)]
    name:         Option<String>,
    /// Assessment subject.
    #[serde(default)]
    subject:      Option<String>,
    /// Assessment section.
    #[serde(default)]
    section:      Option<String>,
    /// Ordered answered questions.
    #[serde(default)]
    questions:    Vec<StudentAnswer>,
}

/// A student's submission for one assessment: identity plus the ordered
/// list of answered questions. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSubmission {
    /// The student's name.
    pub student_name: String,
    /// Assessment date as extracted, if present.
    pub date:         Option<String>,
    /// Assessment identifier, if present; used to find the answer key.
    pub name:         Option<String>,
    /// Assessment subject, if present.
    pub subject:      Option<String>,
    /// Assessment section, if present.
    pub section:      Option<String>,
    /// Answered questions, in worksheet order.
    pub questions:    Vec<StudentAnswer>,
}

impl StudentSubmission {
    /// Parses and validates a submission from its JSON wire format.
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: SubmissionWire =
            serde_json::from_str(json).context("Could not parse the submission as JSON")?;

        let student_name = wire
            .student_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(GradingError::MissingStudentName)?;

        Ok(Self {
            student_name,
            date: wire.date,
            name: wire.name,
            subject: wire.subject,
            section: wire.section,
            questions: wire.questions,
        })
    }

    /// Loads a submission from a file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read submission file: {}", path.display()))?;
        Self::from_json(&json)
    }
}
