#![allow(dead_code)]

//! Shared test support: a deterministic scripted oracle and fixture
//! builders.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use assessor::{
    assess::{AnswerKeyFile, StudentSubmission},
    oracle::{AdjudicationRequest, Oracle, OracleError, Verdict},
};
use async_trait::async_trait;

/// A deterministic oracle for tests: verdicts are scripted per student
/// answer, and every adjudication is counted.
pub struct ScriptedOracle {
    verdicts:     HashMap<String, Verdict>,
    default:      Verdict,
    fail_calls:   bool,
    fail_summary: bool,
    overview:     String,
    calls:        AtomicUsize,
}

impl ScriptedOracle {
    fn with_default(default: Verdict) -> Self {
        Self {
            verdicts: HashMap::new(),
            default,
            fail_calls: false,
            fail_summary: false,
            overview: "Scripted overview.".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every unscripted answer is judged incorrect with no partial credit.
    pub fn incorrect() -> Self {
        Self::with_default(verdict(false, false, "The answer is wrong."))
    }

    /// Every unscripted answer is judged correct.
    pub fn correct() -> Self {
        Self::with_default(verdict(true, false, "The answer is equivalent."))
    }

    /// Every unscripted answer earns partial credit.
    pub fn partial() -> Self {
        Self::with_default(verdict(false, true, "Close, but not exact."))
    }

    /// Every call fails as if the oracle were unreachable.
    pub fn failing() -> Self {
        let mut oracle = Self::incorrect();
        oracle.fail_calls = true;
        oracle.fail_summary = true;
        oracle
    }

    /// Scripts a verdict for one specific student answer.
    pub fn with_verdict(mut self, student_answer: &str, verdict: Verdict) -> Self {
        self.verdicts.insert(student_answer.to_string(), verdict);
        self
    }

    /// Makes only the summary call fail.
    pub fn with_failing_summary(mut self) -> Self {
        self.fail_summary = true;
        self
    }

    /// Number of adjudication calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn adjudicate(&self, request: &AdjudicationRequest<'_>) -> Result<Verdict, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_calls {
            return Err(OracleError::Unavailable("scripted outage".to_string()));
        }
        Ok(self
            .verdicts
            .get(request.student_answer)
            .cloned()
            .unwrap_or_else(|| self.default.clone()))
    }

    async fn summarize(&self, _explanations: &str) -> Result<String, OracleError> {
        if self.fail_summary {
            return Err(OracleError::Unavailable("scripted outage".to_string()));
        }
        Ok(self.overview.clone())
    }
}

/// Builds a verdict.
pub fn verdict(correct: bool, partial_credit: bool, explanation: &str) -> Verdict {
    Verdict {
        correct,
        partial_credit,
        explanation: Some(explanation.to_string()),
    }
}

/// A one-question catalog: "quiz 1", question 1 worth `value` points,
/// accepting exactly "42".
pub fn single_question_key(value: u32) -> AnswerKeyFile {
    let json = format!(
        r#"{{
            "quiz 1": {{
                "questions": {{
                    "1": {{
                        "answer": ["42"],
                        "value": {value},
                        "question_text": "What is six times seven?"
                    }}
                }}
            }}
        }}"#
    );
    AnswerKeyFile::from_json(&json).expect("parse key")
}

/// A submission answering question 1 with the given text.
pub fn submission_with_answer(answer: &str) -> StudentSubmission {
    let json = format!(
        r#"{{
            "student_name": "Ada Lovelace",
            "date": "2024-10-06",
            "name": "Quiz 1",
            "subject": "Intermediate Mathematics",
            "section": "1.1",
            "questions": [
                {{ "number": 1, "text": "What is six times seven?", "student_answer": "{answer}" }}
            ]
        }}"#
    );
    StudentSubmission::from_json(&json).expect("parse submission")
}
