#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The external language-model oracle boundary.
//!
//! The oracle is consulted only for answers that fail exact literal matching
//! against the answer key, and once more per submission to produce a
//! free-text performance overview. It is network-bound and empirically
//! non-deterministic: repeated calls with identical input may return
//! different verdicts, so nothing in this crate assumes idempotence across
//! calls.

/// OpenAI-backed oracle implementation.
pub mod openai;

use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

pub use openai::OpenAiOracle;

/// An error at the oracle boundary. Both variants are recoverable per item:
/// the affected answer degrades to "incorrect" while the fault itself is
/// preserved for observability.
#[derive(thiserror::Error, Debug)]
pub enum OracleError {
    /// The oracle could not be reached, or did not answer in time.
    #[error("the oracle could not be reached: {0}")]
    Unavailable(String),
    /// The oracle answered, but the response was not usable: invalid
    /// structured data, or the required `correct` field was missing.
    #[error("the oracle returned a malformed response: {reason}")]
    MalformedResponse {
        /// Why the response could not be used.
        reason: String,
        /// The raw response content, kept for diagnosis.
        raw:    String,
    },
}

/// The oracle's judgment for a single non-matching answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the oracle judged the student's answer correct despite the
    /// exact-match miss.
    pub correct:        bool,
    /// Whether the answer deserves partial credit. Only meaningful when
    /// `correct` is false.
    pub partial_credit: bool,
    /// Free-text rationale. Never parsed; fed into the performance overview.
    pub explanation:    Option<String>,
}

/// Opaque image content supplied by the acquisition collaborator: the raw
/// bytes are already base64-encoded, and `source` identifies where the image
/// came from.
#[derive(Debug, Clone)]
pub struct ImageContent {
    /// Identifier for the image's origin (path, URL, or object key).
    source:     String,
    /// MIME type of the encoded image.
    media_type: String,
    /// Base64-encoded image bytes.
    base64:     String,
}

impl ImageContent {
    /// Wraps already-encoded image content.
    pub fn from_base64(
        source: impl Into<String>,
        media_type: impl Into<String>,
        base64: impl Into<String>,
    ) -> Self {
        Self {
            source:     source.into(),
            media_type: media_type.into(),
            base64:     base64.into(),
        }
    }

    /// Encodes raw image bytes.
    pub fn from_bytes(
        source: impl Into<String>,
        media_type: impl Into<String>,
        bytes: &[u8],
    ) -> Self {
        Self {
            source:     source.into(),
            media_type: media_type.into(),
            base64:     base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Returns the source identifier.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Renders the image as a `data:` URL suitable for a chat content part.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64)
    }
}

/// Everything the oracle needs to adjudicate one answer.
#[derive(Debug, Clone, Copy)]
pub struct AdjudicationRequest<'a> {
    /// Reference question text from the answer key.
    pub question_text:    &'a str,
    /// The full accepted-answer set for the question.
    pub accepted_answers: &'a [String],
    /// The student's raw answer as extracted.
    pub student_answer:   &'a str,
    /// Optional worksheet image attached for additional context.
    pub image:            Option<&'a ImageContent>,
}

/// The oracle seam. Production code talks to the network; tests inject
/// deterministic implementations. Each call is a pure function of its own
/// inputs with no shared mutable state, so independent calls may run
/// concurrently.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Judges whether a non-matching student answer is correct, deserves
    /// partial credit, or is wrong, with a free-text rationale.
    async fn adjudicate(&self, request: &AdjudicationRequest<'_>) -> Result<Verdict, OracleError>;

    /// Produces a short free-text overview of the student's performance from
    /// the newline-joined per-question explanations.
    async fn summarize(&self, explanations: &str) -> Result<String, OracleError>;
}
