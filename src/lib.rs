//! # assessor
//!
//! A grading engine for photographed handwritten assessments. An external
//! multimodal language model extracts a worksheet into structured
//! question/answer data; this crate compares the extracted answers against a
//! static answer key, consults the model again to adjudicate answers that
//! fail exact matching, and produces a deterministic, auditable grade
//! breakdown with a plain-text report.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// The grading engine: data model, evaluation, scoring, and reporting.
pub mod assess;
/// Runtime configuration shared across the crate.
pub mod config;
/// The external language-model oracle boundary.
pub mod oracle;
