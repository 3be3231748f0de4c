#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The fault taxonomy for a grading run.
//!
//! Every variant here is fatal to the current submission: it indicates a
//! mismatch between the extraction output and the answer key, or a
//! degenerate key, and must not be guessed around. Oracle faults are not
//! represented here; they are recovered per item and carried inside the
//! evaluated answer instead.

/// An integrity or aggregation fault that aborts grading of the current
/// submission.
#[derive(thiserror::Error, Debug)]
pub enum GradingError {
    /// The submission references a question the answer key does not have.
    #[error("question {number} was not found in the answer key for `{assessment}`")]
    UnknownQuestion {
        /// The offending question number.
        number:     u32,
        /// The assessment whose key was searched.
        assessment: String,
    },
    /// The submission answers the same question more than once.
    #[error("question {number} appears more than once in the submission")]
    DuplicateQuestion {
        /// The repeated question number.
        number: u32,
    },
    /// The requested assessment is not present in the answer key file.
    #[error("assessment `{0}` was not found in the answer key file")]
    UnknownAssessment(String),
    /// The extraction produced a submission without a student name.
    #[error("the submission has no student name")]
    MissingStudentName,
    /// A question number in the answer key is not a positive integer.
    #[error("question number `{raw}` in the answer key for `{assessment}` is not a positive integer")]
    InvalidQuestionNumber {
        /// The raw, unparseable key.
        raw:        String,
        /// The assessment the bad entry belongs to.
        assessment: String,
    },
    /// A key entry has no accepted answers to match against.
    #[error("question {number} in the answer key for `{assessment}` has no accepted answers")]
    EmptyAnswerSet {
        /// The question missing its answers.
        number:     u32,
        /// The assessment the bad entry belongs to.
        assessment: String,
    },
    /// Every evaluated answer was worth zero points; the grade percentage is
    /// undefined. This stems from the key, not the submission.
    #[error("the evaluated answers are worth zero points in total; the grade percentage is undefined")]
    DegenerateAssessment,
}
