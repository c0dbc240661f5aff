//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::filter::FilterError;
use quiz_core::model::SummaryError;

/// Errors emitted by test sessions.
///
/// A rejected operation never changes session state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("no test in progress")]
    NotActive,
    #[error("test already finished")]
    Finished,
    #[error("question {index} is out of range for {len} questions")]
    OutOfRange { index: usize, len: usize },
    #[error("option {choice} is out of range for {options} options")]
    InvalidChoice { choice: usize, options: usize },
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}
