#![forbid(unsafe_code)]

pub mod record;
pub mod source;
pub mod store;

pub use source::{FileSource, HttpSource, InMemorySource, QuestionSource, SourceError};
pub use store::{LoadWarning, LoadWarningKind, QuestionStore};
