#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use config::{QuizConfig, SourceLocation};
pub use error::SessionError;

pub use sessions::{
    AnswerOutcome, QuizRunner, SelectionMenus, SessionEvent, SessionObserver, SessionPhase,
    SessionService, SessionView, SkipOutcome,
};
