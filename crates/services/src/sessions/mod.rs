mod progress;
mod service;
mod timer;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{AnswerOutcome, QUESTIONS_PER_TEST, SessionPhase, SessionService, SkipOutcome};
pub use timer::{TICK_PERIOD, Timer, TimerTicker};
pub use view::{GridCell, OptionView, QuestionView, ReviewItem, SessionView, option_label, review_items};
pub use workflow::{QuizRunner, SelectionMenus, SessionEvent, SessionObserver};
