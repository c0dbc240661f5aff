mod ids;
mod question;
mod status;
mod summary;

pub use ids::QuestionId;

pub use question::{Question, QuestionDraft, QuestionError};
pub use status::QuestionStatus;
pub use summary::{SummaryError, TestSummary};
