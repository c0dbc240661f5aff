use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-question tracking label shown in the navigation grid.
///
/// The label is independent from whether an answer is recorded; only
/// `Answered` implies one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionStatus {
    #[default]
    NotVisited,
    Current,
    Answered,
    Skipped,
}

impl QuestionStatus {
    /// Stable identifier, usable as a CSS class or grid key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionStatus::NotVisited => "notVisited",
            QuestionStatus::Current => "current",
            QuestionStatus::Answered => "answered",
            QuestionStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
