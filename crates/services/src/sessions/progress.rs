use quiz_core::model::QuestionStatus;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub skipped: usize,
    pub not_visited: usize,
    /// Questions without a recorded answer.
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    pub(crate) fn from_statuses(
        statuses: &[QuestionStatus],
        attempted: usize,
        is_complete: bool,
    ) -> Self {
        let count = |wanted: QuestionStatus| statuses.iter().filter(|s| **s == wanted).count();
        Self {
            total: statuses.len(),
            answered: count(QuestionStatus::Answered),
            skipped: count(QuestionStatus::Skipped),
            not_visited: count(QuestionStatus::NotVisited),
            remaining: statuses.len().saturating_sub(attempted),
            is_complete,
        }
    }
}
