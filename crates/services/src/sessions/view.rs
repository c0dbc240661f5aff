use serde::Serialize;
use std::sync::Arc;

use quiz_core::model::{Question, QuestionId, QuestionStatus, TestSummary};

use super::service::{SessionPhase, SessionService};

/// Presentation-agnostic snapshot of a session.
///
/// This is intentionally **not** markup: the adapter decides how to lay out
/// the question, options and grid. Re-read it after every command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: SessionPhase,
    /// 1-based position of the current question.
    pub number: usize,
    pub total: usize,
    pub question: Option<QuestionView>,
    pub grid: Vec<GridCell>,
    pub score: u32,
    /// Elapsed time as `MM:SS`.
    pub elapsed: String,
    pub summary: Option<TestSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub question_set: String,
    pub module: String,
    pub chapter: String,
    pub text: String,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub label: String,
    pub text: String,
    pub selected: bool,
}

/// One button of the navigation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub number: usize,
    pub status: QuestionStatus,
    /// The session currently points at this question.
    pub is_pointer: bool,
}

/// Per-question outcome shown after a test is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub number: usize,
    pub question: Arc<Question>,
    pub chosen: Option<usize>,
    pub is_correct: bool,
}

impl ReviewItem {
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.question.explanation()
    }
}

impl SessionView {
    #[must_use]
    pub fn from_session(session: &SessionService) -> Self {
        let phase = session.phase();
        let index = session.current_index();

        // the finished screen only shows the tally
        let question = match phase {
            SessionPhase::Active => session
                .current_question()
                .map(|q| QuestionView::new(q, session.current_answer())),
            SessionPhase::Idle | SessionPhase::Finished => None,
        };
        let grid = match phase {
            SessionPhase::Active => session
                .statuses()
                .iter()
                .enumerate()
                .map(|(i, status)| GridCell {
                    number: i + 1,
                    status: *status,
                    is_pointer: i == index,
                })
                .collect(),
            SessionPhase::Idle | SessionPhase::Finished => Vec::new(),
        };

        Self {
            phase,
            number: if session.total() == 0 { 0 } else { index + 1 },
            total: session.total(),
            question,
            grid,
            score: session.score(),
            elapsed: session.timer().label(),
            summary: session.summary().cloned(),
        }
    }

    /// Header line such as `Q3 / 50`.
    #[must_use]
    pub fn position_label(&self) -> String {
        format!("Q{} / {}", self.number, self.total)
    }
}

impl QuestionView {
    fn new(question: &Question, selected: Option<usize>) -> Self {
        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(i, text)| OptionView {
                label: option_label(i),
                text: text.clone(),
                selected: selected == Some(i),
            })
            .collect();

        Self {
            id: question.id(),
            question_set: question.question_set().to_string(),
            module: question.module().to_string(),
            chapter: question.chapter().to_string(),
            text: question.text().to_string(),
            options,
        }
    }

    /// Metadata line such as `Set: X | Module: Y | Chapter: Z`.
    #[must_use]
    pub fn meta_label(&self) -> String {
        format!(
            "Set: {} | Module: {} | Chapter: {}",
            self.question_set, self.module, self.chapter
        )
    }
}

/// Letter label for an option position: `A`, `B`, … then numbers past `Z`.
#[must_use]
pub fn option_label(position: usize) -> String {
    match u8::try_from(position) {
        Ok(offset) if offset < 26 => char::from(b'A' + offset).to_string(),
        _ => (position + 1).to_string(),
    }
}

/// Per-question review of a finished test; empty before finishing.
#[must_use]
pub fn review_items(session: &SessionService) -> Vec<ReviewItem> {
    if !session.is_finished() {
        return Vec::new();
    }
    session
        .questions()
        .iter()
        .zip(session.answers())
        .enumerate()
        .map(|(i, (question, chosen))| ReviewItem {
            number: i + 1,
            question: Arc::clone(question),
            chosen: *chosen,
            is_correct: chosen.is_some_and(|c| question.is_correct(c)),
        })
        .collect()
}
