use serde::Serialize;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question fields, as decoded from a question source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub question_set: String,
    pub module: String,
    pub chapter: String,
    pub question: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    pub explanation: Option<String>,
}

impl QuestionDraft {
    /// Check the draft and assign its pool position.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::AnswerOutOfRange` if `answer_index` does not
    /// point at one of the options.
    pub fn validate(self, id: QuestionId) -> Result<Question, QuestionError> {
        if self.answer_index >= self.options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                index: self.answer_index,
                len: self.options.len(),
            });
        }

        let explanation = self
            .explanation
            .filter(|text| !text.trim().is_empty());

        Ok(Question {
            id,
            question_set: self.question_set,
            module: self.module,
            chapter: self.chapter,
            question: self.question,
            options: self.options,
            answer_index: self.answer_index,
            explanation,
        })
    }
}

/// A loaded multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    question_set: String,
    module: String,
    chapter: String,
    question: String,
    options: Vec<String>,
    answer_index: usize,
    explanation: Option<String>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn question_set(&self) -> &str {
        &self.question_set
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn chapter(&self) -> &str {
        &self.chapter
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn answer_index(&self) -> usize {
        self.answer_index
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Returns true when `choice` is the correct option.
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer_index
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("answer index {index} is out of range for {len} options")]
    AnswerOutOfRange { index: usize, len: usize },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(answer_index: usize) -> QuestionDraft {
        QuestionDraft {
            question_set: "Questions-Set-1".into(),
            module: "Module 1".into(),
            chapter: "Chapter 1".into(),
            question: "2 + 2 = ?".into(),
            options: vec!["3".into(), "4".into(), "5".into()],
            answer_index,
            explanation: None,
        }
    }

    #[test]
    fn valid_draft_assigns_id() {
        let question = draft(1).validate(QuestionId::new(7)).unwrap();

        assert_eq!(question.id(), QuestionId::new(7));
        assert_eq!(question.option_count(), 3);
        assert!(question.is_correct(1));
        assert!(!question.is_correct(0));
    }

    #[test]
    fn answer_index_must_point_at_an_option() {
        let err = draft(3).validate(QuestionId::new(0)).unwrap_err();
        assert_eq!(err, QuestionError::AnswerOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn draft_without_options_is_rejected() {
        let mut empty = draft(0);
        empty.options.clear();
        assert!(empty.validate(QuestionId::new(0)).is_err());
    }

    #[test]
    fn blank_explanation_is_dropped() {
        let mut with_blank = draft(0);
        with_blank.explanation = Some("   ".into());
        let question = with_blank.validate(QuestionId::new(0)).unwrap();
        assert_eq!(question.explanation(), None);
    }
}
