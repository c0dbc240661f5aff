//! Wire shape of question-bank payloads.

use quiz_core::model::QuestionDraft;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// One question as it appears in a source payload.
///
/// Older banks call the correct option `answer`. Both names are accepted and
/// `answerIndex` wins when a record carries the two.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    #[serde(default)]
    pub question_set: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub chapter: String,
    pub question: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub answer_index: Option<usize>,
    #[serde(default)]
    pub answer: Option<usize>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuestionRecord {
    /// Normalize into a draft.
    ///
    /// # Errors
    ///
    /// Returns `MissingAnswer` when neither answer field is present.
    pub fn into_draft(self) -> Result<QuestionDraft, MissingAnswer> {
        let answer_index = self.answer_index.or(self.answer).ok_or(MissingAnswer)?;
        Ok(QuestionDraft {
            question_set: self.question_set,
            module: self.module,
            chapter: self.chapter,
            question: self.question,
            options: self.options,
            answer_index,
            explanation: self.explanation,
        })
    }
}

/// A record names no correct option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing field `answerIndex`")]
pub struct MissingAnswer;

/// Why a payload could not be used at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PayloadError {
    InvalidJson(String),
    NotAnArray,
}

/// Split a payload into its array items.
pub(crate) fn payload_items(body: &str) -> Result<Vec<Value>, PayloadError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(_) => Err(PayloadError::NotAnArray),
        Err(e) => Err(PayloadError::InvalidJson(e.to_string())),
    }
}

/// Decode one array item.
pub(crate) fn decode_record(item: Value) -> Result<QuestionDraft, String> {
    let record = serde_json::from_value::<QuestionRecord>(item).map_err(|e| e.to_string())?;
    record.into_draft().map_err(|e| e.to_string())
}
