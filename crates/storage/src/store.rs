//! The loaded question pool and its menu queries.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use quiz_core::filter::{self, FilterError, Selection, compare_set_names};
use quiz_core::model::{Question, QuestionDraft, QuestionId};
use tracing::{debug, info, warn};

use crate::record::{PayloadError, decode_record, payload_items};
use crate::source::QuestionSource;

/// Why part of a load was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadWarningKind {
    /// The source could not be fetched.
    Unreachable(String),
    /// The payload was not valid JSON.
    InvalidJson(String),
    /// The payload was valid JSON but not an array.
    NotAnArray,
    /// A single record was malformed; the rest of the source was kept.
    InvalidRecord { position: usize, reason: String },
}

/// Non-fatal problem encountered while loading a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub source: String,
    pub kind: LoadWarningKind,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LoadWarningKind::Unreachable(reason) => {
                write!(f, "{}: unreachable ({reason})", self.source)
            }
            LoadWarningKind::InvalidJson(reason) => {
                write!(f, "{}: invalid json ({reason})", self.source)
            }
            LoadWarningKind::NotAnArray => write!(f, "{}: payload is not an array", self.source),
            LoadWarningKind::InvalidRecord { position, reason } => {
                write!(f, "{}: record {position} skipped ({reason})", self.source)
            }
        }
    }
}

/// Flattened pool of questions from every source that loaded.
#[derive(Debug, Clone, Default)]
pub struct QuestionStore {
    questions: Vec<Arc<Question>>,
    warnings: Vec<LoadWarning>,
}

impl QuestionStore {
    /// Fetch every source concurrently and merge the results in source order.
    ///
    /// Failures are recorded as warnings and never abort the load; the worst
    /// case is an empty store.
    pub async fn load(sources: &[Arc<dyn QuestionSource>]) -> Self {
        let fetches = sources.iter().map(|source| async move {
            let result = source.fetch().await;
            (source.name().to_string(), result)
        });
        let settled = join_all(fetches).await;

        let mut store = Self::default();
        for (name, result) in settled {
            match result {
                Ok(body) => store.ingest(&name, &body),
                Err(e) => store.warn(LoadWarning {
                    source: name,
                    kind: LoadWarningKind::Unreachable(e.to_string()),
                }),
            }
        }

        info!(
            total = store.questions.len(),
            sources = sources.len(),
            warnings = store.warnings.len(),
            "question pool loaded"
        );
        store
    }

    /// Build a store from already-decoded drafts. Invalid drafts are skipped.
    #[must_use]
    pub fn from_drafts(source: &str, drafts: impl IntoIterator<Item = QuestionDraft>) -> Self {
        let mut store = Self::default();
        for (position, draft) in drafts.into_iter().enumerate() {
            store.push_draft(source, position, draft);
        }
        store
    }

    fn ingest(&mut self, source: &str, body: &str) {
        let items = match payload_items(body) {
            Ok(items) => items,
            Err(PayloadError::NotAnArray) => {
                return self.warn(LoadWarning {
                    source: source.to_string(),
                    kind: LoadWarningKind::NotAnArray,
                });
            }
            Err(PayloadError::InvalidJson(reason)) => {
                return self.warn(LoadWarning {
                    source: source.to_string(),
                    kind: LoadWarningKind::InvalidJson(reason),
                });
            }
        };

        let before = self.questions.len();
        for (position, item) in items.into_iter().enumerate() {
            match decode_record(item) {
                Ok(draft) => self.push_draft(source, position, draft),
                Err(reason) => self.warn(LoadWarning {
                    source: source.to_string(),
                    kind: LoadWarningKind::InvalidRecord { position, reason },
                }),
            }
        }
        debug!(
            source,
            loaded = self.questions.len() - before,
            "question source ingested"
        );
    }

    fn push_draft(&mut self, source: &str, position: usize, draft: QuestionDraft) {
        let id = QuestionId::new(self.questions.len() as u64);
        match draft.validate(id) {
            Ok(question) => self.questions.push(Arc::new(question)),
            Err(e) => self.warn(LoadWarning {
                source: source.to_string(),
                kind: LoadWarningKind::InvalidRecord {
                    position,
                    reason: e.to_string(),
                },
            }),
        }
    }

    fn warn(&mut self, warning: LoadWarning) {
        warn!(source = %warning.source, "{warning}");
        self.warnings.push(warning);
    }

    #[must_use]
    pub fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Arc<Question>> {
        usize::try_from(id.value())
            .ok()
            .and_then(|i| self.questions.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Problems encountered while loading, in the order they were found.
    #[must_use]
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Distinct set identifiers, numbered sets first in numeric order.
    #[must_use]
    pub fn question_sets(&self) -> Vec<String> {
        let mut sets: Vec<String> = distinct(self.questions.iter().map(|q| q.question_set()))
            .into_iter()
            .collect();
        sets.sort_by(|a, b| compare_set_names(a, b));
        sets
    }

    /// Distinct module names, sorted.
    #[must_use]
    pub fn modules(&self) -> Vec<String> {
        distinct(self.questions.iter().map(|q| q.module()))
            .into_iter()
            .collect()
    }

    /// Distinct chapter names, sorted.
    #[must_use]
    pub fn chapters(&self) -> Vec<String> {
        distinct(self.questions.iter().map(|q| q.chapter()))
            .into_iter()
            .collect()
    }

    /// Resolve a menu selection against this pool.
    ///
    /// # Errors
    ///
    /// Returns `FilterError` when the selection is incomplete or matches nothing.
    pub fn resolve(&self, selection: &Selection) -> Result<Vec<Arc<Question>>, FilterError> {
        filter::resolve(selection, &self.questions)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    values
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;

    fn record(set: &str, module: &str, chapter: &str) -> String {
        format!(
            r#"{{"questionSet":"{set}","module":"{module}","chapter":"{chapter}","question":"?","options":["a","b"],"answerIndex":0}}"#
        )
    }

    fn sources(list: Vec<InMemorySource>) -> Vec<Arc<dyn QuestionSource>> {
        list.into_iter()
            .map(|s| Arc::new(s) as Arc<dyn QuestionSource>)
            .collect()
    }

    #[tokio::test]
    async fn concatenates_sources_in_order() {
        let first = format!("[{},{}]", record("Set-1", "M1", "C1"), record("Set-1", "M1", "C2"));
        let second = format!("[{}]", record("Set-2", "M2", "C1"));
        let store = QuestionStore::load(&sources(vec![
            InMemorySource::new("one", first),
            InMemorySource::new("two", second),
        ]))
        .await;

        assert_eq!(store.len(), 3);
        assert!(store.warnings().is_empty());
        let ids: Vec<u64> = store.questions().iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(store.questions()[2].question_set(), "Set-2");
    }

    #[tokio::test]
    async fn duplicates_are_kept() {
        let body = format!("[{}]", record("Set-1", "M", "C"));
        let store = QuestionStore::load(&sources(vec![
            InMemorySource::new("a", body.clone()),
            InMemorySource::new("b", body),
        ]))
        .await;
        assert_eq!(store.len(), 2);
        assert_eq!(store.question_sets(), vec!["Set-1".to_string()]);
    }

    #[tokio::test]
    async fn unreachable_and_invalid_sources_become_warnings() {
        let store = QuestionStore::load(&sources(vec![
            InMemorySource::unavailable("gone"),
            InMemorySource::new("broken", "{not json"),
            InMemorySource::new("object", r#"{"a":1}"#),
        ]))
        .await;

        assert!(store.is_empty());
        let kinds: Vec<_> = store.warnings().iter().map(|w| w.kind.clone()).collect();
        assert!(matches!(kinds[0], LoadWarningKind::Unreachable(_)));
        assert!(matches!(kinds[1], LoadWarningKind::InvalidJson(_)));
        assert_eq!(kinds[2], LoadWarningKind::NotAnArray);
    }

    #[tokio::test]
    async fn bad_records_are_skipped_individually() {
        let body = format!(
            r#"[{},{{"question":"?","options":["a"],"answerIndex":4}},{{"nope":true}}]"#,
            record("Set-1", "M", "C")
        );
        let store = QuestionStore::load(&sources(vec![InMemorySource::new("mixed", body)])).await;

        assert_eq!(store.len(), 1);
        assert_eq!(store.warnings().len(), 2);
        assert!(matches!(
            store.warnings()[0].kind,
            LoadWarningKind::InvalidRecord { position: 1, .. }
        ));
        assert!(store.warnings()[0].to_string().starts_with("mixed: record 1 skipped"));
    }

    #[tokio::test]
    async fn record_with_both_answer_names_is_kept() {
        let body = r#"[{"question": "Pick b", "options": ["a", "b"], "answerIndex": 1, "answer": 1}]"#;
        let store = QuestionStore::load(&sources(vec![InMemorySource::new("drift", body)])).await;

        assert_eq!(store.len(), 1);
        assert!(store.warnings().is_empty());
        assert!(store.questions()[0].is_correct(1));
    }

    #[tokio::test]
    async fn menus_are_sorted_distinct_and_skip_blanks() {
        let body = format!(
            "[{},{},{},{}]",
            record("Questions-Set-10", "Storage", "Disks"),
            record("Questions-Set-2", "Networks", ""),
            record("Questions-Set-2", "Networks", "Routing"),
            record("", "", "Arrays"),
        );
        let store = QuestionStore::load(&sources(vec![InMemorySource::new("s", body)])).await;

        assert_eq!(store.question_sets(), vec!["Questions-Set-2", "Questions-Set-10"]);
        assert_eq!(store.modules(), vec!["Networks", "Storage"]);
        assert_eq!(store.chapters(), vec!["Arrays", "Disks", "Routing"]);
    }

    #[tokio::test]
    async fn resolve_delegates_to_filter() {
        let body = format!("[{},{}]", record("Set-1", "M1", "C1"), record("Set-2", "M1", "C2"));
        let store = QuestionStore::load(&sources(vec![InMemorySource::new("s", body)])).await;

        assert_eq!(store.resolve(&Selection::by_set("Set-2")).unwrap().len(), 1);
        assert_eq!(
            store.resolve(&Selection::by_set("Set-9")).unwrap_err(),
            FilterError::EmptyResult
        );
    }

    #[test]
    fn get_looks_up_by_position() {
        let store = QuestionStore::from_drafts(
            "inline",
            vec![QuestionDraft {
                question_set: "S".into(),
                module: "M".into(),
                chapter: "C".into(),
                question: "?".into(),
                options: vec!["x".into()],
                answer_index: 0,
                explanation: None,
            }],
        );
        assert!(store.get(QuestionId::new(0)).is_some());
        assert!(store.get(QuestionId::new(1)).is_none());
    }
}
