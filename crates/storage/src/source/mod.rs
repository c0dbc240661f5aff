use async_trait::async_trait;
use thiserror::Error;

mod file;
mod http;

pub use file::FileSource;
pub use http::HttpSource;

/// Errors surfaced while fetching a single question source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// A named provider of raw question-bank payloads.
///
/// Implementations only fetch bytes; decoding and validation happen in the
/// store so every source is treated the same way.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable name used in logs and load warnings.
    fn name(&self) -> &str;

    /// Fetch the raw payload.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the source cannot be reached or read.
    async fn fetch(&self) -> Result<String, SourceError>;
}

/// Source holding its payload in memory, for fixtures and tests.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    name: String,
    payload: Option<String>,
}

impl InMemorySource {
    #[must_use]
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: Some(payload.into()),
        }
    }

    /// A source that always fails to fetch.
    #[must_use]
    pub fn unavailable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }
}

#[async_trait]
impl QuestionSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        self.payload
            .clone()
            .ok_or_else(|| SourceError::Unavailable(self.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_source_returns_payload() {
        let source = InMemorySource::new("set-1.json", "[]");
        assert_eq!(source.name(), "set-1.json");
        assert_eq!(source.fetch().await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn unavailable_source_fails() {
        let source = InMemorySource::unavailable("gone.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(name) if name == "gone.json"));
    }
}
