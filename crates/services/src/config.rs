use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;
use storage::{FileSource, HttpSource, QuestionSource};
use tracing::warn;

use crate::sessions::QUESTIONS_PER_TEST;

/// Question banks loaded when `QUIZ_SOURCES` is not set.
pub const DEFAULT_SOURCES: [&str; 11] = [
    "Questions-Set-1.json",
    "Questions-Set-2.json",
    "Questions-Set-3.json",
    "Questions-Set-4.json",
    "Questions-Set-5.json",
    "Last-Day-Revision-Test-1-Q1-Q50-Questions.json",
    "Last-Day-Revision-Test-1-Q51-Q100-Questions.json",
    "Last-Day-Revision-Test-2-Q1-Q50-Questions.json",
    "Last-Day-Revision-Test-2-Q51-Q100-Questions.json",
    "Last-Day-Revision-Test-3-Q1-Q50-Questions.json",
    "Last-Day-Revision-Test-3-Q51-Q100-Questions.json",
];

/// Where source names are resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceLocation {
    Directory(PathBuf),
    Http { base_url: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    pub sources: Vec<String>,
    pub location: SourceLocation,
    pub questions_per_test: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|s| (*s).to_string()).collect(),
            location: SourceLocation::Directory(PathBuf::from(".")),
            questions_per_test: QUESTIONS_PER_TEST,
        }
    }
}

impl QuizConfig {
    /// Read `QUIZ_SOURCES`, `QUIZ_BASE_URL`, `QUIZ_SOURCE_DIR` and
    /// `QUIZ_QUESTIONS_PER_TEST`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`QuizConfig::from_env`] with an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("QUIZ_SOURCES") {
            let sources: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !sources.is_empty() {
                config.sources = sources;
            }
        }

        let base_url = lookup("QUIZ_BASE_URL").filter(|v| !v.trim().is_empty());
        if let Some(base_url) = base_url {
            config.location = SourceLocation::Http { base_url };
        } else if let Some(dir) = lookup("QUIZ_SOURCE_DIR").filter(|v| !v.trim().is_empty()) {
            config.location = SourceLocation::Directory(PathBuf::from(dir));
        }

        if let Some(raw) = lookup("QUIZ_QUESTIONS_PER_TEST") {
            match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => config.questions_per_test = n,
                _ => warn!(value = %raw, "ignoring invalid QUIZ_QUESTIONS_PER_TEST"),
            }
        }

        config
    }

    /// One source per configured name, in order.
    #[must_use]
    pub fn build_sources(&self) -> Vec<Arc<dyn QuestionSource>> {
        match &self.location {
            SourceLocation::Directory(dir) => self
                .sources
                .iter()
                .map(|name| Arc::new(FileSource::in_dir(dir, name)) as Arc<dyn QuestionSource>)
                .collect(),
            SourceLocation::Http { base_url } => {
                let client = Client::new();
                self.sources
                    .iter()
                    .map(|name| {
                        Arc::new(HttpSource::under(client.clone(), base_url, name))
                            as Arc<dyn QuestionSource>
                    })
                    .collect()
            }
        }
    }
}
