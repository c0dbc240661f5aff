//! Selection of the question subset a test is drawn from.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Question;

/// User-facing validation failures while resolving a selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FilterError {
    #[error("missing selection")]
    MissingSelection { mode: FilterMode },

    #[error("empty result")]
    EmptyResult,

    #[error("unknown filter mode: {0}")]
    UnknownMode(String),
}

/// Which question field a selection matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    All,
    BySet,
    ByModule,
    ByChapter,
}

impl FilterMode {
    /// Whether this mode needs a value; drives which menu is enabled.
    #[must_use]
    pub fn requires_value(self) -> bool {
        !matches!(self, FilterMode::All)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::BySet => "questionSet",
            FilterMode::ByModule => "module",
            FilterMode::ByChapter => "chapter",
        }
    }

    fn field(self, question: &Question) -> Option<&str> {
        match self {
            FilterMode::All => None,
            FilterMode::BySet => Some(question.question_set()),
            FilterMode::ByModule => Some(question.module()),
            FilterMode::ByChapter => Some(question.chapter()),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(FilterMode::All),
            "questionSet" | "set" => Ok(FilterMode::BySet),
            "module" => Ok(FilterMode::ByModule),
            "chapter" => Ok(FilterMode::ByChapter),
            other => Err(FilterError::UnknownMode(other.to_string())),
        }
    }
}

/// A filter mode plus the menu value picked for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub mode: FilterMode,
    pub value: Option<String>,
}

impl Selection {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn by_set(value: impl Into<String>) -> Self {
        Self::new(FilterMode::BySet, value)
    }

    #[must_use]
    pub fn by_module(value: impl Into<String>) -> Self {
        Self::new(FilterMode::ByModule, value)
    }

    #[must_use]
    pub fn by_chapter(value: impl Into<String>) -> Self {
        Self::new(FilterMode::ByChapter, value)
    }

    #[must_use]
    pub fn new(mode: FilterMode, value: impl Into<String>) -> Self {
        Self {
            mode,
            value: Some(value.into()),
        }
    }
}

/// Resolve a selection against the pool.
///
/// Matching is exact string equality on the selected field.
///
/// # Errors
///
/// Returns `FilterError::MissingSelection` when a field mode has no value, and
/// `FilterError::EmptyResult` when nothing matches.
pub fn resolve(
    selection: &Selection,
    pool: &[Arc<Question>],
) -> Result<Vec<Arc<Question>>, FilterError> {
    let subset: Vec<Arc<Question>> = if selection.mode.requires_value() {
        let wanted = selection
            .value
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or(FilterError::MissingSelection {
                mode: selection.mode,
            })?;
        pool.iter()
            .filter(|q| selection.mode.field(q) == Some(wanted))
            .cloned()
            .collect()
    } else {
        pool.to_vec()
    };

    if subset.is_empty() {
        return Err(FilterError::EmptyResult);
    }
    Ok(subset)
}

/// Menu ordering for set identifiers.
///
/// Values carrying a number (the whole value is an integer, or it contains
/// `Set-<digits>`) sort numerically and come first; the rest follow
/// lexicographically.
#[must_use]
pub fn compare_set_names(a: &str, b: &str) -> Ordering {
    set_sort_key(a).cmp(&set_sort_key(b))
}

fn set_sort_key(name: &str) -> (bool, u64, &str) {
    match set_number(name) {
        Some(n) => (false, n, name),
        None => (true, 0, name),
    }
}

fn set_number(name: &str) -> Option<u64> {
    if let Ok(n) = name.trim().parse::<u64>() {
        return Some(n);
    }
    let (_, rest) = name.split_once("Set-")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}
