use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::time::whole_seconds_between;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("a test needs at least one question")]
    EmptyTest,

    #[error("attempted ({attempted}) exceeds total ({total})")]
    AttemptedExceedsTotal { attempted: u32, total: u32 },

    #[error("score ({score}) exceeds attempted ({attempted})")]
    ScoreExceedsAttempted { score: u32, attempted: u32 },
}

/// Final tally for a finished test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestSummary {
    score: u32,
    total: u32,
    attempted: u32,
    percentage: f64,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl TestSummary {
    /// Build a summary from the final counts of a test.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` if `completed_at` is before `started_at`,
    /// and the count variants when the counts cannot belong to one test.
    pub fn new(
        score: u32,
        total: u32,
        attempted: u32,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SummaryError> {
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }
        if total == 0 {
            return Err(SummaryError::EmptyTest);
        }
        if attempted > total {
            return Err(SummaryError::AttemptedExceedsTotal { attempted, total });
        }
        if score > attempted {
            return Err(SummaryError::ScoreExceedsAttempted { score, attempted });
        }

        Ok(Self {
            score,
            total,
            attempted,
            percentage: percentage(score, total),
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    /// Number of questions left without an answer.
    #[must_use]
    pub fn unattempted(&self) -> u32 {
        self.total - self.attempted
    }

    /// Score as a percentage of the total, rounded to two decimals.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Percentage rendered with exactly two decimals, e.g. `"33.33"`.
    #[must_use]
    pub fn percentage_label(&self) -> String {
        format!("{:.2}", self.percentage)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Whole seconds between start and completion.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        whole_seconds_between(self.started_at, self.completed_at)
    }
}

fn percentage(score: u32, total: u32) -> f64 {
    let raw = f64::from(score) * 100.0 / f64::from(total);
    (raw * 100.0).round() / 100.0
}
