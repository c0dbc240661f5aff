use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use quiz_core::Clock;
use quiz_core::model::{Question, QuestionStatus, TestSummary};

use super::progress::SessionProgress;
use super::timer::Timer;
use crate::error::SessionError;

/// Maximum number of questions drawn into one test.
pub const QUESTIONS_PER_TEST: u32 = 50;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Lifecycle of a test session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SessionPhase {
    #[default]
    Idle,
    Active,
    Finished,
}

/// Result of choosing an option for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub index: usize,
    pub choice: usize,
    pub correct: bool,
    /// Change applied to the running score: -1, 0 or +1.
    pub score_delta: i8,
}

/// Where a skip left the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipOutcome {
    Moved { to: usize },
    Finished(TestSummary),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed multiple-choice test.
///
/// The caller owns the session; every transition takes `&mut self`, so
/// mutations are serialized by ownership. Navigation and answering are only
/// accepted while `Active`.
pub struct SessionService {
    limit: u32,
    phase: SessionPhase,
    questions: Vec<Arc<Question>>,
    index: usize,
    statuses: Vec<QuestionStatus>,
    answers: Vec<Option<usize>>,
    score: u32,
    timer: Timer,
    summary: Option<TestSummary>,
}

impl SessionService {
    /// Create an idle session. `clock` drives the test timer.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            limit: QUESTIONS_PER_TEST,
            phase: SessionPhase::Idle,
            questions: Vec::new(),
            index: 0,
            statuses: Vec::new(),
            answers: Vec::new(),
            score: 0,
            timer: Timer::new(clock),
            summary: None,
        }
    }

    /// Cap the number of questions per test. Zero is treated as one.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Start a new test from `subset`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `subset` is empty; the session is left untouched.
    pub fn start(&mut self, subset: Vec<Arc<Question>>) -> Result<(), SessionError> {
        self.start_with_rng(subset, &mut rand::rng())
    }

    /// Like [`SessionService::start`], drawing the permutation from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `subset` is empty; the session is left untouched.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        mut subset: Vec<Arc<Question>>,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        if subset.is_empty() {
            return Err(SessionError::Empty);
        }

        let pool_size = subset.len();
        subset.as_mut_slice().shuffle(rng);
        subset.truncate(usize::try_from(self.limit).unwrap_or(usize::MAX));

        let len = subset.len();
        self.questions = subset;
        self.index = 0;
        self.statuses = vec![QuestionStatus::NotVisited; len];
        self.statuses[0] = QuestionStatus::Current;
        self.answers = vec![None; len];
        self.score = 0;
        self.summary = None;
        self.phase = SessionPhase::Active;
        self.timer.start();

        debug!(pool_size, questions = len, "test started");
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Active => Ok(()),
            SessionPhase::Idle => Err(SessionError::NotActive),
            SessionPhase::Finished => Err(SessionError::Finished),
        }
    }

    /// Record `choice` for the current question and correct the score.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotActive`/`Finished` outside an active test and
    /// `SessionError::InvalidChoice` if `choice` is not one of the options.
    pub fn select_answer(&mut self, choice: usize) -> Result<AnswerOutcome, SessionError> {
        self.ensure_active()?;
        let question = &self.questions[self.index];
        if choice >= question.option_count() {
            return Err(SessionError::InvalidChoice {
                choice,
                options: question.option_count(),
            });
        }

        let was_correct = self.answers[self.index].is_some_and(|prev| question.is_correct(prev));
        let correct = question.is_correct(choice);
        let score_delta = match (was_correct, correct) {
            (false, true) => {
                self.score += 1;
                1
            }
            (true, false) => {
                self.score = self.score.saturating_sub(1);
                -1
            }
            _ => 0,
        };

        self.answers[self.index] = Some(choice);
        self.statuses[self.index] = QuestionStatus::Answered;

        Ok(AnswerOutcome {
            index: self.index,
            choice,
            correct,
            score_delta,
        })
    }

    /// Point the session at `new_index`.
    ///
    /// The question being left loses `Current`: it becomes `Answered` if it has
    /// an answer and `NotVisited` otherwise. The target becomes `Current` only
    /// if it was `NotVisited`; `Answered` and `Skipped` labels survive a revisit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` for an index past the end, and the
    /// state errors outside an active test. State is unchanged on error.
    pub fn move_to(&mut self, new_index: usize) -> Result<(), SessionError> {
        self.ensure_active()?;
        if new_index >= self.questions.len() {
            return Err(SessionError::OutOfRange {
                index: new_index,
                len: self.questions.len(),
            });
        }

        if self.statuses[self.index] == QuestionStatus::Current {
            self.statuses[self.index] = if self.answers[self.index].is_some() {
                QuestionStatus::Answered
            } else {
                QuestionStatus::NotVisited
            };
        }

        self.index = new_index;
        if self.statuses[new_index] == QuestionStatus::NotVisited {
            self.statuses[new_index] = QuestionStatus::Current;
        }
        Ok(())
    }

    /// Move one question forward. Returns `false` at the last question.
    ///
    /// # Errors
    ///
    /// Returns the state errors outside an active test.
    pub fn next(&mut self) -> Result<bool, SessionError> {
        self.ensure_active()?;
        if self.index + 1 >= self.questions.len() {
            return Ok(false);
        }
        self.move_to(self.index + 1)?;
        Ok(true)
    }

    /// Move one question back. Returns `false` at the first question.
    ///
    /// # Errors
    ///
    /// Returns the state errors outside an active test.
    pub fn previous(&mut self) -> Result<bool, SessionError> {
        self.ensure_active()?;
        if self.index == 0 {
            return Ok(false);
        }
        self.move_to(self.index - 1)?;
        Ok(true)
    }

    /// Mark the current question `Skipped` if unanswered and advance; skipping
    /// the last question finishes the test.
    ///
    /// # Errors
    ///
    /// Returns the state errors outside an active test.
    pub fn skip(&mut self) -> Result<SkipOutcome, SessionError> {
        self.ensure_active()?;
        if self.answers[self.index].is_none() {
            self.statuses[self.index] = QuestionStatus::Skipped;
        }

        if self.index + 1 < self.questions.len() {
            self.move_to(self.index + 1)?;
            Ok(SkipOutcome::Moved { to: self.index })
        } else {
            self.finish().map(SkipOutcome::Finished)
        }
    }

    /// Stop the timer and compute the final tally.
    ///
    /// # Errors
    ///
    /// Returns the state errors outside an active test, or
    /// `SessionError::Summary` if the tally cannot be built.
    pub fn finish(&mut self) -> Result<TestSummary, SessionError> {
        self.ensure_active()?;

        let now = self.timer.clock().now();
        let started_at = self.timer.started_at().unwrap_or(now);
        // wall clock may step back mid-test
        let completed_at = now.max(started_at);
        let summary = TestSummary::new(
            self.score,
            count_u32(self.questions.len()),
            count_u32(self.attempted()),
            started_at,
            completed_at,
        )?;

        self.timer.stop();
        self.phase = SessionPhase::Finished;
        self.summary = Some(summary.clone());

        info!(
            score = summary.score(),
            total = summary.total(),
            attempted = summary.attempted(),
            percentage = %summary.percentage_label(),
            "test finished"
        );
        Ok(summary)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Questions of the current (or last) test, in presentation order.
    #[must_use]
    pub fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index).map(Arc::as_ref)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn statuses(&self) -> &[QuestionStatus] {
        &self.statuses
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    /// Answer recorded for the current question, if any.
    #[must_use]
    pub fn current_answer(&self) -> Option<usize> {
        self.answers.get(self.index).copied().flatten()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of questions with a recorded answer.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.timer.elapsed_seconds()
    }

    #[must_use]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Mutable access to the timer clock; lets tests move a fixed clock.
    pub fn clock_mut(&mut self) -> &mut Clock {
        self.timer.clock_mut()
    }

    /// Final tally, available once the test is finished.
    #[must_use]
    pub fn summary(&self) -> Option<&TestSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::from_statuses(&self.statuses, self.attempted(), self.is_finished())
    }
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("index", &self.index)
            .field("score", &self.score)
            .field("attempted", &self.attempted())
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
