use std::fmt;
use std::sync::{Arc, RwLock};

use rand::Rng;
use tracing::debug;

use quiz_core::Clock;
use quiz_core::filter::Selection;
use quiz_core::model::TestSummary;
use storage::QuestionStore;

use super::service::{AnswerOutcome, SessionService, SkipOutcome};
use super::timer::{TICK_PERIOD, TimerTicker};
use super::view::SessionView;
use crate::config::QuizConfig;
use crate::error::SessionError;

/// State change announced to observers after a successful command.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started { total: usize },
    AnswerSelected(AnswerOutcome),
    Moved { from: usize, to: usize },
    Skipped { index: usize },
    Finished(TestSummary),
    Tick { elapsed_seconds: u64 },
}

/// Receives session events, e.g. to trigger a re-render.
///
/// `Tick` events arrive from the ticker task, so implementations must be
/// thread-safe.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

/// Observer list shared with the ticker task, so late subscribers get ticks.
type Observers = Arc<RwLock<Vec<Arc<dyn SessionObserver>>>>;

/// Distinct values for the three selection menus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionMenus {
    pub question_sets: Vec<String>,
    pub modules: Vec<String>,
    pub chapters: Vec<String>,
}

/// Orchestrates loading, selection and one session at a time.
pub struct QuizRunner {
    config: QuizConfig,
    store: QuestionStore,
    session: SessionService,
    observers: Observers,
    ticker: Option<TimerTicker>,
}

impl QuizRunner {
    /// Load every configured source and build a runner on the system clock.
    pub async fn load(config: QuizConfig) -> Self {
        let sources = config.build_sources();
        let store = QuestionStore::load(&sources).await;
        Self::with_store(config, store)
    }

    #[must_use]
    pub fn with_store(config: QuizConfig, store: QuestionStore) -> Self {
        let session = SessionService::new(Clock::default()).with_limit(config.questions_per_test);
        Self {
            config,
            store,
            session,
            observers: Observers::default(),
            ticker: None,
        }
    }

    /// Replace the clock. Any session in progress is discarded.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.stop_ticker();
        self.session = SessionService::new(clock).with_limit(self.config.questions_per_test);
        self
    }

    /// Register an observer. It also receives ticks from a running ticker.
    pub fn subscribe(&mut self, observer: Arc<dyn SessionObserver>) {
        if let Ok(mut observers) = self.observers.write() {
            observers.push(observer);
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    #[must_use]
    pub fn session(&self) -> &SessionService {
        &self.session
    }

    /// Mutable session access, e.g. to move a fixed clock in tests.
    pub fn session_mut(&mut self) -> &mut SessionService {
        &mut self.session
    }

    #[must_use]
    pub fn menus(&self) -> SelectionMenus {
        SelectionMenus {
            question_sets: self.store.question_sets(),
            modules: self.store.modules(),
            chapters: self.store.chapters(),
        }
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::from_session(&self.session)
    }

    /// Resolve `selection` and start a fresh test, replacing any current one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Filter` when the selection is incomplete or empty;
    /// the current session is left untouched.
    pub fn start(&mut self, selection: &Selection) -> Result<(), SessionError> {
        self.start_with_rng(selection, &mut rand::rng())
    }

    /// Like [`QuizRunner::start`], drawing the permutation from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Filter` when the selection is incomplete or empty.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        selection: &Selection,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        let subset = self.store.resolve(selection)?;
        self.stop_ticker();
        self.session.start_with_rng(subset, rng)?;
        debug!(mode = %selection.mode, total = self.session.total(), "runner started test");
        self.notify(&SessionEvent::Started {
            total: self.session.total(),
        });
        Ok(())
    }

    /// # Errors
    ///
    /// See [`SessionService::select_answer`].
    pub fn select_answer(&mut self, choice: usize) -> Result<AnswerOutcome, SessionError> {
        let outcome = self.session.select_answer(choice)?;
        self.notify(&SessionEvent::AnswerSelected(outcome));
        Ok(outcome)
    }

    /// # Errors
    ///
    /// See [`SessionService::move_to`].
    pub fn move_to(&mut self, index: usize) -> Result<(), SessionError> {
        let from = self.session.current_index();
        self.session.move_to(index)?;
        self.notify(&SessionEvent::Moved { from, to: index });
        Ok(())
    }

    /// # Errors
    ///
    /// See [`SessionService::next`].
    pub fn next(&mut self) -> Result<bool, SessionError> {
        let from = self.session.current_index();
        let moved = self.session.next()?;
        if moved {
            self.notify(&SessionEvent::Moved {
                from,
                to: self.session.current_index(),
            });
        }
        Ok(moved)
    }

    /// # Errors
    ///
    /// See [`SessionService::previous`].
    pub fn previous(&mut self) -> Result<bool, SessionError> {
        let from = self.session.current_index();
        let moved = self.session.previous()?;
        if moved {
            self.notify(&SessionEvent::Moved {
                from,
                to: self.session.current_index(),
            });
        }
        Ok(moved)
    }

    /// # Errors
    ///
    /// See [`SessionService::skip`].
    pub fn skip(&mut self) -> Result<SkipOutcome, SessionError> {
        let index = self.session.current_index();
        let outcome = self.session.skip()?;
        self.notify(&SessionEvent::Skipped { index });
        match &outcome {
            SkipOutcome::Moved { to } => self.notify(&SessionEvent::Moved {
                from: index,
                to: *to,
            }),
            SkipOutcome::Finished(summary) => {
                self.stop_ticker();
                self.notify(&SessionEvent::Finished(summary.clone()));
            }
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// See [`SessionService::finish`].
    pub fn finish(&mut self) -> Result<TestSummary, SessionError> {
        let summary = self.session.finish()?;
        self.stop_ticker();
        self.notify(&SessionEvent::Finished(summary.clone()));
        Ok(summary)
    }

    /// Start delivering `Tick` events to observers every second.
    ///
    /// Must be called inside a tokio runtime. Replaces any previous ticker.
    ///
    /// # Errors
    ///
    /// Returns the session state errors when no test is running.
    pub fn start_ticker(&mut self) -> Result<(), SessionError> {
        if !self.session.is_active() {
            return Err(if self.session.is_finished() {
                SessionError::Finished
            } else {
                SessionError::NotActive
            });
        }
        self.stop_ticker();
        let observers = Arc::clone(&self.observers);
        let ticker = TimerTicker::spawn(self.session.timer(), TICK_PERIOD, move |elapsed| {
            broadcast(
                &observers,
                &SessionEvent::Tick {
                    elapsed_seconds: elapsed,
                },
            );
        });
        self.ticker = Some(ticker);
        Ok(())
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    fn notify(&self, event: &SessionEvent) {
        broadcast(&self.observers, event);
    }
}

fn broadcast(observers: &Observers, event: &SessionEvent) {
    if let Ok(observers) = observers.read() {
        for observer in observers.iter() {
            observer.on_event(event);
        }
    }
}

impl fmt::Debug for QuizRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizRunner")
            .field("pool_len", &self.store.len())
            .field("session", &self.session)
            .field("observers", &self.observers.read().map_or(0, |o| o.len()))
            .field("ticking", &self.ticker.is_some())
            .finish_non_exhaustive()
    }
}
