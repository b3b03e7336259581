use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use riddle_core::Clock;
use riddle_core::model::RequestKey;
use riddle_core::progression::{Command, Event, IgnoreReason, Outcome, Progression, Ticket};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::events::EngineEvents;
use super::snapshot::GameSnapshot;
use crate::riddle_source::RiddleSource;

/// Drives a [`Progression`] against a [`RiddleSource`].
///
/// Every state change goes through `Progression::step` inside [`ProgressionEngine::handle`].
/// Fetches run as detached tasks on the given runtime and report back through
/// [`EngineEvents`]; nothing here blocks.
pub struct ProgressionEngine {
    progression: Progression,
    source: Arc<RiddleSource>,
    clock: Clock,
    runtime: Handle,
    events: mpsc::UnboundedSender<Event>,
    flash_timer: Option<JoinHandle<()>>,
}

impl ProgressionEngine {
    #[must_use]
    pub fn new(
        progression: Progression,
        source: Arc<RiddleSource>,
        clock: Clock,
        runtime: Handle,
    ) -> (Self, EngineEvents) {
        let (events, receiver) = EngineEvents::channel();
        let engine = Self {
            progression,
            source,
            clock,
            runtime,
            events,
            flash_timer: None,
        };
        (engine, receiver)
    }

    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    #[must_use]
    pub fn source(&self) -> &Arc<RiddleSource> {
        &self.source
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.progression, self.clock.now())
    }

    /// Begin the game by requesting the first riddle.
    pub fn start(&mut self) -> Outcome {
        self.handle(Event::Start)
    }

    /// Submit an answer for the current riddle. A no-op unless a riddle is showing.
    pub fn submit_answer(&mut self, choice: &str) -> Outcome {
        self.handle(Event::Answer(choice.to_string()))
    }

    /// Request the current riddle again after a persistent failure.
    pub fn retry(&mut self) -> Outcome {
        self.handle(Event::Retry)
    }

    /// Clear the wrong-answer signal if its window has passed.
    pub fn tick(&mut self) -> Outcome {
        self.handle(Event::Tick)
    }

    /// Move a fixed clock forward and deliver the tick a real timer would have sent.
    pub fn advance_clock(&mut self, delta: Duration) -> Outcome {
        self.clock.advance(delta);
        self.tick()
    }

    /// Apply one event and run the commands it produces.
    pub fn handle(&mut self, event: Event) -> Outcome {
        let now = self.clock.now();
        let step = self.progression.clone().step(event, now);
        self.progression = step.progression;
        log_outcome(&step.outcome, &self.progression);

        for command in step.commands {
            self.run(command);
        }
        step.outcome
    }

    fn run(&mut self, command: Command) {
        match command {
            Command::Fetch { ticket, key } => {
                debug!(?ticket, ?key, "fetching current riddle");
                self.spawn_fetch(ticket, key);
            }
            Command::Prefetch { ticket, key } => {
                debug!(?ticket, ?key, "prefetching next riddle");
                self.spawn_fetch(ticket, key);
            }
            Command::ScheduleFlashClear { deadline } => self.schedule_flash_clear(deadline),
        }
    }

    fn spawn_fetch(&self, ticket: Ticket, key: RequestKey) {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let event = match source.fetch(key).await {
                Ok(riddle) => Event::Resolved {
                    ticket,
                    key,
                    riddle,
                },
                Err(failure) => Event::Failed {
                    ticket,
                    key,
                    reason: failure.to_string(),
                },
            };
            // The engine may already be gone; its results no longer matter.
            let _ = events.send(event);
        });
    }

    fn schedule_flash_clear(&mut self, deadline: DateTime<Utc>) {
        if let Some(previous) = self.flash_timer.take() {
            previous.abort();
        }
        if self.clock.is_fixed() {
            return;
        }

        let wait = self.clock.until(deadline).to_std().unwrap_or_default();
        let events = self.events.clone();
        self.flash_timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(wait).await;
            let _ = events.send(Event::Tick);
        }));
    }
}

impl Drop for ProgressionEngine {
    fn drop(&mut self) {
        if let Some(timer) = self.flash_timer.take() {
            timer.abort();
        }
    }
}

impl fmt::Debug for ProgressionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressionEngine")
            .field("progression", &self.progression)
            .field("source", &self.source)
            .field("clock", &self.clock)
            .field("flash_timer_armed", &self.flash_timer.is_some())
            .finish_non_exhaustive()
    }
}

fn log_outcome(outcome: &Outcome, progression: &Progression) {
    let session = progression.session();
    match outcome {
        Outcome::Started => info!(total_levels = %session.total_levels(), "game started"),
        Outcome::Bound { key } => debug!(?key, "riddle ready"),
        Outcome::Answered(answer) => {
            info!(
                attempt = answer.attempt,
                correct = answer.correct,
                score = answer.score_after,
                "answer recorded"
            );
            if answer.completed {
                info!(attempts = session.attempt(), "game complete");
            }
        }
        Outcome::Retrying { failures } => {
            warn!(failures, attempt = session.attempt(), "riddle fetch failed, retrying");
        }
        Outcome::GaveUp { failures } => {
            warn!(failures, attempt = session.attempt(), "riddle fetch failed, giving up");
        }
        Outcome::RetryRequested => info!(attempt = session.attempt(), "retrying riddle fetch"),
        Outcome::FlashCleared => debug!("wrong-answer flash cleared"),
        Outcome::Ignored(IgnoreReason::Stale) => debug!("discarded stale riddle response"),
        Outcome::Ignored(reason) => debug!(?reason, "event ignored"),
    }
}
