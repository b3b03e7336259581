//! Pure progression state machine.
//!
//! `Progression::step` is the only function that changes a game's state. It never
//! performs I/O: fetches and timers come back out as [`Command`]s for the caller to run,
//! and their results come back in as [`Event`]s.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::model::{AnswerOutcome, RequestKey, Riddle, Session};

/// Identifier of one fetch command, used to attribute failures to the request
/// the progression is waiting on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ticket({})", self.0)
    }
}

/// Tunables for a progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionSettings {
    /// Fetch attempts for one riddle before giving up. Values below 1 behave as 1.
    pub retry_limit: u32,
    /// How long the wrong-answer signal stays on.
    pub flash_window: Duration,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            retry_limit: 2,
            flash_window: Duration::seconds(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading { awaiting: Ticket, failures: u32 },
    Ready { riddle: Riddle },
    Failed { failures: u32, reason: String },
    Complete,
}

/// Discriminant of [`Phase`] without payload, handy for views and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Loading,
    Ready,
    Failed,
    Complete,
}

impl Phase {
    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Loading { .. } => PhaseKind::Loading,
            Phase::Ready { .. } => PhaseKind::Ready,
            Phase::Failed { .. } => PhaseKind::Failed,
            Phase::Complete => PhaseKind::Complete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    Resolved {
        ticket: Ticket,
        key: RequestKey,
        riddle: Riddle,
    },
    Failed {
        ticket: Ticket,
        key: RequestKey,
        reason: String,
    },
    Answer(String),
    Retry,
    Tick,
}

/// Side effects requested by a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch the riddle the progression is waiting on.
    Fetch { ticket: Ticket, key: RequestKey },
    /// Warm the cache for the next attempt. The result is not bound.
    Prefetch { ticket: Ticket, key: RequestKey },
    /// Deliver a `Tick` at `deadline`, replacing any earlier flash timer.
    ScheduleFlashClear { deadline: DateTime<Utc> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    AlreadyStarted,
    InvalidSubmission,
    Stale,
    Prefetched,
    Duplicate,
    UnawaitedFailure,
    NotFailed,
    FlashPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Started,
    Bound { key: RequestKey },
    Answered(AnswerOutcome),
    Retrying { failures: u32 },
    GaveUp { failures: u32 },
    RetryRequested,
    FlashCleared,
    Ignored(IgnoreReason),
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub progression: Progression,
    pub commands: Vec<Command>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    session: Session,
    phase: Phase,
    settings: ProgressionSettings,
    next_ticket: u64,
}

impl Progression {
    #[must_use]
    pub fn new(session: Session, settings: ProgressionSettings) -> Self {
        let phase = if session.is_completed() {
            Phase::Complete
        } else {
            Phase::Idle
        };
        Self {
            session,
            phase,
            settings,
            next_ticket: 0,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The riddle bound to the current attempt, if one is being shown.
    #[must_use]
    pub fn current_riddle(&self) -> Option<&Riddle> {
        match &self.phase {
            Phase::Ready { riddle } => Some(riddle),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Complete)
    }

    /// Apply one event.
    #[must_use]
    pub fn step(mut self, event: Event, now: DateTime<Utc>) -> Step {
        let mut commands = Vec::new();
        let outcome = match event {
            Event::Start => self.on_start(&mut commands),
            Event::Resolved { key, riddle, .. } => self.on_resolved(key, riddle, &mut commands),
            Event::Failed {
                ticket,
                key,
                reason,
            } => self.on_failed(ticket, key, reason, &mut commands),
            Event::Answer(choice) => self.on_answer(&choice, now, &mut commands),
            Event::Retry => self.on_retry(&mut commands),
            Event::Tick => {
                if self.session.expire_flash(now) {
                    Outcome::FlashCleared
                } else {
                    Outcome::Ignored(IgnoreReason::FlashPending)
                }
            }
        };

        Step {
            progression: self,
            commands,
            outcome,
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        let ticket = Ticket::new(self.next_ticket);
        self.next_ticket = self.next_ticket.saturating_add(1);
        ticket
    }

    fn begin_loading(&mut self, failures: u32, commands: &mut Vec<Command>) {
        let ticket = self.issue_ticket();
        self.phase = Phase::Loading {
            awaiting: ticket,
            failures,
        };
        commands.push(Command::Fetch {
            ticket,
            key: self.session.key(),
        });
    }

    fn on_start(&mut self, commands: &mut Vec<Command>) -> Outcome {
        if self.phase != Phase::Idle {
            return Outcome::Ignored(IgnoreReason::AlreadyStarted);
        }
        self.begin_loading(0, commands);
        Outcome::Started
    }

    fn on_resolved(
        &mut self,
        key: RequestKey,
        riddle: Riddle,
        commands: &mut Vec<Command>,
    ) -> Outcome {
        let current = self.session.key();
        if self.is_complete()
            || key.total_levels() != current.total_levels()
            || key.attempt() < current.attempt()
        {
            return Outcome::Ignored(IgnoreReason::Stale);
        }
        if key.attempt() > current.attempt() {
            return Outcome::Ignored(IgnoreReason::Prefetched);
        }

        match self.phase {
            Phase::Loading { .. } | Phase::Failed { .. } => {
                self.phase = Phase::Ready { riddle };
                let ticket = self.issue_ticket();
                commands.push(Command::Prefetch {
                    ticket,
                    key: key.next(),
                });
                Outcome::Bound { key }
            }
            _ => Outcome::Ignored(IgnoreReason::Duplicate),
        }
    }

    fn on_failed(
        &mut self,
        ticket: Ticket,
        key: RequestKey,
        reason: String,
        commands: &mut Vec<Command>,
    ) -> Outcome {
        let Phase::Loading { awaiting, failures } = self.phase else {
            return Outcome::Ignored(IgnoreReason::UnawaitedFailure);
        };
        if awaiting != ticket || key != self.session.key() {
            return Outcome::Ignored(IgnoreReason::UnawaitedFailure);
        }

        let failures = failures.saturating_add(1);
        if failures < self.settings.retry_limit.max(1) {
            self.begin_loading(failures, commands);
            Outcome::Retrying { failures }
        } else {
            self.phase = Phase::Failed { failures, reason };
            Outcome::GaveUp { failures }
        }
    }

    fn on_answer(
        &mut self,
        choice: &str,
        now: DateTime<Utc>,
        commands: &mut Vec<Command>,
    ) -> Outcome {
        let Phase::Ready { riddle } = &self.phase else {
            return Outcome::Ignored(IgnoreReason::InvalidSubmission);
        };

        let correct = riddle.is_correct(choice);
        let answered = self
            .session
            .record_answer(correct, now, self.settings.flash_window);

        if let Some(deadline) = answered.flash_until {
            commands.push(Command::ScheduleFlashClear { deadline });
        }

        if answered.completed {
            self.phase = Phase::Complete;
        } else {
            self.begin_loading(0, commands);
        }

        Outcome::Answered(answered)
    }

    fn on_retry(&mut self, commands: &mut Vec<Command>) -> Outcome {
        if !matches!(self.phase, Phase::Failed { .. }) {
            return Outcome::Ignored(IgnoreReason::NotFailed);
        }
        self.begin_loading(0, commands);
        Outcome::RetryRequested
    }
}
