use chrono::{DateTime, Utc};
use riddle_core::model::Riddle;
use riddle_core::progression::{Phase, PhaseKind, Progression};

/// Point-in-time view of a game, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub phase: PhaseKind,
    pub score: u32,
    pub total_levels: u32,
    pub attempt: u32,
    pub riddle: Option<Riddle>,
    pub feedback_flag: bool,
    pub completed: bool,
    pub failure: Option<String>,
    pub correct_answers: u32,
    pub wrong_answers: u32,
}

impl GameSnapshot {
    #[must_use]
    pub fn capture(progression: &Progression, now: DateTime<Utc>) -> Self {
        let session = progression.session();
        let failure = match progression.phase() {
            Phase::Failed { reason, .. } => Some(reason.clone()),
            _ => None,
        };
        Self {
            phase: progression.phase().kind(),
            score: session.score(),
            total_levels: session.total_levels().get(),
            attempt: session.attempt(),
            riddle: progression.current_riddle().cloned(),
            feedback_flag: session.feedback_flag(now),
            completed: session.is_completed(),
            failure,
            correct_answers: session.correct_answers(),
            wrong_answers: session.wrong_answers(),
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == PhaseKind::Loading
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.phase == PhaseKind::Failed
    }
}
