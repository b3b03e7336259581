use chrono::{DateTime, Duration, Utc};

use crate::model::feedback::FlashWindow;
use crate::model::{RequestKey, TotalLevels};

/// Points gained for a correct answer.
pub const CORRECT_REWARD: u32 = 1;
/// Points lost for a wrong answer.
pub const WRONG_PENALTY: u32 = 2;

/// Score after a correct answer, clamped to `total_levels`.
#[must_use]
pub fn score_after_correct(score: u32, total_levels: TotalLevels) -> u32 {
    score.saturating_add(CORRECT_REWARD).min(total_levels.get())
}

/// Score after a wrong answer, clamped at zero.
#[must_use]
pub fn score_after_wrong(score: u32) -> u32 {
    score.saturating_sub(WRONG_PENALTY)
}

/// What a single submitted answer did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub attempt: u32,
    pub score_before: u32,
    pub score_after: u32,
    pub completed: bool,
    pub flash_until: Option<DateTime<Utc>>,
}

/// Progress counters for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    total_levels: TotalLevels,
    attempt: u32,
    score: u32,
    completed: bool,
    correct_answers: u32,
    wrong_answers: u32,
    flash: FlashWindow,
}

impl Session {
    #[must_use]
    pub fn new(total_levels: TotalLevels) -> Self {
        Self::with_progress(total_levels, 0, 0)
    }

    /// Session already part way through a game. `score` is clamped to `total_levels`.
    #[must_use]
    pub fn with_progress(total_levels: TotalLevels, attempt: u32, score: u32) -> Self {
        let score = score.min(total_levels.get());
        Self {
            total_levels,
            attempt,
            score,
            completed: score >= total_levels.get(),
            correct_answers: 0,
            wrong_answers: 0,
            flash: FlashWindow::default(),
        }
    }

    #[must_use]
    pub fn total_levels(&self) -> TotalLevels {
        self.total_levels
    }

    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn wrong_answers(&self) -> u32 {
        self.wrong_answers
    }

    /// Key of the riddle bound to the current attempt.
    #[must_use]
    pub fn key(&self) -> RequestKey {
        RequestKey::new(self.attempt, self.total_levels)
    }

    /// Whether the wrong-answer signal is showing at `now`.
    #[must_use]
    pub fn feedback_flag(&self, now: DateTime<Utc>) -> bool {
        self.flash.is_active(now)
    }

    /// Apply the scoring rule for one answer and advance the attempt counter.
    ///
    /// A wrong answer restarts the flash window at `now`.
    pub fn record_answer(
        &mut self,
        correct: bool,
        now: DateTime<Utc>,
        flash_length: Duration,
    ) -> AnswerOutcome {
        let score_before = self.score;
        let attempt = self.attempt;
        let flash_until = if correct {
            self.score = score_after_correct(self.score, self.total_levels);
            self.correct_answers = self.correct_answers.saturating_add(1);
            None
        } else {
            self.score = score_after_wrong(self.score);
            self.wrong_answers = self.wrong_answers.saturating_add(1);
            Some(self.flash.arm(now, flash_length))
        };

        self.attempt = self.attempt.saturating_add(1);
        if self.score >= self.total_levels.get() {
            self.completed = true;
        }

        AnswerOutcome {
            correct,
            attempt,
            score_before,
            score_after: self.score,
            completed: self.completed,
            flash_until,
        }
    }

    /// Drop the wrong-answer signal once its deadline has passed.
    pub fn expire_flash(&mut self, now: DateTime<Utc>) -> bool {
        self.flash.expire(now)
    }
}
