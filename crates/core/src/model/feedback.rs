use chrono::{DateTime, Duration, Utc};

/// Single-slot deadline for the "last answer was wrong" signal.
///
/// Arming while already armed replaces the deadline, so overlapping wrong answers
/// extend one window instead of stacking several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlashWindow {
    until: Option<DateTime<Utc>>,
}

impl FlashWindow {
    /// Start (or restart) the window at `now`. Returns the new deadline.
    pub fn arm(&mut self, now: DateTime<Utc>, length: Duration) -> DateTime<Utc> {
        let until = now + length;
        self.until = Some(until);
        until
    }

    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Clear the window if its deadline has passed. Returns true when it was cleared.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        match self.until {
            Some(until) if now >= until => {
                self.until = None;
                true
            }
            _ => false,
        }
    }
}
