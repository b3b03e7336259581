use std::fmt;
use std::num::NonZeroU32;

/// Number of levels a player must clear to finish a game. Always positive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TotalLevels(NonZeroU32);

impl TotalLevels {
    /// Creates a new `TotalLevels`, or `None` for zero.
    #[must_use]
    pub fn new(levels: u32) -> Option<Self> {
        NonZeroU32::new(levels).map(Self)
    }

    /// Returns the underlying level count.
    #[must_use]
    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for TotalLevels {
    fn default() -> Self {
        Self(NonZeroU32::MIN.saturating_add(9))
    }
}

/// Cache and de-duplication key for a riddle request.
///
/// Two requests with equal keys must resolve to the same riddle.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestKey {
    attempt: u32,
    total_levels: TotalLevels,
}

impl RequestKey {
    #[must_use]
    pub fn new(attempt: u32, total_levels: TotalLevels) -> Self {
        Self {
            attempt,
            total_levels,
        }
    }

    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    #[must_use]
    pub fn total_levels(&self) -> TotalLevels {
        self.total_levels
    }

    /// Key for the attempt following this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            attempt: self.attempt.saturating_add(1),
            total_levels: self.total_levels,
        }
    }
}

impl fmt::Debug for TotalLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TotalLevels({})", self.0)
    }
}

impl fmt::Display for TotalLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestKey({}/{})", self.attempt, self.total_levels)
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attempt {} of {}", self.attempt, self.total_levels)
    }
}
