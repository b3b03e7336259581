use std::fmt;
use thiserror::Error;

use crate::model::RequestKey;

/// Difficulty bracket for a riddle, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DifficultyTier {
    Novice,
    Adept,
    Master,
}

impl DifficultyTier {
    /// Short instruction for the generator describing how hard the riddle should be.
    #[must_use]
    pub fn guidance(self) -> &'static str {
        match self {
            Self::Novice => {
                "Make it easy: a well-known riddle with an obvious answer and clearly wrong distractors."
            }
            Self::Adept => {
                "Make it moderately hard: require some lateral thinking and use plausible distractors."
            }
            Self::Master => {
                "Make it very hard: use wordplay or abstract reasoning, with distractors that nearly fit."
            }
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Novice => "novice",
            Self::Adept => "adept",
            Self::Master => "master",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TierPolicyError {
    #[error("tier percentages must satisfy medium ({medium}) <= hard ({hard}) <= 100")]
    Order { medium: u32, hard: u32 },
}

/// Maps an attempt index to a tier using boundaries relative to the level count.
///
/// Boundaries are `ceil(total_levels * percent / 100)`. Attempts before the first
/// boundary are `Novice`, before the second `Adept`, everything after `Master`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicy {
    medium_percent: u32,
    hard_percent: u32,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            medium_percent: 20,
            hard_percent: 40,
        }
    }
}

impl TierPolicy {
    /// # Errors
    ///
    /// Returns `TierPolicyError::Order` unless `medium_percent <= hard_percent <= 100`.
    pub fn new(medium_percent: u32, hard_percent: u32) -> Result<Self, TierPolicyError> {
        if medium_percent > hard_percent || hard_percent > 100 {
            return Err(TierPolicyError::Order {
                medium: medium_percent,
                hard: hard_percent,
            });
        }
        Ok(Self {
            medium_percent,
            hard_percent,
        })
    }

    #[must_use]
    pub fn medium_percent(&self) -> u32 {
        self.medium_percent
    }

    #[must_use]
    pub fn hard_percent(&self) -> u32 {
        self.hard_percent
    }

    /// Attempt indexes at which `Adept` and `Master` begin for this key's level count.
    #[must_use]
    pub fn boundaries(&self, key: RequestKey) -> (u32, u32) {
        let total = u64::from(key.total_levels().get());
        let boundary = |percent: u32| {
            let scaled = (total * u64::from(percent)).div_ceil(100);
            u32::try_from(scaled).unwrap_or(u32::MAX)
        };
        (boundary(self.medium_percent), boundary(self.hard_percent))
    }

    #[must_use]
    pub fn tier_for(&self, key: RequestKey) -> DifficultyTier {
        let (adept_from, master_from) = self.boundaries(key);
        let attempt = key.attempt();
        if attempt < adept_from {
            DifficultyTier::Novice
        } else if attempt < master_from {
            DifficultyTier::Adept
        } else {
            DifficultyTier::Master
        }
    }
}
