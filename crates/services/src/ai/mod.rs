mod chat;
mod prompt;

use async_trait::async_trait;
use riddle_core::difficulty::DifficultyTier;
use riddle_core::model::{RequestKey, RiddlePayload};

use crate::error::GeneratorError;

pub use chat::{ChatRiddleGenerator, GeneratorConfig};
pub use prompt::build_prompt;

/// What the upstream generator is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiddleRequest {
    pub key: RequestKey,
    pub tier: DifficultyTier,
}

/// Upstream source of raw riddles.
///
/// Implementations perform one call per invocation; caching, de-duplication,
/// validation and timeouts belong to `RiddleSource`.
#[async_trait]
pub trait RiddleGenerator: Send + Sync {
    async fn generate(&self, request: &RiddleRequest) -> Result<RiddlePayload, GeneratorError>;

    /// Whether the generator can serve requests at all.
    fn enabled(&self) -> bool {
        true
    }
}
