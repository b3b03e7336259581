use std::sync::Arc;

use riddle_core::model::Session;
use riddle_core::progression::Progression;
use tokio::runtime::Handle;

use crate::Clock;
use crate::ai::{ChatRiddleGenerator, RiddleGenerator};
use crate::config::GameConfig;
use crate::engine::{EngineEvents, ProgressionEngine};
use crate::error::ConfigError;
use crate::riddle_source::{ChoiceOrder, RiddleSource};

/// Assembles everything needed to play: configuration, the upstream generator,
/// and a clock. Each call to [`GameServices::new_session`] starts a fresh game.
#[derive(Clone)]
pub struct GameServices {
    config: GameConfig,
    generator: Arc<dyn RiddleGenerator>,
    clock: Clock,
}

impl GameServices {
    #[must_use]
    pub fn new(config: GameConfig, generator: Arc<dyn RiddleGenerator>, clock: Clock) -> Self {
        Self {
            config,
            generator,
            clock,
        }
    }

    /// Build services from `RIDDLE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a game setting cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(
            GameConfig::from_env()?,
            Arc::new(ChatRiddleGenerator::from_env()),
            Clock::system(),
        ))
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn generator_enabled(&self) -> bool {
        self.generator.enabled()
    }

    /// A riddle source with an empty cache, configured from the game settings.
    #[must_use]
    pub fn riddle_source(&self) -> RiddleSource {
        let choice_order = if self.config.shuffle_choices {
            ChoiceOrder::Shuffled
        } else {
            ChoiceOrder::AsGenerated
        };
        RiddleSource::new(Arc::clone(&self.generator))
            .with_tiers(self.config.tiers)
            .with_timeout(self.config.request_timeout())
            .with_choice_order(choice_order)
    }

    /// Create an unstarted engine for a new game. Call `start` on it to fetch the first riddle.
    #[must_use]
    pub fn new_session(&self, runtime: Handle) -> (ProgressionEngine, EngineEvents) {
        let progression = Progression::new(
            Session::new(self.config.total_levels),
            self.config.progression_settings(),
        );
        ProgressionEngine::new(
            progression,
            Arc::new(self.riddle_source()),
            self.clock,
            runtime,
        )
    }
}
