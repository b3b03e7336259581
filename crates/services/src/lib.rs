#![forbid(unsafe_code)]

pub mod ai;
pub mod config;
pub mod engine;
pub mod error;
pub mod game_services;
pub mod riddle_source;

pub use riddle_core::Clock;

pub use ai::{ChatRiddleGenerator, GeneratorConfig, RiddleGenerator, RiddleRequest};
pub use config::GameConfig;
pub use engine::{EngineEvents, GameSnapshot, ProgressionEngine};
pub use error::{ConfigError, GenerationFailure, GeneratorError};
pub use game_services::GameServices;
pub use riddle_source::{ChoiceOrder, RiddleSource};
