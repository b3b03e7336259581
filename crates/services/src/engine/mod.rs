mod events;
mod service;
mod snapshot;

// Public API of the engine subsystem.
pub use events::EngineEvents;
pub use service::ProgressionEngine;
pub use snapshot::GameSnapshot;
