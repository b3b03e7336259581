use std::sync::Arc;

use services::{EngineEvents, GameServices, ProgressionEngine};
use tokio::runtime::Handle;

pub trait UiApp: Send + Sync {
    fn game_services(&self) -> GameServices;
    /// Runtime that engine fetches and timers are spawned on.
    fn runtime(&self) -> Handle;
}

#[derive(Clone)]
pub struct AppContext {
    services: GameServices,
    runtime: Handle,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            services: app.game_services(),
            runtime: app.runtime(),
        }
    }

    #[must_use]
    pub fn services(&self) -> &GameServices {
        &self.services
    }

    #[must_use]
    pub fn runtime(&self) -> Handle {
        self.runtime.clone()
    }

    /// A fresh, unstarted game with its own riddle cache.
    #[must_use]
    pub fn new_session(&self) -> (ProgressionEngine, EngineEvents) {
        self.services.new_session(self.runtime.clone())
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
