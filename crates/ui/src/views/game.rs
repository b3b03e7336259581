use dioxus::prelude::*;
use services::{EngineEvents, ProgressionEngine};
use tracing::{debug, info};

use crate::context::AppContext;
use crate::views::{ProgressScene, RiddleOverlay};
use crate::vm::{map_overlay, map_visual_state};

/// Applies engine events (fetch results, flash ticks) as they arrive.
async fn pump_events(mut engine: Signal<ProgressionEngine>, mut events: EngineEvents) {
    while let Some(event) = events.recv().await {
        engine.write().handle(event);
    }
    debug!("engine event channel closed");
}

#[component]
pub fn GameView() -> Element {
    let ctx = use_context::<AppContext>();

    let mut first_events = None;
    let mut engine = use_signal(|| {
        let (fresh, events) = ctx.new_session();
        first_events = Some(events);
        fresh
    });
    let mut pump = use_signal(|| {
        first_events
            .take()
            .map(|events| spawn(pump_events(engine, events)))
    });

    let snapshot = engine.read().snapshot();
    let visual = map_visual_state(&snapshot);
    let overlay = map_overlay(&snapshot);

    let play_again = move |()| {
        if let Some(task) = pump.write().take() {
            task.cancel();
        }
        let (mut next, events) = ctx.new_session();
        info!("starting a new game");
        next.start();
        engine.set(next);
        pump.set(Some(spawn(pump_events(engine, events))));
    };

    rsx! {
        div { class: "game",
            ProgressScene { state: visual }
            RiddleOverlay {
                vm: overlay,
                on_start: move |()| {
                    engine.write().start();
                },
                on_answer: move |choice: String| {
                    engine.write().submit_answer(&choice);
                },
                on_retry: move |()| {
                    engine.write().retry();
                },
                on_play_again: play_again,
            }
        }
    }
}
