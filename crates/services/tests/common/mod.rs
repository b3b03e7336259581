#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use riddle_core::model::{RiddlePayload, TotalLevels};
use riddle_core::progression::{Event, Outcome, PhaseKind};
use services::{EngineEvents, GeneratorError, ProgressionEngine, RiddleGenerator, RiddleRequest};
use tokio::sync::Notify;

pub const WRONG: &str = "Wrong A";

/// Generator double that counts calls and can fail or stall on demand.
///
/// Valid riddles for attempt `n` have the correct answer `Answer n` at index 0.
#[derive(Default)]
pub struct ScriptedGenerator {
    calls: AtomicUsize,
    malformed_calls: usize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first `count` calls return a payload with only two choices.
    pub fn malformed_first(mut self, count: usize) -> Self {
        self.malformed_calls = count;
        self
    }

    /// Every call waits for one `notify_one` on `gate` before replying.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RiddleGenerator for ScriptedGenerator {
    async fn generate(&self, request: &RiddleRequest) -> Result<RiddlePayload, GeneratorError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let attempt = request.key.attempt();
        let mut choices = vec![answer(attempt), WRONG.to_string(), "Wrong B".to_string()];
        if call < self.malformed_calls {
            choices.truncate(2);
        }
        Ok(RiddlePayload {
            question: format!("Riddle {attempt} ({})?", request.tier),
            choices,
            correct_index: 0,
        })
    }
}

pub fn answer(attempt: u32) -> String {
    format!("Answer {attempt}")
}

pub fn ten_levels() -> TotalLevels {
    TotalLevels::new(10).expect("non-zero")
}

pub async fn next_event(events: &mut EngineEvents) -> Event {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("engine event in time")
        .expect("engine channel open")
}

/// Receive one event and apply it.
pub async fn pump(engine: &mut ProgressionEngine, events: &mut EngineEvents) -> Outcome {
    let event = next_event(events).await;
    engine.handle(event)
}

/// Apply events until the engine is no longer loading.
pub async fn settle(engine: &mut ProgressionEngine, events: &mut EngineEvents) -> PhaseKind {
    while engine.snapshot().is_loading() {
        pump(engine, events).await;
    }
    engine.snapshot().phase
}

/// Answer the current riddle correctly or not, then wait for the next one.
pub async fn answer_and_settle(
    engine: &mut ProgressionEngine,
    events: &mut EngineEvents,
    correct: bool,
) -> Outcome {
    let choice = if correct {
        answer(engine.snapshot().attempt)
    } else {
        WRONG.to_string()
    };
    let outcome = engine.submit_answer(&choice);
    settle(engine, events).await;
    outcome
}
