use riddle_core::progression::Event;
use tokio::sync::mpsc;

/// Receiving half of an engine's event channel.
///
/// Fetch results and flash timer ticks arrive here; hand each one back to
/// `ProgressionEngine::handle`.
#[derive(Debug)]
pub struct EngineEvents {
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EngineEvents {
    pub(crate) fn channel() -> (mpsc::UnboundedSender<Event>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Self { receiver })
    }

    /// Wait for the next event. Returns `None` once the engine is gone.
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }
}
