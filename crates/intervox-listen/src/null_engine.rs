use crate::engine::{EngineEvent, RecognitionEngine};
use async_trait::async_trait;
use intervox_core::RecognitionError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// An engine that is present but never hears anything. Useful for wiring
/// tests and for running the binary without a speech backend.
pub struct NullEngine {
    running: AtomicBool,
    start_count: AtomicUsize,
    event_sender: Mutex<Option<mpsc::UnboundedSender<EngineEvent>>>,
}

impl NullEngine {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            start_count: AtomicUsize::new(0),
            event_sender: Mutex::new(None),
        }
    }

    pub fn start_count(&self) -> usize {
        self.start_count.load(Ordering::Relaxed)
    }
}

impl Default for NullEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecognitionEngine for NullEngine {
    fn name(&self) -> &str {
        "null"
    }

    async fn initialize(&mut self, _config: toml::Value) -> Result<(), RecognitionError> {
        Ok(())
    }

    fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<EngineEvent>) {
        if let Ok(mut slot) = self.event_sender.lock() {
            *slot = Some(sender);
        }
    }

    async fn start(&self) -> Result<(), RecognitionError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(RecognitionError::StartFailed(
                "engine already started".to_string(),
            ));
        }
        let count = self.start_count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!("NullEngine started (run #{count})");
        Ok(())
    }

    async fn stop(&self) -> Result<(), RecognitionError> {
        if self.running.swap(false, Ordering::SeqCst) {
            if let Ok(slot) = self.event_sender.lock() {
                if let Some(tx) = slot.as_ref() {
                    let _ = tx.send(EngineEvent::Ended);
                }
            }
        }
        Ok(())
    }
}
