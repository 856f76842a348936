use crate::engine::{EngineEvent, RecognitionEngine};
use async_trait::async_trait;
use intervox_core::{RecognitionError, RecognitionResult, ResultBatch};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

type SenderSlot = Arc<Mutex<Option<mpsc::UnboundedSender<EngineEvent>>>>;

/// Replays a configured list of utterances as recognition events.
///
/// Reproduces the quirks of real continuous recognition backends: the result
/// buffer is cumulative, so every batch re-delivers all finals of the current
/// run before the new entry; buffer indices restart from zero on every
/// `start`; an `Ended` event fires once the script drains. The utterance
/// cursor survives restarts, so a restarted engine picks up where the
/// speaker left off instead of replaying old speech.
pub struct ScriptedEngine {
    utterances: Vec<String>,
    gap: Duration,
    emit_interim: bool,
    cursor: Arc<AtomicUsize>,
    running: Arc<AtomicBool>,
    event_sender: SenderSlot,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            utterances: Vec::new(),
            gap: Duration::from_millis(400),
            emit_interim: true,
            cursor: Arc::new(AtomicUsize::new(0)),
            running: Arc::new(AtomicBool::new(false)),
            event_sender: Arc::new(Mutex::new(None)),
            task: Mutex::new(None),
        }
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn send_event(slot: &SenderSlot, event: EngineEvent) {
    if let Ok(guard) = slot.lock() {
        if let Some(tx) = guard.as_ref() {
            let _ = tx.send(event);
        }
    }
}

fn cumulative_batch(delivered: &[String], next: RecognitionResult) -> ResultBatch {
    let mut results: Vec<RecognitionResult> = delivered
        .iter()
        .enumerate()
        .map(|(i, text)| RecognitionResult::final_text(text.clone(), i))
        .collect();
    results.push(next);
    ResultBatch::new(results)
}

#[async_trait]
impl RecognitionEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn initialize(&mut self, config: toml::Value) -> Result<(), RecognitionError> {
        let utterances = config
            .get("utterances")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                RecognitionError::InitializationFailed(
                    "missing 'utterances' in scripted config".to_string(),
                )
            })?;
        self.utterances = utterances
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.to_string())
            .collect();

        if let Some(ms) = config.get("utterance_gap_ms").and_then(|v| v.as_integer()) {
            self.gap = Duration::from_millis(ms.max(0) as u64);
        }
        if let Some(flag) = config.get("emit_interim").and_then(|v| v.as_bool()) {
            self.emit_interim = flag;
        }

        tracing::info!(
            utterances = self.utterances.len(),
            gap_ms = self.gap.as_millis() as u64,
            emit_interim = self.emit_interim,
            "ScriptedEngine initialized"
        );
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

        let utterances = self.utterances.clone();
        let gap = self.gap;
        let emit_interim = self.emit_interim;
        let cursor = Arc::clone(&self.cursor);
        let running = Arc::clone(&self.running);
        let sender = Arc::clone(&self.event_sender);

        let handle = tokio::spawn(async move {
            // Finals of this run only; buffer indices restart at zero.
            let mut delivered: Vec<String> = Vec::new();
            loop {
                let idx = cursor.load(Ordering::SeqCst);
                if idx >= utterances.len() {
                    if delivered.is_empty() {
                        // Restarted after the script drained: idle like a
                        // microphone hearing silence.
                        return;
                    }
                    running.store(false, Ordering::SeqCst);
                    send_event(&sender, EngineEvent::Ended);
                    return;
                }

                tokio::time::sleep(gap).await;
                if !running.load(Ordering::SeqCst) {
                    return;
                }

                let utterance = utterances[idx].clone();
                if emit_interim {
                    send_event(
                        &sender,
                        EngineEvent::Results(cumulative_batch(
                            &delivered,
                            RecognitionResult::interim_text(utterance.clone(), delivered.len()),
                        )),
                    );
                    tokio::time::sleep(gap / 2).await;
                    if !running.load(Ordering::SeqCst) {
                        return;
                    }
                }

                send_event(
                    &sender,
                    EngineEvent::Results(cumulative_batch(
                        &delivered,
                        RecognitionResult::final_text(utterance.clone(), delivered.len()),
                    )),
                );
                delivered.push(utterance);
                cursor.store(idx + 1, Ordering::SeqCst);
            }
        });

        if let Ok(mut slot) = self.task.lock() {
            *slot = Some(handle);
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), RecognitionError> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        if let Ok(mut slot) = self.task.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
        // Real engines fire their end event after an explicit stop too.
        send_event(&self.event_sender, EngineEvent::Ended);
        Ok(())
    }
}
