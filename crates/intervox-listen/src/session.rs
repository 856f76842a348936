use crate::accumulator::Accumulator;
use crate::engine::{EngineEvent, RecognitionEngine};
use crate::pause::PauseDetector;
use intervox_core::{RecognitionConfig, RecognitionError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Consumer-supplied handlers for the current session. Both are cheap to
/// clone; the supervisor clones them out of the shared cell before invoking,
/// so `stop` can run from inside a handler without deadlocking.
#[derive(Clone)]
pub struct SessionCallbacks {
    on_chunk: Arc<dyn Fn(&str) + Send + Sync>,
    on_pause: Arc<dyn Fn() + Send + Sync>,
}

impl SessionCallbacks {
    pub fn new(
        on_chunk: impl Fn(&str) + Send + Sync + 'static,
        on_pause: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_chunk: Arc::new(on_chunk),
            on_pause: Arc::new(on_pause),
        }
    }
}

/// The indirection cell: event handlers are attached once, at session
/// construction, but always look up "whatever callbacks are currently
/// registered" here. A later `start`'s callbacks are therefore the ones
/// invoked, never a stale capture.
type CallbackCell = Arc<Mutex<Option<SessionCallbacks>>>;

/// Sliding-window history of recent restart attempts. Shared with the
/// supervisor so a fresh `start` wipes the slate for the new logical session.
type RestartBudget = Arc<Mutex<VecDeque<Instant>>>;

fn current_on_chunk(cell: &CallbackCell) -> Option<Arc<dyn Fn(&str) + Send + Sync>> {
    cell.lock()
        .ok()
        .and_then(|guard| guard.as_ref().map(|cbs| Arc::clone(&cbs.on_chunk)))
}

fn current_on_pause(cell: &CallbackCell) -> Option<Arc<dyn Fn() + Send + Sync>> {
    cell.lock()
        .ok()
        .and_then(|guard| guard.as_ref().map(|cbs| Arc::clone(&cbs.on_pause)))
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub quiet_window: Duration,
    pub restart_delay: Duration,
    pub max_restarts_per_window: u32,
    pub restart_window: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            quiet_window: Duration::from_millis(1500),
            restart_delay: Duration::from_millis(100),
            max_restarts_per_window: 5,
            restart_window: Duration::from_secs(10),
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &RecognitionConfig) -> Self {
        Self {
            quiet_window: Duration::from_millis(config.quiet_window_ms),
            restart_delay: Duration::from_millis(config.restart_delay_ms),
            max_restarts_per_window: config.max_restarts_per_window,
            restart_window: Duration::from_millis(config.restart_window_ms),
        }
    }
}

/// Public lifecycle contract for one listening session.
///
/// Owns the recognition engine exclusively and keeps it running across the
/// engine's own unexpected stops: `Ended` while logically listening triggers
/// an immediate restart, transient errors a delayed one. The logical
/// listening flag is the source of truth, not the engine's internal state.
/// Restarts never touch accumulated transcript state.
pub struct SpeechSession {
    engine: Option<Arc<dyn RecognitionEngine>>,
    accumulator: Arc<Mutex<Accumulator>>,
    callbacks: CallbackCell,
    listening: Arc<AtomicBool>,
    pause: PauseDetector,
    restarts: RestartBudget,
    supervisor: Option<tokio::task::JoinHandle<()>>,
}

impl SpeechSession {
    /// Wire up an engine and spawn the supervisor. The engine's event
    /// handlers live for the whole session object, across any number of
    /// `start`/`stop` cycles.
    pub fn new(mut engine: Box<dyn RecognitionEngine>, options: SessionOptions) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        engine.set_event_sender(event_tx);
        let engine: Arc<dyn RecognitionEngine> = Arc::from(engine);

        let accumulator = Arc::new(Mutex::new(Accumulator::new()));
        let callbacks: CallbackCell = Arc::new(Mutex::new(None));
        let listening = Arc::new(AtomicBool::new(false));
        let pause = PauseDetector::new(options.quiet_window);
        let restarts: RestartBudget = Arc::new(Mutex::new(VecDeque::new()));

        let supervisor = tokio::spawn(supervise(
            event_rx,
            Arc::clone(&engine),
            Arc::clone(&accumulator),
            Arc::clone(&callbacks),
            Arc::clone(&listening),
            pause.clone(),
            Arc::clone(&restarts),
            options,
        ));

        Self {
            engine: Some(engine),
            accumulator,
            callbacks,
            listening,
            pause,
            restarts,
            supervisor: Some(supervisor),
        }
    }

    /// A session for hosts with no usable recognition engine: `is_supported`
    /// is false and `start` refuses.
    pub fn unsupported() -> Self {
        Self {
            engine: None,
            accumulator: Arc::new(Mutex::new(Accumulator::new())),
            callbacks: Arc::new(Mutex::new(None)),
            listening: Arc::new(AtomicBool::new(false)),
            pause: PauseDetector::new(SessionOptions::default().quiet_window),
            restarts: Arc::new(Mutex::new(VecDeque::new())),
            supervisor: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.engine.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    pub fn transcript(&self) -> String {
        self.accumulator
            .lock()
            .map(|acc| acc.transcript().to_string())
            .unwrap_or_default()
    }

    pub fn interim_transcript(&self) -> String {
        self.accumulator
            .lock()
            .map(|acc| acc.interim().to_string())
            .unwrap_or_default()
    }

    /// Begin a new answer session. Re-starting an active session is
    /// tolerated and simply resets state. An engine start failure is logged
    /// but not surfaced; the engine may already be running.
    pub async fn start(&self, callbacks: SessionCallbacks) -> Result<(), RecognitionError> {
        let engine = self.engine.as_ref().ok_or_else(|| {
            RecognitionError::Unsupported("no recognition engine available".to_string())
        })?;

        if let Ok(mut acc) = self.accumulator.lock() {
            acc.reset();
        }
        if let Ok(mut cell) = self.callbacks.lock() {
            *cell = Some(callbacks);
        }
        // New logical session, new restart budget.
        if let Ok(mut restarts) = self.restarts.lock() {
            restarts.clear();
        }
        self.listening.store(true, Ordering::SeqCst);

        if let Err(e) = engine.start().await {
            tracing::warn!("recognition engine start failed: {e}");
        }
        Ok(())
    }

    /// End the session. Order matters: the listening flag drops first so an
    /// in-flight restart sees it, then the pause timer dies, then the
    /// callbacks are cleared so nothing stale can fire, and only then is the
    /// engine asked to stop. Idempotent.
    pub async fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
        self.pause.cancel();
        if let Ok(mut cell) = self.callbacks.lock() {
            *cell = None;
        }
        if let Some(engine) = self.engine.as_ref() {
            if let Err(e) = engine.stop().await {
                tracing::debug!("recognition engine stop failed: {e}");
            }
        }
    }

    /// Clear accumulated text between questions without touching the
    /// listening state or callbacks.
    pub fn reset_transcript(&self) {
        if let Ok(mut acc) = self.accumulator.lock() {
            acc.reset();
        }
    }
}

impl Drop for SpeechSession {
    fn drop(&mut self) {
        self.pause.cancel();
        if let Some(handle) = self.supervisor.take() {
            handle.abort();
        }
    }
}

/// The long-lived event loop: one per session object, processing engine
/// events strictly in arrival order. Chunk callbacks are invoked
/// synchronously and never awaited, so a slow consumer cannot stall batch
/// processing. A batch's interim text becomes readable only after its chunks
/// have all been delivered.
async fn supervise(
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
    engine: Arc<dyn RecognitionEngine>,
    accumulator: Arc<Mutex<Accumulator>>,
    callbacks: CallbackCell,
    listening: Arc<AtomicBool>,
    pause: PauseDetector,
    restarts: RestartBudget,
    options: SessionOptions,
) {
    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::Results(batch) => {
                let outcome = match accumulator.lock() {
                    Ok(mut acc) => acc.ingest(&batch),
                    Err(_) => continue,
                };
                if !outcome.chunks.is_empty() {
                    // Speech is flowing again; forgive past restarts.
                    if let Ok(mut restarts) = restarts.lock() {
                        restarts.clear();
                    }
                }
                for chunk in &outcome.chunks {
                    if let Some(on_chunk) = current_on_chunk(&callbacks) {
                        on_chunk(chunk);
                    }
                    if listening.load(Ordering::SeqCst) {
                        let cell = Arc::clone(&callbacks);
                        pause.arm(move || {
                            if let Some(on_pause) = current_on_pause(&cell) {
                                on_pause();
                            }
                        });
                    }
                }
                if let Ok(mut acc) = accumulator.lock() {
                    acc.publish_interim(outcome.interim);
                }
            }
            EngineEvent::Ended => {
                if listening.load(Ordering::SeqCst) {
                    tracing::debug!("recognition engine ended unexpectedly, restarting");
                    attempt_restart(&engine, &restarts, &options, &listening, None).await;
                }
            }
            EngineEvent::Error(kind) if kind.is_transient() => {
                tracing::debug!("transient recognition error: {kind}");
                if listening.load(Ordering::SeqCst) {
                    attempt_restart(
                        &engine,
                        &restarts,
                        &options,
                        &listening,
                        Some(options.restart_delay),
                    )
                    .await;
                }
            }
            EngineEvent::Error(kind) => {
                tracing::warn!("recognition engine error: {kind}");
            }
        }
    }
}

/// One restart attempt, bounded by a sliding window. Exceeding the budget
/// drops the listening flag: better a visible dead session than an engine
/// restart spin against a host that keeps refusing.
async fn attempt_restart(
    engine: &Arc<dyn RecognitionEngine>,
    restarts: &RestartBudget,
    options: &SessionOptions,
    listening: &Arc<AtomicBool>,
    delay: Option<Duration>,
) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
        if !listening.load(Ordering::SeqCst) {
            return;
        }
    }

    let (allowed, attempts) = {
        let Ok(mut restarts) = restarts.lock() else {
            return;
        };
        let now = Instant::now();
        while let Some(oldest) = restarts.front() {
            if now.duration_since(*oldest) > options.restart_window {
                restarts.pop_front();
            } else {
                break;
            }
        }

        if restarts.len() >= options.max_restarts_per_window as usize {
            (false, restarts.len())
        } else {
            restarts.push_back(now);
            (true, restarts.len())
        }
    };

    if !allowed {
        tracing::error!(
            attempts,
            window_ms = options.restart_window.as_millis() as u64,
            "recognition engine keeps stopping; giving up on this session"
        );
        listening.store(false, Ordering::SeqCst);
        return;
    }

    if let Err(e) = engine.start().await {
        tracing::warn!("recognition engine restart failed: {e}");
    }
}
