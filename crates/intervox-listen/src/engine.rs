use async_trait::async_trait;
use intervox_core::{RecognitionError, ResultBatch};
use tokio::sync::mpsc;

/// Events emitted by a recognition engine over its lifetime. Mirrors the
/// result/error/end event surface of continuous recognition backends.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Results(ResultBatch),
    Error(EngineErrorKind),
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineErrorKind {
    /// The engine gave up because it heard nothing.
    NoSpeech,
    /// The current recognition run was aborted mid-flight.
    Aborted,
    /// Microphone access denied by the host.
    NotAllowed,
    Network,
    Other(String),
}

impl EngineErrorKind {
    /// Transient errors are recovered locally with a delayed restart;
    /// everything else is logged and left alone.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineErrorKind::NoSpeech | EngineErrorKind::Aborted)
    }
}

impl std::fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineErrorKind::NoSpeech => write!(f, "no-speech"),
            EngineErrorKind::Aborted => write!(f, "aborted"),
            EngineErrorKind::NotAllowed => write!(f, "not-allowed"),
            EngineErrorKind::Network => write!(f, "network"),
            EngineErrorKind::Other(detail) => write!(f, "other: {detail}"),
        }
    }
}

/// A continuous, interim-capable speech recognition engine.
///
/// The engine owns an ordered result buffer per run; each `Results` event
/// carries the buffer contents in order. Buffer indices reset when `start`
/// is called again, so downstream consumers must not rely on them across
/// runs. `start` on an already-running engine fails with `StartFailed`,
/// which callers treat as non-fatal.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn initialize(&mut self, config: toml::Value) -> Result<(), RecognitionError>;

    fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<EngineEvent>);

    async fn start(&self) -> Result<(), RecognitionError>;

    async fn stop(&self) -> Result<(), RecognitionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_error_classes() {
        assert!(EngineErrorKind::NoSpeech.is_transient());
        assert!(EngineErrorKind::Aborted.is_transient());
        assert!(!EngineErrorKind::NotAllowed.is_transient());
        assert!(!EngineErrorKind::Network.is_transient());
        assert!(!EngineErrorKind::Other("boom".to_string()).is_transient());
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(EngineErrorKind::NoSpeech.to_string(), "no-speech");
        assert_eq!(
            EngineErrorKind::Other("mic on fire".to_string()).to_string(),
            "other: mic on fire"
        );
    }
}
