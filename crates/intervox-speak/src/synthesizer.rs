use async_trait::async_trait;
use intervox_core::SynthesisError;

/// A speech synthesis backend. `speak` resolves once playback of the given
/// utterance has completed, so callers can sequence question playback and
/// filler playback without overlap.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    fn name(&self) -> &str;

    async fn speak(&self, text: &str) -> Result<(), SynthesisError>;
}
