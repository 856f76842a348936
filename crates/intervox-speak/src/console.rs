use crate::synthesizer::Synthesizer;
use async_trait::async_trait;
use intervox_core::SynthesisError;
use std::time::Duration;

/// Logs utterances instead of playing audio, pacing each one by word count
/// so downstream sequencing behaves like it would against a real voice.
pub struct ConsoleSynthesizer {
    per_word: Duration,
}

impl ConsoleSynthesizer {
    pub fn new() -> Self {
        Self {
            per_word: Duration::ZERO,
        }
    }

    pub fn with_pace(per_word: Duration) -> Self {
        Self { per_word }
    }
}

impl Default for ConsoleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Synthesizer for ConsoleSynthesizer {
    fn name(&self) -> &str {
        "console"
    }

    async fn speak(&self, text: &str) -> Result<(), SynthesisError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            // Voice warm-up call; nothing to say.
            return Ok(());
        }
        tracing::info!(voice = self.name(), "speaking: {trimmed}");
        let words = trimmed.split_whitespace().count() as u32;
        if !self.per_word.is_zero() {
            tokio::time::sleep(self.per_word * words).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_speak_succeeds() {
        let synth = ConsoleSynthesizer::new();
        assert!(synth.speak("What is artificial intelligence?").await.is_ok());
    }

    #[tokio::test]
    async fn test_console_speak_empty_is_instant() {
        let synth = ConsoleSynthesizer::with_pace(Duration::from_secs(10));
        tokio::time::timeout(Duration::from_millis(100), synth.speak("  "))
            .await
            .expect("empty utterance should not sleep")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_console_speak_paces_by_word_count() {
        let synth = ConsoleSynthesizer::with_pace(Duration::from_millis(100));
        let before = tokio::time::Instant::now();
        synth.speak("one two three").await.unwrap();
        assert!(before.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn test_console_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConsoleSynthesizer>();
    }
}
