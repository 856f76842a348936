use intervox_core::ResultBatch;
use std::collections::HashSet;

/// What one batch produced: newly accepted final chunks in discovery order,
/// plus the full replacement interim string.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub chunks: Vec<String>,
    pub interim: String,
}

/// Turns raw result batches into a monotonically growing transcript and a
/// deduplicated stream of new final chunks.
///
/// Engines re-deliver finals the consumer has already seen, re-index their
/// result buffer after an internal restart, and occasionally double-fire the
/// same final text. Dedup is content-based: buffer indices are worthless
/// across restarts, while final text does not repeat within one session.
/// The trade-off is that two genuinely identical consecutive utterances
/// collapse into one chunk; that is the accepted policy, not a bug.
#[derive(Debug, Default)]
pub struct Accumulator {
    transcript: String,
    interim: String,
    seen: HashSet<String>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one batch. Finals are trimmed, empty ones skipped, duplicates
    /// discarded; accepted chunks append to the transcript joined by a single
    /// space. The interim text is rebuilt from scratch and returned in the
    /// outcome, not stored: callers publish it via [`publish_interim`] once
    /// the batch's chunks have been delivered, so a consumer reading interim
    /// state from inside a chunk handler never sees the new batch's interim.
    ///
    /// [`publish_interim`]: Accumulator::publish_interim
    pub fn ingest(&mut self, batch: &ResultBatch) -> BatchOutcome {
        let mut interim = String::new();
        let mut chunks = Vec::new();

        for result in &batch.results {
            if !result.is_final {
                interim.push_str(&result.text);
                continue;
            }

            let text = result.text.trim();
            if text.is_empty() {
                continue;
            }
            if self.seen.contains(text) {
                tracing::trace!(buffer_index = result.buffer_index, "duplicate final discarded");
                continue;
            }

            self.seen.insert(text.to_string());
            if !self.transcript.is_empty() {
                self.transcript.push(' ');
            }
            self.transcript.push_str(text);
            chunks.push(text.to_string());
        }

        BatchOutcome { chunks, interim }
    }

    /// Make a batch's interim text readable. Full replacement per batch.
    pub fn publish_interim(&mut self, interim: String) {
        self.interim = interim;
    }

    /// Clear transcript, interim, and the seen-set. Previously seen text fed
    /// again after a reset counts as new.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.interim.clear();
        self.seen.clear();
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn interim(&self) -> &str {
        &self.interim
    }

    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }
}
