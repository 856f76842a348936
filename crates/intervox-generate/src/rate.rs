use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Minimum-spacing limiter for outbound generation requests. The
/// last-request timestamp is explicit state owned by the client, scoped to
/// its lifetime, instead of a module-wide global.
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Wait until a request slot is available. Reserves the slot before
    /// sleeping, so concurrent callers queue up rather than racing.
    pub async fn acquire(&self) {
        let wait = {
            let Ok(mut slot) = self.next_slot.lock() else {
                return;
            };
            let now = Instant::now();
            let wait = match *slot {
                Some(ready) if ready > now => ready - now,
                _ => Duration::ZERO,
            };
            *slot = Some(now + wait + self.min_interval);
            wait
        };

        if !wait.is_zero() {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "rate limit: waiting");
            tokio::time::sleep(wait).await;
        }
    }
}
