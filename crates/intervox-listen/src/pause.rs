use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Restartable single-shot quiet-window timer.
///
/// `arm` supersedes any pending timer; if the quiet window elapses without
/// another `arm`, the supplied closure fires exactly once and the timer is
/// spent. `cancel` drops a pending timer without firing. At most one timer
/// is live at any time.
#[derive(Clone)]
pub struct PauseDetector {
    quiet_window: Duration,
    pending: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
}

impl PauseDetector {
    pub fn new(quiet_window: Duration) -> Self {
        Self {
            quiet_window,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub fn quiet_window(&self) -> Duration {
        self.quiet_window
    }

    pub fn arm<F>(&self, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let quiet_window = self.quiet_window;
        let Ok(mut slot) = self.pending.lock() else {
            return;
        };
        if let Some(handle) = slot.take() {
            handle.abort();
        }
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_window).await;
            on_fire();
        }));
    }

    pub fn cancel(&self) {
        if let Ok(mut slot) = self.pending.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let reader = {
            let count = Arc::clone(&count);
            move || count.load(Ordering::SeqCst)
        };
        (count, reader)
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_fires_once_after_quiet_window() {
        let detector = PauseDetector::new(Duration::from_millis(1500));
        let (count, fired) = counter();

        let c = Arc::clone(&count);
        detector.arm(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        // Let the timer task register its sleep before touching the clock.
        settle().await;

        tokio::time::advance(Duration::from_millis(1400)).await;
        settle().await;
        assert_eq!(fired(), 0);

        tokio::time::advance(Duration::from_millis(200)).await;
        settle().await;
        assert_eq!(fired(), 1);

        // Spent: no auto-rearm.
        tokio::time::advance(Duration::from_millis(5000)).await;
        settle().await;
        assert_eq!(fired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_rearm_supersedes_pending_timer() {
        // Chunks at t=0 and t=1000 with a 1500ms window: the pause lands at
        // t=2500, not t=1500.
        let detector = PauseDetector::new(Duration::from_millis(1500));
        let (count, fired) = counter();

        let c = Arc::clone(&count);
        detector.arm(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        settle().await;

        tokio::time::advance(Duration::from_millis(1000)).await;
        settle().await;
        let c = Arc::clone(&count);
        detector.arm(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        settle().await;

        tokio::time::advance(Duration::from_millis(1400)).await;
        settle().await;
        assert_eq!(fired(), 0, "pause fired before the rearmed deadline");

        tokio::time::advance(Duration::from_millis(200)).await;
        settle().await;
        assert_eq!(fired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancel_prevents_firing() {
        let detector = PauseDetector::new(Duration::from_millis(1500));
        let (count, fired) = counter();

        let c = Arc::clone(&count);
        detector.arm(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        detector.cancel();

        tokio::time::advance(Duration::from_millis(5000)).await;
        settle().await;
        assert_eq!(fired(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancel_when_idle_is_noop() {
        let detector = PauseDetector::new(Duration::from_millis(1500));
        detector.cancel();
        detector.cancel();
    }
}
