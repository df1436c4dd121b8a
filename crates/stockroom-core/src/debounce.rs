// ── Debouncer ──
//
// Explicit schedule/cancel timer for free-text search. Each `schedule`
// call replaces the pending action; the action only runs once the quiet
// period elapses without another call.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

struct Pending {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Runs at most one deferred action after a quiet period.
///
/// Cancelling only stops an action that is still waiting. Once the quiet
/// period has elapsed the action runs to completion even if a new one is
/// scheduled meanwhile.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<Pending>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any waiting action and arm `action` to run after the delay.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    trace!("debounced action superseded");
                }
                () = tokio::time::sleep(delay) => action.await,
            }
        });

        let previous = self
            .pending
            .lock()
            .expect("debouncer lock poisoned")
            .replace(Pending { cancel, handle });
        if let Some(previous) = previous {
            previous.cancel.cancel();
        }
    }

    /// Drop the waiting action, if any.
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().expect("debouncer lock poisoned").take() {
            pending.cancel.cancel();
        }
    }

    /// Whether an action is armed or still running.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .expect("debouncer lock poisoned")
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished() && !p.cancel.is_cancelled())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.get_mut().ok().and_then(Option::take) {
            pending.cancel.cancel();
        }
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::mpsc;

    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn fires_after_quiet_period() {
        let debouncer = Debouncer::new(DELAY);
        let (tx, mut rx) = mpsc::unbounded_channel();

        debouncer.schedule(async move {
            tx.send("drill").unwrap();
        });
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err());

        assert_eq!(rx.recv().await, Some("drill"));
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_inputs_only_run_the_last() {
        let debouncer = Debouncer::new(DELAY);
        let (tx, mut rx) = mpsc::unbounded_channel();

        for text in ["d", "dr", "dri", "drill"] {
            let tx = tx.clone();
            debouncer.schedule(async move {
                tx.send(text).unwrap();
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        drop(tx);

        assert_eq!(rx.recv().await, Some("drill"));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_waiting_action() {
        let debouncer = Debouncer::new(DELAY);
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
