//! Scheduled callbacks with explicit cancellation: a repeating ticker and a
//! debouncer. Both own their tokio task and abort it on cancel or drop, so
//! tearing down a session deterministically stops pending work.

use std::future::Future;
use std::ops::ControlFlow;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Owns a spawned timer task.
#[derive(Debug, Default)]
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    /// Abort the task if it is still scheduled.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Release the task without aborting it. Used when the task itself is
    /// finishing and must not be cancelled mid-way.
    pub fn detach(&mut self) {
        self.task = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `on_tick` every `period` (first call one period from now) until it
/// returns `ControlFlow::Break` or the handle is cancelled.
///
/// Must be called from within a tokio runtime.
pub fn spawn_ticker<F, Fut>(period: Duration, mut on_tick: F) -> TimerHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ControlFlow<()>> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if on_tick().await.is_break() {
                break;
            }
        }
    });
    TimerHandle { task: Some(task) }
}

/// Collapses bursts of calls into the last one, run after a quiet period.
#[derive(Debug)]
pub struct Debouncer {
    wait: Duration,
    pending: Mutex<TimerHandle>,
}

impl Debouncer {
    #[must_use]
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: Mutex::new(TimerHandle::default()),
        }
    }

    /// Schedule `action` after the quiet period, cancelling any pending one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let wait = self.wait;
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.cancel();
        pending.task = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            action();
        }));
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn ticker_runs_until_break() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let handle = spawn_ticker(Duration::from_secs(1), move || {
            let seen = Arc::clone(&seen);
            async move {
                let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
                if n == 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(!handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_ticker_stops_firing() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut handle = spawn_ticker(Duration::from_secs(1), move || {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            }
        });

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn debouncer_keeps_only_the_last_call() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let calls = Arc::new(Mutex::new(Vec::new()));

        for term in ["m", "ma", "mat"] {
            let calls = Arc::clone(&calls);
            debouncer.call(move || calls.lock().unwrap().push(term));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(calls.lock().unwrap().is_empty());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(*calls.lock().unwrap(), vec!["mat"]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn debouncer_cancel_drops_pending_call() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&fired);
        debouncer.call(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
