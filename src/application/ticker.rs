//! Cancellable repeating task

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration as StdDuration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Period of the countdown and elapsed-time ticks
pub const TICK_PERIOD: StdDuration = StdDuration::from_secs(1);

/// Handle to a task that runs a callback once per period.
///
/// The task stops when the callback returns `ControlFlow::Break`, when
/// `cancel` is called, or when the handle is dropped.
#[derive(Debug)]
pub struct RepeatingTask {
    handle: Option<JoinHandle<()>>,
}

impl RepeatingTask {
    /// Spawn `tick` on the current runtime. The first call happens one `period` from now.
    pub fn spawn<F, Fut>(period: StdDuration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tick().await.is_break() {
                    break;
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Stop the task; no further ticks run after this returns.
    pub fn cancel(mut self) {
        self.abort();
    }

    /// Whether the task has ended on its own or been cancelled
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.abort();
    }
}
