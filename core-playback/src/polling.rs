//! # Position Polling
//!
//! Emulates a time-update signal for backends that only report state changes.
//!
//! A [`PollingTask`] is an explicit, cancellable repeating task: the first tick
//! fires one period after [`PollingTask::start`], and [`PollingTask::stop`]
//! (or dropping the task) guarantees that no tick runs afterwards, even one
//! that was already due.

use core_async::runtime::Handle;
use core_async::sync::CancellationToken;
use core_async::task::JoinHandle;
use core_async::time::{interval_after, Duration};
use tracing::trace;

/// Polling period used by message-API embeds.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Repeating tick bound to the lifetime of its owner.
#[derive(Debug)]
pub struct PollingTask {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PollingTask {
    /// Spawn a task on `runtime` calling `tick` every `period`.
    ///
    /// Backend listeners may fire on threads that are not runtime workers, so
    /// the owner captures the runtime handle up front.
    pub fn start<F>(runtime: &Handle, period: Duration, tick: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let token = CancellationToken::new();
        let cancel = token.clone();

        let handle = runtime.spawn(async move {
            let mut interval = interval_after(period);
            loop {
                core_async::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if cancel.is_cancelled() {
                            break;
                        }
                        tick();
                    }
                }
            }
            trace!("polling task exited");
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Cancel the task. Idempotent.
    pub fn stop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
            && !self.token.is_cancelled()
    }
}

impl Drop for PollingTask {
    fn drop(&mut self) {
        self.stop();
    }
}
