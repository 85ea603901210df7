//! Caller-supplied event callbacks.
//!
//! Every callback defaults to a no-op. Volume and time reports travel on
//! separate channels.

use core_runtime::events::{PlaybackStatus, PlayerError, VolumeChange};
use std::fmt;
use std::sync::Arc;

pub type StatusCallback = Arc<dyn Fn(PlaybackStatus) + Send + Sync>;
pub type UnitCallback = Arc<dyn Fn() + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(&PlayerError) + Send + Sync>;
pub type VolumeCallback = Arc<dyn Fn(VolumeChange) + Send + Sync>;

/// Callbacks invoked while events are folded into controller state.
#[derive(Clone)]
pub struct PlayerCallbacks {
    pub on_ready: UnitCallback,
    pub on_play: StatusCallback,
    pub on_pause: UnitCallback,
    pub on_ended: StatusCallback,
    pub on_error: ErrorCallback,
    pub on_time_update: StatusCallback,
    pub on_volume_change: VolumeCallback,
}

impl Default for PlayerCallbacks {
    fn default() -> Self {
        Self {
            on_ready: Arc::new(|| {}),
            on_play: Arc::new(|_| {}),
            on_pause: Arc::new(|| {}),
            on_ended: Arc::new(|_| {}),
            on_error: Arc::new(|_| {}),
            on_time_update: Arc::new(|_| {}),
            on_volume_change: Arc::new(|_| {}),
        }
    }
}

impl PlayerCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires at most once per attached backend.
    pub fn with_on_ready(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_ready = Arc::new(f);
        self
    }

    pub fn with_on_play(mut self, f: impl Fn(PlaybackStatus) + Send + Sync + 'static) -> Self {
        self.on_play = Arc::new(f);
        self
    }

    pub fn with_on_pause(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_pause = Arc::new(f);
        self
    }

    pub fn with_on_ended(mut self, f: impl Fn(PlaybackStatus) + Send + Sync + 'static) -> Self {
        self.on_ended = Arc::new(f);
        self
    }

    pub fn with_on_error(mut self, f: impl Fn(&PlayerError) + Send + Sync + 'static) -> Self {
        self.on_error = Arc::new(f);
        self
    }

    pub fn with_on_time_update(
        mut self,
        f: impl Fn(PlaybackStatus) + Send + Sync + 'static,
    ) -> Self {
        self.on_time_update = Arc::new(f);
        self
    }

    pub fn with_on_volume_change(
        mut self,
        f: impl Fn(VolumeChange) + Send + Sync + 'static,
    ) -> Self {
        self.on_volume_change = Arc::new(f);
        self
    }
}

impl fmt::Debug for PlayerCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerCallbacks").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_defaults_are_noops() {
        let callbacks = PlayerCallbacks::default();
        (callbacks.on_ready)();
        (callbacks.on_play)(PlaybackStatus::default());
        (callbacks.on_pause)();
        (callbacks.on_error)(&PlayerError::command("play", "rejected"));
        (callbacks.on_volume_change)(VolumeChange { volume: 0.5 });
    }

    #[test]
    fn test_builders_replace_single_callbacks() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let callbacks = PlayerCallbacks::new().with_on_time_update(move |status| {
            assert_eq!(status.position_seconds, 3.0);
            seen.fetch_add(1, Ordering::SeqCst);
        });

        (callbacks.on_time_update)(PlaybackStatus::from_raw(10.0, 3.0));
        (callbacks.on_play)(PlaybackStatus::from_raw(10.0, 3.0));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
