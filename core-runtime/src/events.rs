//! # Player Events & Event Bus
//!
//! Normalized playback events and a broadcast bus for hosts that prefer an
//! event stream over per-event callbacks.
//!
//! ## Overview
//!
//! - **Event Types**: [`PlayerEvent`] is the single event vocabulary every
//!   backend adapter is normalized into. [`CoreEvent`] wraps it together with
//!   mount lifecycle notifications.
//! - **Status**: [`PlaybackStatus`] is the backend-observed position report
//!   carried by play/pause/ended/time-update events.
//! - **EventBus**: a `broadcast` channel the controller publishes into.
//! - **EventStream**: a receiver wrapper with optional filtering.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  PlayerEvent  ┌────────────┐  CoreEvent  ┌────────────┐
//! │   Adapter    ├──────────────>│ Controller ├────────────>│  EventBus  ├──> subscribers
//! └──────────────┘               └─────┬──────┘             └────────────┘
//!                                      │ callbacks
//!                                      v
//!                                   caller
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, PlaybackStatus, PlayerEvent};
//!
//! let bus = EventBus::new(16);
//! let mut stream = bus.subscribe();
//!
//! let status = PlaybackStatus::from_raw(120.0, 30.0);
//! bus.emit(CoreEvent::Player(PlayerEvent::TimeUpdate(status))).ok();
//!
//! let received = stream.try_recv().unwrap();
//! assert_eq!(received, CoreEvent::Player(PlayerEvent::TimeUpdate(status)));
//! ```
//!
//! ## Error Handling
//!
//! `RecvError::Lagged(n)` means a subscriber fell behind by `n` events and can
//! keep reading; `RecvError::Closed` means the bus was dropped. Time updates
//! arrive every 250 ms on polled backends, so size the buffer accordingly.

use bridge_traits::media::MediaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use core_async::sync::broadcast;

// Re-export commonly used types
pub use core_async::sync::broadcast::error::{RecvError, SendError};
pub use core_async::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Playback Status
// ============================================================================

/// Backend-reported playback position.
///
/// `fraction_elapsed` is always `position / duration` when the duration is
/// positive and `0` otherwise. Non-finite or negative readings are treated as
/// `0` before the fraction is computed, so a backend that reports `NaN` before
/// metadata is loaded still yields a well-formed status.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStatus {
    pub duration_seconds: f64,
    pub position_seconds: f64,
    pub fraction_elapsed: f64,
}

impl PlaybackStatus {
    /// Builds a status from raw backend readings.
    pub fn from_raw(duration: f64, position: f64) -> Self {
        let duration_seconds = sanitize(duration);
        let position_seconds = sanitize(position);
        let fraction_elapsed = if duration_seconds > 0.0 {
            (position_seconds / duration_seconds).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            duration_seconds,
            position_seconds,
            fraction_elapsed,
        }
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Volume report carried by [`PlayerEvent::VolumeChange`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeChange {
    /// Volume in `0.0..=1.0`.
    pub volume: f64,
}

// ============================================================================
// Player Errors
// ============================================================================

/// Error payload forwarded to `on_error`.
///
/// The shape depends on the backend that raised it: the native element hands
/// over its platform error object, hosted API embeds a `{code, message}` pair
/// from the fixed translation table, SDK embeds their named error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PlayerError {
    #[error("{0}")]
    Media(MediaError),

    #[error("embed error {code}: {message}")]
    Embed { code: i32, message: String },

    #[error("embed sdk error {name}: {message}")]
    Sdk { name: String, message: String },

    #[error("backend command `{command}` failed: {message}")]
    Command { command: String, message: String },
}

impl PlayerError {
    pub fn command(command: impl Into<String>, message: impl fmt::Display) -> Self {
        PlayerError::Command {
            command: command.into(),
            message: message.to_string(),
        }
    }

    /// Numeric code, when the backend supplied one.
    pub fn code(&self) -> Option<i32> {
        match self {
            PlayerError::Media(err) => Some(i32::from(err.code)),
            PlayerError::Embed { code, .. } => Some(*code),
            PlayerError::Sdk { .. } | PlayerError::Command { .. } => None,
        }
    }
}

// ============================================================================
// Player Events
// ============================================================================

/// Normalized lifecycle event raised by a backend adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum PlayerEvent {
    /// Backend accepted its initial configuration and is controllable.
    Ready,
    Play(PlaybackStatus),
    Pause(PlaybackStatus),
    /// Natural end of playback.
    Ended(PlaybackStatus),
    /// Position changed, either natively reported or emulated by polling.
    TimeUpdate(PlaybackStatus),
    VolumeChange(VolumeChange),
    Error(PlayerError),
}

impl PlayerEvent {
    pub fn description(&self) -> &str {
        match self {
            PlayerEvent::Ready => "Player ready",
            PlayerEvent::Play(_) => "Playback started",
            PlayerEvent::Pause(_) => "Playback paused",
            PlayerEvent::Ended(_) => "Playback ended",
            PlayerEvent::TimeUpdate(_) => "Playback position changed",
            PlayerEvent::VolumeChange(_) => "Volume changed",
            PlayerEvent::Error(_) => "Playback error",
        }
    }

    /// Status carried by the event, if any.
    pub fn status(&self) -> Option<PlaybackStatus> {
        match self {
            PlayerEvent::Play(status)
            | PlayerEvent::Pause(status)
            | PlayerEvent::Ended(status)
            | PlayerEvent::TimeUpdate(status) => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published on the [`EventBus`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Normalized backend event folded by the controller.
    Player(PlayerEvent),
    /// Adapter handle lifecycle.
    Lifecycle(LifecycleEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Player(e) => e.description(),
            CoreEvent::Lifecycle(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Player(PlayerEvent::Error(_)) => EventSeverity::Error,
            CoreEvent::Player(PlayerEvent::Ready) => EventSeverity::Info,
            CoreEvent::Lifecycle(_) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Adapter handle lifecycle notifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum LifecycleEvent {
    /// A new adapter handle was attached.
    Mounted {
        handle_id: String,
        backend: String,
    },
    /// The adapter handle was detached (unmount or backend swap).
    Unmounted {
        handle_id: String,
        backend: String,
    },
}

impl LifecycleEvent {
    fn description(&self) -> &str {
        match self {
            LifecycleEvent::Mounted { .. } => "Adapter mounted",
            LifecycleEvent::Unmounted { .. } => "Adapter unmounted",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Cloning the bus clones the sender; every `subscribe()` creates an
/// independent receiver that sees all events emitted afterwards.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// when nobody is listening.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream, PlayerEvent};
///
/// let bus = EventBus::new(16);
/// let mut errors = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Player(PlayerEvent::Error(_))));
///
/// bus.emit(CoreEvent::Player(PlayerEvent::Ready)).ok();
/// assert!(errors.try_recv().is_none());
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv()`/`try_recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive a matching event without waiting.
    ///
    /// Returns `None` if no matching event is currently buffered.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn time_update(position: f64) -> CoreEvent {
        CoreEvent::Player(PlayerEvent::TimeUpdate(PlaybackStatus::from_raw(
            100.0, position,
        )))
    }

    #[test]
    fn test_status_fraction() {
        let status = PlaybackStatus::from_raw(200.0, 50.0);
        assert_eq!(status.duration_seconds, 200.0);
        assert_eq!(status.position_seconds, 50.0);
        assert_eq!(status.fraction_elapsed, 0.25);
    }

    #[test]
    fn test_status_zero_duration_has_zero_fraction() {
        let status = PlaybackStatus::from_raw(0.0, 12.0);
        assert_eq!(status.position_seconds, 12.0);
        assert_eq!(status.fraction_elapsed, 0.0);
    }

    #[test]
    fn test_status_nan_readings_become_zero() {
        let status = PlaybackStatus::from_raw(f64::NAN, f64::NAN);
        assert_eq!(status, PlaybackStatus::default());

        let status = PlaybackStatus::from_raw(60.0, f64::NAN);
        assert_eq!(status.position_seconds, 0.0);
        assert_eq!(status.fraction_elapsed, 0.0);

        let status = PlaybackStatus::from_raw(f64::NAN, 10.0);
        assert_eq!(status.duration_seconds, 0.0);
        assert_eq!(status.fraction_elapsed, 0.0);
    }

    #[test]
    fn test_status_fraction_is_bounded() {
        for (duration, position) in [
            (10.0, 25.0),
            (10.0, -3.0),
            (f64::INFINITY, 5.0),
            (3.0, 3.0),
            (0.5, 0.25),
        ] {
            let status = PlaybackStatus::from_raw(duration, position);
            assert!((0.0..=1.0).contains(&status.fraction_elapsed));
            assert!(status.duration_seconds >= 0.0);
            assert!(status.position_seconds >= 0.0);
        }
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let json = serde_json::to_value(PlaybackStatus::from_raw(4.0, 1.0)).unwrap();
        assert_eq!(json["durationSeconds"], 4.0);
        assert_eq!(json["positionSeconds"], 1.0);
        assert_eq!(json["fractionElapsed"], 0.25);
    }

    #[test]
    fn test_player_error_codes() {
        let media = PlayerError::Media(MediaError::new(3, "decode"));
        assert_eq!(media.code(), Some(3));

        let embed = PlayerError::Embed {
            code: 101,
            message: "embedding disallowed".into(),
        };
        assert_eq!(embed.code(), Some(101));
        assert_eq!(embed.to_string(), "embed error 101: embedding disallowed");

        let command = PlayerError::command("setVolume", "rejected");
        assert_eq!(command.code(), None);
        assert_eq!(
            command.to_string(),
            "backend command `setVolume` failed: rejected"
        );
    }

    #[tokio::test]
    async fn test_event_bus_creation() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(CoreEvent::Player(PlayerEvent::Ready)).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = time_update(42.0);
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Lifecycle(_)));

        bus.emit(time_update(1.0)).unwrap();
        let mounted = CoreEvent::Lifecycle(LifecycleEvent::Mounted {
            handle_id: "h1".into(),
            backend: "native".into(),
        });
        bus.emit(mounted.clone()).unwrap();

        assert_eq!(stream.recv().await.unwrap(), mounted);
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for position in 0..5 {
            bus.emit(time_update(position as f64)).unwrap();
        }

        match sub.recv().await {
            Err(RecvError::Lagged(n)) => assert!(n > 0),
            other => panic!("Expected lag, got {:?}", other),
        }
    }

    #[test]
    fn test_event_severity() {
        let error = CoreEvent::Player(PlayerEvent::Error(PlayerError::Embed {
            code: 2,
            message: "invalid parameter".into(),
        }));
        assert_eq!(error.severity(), EventSeverity::Error);
        assert_eq!(
            CoreEvent::Player(PlayerEvent::Ready).severity(),
            EventSeverity::Info
        );
        assert_eq!(time_update(3.0).severity(), EventSeverity::Debug);
    }

    #[test]
    fn test_event_description() {
        assert_eq!(time_update(1.0).description(), "Playback position changed");
        assert_eq!(
            CoreEvent::Player(PlayerEvent::Ready).description(),
            "Player ready"
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Player(PlayerEvent::VolumeChange(VolumeChange { volume: 0.5 }));
        let json = serde_json::to_string(&event).unwrap();
        let back: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());
        assert!(stream.try_recv().is_none());
    }

    #[test]
    fn test_player_event_status_accessor() {
        let status = PlaybackStatus::from_raw(10.0, 5.0);
        assert_eq!(PlayerEvent::Ended(status).status(), Some(status));
        assert_eq!(PlayerEvent::Ready.status(), None);
    }
}
