//! Native media element contract.
//!
//! Models an HTML-media-like element: synchronous attribute writes, readable
//! playback properties and DOM-style lifecycle events. Readings such as
//! [`MediaElement::duration`] may be `NaN` before metadata is available; callers
//! are expected to normalize them.

use crate::{error::Result, listener::ListenerId, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifecycle events emitted by a media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaEventKind {
    Ended,
    Error,
    LoadedMetadata,
    Pause,
    Play,
    TimeUpdate,
    VolumeChange,
}

impl MediaEventKind {
    /// Every event an adapter subscribes to, in registration order.
    pub const ALL: [MediaEventKind; 7] = [
        MediaEventKind::Ended,
        MediaEventKind::Error,
        MediaEventKind::LoadedMetadata,
        MediaEventKind::Pause,
        MediaEventKind::Play,
        MediaEventKind::TimeUpdate,
        MediaEventKind::VolumeChange,
    ];

    /// DOM event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaEventKind::Ended => "ended",
            MediaEventKind::Error => "error",
            MediaEventKind::LoadedMetadata => "loadedmetadata",
            MediaEventKind::Pause => "pause",
            MediaEventKind::Play => "play",
            MediaEventKind::TimeUpdate => "timeupdate",
            MediaEventKind::VolumeChange => "volumechange",
        }
    }
}

impl fmt::Display for MediaEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform error object exposed by the element after an `error` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaError {
    /// Platform error code (1 aborted, 2 network, 3 decode, 4 source not supported).
    pub code: u16,
    /// Platform supplied description.
    pub message: String,
}

impl MediaError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "media error {}: {}", self.code, self.message)
    }
}

/// Listener invoked with the kind of event that fired.
pub type MediaListener = Arc<dyn Fn(MediaEventKind) + Send + Sync>;

/// Native media element driven by the native-media adapter.
pub trait MediaElement: PlatformSendSync {
    /// Register a listener and return its subscription handle.
    fn add_listener(&self, kind: MediaEventKind, listener: MediaListener) -> ListenerId;

    /// Remove a listener. Returns `false` when the handle was unknown.
    fn remove_listener(&self, id: ListenerId) -> bool;

    fn play(&self) -> Result<()>;

    fn pause(&self) -> Result<()>;

    /// Re-point the `src` attribute.
    fn set_source(&self, src: &str) -> Result<()>;

    fn set_loop(&self, looping: bool) -> Result<()>;

    fn set_current_time(&self, seconds: f64) -> Result<()>;

    /// Volume in `0.0..=1.0`.
    fn set_volume(&self, volume: f64) -> Result<()>;

    /// Current playback position in seconds (may be `NaN`).
    fn current_time(&self) -> f64;

    /// Media duration in seconds (`NaN` until metadata is loaded).
    fn duration(&self) -> f64;

    fn volume(&self) -> f64;

    /// Error object describing the most recent failure, if any.
    fn error(&self) -> Option<MediaError>;
}
