//! # Backend Adapters
//!
//! One [`PlayerAdapter`](crate::traits::PlayerAdapter) per backend family:
//!
//! - [`NativeMediaAdapter`] wraps a [`MediaElement`](bridge_traits::MediaElement)
//! - [`EmbedSdkAdapter`] wraps an SDK embed with an async readiness promise
//! - [`EmbedApiAdapter`] wraps a message-API embed, emulating time updates
//!   by polling
//!
//! All three diff incoming props the same way (see [`PropsDiff`]) and differ
//! only in how each field becomes a backend call.

mod embed_api;
mod embed_sdk;
mod native;

pub use embed_api::{translate_error_code, EmbedApiAdapter, PlayerState};
pub use embed_sdk::EmbedSdkAdapter;
pub use native::NativeMediaAdapter;

use crate::traits::{AdapterProps, CommandPolicy, EventSink, MediaSource};
use bridge_traits::error::Result as BridgeResult;
use core_runtime::events::{PlayerError, PlayerEvent};
use tracing::warn;

/// Fields of an [`AdapterProps`] update that must become commands.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PropsDiff {
    pub source: Option<Option<MediaSource>>,
    pub play: Option<bool>,
    pub looping: Option<bool>,
    pub time: Option<f64>,
    pub volume: Option<f64>,
}

impl PropsDiff {
    /// Compare `next` against `previous` under `policy`.
    ///
    /// With [`CommandPolicy::ReissueAll`] every field except an unchanged
    /// source is reported; re-pointing a source resets the backend. A new
    /// transport or seek generation reports `play` or `time` under either
    /// policy.
    pub fn between(previous: &AdapterProps, next: &AdapterProps, policy: CommandPolicy) -> Self {
        let reissue = policy == CommandPolicy::ReissueAll;
        let pick = |changed: bool| reissue || changed;
        let replay = previous.transport_generation != next.transport_generation;
        let reseek = previous.seek_generation != next.seek_generation;

        Self {
            source: (previous.source != next.source).then(|| next.source.clone()),
            play: pick(replay || previous.play != next.play).then_some(next.play),
            looping: pick(previous.looping != next.looping).then_some(next.looping),
            time: pick(reseek || previous.time != next.time).then_some(next.time),
            volume: pick(previous.volume != next.volume).then_some(next.volume),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Report a failed backend command as an `Error` event.
pub(crate) fn report_command(sink: &EventSink, command: &str, result: BridgeResult<()>) {
    if let Err(err) = result {
        warn!(command, error = %err, "backend command failed");
        sink.emit(PlayerEvent::Error(PlayerError::command(command, err)));
    }
}
