//! Hosted embed contracts.
//!
//! Two families of hosted players are supported:
//!
//! - **SDK embeds** ([`EmbedSdkPlayer`]) expose an asynchronous `ready()`
//!   promise, an event emitter with typed payloads and 0..1 volume.
//! - **API embeds** ([`EmbedApiPlayer`]) are driven through an iframe message
//!   API: state changes arrive as numeric codes, errors as numeric codes, volume
//!   is 0..100 and there is no continuous position event.
//!
//! Both are constructed by a factory bound to a [`SurfaceId`].

use crate::{error::Result, listener::ListenerId, listener::SurfaceId, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Free-form options handed to a hosted player constructor.
pub type EmbedOptions = Map<String, Value>;

// ============================================================================
// SDK embeds
// ============================================================================

/// Events emitted by an SDK embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SdkEventKind {
    Play,
    Ended,
    Pause,
    TimeUpdate,
    VolumeChange,
    Error,
}

impl SdkEventKind {
    pub const ALL: [SdkEventKind; 6] = [
        SdkEventKind::Play,
        SdkEventKind::Ended,
        SdkEventKind::Pause,
        SdkEventKind::TimeUpdate,
        SdkEventKind::VolumeChange,
        SdkEventKind::Error,
    ];

    /// Emitter event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SdkEventKind::Play => "play",
            SdkEventKind::Ended => "ended",
            SdkEventKind::Pause => "pause",
            SdkEventKind::TimeUpdate => "timeupdate",
            SdkEventKind::VolumeChange => "volumechange",
            SdkEventKind::Error => "error",
        }
    }
}

impl fmt::Display for SdkEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload delivered with an SDK event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SdkEventData {
    /// Timing payload carried by play, pause, ended and timeupdate.
    Timing {
        duration: f64,
        seconds: f64,
        percent: f64,
    },
    Volume {
        volume: f64,
    },
    Error {
        name: String,
        message: String,
    },
    Empty,
}

pub type SdkListener = Arc<dyn Fn(&SdkEventData) + Send + Sync>;

/// Hosted player exposing an SDK with a readiness promise.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait EmbedSdkPlayer: PlatformSendSync {
    fn on(&self, kind: SdkEventKind, listener: SdkListener) -> ListenerId;

    fn off(&self, id: ListenerId) -> bool;

    /// Resolves once the embed accepts commands.
    async fn ready(&self) -> Result<()>;

    fn play(&self) -> Result<()>;

    fn pause(&self) -> Result<()>;

    fn set_loop(&self, looping: bool) -> Result<()>;

    fn set_current_time(&self, seconds: f64) -> Result<()>;

    /// Volume in `0.0..=1.0`.
    fn set_volume(&self, volume: f64) -> Result<()>;

    /// Resize the embedded frame (CSS length strings such as `"100%"`).
    fn set_dimensions(&self, width: &str, height: &str) -> Result<()>;
}

/// Constructs SDK players bound to a surface.
pub trait EmbedSdkFactory: PlatformSendSync {
    fn create(&self, surface: &SurfaceId, options: EmbedOptions) -> Result<Arc<dyn EmbedSdkPlayer>>;
}

// ============================================================================
// API embeds
// ============================================================================

/// Events emitted by an API embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiEventKind {
    Ready,
    StateChange,
    Error,
}

impl ApiEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiEventKind::Ready => "ready",
            ApiEventKind::StateChange => "stateChange",
            ApiEventKind::Error => "error",
        }
    }
}

/// Event delivered by an API embed. `data` carries the state or error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEvent {
    pub kind: ApiEventKind,
    pub data: Option<i32>,
}

impl ApiEvent {
    pub fn ready() -> Self {
        Self {
            kind: ApiEventKind::Ready,
            data: None,
        }
    }

    pub fn state_change(code: i32) -> Self {
        Self {
            kind: ApiEventKind::StateChange,
            data: Some(code),
        }
    }

    pub fn error(code: i32) -> Self {
        Self {
            kind: ApiEventKind::Error,
            data: Some(code),
        }
    }
}

pub type ApiListener = Arc<dyn Fn(&ApiEvent) + Send + Sync>;

/// Constructor arguments for an API embed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiPlayerOptions {
    pub video_id: Option<String>,
    pub width: String,
    pub height: String,
    /// Embed parameters (`autoplay`, `loop`, `playlist`, caller extras).
    pub player_vars: EmbedOptions,
}

/// Hosted player driven through an iframe message API.
pub trait EmbedApiPlayer: PlatformSendSync {
    fn on(&self, kind: ApiEventKind, listener: ApiListener) -> ListenerId;

    fn off(&self, id: ListenerId) -> bool;

    fn play_video(&self) -> Result<()>;

    fn pause_video(&self) -> Result<()>;

    fn seek_to(&self, seconds: f64) -> Result<()>;

    /// Volume in `0.0..=100.0`.
    fn set_volume(&self, volume: f64) -> Result<()>;

    fn set_loop(&self, looping: bool) -> Result<()>;

    fn get_duration(&self) -> f64;

    fn get_current_time(&self) -> f64;
}

/// Constructs API players bound to a surface.
pub trait EmbedApiFactory: PlatformSendSync {
    fn create(
        &self,
        surface: &SurfaceId,
        options: ApiPlayerOptions,
    ) -> Result<Arc<dyn EmbedApiPlayer>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_event_names() {
        let names: Vec<_> = SdkEventKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["play", "ended", "pause", "timeupdate", "volumechange", "error"]
        );
    }

    #[test]
    fn test_api_event_constructors() {
        assert_eq!(ApiEvent::ready().data, None);
        assert_eq!(ApiEvent::state_change(1).kind, ApiEventKind::StateChange);
        assert_eq!(ApiEvent::error(101).data, Some(101));
        assert_eq!(ApiEventKind::StateChange.as_str(), "stateChange");
    }

    #[test]
    fn test_sdk_payload_serializes_tagged() {
        let json = serde_json::to_value(SdkEventData::Volume { volume: 0.5 }).unwrap();
        assert_eq!(json["kind"], "volume");
        assert_eq!(json["volume"], 0.5);
    }
}
