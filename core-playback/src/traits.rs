//! # Core Playback Traits
//!
//! The capability interface every backend adapter implements, and the value
//! types that cross it.
//!
//! ## Architecture
//!
//! The controller owns exactly one [`PlayerAdapter`] at a time. It hands the
//! adapter a complete [`AdapterProps`] snapshot on every update; the adapter
//! diffs it against the snapshot it saw last (subject to its
//! [`CommandPolicy`]) and translates the difference into backend commands.
//! In the other direction the adapter normalizes backend signals into
//! [`PlayerEvent`]s and pushes them through the [`EventSink`] it was attached
//! with.
//!
//! ```text
//!  Controller ──AdapterProps──> PlayerAdapter ──commands──> backend
//!      ^                              │
//!      └────────PlayerEvent───────────┘<──signals────────── backend
//! ```
//!
//! ## Threading Model
//!
//! Adapters are `Send + Sync`; backend listeners may fire on any thread and
//! from inside a command call. The sink never blocks and never calls back
//! into the adapter synchronously.

use crate::error::Result;
use async_trait::async_trait;
use bridge_traits::EmbedOptions;
use core_runtime::events::PlayerEvent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Value Types
// ============================================================================

/// Backend family an adapter drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Native media element.
    Native,
    /// Hosted provider with an SDK and a readiness promise.
    EmbedSdk,
    /// Hosted provider driven through an iframe message API.
    EmbedApi,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Native => "native",
            BackendKind::EmbedSdk => "embed-sdk",
            BackendKind::EmbedApi => "embed-api",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to play.
///
/// The native element and SDK embeds accept URLs; hosted embeds usually take a
/// provider video id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaSource {
    Url(String),
    VideoId(String),
}

impl MediaSource {
    pub fn as_str(&self) -> &str {
        match self {
            MediaSource::Url(url) => url,
            MediaSource::VideoId(id) => id,
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&core_runtime::logging::redact_url(self.as_str()))
    }
}

/// Whether an adapter re-issues commands whose value did not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandPolicy {
    /// Only fields that differ from the previous snapshot become commands.
    #[default]
    SuppressRedundant,
    /// Every field becomes a command on every update.
    ReissueAll,
}

/// Desired backend configuration handed to an adapter.
///
/// `time` is the active seek target, not the last observed position.
///
/// The generation counters advance on every explicit transport or seek
/// intent. A changed generation forces the matching command even when the
/// value itself is unchanged, since the backend may have moved on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterProps {
    pub source: Option<MediaSource>,
    pub play: bool,
    pub looping: bool,
    pub time: f64,
    pub volume: f64,
    pub transport_generation: u64,
    pub seek_generation: u64,
}

impl Default for AdapterProps {
    fn default() -> Self {
        Self {
            source: None,
            play: false,
            looping: false,
            time: 0.0,
            volume: 1.0,
            transport_generation: 0,
            seek_generation: 0,
        }
    }
}

/// Receives normalized events from an adapter.
#[derive(Clone)]
pub struct EventSink {
    emit: Arc<dyn Fn(PlayerEvent) + Send + Sync>,
}

impl EventSink {
    pub fn new<F>(emit: F) -> Self
    where
        F: Fn(PlayerEvent) + Send + Sync + 'static,
    {
        Self {
            emit: Arc::new(emit),
        }
    }

    /// Sink that drops everything.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn emit(&self, event: PlayerEvent) {
        (self.emit)(event)
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink").finish_non_exhaustive()
    }
}

/// Everything an adapter needs to construct and subscribe its backend.
#[derive(Debug, Clone)]
pub struct AttachContext {
    pub props: AdapterProps,
    /// Backend-specific passthrough options.
    pub config: EmbedOptions,
    pub width: String,
    pub height: String,
    pub sink: EventSink,
}

// ============================================================================
// Adapter Trait
// ============================================================================

/// Common capability interface over one playback technology.
///
/// # Lifecycle
///
/// 1. [`attach`](PlayerAdapter::attach) once: construct or bind the backend,
///    register listeners, apply the initial props.
/// 2. [`apply`](PlayerAdapter::apply) any number of times.
/// 3. [`detach`](PlayerAdapter::detach) once: release every listener and
///    timer before returning. Nothing may reach the sink afterwards and the
///    backend must not be touched again.
///
/// Command failures inside `apply` are reported as
/// [`PlayerError::Command`](core_runtime::events::PlayerError::Command) events
/// rather than returned; only construction failures are `Err`.
#[async_trait]
pub trait PlayerAdapter: Send + Sync {
    fn backend(&self) -> BackendKind;

    /// Construct/subscribe the backend and apply the initial props.
    async fn attach(&mut self, ctx: AttachContext) -> Result<()>;

    /// Reconcile the backend with `props`.
    fn apply(&mut self, props: &AdapterProps);

    /// Synchronously release listeners, timers and pending continuations.
    fn detach(&mut self);

    /// Backend listeners currently registered by this adapter.
    fn listener_count(&self) -> usize;

    /// Whether a repeating timer is currently live.
    fn has_live_timer(&self) -> bool {
        false
    }
}
