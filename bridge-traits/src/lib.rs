//! # Backend Bridge Traits
//!
//! Contracts for the concrete playback technologies the player core drives.
//!
//! ## Overview
//!
//! This crate defines the boundary between the reconciliation core and the
//! technologies it wraps. Each trait is the minimal capability surface one
//! backend family must offer; host platforms (browser bindings, test doubles,
//! native shells) provide the implementations.
//!
//! ## Traits
//!
//! ### Backends
//! - [`MediaElement`](media::MediaElement) - native media element with DOM-style events
//! - [`EmbedSdkPlayer`](embed::EmbedSdkPlayer) / [`EmbedSdkFactory`](embed::EmbedSdkFactory) -
//!   hosted provider with an async readiness promise and an event emitter
//! - [`EmbedApiPlayer`](embed::EmbedApiPlayer) / [`EmbedApiFactory`](embed::EmbedApiFactory) -
//!   hosted provider driven through an iframe message API with numeric state codes
//!
//! ### Utilities
//! - [`LoggerSink`](log::LoggerSink) - forward structured logs to host logging
//!
//! ## Subscriptions
//!
//! Every listener registration returns a [`ListenerId`]. Adapters store the
//! handles they receive and release them individually on teardown; no backend
//! is required to support an aggregate unsubscribe.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Backends should
//! reject commands with [`BridgeError::CommandRejected`] and report failed
//! construction with [`BridgeError::ConstructionFailed`] instead of panicking.
//!
//! ## Thread Safety
//!
//! Bridge traits require `Send + Sync` on native targets (see
//! [`platform`]) because listener closures and the polling task hold shared
//! handles to the backend.

pub mod embed;
pub mod error;
pub mod listener;
pub mod log;
pub mod media;
pub mod platform;

pub use error::BridgeError;

// Re-export commonly used types
pub use embed::{
    ApiEvent, ApiEventKind, ApiListener, ApiPlayerOptions, EmbedApiFactory, EmbedApiPlayer,
    EmbedOptions, EmbedSdkFactory, EmbedSdkPlayer, SdkEventData, SdkEventKind, SdkListener,
};
pub use listener::{ListenerId, SurfaceId};
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{MediaElement, MediaError, MediaEventKind, MediaListener};
