//! # Headless Bridge Implementations
//!
//! In-memory implementations of the backend bridge traits for hosts without
//! a real media stack: tests, CLI tooling and server-side rendering.
//!
//! ## Overview
//!
//! Each backend records every command it receives, keeps the minimal state a
//! real backend would expose (position, duration, volume) and lets the caller
//! script events:
//! - [`HeadlessMediaElement`] for the native-media adapter
//! - [`HeadlessSdkFactory`] / [`HeadlessSdkPlayer`] for SDK embeds, with a
//!   controllable readiness gate
//! - [`HeadlessApiFactory`] / [`HeadlessApiPlayer`] for message-API embeds
//!
//! Listeners are always invoked outside of the backend's own locks, so a
//! listener may call straight back into the backend.
//!
//! ## Echo mode
//!
//! With echo enabled, commands produce the event a real backend would raise in
//! response (`play()` fires `play`, `set_volume()` fires `volumechange`, and
//! so on). Echo is off by default so tests observe exactly what they script.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_headless::HeadlessMediaElement;
//! use bridge_traits::MediaElement;
//! use std::sync::Arc;
//!
//! let element = Arc::new(HeadlessMediaElement::new());
//! element.play()?;
//! element.load_metadata(120.0);
//! assert_eq!(element.commands().len(), 1);
//! ```

mod api;
mod media;
mod registry;
mod sdk;

pub use api::{ApiCommand, HeadlessApiFactory, HeadlessApiPlayer};
pub use media::{HeadlessMediaElement, MediaCommand};
pub use registry::ListenerRegistry;
pub use sdk::{HeadlessSdkFactory, HeadlessSdkPlayer, SdkCommand};
