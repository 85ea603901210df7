//! # Playback Reconciliation Core
//!
//! One control surface over heterogeneous video backends.
//!
//! ## Overview
//!
//! This crate handles:
//! - Desired-state reconciliation ([`controller::PlayerController`])
//! - The backend capability interface ([`traits::PlayerAdapter`]) and its
//!   three implementations ([`adapters`])
//! - Position polling for backends without a time signal ([`polling`])
//! - The controls boundary ([`controls`]) and caller callbacks ([`callbacks`])
//! - Player options ([`config`]) and container geometry ([`layout`])

pub mod adapters;
pub mod callbacks;
pub mod config;
pub mod controller;
pub mod controls;
pub mod error;
pub mod layout;
pub mod polling;
pub mod traits;

pub use adapters::{EmbedApiAdapter, EmbedSdkAdapter, NativeMediaAdapter};
pub use callbacks::PlayerCallbacks;
pub use config::PlayerOptions;
pub use controller::{ControllerState, DesiredProps, HandleId, PlayerController};
pub use controls::{ControlIntents, ControlsSnapshot, ControlsSurface};
pub use error::{PlaybackError, Result};
pub use traits::{AdapterProps, BackendKind, CommandPolicy, MediaSource, PlayerAdapter};
