//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the player crates:
//! - Logging and tracing infrastructure
//! - Normalized player event model
//! - Event bus for stream-style consumers
//!
//! ## Overview
//!
//! This crate owns the vocabulary every backend adapter is normalized into
//! ([`events::PlayerEvent`]) and the logging conventions used throughout the
//! workspace.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
