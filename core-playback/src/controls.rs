//! # Controls Boundary
//!
//! A controls surface renders the controller's desired state and reports user
//! intents back. It never touches a backend: every intent is routed through
//! the controller, which owns the desired state.

use crate::controller::ControllerInner;
use crate::error::Result;
use std::fmt;
use std::sync::Weak;
use tracing::debug;

/// State a controls surface renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsSnapshot {
    pub looping: bool,
    pub play: bool,
    /// Last observed position in seconds.
    pub time: f64,
    pub volume: f64,
}

/// Intent callbacks bound to a controller.
///
/// Holds a weak reference; once the controller is dropped every intent is a
/// no-op.
#[derive(Clone)]
pub struct ControlIntents {
    controller: Weak<ControllerInner>,
}

impl ControlIntents {
    pub(crate) fn new(controller: Weak<ControllerInner>) -> Self {
        Self { controller }
    }

    /// Intents bound to nothing.
    pub fn detached() -> Self {
        Self {
            controller: Weak::new(),
        }
    }

    pub fn play(&self) -> Result<()> {
        self.route("play", |inner| inner.request_play())
    }

    pub fn pause(&self) -> Result<()> {
        self.route("pause", |inner| inner.request_pause())
    }

    pub fn seek(&self, seconds: f64) -> Result<()> {
        self.route("seek", |inner| inner.request_seek(seconds))
    }

    pub fn change_volume(&self, volume: f64) -> Result<()> {
        self.route("volume", |inner| inner.request_volume_change(volume))
    }

    fn route(&self, intent: &str, f: impl FnOnce(&ControllerInner) -> Result<()>) -> Result<()> {
        match self.controller.upgrade() {
            Some(inner) => f(&inner),
            None => {
                debug!(intent, "intent after controller drop ignored");
                Ok(())
            }
        }
    }

    pub fn is_bound(&self) -> bool {
        self.controller.strong_count() > 0
    }
}

impl fmt::Debug for ControlIntents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlIntents")
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Rendering surface for playback controls.
pub trait ControlsSurface: Send + Sync {
    /// Called after every change to the controller's state.
    fn render(&self, snapshot: ControlsSnapshot, intents: ControlIntents);
}
