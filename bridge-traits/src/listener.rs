//! Explicit subscription handles and embed surfaces.
//!
//! Every backend returns a [`ListenerId`] when a listener is registered. Adapters
//! keep these handles and hand them back one by one on teardown, so no backend
//! needs an aggregate "remove all" operation or ambient emitter state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle identifying one registered backend listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Identifier of the DOM-like surface a hosted embed is mounted into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SurfaceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
