//! Workspace facade crate.
//!
//! Re-exports the playback core so hosts can depend on `vpc-workspace` alone.
//! Enable `headless` to also get the in-memory backends used by tests and
//! the headless example.

pub use core_playback::*;

pub mod runtime {
    pub use core_runtime::events;
    pub use core_runtime::logging;
}

#[cfg(feature = "headless")]
pub use bridge_headless as headless;
