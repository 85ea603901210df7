//! Runtime facade for the video player core.
//!
//! Core crates depend on this crate instead of naming tokio directly, so the
//! executor the player runs on is chosen in one place.
//!
//! # Modules
//!
//! - `task`: Task spawning and join handles
//! - `time`: Sleep, intervals and durations
//! - `sync`: Channels and cancellation
//! - `runtime`: Blocking entry points for hosts without a runtime
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(10)).await;
//!         42
//!     });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

/// Waits on multiple branches, returning when the first completes.
pub use tokio::select;

// Re-export commonly used types at crate root for convenience
pub use task::spawn;
pub use time::{sleep, Duration, Instant};
