//! Synchronization primitives.
//!
//! Async-aware channels from `tokio::sync` and the cooperative
//! [`CancellationToken`] from `tokio-util`.

pub use tokio::sync::{broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify};
pub use tokio_util::sync::CancellationToken;
