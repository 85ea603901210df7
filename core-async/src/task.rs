//! Task spawning.
//!
//! Spawned tasks return a [`JoinHandle`] that can be awaited or aborted.
//! Aborting is how owners of repeating work (polling loops, readiness
//! continuations) guarantee nothing runs after teardown.

pub use tokio::task::{yield_now, AbortHandle, JoinError, JoinHandle};

/// Spawns a new asynchronous task on the current runtime.
///
/// # Examples
///
/// ```rust
/// use core_async::task::spawn;
///
/// # async fn example() {
/// let handle = spawn(async { 42 });
/// assert_eq!(handle.await.unwrap(), 42);
/// # }
/// ```
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;
