//! Runtime utilities.
//!
//! The player core is cooperative and single threaded, so the default runtime
//! for hosts that do not bring their own is a current-thread Tokio runtime.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Builds a current-thread runtime with timers enabled.
pub fn current_thread() -> std::io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}

/// Runs the provided future to completion on a fresh current-thread runtime.
pub fn block_on<F>(future: F) -> std::io::Result<F::Output>
where
    F: std::future::Future,
{
    Ok(current_thread()?.block_on(future))
}
