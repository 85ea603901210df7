//! Time-related operations.
//!
//! Thin re-exports of `tokio::time` plus [`interval_after`], which builds the
//! `setInterval`-style ticker the polling task needs: the first tick fires one
//! full period after creation rather than immediately.

pub use std::time::{Duration, SystemTime, UNIX_EPOCH};
pub use tokio::time::{interval, sleep, timeout, Instant, Interval, MissedTickBehavior};

/// Creates an interval whose first tick completes after `period`.
///
/// Missed ticks are skipped rather than burst, so a stalled executor never
/// produces a flurry of catch-up ticks.
///
/// # Examples
///
/// ```rust
/// use core_async::time::{interval_after, Duration};
///
/// # async fn example() {
/// let mut ticker = interval_after(Duration::from_millis(250));
/// ticker.tick().await; // ~250ms later
/// # }
/// ```
pub fn interval_after(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Returns the current time as milliseconds since UNIX_EPOCH.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_interval_after_waits_one_period() {
        let start = Instant::now();
        let mut ticker = interval_after(Duration::from_millis(250));
        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(250));
        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[test]
    fn test_now_millis_is_after_epoch() {
        assert!(now_millis() > 0);
    }
}
