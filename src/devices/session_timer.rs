//! Conversion between wall clock timeouts and polling ticks.
//!
//! The update loop never reads a clock. Each call into the update engine
//! blocks for at most one poll interval, so a count of polls is a (slightly
//! pessimistic) measure of elapsed time.
use crate::hal::time::{Milliseconds, Seconds};

/// Number of polls of `poll_interval` that add up to `seconds`.
///
/// The division truncates: pick intervals that divide the timeout evenly
/// for exact timing, otherwise the real elapsed time slightly exceeds
/// the requested one.
///
/// # Panics
///
/// When `poll_interval` is zero, or `seconds` exceeds
/// [`MAX_TIMEOUT`](crate::config::MAX_TIMEOUT).
pub const fn ticks_for(seconds: Seconds, poll_interval: Milliseconds) -> u32 {
    (seconds.0 * 1000) / poll_interval.0
}
