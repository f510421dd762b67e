//! Timing and memory layout constants, and the runtime [`Config`] built
//! from them.
//!
//! The timing constants encode the recovery time of the device: how long
//! a stalled exchange may hang before it is abandoned, and how long the
//! updater idles before giving up on updates and booting whatever is valid.
use crate::{
    devices::session_timer::ticks_for,
    error::Error,
    hal::time::{Milliseconds, Seconds},
    utilities::memory::Span,
};
use static_assertions::const_assert;

/// Upper bound for a single blocking step of the update engine.
pub const POLL_INTERVAL: Milliseconds = Milliseconds(20);
/// An exchange with no successful packet for this long is abandoned.
pub const STALL_TIMEOUT: Seconds = Seconds(5);
/// An idle updater falls back to the user application after this long.
pub const NO_IMAGE_TIMEOUT: Seconds = Seconds(300);
/// A button press must hold this long to count.
pub const PRESS_CONFIRM: Milliseconds = Milliseconds(50);
/// A button release must hold this long to count.
pub const RELEASE_CONFIRM: Milliseconds = Milliseconds(50);
/// LED toggle period while the updater runs.
pub const UPDATER_HEARTBEAT: Milliseconds = Milliseconds(1_000);
/// LED toggle period while the user application runs.
pub const USER_HEARTBEAT: Milliseconds = Milliseconds(250);

/// Fixed location of the updater application, used to rebuild the
/// metadata when both copies are lost.
pub const UPDATER_SLOT_START: u32 = 0x1000_0000;
pub const UPDATER_SLOT_SIZE: u32 = kb!(32);
/// Metadata occupies exactly one flash row; its copy sits in the next one.
pub const METADATA_ROW_SIZE: usize = 512;
pub const METADATA_ADDRESS: u32 = 0x100F_FA00;
/// Longest timeout whose length in milliseconds still fits a `u32`.
pub const MAX_TIMEOUT: Seconds = Seconds(u32::MAX / 1000);

const_assert!(POLL_INTERVAL.0 > 0);
const_assert!(ticks_for(STALL_TIMEOUT, POLL_INTERVAL) * POLL_INTERVAL.0 == STALL_TIMEOUT.0 * 1000);
const_assert!(
    ticks_for(NO_IMAGE_TIMEOUT, POLL_INTERVAL) * POLL_INTERVAL.0 == NO_IMAGE_TIMEOUT.0 * 1000
);
const_assert!(ticks_for(STALL_TIMEOUT, POLL_INTERVAL) < ticks_for(NO_IMAGE_TIMEOUT, POLL_INTERVAL));
const_assert!(METADATA_ROW_SIZE % 4 == 0);
const_assert!(NO_IMAGE_TIMEOUT.0 <= MAX_TIMEOUT.0);

/// Runtime configuration of the orchestrator.
///
/// # Example
/// ```
/// # use twinload_lib::config::Config;
/// # use twinload_lib::hal::time::{Milliseconds, Seconds};
/// let config = Config::default().poll_interval(Milliseconds(10)).stall_timeout(Seconds(2));
/// assert_eq!(config.stall_ticks(), 200);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub poll_interval: Milliseconds,
    pub stall_timeout: Seconds,
    pub no_image_timeout: Seconds,
    pub press_confirm: Milliseconds,
    pub release_confirm: Milliseconds,
    pub heartbeat: Milliseconds,
    pub updater_slot: Span,
    pub metadata: Span,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            stall_timeout: STALL_TIMEOUT,
            no_image_timeout: NO_IMAGE_TIMEOUT,
            press_confirm: PRESS_CONFIRM,
            release_confirm: RELEASE_CONFIRM,
            heartbeat: UPDATER_HEARTBEAT,
            updater_slot: Span { start: UPDATER_SLOT_START, size: UPDATER_SLOT_SIZE },
            // Primary row followed by its redundant copy
            metadata: Span { start: METADATA_ADDRESS, size: 2 * METADATA_ROW_SIZE as u32 },
        }
    }
}

impl Config {
    pub fn poll_interval(mut self, poll_interval: Milliseconds) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn stall_timeout(mut self, stall_timeout: Seconds) -> Self {
        self.stall_timeout = stall_timeout;
        self
    }

    pub fn no_image_timeout(mut self, no_image_timeout: Seconds) -> Self {
        self.no_image_timeout = no_image_timeout;
        self
    }

    pub fn debounce(mut self, press_confirm: Milliseconds, release_confirm: Milliseconds) -> Self {
        self.press_confirm = press_confirm;
        self.release_confirm = release_confirm;
        self
    }

    pub fn heartbeat(mut self, heartbeat: Milliseconds) -> Self {
        self.heartbeat = heartbeat;
        self
    }

    pub fn updater_slot(mut self, start: u32, size: u32) -> Self {
        self.updater_slot = Span { start, size };
        self
    }

    /// Polls without a successful exchange before the session is abandoned.
    pub fn stall_ticks(&self) -> u32 { ticks_for(self.stall_timeout, self.poll_interval) }

    /// Idle polls before the updater falls back to the user application.
    pub fn no_image_ticks(&self) -> u32 { ticks_for(self.no_image_timeout, self.poll_interval) }

    /// Rejects configurations the orchestrator cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.poll_interval.0 == 0 {
            return Err(Error::ConfigurationError("Poll interval must be greater than zero"));
        }
        if self.stall_timeout > MAX_TIMEOUT || self.no_image_timeout > MAX_TIMEOUT {
            return Err(Error::ConfigurationError("Timeout too long"));
        }
        if self.stall_ticks() == 0 || self.stall_ticks() >= self.no_image_ticks() {
            return Err(Error::ConfigurationError(
                "Stall timeout must be shorter than idle timeout",
            ));
        }
        if self.updater_slot.size == 0 {
            return Err(Error::ConfigurationError("Updater slot is empty"));
        }
        if self.updater_slot.overlaps(&self.metadata) {
            return Err(Error::ConfigurationError("Metadata rows overlap the updater slot"));
        }
        Ok(())
    }
}
