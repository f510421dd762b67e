//! Interfaces to the external collaborators of the orchestrator.
//!
//! The update engine, its transport, the image validator and the
//! execution switch are supplied by the platform. The orchestrator only
//! sequences them.
use super::slot::Slot;
use crate::{error::Error, hal::time::Milliseconds};
use core::convert::Infallible;

/// Progress of the update exchange, as reported by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Waiting for the host to begin an exchange.
    #[default]
    Idle,
    /// An exchange is in progress.
    Updating,
    /// A complete image has been received.
    Finished,
    /// The engine gave up on the current exchange.
    Failed,
}

/// Update transport lifecycle.
pub trait Transport {
    fn start(&mut self);
    fn stop(&mut self);
    /// Discards any exchange in progress so a fresh one may begin.
    fn reset(&mut self);
}

/// Update protocol engine.
pub trait UpdateEngine {
    /// Prepares a fresh session and returns its initial state.
    fn init(&mut self) -> SessionState;

    /// Advances the protocol by one step, blocking up to `timeout`.
    ///
    /// `state` is updated regardless of the outcome. [`Error::Timeout`]
    /// means nothing arrived in time, [`Error::VerifyFailed`] that a packet
    /// failed its integrity check; anything else is a protocol failure.
    fn resume(&mut self, state: &mut SessionState, timeout: Milliseconds) -> Result<(), Error>;
}

/// Image integrity check.
pub trait Validator {
    /// Returns [`Error::VerifyFailed`] if `slot` does not hold a valid image.
    fn validate(&mut self, slot: Slot) -> Result<(), Error>;
}

/// Irreversible transfer of control to another application.
///
/// The success type is uninhabited: a call that returns at all has failed,
/// so `match switch.execute(slot)? {}` marks the end of a code path.
pub trait Switch {
    fn execute(&mut self, slot: Slot) -> Result<Infallible, Error>;
}

/// Cause of the last reset, as latched by the platform.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetReason {
    /// Nothing latched, or already cleared.
    None,
    PowerOn,
    Pin,
    Watchdog,
    Lockup,
    /// Requested by firmware, e.g. by a switch to another application.
    Software,
}

impl ResetReason {
    pub fn is_software(self) -> bool { matches!(self, ResetReason::Software) }
}

/// Access to the reset reason register.
pub trait ResetCause {
    fn reason(&self) -> ResetReason;
    fn clear(&mut self);
}
