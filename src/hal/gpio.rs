//! # Simple GPIO interface
//!
//! Separate interfaces to Input and Output pins, to be implemented
//! by the board port for the pins it hands to the orchestrator.

/// Interface to a writable pin.
pub trait OutputPin {
    fn set_low(&mut self);
    fn set_high(&mut self);
}

/// Interface to a readable pin.
pub trait InputPin {
    fn is_high(&self) -> bool;
    fn is_low(&self) -> bool;
}
