//! Test doubles for the hardware abstraction layer. Only available
//! on non-ARM targets.

pub mod error;
pub mod flash;
pub mod gpio;
pub mod time;
