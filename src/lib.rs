//! # Dual Image Update Orchestrator
//!
//! This crate contains all functionality for driving firmware updates
//! on a dual-core MCU that hosts two applications: an updater (App0)
//! and a user application (App1). It keeps the redundant update metadata
//! consistent, decides when to hand control to the user application, and
//! supervises the update session so that the device always remains
//! recoverable.
#![cfg_attr(test, allow(unused_imports))]
#![cfg_attr(target_arch = "arm", no_std)]

#[cfg(all(feature = "defmt", target_arch = "arm"))]
use defmt_rtt as _;

#[macro_use]
pub mod utilities {
    #[macro_use]
    mod macros;
    pub mod memory;
}

pub mod config;
pub mod devices;
pub mod error;
pub mod hal;
pub mod ports;
