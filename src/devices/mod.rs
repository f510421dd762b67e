//! Complex modules with business logic related to the problem
//! domain, that lay on top of abstract drivers. Devices are
//! generic, while target specifics are handled in the `ports`
//! module.

pub mod debounce;
pub mod heartbeat;
pub mod interfaces;
pub mod led;
pub mod metadata;
pub mod row_store;
pub mod session_timer;
pub mod slot;
pub mod switch_signal;
pub mod updater;
pub mod user_app;

#[cfg(not(target_arch = "arm"))]
#[doc(hidden)]
pub mod doubles;
