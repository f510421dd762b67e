//! Convenience macros for the orchestrator project
#![macro_use]

/// Logs through `defmt` when the `defmt` feature is enabled. Otherwise the
/// arguments are only borrowed, so host builds need no global logger and
/// raise no unused variable warnings.
///
/// Only usable in statement position.
macro_rules! log_info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        #[cfg(feature = "defmt")]
        defmt::info!($fmt $(, $arg)*);
        #[cfg(not(feature = "defmt"))]
        { $( let _ = &$arg; )* }
    };
}

/// See [`log_info`].
macro_rules! log_warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        #[cfg(feature = "defmt")]
        defmt::warn!($fmt $(, $arg)*);
        #[cfg(not(feature = "defmt"))]
        { $( let _ = &$arg; )* }
    };
}

/// See [`log_info`].
macro_rules! log_error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        #[cfg(feature = "defmt")]
        defmt::error!($fmt $(, $arg)*);
        #[cfg(not(feature = "defmt"))]
        { $( let _ = &$arg; )* }
    };
}

/// See [`log_info`].
macro_rules! log_debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        #[cfg(feature = "defmt")]
        defmt::debug!($fmt $(, $arg)*);
        #[cfg(not(feature = "defmt"))]
        { $( let _ = &$arg; )* }
    };
}

/// Define and export a specific port module (transparently pulls
/// its namespace to the current one).
///
/// Used mostly to conveniently fit the module declaration and reexport
/// under a single configuration flag.
///
/// # Example
/// ```ignore
/// #[cfg(target_arch = "arm")]
/// port!(cortex_m);
/// // Expands into:
/// pub mod cortex_m;
/// pub use self::cortex_m::*;
/// ```
#[allow(unused_macros)]
macro_rules! port {
    ($mod:ident) => {
        pub mod $mod;
        pub use self::$mod::*;
    };
    ($mod:ident as $name:ident) => {
        pub mod $mod;
        pub use self::$mod as $name;
    };
}

/// Kilobytes to bytes.
macro_rules! kb {
    ($val:expr) => {
        $val * 1024
    };
}
