//! Target specific glue. Devices stay generic; the pieces that touch
//! core registers directly live here.

#[cfg(target_arch = "arm")]
port!(cortex_m);
