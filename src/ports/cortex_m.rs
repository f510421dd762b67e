//! Cortex-M implementation of the execution switch.
//!
//! A switch writes the requested slot into a word of RAM that survives a
//! warm reset, then resets the core. Early in the reset handler of the
//! application that boots, [`on_reset`] picks up the request and jumps to
//! the requested slot's vector table. The hop through a reset leaves every
//! peripheral in its reset state for the application that takes over, and
//! latches a software reset reason so the updater knows not to bounce
//! straight back.
use crate::{
    devices::{
        interfaces::Switch,
        slot::{Slot, VectorTable},
        switch_signal::{self, ReadSwitchSignal, SwitchRequest, WriteSwitchSignal},
    },
    error::Error,
    hal::time::{self, Milliseconds},
};
use core::{convert::Infallible, ptr};
use cortex_m::{asm, delay, interrupt, peripheral::SCB};

/// One word of RAM excluded from initialisation by the linker script.
pub struct RetainedWord {
    word: *mut u32,
}

impl RetainedWord {
    /// # Safety
    ///
    /// `word` must point to valid, aligned RAM that no other code uses and
    /// that the startup code never zeroes.
    pub unsafe fn new(word: *mut u32) -> Self { Self { word } }
}

impl ReadSwitchSignal for RetainedWord {
    fn read_switch_request(&self) -> SwitchRequest {
        // NOTE(Safety): Validity of the pointer is guaranteed on construction.
        SwitchRequest::decode(unsafe { ptr::read_volatile(self.word) })
    }
}

impl WriteSwitchSignal for RetainedWord {
    fn write_switch_request(&mut self, request: SwitchRequest) {
        // NOTE(Safety): Validity of the pointer is guaranteed on construction.
        unsafe { ptr::write_volatile(self.word, request.encode()) }
    }
}

/// Switch that hands over through a software reset.
pub struct ResetSwitch<S: WriteSwitchSignal> {
    signal: S,
}

impl<S: WriteSwitchSignal> ResetSwitch<S> {
    pub fn new(signal: S) -> Self { Self { signal } }
}

impl<S: WriteSwitchSignal> Switch for ResetSwitch<S> {
    fn execute(&mut self, slot: Slot) -> Result<Infallible, Error> {
        log_warn!("Switching to {}. This will break `defmt`.", slot);
        self.signal.write_switch_request(SwitchRequest::Boot(slot));
        asm::dsb();
        SCB::sys_reset();
    }
}

/// Acts on a pending switch request. `vector_tables` holds the vector
/// table address of each slot, indexed by [`Slot::index`].
///
/// Returns normally when there is no request, so the current application
/// boots.
///
/// # Safety
///
/// Must run before anything else in the reset handler: no stack frames,
/// peripherals or interrupts of the current application may be relied on
/// after the jump.
pub unsafe fn on_reset<S>(signal: &mut S, vector_tables: [u32; 2]) -> Result<(), Error>
where
    S: ReadSwitchSignal + WriteSwitchSignal,
{
    let slot = match switch_signal::take_request(signal) {
        SwitchRequest::None => return Ok(()),
        SwitchRequest::Boot(slot) => slot,
    };

    let address = vector_tables[slot.index() as usize];
    let table = VectorTable {
        stack_pointer: ptr::read_volatile(address as *const u32),
        reset_vector: ptr::read_volatile((address + 4) as *const u32),
    };
    if !table.is_plausible() {
        return Err(Error::SlotNotBootable);
    }

    // NOTE(Safety): Thoroughly unsafe, for obvious reasons: we are jumping to
    // an entirely different firmware image and must assume everything is at
    // the right place. After the interrupts are disabled, there is no turning
    // back.
    interrupt::disable();
    (*SCB::PTR).vtor.write(address);
    asm::bootload(address as *const u32)
}

/// Stops the core after a fatal error.
pub fn halt(error: Error) -> ! {
    error.report();
    interrupt::disable();
    loop {
        asm::wfi();
    }
}

impl time::Delay for delay::Delay {
    fn delay(&mut self, period: Milliseconds) { self.delay_ms(period.0) }
}
