//! LED driven by a single GPIO.
use crate::hal::{gpio::OutputPin, led};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Logic {
    /// Logical high equals "on"
    Direct,
    /// Logical high equals "off"
    Inverted,
}

/// Solid (non-blinking) monochrome LED
///
/// # Example
/// ```
/// # use twinload_lib::devices::led::*;
/// # use twinload_lib::hal::led::Toggle;
/// # use twinload_lib::hal::doubles::gpio::MockPin;
/// # let pin = MockPin::default();
/// let mut led = MonochromeLed::new(pin, Logic::Inverted);
///
/// led.toggle();
/// assert!(led.is_on());
/// # assert!(!led.pin().state);
/// ```
pub struct MonochromeLed<Pin: OutputPin> {
    pin: Pin,
    is_on: bool,
    logic: Logic,
}

// Extension trait to ensure LED pins are correctly
// operated based on the led's direct or inverted logic
trait LedPin: OutputPin {
    fn off(&mut self, logic: Logic) {
        if let Logic::Direct = logic {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    fn on(&mut self, logic: Logic) {
        if let Logic::Direct = logic {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

// Blanket implementation of LedPin for all output pins
impl<Pin: OutputPin> LedPin for Pin {}

impl<Pin: OutputPin> MonochromeLed<Pin> {
    pub fn new(mut pin: Pin, logic: Logic) -> Self {
        pin.off(logic);
        Self { pin, is_on: false, logic }
    }

    pub fn is_on(&self) -> bool { self.is_on }
    pub fn pin(&self) -> &Pin { &self.pin }
}

impl<Pin: OutputPin> led::Toggle for MonochromeLed<Pin> {
    fn on(&mut self) {
        if !self.is_on {
            self.pin.on(self.logic);
        }
        self.is_on = true;
    }

    fn off(&mut self) {
        if self.is_on {
            self.pin.off(self.logic);
        }
        self.is_on = false;
    }

    fn toggle(&mut self) {
        if self.is_on {
            led::Toggle::off(self);
        } else {
            led::Toggle::on(self);
        }
    }
}
