//! Liveness indication through a blinking LED.
use crate::hal::{led::Toggle, time::Milliseconds};

/// Toggles a LED every `period`, driven by the elapsed time reported by
/// the caller's loop.
pub struct Heartbeat {
    period: Milliseconds,
    elapsed: Milliseconds,
}

impl Heartbeat {
    pub fn new(period: Milliseconds) -> Self { Self { period, elapsed: Milliseconds(0) } }

    pub fn tick<L: Toggle>(&mut self, led: &mut L, elapsed: Milliseconds) {
        self.elapsed = self.elapsed + elapsed;
        if self.elapsed >= self.period {
            self.elapsed = Milliseconds(self.elapsed.0 - self.period.0);
            led.toggle();
        }
    }
}
