//! Non-blocking button debouncer.
//!
//! The button is sampled once per loop iteration together with the time
//! elapsed since the previous sample. A click is reported only after the
//! press held for the press confirmation window and the release then held
//! for the release confirmation window, so the caller's loop never blocks
//! waiting for the user to let go.
use crate::hal::time::Milliseconds;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum State {
    Released,
    Confirming(Milliseconds),
    Held,
    Releasing(Milliseconds),
}

/// A debounced press followed by a debounced release.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Click;

pub struct Debouncer {
    state: State,
    press_confirm: Milliseconds,
    release_confirm: Milliseconds,
}

impl Debouncer {
    pub fn new(press_confirm: Milliseconds, release_confirm: Milliseconds) -> Self {
        Self { state: State::Released, press_confirm, release_confirm }
    }

    /// Feeds one sample. `pressed` is the raw button level, `elapsed` the
    /// time since the previous sample.
    pub fn update(&mut self, pressed: bool, elapsed: Milliseconds) -> Option<Click> {
        let (next, click) = match (self.state, pressed) {
            (State::Released, true) => (State::Confirming(Milliseconds(0)), None),
            (State::Released, false) => (State::Released, None),
            (State::Confirming(held), true) => {
                let held = held + elapsed;
                if held >= self.press_confirm {
                    (State::Held, None)
                } else {
                    (State::Confirming(held), None)
                }
            }
            // Bounce
            (State::Confirming(_), false) => (State::Released, None),
            (State::Held, true) => (State::Held, None),
            (State::Held, false) => (State::Releasing(Milliseconds(0)), None),
            (State::Releasing(_), true) => (State::Held, None),
            (State::Releasing(released), false) => {
                let released = released + elapsed;
                if released >= self.release_confirm {
                    (State::Released, Some(Click))
                } else {
                    (State::Releasing(released), None)
                }
            }
        };
        self.state = next;
        click
    }
}
