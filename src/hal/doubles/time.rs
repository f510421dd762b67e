use crate::hal::time::{Delay, Milliseconds};

/// Delay that returns immediately, remembering every requested period.
#[derive(Debug, Default)]
pub struct FakeDelay {
    pub periods: Vec<Milliseconds>,
}

impl FakeDelay {
    pub fn total(&self) -> Milliseconds {
        self.periods.iter().fold(Milliseconds(0), |total, period| total + *period)
    }
}

impl Delay for FakeDelay {
    fn delay(&mut self, period: Milliseconds) { self.periods.push(period); }
}
