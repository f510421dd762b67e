//! Time units.

#[derive(Clone, Copy, Debug, PartialOrd, Ord, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Milliseconds(pub u32);

#[derive(Clone, Copy, Debug, PartialOrd, Ord, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Seconds(pub u32);

/// Blocking delay source.
pub trait Delay {
    fn delay(&mut self, period: Milliseconds);
}

impl core::ops::Add for Milliseconds {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Milliseconds(self.0.saturating_add(rhs.0)) }
}
