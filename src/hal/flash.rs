//! Flash interfaces.
use crate::utilities::memory::Address;
use core::fmt;

/// Reads and writes ranges of bytes, generic over an address.
///
/// `write` is a high level write that abstracts away the need to first
/// erase, or to keep writes inside row boundaries. A write spanning a
/// single row reprograms that row only, with whatever atomicity the
/// underlying program cycle guarantees.
pub trait ReadWrite {
    type Error: Clone + Copy + fmt::Debug;
    type Address: Address;
    fn read(&mut self, address: Self::Address, bytes: &mut [u8]) -> nb::Result<(), Self::Error>;
    fn write(&mut self, address: Self::Address, bytes: &[u8]) -> nb::Result<(), Self::Error>;
    fn label() -> &'static str;
}
