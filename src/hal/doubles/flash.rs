use super::error::FakeError;
use crate::hal::flash;
use std::{
    cmp::max,
    ops::{Add, Sub},
};

/// Byte addressable flash stored in RAM. Unwritten bytes read as erased
/// (`0xFF`). Counts program cycles and can be told to fail them.
pub struct FakeFlash {
    base: Address,
    data: Vec<u8>,
    pub writes: usize,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl FakeFlash {
    pub fn new(base: Address) -> FakeFlash {
        FakeFlash {
            base,
            data: Vec::new(),
            writes: 0,
            fail_reads: false,
            fail_writes: false,
        }
    }

    /// Raw contents of `length` bytes at `address`, bypassing failure injection.
    pub fn peek(&self, address: Address, length: usize) -> Vec<u8> {
        let offset = address - self.base;
        (offset..offset + length).map(|i| self.data.get(i).copied().unwrap_or(0xFF)).collect()
    }
}

#[derive(Copy, Clone, Debug, Ord, PartialOrd, PartialEq, Eq)]
pub struct Address(pub u32);

impl flash::ReadWrite for FakeFlash {
    type Error = FakeError;
    type Address = Address;

    fn read(&mut self, address: Self::Address, bytes: &mut [u8]) -> nb::Result<(), Self::Error> {
        if self.fail_reads || address < self.base {
            Err(nb::Error::Other(FakeError::Read))
        } else {
            let offset = address - self.base;
            bytes
                .iter_mut()
                .enumerate()
                .for_each(|(i, o)| *o = self.data.get(offset + i).copied().unwrap_or(0xFF));
            Ok(())
        }
    }

    fn write(&mut self, address: Self::Address, bytes: &[u8]) -> nb::Result<(), Self::Error> {
        if self.fail_writes || address < self.base {
            Err(nb::Error::Other(FakeError::Write))
        } else {
            let offset = address - self.base;
            self.data.resize(max(self.data.len(), offset + bytes.len()), 0xFF);
            self.data.iter_mut().skip(offset).zip(bytes).for_each(|(o, i)| *o = *i);
            self.writes += 1;
            Ok(())
        }
    }

    fn label() -> &'static str { "Fake Flash" }
}

impl Add<usize> for Address {
    type Output = Address;
    fn add(self, rhs: usize) -> Self::Output { Address(self.0 + rhs as u32) }
}

impl Sub<Address> for Address {
    type Output = usize;
    fn sub(self, rhs: Address) -> Self::Output { self.0.saturating_sub(rhs.0) as usize }
}
