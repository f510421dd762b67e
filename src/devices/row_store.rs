//! Whole-row access to a flash device.
//!
//! Rows are the smallest unit the flash programs at once. This layer adds
//! no atomicity of its own: a copy is a single row program cycle, so a power
//! loss leaves the destination either untouched or rewritten, to the extent
//! the flash itself guarantees that.
use crate::{error::Error, hal::flash};
use nb::block;

/// Flash viewed as a sequence of `ROW` byte rows.
pub struct RowStore<F: flash::ReadWrite, const ROW: usize> {
    flash: F,
}

impl<F, const ROW: usize> RowStore<F, ROW>
where
    F: flash::ReadWrite,
    Error: From<F::Error>,
{
    pub fn new(flash: F) -> Self { Self { flash } }

    /// Whether the rows at `a` and `b` hold the same bytes. Never writes.
    pub fn compare(&mut self, a: F::Address, b: F::Address) -> Result<bool, Error> {
        let mut first = [0u8; ROW];
        let mut second = [0u8; ROW];
        self.read_row(a, &mut first)?;
        self.read_row(b, &mut second)?;
        Ok(first == second)
    }

    /// Programs the row at `dest` with the contents of the row at `src`.
    /// Failures are propagated and never retried.
    pub fn copy(&mut self, dest: F::Address, src: F::Address) -> Result<(), Error> {
        let mut buffer = [0u8; ROW];
        self.read_row(src, &mut buffer)?;
        self.write_row(dest, &buffer)
    }

    pub fn read_row(&mut self, address: F::Address, row: &mut [u8; ROW]) -> Result<(), Error> {
        Ok(block!(self.flash.read(address, row))?)
    }

    pub fn write_row(&mut self, address: F::Address, row: &[u8; ROW]) -> Result<(), Error> {
        log_debug!("Programming row [{}]", F::label());
        Ok(block!(self.flash.write(address, row))?)
    }

    pub fn flash(&self) -> &F { &self.flash }
    pub fn flash_mut(&mut self) -> &mut F { &mut self.flash }
}
