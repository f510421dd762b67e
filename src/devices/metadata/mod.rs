//! Redundant update metadata.
//!
//! The metadata row (MD) describes where each application lives and how to
//! check it. A copy (MDC) sits in the row right after it. The
//! [`MetadataGuard`] runs once per cold boot, before any other decision, and
//! leaves MD valid:
//!
//! * MD valid: MDC is refreshed from MD if they differ.
//! * MD invalid, MDC valid: MD is restored from MDC.
//! * Both invalid: MD is rewritten with an initial record that only
//!   describes the updater slot, so there is always a recoverable boot target.
//!
//! Any storage failure during the repair is fatal and is propagated for the
//! caller to halt on.
use crate::{
    devices::{row_store::RowStore, slot::Slot},
    error::Error,
    hal::flash,
    utilities::memory::Span,
};

pub mod record;

/// Interpretation of a metadata row. The binary layout belongs to the
/// update engine; the guard only needs to know whether a row is valid and
/// how to produce a fresh one.
pub trait MetadataAccess<F: flash::ReadWrite, const ROW: usize> {
    /// Checks the row at `row`. A row that is merely malformed is reported
    /// as [`Error::MetadataInvalid`]; fatal errors mean the row could not
    /// be inspected at all.
    fn validate_metadata(
        &mut self,
        rows: &mut RowStore<F, ROW>,
        row: F::Address,
    ) -> Result<(), Error>;

    /// Makes `row` a valid record in which `slot` spans `span`.
    fn set_initial_metadata(
        &mut self,
        rows: &mut RowStore<F, ROW>,
        row: F::Address,
        slot: Slot,
        span: Span,
    ) -> Result<(), Error>;
}

/// Path taken by a repair pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Repair {
    /// Both rows valid and identical; nothing written.
    Intact,
    /// MD valid, MDC differed and was overwritten from MD.
    CopyRefreshed,
    /// MD invalid, restored from a valid MDC.
    Restored,
    /// Both rows invalid, MD rewritten with the initial record.
    Reinitialized,
}

pub struct MetadataGuard<F: flash::ReadWrite, M, const ROW: usize> {
    rows: RowStore<F, ROW>,
    access: M,
    primary: F::Address,
    fallback: Span,
}

impl<F, M, const ROW: usize> MetadataGuard<F, M, ROW>
where
    F: flash::ReadWrite,
    M: MetadataAccess<F, ROW>,
    Error: From<F::Error>,
{
    /// Guards the metadata row at `primary`, with its copy in the row after
    /// it. `fallback` is the known location of the updater application.
    pub fn new(flash: F, access: M, primary: F::Address, fallback: Span) -> Self {
        Self { rows: RowStore::new(flash), access, primary, fallback }
    }

    pub fn primary(&self) -> F::Address { self.primary }
    pub fn copy(&self) -> F::Address { self.primary + ROW }

    /// Runs one repair pass. On success MD is valid.
    pub fn repair(&mut self) -> Result<Repair, Error> {
        let (md, mdc) = (self.primary(), self.copy());

        if self.is_valid(md)? {
            if self.rows.compare(md, mdc)? {
                return Ok(Repair::Intact);
            }
            log_info!("Metadata copy differs from primary. Refreshing copy...");
            self.rows.copy(mdc, md)?;
            return Ok(Repair::CopyRefreshed);
        }

        if self.is_valid(mdc)? {
            log_warn!("Primary metadata invalid. Restoring from copy...");
            self.rows.copy(md, mdc)?;
            return Ok(Repair::Restored);
        }

        log_warn!("Both metadata rows invalid. Writing initial record...");
        self.access.set_initial_metadata(&mut self.rows, md, Slot::Updater, self.fallback)?;
        Ok(Repair::Reinitialized)
    }

    fn is_valid(&mut self, row: F::Address) -> Result<bool, Error> {
        match self.access.validate_metadata(&mut self.rows, row) {
            Ok(()) => Ok(true),
            Err(error) if error.is_fatal() => Err(error),
            Err(_) => Ok(false),
        }
    }

    pub fn rows(&mut self) -> &mut RowStore<F, ROW> { &mut self.rows }
    pub fn access(&self) -> &M { &self.access }
}
