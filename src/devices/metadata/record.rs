//! CRC protected metadata record.
//!
//! Row layout, all fields little endian:
//!
//! | Offset      | Field                        |
//! |-------------|------------------------------|
//! | 0           | Updater slot start (`u32`)   |
//! | 4           | Updater slot size (`u32`)    |
//! | 8           | User slot start (`u32`)      |
//! | 12          | User slot size (`u32`)       |
//! | 16..ROW-4   | Engine owned, opaque         |
//! | ROW-4       | CRC-32C over bytes 0..ROW-4  |
//!
//! A row is valid when its stored CRC matches the computed one. Erased
//! (`0xFF`) and zeroed rows are never valid.
use super::MetadataAccess;
use crate::{
    devices::{row_store::RowStore, slot::Slot},
    error::Error,
    hal::flash,
    utilities::memory::Span,
};
use core::mem::size_of;
use crc::crc32;

const ENTRY_SIZE: usize = 2 * size_of::<u32>();
const CRC_SIZE: usize = size_of::<u32>();
const SLOT_COUNT: usize = 2;

/// In-memory copy of one metadata row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataRecord<const ROW: usize> {
    row: [u8; ROW],
}

impl<const ROW: usize> MetadataRecord<ROW> {
    const FITS: () = assert!(ROW >= SLOT_COUNT * ENTRY_SIZE + CRC_SIZE, "Row too small");

    /// A valid record with every field zeroed.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS;
        let mut record = Self { row: [0u8; ROW] };
        record.seal();
        record
    }

    /// Interprets `row`, failing if its CRC does not match.
    pub fn from_row(row: [u8; ROW]) -> Result<Self, Error> {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS;
        let record = Self { row };
        if record.stored_crc() == record.computed_crc() {
            Ok(record)
        } else {
            Err(Error::MetadataInvalid)
        }
    }

    /// Like [`from_row`](Self::from_row), but keeps the fields of an invalid
    /// row so they can be patched and resealed.
    pub fn from_row_unchecked(row: [u8; ROW]) -> Self { Self { row } }

    pub fn entry(&self, slot: Slot) -> Span {
        let offset = slot.index() as usize * ENTRY_SIZE;
        Span { start: self.word(offset), size: self.word(offset + size_of::<u32>()) }
    }

    /// Overwrites the entry for `slot`, leaving every other field as is.
    pub fn set_entry(&mut self, slot: Slot, span: Span) {
        let offset = slot.index() as usize * ENTRY_SIZE;
        self.set_word(offset, span.start);
        self.set_word(offset + size_of::<u32>(), span.size);
        self.seal();
    }

    pub fn into_row(self) -> [u8; ROW] { self.row }

    fn seal(&mut self) {
        let crc = self.computed_crc();
        self.set_word(ROW - CRC_SIZE, crc);
    }

    fn stored_crc(&self) -> u32 { self.word(ROW - CRC_SIZE) }
    fn computed_crc(&self) -> u32 { crc32::checksum_castagnoli(&self.row[..ROW - CRC_SIZE]) }

    fn word(&self, offset: usize) -> u32 {
        // Offsets are fixed by the layout above and always in range
        let bytes: [u8; 4] = self.row[offset..offset + 4].try_into().unwrap_or([0xFF; 4]);
        u32::from_le_bytes(bytes)
    }

    fn set_word(&mut self, offset: usize, value: u32) {
        self.row[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}

impl<const ROW: usize> Default for MetadataRecord<ROW> {
    fn default() -> Self { Self::new() }
}

/// [`MetadataAccess`] for rows holding a [`MetadataRecord`].
#[derive(Copy, Clone, Debug, Default)]
pub struct CrcMetadata;

impl<F, const ROW: usize> MetadataAccess<F, ROW> for CrcMetadata
where
    F: flash::ReadWrite,
    Error: From<F::Error>,
{
    fn validate_metadata(
        &mut self,
        rows: &mut RowStore<F, ROW>,
        row: F::Address,
    ) -> Result<(), Error> {
        let mut bytes = [0u8; ROW];
        rows.read_row(row, &mut bytes)?;
        MetadataRecord::from_row(bytes).map(|_| ())
    }

    fn set_initial_metadata(
        &mut self,
        rows: &mut RowStore<F, ROW>,
        row: F::Address,
        slot: Slot,
        span: Span,
    ) -> Result<(), Error> {
        let mut bytes = [0u8; ROW];
        rows.read_row(row, &mut bytes)?;
        let mut record = MetadataRecord::from_row_unchecked(bytes);
        record.set_entry(slot, span);
        rows.write_row(row, &record.into_row())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ROW: usize = 32;

    #[test]
    fn sealed_records_validate() {
        // Given
        let mut record = MetadataRecord::<ROW>::new();
        record.set_entry(Slot::User, Span { start: 0x1001_0000, size: 0x2_0000 });

        // When
        let parsed = MetadataRecord::from_row(record.clone().into_row()).unwrap();

        // Then
        assert_eq!(parsed, record);
        assert_eq!(parsed.entry(Slot::User), Span { start: 0x1001_0000, size: 0x2_0000 });
        assert_eq!(parsed.entry(Slot::Updater), Span { start: 0, size: 0 });
    }

    #[test]
    fn erased_and_zeroed_rows_are_invalid() {
        assert_eq!(MetadataRecord::from_row([0xFF; ROW]), Err(Error::MetadataInvalid));
        assert_eq!(MetadataRecord::from_row([0x00; ROW]), Err(Error::MetadataInvalid));
    }

    #[test]
    fn any_flipped_bit_invalidates_the_row() {
        let row = MetadataRecord::<ROW>::new().into_row();
        for byte in 0..ROW {
            let mut corrupted = row;
            corrupted[byte] ^= 0x01;
            assert_eq!(MetadataRecord::from_row(corrupted), Err(Error::MetadataInvalid));
        }
    }

    #[test]
    fn setting_an_entry_keeps_other_fields() {
        // Given
        let mut row = [0xFF; ROW];
        row[16] = 0x42; // Engine owned byte
        let mut record = MetadataRecord::from_row_unchecked(row);

        // When
        record.set_entry(Slot::Updater, Span { start: 0x1000_0000, size: 0x8000 });
        let row = record.into_row();

        // Then
        let record = MetadataRecord::from_row(row).unwrap();
        assert_eq!(record.entry(Slot::Updater), Span { start: 0x1000_0000, size: 0x8000 });
        assert_eq!(record.entry(Slot::User), Span { start: 0xFFFF_FFFF, size: 0xFFFF_FFFF });
        assert_eq!(row[16], 0x42);
    }
}
