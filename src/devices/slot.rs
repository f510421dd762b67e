//! Application slot identifiers.

/// One of the two independently loadable applications.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// App0, which runs the update session.
    Updater,
    /// App1, the user application the updater installs.
    User,
}

impl Slot {
    pub const fn index(self) -> u8 {
        match self {
            Slot::Updater => 0,
            Slot::User => 1,
        }
    }

    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Slot::Updater),
            1 => Some(Slot::User),
            _ => None,
        }
    }
}

/// First two words of an application's vector table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VectorTable {
    pub stack_pointer: u32,
    pub reset_vector: u32,
}

impl VectorTable {
    /// Cheap sanity check before jumping: an aligned stack pointer and a
    /// Thumb mode reset handler, neither of them erased flash.
    pub fn is_plausible(&self) -> bool {
        const ERASED: u32 = 0xFFFF_FFFF;
        self.stack_pointer != ERASED
            && self.stack_pointer != 0
            && self.stack_pointer % 4 == 0
            && self.reset_vector != ERASED
            && self.reset_vector & 1 == 1
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn slot_indices_map_both_ways() {
        for slot in [Slot::Updater, Slot::User] {
            assert_eq!(Slot::from_index(slot.index()), Some(slot));
        }
        assert_eq!(Slot::from_index(2), None);
    }

    #[test]
    fn erased_or_misaligned_vector_tables_are_rejected() {
        let good = VectorTable { stack_pointer: 0x0802_0000, reset_vector: 0x1000_0401 };
        assert!(good.is_plausible());

        assert!(!VectorTable { stack_pointer: 0xFFFF_FFFF, ..good }.is_plausible());
        assert!(!VectorTable { stack_pointer: 0x0802_0002, ..good }.is_plausible());
        assert!(!VectorTable { reset_vector: 0xFFFF_FFFF, ..good }.is_plausible());
        // ARM mode handlers can't run on Cortex-M
        assert!(!VectorTable { reset_vector: 0x1000_0400, ..good }.is_plausible());
    }
}
