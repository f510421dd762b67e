//! Utilities to manipulate generic memory

/// Generic address for the purpose of this module's methods.
/// Anything that can be offset by a usize and yield another
/// address works as an address.
pub trait Address: Copy + PartialEq + core::ops::Add<usize, Output = Self> {}
impl<A> Address for A where A: Copy + PartialEq + core::ops::Add<usize, Output = A> {}

/// Contiguous span of `size` bytes starting at `start`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub size: u32,
}

impl Span {
    pub fn contains(&self, address: u32) -> bool {
        address >= self.start && (address - self.start) < self.size
    }

    /// Whether two spans share at least one address. Empty spans overlap
    /// nothing.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.size > 0
            && other.size > 0
            && (self.contains(other.start) || other.contains(self.start))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn spans_contain_their_addresses_only() {
        // Given
        let span = Span { start: 0x1000_0000, size: kb!(32) };

        // Then
        assert!(span.contains(0x1000_0000));
        assert!(span.contains(0x1000_7FFF));
        assert!(!span.contains(0x1000_8000));
        assert!(!span.contains(0x0FFF_FFFF));
    }

    #[test]
    fn adjacent_spans_do_not_overlap() {
        // Given
        let first = Span { start: 0x1000_0000, size: 0x8000 };
        let second = Span { start: 0x1000_8000, size: 0x8000 };
        let straddling = Span { start: 0x1000_7000, size: 0x2000 };

        // Then
        assert!(!first.overlaps(&second));
        assert!(first.overlaps(&straddling));
        assert!(second.overlaps(&straddling));
    }

    #[test]
    fn nested_and_empty_spans() {
        // Given
        let outer = Span { start: 0x1000_0000, size: 0x8000 };
        let inner = Span { start: 0x1000_1000, size: 0x100 };
        let empty = Span { start: 0x1000_1000, size: 0 };

        // Then
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(!outer.overlaps(&empty));
        assert!(!empty.overlaps(&outer));
    }

    #[test]
    fn conversion_macros() {
        assert_eq!(kb!(32), 0x8000);
    }
}
