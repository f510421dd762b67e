//! Request to boot a specific slot, surviving a software reset.
use super::slot::Slot;

const REQUEST_TAG: u32 = 0xB007_0000;
const TAG_MASK: u32 = 0xFFFF_FF00;

/// Indicates the state of a switch signal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchRequest {
    /// Boot normally.
    None,
    /// Jump to the given slot as soon as the reset completes.
    Boot(Slot),
}

impl SwitchRequest {
    /// Raw word representation, for storage that survives a reset.
    pub const fn encode(self) -> u32 {
        match self {
            SwitchRequest::None => 0,
            SwitchRequest::Boot(slot) => REQUEST_TAG | slot.index() as u32,
        }
    }

    /// Interprets a raw word. Uninitialised memory almost never carries
    /// the tag, so anything unexpected reads as no request.
    pub const fn decode(word: u32) -> Self {
        if word & TAG_MASK != REQUEST_TAG {
            return SwitchRequest::None;
        }
        match Slot::from_index((word & !TAG_MASK) as u8) {
            Some(slot) => SwitchRequest::Boot(slot),
            None => SwitchRequest::None,
        }
    }
}

pub trait ReadSwitchSignal {
    fn read_switch_request(&self) -> SwitchRequest;
}

pub trait WriteSwitchSignal {
    fn write_switch_request(&mut self, request: SwitchRequest);
}

/// Reads the pending request and clears it, so a request is acted upon
/// at most once even if the target slot resets again.
pub fn take_request<S: ReadSwitchSignal + WriteSwitchSignal>(signal: &mut S) -> SwitchRequest {
    let request = signal.read_switch_request();
    if request != SwitchRequest::None {
        signal.write_switch_request(SwitchRequest::None);
    }
    request
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::devices::doubles::FakeSignal;

    #[test]
    fn requests_survive_their_raw_representation() {
        let requests = [
            SwitchRequest::None,
            SwitchRequest::Boot(Slot::Updater),
            SwitchRequest::Boot(Slot::User),
        ];
        for request in requests {
            assert_eq!(SwitchRequest::decode(request.encode()), request);
        }
        assert_eq!(SwitchRequest::Boot(Slot::User).encode(), 0xB007_0001);
    }

    #[test]
    fn garbage_reads_as_no_request() {
        // Typical power-on contents of retained RAM
        for word in [0x0000_0000, 0xFFFF_FFFF, 0xDEAD_BEEF, 0xB007_0002, 0xB008_0001] {
            assert_eq!(SwitchRequest::decode(word), SwitchRequest::None);
        }
    }

    #[test]
    fn taking_a_request_clears_it() {
        // Given
        let mut signal = FakeSignal::default();
        signal.write_switch_request(SwitchRequest::Boot(Slot::User));

        // When
        let first = take_request(&mut signal);
        let second = take_request(&mut signal);

        // Then
        assert_eq!(first, SwitchRequest::Boot(Slot::User));
        assert_eq!(second, SwitchRequest::None);
        assert_eq!(signal.word, 0);
    }

    #[test]
    fn garbage_left_in_the_signal_is_not_acted_upon() {
        // Given
        let mut signal = FakeSignal { word: 0xDEAD_BEEF };

        // Then
        assert_eq!(take_request(&mut signal), SwitchRequest::None);
    }
}
