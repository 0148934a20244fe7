//! The three-byte address a bulk-dump message is keyed by (spec §4.3, GLOSSARY "AL / AM / AH").

use crate::sysex::constants::{HEADER_AL, STYLE_ADDRESS_HIGH, STYLE_ADDRESS_MID};

/// `(AH, AM, AL)`. Style/pattern data always carries `(AH, AM) = (0x02, 0x7E)`; `AL` selects the
/// global header (`0x7F`) or a `section*8 + track` slot.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub(crate) struct Address {
    pub(crate) high: u8,
    pub(crate) mid: u8,
    pub(crate) low: u8,
}

impl Address {
    pub(crate) fn style(low: u8) -> Self {
        Self {
            high: STYLE_ADDRESS_HIGH,
            mid: STYLE_ADDRESS_MID,
            low,
        }
    }

    pub(crate) fn header() -> Self {
        Self::style(HEADER_AL)
    }

    pub(crate) fn is_header(self) -> bool {
        self.low == HEADER_AL
    }

    pub(crate) fn is_style(self) -> bool {
        self.high == STYLE_ADDRESS_HIGH && self.mid == STYLE_ADDRESS_MID
    }

    /// The `(section, track)` pair this address encodes, for a track slot. `None` for the header
    /// address or any address past the six-section style span.
    pub(crate) fn section_track(self) -> Option<(u8, u8)> {
        if !self.is_style() || self.is_header() {
            return None;
        }
        Some((self.low / 8, self.low % 8))
    }

    pub(crate) fn track(section: u8, track: u8) -> Self {
        Self::style(section * 8 + track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_address_is_recognized() {
        assert!(Address::header().is_header());
        assert!(Address::header().is_style());
    }

    #[test]
    fn section_track_round_trips() {
        let address = Address::track(2, 5);
        assert_eq!(Some((2, 5)), address.section_track());
    }

    #[test]
    fn header_has_no_section_track() {
        assert_eq!(None, Address::header().section_track());
    }
}
