//! The QY70 global style/pattern header at `AL=0x7F`: tempo codec and the 640-byte decoded
//! block (spec §4.5).

use log::trace;
use snafu::ensure;

use crate::error::{self, LibResult};
use crate::sysex::constants::HEADER_LEN;

/// Lowest valid tempo range selector (inclusive), per spec §4.5.
const TEMPO_RANGE_MIN: u8 = 1;
/// Highest valid tempo range selector (inclusive), per spec §4.5.
const TEMPO_RANGE_MAX: u8 = 4;

/// `bpm = range*95 - 133 + offset`, read from the raw (pre-7-bit-decode) first two bytes of the
/// first `AL=0x7F` bulk-dump message.
pub(crate) fn decode_tempo(raw_payload: &[u8]) -> LibResult<u16> {
    ensure!(
        raw_payload.len() >= 2,
        error::InputTooShort {
            site: site!(),
            needed: 2usize,
            got: raw_payload.len(),
        }
    );
    let range = raw_payload[0];
    let offset = raw_payload[1];
    ensure!(
        (TEMPO_RANGE_MIN..=TEMPO_RANGE_MAX).contains(&range),
        error::TempoOutOfRange {
            site: site!(),
            raw: range as i64,
        }
    );
    let bpm = range as i32 * 95 - 133 + offset as i32;
    trace!("decoded tempo: range={} offset={} -> {} bpm", range, offset, bpm);
    ensure!(
        (57..=279).contains(&bpm),
        error::TempoOutOfRange { site: site!(), raw: bpm as i64 }
    );
    Ok(bpm as u16)
}

/// Picks the smallest valid `range` such that `0 <= bpm - (range*95 - 133) <= 94`, then returns
/// `(range, offset)` for direct placement into the raw transport payload's first two bytes.
pub(crate) fn encode_tempo(bpm: u16) -> LibResult<(u8, u8)> {
    for range in TEMPO_RANGE_MIN..=TEMPO_RANGE_MAX {
        let base = range as i32 * 95 - 133;
        let offset = bpm as i32 - base;
        if (0..=94).contains(&offset) {
            return Ok((range, offset as u8));
        }
    }
    error::TempoOutOfRange {
        site: site!(),
        raw: bpm as i64,
    }
    .fail()
}

/// The decoded 640-byte global header. Only the format marker and the candidate time-signature
/// byte are semantically interpreted (spec §4.5); everything else — including the per-track
/// mixer fields known to live somewhere in this block at unidentified offsets — is preserved
/// byte-exact in `raw`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GlobalHeader {
    pub(crate) raw: Vec<u8>,
}

/// Offset of the format marker within the decoded header block.
const FORMAT_MARKER_OFFSET: usize = 0;
/// Offset of the candidate time-signature byte (spec §4.5, §9 Open Question 3).
const TIME_SIG_BYTE_OFFSET: usize = 12;
/// Format-marker values below this indicate a single Pattern; at or above, a full Style.
const STYLE_MARKER_THRESHOLD: u8 = 0x08;

impl GlobalHeader {
    pub(crate) fn from_decoded(decoded: Vec<u8>) -> LibResult<Self> {
        ensure!(
            decoded.len() == HEADER_LEN,
            error::UnexpectedSize {
                site: site!(),
                got: decoded.len(),
                expected: HEADER_LEN.to_string(),
            }
        );
        Ok(Self { raw: decoded })
    }

    pub(crate) fn format_marker(&self) -> u8 {
        self.raw[FORMAT_MARKER_OFFSET]
    }

    pub(crate) fn set_format_marker(&mut self, marker: u8) {
        self.raw[FORMAT_MARKER_OFFSET] = marker;
    }

    pub(crate) fn is_style(&self) -> bool {
        self.format_marker() >= STYLE_MARKER_THRESHOLD
    }

    pub(crate) fn time_sig_byte(&self) -> u8 {
        self.raw[TIME_SIG_BYTE_OFFSET]
    }

    pub(crate) fn set_time_sig_byte(&mut self, value: u8) {
        self.raw[TIME_SIG_BYTE_OFFSET] = value;
    }

    /// A minimal built-in header for when no template is available: single-Pattern marker,
    /// common-time candidate byte, everything else zeroed.
    pub(crate) fn minimal(is_style: bool) -> Self {
        let mut raw = vec![0u8; HEADER_LEN];
        raw[FORMAT_MARKER_OFFSET] = if is_style { STYLE_MARKER_THRESHOLD } else { 0 };
        raw[TIME_SIG_BYTE_OFFSET] = 0x1C;
        Self { raw }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tempo_fixture_155_bpm() {
        let (range, offset) = encode_tempo(155).unwrap();
        assert_eq!(3, range);
        assert_eq!(3, offset);
        assert_eq!(155, decode_tempo(&[range, offset]).unwrap());
    }

    #[test]
    fn tempo_fixture_133_bpm() {
        let (range, offset) = encode_tempo(133).unwrap();
        assert_eq!(2, range);
        assert_eq!(76, offset);
        assert_eq!(133, decode_tempo(&[range, offset]).unwrap());
    }

    #[test]
    fn tempo_round_trips_across_the_usable_window() {
        for bpm in 57..=279u16 {
            let (range, offset) = encode_tempo(bpm).unwrap();
            assert_eq!(bpm, decode_tempo(&[range, offset]).unwrap(), "bpm={}", bpm);
        }
    }

    #[test]
    fn out_of_range_bpm_is_rejected() {
        assert!(encode_tempo(30).is_err());
        assert!(encode_tempo(500).is_err());
    }

    #[test]
    fn format_marker_distinguishes_pattern_from_style() {
        let pattern = GlobalHeader::minimal(false);
        let style = GlobalHeader::minimal(true);
        assert!(!pattern.is_style());
        assert!(style.is_style());
    }
}
