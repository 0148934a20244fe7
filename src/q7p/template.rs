//! The built-in minimal Q7P template used when `encode_q7p` has neither an explicit template nor
//! a captured `raw_template` to start from (spec §4.7).

use crate::name::PatternName;
use crate::q7p::regions::{
    BANK_MSB_OFFSET, BANK_LSB_OFFSET, CHANNELS_OFFSET, FILL_AREA_BYTE, FILL_AREA_OFFSET, MAGIC, NAME_OFFSET,
    PAD_AREA_BYTE, PAD_AREA_OFFSET, PAD_AREA_END, PAN_TABLE_OFFSET, PROGRAM_OFFSET, REVERB_TABLE_OFFSET,
    SECTION_PTRS_OFFSET, SECTION_PTR_DISABLED, SIZE_LARGE, SIZE_MARKER_OFFSET, SIZE_SMALL, TABLE_HEADER_LEN,
    TEMPO_WORD_OFFSET, TRACKS_PER_SECTION_LARGE, TRACKS_PER_SECTION_SMALL, VOLUME_TABLE_OFFSET,
};

const DEFAULT_TEMPLATE_NAME: &str = "NEW STYLE";
const DEFAULT_VOLUME: u8 = 100;
const DEFAULT_PAN: u8 = 64;
const DEFAULT_REVERB: u8 = 40;
const DEFAULT_TEMPO_BPM: u16 = 120;
/// Every [`SECTION_PTRS_OFFSET`] slot is 16 bits wide regardless of file size (spec §4.6).
const SECTION_PTR_COUNT: usize = 16;

/// Builds a minimal, structurally valid Q7P buffer: every section disabled, default tempo and
/// mixer values, fillers filled (spec §4.7).
pub(crate) fn build_minimal_template(is_large: bool) -> Vec<u8> {
    let size = if is_large { SIZE_LARGE } else { SIZE_SMALL };
    let track_count = if is_large { TRACKS_PER_SECTION_LARGE } else { TRACKS_PER_SECTION_SMALL };
    let mut buf = vec![0u8; size];

    buf[0..16].copy_from_slice(MAGIC);

    let size_marker = size as u16;
    buf[SIZE_MARKER_OFFSET] = (size_marker >> 8) as u8;
    buf[SIZE_MARKER_OFFSET + 1] = (size_marker & 0xFF) as u8;

    for i in 0..SECTION_PTR_COUNT {
        let offset = SECTION_PTRS_OFFSET + i * 2;
        buf[offset] = (SECTION_PTR_DISABLED >> 8) as u8;
        buf[offset + 1] = (SECTION_PTR_DISABLED & 0xFF) as u8;
    }

    let tempo_word = DEFAULT_TEMPO_BPM * 10;
    buf[TEMPO_WORD_OFFSET] = (tempo_word >> 8) as u8;
    buf[TEMPO_WORD_OFFSET + 1] = (tempo_word & 0xFF) as u8;

    for i in 0..track_count {
        buf[BANK_MSB_OFFSET + i] = 0;
        buf[PROGRAM_OFFSET + i] = 0;
        buf[BANK_LSB_OFFSET + i] = 0;
        buf[CHANNELS_OFFSET + i] = 0; // "use per-position default" sentinel
        buf[VOLUME_TABLE_OFFSET + TABLE_HEADER_LEN + i] = DEFAULT_VOLUME;
        buf[PAN_TABLE_OFFSET + TABLE_HEADER_LEN + i] = DEFAULT_PAN;
        buf[REVERB_TABLE_OFFSET + TABLE_HEADER_LEN + i] = DEFAULT_REVERB;
    }

    buf[NAME_OFFSET..NAME_OFFSET + 10].copy_from_slice(&PatternName::new(DEFAULT_TEMPLATE_NAME).to_bytes());

    for b in &mut buf[FILL_AREA_OFFSET..PAD_AREA_OFFSET] {
        *b = FILL_AREA_BYTE;
    }
    for b in &mut buf[PAD_AREA_OFFSET..PAD_AREA_END] {
        *b = PAD_AREA_BYTE;
    }

    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_template_has_valid_magic_and_disabled_sections() {
        let buf = build_minimal_template(false);
        assert_eq!(MAGIC, &buf[0..16]);
        assert_eq!(SIZE_SMALL, buf.len());
        for i in 0..6 {
            let offset = SECTION_PTRS_OFFSET + i * 2;
            assert_eq!(0xFE, buf[offset]);
            assert_eq!(0xFE, buf[offset + 1]);
        }
    }

    #[test]
    fn minimal_template_fillers_are_correct() {
        let buf = build_minimal_template(false);
        assert!(buf[FILL_AREA_OFFSET..PAD_AREA_OFFSET].iter().all(|&b| b == FILL_AREA_BYTE));
        assert!(buf[PAD_AREA_OFFSET..PAD_AREA_END].iter().all(|&b| b == PAD_AREA_BYTE));
    }
}
