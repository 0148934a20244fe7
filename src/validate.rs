//! Structural validators for Q7P and QY70 SysEx buffers (spec §4.9).

use crate::q7p::regions::{
    CHANNELS_OFFSET, FILL_AREA_BYTE, FILL_AREA_OFFSET, MAGIC, PAD_AREA_BYTE, PAD_AREA_OFFSET, PAD_AREA_END,
    PAN_TABLE_OFFSET, REVERB_TABLE_OFFSET, SIZE_LARGE, SIZE_SMALL, TABLE_HEADER_LEN, TEMPO_WORD_OFFSET,
    TIME_SIG_BYTE_OFFSET, TRACKS_PER_SECTION_LARGE, TRACKS_PER_SECTION_SMALL, VOLUME_TABLE_OFFSET,
};
use crate::sysex::constants::ENCODED_PAYLOAD_LEN;
use crate::sysex::framer::scan_envelopes;
use crate::sysex::message::SysexMessage;

/// How serious a [`ValidationIssue`] is. Only `Error` affects [`ValidationResult::is_valid`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One graded validator finding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub area: &'static str,
    pub offset: Option<usize>,
    pub message: String,
}

/// The full, enumerable result of validating a buffer. Never an error itself — see spec §7
/// propagation policy.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    fn push(&mut self, severity: Severity, area: &'static str, offset: Option<usize>, message: impl Into<String>) {
        self.issues.push(ValidationIssue { severity, area, offset, message: message.into() });
    }

    /// `true` iff no issue carries [`Severity::Error`].
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

const KNOWN_TIME_SIG_BYTES: &[u8] = &[0x0C, 0x14, 0x1C, 0x1A, 0x22, 0x24, 0x2C, 0x32];

/// Validates a Q7P buffer against every hard and soft invariant of spec §4.6/§4.9.
pub fn validate_q7p(bytes: &[u8]) -> ValidationResult {
    let mut result = ValidationResult::default();

    if bytes.len() != SIZE_SMALL && bytes.len() != SIZE_LARGE {
        result.push(
            Severity::Error,
            "size",
            None,
            format!("buffer is {} bytes, expected {} or {}", bytes.len(), SIZE_SMALL, SIZE_LARGE),
        );
        return result;
    }

    if &bytes[0..16] != MAGIC {
        result.push(Severity::Error, "magic", Some(0), "header magic does not match YQ7PAT     V1.00");
    }

    let tempo_word = (bytes[TEMPO_WORD_OFFSET] as u16) << 8 | bytes[TEMPO_WORD_OFFSET + 1] as u16;
    if !(200..=3000).contains(&tempo_word) {
        result.push(
            Severity::Error,
            "tempo",
            Some(TEMPO_WORD_OFFSET),
            format!("tempo raw word {} outside [200, 3000]", tempo_word),
        );
    }

    let time_sig_byte = bytes[TIME_SIG_BYTE_OFFSET];
    if !KNOWN_TIME_SIG_BYTES.contains(&time_sig_byte) {
        result.push(
            Severity::Warning,
            "time_signature",
            Some(TIME_SIG_BYTE_OFFSET),
            format!("time-signature byte {:#04x} is not in the known set", time_sig_byte),
        );
    }

    let track_count = if bytes.len() == SIZE_LARGE { TRACKS_PER_SECTION_LARGE } else { TRACKS_PER_SECTION_SMALL };
    for i in 0..track_count {
        let channel_byte = bytes[CHANNELS_OFFSET + i];
        if channel_byte > 15 {
            result.push(
                Severity::Error,
                "channels",
                Some(CHANNELS_OFFSET + i),
                format!("track {} channel byte {:#04x} outside 0..=15", i + 1, channel_byte),
            );
        }
        let volume = bytes[VOLUME_TABLE_OFFSET + TABLE_HEADER_LEN + i];
        if volume > 127 {
            result.push(Severity::Error, "volumes", Some(VOLUME_TABLE_OFFSET + TABLE_HEADER_LEN + i), format!("track {} volume {} outside 0..=127", i + 1, volume));
        }
        let pan = bytes[PAN_TABLE_OFFSET + TABLE_HEADER_LEN + i];
        if pan > 127 {
            result.push(Severity::Error, "pans", Some(PAN_TABLE_OFFSET + TABLE_HEADER_LEN + i), format!("track {} pan {} outside 0..=127", i + 1, pan));
        }
        let reverb = bytes[REVERB_TABLE_OFFSET + TABLE_HEADER_LEN + i];
        if reverb > 127 {
            result.push(Severity::Error, "reverb", Some(REVERB_TABLE_OFFSET + TABLE_HEADER_LEN + i), format!("track {} reverb {} outside 0..=127", i + 1, reverb));
        }
    }

    let fill_mismatches = bytes[FILL_AREA_OFFSET..PAD_AREA_OFFSET].iter().filter(|&&b| b != FILL_AREA_BYTE).count();
    if fill_mismatches > 0 {
        result.push(Severity::Info, "fill_area", Some(FILL_AREA_OFFSET), format!("{} byte(s) differ from the expected 0xFE fill", fill_mismatches));
    }
    let pad_mismatches = bytes[PAD_AREA_OFFSET..PAD_AREA_END].iter().filter(|&&b| b != PAD_AREA_BYTE).count();
    if pad_mismatches > 0 {
        result.push(Severity::Info, "pad_area", Some(PAD_AREA_OFFSET), format!("{} byte(s) differ from the expected 0xF8 fill", pad_mismatches));
    }

    result
}

/// Validates a QY70 SysEx buffer: framing health, checksum integrity (already enforced by the
/// framer), envelope ordering, and a consistent device number throughout.
pub fn validate_qy70(bytes: &[u8]) -> ValidationResult {
    let mut result = ValidationResult::default();
    let frame_results = scan_envelopes(bytes);

    let mut messages = Vec::new();
    for (offset, frame_result) in frame_results.into_iter().enumerate() {
        match frame_result {
            Ok(message) => messages.push(message),
            Err(diagnostic) => {
                result.push(Severity::Error, "framing", Some(offset), format!("{:?}", diagnostic));
            }
        }
    }

    match messages.first() {
        Some(SysexMessage::Init { .. }) => {}
        _ => result.push(Severity::Error, "framing", Some(0), "first framed message is not Init"),
    }
    match messages.last() {
        Some(SysexMessage::Close { .. }) => {}
        _ => result.push(Severity::Error, "framing", None, "last framed message is not Close"),
    }

    for message in &messages {
        if let SysexMessage::BulkDump { payload_encoded, .. } = message {
            if payload_encoded.len() != ENCODED_PAYLOAD_LEN {
                result.push(
                    Severity::Error,
                    "bulk_dump",
                    None,
                    format!("bulk-dump payload is {} bytes, expected {}", payload_encoded.len(), ENCODED_PAYLOAD_LEN),
                );
            }
        }
    }

    if let Some(first_device) = messages.first().map(SysexMessage::device) {
        if messages.iter().any(|m| m.device() != first_device) {
            result.push(Severity::Error, "device", None, "device number is not identical across all envelopes");
        }
    }
    result
}
