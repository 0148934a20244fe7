//! Decodes a QY70 SysEx bulk-dump buffer into a [`Pattern`] (spec §4.5).

use log::{debug, warn};

use crate::error::{self, LibResult};
use crate::model::section::SectionKind;
use crate::model::{Pattern, Section, SourceFormat, Track};
use crate::numbers::{ChorusSend, ReverbSend, Volume};
use crate::qy70::header::GlobalHeader;
use crate::qy70::track_header;
use crate::sysex::address::Address;
use crate::sysex::assembler::{self, AssembledBlock};
use crate::sysex::constants::{HEADER_AL, TRACK_SUBHEADER_LEN};
use crate::sysex::framer::scan_envelopes;
use crate::sysex::session::BulkDumpSession;
use std::collections::BTreeMap;

/// Tracks per section in a QY70 bulk dump, and the sections' fixed decode order (spec §3, §4.5).
const TRACKS_PER_SECTION: u8 = 8;

/// Decodes a raw QY70 SysEx buffer (one or more `F0…F7` envelopes, Init-framed and Close-framed)
/// into a [`Pattern`].
pub(crate) fn decode_qy70(bytes: &[u8]) -> LibResult<Pattern> {
    let frame_results = scan_envelopes(bytes);
    let mut session = BulkDumpSession::default();
    let mut messages = Vec::new();
    for result in frame_results {
        match result {
            Ok(message) => {
                session.transition(&message)?;
                messages.push(message);
            }
            Err(diagnostic) => warn!("dropped envelope: {:?}", diagnostic),
        }
    }

    let blocks = assembler::assemble(&messages);
    let header_block = blocks.get(&HEADER_AL).ok_or_else(|| {
        error::InvalidFile {
            site: site!(),
            description: "no global header (AL=0x7F) bulk-dump message found".to_string(),
        }
        .build()
    })?;

    let header = GlobalHeader::from_decoded(header_block.decoded.clone())?;
    let tempo_bpm = crate::qy70::header::decode_tempo(&header_block.first_raw_payload)?;
    debug!("decoded qy70 header: style={} tempo={}", header.is_style(), tempo_bpm);

    let mut pattern = Pattern::new(SourceFormat::Qy70);
    pattern.set_tempo_bpm(tempo_bpm);

    let section_count = if header.is_style() { SectionKind::QY70_NATIVE.len() } else { 1 };
    for (section_index, kind) in SectionKind::QY70_NATIVE.iter().enumerate().take(section_count) {
        let section = decode_section(&blocks, section_index as u8)?;
        pattern.set_section(*kind, section);
    }

    Ok(pattern)
}

fn decode_section(blocks: &BTreeMap<u8, AssembledBlock>, section_index: u8) -> LibResult<Section> {
    let mut tracks = Vec::with_capacity(TRACKS_PER_SECTION as usize);
    let mut any_present = false;
    for track_index in 0..TRACKS_PER_SECTION {
        let al = Address::track(section_index, track_index).low;
        let mut track = Track::new(track_index + 1, SourceFormat::Qy70);
        if let Some(block) = blocks.get(&al) {
            any_present = true;
            if block.decoded.len() < TRACK_SUBHEADER_LEN {
                warn!("track block at AL={:#04x} shorter than sub-header, skipping", al);
            } else {
                let sub_header = track_header::parse(&block.decoded[..TRACK_SUBHEADER_LEN])?;
                track.set_voice(sub_header.voice);
                track.set_mixer(sub_header.mixer_with(Volume::default(), ReverbSend::default(), ChorusSend::default()));
                track.set_is_drum(sub_header.is_drum);
                track.set_note_range(sub_header.note_range);
                track.set_phrase(block.decoded[TRACK_SUBHEADER_LEN..].to_vec().into());
                track.set_enabled(true);
            }
        }
        tracks.push(track);
    }
    let mut section = Section::new(tracks);
    section.set_enabled(any_present);
    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::bulk_dump_checksum;
    use crate::sevenbit::encode_7bit;
    use crate::sysex::constants::{QY70_MODEL, SYSEX_END, SYSEX_START, YAMAHA_MANUFACTURER};

    fn parameter_change(device: u8, body: [u8; 4]) -> Vec<u8> {
        let mut envelope = vec![SYSEX_START, YAMAHA_MANUFACTURER, 0x10 | device, QY70_MODEL];
        envelope.extend_from_slice(&body);
        envelope.push(SYSEX_END);
        envelope
    }

    /// Builds a single bulk-dump envelope carrying `encoded` verbatim as its transport payload
    /// (no further 7-bit packing applied — `encoded` is already in wire form).
    fn bulk_dump_raw(device: u8, al: u8, encoded: &[u8]) -> Vec<u8> {
        let size = encoded.len() as u16;
        let mut body = vec![(size >> 7) as u8, (size & 0x7F) as u8, 0x02, 0x7E, al];
        body.extend_from_slice(encoded);
        let cs = bulk_dump_checksum(&body);
        body.push(cs);
        let mut envelope = vec![SYSEX_START, YAMAHA_MANUFACTURER, device, QY70_MODEL];
        envelope.extend_from_slice(&body);
        envelope.push(SYSEX_END);
        envelope
    }

    fn bulk_dump(device: u8, al: u8, raw_payload: &[u8]) -> Vec<u8> {
        bulk_dump_raw(device, al, &encode_7bit(raw_payload))
    }

    /// Builds the five 128-byte-chunk bulk-dump envelopes a real header bulk dump consists of
    /// (spec §4.4: "typically 640 bytes (five messages)"), with `range`/`offset` patched directly
    /// into the first message's transport payload as the tempo decoder expects.
    fn header_envelopes(device: u8, range: u8, offset: u8) -> Vec<u8> {
        let mut decoded = vec![0u8; 640];
        decoded[0] = 0x00; // pattern marker
        decoded[12] = 0x1C;

        let mut buf = Vec::new();
        for (i, chunk) in decoded.chunks(128).enumerate() {
            let mut encoded = encode_7bit(chunk);
            if i == 0 {
                encoded[0] = range;
                encoded[1] = offset;
            }
            buf.extend(bulk_dump_raw(device, 0x7F, &encoded));
        }
        buf
    }

    #[test]
    fn decodes_a_minimal_single_pattern_dump() {
        let mut buf = parameter_change(0, [0, 0, 0, 1]);
        buf.extend(header_envelopes(0, 3, 3));
        buf.extend(parameter_change(0, [0, 0, 0, 0]));

        let pattern = decode_qy70(&buf).unwrap();
        assert_eq!(155, pattern.tempo_bpm());
        assert!(pattern.section(SectionKind::Intro).is_some());
        assert!(pattern.section(SectionKind::MainA).is_none());
    }

    #[test]
    fn decodes_a_track_block_into_voice_and_pan() {
        let mut buf = parameter_change(0, [0, 0, 0, 1]);
        buf.extend(header_envelopes(0, 3, 3));
        let mut track_block = track_header::TrackSubHeader {
            voice: crate::model::Voice {
                bank_msb: crate::numbers::BankMsb::new(0),
                program: crate::numbers::Program::new(5),
                bank_lsb: crate::numbers::BankLsb::default(),
            },
            pan: crate::numbers::Pan::new(100),
            is_drum: false,
            note_range: Some(crate::model::track::NoteRange {
                low: crate::numbers::NoteNumber::new(36),
                high: crate::numbers::NoteNumber::new(96),
            }),
            opaque_flags: [0, 0, 0],
            reserved23: 0,
        }
        .to_bytes()
        .to_vec();
        track_block.extend_from_slice(&[0xAA, 0xBB, 0xDC]);
        buf.extend(bulk_dump(0, 0x00, &track_block));
        buf.extend(parameter_change(0, [0, 0, 0, 0]));

        let pattern = decode_qy70(&buf).unwrap();
        let section = pattern.section(SectionKind::Intro).unwrap();
        assert!(section.enabled());
        let track = &section.tracks()[0];
        assert_eq!(5, track.voice().program.get());
        assert_eq!(100, track.mixer().pan.get());
        assert!(!track.phrase().is_empty());
    }
}
