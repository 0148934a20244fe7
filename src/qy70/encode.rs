//! Encodes a [`Pattern`] into a QY70 SysEx bulk-dump buffer (spec §4.8 "Q7P → QY70").

use crate::error::LibResult;
use crate::model::section::SectionKind;
use crate::model::{Pattern, Section};
use crate::qy70::header::{encode_tempo, GlobalHeader};
use crate::qy70::track_header::TrackSubHeader;
use crate::sevenbit::encode_7bit;
use crate::checksum::bulk_dump_checksum;
use crate::sysex::address::Address;
use crate::sysex::message::SysexMessage;

const DECODED_CHUNK_LEN: usize = 128;

/// Packs `decoded` into one [`SysexMessage::BulkDump`] per 128-byte chunk, all addressed at the
/// same `AL = low` (spec §4.4: a logical block larger than 128 bytes spans several messages
/// sharing one address).
fn emit_bulk_dumps(device: u8, low: u8, decoded: &[u8]) -> Vec<SysexMessage> {
    decoded
        .chunks(DECODED_CHUNK_LEN)
        .map(|chunk| {
            let payload_encoded = encode_7bit(chunk);
            let address = Address::style(low);
            let size = payload_encoded.len() as u16;
            let mut covered = vec![(size >> 7) as u8, (size & 0x7F) as u8, address.high, address.mid, low];
            covered.extend_from_slice(&payload_encoded);
            let checksum = bulk_dump_checksum(&covered);
            SysexMessage::BulkDump {
                device,
                address,
                payload_encoded,
                checksum,
            }
        })
        .collect()
}

/// Encodes a decoded [`Pattern`] back into a full QY70 SysEx byte stream: Init, the global
/// header, every enabled section's eight tracks, and Close.
pub(crate) fn encode_qy70(pattern: &Pattern) -> LibResult<Vec<u8>> {
    encode_qy70_as(pattern, 0)
}

pub(crate) fn encode_qy70_as(pattern: &Pattern, device: u8) -> LibResult<Vec<u8>> {
    let mut messages = vec![SysexMessage::Init { device }];

    let is_style = SectionKind::QY70_NATIVE
        .iter()
        .filter(|kind| pattern.section(**kind).map(Section::enabled).unwrap_or(false))
        .count()
        > 1;
    let mut header = GlobalHeader::minimal(is_style);
    let (range, offset) = encode_tempo(pattern.tempo_bpm())?;

    let mut header_messages = emit_bulk_dumps(device, 0x7F, &header.raw);
    if let Some(SysexMessage::BulkDump { payload_encoded, checksum, address, .. }) = header_messages.first_mut() {
        if payload_encoded.len() >= 2 {
            payload_encoded[0] = range;
            payload_encoded[1] = offset;
            let size = payload_encoded.len() as u16;
            let mut covered = vec![(size >> 7) as u8, (size & 0x7F) as u8, address.high, address.mid, address.low];
            covered.extend_from_slice(payload_encoded);
            *checksum = bulk_dump_checksum(&covered);
        }
    }
    header.set_format_marker(if is_style { 0x08 } else { 0x00 });
    messages.extend(header_messages);

    for (section_index, kind) in SectionKind::QY70_NATIVE.iter().enumerate() {
        let Some(section) = pattern.section(*kind) else { continue };
        if !section.enabled() {
            continue;
        }
        for (track_index, track) in section.tracks().iter().enumerate().take(8) {
            let sub_header = TrackSubHeader {
                voice: track.voice(),
                pan: track.mixer().pan,
                is_drum: track.is_drum(),
                note_range: track.note_range(),
                opaque_flags: [0, 0, 0],
                reserved23: 0,
            };
            let mut decoded = sub_header.to_bytes().to_vec();
            decoded.extend_from_slice(track.phrase().as_slice());
            let low = Address::track(section_index as u8, track_index as u8).low;
            messages.extend(emit_bulk_dumps(device, low, &decoded));
        }
    }

    messages.push(SysexMessage::Close { device });

    Ok(messages.iter().flat_map(SysexMessage::to_bytes).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceFormat;
    use crate::qy70::decode::decode_qy70;

    #[test]
    fn round_trips_tempo_and_section_enablement() {
        let mut pattern = Pattern::new(SourceFormat::Qy70);
        pattern.set_tempo_bpm(155);
        let tracks: Vec<_> = (1..=8u8).map(|i| crate::model::Track::new(i, SourceFormat::Qy70)).collect();
        let mut section = Section::new(tracks);
        section.set_enabled(true);
        pattern.set_section(SectionKind::Intro, section);

        let bytes = encode_qy70(&pattern).unwrap();
        let decoded = decode_qy70(&bytes).unwrap();
        assert_eq!(155, decoded.tempo_bpm());
        assert!(decoded.section(SectionKind::Intro).unwrap().enabled());
        assert!(!decoded.section(SectionKind::MainA).map(|s| s.enabled()).unwrap_or(false));
    }
}
