//! Scans a byte buffer for `F0…F7` envelopes and classifies each one (spec §4.3).

use log::warn;

use crate::checksum::bulk_dump_checksum;
use crate::sysex::address::Address;
use crate::sysex::constants::{
    ENCODED_PAYLOAD_LEN, QY70_MODEL, SYSEX_END, SYSEX_START, YAMAHA_MANUFACTURER,
};
use crate::sysex::message::{FrameDiagnostic, FrameResult, SysexMessage};

const INIT_BODY: [u8; 4] = [0x00, 0x00, 0x00, 0x01];
const CLOSE_BODY: [u8; 4] = [0x00, 0x00, 0x00, 0x00];

/// Scans `buf` for candidate SysEx envelopes and classifies each. Every envelope found yields
/// exactly one entry: a parsed message, or a diagnostic explaining why it was dropped. Envelopes
/// are never silently skipped.
pub(crate) fn scan_envelopes(buf: &[u8]) -> Vec<FrameResult> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < buf.len() {
        if buf[i] != SYSEX_START {
            i += 1;
            continue;
        }
        let start = i;
        match buf[start + 1..].iter().position(|&b| b == SYSEX_END) {
            None => {
                out.push(Err(FrameDiagnostic::UnterminatedEnvelope { offset: start }));
                break;
            }
            Some(rel) => {
                let end = start + 1 + rel;
                let envelope = &buf[start..=end];
                i = end + 1;
                out.push(classify(envelope, start));
            }
        }
    }
    out
}

fn classify(envelope: &[u8], offset: usize) -> FrameResult {
    if envelope.len() < 5 {
        warn!("dropping truncated envelope at offset {}", offset);
        return Err(FrameDiagnostic::Truncated {
            offset,
            needed: 5,
            got: envelope.len(),
        });
    }
    let manufacturer = envelope[1];
    if manufacturer != YAMAHA_MANUFACTURER {
        warn!("dropping envelope at offset {}: bad manufacturer {:#04x}", offset, manufacturer);
        return Err(FrameDiagnostic::BadManufacturer {
            offset,
            got: manufacturer,
        });
    }
    let type_device = envelope[2];
    let model = envelope[3];
    if model != QY70_MODEL {
        warn!("dropping envelope at offset {}: bad model {:#04x}", offset, model);
        return Err(FrameDiagnostic::BadModel { offset, got: model });
    }
    let device = type_device & 0x0F;
    let body = &envelope[4..envelope.len() - 1];

    match type_device & 0xF0 {
        0x10 => Ok(classify_parameter_change(device, body)),
        0x00 => classify_bulk_dump(device, body, offset),
        other => {
            warn!("dropping envelope at offset {}: unknown type nibble {:#03x}", offset, other);
            Err(FrameDiagnostic::UnknownType { offset, got: type_device })
        }
    }
}

fn classify_parameter_change(device: u8, body: &[u8]) -> SysexMessage {
    if body == INIT_BODY {
        SysexMessage::Init { device }
    } else if body == CLOSE_BODY {
        SysexMessage::Close { device }
    } else {
        SysexMessage::ParameterChange {
            device,
            body: body.to_vec(),
        }
    }
}

fn classify_bulk_dump(device: u8, body: &[u8], offset: usize) -> FrameResult {
    let expected = 5 + ENCODED_PAYLOAD_LEN + 1;
    if body.len() != expected {
        warn!("dropping bulk-dump envelope at offset {}: expected {} body bytes, got {}", offset, expected, body.len());
        return Err(FrameDiagnostic::Truncated {
            offset,
            needed: expected,
            got: body.len(),
        });
    }
    let address = Address {
        high: body[2],
        mid: body[3],
        low: body[4],
    };
    let payload_encoded = body[5..5 + ENCODED_PAYLOAD_LEN].to_vec();
    let checksum = body[5 + ENCODED_PAYLOAD_LEN];
    let covered = &body[..5 + ENCODED_PAYLOAD_LEN];
    let want = bulk_dump_checksum(covered);
    if want != checksum {
        warn!("dropping bulk-dump envelope at offset {}: bad checksum", offset);
        return Err(FrameDiagnostic::BadChecksum {
            offset,
            got: checksum,
            want,
        });
    }
    Ok(SysexMessage::BulkDump {
        device,
        address,
        payload_encoded,
        checksum,
    })
}
