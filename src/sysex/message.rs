//! The classified SysEx envelope types a single scan of a buffer can yield (spec §4.3).

use crate::sysex::address::Address;
use crate::sysex::constants::{QY70_MODEL, SYSEX_END, SYSEX_START, YAMAHA_MANUFACTURER};

/// One parsed, validated SysEx envelope.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum SysexMessage {
    /// `F0 43 1n 5F 00 00 00 01 F7` — opens a bulk transmission.
    Init { device: u8 },
    /// `F0 43 1n 5F 00 00 00 00 F7` — closes a bulk transmission.
    Close { device: u8 },
    /// Any other Parameter Change body (`(byte2 & 0xF0) == 0x10`) this crate does not interpret
    /// further; carried opaquely.
    ParameterChange { device: u8, body: Vec<u8> },
    /// `F0 43 0n 5F BH BL AH AM AL <encoded> CS F7`.
    BulkDump {
        device: u8,
        address: Address,
        payload_encoded: Vec<u8>,
        checksum: u8,
    },
}

impl SysexMessage {
    pub(crate) fn device(&self) -> u8 {
        match self {
            SysexMessage::Init { device }
            | SysexMessage::Close { device }
            | SysexMessage::ParameterChange { device, .. }
            | SysexMessage::BulkDump { device, .. } => *device,
        }
    }

    /// Serializes this message back to its `F0…F7` envelope bytes, the inverse of
    /// [`crate::sysex::framer::scan_envelopes`]'s classification step.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let (device_nibble_hi, device, body) = match self {
            SysexMessage::Init { device } => (0x10, *device, vec![0x00, 0x00, 0x00, 0x01]),
            SysexMessage::Close { device } => (0x10, *device, vec![0x00, 0x00, 0x00, 0x00]),
            SysexMessage::ParameterChange { device, body } => (0x10, *device, body.clone()),
            SysexMessage::BulkDump {
                device,
                address,
                payload_encoded,
                checksum,
            } => {
                let size = payload_encoded.len() as u16;
                let mut body = vec![(size >> 7) as u8, (size & 0x7F) as u8, address.high, address.mid, address.low];
                body.extend_from_slice(payload_encoded);
                body.push(*checksum);
                (0x00, *device, body)
            }
        };
        let mut envelope = vec![SYSEX_START, YAMAHA_MANUFACTURER, device_nibble_hi | device, QY70_MODEL];
        envelope.extend_from_slice(&body);
        envelope.push(SYSEX_END);
        envelope
    }
}

/// Why a candidate `F0…F7` envelope was dropped instead of yielding a [`SysexMessage`] (spec
/// §4.3: "never silently skipped for a validating caller").
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum FrameDiagnostic {
    BadManufacturer { offset: usize, got: u8 },
    BadModel { offset: usize, got: u8 },
    Truncated { offset: usize, needed: usize, got: usize },
    BadChecksum { offset: usize, got: u8, want: u8 },
    UnterminatedEnvelope { offset: usize },
    UnknownType { offset: usize, got: u8 },
}

pub(crate) type FrameResult = Result<SysexMessage, FrameDiagnostic>;
