//! Fixed bytes of the QY70 SysEx envelope (spec §4.3, §6).

pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;
pub const YAMAHA_MANUFACTURER: u8 = 0x43;
pub const QY70_MODEL: u8 = 0x5F;

/// Canonical decoded block size: one bulk-dump message's 147-byte encoded payload decodes to
/// this many bytes.
pub const DECODED_BLOCK_LEN: usize = 128;

/// Encoded payload length of a canonical bulk-dump message: 18 full 7-byte groups packed to 8
/// bytes each, plus a trailing 2-byte group packed to 3 bytes (`18*8 + 3`).
pub const ENCODED_PAYLOAD_LEN: usize = 147;

/// `(AH, AM)` marking style/pattern data, as opposed to other parameter categories this crate
/// does not need to model.
pub const STYLE_ADDRESS_HIGH: u8 = 0x02;
pub const STYLE_ADDRESS_MID: u8 = 0x7E;

/// The low-address byte selecting the global style/pattern header block.
pub const HEADER_AL: u8 = 0x7F;

/// Byte count of the decoded global header at [`HEADER_AL`].
pub const HEADER_LEN: usize = 640;

/// Byte count of a per-track sub-header preceding the opaque event stream (spec §4.5).
pub const TRACK_SUBHEADER_LEN: usize = 24;
