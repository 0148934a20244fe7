//! The 24-byte sub-header preceding each QY70 per-track event stream (spec §4.5).

use snafu::ensure;

use crate::error::{self, LibResult};
use crate::model::track::{Mixer, NoteRange, Voice};
use crate::numbers::{BankLsb, BankMsb, ChorusSend, NoteNumber, Pan, Program, ReverbSend, Volume};
use crate::sysex::constants::TRACK_SUBHEADER_LEN;

const FIXED_PREFIX: [u8; 12] = [0x08, 0x04, 0x82, 0x01, 0x00, 0x40, 0x20, 0x08, 0x04, 0x82, 0x01, 0x00];
const FIXED_12_13: [u8; 2] = [0x06, 0x1C];

/// `(bank_msb, program)` sentinel meaning "use the track type's device default voice" rather
/// than an explicit voice assignment. Chosen on decode as `Voice { bank_msb: 64, program: 0, .. }`
/// so that re-encoding a voice unchanged from that exact value reproduces the sentinel bytes
/// (documented open decision, see DESIGN.md).
const VOICE_DEFAULT_SENTINEL: (u8, u8) = (0x40, 0x80);
const VOICE_DEFAULT_BANK_MSB: u8 = 0x40;
const VOICE_DEFAULT_PROGRAM: u8 = 0x00;

/// `(low, high)` sentinel meaning "drum track, no melodic note range".
const NOTE_RANGE_DRUM_SENTINEL: (u8, u8) = (0x87, 0xF8);

const PAN_FLAG_EXPLICIT: u8 = 0x41;
const PAN_FLAG_DEFAULT: u8 = 0x00;
const PAN_DEFAULT: u8 = 64;

/// A parsed track sub-header, decoded into the pieces the neutral model needs (voice, mixer pan,
/// drum flag, note range) while still able to reconstruct the exact original bytes on encode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct TrackSubHeader {
    pub(crate) voice: Voice,
    pub(crate) pan: Pan,
    pub(crate) is_drum: bool,
    pub(crate) note_range: Option<NoteRange>,
    /// Bytes 18–20 (track-type flags) and byte 23 (reserved), preserved opaquely.
    pub(crate) opaque_flags: [u8; 3],
    pub(crate) reserved23: u8,
}

pub(crate) fn parse(bytes: &[u8]) -> LibResult<TrackSubHeader> {
    ensure!(
        bytes.len() == TRACK_SUBHEADER_LEN,
        error::UnexpectedSize {
            site: site!(),
            got: bytes.len(),
            expected: TRACK_SUBHEADER_LEN.to_string(),
        }
    );

    let voice = if (bytes[14], bytes[15]) == VOICE_DEFAULT_SENTINEL {
        Voice {
            bank_msb: BankMsb::new(VOICE_DEFAULT_BANK_MSB),
            program: Program::new(VOICE_DEFAULT_PROGRAM),
            bank_lsb: BankLsb::default(),
        }
    } else {
        Voice {
            bank_msb: BankMsb::new(bytes[14]),
            program: Program::new(bytes[15]),
            bank_lsb: BankLsb::default(),
        }
    };

    let (is_drum, note_range) = if (bytes[16], bytes[17]) == NOTE_RANGE_DRUM_SENTINEL {
        (true, None)
    } else {
        (
            false,
            Some(NoteRange {
                low: NoteNumber::new(bytes[16]),
                high: NoteNumber::new(bytes[17]),
            }),
        )
    };

    let pan = if bytes[21] == PAN_FLAG_EXPLICIT {
        Pan::new(bytes[22])
    } else {
        Pan::new(PAN_DEFAULT)
    };

    Ok(TrackSubHeader {
        voice,
        pan,
        is_drum,
        note_range,
        opaque_flags: [bytes[18], bytes[19], bytes[20]],
        reserved23: bytes[23],
    })
}

impl TrackSubHeader {
    pub(crate) fn to_bytes(&self) -> [u8; TRACK_SUBHEADER_LEN] {
        let mut out = [0u8; TRACK_SUBHEADER_LEN];
        out[0..12].copy_from_slice(&FIXED_PREFIX);
        out[12..14].copy_from_slice(&FIXED_12_13);

        let (voice_msb, voice_program) = if self.voice.bank_msb.get() == VOICE_DEFAULT_BANK_MSB
            && self.voice.program.get() == VOICE_DEFAULT_PROGRAM
        {
            VOICE_DEFAULT_SENTINEL
        } else {
            (self.voice.bank_msb.get(), self.voice.program.get())
        };
        out[14] = voice_msb;
        out[15] = voice_program;

        let (low, high) = if self.is_drum {
            NOTE_RANGE_DRUM_SENTINEL
        } else {
            match self.note_range {
                Some(range) => (range.low.get(), range.high.get()),
                None => (NoteNumber::default().get(), 127),
            }
        };
        out[16] = low;
        out[17] = high;

        out[18..21].copy_from_slice(&self.opaque_flags);

        if self.pan.get() == PAN_DEFAULT {
            out[21] = PAN_FLAG_DEFAULT;
            out[22] = PAN_DEFAULT;
        } else {
            out[21] = PAN_FLAG_EXPLICIT;
            out[22] = self.pan.get();
        }
        out[23] = self.reserved23;
        out
    }

    pub(crate) fn mixer_with(&self, volume: Volume, reverb: ReverbSend, chorus: ChorusSend) -> Mixer {
        Mixer {
            volume,
            pan: self.pan,
            reverb_send: reverb,
            chorus_send: chorus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(voice: (u8, u8), note_range: (u8, u8), pan_flag: u8, pan: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; TRACK_SUBHEADER_LEN];
        bytes[0..12].copy_from_slice(&FIXED_PREFIX);
        bytes[12..14].copy_from_slice(&FIXED_12_13);
        bytes[14] = voice.0;
        bytes[15] = voice.1;
        bytes[16] = note_range.0;
        bytes[17] = note_range.1;
        bytes[21] = pan_flag;
        bytes[22] = pan;
        bytes
    }

    #[test]
    fn recognizes_default_voice_sentinel() {
        let bytes = header_bytes((0x40, 0x80), (60, 84), PAN_FLAG_DEFAULT, 0);
        let header = parse(&bytes).unwrap();
        assert_eq!(64, header.voice.bank_msb.get());
        assert_eq!(0, header.voice.program.get());
        assert_eq!(bytes, header.to_bytes());
    }

    #[test]
    fn recognizes_drum_sentinel() {
        let bytes = header_bytes((0x00, 0x02), (0x87, 0xF8), PAN_FLAG_DEFAULT, 0);
        let header = parse(&bytes).unwrap();
        assert!(header.is_drum);
        assert!(header.note_range.is_none());
        assert_eq!(bytes, header.to_bytes());
    }

    #[test]
    fn round_trips_an_explicit_voice_and_pan() {
        let bytes = header_bytes((0x00, 0x05), (36, 96), PAN_FLAG_EXPLICIT, 100);
        let header = parse(&bytes).unwrap();
        assert_eq!(0, header.voice.bank_msb.get());
        assert_eq!(5, header.voice.program.get());
        assert_eq!(100, header.pan.get());
        assert_eq!(bytes, header.to_bytes());
    }

    #[test]
    fn default_pan_round_trips_to_flag_zero() {
        let bytes = header_bytes((0, 1), (20, 100), PAN_FLAG_DEFAULT, 0);
        let header = parse(&bytes).unwrap();
        assert_eq!(64, header.pan.get());
        assert_eq!(bytes, header.to_bytes());
    }
}
