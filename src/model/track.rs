use crate::model::pattern::SourceFormat;
use crate::model::phrase::PhraseBytes;
use crate::numbers::{BankLsb, BankMsb, ChorusSend, MidiChannel, NoteNumber, Pan, Program, ReverbSend, Volume};

/// QY70 track names by position (1-based), fixed per §3: `D1, D2, PC, BA, C1..C4`.
const QY70_TRACK_NAMES: [&str; 8] = ["D1", "D2", "PC", "BA", "C1", "C2", "C3", "C4"];

/// Returns the display name for a track at `position` (1-based) in a section belonging to a
/// pattern of the given `format`.
pub fn track_display_name(position: u8, format: SourceFormat) -> String {
    match format {
        SourceFormat::Qy70 => QY70_TRACK_NAMES
            .get((position.saturating_sub(1)) as usize)
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("TR{}", position)),
        SourceFormat::Q7p => format!("TR{}", position),
    }
}

/// A track's voice assignment: MSB/program/LSB identify the instrument, per the General
/// MIDI/XG bank-select convention.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Voice {
    pub bank_msb: BankMsb,
    pub program: Program,
    pub bank_lsb: BankLsb,
}

/// A track's mixer settings.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mixer {
    pub volume: Volume,
    /// 64 = center, 0 = random (the device's own convention, not a MIDI one).
    pub pan: Pan,
    pub reverb_send: ReverbSend,
    pub chorus_send: ChorusSend,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            volume: Volume::default(),
            pan: Pan::default(),
            reverb_send: ReverbSend::default(),
            chorus_send: ChorusSend::default(),
        }
    }
}

impl Mixer {
    /// `true` when pan is set to the device's "random pan" sentinel (0).
    pub fn is_random_pan(&self) -> bool {
        self.pan.get() == 0
    }
}

/// The melody note range a non-drum track is limited to. QY70-specific; Q7P carries no
/// equivalent field.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteRange {
    pub low: NoteNumber,
    pub high: NoteNumber,
}

/// One of a [`crate::model::Section`]'s instrument lanes.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    number: u8,
    name: String,
    channel: MidiChannel,
    voice: Voice,
    mixer: Mixer,
    enabled: bool,
    is_drum: bool,
    note_range: Option<NoteRange>,
    phrase: PhraseBytes,
}

impl Track {
    pub fn new(number: u8, format: SourceFormat) -> Self {
        Self {
            number,
            name: track_display_name(number, format),
            channel: MidiChannel::new(if number <= 2 { 10 } else { number }),
            voice: Voice::default(),
            mixer: Mixer::default(),
            enabled: false,
            is_drum: number <= 2,
            note_range: None,
            phrase: PhraseBytes::default(),
        }
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn channel(&self) -> MidiChannel {
        self.channel
    }

    pub fn set_channel(&mut self, channel: MidiChannel) {
        self.channel = channel;
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn set_voice(&mut self, voice: Voice) {
        self.voice = voice;
    }

    pub fn mixer(&self) -> Mixer {
        self.mixer
    }

    pub fn set_mixer(&mut self, mixer: Mixer) {
        self.mixer = mixer;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_drum(&self) -> bool {
        self.is_drum
    }

    pub fn set_is_drum(&mut self, is_drum: bool) {
        self.is_drum = is_drum;
    }

    pub fn note_range(&self) -> Option<NoteRange> {
        self.note_range
    }

    pub fn set_note_range(&mut self, range: Option<NoteRange>) {
        self.note_range = range;
    }

    pub fn phrase(&self) -> &PhraseBytes {
        &self.phrase
    }

    pub fn set_phrase(&mut self, phrase: PhraseBytes) {
        self.phrase = phrase;
    }
}
