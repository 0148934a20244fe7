//! [`SectionKind`] and [`Section`], the pattern subdivisions a sequence is built from.

use crate::model::phrase::PhraseBytes;
use crate::model::time_signature::TimeSignature;
use crate::model::track::Track;
use crate::numbers::SectionMeasures;

/// A section slot. The first six are QY70-native (every QY70 pattern carries exactly these six,
/// in this order); the rest only ever appear in a Q7P file's extended slot table and are absent
/// from QY70 output (spec §3).
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionKind {
    Intro,
    MainA,
    MainB,
    FillAB,
    FillBA,
    Ending,
    MainC,
    MainD,
    Intro2,
    Ending2,
    Break,
    Reserved(u8),
}

impl SectionKind {
    /// The six kinds present in every QY70 pattern, in their fixed AL order.
    pub const QY70_NATIVE: [SectionKind; 6] = [
        SectionKind::Intro,
        SectionKind::MainA,
        SectionKind::MainB,
        SectionKind::FillAB,
        SectionKind::FillBA,
        SectionKind::Ending,
    ];

    /// `true` for the six kinds a QY70 pattern carries; `false` for Q7P-only extended slots.
    pub fn is_qy70_native(self) -> bool {
        Self::QY70_NATIVE.contains(&self)
    }
}

/// One subdivision of a [`crate::model::Pattern`]: a fixed-size ordered set of tracks sharing a
/// length and (optionally overridden) time signature.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    enabled: bool,
    length_measures: SectionMeasures,
    time_signature: Option<TimeSignature>,
    tracks: Vec<Track>,
    config_blob: Vec<u8>,
    phrase: PhraseBytes,
}

/// Width, in bytes, of a [`Section`]'s opaque configuration blob (spec §3).
pub const CONFIG_BLOB_LEN: usize = 16;

impl Section {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            enabled: false,
            length_measures: SectionMeasures::default(),
            time_signature: None,
            tracks,
            config_blob: vec![0u8; CONFIG_BLOB_LEN],
            phrase: PhraseBytes::default(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn length_measures(&self) -> u16 {
        self.length_measures.get()
    }

    pub fn set_length_measures(&mut self, measures: u16) {
        self.length_measures = SectionMeasures::new(measures);
    }

    /// `None` means "inherits the owning pattern's time signature".
    pub fn time_signature(&self) -> Option<TimeSignature> {
        self.time_signature
    }

    pub fn set_time_signature(&mut self, sig: Option<TimeSignature>) {
        self.time_signature = sig;
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    pub fn config_blob(&self) -> &[u8] {
        &self.config_blob
    }

    pub fn set_config_blob(&mut self, blob: Vec<u8>) {
        self.config_blob = blob;
    }

    pub fn phrase(&self) -> &PhraseBytes {
        &self.phrase
    }

    pub fn set_phrase(&mut self, phrase: PhraseBytes) {
        self.phrase = phrase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pattern::SourceFormat;

    fn tracks(n: u8, format: SourceFormat) -> Vec<Track> {
        (1..=n).map(|i| Track::new(i, format)).collect()
    }

    #[test]
    fn qy70_native_kinds_are_exactly_six() {
        assert_eq!(6, SectionKind::QY70_NATIVE.len());
        assert!(SectionKind::MainA.is_qy70_native());
        assert!(!SectionKind::Break.is_qy70_native());
    }

    #[test]
    fn new_section_starts_disabled_with_empty_config_blob() {
        let section = Section::new(tracks(8, SourceFormat::Qy70));
        assert!(!section.enabled());
        assert_eq!(CONFIG_BLOB_LEN, section.config_blob().len());
        assert_eq!(8, section.tracks().len());
    }

    #[test]
    fn reserved_kinds_carry_their_raw_byte() {
        assert_eq!(SectionKind::Reserved(0x0c), SectionKind::Reserved(0x0c));
        assert_ne!(SectionKind::Reserved(0x0c), SectionKind::Reserved(0x0d));
    }
}
