//! [`Pattern`], the top-level decoded unit this crate reads and writes.

use std::collections::HashMap;

use crate::model::effects::GlobalEffects;
use crate::model::section::SectionKind;
use crate::model::time_signature::TimeSignature;
use crate::model::Section;
use crate::name::PatternName;
use crate::numbers::{PatternNumber, TempoBpm};

/// Which device format a [`Pattern`] was decoded from, or is destined for. Several model
/// operations (track naming, section-kind availability) branch on this.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceFormat {
    Qy70,
    Q7p,
}

/// A fully decoded pattern: the neutral, format-agnostic model both codecs read into and write
/// from (spec §3).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern {
    name: PatternName,
    number: PatternNumber,
    tempo_bpm: TempoBpm,
    time_signature: TimeSignature,
    flags: u8,
    sections: HashMap<SectionKind, Section>,
    global_effects: GlobalEffects,
    source_format: SourceFormat,
    /// Retained only for patterns decoded from a Q7P buffer: the original bytes, used as the
    /// copy-then-patch template when re-encoding so that unknown/opaque regions survive
    /// unchanged (spec §4.7, §9).
    raw_template: Option<Vec<u8>>,
}

impl Pattern {
    pub fn new(source_format: SourceFormat) -> Self {
        Self {
            name: PatternName::new("NEW STYLE"),
            number: PatternNumber::default(),
            tempo_bpm: TempoBpm::default(),
            time_signature: TimeSignature::common_time(),
            flags: 0,
            sections: HashMap::new(),
            global_effects: GlobalEffects::default(),
            source_format,
            raw_template: None,
        }
    }

    pub fn name(&self) -> &PatternName {
        &self.name
    }

    pub fn set_name(&mut self, name: PatternName) {
        self.name = name;
    }

    pub fn number(&self) -> u16 {
        self.number.get()
    }

    pub fn set_number(&mut self, number: u16) {
        self.number = PatternNumber::new(number);
    }

    pub fn tempo_bpm(&self) -> u16 {
        self.tempo_bpm.get()
    }

    pub fn set_tempo_bpm(&mut self, bpm: u16) {
        self.tempo_bpm = TempoBpm::new(bpm);
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn set_time_signature(&mut self, sig: TimeSignature) {
        self.time_signature = sig;
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn set_flags(&mut self, flags: u8) {
        self.flags = flags;
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.get(&kind)
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> Option<&mut Section> {
        self.sections.get_mut(&kind)
    }

    pub fn set_section(&mut self, kind: SectionKind, section: Section) {
        self.sections.insert(kind, section);
    }

    pub fn sections(&self) -> &HashMap<SectionKind, Section> {
        &self.sections
    }

    pub fn global_effects(&self) -> GlobalEffects {
        self.global_effects
    }

    pub fn set_global_effects(&mut self, effects: GlobalEffects) {
        self.global_effects = effects;
    }

    pub fn source_format(&self) -> SourceFormat {
        self.source_format
    }

    pub fn raw_template(&self) -> Option<&[u8]> {
        self.raw_template.as_deref()
    }

    pub fn set_raw_template(&mut self, template: Option<Vec<u8>>) {
        self.raw_template = template;
    }
}
