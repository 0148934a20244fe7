//! A bidirectional codec for the Yamaha QY70 SysEx bulk-dump format and the QY700 Q7P pattern
//! file format, plus a neutral pattern model and a set of structural tools (converter, validator,
//! differ, region inspector) that operate on both.
//!
//! Every entry point here is a synchronous, pure function over an owned or borrowed byte buffer;
//! there is no shared state and no interior mutability anywhere in the model.

#![allow(dead_code)]

#[macro_use]
mod error;
#[macro_use]
mod clamp;

mod checksum;
mod name;
mod numbers;
mod sevenbit;
mod sysex;

pub mod convert;
pub mod diff;
pub mod inspect;
pub mod model;
pub mod q7p;
pub mod qy70;
pub mod validate;

pub use convert::{convert_q7p_to_qy70, convert_qy70_to_q7p, ConvertWarning};
pub use diff::{diff_q7p, DiffResult, RegionDiff, StructuralDiff};
pub use error::{Error, Result};
pub use inspect::{inspect_regions, RegionInfo};
pub use model::{
    Denominator, EffectType, GlobalEffects, Mixer, NoteRange, Pattern, PhraseBytes, Section, SectionKind,
    SourceFormat, TimeSignature, Track, Voice,
};
pub use name::PatternName;
pub use q7p::{decode_q7p, encode_q7p};
pub use qy70::{decode_qy70, encode_qy70};
pub use validate::{validate_q7p, validate_qy70, Severity, ValidationIssue, ValidationResult};
