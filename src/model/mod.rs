//! The neutral pattern model: the in-memory shape both the QY70 SysEx codec and the Q7P binary
//! codec read into and write out of (spec §3).

pub mod effects;
pub mod pattern;
pub mod phrase;
pub mod section;
pub mod time_signature;
pub mod track;

pub use effects::{EffectType, GlobalEffects};
pub use pattern::{Pattern, SourceFormat};
pub use phrase::PhraseBytes;
pub use section::{Section, SectionKind};
pub use time_signature::{Denominator, TimeSignature};
pub use track::{Mixer, NoteRange, Track, Voice};
