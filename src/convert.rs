//! Bidirectional conversion between QY70 SysEx bulk dumps and Q7P files (spec §4.8).

use log::warn;

use crate::error::LibResult;
use crate::model::section::{SectionKind, CONFIG_BLOB_LEN};
use crate::model::{Pattern, Section, SourceFormat, Track};
use crate::q7p::codec::decode_q7p;
use crate::q7p::encode_q7p;
use crate::q7p::regions::{PHRASE_BYTES_PER_SECTION, SIZE_LARGE};
use crate::qy70::decode::decode_qy70;
use crate::qy70::encode::encode_qy70;

/// A non-fatal data-fidelity gap encountered during conversion (spec §4.8, §7).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConvertWarning {
    /// A 16-track Q7P source had tracks 9–16 populated; only tracks 1–8 survive on QY70.
    Tracks9To16Dropped,
    /// Per-track volume/reverb/chorus have no known offset in the QY70 640-byte header, so they
    /// could not be written; the header is carried through verbatim instead.
    MixerMappingUnknown,
    /// A section's phrase bytes were longer than the Q7P Phrase region's 80-bytes-per-section
    /// budget and were truncated.
    PhraseTruncated,
    /// The per-track event bitstream cannot be re-synthesized from Q7P phrase bytes; it is
    /// carried through byte-exact from whatever the source held instead.
    EventStreamCarriedThrough,
}

/// Converts a QY70 SysEx bulk dump into a Q7P buffer, starting from `template` (or the built-in
/// minimal template when `None`). Tempo and section enablement transfer exactly; the pattern name
/// is not carried (QY70 dumps carry no name, spec §4.5).
pub fn convert_qy70_to_q7p(syx: &[u8], template: Option<&[u8]>) -> crate::error::Result<(Vec<u8>, Vec<ConvertWarning>)> {
    convert_qy70_to_q7p_impl(syx, template).map_err(Into::into)
}

fn convert_qy70_to_q7p_impl(syx: &[u8], template: Option<&[u8]>) -> LibResult<(Vec<u8>, Vec<ConvertWarning>)> {
    let source = decode_qy70(syx)?;
    let mut warnings = Vec::new();

    let mut q7p_pattern = Pattern::new(SourceFormat::Q7p);
    q7p_pattern.set_tempo_bpm(source.tempo_bpm());

    for kind in SectionKind::QY70_NATIVE {
        let Some(src_section) = source.section(kind) else { continue };
        let tracks: Vec<Track> = src_section.tracks().to_vec();
        let mut section = Section::new(tracks);
        section.set_enabled(src_section.enabled());
        // The Q7P SectionData block has no QY70 equivalent to draw from; left zeroed (spec §4.8
        // "by convention", §9 Open Question 4).
        section.set_config_blob(vec![0u8; CONFIG_BLOB_LEN]);

        let phrase = src_section.phrase().as_slice();
        if phrase.len() > PHRASE_BYTES_PER_SECTION {
            warn!("section {:?} phrase ({} bytes) exceeds the {}-byte Q7P budget, truncating", kind, phrase.len(), PHRASE_BYTES_PER_SECTION);
            warnings.push(ConvertWarning::PhraseTruncated);
        }
        let kept = phrase.len().min(PHRASE_BYTES_PER_SECTION);
        section.set_phrase(phrase[..kept].to_vec().into());

        q7p_pattern.set_section(kind, section);
    }

    Ok((encode_q7p(&q7p_pattern, template), warnings))
}

/// Converts a Q7P buffer into a QY70 SysEx bulk dump. Always warns about the two structural data
/// gaps spec §4.8 documents (per-track mixer offsets, event-stream re-synthesis); additionally
/// warns when a 16-track source had tracks 9–16 populated, since only 1–8 survive on QY70.
pub fn convert_q7p_to_qy70(q7p: &[u8]) -> crate::error::Result<(Vec<u8>, Vec<ConvertWarning>)> {
    convert_q7p_to_qy70_impl(q7p).map_err(Into::into)
}

fn convert_q7p_to_qy70_impl(q7p: &[u8]) -> LibResult<(Vec<u8>, Vec<ConvertWarning>)> {
    let source = decode_q7p(q7p)?;
    let mut warnings = vec![ConvertWarning::MixerMappingUnknown, ConvertWarning::EventStreamCarriedThrough];

    if q7p.len() == SIZE_LARGE {
        let any_extra_enabled = source.sections().values().any(|s| s.tracks().iter().skip(8).any(Track::enabled));
        if any_extra_enabled {
            warn!("dropping tracks 9-16 of a 16-track q7p source during conversion to qy70");
            warnings.push(ConvertWarning::Tracks9To16Dropped);
        }
    }

    let mut qy_pattern = Pattern::new(SourceFormat::Qy70);
    qy_pattern.set_tempo_bpm(source.tempo_bpm());

    for kind in SectionKind::QY70_NATIVE {
        let Some(src_section) = source.section(kind) else { continue };
        let tracks: Vec<Track> = src_section.tracks().iter().take(8).cloned().collect();
        let mut section = Section::new(tracks);
        section.set_enabled(src_section.enabled());
        qy_pattern.set_section(kind, section);
    }

    Ok((encode_qy70(&qy_pattern)?, warnings))
}
