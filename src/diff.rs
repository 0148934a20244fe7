//! Region-aware and structural differ for two Q7P buffers (spec §4.10).

use crate::q7p::regions::{NAME_OFFSET, PATTERN_NUMBER_OFFSET, REGIONS, TEMPO_WORD_OFFSET};

/// A run of differing bytes within one named region.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegionDiff {
    pub region: &'static str,
    pub first_offset: usize,
    pub last_offset: usize,
    pub preview_a: Vec<u8>,
    pub preview_b: Vec<u8>,
}

/// A diff at a fixed, semantically named offset (as opposed to a raw byte run).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StructuralDiff {
    pub field: &'static str,
    pub offset: usize,
    pub a: String,
    pub b: String,
}

/// The full result of comparing two Q7P buffers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiffResult {
    pub identical: bool,
    pub byte_differences: usize,
    pub region_diffs: Vec<RegionDiff>,
    pub structural_diffs: Vec<StructuralDiff>,
}

const PREVIEW_LEN: usize = 8;

fn tempo_word(bytes: &[u8]) -> u16 {
    (bytes[TEMPO_WORD_OFFSET] as u16) << 8 | bytes[TEMPO_WORD_OFFSET + 1] as u16
}

fn name(bytes: &[u8]) -> String {
    crate::name::PatternName::from_bytes(&bytes[NAME_OFFSET..NAME_OFFSET + 10].try_into().unwrap())
        .trimmed()
        .to_string()
}

/// Compares two Q7P buffers byte-for-byte, grouped by the named regions of spec §4.6, plus a few
/// fixed-offset structural comparisons (name, tempo, pattern number).
pub fn diff_q7p(a: &[u8], b: &[u8]) -> DiffResult {
    let common_len = a.len().min(b.len());
    let byte_differences = (0..common_len).filter(|&i| a[i] != b[i]).count() + a.len().abs_diff(b.len());

    let mut region_diffs = Vec::new();
    for region in REGIONS {
        let start = region.start.min(common_len);
        let end = region.end.min(common_len);
        if start >= end {
            continue;
        }
        let mut first = None;
        let mut last = None;
        for i in start..end {
            if a[i] != b[i] {
                first.get_or_insert(i);
                last = Some(i);
            }
        }
        if let (Some(first), Some(last)) = (first, last) {
            let preview_end = (first + PREVIEW_LEN).min(end);
            region_diffs.push(RegionDiff {
                region: region.name,
                first_offset: first,
                last_offset: last,
                preview_a: a[first..preview_end].to_vec(),
                preview_b: b[first..preview_end].to_vec(),
            });
        }
    }

    let mut structural_diffs = Vec::new();
    if common_len > NAME_OFFSET + 10 {
        let (na, nb) = (name(a), name(b));
        if na != nb {
            structural_diffs.push(StructuralDiff { field: "name", offset: NAME_OFFSET, a: na, b: nb });
        }
    }
    if common_len > TEMPO_WORD_OFFSET + 2 {
        let (ta, tb) = (tempo_word(a), tempo_word(b));
        if ta != tb {
            structural_diffs.push(StructuralDiff {
                field: "tempo",
                offset: TEMPO_WORD_OFFSET,
                a: format!("{:.1} BPM", ta as f32 / 10.0),
                b: format!("{:.1} BPM", tb as f32 / 10.0),
            });
        }
    }
    if common_len > PATTERN_NUMBER_OFFSET {
        let (pa, pb) = (a[PATTERN_NUMBER_OFFSET], b[PATTERN_NUMBER_OFFSET]);
        if pa != pb {
            structural_diffs.push(StructuralDiff {
                field: "pattern_number",
                offset: PATTERN_NUMBER_OFFSET,
                a: pa.to_string(),
                b: pb.to_string(),
            });
        }
    }

    DiffResult {
        identical: byte_differences == 0,
        byte_differences,
        region_diffs,
        structural_diffs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q7p::template::build_minimal_template;

    #[test]
    fn identical_buffers_report_no_differences() {
        let buf = build_minimal_template(false);
        let result = diff_q7p(&buf, &buf);
        assert!(result.identical);
        assert_eq!(0, result.byte_differences);
        assert!(result.region_diffs.is_empty());
    }

    #[test]
    fn tempo_change_is_reported_structurally() {
        let a = build_minimal_template(false);
        let mut b = a.clone();
        b[TEMPO_WORD_OFFSET] = (1400u16 >> 8) as u8;
        b[TEMPO_WORD_OFFSET + 1] = (1400u16 & 0xFF) as u8;

        let result = diff_q7p(&a, &b);
        assert!(!result.identical);
        let tempo_diff = result.structural_diffs.iter().find(|d| d.field == "tempo").unwrap();
        assert_eq!("120.0 BPM", tempo_diff.a);
        assert_eq!("140.0 BPM", tempo_diff.b);
    }

    #[test]
    fn byte_differences_counts_every_mismatched_byte() {
        let a = vec![0u8, 1, 2, 3];
        let b = vec![0u8, 9, 2, 9];
        let result = diff_q7p(&a, &b);
        assert_eq!(2, result.byte_differences);
    }
}
