//! Per-region statistics over a Q7P buffer, for hex-dump/visual-map rendering (spec §4.11).

use crate::q7p::regions::REGIONS;

/// A fixed set of byte values that count as "filler" everywhere, on top of any region-specific
/// expected fill (spec §4.11).
const GENERIC_FILLERS: &[u8] = &[0x00, 0x20, 0x40, 0x7F, 0xFE, 0xF8];

/// Statistics for one named region of a Q7P buffer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegionInfo {
    pub start: usize,
    pub end: usize,
    pub name: &'static str,
    pub size: usize,
    pub nonzero_count: usize,
    /// Bytes that are neither `0x00` nor a recognized filler value for this region.
    pub meaningful_count: usize,
    /// `meaningful_count as f64 / size as f64`, or `0.0` for a zero-length region.
    pub density: f64,
}

fn is_filler(byte: u8, region_fill: Option<u8>) -> bool {
    GENERIC_FILLERS.contains(&byte) || region_fill == Some(byte)
}

/// Enumerates every named region of `bytes` (clipped to the buffer's actual length) with
/// nonzero/meaningful byte counts and density.
pub fn inspect_regions(bytes: &[u8]) -> Vec<RegionInfo> {
    REGIONS
        .iter()
        .filter_map(|region| {
            let start = region.start.min(bytes.len());
            let end = region.end.min(bytes.len());
            if start >= end {
                return None;
            }
            let slice = &bytes[start..end];
            let nonzero_count = slice.iter().filter(|&&b| b != 0x00).count();
            let meaningful_count = slice.iter().filter(|&&b| !is_filler(b, region.expected_fill)).count();
            let size = end - start;
            Some(RegionInfo {
                start,
                end,
                name: region.name,
                size,
                nonzero_count,
                meaningful_count,
                density: if size == 0 { 0.0 } else { meaningful_count as f64 / size as f64 },
            })
        })
        .collect()
}
