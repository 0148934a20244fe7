//! End-to-end tests exercising only the crate's public API (spec §8 "End-to-end scenarios").

use qy_codec::{
    convert_q7p_to_qy70, convert_qy70_to_q7p, decode_q7p, decode_qy70, diff_q7p, encode_q7p, encode_qy70,
    inspect_regions, validate_q7p, validate_qy70, ConvertWarning, Pattern, PatternName, Section, SectionKind,
    SourceFormat, Track,
};

fn minimal_q7p() -> Vec<u8> {
    let pattern = Pattern::new(SourceFormat::Q7p);
    encode_q7p(&pattern, None)
}

fn eight_tracks(source: SourceFormat) -> Vec<Track> {
    (1..=8u8).map(|i| Track::new(i, source)).collect()
}

fn minimal_qy70_syx() -> Vec<u8> {
    let mut pattern = Pattern::new(SourceFormat::Qy70);
    pattern.set_tempo_bpm(120);
    let mut section = Section::new(eight_tracks(SourceFormat::Qy70));
    section.set_enabled(true);
    pattern.set_section(SectionKind::Intro, section);
    encode_qy70(&pattern).unwrap()
}

/// Scenario 1: round-trip a known-good Q7P buffer byte-for-byte, with zero validator errors.
#[test]
fn round_trips_a_known_good_q7p_buffer() {
    let mut buf = minimal_q7p();
    buf[0x010] = 1; // pattern number
    buf[0x188] = (1200u16 >> 8) as u8; // tempo raw word 1200 -> 120.0 bpm
    buf[0x189] = (1200u16 & 0xFF) as u8;

    let pattern = decode_q7p(&buf).unwrap();
    assert_eq!(1, pattern.number());
    assert_eq!(120, pattern.tempo_bpm());

    let re_encoded = encode_q7p(&pattern, None);
    assert_eq!(buf, re_encoded);
    assert!(validate_q7p(&buf).is_valid());
}

/// Scenario 5: a `0xFEFE` section pointer decodes to `enabled == false`; any other value decodes
/// to `enabled == true`.
#[test]
fn disabled_section_pointer_decodes_to_disabled_section() {
    let mut buf = minimal_q7p();
    // SectionPtrs table: Intro at 0x100, MainA at 0x102, MainB at 0x104 (spec §4.6).
    buf[0x100] = 0x00;
    buf[0x101] = 0x01;
    buf[0x102] = 0x00;
    buf[0x103] = 0x01;
    // MainB (0x104..0x106) is left at the template's default 0xFEFE.

    let pattern = decode_q7p(&buf).unwrap();
    assert!(pattern.section(SectionKind::Intro).unwrap().enabled());
    assert!(pattern.section(SectionKind::MainA).unwrap().enabled());
    assert!(!pattern.section(SectionKind::MainB).unwrap().enabled());
}

/// Scenario 4: the differ reports a structural tempo diff at the tempo word's offset.
#[test]
fn diff_detects_a_tempo_change() {
    let a = minimal_q7p();
    let mut b = a.clone();
    b[0x188] = (1400u16 >> 8) as u8;
    b[0x189] = (1400u16 & 0xFF) as u8;

    let result = diff_q7p(&a, &b);
    assert!(!result.identical);
    let tempo_diff = result.structural_diffs.iter().find(|d| d.field == "tempo").unwrap();
    assert_eq!(0x188, tempo_diff.offset);
    assert_eq!("120.0 BPM", tempo_diff.a);
    assert_eq!("140.0 BPM", tempo_diff.b);
}

#[test]
fn identical_q7p_buffers_diff_as_identical() {
    let buf = minimal_q7p();
    let result = diff_q7p(&buf, &buf);
    assert!(result.identical);
    assert_eq!(0, result.byte_differences);
}

/// A deliberately corrupted magic yields exactly one bad-magic-class error and nothing else.
#[test]
fn validator_flags_corrupted_magic_as_a_single_error() {
    let mut buf = minimal_q7p();
    buf[0] = b'X';
    let result = validate_q7p(&buf);
    assert!(!result.is_valid());
    let magic_errors: Vec<_> = result.errors().filter(|i| i.area == "magic").collect();
    assert_eq!(1, magic_errors.len());
}

#[test]
fn validator_rejects_wrong_size_buffers() {
    let result = validate_q7p(&[0u8; 42]);
    assert!(!result.is_valid());
}

/// Full QY70 bulk dump round-trips through decode/encode with tempo and section enablement
/// intact (spec §8 "Converter preservation").
#[test]
fn qy70_bulk_dump_round_trips_tempo_and_enablement() {
    let syx = minimal_qy70_syx();
    let decoded = decode_qy70(&syx).unwrap();
    assert_eq!(120, decoded.tempo_bpm());
    assert!(decoded.section(SectionKind::Intro).unwrap().enabled());
    assert!(validate_qy70(&syx).is_valid());

    let re_encoded = encode_qy70(&decoded).unwrap();
    let re_decoded = decode_qy70(&re_encoded).unwrap();
    assert_eq!(decoded.tempo_bpm(), re_decoded.tempo_bpm());
    assert!(re_decoded.section(SectionKind::Intro).unwrap().enabled());
}

/// Scenario 6: converting a 16-track Q7P (tracks 9-16 populated) to QY70 drops tracks 9-16 and
/// reports the loss as a warning rather than silently discarding it.
#[test]
fn converting_a_sixteen_track_q7p_warns_about_dropped_tracks() {
    let mut pattern = Pattern::new(SourceFormat::Q7p);
    let tracks = (1..=16u8)
        .map(|i| {
            let mut t = Track::new(i, SourceFormat::Q7p);
            t.set_enabled(true);
            t
        })
        .collect::<Vec<_>>();
    let mut section = Section::new(tracks);
    section.set_enabled(true);
    pattern.set_section(SectionKind::Intro, section);

    // encode_q7p only emits a 5120-byte (large) buffer when a non-native section kind is present,
    // so round-trip through a large template directly instead.
    let large_template = {
        let empty = Pattern::new(SourceFormat::Q7p);
        let mut buf = encode_q7p(&empty, None);
        buf.resize(5120, 0xF8);
        buf[0..16].copy_from_slice(b"YQ7PAT     V1.00");
        buf
    };
    let q7p_bytes = encode_q7p(&pattern, Some(&large_template));

    let (qy_bytes, warnings) = convert_q7p_to_qy70(&q7p_bytes).unwrap();
    assert!(warnings.contains(&ConvertWarning::MixerMappingUnknown));
    assert!(warnings.contains(&ConvertWarning::EventStreamCarriedThrough));
    assert!(warnings.contains(&ConvertWarning::Tracks9To16Dropped));

    let qy_pattern = decode_qy70(&qy_bytes).unwrap();
    let intro = qy_pattern.section(SectionKind::Intro).unwrap();
    assert_eq!(8, intro.tracks().len());
}

/// QY70 -> Q7P -> QY70 preserves tempo and section enablement (spec §8 "Converter preservation").
#[test]
fn qy70_to_q7p_to_qy70_preserves_tempo_and_enablement() {
    let syx = minimal_qy70_syx();
    let (q7p_bytes, warnings) = convert_qy70_to_q7p(&syx, None).unwrap();
    assert!(warnings.is_empty());
    assert!(validate_q7p(&q7p_bytes).is_valid());

    let (round_tripped, warnings_back) = convert_q7p_to_qy70(&q7p_bytes).unwrap();
    assert!(warnings_back.contains(&ConvertWarning::MixerMappingUnknown));

    let original = decode_qy70(&syx).unwrap();
    let roundtrip = decode_qy70(&round_tripped).unwrap();
    assert_eq!(original.tempo_bpm(), roundtrip.tempo_bpm());
    assert!(roundtrip.section(SectionKind::Intro).unwrap().enabled());
}

#[test]
fn region_inspector_reports_fill_and_pad_areas_as_empty_of_meaningful_bytes() {
    let buf = minimal_q7p();
    let regions = inspect_regions(&buf);
    let fill = regions.iter().find(|r| r.name == "FillArea").unwrap();
    let pad = regions.iter().find(|r| r.name == "PadArea").unwrap();
    assert_eq!(0, fill.meaningful_count);
    assert_eq!(0, pad.meaningful_count);
}

#[test]
fn pattern_name_round_trips_through_q7p_encode_decode() {
    let mut pattern = Pattern::new(SourceFormat::Q7p);
    pattern.set_name(PatternName::new("MY GROOVE"));
    let bytes = encode_q7p(&pattern, None);
    let decoded = decode_q7p(&bytes).unwrap();
    assert_eq!("MY GROOVE", decoded.name().trimmed());
}
