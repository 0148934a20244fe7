//! Decodes and encodes the fixed-layout Q7P binary format (spec §4.7).

use log::{debug, warn};
use snafu::ensure;

use crate::error::{self, LibResult};
use crate::model::section::SectionKind;
use crate::model::track::{Mixer, Voice};
use crate::model::{Pattern, Section, SourceFormat, Track};
use crate::name::PatternName;
use crate::numbers::{BankLsb, BankMsb, ChorusSend, MidiChannel, Pan, Program, ReverbSend, Volume};
use crate::q7p::regions::*;
use crate::q7p::template::build_minimal_template;

/// The eleven section kinds a Q7P file's section-pointer table can name, in slot order. Only the
/// first six have a defined `SectionData`/`Phrase` layout on a 3072-byte file (spec §4.6, §9 Open
/// Question 6).
const SECTION_SLOTS: [SectionKind; 11] = [
    SectionKind::Intro,
    SectionKind::MainA,
    SectionKind::MainB,
    SectionKind::FillAB,
    SectionKind::FillBA,
    SectionKind::Ending,
    SectionKind::MainC,
    SectionKind::MainD,
    SectionKind::Intro2,
    SectionKind::Ending2,
    SectionKind::Break,
];

fn read_u16_be(bytes: &[u8], offset: usize) -> u16 {
    (bytes[offset] as u16) << 8 | bytes[offset + 1] as u16
}

fn write_u16_be(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset] = (value >> 8) as u8;
    bytes[offset + 1] = (value & 0xFF) as u8;
}

fn track_count_for(size: usize) -> usize {
    if size == SIZE_LARGE {
        TRACKS_PER_SECTION_LARGE
    } else {
        TRACKS_PER_SECTION_SMALL
    }
}

/// Decodes a Q7P buffer into a [`Pattern`]. Bank/program/volume/pan/reverb/channel are stored
/// once per track *position* and shared by every section (the format has no per-section-per-track
/// voice table, unlike QY70) — every [`Section`]'s tracks are built from this shared table, only
/// `phrase` and `enabled` varying per section.
pub(crate) fn decode_q7p(bytes: &[u8]) -> LibResult<Pattern> {
    ensure!(
        bytes.len() == SIZE_SMALL || bytes.len() == SIZE_LARGE,
        error::UnexpectedSize {
            site: site!(),
            got: bytes.len(),
            expected: format!("{} or {}", SIZE_SMALL, SIZE_LARGE),
        }
    );
    ensure!(
        &bytes[0..16] == MAGIC,
        error::BadMagic {
            site: site!(),
            expected: std::str::from_utf8(MAGIC).unwrap_or("YQ7PAT     V1.00"),
            found: String::from_utf8_lossy(&bytes[0..16]).into_owned(),
        }
    );

    let is_large = bytes.len() == SIZE_LARGE;
    let track_count = track_count_for(bytes.len());

    let mut pattern = Pattern::new(SourceFormat::Q7p);
    pattern.set_number(bytes[PATTERN_NUMBER_OFFSET] as u16);
    pattern.set_flags(bytes[FLAGS_OFFSET]);

    let tempo_word = read_u16_be(bytes, TEMPO_WORD_OFFSET);
    let tempo_bpm = ((tempo_word + 5) / 10).max(1);
    pattern.set_tempo_bpm(tempo_bpm);
    debug!("decoded q7p header: tempo_word={} -> {} bpm, track_count={}", tempo_word, tempo_bpm, track_count);

    let name_bytes: [u8; 10] = bytes[NAME_OFFSET..NAME_OFFSET + 10].try_into().unwrap();
    pattern.set_name(PatternName::from_bytes(&name_bytes));

    let track_enable_flags = read_u16_be(bytes, TRACK_CONFIG_OFFSET + 8);
    let shared_tracks: Vec<Track> = (0..track_count)
        .map(|i| {
            let number = bytes[TRACK_CONFIG_OFFSET + i.min(7)];
            let mut track = Track::new(if number == 0 { (i + 1) as u8 } else { number }, SourceFormat::Q7p);

            let bank_msb = BankMsb::new(bytes[BANK_MSB_OFFSET + i]);
            let program = Program::new(bytes[PROGRAM_OFFSET + i]);
            let bank_lsb = BankLsb::new(bytes[BANK_LSB_OFFSET + i]);
            track.set_voice(Voice { bank_msb, program, bank_lsb });

            let volume = Volume::new(bytes[VOLUME_TABLE_OFFSET + TABLE_HEADER_LEN + i]);
            let pan = Pan::new(bytes[PAN_TABLE_OFFSET + TABLE_HEADER_LEN + i]);
            let reverb_send = ReverbSend::new(bytes[REVERB_TABLE_OFFSET + TABLE_HEADER_LEN + i]);
            track.set_mixer(Mixer { volume, pan, reverb_send, chorus_send: ChorusSend::default() });

            let channel_raw = bytes[CHANNELS_OFFSET + i];
            let channel = if channel_raw == 0 {
                DEFAULT_CHANNELS[i]
            } else {
                channel_raw + 1
            };
            track.set_channel(MidiChannel::new(channel));
            track.set_is_drum(channel == 10);
            track.set_enabled(track_enable_flags & (1 << (15 - i.min(15))) != 0);
            track
        })
        .collect();

    let slot_count = if is_large { SECTION_SLOTS.len() } else { SectionKind::QY70_NATIVE.len() };
    for (idx, kind) in SECTION_SLOTS.iter().enumerate().take(slot_count) {
        let pointer = read_u16_be(bytes, SECTION_PTRS_OFFSET + idx * 2);
        let enabled = pointer != SECTION_PTR_DISABLED;

        let mut section = Section::new(shared_tracks.clone());
        section.set_enabled(enabled);

        if idx < SectionKind::QY70_NATIVE.len() {
            let config_offset = SECTION_DATA_OFFSET + idx * SECTION_DATA_LEN;
            section.set_config_blob(bytes[config_offset..config_offset + SECTION_DATA_LEN].to_vec());

            let phrase_offset = PHRASE_OFFSET + idx * PHRASE_BYTES_PER_SECTION;
            let phrase_end = (phrase_offset + PHRASE_BYTES_PER_SECTION).min(bytes.len());
            if phrase_offset < phrase_end {
                section.set_phrase(bytes[phrase_offset..phrase_end].to_vec().into());
            }
        } else {
            warn!("q7p section slot {:?} has no defined per-section layout, carrying pointer only", kind);
        }

        pattern.set_section(*kind, section);
    }

    pattern.set_raw_template(Some(bytes.to_vec()));
    Ok(pattern)
}

/// Encodes a [`Pattern`] back to a Q7P buffer: copy-then-patch over `template`, falling back to
/// the pattern's own captured `raw_template`, falling back to the built-in minimal template
/// (spec §4.7, §9 "Carry-through of unknown bytes").
pub fn encode_q7p(pattern: &Pattern, template: Option<&[u8]>) -> Vec<u8> {
    let is_large = SECTION_SLOTS.iter().any(|k| !k.is_qy70_native() && pattern.section(*k).is_some());
    let mut base = template
        .map(<[u8]>::to_vec)
        .or_else(|| pattern.raw_template().map(<[u8]>::to_vec))
        .unwrap_or_else(|| build_minimal_template(is_large));
    if base.len() != SIZE_SMALL && base.len() != SIZE_LARGE {
        warn!("q7p encode template has an invalid size ({} bytes), falling back to the minimal template", base.len());
        base = build_minimal_template(is_large);
    }
    let size = base.len();
    let track_count = track_count_for(size);

    base[0..16].copy_from_slice(MAGIC);
    base[PATTERN_NUMBER_OFFSET] = pattern.number() as u8;
    base[FLAGS_OFFSET] = pattern.flags();
    write_u16_be(&mut base, SIZE_MARKER_OFFSET, size as u16);
    write_u16_be(&mut base, TEMPO_WORD_OFFSET, pattern.tempo_bpm() * 10);
    base[NAME_OFFSET..NAME_OFFSET + 10].copy_from_slice(&pattern.name().to_bytes());

    let slot_count = if is_large { SECTION_SLOTS.len() } else { SectionKind::QY70_NATIVE.len() };

    // The per-track tables are shared across sections; take the first enabled section's tracks
    // as the canonical source (spec doesn't resolve what happens when sections disagree — see
    // DESIGN.md).
    let canonical = SECTION_SLOTS
        .iter()
        .take(slot_count)
        .filter_map(|k| pattern.section(*k))
        .find(|s| s.enabled())
        .or_else(|| SECTION_SLOTS.iter().take(slot_count).find_map(|k| pattern.section(*k)));

    if let Some(section) = canonical {
        let mut enable_flags: u16 = 0;
        for (i, track) in section.tracks().iter().enumerate().take(track_count) {
            if i < 8 {
                let default_number = (i + 1) as u8;
                let old_raw = base[TRACK_CONFIG_OFFSET + i];
                let old_number = if old_raw == 0 { default_number } else { old_raw };
                // Only rewrite the stored byte if the number actually changed, so an unmodified
                // track's sentinel-vs-literal encoding round-trips byte-exact.
                if track.number() != old_number {
                    base[TRACK_CONFIG_OFFSET + i] =
                        if track.number() == default_number { 0 } else { track.number() };
                }
            }
            base[BANK_MSB_OFFSET + i] = track.voice().bank_msb.get();
            base[PROGRAM_OFFSET + i] = track.voice().program.get();
            base[BANK_LSB_OFFSET + i] = track.voice().bank_lsb.get();
            base[VOLUME_TABLE_OFFSET + TABLE_HEADER_LEN + i] = track.mixer().volume.get();
            base[PAN_TABLE_OFFSET + TABLE_HEADER_LEN + i] = track.mixer().pan.get();
            base[REVERB_TABLE_OFFSET + TABLE_HEADER_LEN + i] = track.mixer().reverb_send.get();
            let default_channel = DEFAULT_CHANNELS[i];
            let old_channel_raw = base[CHANNELS_OFFSET + i];
            let old_channel = if old_channel_raw == 0 { default_channel } else { old_channel_raw + 1 };
            let channel = track.channel().get();
            // Same rule as the track number above: leave the stored byte alone unless the
            // channel actually changed, otherwise a literal byte that happens to decode to the
            // positional default collapses to the sentinel `0` on re-encode and corrupts it.
            if channel != old_channel {
                base[CHANNELS_OFFSET + i] = if channel == default_channel { 0 } else { channel - 1 };
            }
            if track.enabled() {
                enable_flags |= 1 << (15 - i.min(15));
            }
        }
        write_u16_be(&mut base, TRACK_CONFIG_OFFSET + 8, enable_flags);
    }

    for (idx, kind) in SECTION_SLOTS.iter().enumerate().take(slot_count) {
        let ptr_offset = SECTION_PTRS_OFFSET + idx * 2;
        match pattern.section(*kind) {
            Some(section) if section.enabled() => {
                if read_u16_be(&base, ptr_offset) == SECTION_PTR_DISABLED {
                    write_u16_be(&mut base, ptr_offset, 0x0000);
                }
                if idx < SectionKind::QY70_NATIVE.len() {
                    let config_offset = SECTION_DATA_OFFSET + idx * SECTION_DATA_LEN;
                    let blob = section.config_blob();
                    base[config_offset..config_offset + blob.len().min(SECTION_DATA_LEN)]
                        .copy_from_slice(&blob[..blob.len().min(SECTION_DATA_LEN)]);

                    let phrase_offset = PHRASE_OFFSET + idx * PHRASE_BYTES_PER_SECTION;
                    let phrase = section.phrase().as_slice();
                    let copy_len = phrase.len().min(PHRASE_BYTES_PER_SECTION).min(base.len().saturating_sub(phrase_offset));
                    base[phrase_offset..phrase_offset + copy_len].copy_from_slice(&phrase[..copy_len]);
                    if phrase.len() > PHRASE_BYTES_PER_SECTION {
                        warn!("section {:?} phrase truncated from {} to {} bytes", kind, phrase.len(), PHRASE_BYTES_PER_SECTION);
                    }
                }
            }
            _ => write_u16_be(&mut base, ptr_offset, SECTION_PTR_DISABLED),
        }
    }

    for b in &mut base[FILL_AREA_OFFSET..PAD_AREA_OFFSET] {
        *b = FILL_AREA_BYTE;
    }
    for b in &mut base[PAD_AREA_OFFSET..PAD_AREA_END] {
        *b = PAD_AREA_BYTE;
    }

    base
}
