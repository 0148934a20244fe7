//! Bounded newtypes for the small integer quantities the pattern model carries around. Built on
//! the `clamp!` macro so every range in §3 of the format notes gets its own type instead of a bare
//! `u8`/`u16` that a caller could set out of range.

// MIDI channel, 1-16 as displayed; drums conventionally live on channel 10.
clamp!(MidiChannel, u8, 1, 16, 1, pub);

// 0-127 7-bit MIDI data-byte quantities.
clamp!(BankMsb, u8, 0, 127, 0, pub);
clamp!(Program, u8, 0, 127, 0, pub);
clamp!(BankLsb, u8, 0, 127, 0, pub);
clamp!(Volume, u8, 0, 127, 100, pub);
// 64 = center, 0 = random (QY70/QY700 convention, see Track::pan).
clamp!(Pan, u8, 0, 127, 64, pub);
clamp!(ReverbSend, u8, 0, 127, 40, pub);
clamp!(ChorusSend, u8, 0, 127, 0, pub);
clamp!(NoteNumber, u8, 0, 127, 60, pub);

// Pattern-level quantities.
clamp!(TempoBpm, u16, 20, 300, 120, pub);
clamp!(PatternNumber, u16, 0, 255, 0, pub);
clamp!(SectionMeasures, u16, 1, 256, 4, pub);
clamp!(TimeSigNumerator, u8, 1, 32, 4, pub);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_clamps_and_defaults_to_center() {
        assert_eq!(64, Pan::default().get());
        assert_eq!(127, Pan::new(200).get());
        assert_eq!(0, Pan::new(0).get());
    }

    #[test]
    fn tempo_clamps_to_usable_window() {
        assert_eq!(20, TempoBpm::new(5).get());
        assert_eq!(300, TempoBpm::new(5000).get());
        assert_eq!(155, TempoBpm::new(155).get());
    }
}
