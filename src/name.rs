//! [`PatternName`], the fixed-width 7-bit-ASCII name every [`crate::model::Pattern`] carries.
//!
//! Modeled after this crate's general approach to lossy-but-recoverable byte data: a `Text`-like
//! type that holds what it was given and normalizes only when asked to round-trip through bytes.

use log::warn;
use std::fmt::{Display, Formatter};

/// Width, in bytes, of a Q7P template name / QY700 pattern name field.
pub const NAME_WIDTH: usize = 10;

/// A pattern display name: at most 10 glyphs drawn from the printable 7-bit ASCII range
/// (`0x20..=0x7E`), right-padded with spaces to exactly [`NAME_WIDTH`] bytes on the wire.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternName(String);

impl PatternName {
    /// Builds a name from a string, truncating to [`NAME_WIDTH`] glyphs and replacing any byte
    /// outside the printable-ASCII range with a space.
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut cleaned: String = s
            .as_ref()
            .bytes()
            .take(NAME_WIDTH)
            .map(|b| if (0x20..=0x7E).contains(&b) { b as char } else { ' ' })
            .collect();
        if cleaned.len() < NAME_WIDTH {
            cleaned.push_str(&" ".repeat(NAME_WIDTH - cleaned.len()));
        }
        Self(cleaned)
    }

    /// Parses a name from exactly [`NAME_WIDTH`] raw bytes, as found in a Q7P `TemplateInfo`
    /// region. Trailing `0x00`/`0x20` bytes are trimmed from the returned string, but the
    /// canonical wire form is reconstructed by [`PatternName::to_bytes`].
    pub fn from_bytes(bytes: &[u8; NAME_WIDTH]) -> Self {
        let trimmed_len = bytes
            .iter()
            .rposition(|&b| b != 0x00 && b != 0x20)
            .map(|i| i + 1)
            .unwrap_or(0);
        match std::str::from_utf8(&bytes[..trimmed_len]) {
            Ok(s) => Self::new(s),
            Err(_) => {
                warn!("pattern name bytes are not valid ASCII, replacing unreadable glyphs");
                let lossy: String = bytes[..trimmed_len]
                    .iter()
                    .map(|&b| if (0x20..=0x7E).contains(&b) { b as char } else { '?' })
                    .collect();
                Self::new(lossy)
            }
        }
    }

    /// Returns the name encoded to exactly [`NAME_WIDTH`] space-padded ASCII bytes.
    pub fn to_bytes(&self) -> [u8; NAME_WIDTH] {
        let mut out = [0x20u8; NAME_WIDTH];
        for (i, b) in self.0.bytes().take(NAME_WIDTH).enumerate() {
            out[i] = b;
        }
        out
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name with trailing padding spaces removed, for display.
    pub fn trimmed(&self) -> &str {
        self.0.trim_end()
    }
}

impl Display for PatternName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.trimmed())
    }
}

impl From<&str> for PatternName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PatternName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_and_truncates() {
        let name = PatternName::new("HELLO");
        assert_eq!(b"HELLO     ", &name.to_bytes());
        let name = PatternName::new("WAY TOO LONG A NAME");
        assert_eq!(b"WAY TOO TO", &name.to_bytes());
    }

    #[test]
    fn round_trips_from_bytes() {
        let bytes = *b"NEW STYLE ";
        let name = PatternName::from_bytes(&bytes);
        assert_eq!("NEW STYLE", name.trimmed());
        assert_eq!(bytes, name.to_bytes());
    }

    #[test]
    fn trims_null_padding() {
        let mut bytes = [0u8; NAME_WIDTH];
        bytes[..4].copy_from_slice(b"ABCD");
        let name = PatternName::from_bytes(&bytes);
        assert_eq!("ABCD", name.trimmed());
        assert_eq!(*b"ABCD      ", name.to_bytes());
    }
}
