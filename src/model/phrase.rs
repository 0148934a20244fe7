//! Opaque phrase/event byte runs.
//!
//! The per-track event bitstream (and the Q7P Phrase/Sequence regions) have no validated
//! byte-level semantics -- this crate's only obligation is to carry them through unchanged. We
//! wrap them in a distinct newtype rather than a bare `Vec<u8>` so that call sites cannot
//! accidentally index or mutate individual bytes under the illusion that they understand the
//! format; the only permitted operations are "here are the bytes" and "give me the bytes back".

/// An uninterpreted run of bytes owned by a [`crate::model::Track`] or
/// [`crate::model::Section`]. Never parsed, never mutated byte-by-byte.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhraseBytes(Vec<u8>);

impl PhraseBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for PhraseBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for PhraseBytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}
