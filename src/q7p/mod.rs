//! Q7P fixed-layout binary codec (spec §4.6–§4.7).

pub(crate) mod codec;
pub mod regions;
pub(crate) mod template;

pub use codec::encode_q7p;

/// Decodes a Q7P buffer into a [`crate::model::Pattern`] (spec §4.7).
pub fn decode_q7p(bytes: &[u8]) -> crate::error::Result<crate::model::Pattern> {
    codec::decode_q7p(bytes).map_err(Into::into)
}
