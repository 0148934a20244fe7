//! QY70 SysEx bulk-dump codec (spec §4.4–§4.5).

pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod header;
pub(crate) mod track_header;

/// Decodes a raw QY70 SysEx buffer into a [`crate::model::Pattern`] (spec §4.5).
pub fn decode_qy70(bytes: &[u8]) -> crate::error::Result<crate::model::Pattern> {
    decode::decode_qy70(bytes).map_err(Into::into)
}

/// Encodes a [`crate::model::Pattern`] back into a QY70 SysEx bulk-dump buffer (spec §4.8).
pub fn encode_qy70(pattern: &crate::model::Pattern) -> crate::error::Result<Vec<u8>> {
    encode::encode_qy70(pattern).map_err(Into::into)
}
