//! Groups bulk-dump messages by their low-address byte and concatenates decoded payloads in
//! arrival order (spec §4.4).

use std::collections::BTreeMap;

use crate::sevenbit::decode_7bit;
use crate::sysex::message::SysexMessage;

/// The reassembled decoded stream for one `AL` slot, plus the first raw (pre-decode) payload
/// seen at that address — the QY70 tempo lives in that raw payload, not the decoded one (spec
/// §4.5).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct AssembledBlock {
    pub(crate) decoded: Vec<u8>,
    pub(crate) first_raw_payload: Vec<u8>,
}

/// Reassembles a sequence of already-framed messages into one decoded stream per `AL`.
/// Non-bulk-dump messages are ignored; callers are expected to have already extracted
/// Init/Close framing via [`crate::sysex::session`].
pub(crate) fn assemble(messages: &[SysexMessage]) -> BTreeMap<u8, AssembledBlock> {
    let mut blocks: BTreeMap<u8, AssembledBlock> = BTreeMap::new();
    for message in messages {
        if let SysexMessage::BulkDump {
            address,
            payload_encoded,
            ..
        } = message
        {
            let block = blocks.entry(address.low).or_default();
            if block.decoded.is_empty() && block.first_raw_payload.is_empty() {
                block.first_raw_payload = payload_encoded.clone();
            }
            block.decoded.extend(decode_7bit(payload_encoded));
        }
    }
    blocks
}
