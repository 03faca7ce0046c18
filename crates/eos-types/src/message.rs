//! The transactional message type and its JSON codec.

use crate::error::{Result, WireError};
use serde::{Deserialize, Serialize};

/// A message carried through the exactly-once pipeline.
///
/// Immutable once constructed: the producer builds one, serializes it and
/// publishes it inside a transaction; the consumer deserializes it, processes
/// it and discards it. `id` is unique per logical message and doubles as the
/// Kafka record key so all copies of a logical message land on one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionalMessage {
    /// Unique identifier of the logical message
    pub id: String,
    /// Message body
    pub content: String,
}

impl TransactionalMessage {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// Serialize a message to its JSON wire representation.
pub fn encode(message: &TransactionalMessage) -> Result<Vec<u8>> {
    serde_json::to_vec(message).map_err(WireError::Encode)
}

/// Deserialize a message from its JSON wire representation.
///
/// Fails on non-JSON bytes and on JSON that is missing either field. The
/// consumer treats any failure here as malformed input to skip, never as a
/// reason to stop consuming.
pub fn decode(payload: &[u8]) -> Result<TransactionalMessage> {
    serde_json::from_slice(payload).map_err(WireError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let message =
            TransactionalMessage::new("msg_001", "Hello Kafka with Exactly Once Semantics");
        let bytes = encode(&message).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_wire_field_names() {
        let message = TransactionalMessage::new("msg_001", "payload");
        let bytes = encode(&message).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["id"], "msg_001");
        assert_eq!(value["content"], "payload");
    }

    #[test]
    fn test_decode_non_json_bytes_fails() {
        let err = decode(b"\x00\x01not json at all").unwrap_err();
        assert!(matches!(err, WireError::Decode(_)));
    }

    #[test]
    fn test_decode_missing_field_fails() {
        let err = decode(br#"{"id": "msg_001"}"#).unwrap_err();
        assert!(matches!(err, WireError::Decode(_)));
    }

    #[test]
    fn test_decode_empty_payload_fails() {
        assert!(decode(b"").is_err());
    }

    #[test]
    fn test_decode_tolerates_unicode_content() {
        let message = TransactionalMessage::new("msg_002", "héllo \u{1F680}");
        let bytes = encode(&message).unwrap();
        assert_eq!(decode(&bytes).unwrap(), message);
    }
}
