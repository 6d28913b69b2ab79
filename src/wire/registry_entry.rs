/*!
 * Registry Entry Frames
 * Wire representation of one (id, string) assignment
 *
 * Layout: `int32 marker | int32 id | int32 byte_length | utf8 bytes`, all
 * big-endian. Each entry is created once per distinct string, serialized
 * immediately, and never retransmitted.
 */

use crate::core::errors::ProtocolError;
use crate::core::types::{StringId, INT32_WIDTH, REGISTRY_FRAME_MARKER};
use bytes::{Buf, BufMut, BytesMut};

/// One (id, value) assignment as a discrete wire unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub id: StringId,
    pub value: String,
}

impl RegistryEntry {
    pub fn new(id: StringId, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }

    /// Bytes this entry occupies in the registry channel.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        // marker + id + length field + payload
        3 * INT32_WIDTH + self.value.len()
    }

    /// Append the frame to `buf`.
    ///
    /// The length field carries the UTF-8 byte length, never the character
    /// count; a multi-byte value would otherwise desynchronize the reader.
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(REGISTRY_FRAME_MARKER);
        buf.put_u32(self.id);
        buf.put_u32(self.value.len() as u32);
        buf.put_slice(self.value.as_bytes());
    }

    /// Decode the body of a frame whose marker has already been consumed.
    pub fn decode_body(buf: &mut impl Buf) -> Result<Self, ProtocolError> {
        if buf.remaining() < 2 * INT32_WIDTH {
            return Err(ProtocolError::Truncated {
                context: "registry entry header",
            });
        }
        let id = buf.get_u32();
        let len = buf.get_u32() as usize;
        if buf.remaining() < len {
            return Err(ProtocolError::Truncated {
                context: "registry entry payload",
            });
        }
        let mut bytes = vec![0u8; len];
        buf.copy_to_slice(&mut bytes);
        let value = String::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8 { id })?;
        Ok(Self { id, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let entry = RegistryEntry::new(7, "ab");
        let mut buf = BytesMut::new();
        entry.encode(&mut buf);

        assert_eq!(buf.len(), entry.encoded_len());
        assert_eq!(&buf[..4], &[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(&buf[4..8], &[0, 0, 0, 7]);
        assert_eq!(&buf[8..12], &[0, 0, 0, 2]);
        assert_eq!(&buf[12..], b"ab");
    }

    #[test]
    fn test_length_field_counts_bytes_not_chars() {
        // Three characters, seven UTF-8 bytes.
        let entry = RegistryEntry::new(0, "aé漢");
        assert_eq!(entry.value.chars().count(), 3);

        let mut buf = BytesMut::new();
        entry.encode(&mut buf);
        assert_eq!(&buf[8..12], &(7u32.to_be_bytes()));
        assert_eq!(buf.len(), 12 + 7);
    }

    #[test]
    fn test_round_trip() {
        let entry = RegistryEntry::new(3, "some.signature(int)");
        let mut buf = BytesMut::new();
        entry.encode(&mut buf);

        let mut body = &buf[4..];
        let decoded = RegistryEntry::decode_body(&mut body).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_truncated_payload() {
        let entry = RegistryEntry::new(3, "signature");
        let mut buf = BytesMut::new();
        entry.encode(&mut buf);

        let mut body = &buf[4..buf.len() - 1];
        let err = RegistryEntry::decode_body(&mut body).unwrap_err();
        assert!(matches!(err, ProtocolError::Truncated { .. }));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut buf = BytesMut::new();
        buf.put_u32(5);
        buf.put_u32(2);
        buf.put_slice(&[0xff, 0xfe]);

        let mut body = &buf[..];
        let err = RegistryEntry::decode_body(&mut body).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidUtf8 { id: 5 }));
    }
}
