/*!
 * Stream Reader
 * Analysis-side decoder that reconstructs records from one writer's stream
 *
 * The reader maintains its own id-to-string table, populated solely from
 * registry entry frames. A stream produced by a writer honoring the
 * registry-before-record flush ordering never references an id before
 * defining it; encountering one anyway is a protocol error, not a panic.
 */

use crate::core::errors::ProtocolError;
use crate::core::types::{StringId, REGISTRY_FRAME_MARKER};
use crate::record::{FieldKind, FieldValue, SchemaDirectory};
use ahash::RandomState;
use std::collections::HashMap;
use std::io::{ErrorKind, Read};

/// One record reconstructed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub type_name: String,
    pub logging_timestamp: i64,
    pub values: Vec<FieldValue>,
}

/// Decoder for the byte stream of a single writer.
pub struct RecordReader<R> {
    input: R,
    schemas: SchemaDirectory,
    strings: HashMap<StringId, String, RandomState>,
}

impl<R: Read> RecordReader<R> {
    pub fn new(input: R, schemas: SchemaDirectory) -> Self {
        Self {
            input,
            schemas,
            strings: HashMap::default(),
        }
    }

    /// Decode frames until the next record is complete, or the stream ends
    /// cleanly at a frame boundary.
    pub fn next_record(&mut self) -> Result<Option<DecodedRecord>, ProtocolError> {
        loop {
            let Some(head) = self.read_u32_or_eof()? else {
                return Ok(None);
            };
            if head == REGISTRY_FRAME_MARKER {
                self.read_registry_entry()?;
                continue;
            }
            return self.read_record_body(head).map(Some);
        }
    }

    /// Drain the remaining stream.
    pub fn read_to_end(&mut self) -> Result<Vec<DecodedRecord>, ProtocolError> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Number of string definitions seen so far.
    pub fn interned(&self) -> usize {
        self.strings.len()
    }

    /// Resolve an id defined by an earlier registry frame.
    pub fn lookup(&self, id: StringId) -> Option<&str> {
        self.strings.get(&id).map(String::as_str)
    }

    fn resolve(&self, id: StringId) -> Result<&str, ProtocolError> {
        self.strings
            .get(&id)
            .map(String::as_str)
            .ok_or(ProtocolError::UnknownStringId(id))
    }

    fn read_registry_entry(&mut self) -> Result<(), ProtocolError> {
        let id = self.read_u32("registry entry header")?;
        let len = self.read_u32("registry entry header")? as usize;
        let mut bytes = vec![0u8; len];
        self.read_exact("registry entry payload", &mut bytes)?;
        let value =
            String::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8 { id })?;
        if self.strings.contains_key(&id) {
            return Err(ProtocolError::DuplicateStringId(id));
        }
        self.strings.insert(id, value);
        Ok(())
    }

    fn read_record_body(&mut self, type_id: StringId) -> Result<DecodedRecord, ProtocolError> {
        let type_name = self.resolve(type_id)?.to_owned();
        let schema = self
            .schemas
            .lookup(&type_name)
            .cloned()
            .ok_or_else(|| ProtocolError::UnknownRecordType(type_name.clone()))?;

        let logging_timestamp = self.read_i64("record timestamp")?;
        let mut values = Vec::with_capacity(schema.fields().len());
        for spec in schema.fields() {
            values.push(match spec.kind {
                FieldKind::Int32 => FieldValue::Int32(self.read_i32("record field")?),
                FieldKind::Int64 => FieldValue::Int64(self.read_i64("record field")?),
                FieldKind::Str => {
                    let id = self.read_u32("record field")?;
                    FieldValue::Str(self.resolve(id)?.to_owned())
                }
            });
        }
        Ok(DecodedRecord {
            type_name,
            logging_timestamp,
            values,
        })
    }

    /// Read a frame-opening int32, treating EOF before the first byte as a
    /// clean end of stream.
    fn read_u32_or_eof(&mut self) -> Result<Option<u32>, ProtocolError> {
        let mut bytes = [0u8; 4];
        let mut filled = 0;
        while filled < bytes.len() {
            let count = self.input.read(&mut bytes[filled..])?;
            if count == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(ProtocolError::Truncated {
                    context: "frame header",
                });
            }
            filled += count;
        }
        Ok(Some(u32::from_be_bytes(bytes)))
    }

    fn read_exact(&mut self, context: &'static str, buf: &mut [u8]) -> Result<(), ProtocolError> {
        self.input.read_exact(buf).map_err(|err| match err.kind() {
            ErrorKind::UnexpectedEof => ProtocolError::Truncated { context },
            _ => ProtocolError::Io(err),
        })
    }

    fn read_u32(&mut self, context: &'static str) -> Result<u32, ProtocolError> {
        let mut bytes = [0u8; 4];
        self.read_exact(context, &mut bytes)?;
        Ok(u32::from_be_bytes(bytes))
    }

    fn read_i32(&mut self, context: &'static str) -> Result<i32, ProtocolError> {
        let mut bytes = [0u8; 4];
        self.read_exact(context, &mut bytes)?;
        Ok(i32::from_be_bytes(bytes))
    }

    fn read_i64(&mut self, context: &'static str) -> Result<i64, ProtocolError> {
        let mut bytes = [0u8; 8];
        self.read_exact(context, &mut bytes)?;
        Ok(i64::from_be_bytes(bytes))
    }
}
