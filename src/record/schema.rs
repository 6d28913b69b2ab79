/*!
 * Record Schemas
 * Fixed field layouts with an encoded size known before any encode
 */

use crate::core::types::{INT32_WIDTH, INT64_WIDTH, RECORD_HEADER_WIDTH, STRING_REF_WIDTH};
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Semantic type of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Int32,
    Int64,
    Str,
}

impl FieldKind {
    /// Encoded width in bytes. String fields contribute the fixed reference
    /// width; the payload travels in a registry entry frame instead.
    #[inline]
    pub const fn wire_width(self) -> usize {
        match self {
            FieldKind::Int32 => INT32_WIDTH,
            FieldKind::Int64 => INT64_WIDTH,
            FieldKind::Str => STRING_REF_WIDTH,
        }
    }

    /// Stable lowercase name, used in error messages.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            FieldKind::Int32 => "int32",
            FieldKind::Int64 => "int64",
            FieldKind::Str => "string",
        }
    }
}

/// One field descriptor: semantic type plus a human-readable name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Immutable layout of one record type.
///
/// The encoded size is derived once at construction, so buffer-capacity
/// checks never need a trial encode.
#[derive(Debug)]
pub struct RecordSchema {
    type_name: String,
    fields: Vec<FieldSpec>,
    encoded_size: usize,
}

impl RecordSchema {
    pub fn new(type_name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        let encoded_size = fields.iter().map(|field| field.kind.wire_width()).sum();
        Self {
            type_name: type_name.into(),
            fields,
            encoded_size,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[inline]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Sum of per-field wire widths, excluding the record header.
    #[inline]
    pub fn encoded_size(&self) -> usize {
        self.encoded_size
    }

    /// Total bytes one instance consumes in the record channel, header
    /// included.
    #[inline]
    pub fn frame_size(&self) -> usize {
        RECORD_HEADER_WIDTH + self.encoded_size
    }
}

/// Lookup table from type name to schema, used by the analysis-side reader.
#[derive(Debug, Default)]
pub struct SchemaDirectory {
    by_name: HashMap<String, Arc<RecordSchema>, RandomState>,
}

impl SchemaDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its type name, replacing any previous entry.
    pub fn register(&mut self, schema: Arc<RecordSchema>) {
        self.by_name.insert(schema.type_name().to_owned(), schema);
    }

    pub fn lookup(&self, type_name: &str) -> Option<&Arc<RecordSchema>> {
        self.by_name.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_size_sums_field_widths() {
        let schema = RecordSchema::new(
            "test.Mixed",
            vec![
                FieldSpec::new("a", FieldKind::Int64),
                FieldSpec::new("b", FieldKind::Int32),
                FieldSpec::new("c", FieldKind::Str),
                FieldSpec::new("d", FieldKind::Str),
            ],
        );
        assert_eq!(schema.encoded_size(), 8 + 4 + 4 + 4);
        assert_eq!(schema.frame_size(), 4 + 8 + 20);
    }

    #[test]
    fn test_empty_schema_is_header_only() {
        let schema = RecordSchema::new("test.Empty", vec![]);
        assert_eq!(schema.encoded_size(), 0);
        assert_eq!(schema.frame_size(), 12);
    }

    #[test]
    fn test_directory_lookup() {
        let mut directory = SchemaDirectory::new();
        assert!(directory.is_empty());

        let schema = Arc::new(RecordSchema::new(
            "test.One",
            vec![FieldSpec::new("v", FieldKind::Int32)],
        ));
        directory.register(schema);

        assert_eq!(directory.len(), 1);
        assert!(directory.lookup("test.One").is_some());
        assert!(directory.lookup("test.Other").is_none());
    }

    #[test]
    fn test_field_kind_serde_names() {
        let json = serde_json::to_string(&FieldKind::Int64).unwrap();
        assert_eq!(json, "\"int64\"");
        let kind: FieldKind = serde_json::from_str("\"str\"").unwrap();
        assert_eq!(kind, FieldKind::Str);
    }
}
