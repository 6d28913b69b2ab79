/*!
 * Monitoring Record
 * One structured observation, validated at construction and immutable after
 */

use super::schema::RecordSchema;
use super::value::FieldValue;
use crate::core::errors::RecordError;
use crate::core::types::wall_clock_nanos;
use std::sync::Arc;

/// A single observation emitted by instrumented code.
///
/// Field values are checked against the schema when the record is built, so
/// the encoder never has to handle a layout mismatch. The writer takes no
/// ownership: a record is dropped by its producer once encoded.
#[derive(Debug, Clone)]
pub struct MonitoringRecord {
    schema: Arc<RecordSchema>,
    logging_timestamp: i64,
    values: Vec<FieldValue>,
}

impl MonitoringRecord {
    pub fn new(
        schema: Arc<RecordSchema>,
        logging_timestamp: i64,
        values: Vec<FieldValue>,
    ) -> Result<Self, RecordError> {
        let fields = schema.fields();
        if values.len() != fields.len() {
            return Err(RecordError::FieldCount {
                type_name: schema.type_name().to_owned(),
                declared: fields.len(),
                actual: values.len(),
            });
        }
        for (index, (spec, value)) in fields.iter().zip(&values).enumerate() {
            if spec.kind != value.kind() {
                return Err(RecordError::FieldType {
                    type_name: schema.type_name().to_owned(),
                    field: spec.name.clone(),
                    index,
                    declared: spec.kind.name(),
                    actual: value.kind().name(),
                });
            }
        }
        Ok(Self {
            schema,
            logging_timestamp,
            values,
        })
    }

    /// Build a record stamped with the current wall-clock time.
    pub fn now(schema: Arc<RecordSchema>, values: Vec<FieldValue>) -> Result<Self, RecordError> {
        Self::new(schema, wall_clock_nanos(), values)
    }

    #[inline]
    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    #[inline]
    pub fn logging_timestamp(&self) -> i64 {
        self.logging_timestamp
    }

    #[inline]
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Total bytes this record consumes in the record channel.
    #[inline]
    pub fn frame_size(&self) -> usize {
        self.schema.frame_size()
    }
}
