/*!
 * Monitoring Records
 * Schema-described observations emitted by instrumented code
 */

pub mod catalog;
mod record;
mod schema;
mod value;

pub use record::MonitoringRecord;
pub use schema::{FieldKind, FieldSpec, RecordSchema, SchemaDirectory};
pub use value::FieldValue;
