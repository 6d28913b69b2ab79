/*!
 * Tracewire
 * Monitoring-record wire protocol core: compact binary record encoding
 * with on-the-fly string deduplication, delivered over a buffered TCP
 * connection that never lets an id reach the peer before its definition
 */

pub mod core;
pub mod logging;
pub mod record;
pub mod registry;
pub mod wire;
pub mod writer;

// Re-exports
pub use crate::core::{ProtocolError, RecordError, WriterError};
pub use logging::init_logging;
pub use record::{
    FieldKind, FieldSpec, FieldValue, MonitoringRecord, RecordSchema, SchemaDirectory,
};
pub use registry::{RegistryListener, StringRegistry};
pub use wire::{encode_record, DecodedRecord, RecordReader, RegistryEntry};
pub use writer::{TcpWriter, WriterConfig};
