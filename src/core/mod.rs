/*!
 * Core Types and Errors
 * Wire-level constants and the crate-wide error taxonomy
 */

pub mod errors;
pub mod types;

pub use errors::{ProtocolError, RecordError, WriterError};
pub use types::{
    StringId, INT32_WIDTH, INT64_WIDTH, RECORD_HEADER_WIDTH, REGISTRY_FRAME_MARKER,
    STRING_REF_WIDTH,
};
