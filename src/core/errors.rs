/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use crate::core::types::StringId;
use miette::Diagnostic;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Writer-side transport and encoding errors.
///
/// All variants are fatal to the writer that produced them; retry and
/// reconnect policy belongs to the surrounding collaborator.
#[derive(Error, Debug, Diagnostic)]
pub enum WriterError {
    #[error("connection to {addr} not established within {timeout:?}")]
    #[diagnostic(
        code(wire::connect_timeout),
        help("Verify the collector is reachable and raise the connect timeout if the link is slow.")
    )]
    ConnectTimeout { addr: SocketAddr, timeout: Duration },

    #[error("transport failure: {0}")]
    #[diagnostic(
        code(wire::transport),
        help("The connection is unusable. Open a fresh writer if delivery should continue.")
    )]
    Transport(#[from] std::io::Error),

    #[error("frame of {needed} bytes exceeds channel capacity of {capacity} bytes")]
    #[diagnostic(
        code(wire::capacity_exceeded),
        help("Raise the configured buffer capacity; a single encoded frame must fit an empty channel.")
    )]
    CapacityExceeded { needed: usize, capacity: usize },

    #[error("writer entered failed state after a transport error")]
    #[diagnostic(
        code(wire::writer_failed),
        help("Earlier submissions may be lost. Open a fresh writer to resume delivery.")
    )]
    Failed,

    #[error("writer is terminated")]
    #[diagnostic(
        code(wire::writer_terminated),
        help("terminate() closed the connection; no further records can be submitted.")
    )]
    Terminated,
}

/// Record construction errors: field values that do not match the schema.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum RecordError {
    #[error("record type {type_name} declares {declared} fields, got {actual}")]
    #[diagnostic(
        code(record::field_count),
        help("Pass one value per schema field, in declared order.")
    )]
    FieldCount {
        type_name: String,
        declared: usize,
        actual: usize,
    },

    #[error("field {index} ({field}) of record type {type_name} is {actual}, schema declares {declared}")]
    #[diagnostic(
        code(record::field_type),
        help("The value kinds must match the schema's field kinds positionally.")
    )]
    FieldType {
        type_name: String,
        field: String,
        index: usize,
        declared: &'static str,
        actual: &'static str,
    },
}

/// Reader-side protocol violations.
///
/// A stream produced by a writer honoring the flush ordering never triggers
/// `UnknownStringId` or `DuplicateStringId`; they indicate a broken or
/// reordered stream.
#[derive(Error, Debug, Diagnostic)]
pub enum ProtocolError {
    #[error("reading stream: {0}")]
    #[diagnostic(code(protocol::io))]
    Io(#[from] std::io::Error),

    #[error("stream ended inside a frame ({context})")]
    #[diagnostic(
        code(protocol::truncated),
        help("The writer crashed or the stream was cut mid-flush; bytes up to the previous frame are intact.")
    )]
    Truncated { context: &'static str },

    #[error("record frame references string id {0} before its definition")]
    #[diagnostic(
        code(protocol::unknown_string_id),
        help("The producing writer violated the registry-before-record flush ordering.")
    )]
    UnknownStringId(StringId),

    #[error("string id {0} defined twice")]
    #[diagnostic(code(protocol::duplicate_string_id))]
    DuplicateStringId(StringId),

    #[error("registry entry for id {id} is not valid UTF-8")]
    #[diagnostic(code(protocol::invalid_utf8))]
    InvalidUtf8 { id: StringId },

    #[error("no schema registered for record type {0}")]
    #[diagnostic(
        code(protocol::unknown_record_type),
        help("Register the type's schema in the reader's SchemaDirectory before decoding.")
    )]
    UnknownRecordType(String),
}
