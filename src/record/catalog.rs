/*!
 * Well-Known Schemas
 * Layouts shipped with the crate for the common instrumentation probes
 *
 * The record-type set is open; these are only the layouts every probe
 * library agrees on out of the box.
 */

use super::schema::{FieldKind, FieldSpec, RecordSchema};
use std::sync::Arc;

/// Event emitted when control flow enters an instrumented operation.
pub fn before_operation() -> Arc<RecordSchema> {
    Arc::new(RecordSchema::new(
        "flow.BeforeOperationEvent",
        vec![
            FieldSpec::new("timestamp", FieldKind::Int64),
            FieldSpec::new("trace_id", FieldKind::Int64),
            FieldSpec::new("order_index", FieldKind::Int32),
            FieldSpec::new("class_signature", FieldKind::Str),
            FieldSpec::new("operation_signature", FieldKind::Str),
        ],
    ))
}

/// Event emitted when control flow leaves an instrumented operation.
pub fn after_operation() -> Arc<RecordSchema> {
    Arc::new(RecordSchema::new(
        "flow.AfterOperationEvent",
        vec![
            FieldSpec::new("timestamp", FieldKind::Int64),
            FieldSpec::new("trace_id", FieldKind::Int64),
            FieldSpec::new("order_index", FieldKind::Int32),
            FieldSpec::new("class_signature", FieldKind::Str),
            FieldSpec::new("operation_signature", FieldKind::Str),
        ],
    ))
}

/// One completed operation execution, entry and exit timestamps included.
pub fn operation_execution() -> Arc<RecordSchema> {
    Arc::new(RecordSchema::new(
        "control.OperationExecution",
        vec![
            FieldSpec::new("operation_signature", FieldKind::Str),
            FieldSpec::new("session_id", FieldKind::Str),
            FieldSpec::new("trace_id", FieldKind::Int64),
            FieldSpec::new("tin", FieldKind::Int64),
            FieldSpec::new("tout", FieldKind::Int64),
            FieldSpec::new("hostname", FieldKind::Str),
            FieldSpec::new("eoi", FieldKind::Int32),
            FieldSpec::new("ess", FieldKind::Int32),
        ],
    ))
}
