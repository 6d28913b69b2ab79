/*!
 * Record Encoder
 * Serializes one record into the record channel, resolving every string
 * through the writer's registry
 */

use crate::core::errors::WriterError;
use crate::record::{FieldValue, MonitoringRecord};
use crate::registry::{RegistryListener, StringRegistry};
use bytes::{BufMut, BytesMut};

/// Encode `record` into `buf`.
///
/// Writes the type-name reference, the logging timestamp, then each field in
/// schema order: integers inline big-endian, strings as their 4-byte id.
/// Resolving the type name or a string field may assign fresh ids, which
/// reach `listener` before the referencing bytes land in `buf`.
///
/// Consumes exactly `record.frame_size()` bytes of `buf`.
pub fn encode_record(
    record: &MonitoringRecord,
    registry: &StringRegistry,
    listener: &mut dyn RegistryListener,
    buf: &mut BytesMut,
) -> Result<(), WriterError> {
    let type_id = registry.get_or_assign(record.type_name(), listener)?;
    buf.put_u32(type_id);
    buf.put_i64(record.logging_timestamp());

    for value in record.values() {
        match value {
            FieldValue::Int32(v) => buf.put_i32(*v),
            FieldValue::Int64(v) => buf.put_i64(*v),
            FieldValue::Str(v) => {
                let id = registry.get_or_assign(v, listener)?;
                buf.put_u32(id);
            }
        }
    }
    Ok(())
}
