/*!
 * Core Types
 * Shared identifiers and wire-level constants
 */

use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier assigned to an interned string by a writer-local registry.
///
/// Ids are dense, start at zero, and are never reused within one writer's
/// lifetime.
pub type StringId = u32;

/// Discriminator that opens a registry entry frame on the wire.
///
/// Encoded as int32 `-1`. Record frames open with a non-negative string id,
/// so the two frame kinds never collide.
pub const REGISTRY_FRAME_MARKER: StringId = StringId::MAX;

/// Byte width of an int32 field on the wire.
pub const INT32_WIDTH: usize = 4;

/// Byte width of an int64 field on the wire.
pub const INT64_WIDTH: usize = 8;

/// Byte width of a string reference on the wire. String payloads travel in
/// registry entry frames; record frames carry only the id.
pub const STRING_REF_WIDTH: usize = 4;

/// Fixed framing overhead of every record: type-name reference plus
/// logging timestamp.
pub const RECORD_HEADER_WIDTH: usize = STRING_REF_WIDTH + INT64_WIDTH;

/// Wall-clock time in nanoseconds since the Unix epoch.
///
/// Clamps to zero on a pre-epoch clock rather than failing; record
/// timestamps are observational data, not control flow.
#[inline]
pub fn wall_clock_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as i64)
        .unwrap_or(0)
}
