/*!
 * Output Channels
 * Fixed-capacity byte buffers drained to the connection on flush
 */

use bytes::BytesMut;
use std::io::Write;
use tracing::trace;

/// One bounded output buffer.
///
/// The buffer never grows past its configured capacity: callers compare
/// `remaining()` against the size of the frame they are about to append and
/// drain the channel first when it would not fit. Frame sizes are known
/// up front, so the check never needs a trial encode.
#[derive(Debug)]
pub struct ByteChannel {
    buf: BytesMut,
    capacity: usize,
}

impl ByteChannel {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes that can still be appended before the channel must be drained.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }

    /// Buffer to append encoded frames into.
    #[inline]
    pub fn buf_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }

    /// Drain the buffered bytes into `out` and reset the channel to empty.
    ///
    /// An empty channel is a no-op. On error the buffered bytes are kept;
    /// the owning writer treats the failure as fatal either way.
    pub fn flush_to(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        out.write_all(&self.buf)?;
        trace!(bytes = self.buf.len(), "channel drained");
        self.buf.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BufMut;

    #[test]
    fn test_remaining_tracks_appends() {
        let mut channel = ByteChannel::new(16);
        assert_eq!(channel.remaining(), 16);

        channel.buf_mut().put_u32(1);
        assert_eq!(channel.len(), 4);
        assert_eq!(channel.remaining(), 12);
    }

    #[test]
    fn test_flush_drains_and_resets() {
        let mut channel = ByteChannel::new(16);
        channel.buf_mut().put_u32(0xdead_beef);

        let mut out = Vec::new();
        channel.flush_to(&mut out).unwrap();

        assert_eq!(out, 0xdead_beefu32.to_be_bytes());
        assert!(channel.is_empty());
        assert_eq!(channel.remaining(), 16);
    }

    #[test]
    fn test_flush_empty_writes_nothing() {
        let mut channel = ByteChannel::new(16);
        let mut out = Vec::new();
        channel.flush_to(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
