/*!
 * TCP Writer
 * Serializes monitoring records to a collector over one TCP connection
 *
 * Two bounded channels share the connection: registry entries and encoded
 * records. Every flush path drains the registry channel first, so a record
 * referencing an id can never reach the peer before the entry defining it.
 * The ordering is structural; no per-id dependency tracking exists.
 */

use crate::core::errors::WriterError;
use crate::core::types::StringId;
use crate::record::MonitoringRecord;
use crate::registry::{RegistryListener, StringRegistry};
use crate::wire::{encode_record, RegistryEntry};
use crate::writer::channel::ByteChannel;
use crate::writer::config::WriterConfig;
use parking_lot::Mutex;
use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Pause between connection attempts while the connect budget lasts.
const CONNECT_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle of the writer's connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Connected,
    Failed,
    Terminated,
}

/// Monitoring writer that serializes records over TCP to a collector.
///
/// All mutation (encoding, registry assignment, flushing) happens under
/// one lock per writer, so concurrent `submit` callers observe "assign id,
/// emit entry, encode reference" as a single step. A slow peer blocks the
/// flushing caller; that is the transport's backpressure, there is no
/// internal queue.
///
/// Any transport failure is fatal: the writer enters a failed state and
/// later calls fail fast. Retry and reconnect policy belongs to the caller.
pub struct TcpWriter {
    inner: Mutex<WriterInner>,
}

impl std::fmt::Debug for TcpWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpWriter").finish_non_exhaustive()
    }
}

struct WriterInner {
    stream: TcpStream,
    registry: StringRegistry,
    registry_channel: ByteChannel,
    record_channel: ByteChannel,
    flush_on_write: bool,
    state: WriterState,
    peer: SocketAddr,
}

/// Registry half of the connection: appends entry frames to the registry
/// channel, draining it alone when an entry would not fit.
struct RegistrySink<'a, W: Write> {
    channel: &'a mut ByteChannel,
    out: &'a mut W,
}

impl<W: Write> RegistryListener for RegistrySink<'_, W> {
    fn on_assigned(&mut self, value: &str, id: StringId) -> Result<(), WriterError> {
        let entry = RegistryEntry::new(id, value);
        let needed = entry.encoded_len();
        if needed > self.channel.capacity() {
            return Err(WriterError::CapacityExceeded {
                needed,
                capacity: self.channel.capacity(),
            });
        }
        if needed > self.channel.remaining() {
            flush_channel(self.channel, self.out, "registry")?;
        }
        entry.encode(self.channel.buf_mut());
        Ok(())
    }
}

fn flush_channel<W: Write>(
    channel: &mut ByteChannel,
    out: &mut W,
    label: &'static str,
) -> Result<(), WriterError> {
    channel.flush_to(out).map_err(|err| {
        warn!(channel = label, error = %err, "flush failed");
        WriterError::Transport(err)
    })
}

impl TcpWriter {
    /// Connect to the configured collector.
    ///
    /// Attempts are repeated at a fixed interval until the connect budget
    /// is spent; a zero budget means one immediate attempt. On failure no
    /// writer exists, so there is no half-connected state to misuse.
    pub fn connect(config: WriterConfig) -> Result<Self, WriterError> {
        let peer = resolve(&config)?;
        let stream = connect_with_budget(peer, config.connect_timeout())?;
        info!(
            peer = %peer,
            capacity = config.buffer_capacity,
            flush_on_write = config.flush_on_write,
            "writer connected"
        );
        Ok(Self {
            inner: Mutex::new(WriterInner {
                stream,
                registry: StringRegistry::new(),
                registry_channel: ByteChannel::new(config.buffer_capacity),
                record_channel: ByteChannel::new(config.buffer_capacity),
                flush_on_write: config.flush_on_write,
                state: WriterState::Connected,
                peer,
            }),
        })
    }

    /// Serialize `record` and hand it to the transport.
    ///
    /// Safe to call from many threads; calls serialize on the writer's
    /// lock. Fails fast once the writer has failed or terminated.
    pub fn submit(&self, record: &MonitoringRecord) -> Result<(), WriterError> {
        let mut inner = self.inner.lock();
        inner.check_usable()?;
        let result = inner.write_record(record);
        if result.is_err() {
            inner.state = WriterState::Failed;
        }
        result
    }

    /// Drain both channels to the connection, registry entries first.
    pub fn flush(&self) -> Result<(), WriterError> {
        let mut inner = self.inner.lock();
        inner.check_usable()?;
        let result = inner.flush_both();
        if result.is_err() {
            inner.state = WriterState::Failed;
        }
        result
    }

    /// Flush pending bytes, registry channel first, and close the
    /// connection.
    pub fn terminate(&self) -> Result<(), WriterError> {
        let mut inner = self.inner.lock();
        inner.check_usable()?;
        let result = inner.flush_both();
        inner.state = match result {
            Ok(()) => WriterState::Terminated,
            Err(_) => WriterState::Failed,
        };
        if let Err(err) = inner.stream.shutdown(Shutdown::Both) {
            debug!(error = %err, "shutdown after terminate");
        }
        info!(peer = %inner.peer, strings = inner.registry.len(), "writer terminated");
        result
    }

    /// Number of strings interned so far (diagnostics).
    pub fn interned_strings(&self) -> usize {
        self.inner.lock().registry.len()
    }

    /// Resolved peer address.
    pub fn peer(&self) -> SocketAddr {
        self.inner.lock().peer
    }
}

impl WriterInner {
    fn check_usable(&self) -> Result<(), WriterError> {
        match self.state {
            WriterState::Connected => Ok(()),
            WriterState::Failed => Err(WriterError::Failed),
            WriterState::Terminated => Err(WriterError::Terminated),
        }
    }

    fn write_record(&mut self, record: &MonitoringRecord) -> Result<(), WriterError> {
        let frame_size = record.frame_size();
        if frame_size > self.record_channel.capacity() {
            return Err(WriterError::CapacityExceeded {
                needed: frame_size,
                capacity: self.record_channel.capacity(),
            });
        }
        if frame_size > self.record_channel.remaining() {
            self.flush_both()?;
        }

        let flush_on_write = self.flush_on_write;
        let Self {
            registry,
            registry_channel,
            record_channel,
            stream,
            ..
        } = self;
        let mut sink = RegistrySink {
            channel: registry_channel,
            out: stream,
        };
        encode_record(record, registry, &mut sink, record_channel.buf_mut())?;

        if flush_on_write {
            self.flush_both()?;
        }
        Ok(())
    }

    /// Registry channel strictly before record channel, on every path;
    /// otherwise the peer could see a reference to an id whose definition
    /// is still buffered.
    fn flush_both(&mut self) -> Result<(), WriterError> {
        flush_channel(&mut self.registry_channel, &mut self.stream, "registry")?;
        flush_channel(&mut self.record_channel, &mut self.stream, "record")
    }
}

fn resolve(config: &WriterConfig) -> Result<SocketAddr, WriterError> {
    let endpoint = config.endpoint();
    endpoint
        .to_socket_addrs()
        .map_err(WriterError::Transport)?
        .next()
        .ok_or_else(|| {
            WriterError::Transport(std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                format!("no address resolved for {endpoint}"),
            ))
        })
}

fn connect_with_budget(peer: SocketAddr, budget: Duration) -> Result<TcpStream, WriterError> {
    let start = Instant::now();
    loop {
        let remaining = budget.saturating_sub(start.elapsed());
        let attempt = CONNECT_RETRY_INTERVAL
            .min(remaining)
            .max(Duration::from_millis(1));
        match TcpStream::connect_timeout(&peer, attempt) {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                if start.elapsed() >= budget {
                    warn!(
                        peer = %peer,
                        timeout_ms = budget.as_millis() as u64,
                        error = %err,
                        "connect budget exhausted"
                    );
                    return Err(WriterError::ConnectTimeout {
                        addr: peer,
                        timeout: budget,
                    });
                }
                debug!(peer = %peer, error = %err, "connect attempt failed, retrying");
                thread::sleep(CONNECT_RETRY_INTERVAL.min(budget.saturating_sub(start.elapsed())));
            }
        }
    }
}
