/*!
 * Stream Writer
 * Buffered TCP transport for encoded records and registry entries
 */

mod channel;
mod config;
mod tcp;

pub use channel::ByteChannel;
pub use config::WriterConfig;
pub use tcp::TcpWriter;
