/*!
 * Writer Configuration
 */

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default capacity of each output channel, in bytes.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Default connect budget in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 500;

/// Default collector port.
pub const DEFAULT_PORT: u16 = 10133;

/// Configuration for one TCP stream writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Collector hostname.
    pub host: String,
    /// Collector port.
    pub port: u16,
    /// Capacity in bytes of each output channel (record and registry).
    pub buffer_capacity: usize,
    /// Budget for the initial connection. Zero means a single immediate
    /// attempt with no retry window.
    pub connect_timeout_ms: u64,
    /// Flush both channels after every record instead of waiting for a
    /// channel to fill.
    pub flush_on_write: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: DEFAULT_PORT,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            flush_on_write: false,
        }
    }
}

impl WriterConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Load from a JSON document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_flush_on_write(mut self, flush_on_write: bool) -> Self {
        self.flush_on_write = flush_on_write;
        self
    }

    /// The connect budget as a duration.
    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// `host:port` endpoint string for address resolution.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WriterConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert!(!config.flush_on_write);
    }

    #[test]
    fn test_builder() {
        let config = WriterConfig::new("collector.local", 4444)
            .with_buffer_capacity(1024)
            .with_connect_timeout(Duration::from_secs(2))
            .with_flush_on_write(true);

        assert_eq!(config.endpoint(), "collector.local:4444");
        assert_eq!(config.buffer_capacity, 1024);
        assert_eq!(config.connect_timeout(), Duration::from_secs(2));
        assert!(config.flush_on_write);
    }

    #[test]
    fn test_from_json_partial() {
        let config = WriterConfig::from_json(r#"{"host": "10.0.0.5", "flush_on_write": true}"#)
            .unwrap();
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.flush_on_write);
    }
}
