use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

/// Errors raised by a command session or its transport.
///
/// `ConnectionFailure` covers everything up to a synchronized prompt,
/// authentication included; a `Timeout` can only come from an established
/// session. `Timeout` is always distinct from empty output: a read that
/// exceeds its budget never silently returns an empty chunk.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection to {host} failed: {reason}")]
    ConnectionFailure { host: String, reason: String },
    #[error("read timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("session is not connected")]
    NotConnected,
    #[error("invalid session config: {0}")]
    InvalidConfig(String),
    #[error("async task error: {0}")]
    Async(String),
}

/// Errors raised by the telemetry walk or its transport.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry request timed out after {0:?}")]
    Timeout(Duration),
    #[error("telemetry transport error: {0}")]
    Transport(String),
    #[error("invalid telemetry path: {0}")]
    InvalidPath(String),
    #[error("invalid telemetry config: {0}")]
    InvalidConfig(String),
}

/// Injected capability carrying the raw byte channel of a remote CLI
/// session. One transport owns one connection; implementations must impose
/// the given timeout on every read and surface it as `SessionError::Timeout`.
#[async_trait]
pub trait SessionTransport: Send {
    /// Establishes the underlying channel and authenticates. Idempotent.
    async fn connect(&mut self) -> Result<(), SessionError>;

    /// Address label of the remote peer, used in error reports.
    fn host(&self) -> &str;

    async fn write(&mut self, bytes: &[u8]) -> Result<(), SessionError>;

    /// Reads until `pattern` matches the accumulated output, returning
    /// everything read so far. The pattern is expected at the tail of the
    /// chunk (a prompt or a paging marker).
    async fn read_until(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> Result<String, SessionError>;

    /// Tears the connection down. Used both for orderly shutdown and for
    /// cancellation mid-command; there is no resynchronization path.
    async fn close(&mut self) -> Result<(), SessionError>;
}

/// One (path, value) pair of a telemetry walk, both rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: String,
    pub value: String,
}

/// Injected capability for the read-only key/value telemetry tree.
/// Independent of the CLI session channel.
#[async_trait]
pub trait TelemetryTransport: Send {
    /// Walks the subtree rooted at `root` and returns its entries in tree
    /// order.
    async fn walk(&mut self, root: &str) -> Result<Vec<WalkEntry>, TelemetryError>;
}
