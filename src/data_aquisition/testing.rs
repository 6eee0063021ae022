/* Scripted transports used by the session, switch and aggregation tests. */

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use crate::data_aquisition::core::{
    SessionError, SessionTransport, TelemetryError, TelemetryTransport, WalkEntry,
};

/// A `SessionTransport` replaying a fixed script of read chunks.
///
/// `read_until` accumulates chunks until the requested pattern matches, as a
/// real transport would; running out of script without a match reports a
/// timeout. Every write is recorded for assertions.
pub(crate) struct ScriptedTransport {
    reads: VecDeque<String>,
    writes: Vec<Vec<u8>>,
    closed: bool,
}

impl ScriptedTransport {
    pub(crate) fn new(reads: Vec<String>) -> Self {
        ScriptedTransport {
            reads: reads.into(),
            writes: Vec::new(),
            closed: false,
        }
    }

    pub(crate) fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl SessionTransport for ScriptedTransport {
    async fn connect(&mut self) -> Result<(), SessionError> {
        Ok(())
    }

    fn host(&self) -> &str {
        "scripted"
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        self.writes.push(bytes.to_vec());
        Ok(())
    }

    async fn read_until(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> Result<String, SessionError> {
        let mut accumulated = String::new();
        while let Some(chunk) = self.reads.pop_front() {
            accumulated.push_str(&chunk);
            if pattern.is_match(&accumulated) {
                return Ok(accumulated);
            }
        }
        Err(SessionError::Timeout(timeout))
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.closed = true;
        Ok(())
    }
}

/// A `TelemetryTransport` serving canned walks keyed by their root path.
pub(crate) struct ScriptedTelemetry {
    walks: HashMap<String, Vec<WalkEntry>>,
}

impl ScriptedTelemetry {
    pub(crate) fn new(walks: HashMap<String, Vec<WalkEntry>>) -> Self {
        ScriptedTelemetry { walks }
    }

    pub(crate) fn empty() -> Self {
        ScriptedTelemetry {
            walks: HashMap::new(),
        }
    }
}

#[async_trait]
impl TelemetryTransport for ScriptedTelemetry {
    async fn walk(&mut self, root: &str) -> Result<Vec<WalkEntry>, TelemetryError> {
        Ok(self.walks.get(root).cloned().unwrap_or_default())
    }
}

/// Convenience for building walk fixtures.
pub(crate) fn walk_entry(path: &str, value: &str) -> WalkEntry {
    WalkEntry {
        path: path.to_string(),
        value: value.to_string(),
    }
}
