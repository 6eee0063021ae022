use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, trace};

use crate::data_aquisition::core::{SessionError, SessionTransport};

/// Decision of a per-line filter during a paged scan.
///
/// `Sequential` values are appended to an ordered transcript; `Keyed` values
/// are inserted by key with last-write-wins. One scan can mix both, which
/// lets a single read loop produce either an ordered transcript (neighbor
/// protocols) or a deduplicated-by-port table (interface config, MAC table).
#[derive(Debug, Clone, PartialEq)]
pub enum ScanItem<K, V> {
    Keyed(K, V),
    Sequential(V),
}

/// Accumulated results of one paged command.
#[derive(Debug, Clone)]
pub struct Scan<K, V> {
    pub seq: Vec<V>,
    pub keyed: HashMap<K, V>,
}

impl<K: Eq + Hash, V> Scan<K, V> {
    fn new() -> Self {
        Scan {
            seq: Vec::new(),
            keyed: HashMap::new(),
        }
    }

    fn push(&mut self, item: ScanItem<K, V>) {
        match item {
            ScanItem::Keyed(key, value) => {
                self.keyed.insert(key, value);
            }
            ScanItem::Sequential(value) => self.seq.push(value),
        }
    }
}

/// Per-device session configuration: prompt detection, pagination markers
/// and keystrokes, read budget. There is no process-wide default; every
/// device instance carries its own copy.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    prompt_pattern: Regex,
    banner_pattern: Regex,
    read_pattern: Regex,
    enter_key: String,
    page_key: String,
    read_timeout: Duration,
}

impl SessionConfig {
    /// Builds a config from the prompt and "more output" patterns. The
    /// banner pattern is what terminates the login banner before the first
    /// prompt synchronization.
    pub fn new(
        prompt_pattern: &str,
        more_pattern: &str,
        banner_pattern: &str,
        read_timeout: Duration,
    ) -> Result<Self, SessionError> {
        if prompt_pattern.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "prompt pattern can not be empty".to_string(),
            ));
        }
        if more_pattern.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "more pattern can not be empty".to_string(),
            ));
        }
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| SessionError::InvalidConfig(format!("bad pattern {pattern:?}: {e}")))
        };
        Ok(SessionConfig {
            prompt_pattern: compile(prompt_pattern)?,
            banner_pattern: compile(banner_pattern)?,
            read_pattern: compile(&format!("{more_pattern}|{prompt_pattern}"))?,
            // DC4 is what the HP CLI treats as "next page without echo".
            enter_key: "\n".to_string(),
            page_key: "\u{14}".to_string(),
            read_timeout,
        })
    }

    pub fn prompt_pattern(&self) -> &Regex {
        &self.prompt_pattern
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Disconnected,
    Connected,
}

/// A command session on one device.
///
/// Owns the transport and drives the pagination state machine: exactly one
/// command is in flight at any time, and a command's output is reassembled
/// across an unbounded number of pages before the next command is issued.
pub struct RemoteSession<T: SessionTransport> {
    transport: T,
    config: SessionConfig,
    state: SessionState,
}

impl<T: SessionTransport> RemoteSession<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        RemoteSession {
            transport,
            config,
            state: SessionState::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    #[cfg(test)]
    pub(crate) fn transport_ref(&self) -> &T {
        &self.transport
    }

    /// Connects and synchronizes on the prompt: authenticate, consume the
    /// login banner, send one neutral enter and wait for the prompt.
    /// A session which is already connected is a no-op.
    ///
    /// Any failure before the prompt is seen, banner drain included, is a
    /// [`SessionError::ConnectionFailure`]: the session was never usable,
    /// which is distinct from a timeout on an established one.
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        if self.is_connected() {
            return Ok(());
        }
        self.transport.connect().await?;
        if let Err(e) = self.synchronize_prompt().await {
            return Err(SessionError::ConnectionFailure {
                host: self.transport.host().to_string(),
                reason: format!("prompt synchronization failed: {e}"),
            });
        }
        self.state = SessionState::Connected;
        debug!("session connected and prompt synchronized");
        Ok(())
    }

    async fn synchronize_prompt(&mut self) -> Result<(), SessionError> {
        let timeout = self.config.read_timeout;
        self.transport
            .read_until(&self.config.banner_pattern, timeout)
            .await?;
        self.transport
            .write(self.config.enter_key.as_bytes())
            .await?;
        self.transport
            .read_until(&self.config.prompt_pattern, timeout)
            .await?;
        Ok(())
    }

    /// Runs `command` and reassembles its output across pages.
    ///
    /// The command is written exactly once. Each read ends at either the
    /// "more output" marker or the prompt; every line of the chunk is passed
    /// through `filter`, which decides inclusion and keying (see
    /// [`ScanItem`]). A page ending in the "more" marker is answered with a
    /// single page keystroke; the prompt ends the loop.
    pub async fn run_paged_command<K, V, F>(
        &mut self,
        command: &str,
        mut filter: F,
    ) -> Result<Scan<K, V>, SessionError>
    where
        K: Eq + Hash,
        F: FnMut(&str) -> Option<ScanItem<K, V>>,
    {
        if !self.is_connected() {
            return Err(SessionError::NotConnected);
        }
        debug!(command, "running paged command");

        let mut scan = Scan::new();
        self.transport
            .write(format!("{command}{}", self.config.enter_key).as_bytes())
            .await?;

        let mut pages = 0usize;
        loop {
            let chunk = self
                .transport
                .read_until(&self.config.read_pattern, self.config.read_timeout)
                .await?;
            pages += 1;
            for line in chunk.lines() {
                if let Some(item) = filter(line) {
                    scan.push(item);
                }
            }
            if self.config.prompt_pattern.is_match(&chunk) {
                break;
            }
            self.transport
                .write(self.config.page_key.as_bytes())
                .await?;
        }
        trace!(command, pages, "paged command finished");
        Ok(scan)
    }

    /// Closes the connection. This is also the cancellation path: a session
    /// aborted mid-pagination is closed, never resynchronized.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::Disconnected;
        self.transport.close().await
    }
}
