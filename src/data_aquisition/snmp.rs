use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use snmp2::{AsyncSession, Oid, Value, Version};
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::data_aquisition::core::{TelemetryError, TelemetryTransport, WalkEntry};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// SNMP client for one network device. Implements [`TelemetryTransport`] by
/// walking a subtree with repeated getnext requests. The session is created
/// lazily on first use.
pub struct SnmpClient {
    address: SocketAddr,
    community: String,
    snmp_version: Version,
    timeout: Duration,
    session: Option<Arc<Mutex<AsyncSession>>>,
}

impl SnmpClient {
    pub fn new(
        address: SocketAddr,
        community: &str,
        snmp_version: Version,
    ) -> Result<Self, TelemetryError> {
        let community = community.trim();
        if community.is_empty() {
            return Err(TelemetryError::InvalidConfig(
                "snmp community can not be empty".to_string(),
            ));
        }
        if snmp_version == Version::V3 {
            return Err(TelemetryError::InvalidConfig(
                "snmp v3 is not supported, use v1 or v2c".to_string(),
            ));
        }
        Ok(SnmpClient {
            address,
            community: community.to_string(),
            snmp_version,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            session: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retrieves the SNMP session for the client, creating it on first call.
    async fn get_session(&mut self) -> Result<Arc<Mutex<AsyncSession>>, TelemetryError> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }
        let session = match self.snmp_version {
            Version::V1 => AsyncSession::new_v1(self.address, self.community.as_bytes(), 0).await,
            _ => AsyncSession::new_v2c(self.address, self.community.as_bytes(), 0).await,
        }
        .map_err(|e| TelemetryError::Transport(e.to_string()))?;
        let session = Arc::new(Mutex::new(session));
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Octet strings holding readable text render as text; binary ones (MAC
    /// addresses in the ARP table) render as colon-separated hex pairs.
    fn render_octets(bytes: &[u8]) -> String {
        if bytes
            .iter()
            .all(|b| b.is_ascii_graphic() || *b == b' ')
        {
            String::from_utf8_lossy(bytes).to_string()
        } else {
            bytes
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(":")
        }
    }

    fn render_value(value: &Value) -> String {
        match value {
            Value::OctetString(bytes) => SnmpClient::render_octets(bytes),
            Value::Integer(i) => i.to_string(),
            Value::Counter32(c) => c.to_string(),
            Value::Counter64(c) => c.to_string(),
            Value::Unsigned32(u) => u.to_string(),
            Value::Timeticks(t) => t.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::IpAddress(ip) => format!("{}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]),
            Value::ObjectIdentifier(oid) => oid.to_string(),
            _ => String::new(),
        }
    }
}

#[async_trait]
impl TelemetryTransport for SnmpClient {
    async fn walk(&mut self, root: &str) -> Result<Vec<WalkEntry>, TelemetryError> {
        let root_oid =
            Oid::from_str(root).map_err(|_| TelemetryError::InvalidPath(root.to_string()))?;
        let timeout = self.timeout;
        let session = self.get_session().await?;
        let mut session = session.lock().await;

        debug!(root, "starting telemetry walk");
        let mut entries = Vec::new();
        let mut current = root_oid.clone();
        loop {
            let response = tokio::time::timeout(timeout, session.getnext(&current))
                .await
                .map_err(|_| TelemetryError::Timeout(timeout))?
                .map_err(|e| TelemetryError::Transport(format!("{e:?}")))?;

            let Some((oid, value)) = response.varbinds.into_iter().next() else {
                break;
            };
            let next = oid.to_owned();
            // Left the subtree, or the agent stopped making progress.
            if !next.starts_with(&root_oid) || next == current {
                break;
            }
            entries.push(WalkEntry {
                path: next.to_string(),
                value: SnmpClient::render_value(&value),
            });
            current = next;
        }
        trace!(root, count = entries.len(), "telemetry walk finished");
        Ok(entries)
    }
}
