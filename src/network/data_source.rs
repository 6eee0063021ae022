use std::collections::HashMap;
use std::net::IpAddr;
use std::time::SystemTime;

use crate::network::MacAddress;

/// How a data source's table is keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceKind {
    Mac,
    Ip,
}

/// One entry of an enrichment table. Every attribute is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataRecord {
    pub ip: Option<IpAddr>,
    pub sysname: Option<String>,
    pub port: Option<String>,
    pub time: Option<SystemTime>,
}

/// An externally supplied, read-only lookup table correlating MAC or IP keys
/// to metadata not obtainable from the switch itself.
///
/// Tables are keyed by the canonical textual form of the key (lowercase
/// colon-separated for MACs). A key always maps to a list of records; a
/// source with a single record per key stores one-element lists.
#[derive(Debug, Clone)]
pub struct DataSource {
    name: String,
    kind: DataSourceKind,
    ip_lookup: bool,
    data: HashMap<String, Vec<DataRecord>>,
}

impl DataSource {
    pub fn new(
        name: &str,
        kind: DataSourceKind,
        data: HashMap<String, Vec<DataRecord>>,
        ip_lookup: bool,
    ) -> Self {
        DataSource {
            name: name.to_string(),
            kind,
            ip_lookup,
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DataSourceKind {
        self.kind
    }

    /// Whether values found through the MAC key additionally need an
    /// IP-keyed lookup pass.
    pub fn need_ip_lookup(&self) -> bool {
        self.ip_lookup
    }

    pub fn lookup_mac(&self, mac: &MacAddress) -> Option<&[DataRecord]> {
        if self.kind != DataSourceKind::Mac {
            return None;
        }
        self.data.get(&mac.to_string()).map(Vec::as_slice)
    }

    pub fn lookup_ip(&self, ip: &IpAddr) -> Option<&[DataRecord]> {
        if self.kind != DataSourceKind::Ip {
            return None;
        }
        self.data.get(&ip.to_string()).map(Vec::as_slice)
    }
}
