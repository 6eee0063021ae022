use std::net::IpAddr;
use std::time::SystemTime;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::data_aquisition::core::WalkEntry;
use crate::network::MacAddress;
use crate::switch::{ArpObservation, ArpTable};

// A run of six hex pairs in a rendered ARP value. Single-digit pairs occur
// and are zero-padded before normalization.
static MAC_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"((?:[a-f0-9]{1,2}:?){6})").unwrap());

// Bare port token inside an entity description value.
static PORT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-F]\d{1,2}|\d+/\d{1,2})").unwrap());

/// Parses an ARP subtree walk into `MAC -> IP -> observation`.
///
/// The MAC comes from the entry value (lowercased, first six-pair hex run,
/// pairs zero-padded); the IP is the last four segments of the entry path.
/// Entries missing either are skipped.
pub fn parse_arp_walk(entries: &[WalkEntry], time: SystemTime) -> ArpTable {
    let mut table = ArpTable::new();
    for entry in entries {
        let value = entry.value.to_lowercase();
        let Some(caps) = MAC_RUN.captures(&value) else {
            continue;
        };
        let padded: Vec<String> = caps[1]
            .split(':')
            .filter(|pair| !pair.is_empty())
            .map(|pair| format!("{pair:0>2}"))
            .collect();
        let Ok(mac) = MacAddress::parse(&padded.join(":")) else {
            continue;
        };

        let segments: Vec<&str> = entry.path.split('.').collect();
        if segments.len() < 4 {
            continue;
        }
        let Ok(ip) = segments[segments.len() - 4..].join(".").parse::<IpAddr>() else {
            continue;
        };

        table.entry(mac).or_default().insert(
            ip,
            ArpObservation {
                ip,
                port: None,
                sysname: None,
                time,
            },
        );
    }
    table
}

/// Parses an entity walk into the ordered list of physically present port
/// names.
pub fn parse_physical_walk(entries: &[WalkEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| PORT_TOKEN.captures(&entry.value))
        .map(|caps| caps[1].to_string())
        .collect()
}
