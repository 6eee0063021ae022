use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::time::SystemTime;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::network::MacAddress;
use crate::parsers::hp::column;
use crate::switch::NeighborRecord;

// `show cdp neighbor detail` is a label:value transcript, one neighbor per
// `Port :` block.
static LABEL_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-zA-Z ]+):(.+)").unwrap());

// `show lldp info remote-device` row, anchored on the local port column.
static LLDP_ANCHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-F]\d+|\d+/\d+)\s+\|").unwrap());

// PortId property in the per-port LLDP detail, holding a MAC address for
// most neighbors.
static LLDP_PORT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"PortId[ :]+([a-f0-9: -]{12,18})").unwrap());

/// Parses the full `show cdp neighbor detail` transcript into per-port
/// neighbor records.
///
/// The transcript is a sequence of `label : value` blocks. A `Port` label
/// opens a new record; the device id is taken as a MAC when it cleans up to
/// one and as a sysname otherwise; a non-IP address type discards the whole
/// record; the platform is appended to an already known sysname.
pub fn parse_cdp_transcript(
    lines: &[String],
    time: SystemTime,
) -> HashMap<String, NeighborRecord> {
    let mut result: HashMap<String, NeighborRecord> = HashMap::new();
    let mut current: Option<String> = None;
    let mut discard: HashSet<String> = HashSet::new();

    for line in lines {
        let Some(caps) = LABEL_VALUE.captures(line) else {
            continue;
        };
        let label = caps[1].trim().to_lowercase();
        let value = caps[2].trim().to_string();

        if label == "port" {
            result.insert(value.clone(), NeighborRecord::new(&value, time));
            current = Some(value);
            continue;
        }
        let Some(record) = current.as_ref().and_then(|port| result.get_mut(port)) else {
            continue;
        };
        match label.as_str() {
            "device id" => match MacAddress::parse(&value) {
                Ok(mac) => record.mac = Some(mac),
                Err(_) => {
                    if !value.is_empty() {
                        record.sysname = Some(value);
                    }
                }
            },
            "address type" => {
                if value != "IP"
                    && let Some(port) = &current
                {
                    discard.insert(port.clone());
                }
            }
            "address" => {
                if let Ok(ip) = value.parse::<IpAddr>() {
                    record.ip = Some(ip);
                }
            }
            "platform" => {
                if !value.is_empty() {
                    record.sysname = match record.sysname.take() {
                        Some(sysname) => Some(format!("{sysname} ; {value}")),
                        None => Some(value),
                    };
                }
            }
            "device port" => {
                if !value.is_empty() {
                    record.remote_port = Some(value);
                }
            }
            _ => {}
        }
    }

    for port in discard {
        result.remove(&port);
    }
    result
}

/// Parses one row of `show lldp info remote-device`, keyed by the local
/// port.
///
/// The chassis id column holds an IP address, a MAC address or free text;
/// free text becomes the sysname when the sysname column itself is empty.
pub fn parse_lldp_line(line: &str, time: SystemTime) -> Option<(String, NeighborRecord)> {
    let caps = LLDP_ANCHOR.captures(line)?;
    let anchor = caps.get(1)?;
    let row = line.get(anchor.start().saturating_sub(2)..)?;

    let chassis = column(row, 14, 40);
    let remote_port = column(row, 47, 57);
    let sysname = column(row, 57, row.len());

    let mut record = NeighborRecord::new(column(row, 2, 12), time);
    record.sysname = (!sysname.is_empty()).then(|| sysname.to_string());
    record.remote_port = (!remote_port.is_empty()).then(|| remote_port.to_string());

    if let Ok(ip) = chassis.parse::<IpAddr>() {
        record.ip = Some(ip);
    } else {
        match MacAddress::parse(chassis) {
            Ok(mac) => record.mac = Some(mac),
            Err(_) => {
                if record.sysname.is_none() && !chassis.is_empty() {
                    record.sysname = Some(chassis.to_string());
                }
            }
        }
    }
    Some((anchor.as_str().to_string(), record))
}

/// Extracts the PortId candidate from one line of the per-port LLDP detail.
/// The candidate may or may not be a MAC address; the caller decides.
pub fn parse_lldp_port_id(line: &str) -> Option<String> {
    Some(LLDP_PORT_ID.captures(line)?[1].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_cdp_full_block() {
        let lines = transcript(
            "  Port : A4\n\
               Device ID : 3417eb-a1b2c3\n\
               Address Type : IP\n\
               Address : 10.0.0.17\n\
               Platform : cisco WS-C2960\n\
               Device Port : Gi0/1\n",
        );
        let result = parse_cdp_transcript(&lines, SystemTime::UNIX_EPOCH);

        let record = &result["A4"];
        assert_eq!(record.port, "A4");
        assert_eq!(record.mac.unwrap().to_string(), "34:17:eb:a1:b2:c3");
        assert_eq!(record.ip.unwrap().to_string(), "10.0.0.17");
        assert_eq!(record.sysname.as_deref(), Some("cisco WS-C2960"));
        assert_eq!(record.remote_port.as_deref(), Some("Gi0/1"));
    }

    #[test]
    fn test_cdp_device_id_falls_back_to_sysname() {
        let lines = transcript(
            "  Port : A4\n\
               Device ID : edge-switch-7\n\
               Platform : cisco WS-C2960\n",
        );
        let result = parse_cdp_transcript(&lines, SystemTime::UNIX_EPOCH);

        let record = &result["A4"];
        assert!(record.mac.is_none());
        // The platform is appended to the device-id sysname.
        assert_eq!(
            record.sysname.as_deref(),
            Some("edge-switch-7 ; cisco WS-C2960")
        );
    }

    #[test]
    fn test_cdp_non_ip_address_discards_record() {
        let lines = transcript(
            "  Port : A4\n\
               Device ID : 3417eb-a1b2c3\n\
               Address Type : IPX\n\
               Port : A5\n\
               Device ID : 3417eb-ffeedd\n\
               Address Type : IP\n\
               Address : 10.0.0.18\n",
        );
        let result = parse_cdp_transcript(&lines, SystemTime::UNIX_EPOCH);

        assert!(!result.contains_key("A4"));
        assert_eq!(result["A5"].ip.unwrap().to_string(), "10.0.0.18");
    }

    #[test]
    fn test_lldp_row_with_ip_chassis() {
        let line = "  A1        | 10.0.0.9                         Gi0/1     edge-sw";
        let (key, record) = parse_lldp_line(line, SystemTime::UNIX_EPOCH).unwrap();

        assert_eq!(key, "A1");
        assert_eq!(record.port, "A1");
        assert_eq!(record.ip.unwrap().to_string(), "10.0.0.9");
        assert!(record.mac.is_none());
        assert_eq!(record.remote_port.as_deref(), Some("Gi0/1"));
        assert_eq!(record.sysname.as_deref(), Some("edge-sw"));
    }

    #[test]
    fn test_lldp_row_with_mac_chassis() {
        let line = "  A2        | 3417eb-a1b2c3                    23        ";
        let (_, record) = parse_lldp_line(line, SystemTime::UNIX_EPOCH).unwrap();

        assert_eq!(record.mac.unwrap().to_string(), "34:17:eb:a1:b2:c3");
        assert!(record.ip.is_none());
        assert_eq!(record.remote_port.as_deref(), Some("23"));
        assert!(record.sysname.is_none());
    }

    #[test]
    fn test_lldp_free_text_chassis_becomes_sysname() {
        let line = "  A3        | printer-4                        1         ";
        let (_, record) = parse_lldp_line(line, SystemTime::UNIX_EPOCH).unwrap();

        assert!(record.ip.is_none());
        assert!(record.mac.is_none());
        assert_eq!(record.sysname.as_deref(), Some("printer-4"));
    }

    #[test]
    fn test_lldp_header_skipped() {
        assert!(
            parse_lldp_line("  LocalPort | ChassisId", SystemTime::UNIX_EPOCH).is_none()
        );
    }

    #[test]
    fn test_lldp_port_id() {
        assert_eq!(
            parse_lldp_port_id("  PortId   : 34 17 eb a1 b2 c3").as_deref(),
            Some("34 17 eb a1 b2 c3")
        );
        assert!(parse_lldp_port_id("  SysName  : edge-sw").is_none());
    }
}
