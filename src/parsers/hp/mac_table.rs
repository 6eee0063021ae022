use once_cell::sync::Lazy;
use regex::Regex;

use crate::network::MacAddress;
use crate::switch::MacTableEntry;

// `show mac-address` row: MAC in HP's aabbcc-ddeeff notation, port, VLAN id.
static MAC_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9a-fA-F]{6}-[0-9a-fA-F]{6})\s+([A-F]\d+|\d+/\d+)\s+(\d+)").unwrap()
});

/// Parses one row of `show mac-address` into the port it was learned on and
/// its [`MacTableEntry`].
pub fn parse_mac_table_line(line: &str) -> Option<(String, MacTableEntry)> {
    let caps = MAC_ROW.captures(line)?;
    let mac = MacAddress::parse(&caps[1]).ok()?;
    let vlan_id = caps[3].parse().ok()?;
    Some((caps[2].to_string(), MacTableEntry { mac, vlan_id }))
}
