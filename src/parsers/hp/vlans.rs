use once_cell::sync::Lazy;
use regex::Regex;

use crate::network::Vlan;
use crate::switch::VlanMember;

// `show vlans` catalog row: numeric id and name before the status separator.
static VLAN_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s+(\S+)[^|]*\|").unwrap());

// `show vlans <id>` membership row: port name and its mode in this VLAN.
static MEMBER_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-F]\d+|\d+/\d+)\s+(\S+)").unwrap());

/// Parses one catalog row of `show vlans` into a [`Vlan`] definition.
pub fn parse_vlan_line(line: &str) -> Option<Vlan> {
    let caps = VLAN_ROW.captures(line)?;
    let id = caps[1].parse().ok()?;
    Some(Vlan::new(id, &caps[2]))
}

/// Parses one membership row of `show vlans <id>`.
pub fn parse_vlan_member_line(line: &str) -> Option<VlanMember> {
    let caps = MEMBER_ROW.captures(line)?;
    Some(VlanMember {
        port: caps[1].to_string(),
        mode: caps[2].to_string(),
    })
}
