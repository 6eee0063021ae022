/*
 * Parsers for the HP ProCurve CLI and telemetry output.
 *
 * Row recognition is pattern-based and column extraction is fixed-offset,
 * matching the CLI's table layout at 160 columns. A line that does not match
 * a row pattern is skipped; a matched row carrying a malformed value (e.g. a
 * bad MAC) drops only that record.
 */

pub mod interfaces;
pub mod mac_table;
pub mod neighbors;
pub mod poe;
pub mod snmp_tables;
pub mod vlans;

pub use interfaces::parse_interface_line;
pub use mac_table::parse_mac_table_line;
pub use neighbors::{parse_cdp_transcript, parse_lldp_line, parse_lldp_port_id};
pub use poe::parse_poe_line;
pub use snmp_tables::{parse_arp_walk, parse_physical_walk};
pub use vlans::{parse_vlan_line, parse_vlan_member_line};

/// Trimmed fixed-offset column of a row, tolerant of rows shorter than the
/// layout.
pub(crate) fn column(row: &str, start: usize, end: usize) -> &str {
    let end = end.min(row.len());
    let start = start.min(end);
    row.get(start..end).map(str::trim).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::column;

    #[test]
    fn test_column_clamps_to_row_length() {
        assert_eq!(column("  A1  ", 2, 12), "A1");
        assert_eq!(column("A1", 5, 12), "");
        assert_eq!(column("", 0, 4), "");
    }
}
