use once_cell::sync::Lazy;
use regex::Regex;

use crate::network::PoeConfig;

// `show power-over-ethernet brief` row: port, enabled flag, then the
// allocated and used wattage.
static POE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-F]\d+|\d+/\d+)\s+\|\s+(\S+)[^0-9]+([0-9.]+)\s+W\s+([0-9.]+)\s+W")
        .unwrap()
});

/// Parses one row of `show power-over-ethernet brief`.
///
/// A row whose wattage columns violate the config invariants (a zero power
/// budget, usage above the budget) drops the record.
pub fn parse_poe_line(line: &str) -> Option<(String, PoeConfig)> {
    let caps = POE_ROW.captures(line)?;
    let enabled = caps[2].eq_ignore_ascii_case("yes");
    let max = caps[3].parse().ok()?;
    let usage = caps[4].parse().ok()?;
    let config = PoeConfig::new(enabled, max, usage).ok()?;
    Some((caps[1].to_string(), config))
}
