use once_cell::sync::Lazy;
use regex::Regex;

use crate::network::Port;
use crate::parsers::hp::column;

// `show interface config` row: port name (optionally suffixed with the trunk
// it belongs to), then the fixed enabled/mode columns after the separator.
static INTERFACE_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"((?:[A-F]\d+|\d+/\d+)(?:-Trk\d+)?)[^|]*\|(.+)").unwrap());

/// Parses one row of `show interface config` into a [`Port`].
///
/// A `NAME-TrkN` port name splits into the port name and its trunk; a blank
/// mode column reads as an unknown mode, never as an empty string.
pub fn parse_interface_line(line: &str) -> Option<Port> {
    let caps = INTERFACE_ROW.captures(line)?;
    let name = caps.get(1)?.as_str();
    let cols = caps.get(2)?.as_str();

    let (name, trunk) = match name.split_once('-') {
        Some((name, trunk)) => (name, Some(trunk)),
        None => (name, None),
    };
    let enabled = column(cols, 1, 9).eq_ignore_ascii_case("yes");
    let mode = column(cols, 9, 22);

    Port::new(name, enabled, (!mode.is_empty()).then_some(mode), trunk).ok()
}
