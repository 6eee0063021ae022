/*
 * Topology assembly: the per-device aggregation of CLI and telemetry data
 * into the Port -> Vlan -> MacAddress -> ConnectedDevice model, plus the
 * cross-device ARP accumulator.
 */

pub mod aggregator;
pub mod arp;

pub use aggregator::{AggregationError, Aggregator, SwitchSnapshot};
pub use arp::ArpAggregator;
