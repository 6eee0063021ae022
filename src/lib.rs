/*!
Polls managed network switches and assembles a normalized topology model.

One polling cycle talks to one device over two channels: an interactive CLI
session (SSH) for the paged `show` commands and a read-only telemetry walk
(SNMP) for the ARP table and the physically present ports. The gathered data
is reconciled with externally supplied lookup tables into a
Port -> Vlan -> MacAddress -> ConnectedDevice tree.

- [`network`]: the data model of the result.
- [`data_aquisition`]: transports and the pagination state machine.
- [`parsers`]: pure text parsers for the per-command output.
- [`switch`]: the vendor capability trait and the HP family implementation.
- [`topology`]: the aggregation engine and the cross-device ARP accumulator.
*/

pub mod data_aquisition;
pub mod network;
pub mod parsers;
pub mod switch;
pub mod topology;
