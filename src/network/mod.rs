/*
 * This module defines the normalized topology model produced by one polling
 * cycle: Port -> Vlan -> MacAddress -> ConnectedDevice, plus the value types
 * shared by every layer (MacAddress, IpDevice, PoeConfig, DataSource).
 */

pub mod connected_device;
pub mod data_source;
pub mod device;
pub mod mac;
pub mod poe;
pub mod port;
pub mod vlan;

pub use connected_device::ConnectedDevice;
pub use data_source::{DataRecord, DataSource, DataSourceKind};
pub use device::IpDevice;
pub use mac::{MacAddress, MacKey};
pub use poe::PoeConfig;
pub use port::Port;
pub use vlan::Vlan;

use thiserror::Error;

/// Validation errors raised by the data model. All of these are fatal at the
/// point of violation; none of them is silently coerced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("invalid mac address: {0}")]
    InvalidMac(String),
    #[error("invalid ip address: {0}")]
    InvalidAddress(String),
    #[error("host name can not be empty")]
    EmptyHostname,
    #[error("{0} can not be empty")]
    EmptyField(&'static str),
    #[error("poe max must be greater than zero")]
    PoeMaxNotPositive,
    #[error("poe max ({max} W) can not be lesser than usage ({usage} W)")]
    PoeMaxBelowUsage { max: f64, usage: f64 },
    #[error("poe usage must not be negative")]
    PoeUsageNegative,
    #[error("poe usage ({usage} W) can not exceed max ({max} W)")]
    PoeUsageAboveMax { usage: f64, max: f64 },
}
