use std::fmt::Display;
use std::net::IpAddr;
use std::time::SystemTime;

use serde::Serialize;

use crate::network::{MacAddress, ModelError};

/// One observation of something associated with a MAC address on a port,
/// tagged with the name of the data source or protocol it came from.
///
/// Every attribute except the source is independently optional. Presence is
/// expressed through `Option`: an unset field reads as `None`, and a set
/// field is never an empty string (empty port names and sysnames are
/// rejected on write).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectedDevice {
    source: String,
    mac: Option<MacAddress>,
    ip: Option<IpAddr>,
    port_name: Option<String>,
    sysname: Option<String>,
    time: Option<SystemTime>,
}

impl ConnectedDevice {
    /// Creates a device observation with no attributes set. `mac` being
    /// `None` means the sentinel unknown MAC.
    pub fn new(source: &str, mac: Option<MacAddress>) -> Self {
        ConnectedDevice {
            source: source.to_string(),
            mac,
            ip: None,
            port_name: None,
            sysname: None,
            time: None,
        }
    }

    /// Builds an observation from whatever subset of attributes a record
    /// supplied. `None` leaves the attribute unset.
    pub fn from_parts(
        source: &str,
        mac: Option<MacAddress>,
        ip: Option<IpAddr>,
        port_name: Option<&str>,
        sysname: Option<&str>,
        time: Option<SystemTime>,
    ) -> Result<Self, ModelError> {
        let mut device = ConnectedDevice::new(source, mac);
        if let Some(ip) = ip {
            device.set_ip(ip);
        }
        if let Some(port_name) = port_name {
            device.set_port_name(port_name)?;
        }
        if let Some(sysname) = sysname {
            device.set_sysname(sysname)?;
        }
        if let Some(time) = time {
            device.set_time(time);
        }
        Ok(device)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn mac(&self) -> Option<MacAddress> {
        self.mac
    }

    pub fn set_mac(&mut self, mac: MacAddress) {
        self.mac = Some(mac);
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }

    pub fn set_ip(&mut self, ip: IpAddr) {
        self.ip = Some(ip);
    }

    pub fn port_name(&self) -> Option<&str> {
        self.port_name.as_deref()
    }

    pub fn set_port_name(&mut self, port_name: &str) -> Result<(), ModelError> {
        let port_name = port_name.trim();
        if port_name.is_empty() {
            return Err(ModelError::EmptyField("port name"));
        }
        self.port_name = Some(port_name.to_string());
        Ok(())
    }

    pub fn sysname(&self) -> Option<&str> {
        self.sysname.as_deref()
    }

    pub fn set_sysname(&mut self, sysname: &str) -> Result<(), ModelError> {
        let sysname = sysname.trim();
        if sysname.is_empty() {
            return Err(ModelError::EmptyField("sysname"));
        }
        self.sysname = Some(sysname.to_string());
        Ok(())
    }

    pub fn time(&self) -> Option<SystemTime> {
        self.time
    }

    pub fn set_time(&mut self, time: SystemTime) {
        self.time = Some(time);
    }
}

impl Display for ConnectedDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.source)?;
        if let Some(mac) = &self.mac {
            write!(f, " mac={}", mac)?;
        }
        if let Some(ip) = &self.ip {
            write!(f, " ip={}", ip)?;
        }
        if let Some(port_name) = &self.port_name {
            write!(f, " port={}", port_name)?;
        }
        if let Some(sysname) = &self.sysname {
            write!(f, " sysname={}", sysname)?;
        }
        if let Some(time) = self.time {
            write!(f, " seen={}", humantime::format_rfc3339_seconds(time))?;
        }
        Ok(())
    }
}
