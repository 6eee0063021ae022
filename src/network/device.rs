use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::network::ModelError;

/// Identity of a device speaking IP: a validated address plus a non-empty
/// hostname. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpDevice {
    ip: IpAddr,
    hostname: String,
}

impl IpDevice {
    pub fn new(ip: &str, hostname: &str) -> Result<Self, ModelError> {
        let hostname = hostname.trim();
        if hostname.is_empty() {
            return Err(ModelError::EmptyHostname);
        }
        let ip: IpAddr = ip
            .parse()
            .map_err(|_| ModelError::InvalidAddress(ip.to_string()))?;
        Ok(IpDevice {
            ip,
            hostname: hostname.to_string(),
        })
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_device() {
        let device = IpDevice::new("10.0.0.1", "core-sw").unwrap();
        assert_eq!(device.ip().to_string(), "10.0.0.1");
        assert_eq!(device.hostname(), "core-sw");
    }

    #[test]
    fn test_empty_hostname_rejected() {
        assert_eq!(
            IpDevice::new("10.0.0.1", "   "),
            Err(ModelError::EmptyHostname)
        );
    }

    #[test]
    fn test_invalid_address_rejected() {
        assert!(matches!(
            IpDevice::new("10.0.0.300", "core-sw"),
            Err(ModelError::InvalidAddress(_))
        ));
    }
}
