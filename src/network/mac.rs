use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::network::ModelError;

/// A canonical 6-octet MAC address.
///
/// Accepted input formats:
/// - `aabbccddeeff`
/// - `aa:bb:cc:dd:ee:ff`
/// - `aa bb cc dd ee ff`
/// - `aa-bb-cc-dd-ee-ff`
/// - `aabbcc-ddeeff`
/// - `aabbcc:ddeeff`
///
/// Actually any string as long as it contains exactly twelve hex characters
/// once every non-hex character has been stripped. Case does not matter; the
/// canonical textual form is lowercase colon-separated octet pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn parse(input: &str) -> Result<Self, ModelError> {
        let digits: String = input
            .chars()
            .filter(|c| c.is_ascii_hexdigit())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if digits.len() != 12 {
            return Err(ModelError::InvalidMac(input.to_string()));
        }
        let bytes = hex::decode(&digits).map_err(|_| ModelError::InvalidMac(input.to_string()))?;
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&bytes);
        Ok(MacAddress(octets))
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MacAddress::parse(s)
    }
}

impl Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

// Serialized as the canonical string since mac addresses are used as map keys.

impl Serialize for MacAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MacAddress::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Hash key for per-VLAN device lists. `Unknown` is the designated sentinel
/// meaning "no MAC address known": it groups neighbor records which carry no
/// usable MAC, and is distinct from an absent field on a device record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacKey {
    Unknown,
    Known(MacAddress),
}

impl MacKey {
    pub fn mac(&self) -> Option<MacAddress> {
        match self {
            MacKey::Unknown => None,
            MacKey::Known(mac) => Some(*mac),
        }
    }
}

impl From<Option<MacAddress>> for MacKey {
    fn from(mac: Option<MacAddress>) -> Self {
        match mac {
            Some(mac) => MacKey::Known(mac),
            None => MacKey::Unknown,
        }
    }
}

impl Display for MacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MacKey::Unknown => write!(f, "unknown"),
            MacKey::Known(mac) => write!(f, "{}", mac),
        }
    }
}

impl Serialize for MacKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MacKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "unknown" {
            Ok(MacKey::Unknown)
        } else {
            MacAddress::parse(&s)
                .map(MacKey::Known)
                .map_err(serde::de::Error::custom)
        }
    }
}
