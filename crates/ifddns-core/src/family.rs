//! Address family helper
//!
//! Parses the family tokens accepted on the command line and in the config
//! file, and maps a family to the DNS record type that carries it.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// IP address family of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// IPv4, published as an A record
    Ipv4,
    /// IPv6, published as an AAAA record
    Ipv6,
}

impl AddressFamily {
    /// DNS record type for this family
    pub fn record_type(self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "A",
            AddressFamily::Ipv6 => "AAAA",
        }
    }
}

impl FromStr for AddressFamily {
    type Err = Error;

    /// Case-insensitive; surrounding whitespace is not trimmed.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.to_ascii_lowercase().as_str() {
            "ip4" | "ipv4" | "inet4" | "4" => Ok(AddressFamily::Ipv4),
            "ip6" | "ipv6" | "inet6" | "6" => Ok(AddressFamily::Ipv6),
            _ => Err(Error::FamilyParse(token.to_string())),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => f.write_str("IPv4"),
            AddressFamily::Ipv6 => f.write_str("IPv6"),
        }
    }
}
