// # Address Source Trait
//
// Defines the interface for enumerating the addresses bound to a local
// network interface.
//
// ## Implementations
//
// - getifaddrs-based (Unix): `ifddns-ip-iface` crate
// - Static lists for tests
//
// ## Usage
//
// ```rust,ignore
// use ifddns_core::AddressSource;
//
// let source = /* AddressSource implementation */;
// for address in source.interface_addresses("eth0")? {
//     println!("{:?}", address);
// }
// ```

use ipnet::IpNet;
use std::net::IpAddr;

/// An address bound to an interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceAddress {
    /// An IP address with its network prefix
    Prefixed(IpNet),

    /// An address of some other kind, named by its network
    Other {
        /// Network or family name (e.g. "ipx")
        network: String,
    },
}

impl InterfaceAddress {
    /// Create a prefixed address, falling back to a host prefix if
    /// `prefix_len` is out of range for the address
    pub fn prefixed(addr: IpAddr, prefix_len: u8) -> Self {
        let net = IpNet::new(addr, prefix_len).unwrap_or_else(|_| IpNet::from(addr));
        InterfaceAddress::Prefixed(net)
    }
}

impl From<IpNet> for InterfaceAddress {
    fn from(net: IpNet) -> Self {
        InterfaceAddress::Prefixed(net)
    }
}

/// Trait for interface address enumeration
///
/// Implementations report addresses in the order the OS reports them.
/// Ordering matters: the resolver picks the first match.
///
/// # Errors
///
/// An unknown interface name must yield [`crate::Error::InterfaceLookup`]
/// rather than an empty list.
pub trait AddressSource: Send + Sync {
    /// List every address bound to `interface`
    fn interface_addresses(&self, interface: &str) -> Result<Vec<InterfaceAddress>, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_keeps_valid_prefix() {
        let addr: IpAddr = "192.0.2.7".parse().unwrap();
        let expected: IpNet = "192.0.2.7/24".parse().unwrap();

        assert_eq!(InterfaceAddress::prefixed(addr, 24), InterfaceAddress::from(expected));
    }

    #[test]
    fn test_prefixed_out_of_range_falls_back_to_host() {
        let addr: IpAddr = "2001:db8::7".parse().unwrap();
        let expected: IpNet = "2001:db8::7/128".parse().unwrap();

        assert_eq!(InterfaceAddress::prefixed(addr, 200), InterfaceAddress::Prefixed(expected));
    }
}
