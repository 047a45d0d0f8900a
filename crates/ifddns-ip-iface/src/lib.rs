// # Interface Address Source
//
// This crate provides an `AddressSource` backed by the OS interface table
// (`getifaddrs(3)`), for Unix systems.
//
// ## Behaviour
//
// - The interface is looked up by name first (`if_nametoindex(3)`), so an
//   unknown name is a lookup error even when it would have no addresses.
// - Entries are reported in the order `getifaddrs` returns them.
// - IPv4/IPv6 entries become prefixed addresses; the prefix length comes
//   from the netmask.
// - Link-layer entries (AF_PACKET on Linux, AF_LINK on BSD) and entries
//   without an address describe the interface itself, not an address bound
//   to it, and are not reported.
// - Anything else is reported as `InterfaceAddress::Other`.
//
// ## Platform Support
//
// On non-Unix platforms every lookup fails with a configuration error.

use ifddns_core::traits::{AddressSource, InterfaceAddress};
use ifddns_core::{Error, Result};
use std::net::IpAddr;

#[cfg(unix)]
use nix::ifaddrs::getifaddrs;
#[cfg(unix)]
use nix::net::if_::if_nametoindex;
#[cfg(unix)]
use nix::sys::socket::{AddressFamily as SockFamily, SockaddrLike, SockaddrStorage};

/// Address source reading the local interface table
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAddressSource;

impl SystemAddressSource {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl AddressSource for SystemAddressSource {
    fn interface_addresses(&self, interface: &str) -> Result<Vec<InterfaceAddress>> {
        if_nametoindex(interface).map_err(|e| {
            Error::interface_lookup(interface, format!("no such network interface ({})", e))
        })?;

        let entries =
            getifaddrs().map_err(|e| Error::interface_lookup(interface, e.to_string()))?;

        let mut addresses = Vec::new();
        for entry in entries.filter(|e| e.interface_name == interface) {
            let Some(address) = entry.address.as_ref() else {
                continue;
            };

            match to_ip(address) {
                Some(ip) => {
                    let prefix_len = entry
                        .netmask
                        .as_ref()
                        .and_then(to_ip)
                        .map(netmask_prefix_len)
                        .unwrap_or_else(|| host_prefix_len(ip));
                    addresses.push(InterfaceAddress::prefixed(ip, prefix_len));
                }
                None if is_link_layer(address.family()) => {}
                None => addresses.push(InterfaceAddress::Other {
                    network: address
                        .family()
                        .map(|f| format!("{:?}", f).to_lowercase())
                        .unwrap_or_else(|| "unknown".to_string()),
                }),
            }
        }

        tracing::debug!("{} address(es) bound to {}", addresses.len(), interface);
        Ok(addresses)
    }

    fn source_name(&self) -> &'static str {
        "getifaddrs"
    }
}

#[cfg(not(unix))]
impl AddressSource for SystemAddressSource {
    fn interface_addresses(&self, _interface: &str) -> Result<Vec<InterfaceAddress>> {
        Err(Error::config(
            "Interface address lookup is only supported on Unix",
        ))
    }

    fn source_name(&self) -> &'static str {
        "unsupported"
    }
}

#[cfg(unix)]
fn to_ip(storage: &SockaddrStorage) -> Option<IpAddr> {
    if let Some(v4) = storage.as_sockaddr_in() {
        return Some(IpAddr::V4(v4.ip()));
    }
    storage.as_sockaddr_in6().map(|v6| IpAddr::V6(v6.ip()))
}

#[cfg(unix)]
fn is_link_layer(family: Option<SockFamily>) -> bool {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    let link = matches!(family, Some(SockFamily::Packet));

    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "dragonfly"
    ))]
    let link = matches!(family, Some(SockFamily::Link));

    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "dragonfly"
    )))]
    let link = {
        let _ = family;
        false
    };

    link
}

/// Number of leading one bits in a netmask
#[cfg_attr(not(unix), allow(dead_code))]
fn netmask_prefix_len(mask: IpAddr) -> u8 {
    let ones = match mask {
        IpAddr::V4(v4) => u32::from(v4).leading_ones(),
        IpAddr::V6(v6) => u128::from(v6).leading_ones(),
    };
    ones as u8
}

#[cfg_attr(not(unix), allow(dead_code))]
fn host_prefix_len(ip: IpAddr) -> u8 {
    match ip {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}
