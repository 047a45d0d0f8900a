//! Interface address resolution
//!
//! Picks the address to publish for an interface and family:
//!
//! - IPv4: the first address that fits in 4 bytes. IPv4-mapped IPv6
//!   addresses count and are returned in dotted-quad form.
//! - IPv6: the first address that does not fit in 4 bytes and is global
//!   unicast. Link-local, loopback, multicast and the unspecified address are
//!   passed over; unique-local and documentation ranges are accepted.
//!
//! Addresses are examined in the order the source reports them. Anything
//! that is not a network-prefixed IP address stops the search with an error,
//! even if a later address would have matched.

use crate::error::{Error, Result};
use crate::family::AddressFamily;
use crate::traits::{AddressSource, InterfaceAddress};
use std::net::{IpAddr, Ipv6Addr};
use tracing::debug;

/// Resolve the address of `family` bound to `interface`
pub fn resolve_interface_address<S>(
    source: &S,
    interface: &str,
    family: AddressFamily,
) -> Result<IpAddr>
where
    S: AddressSource + ?Sized,
{
    let addresses = source.interface_addresses(interface)?;
    debug!(
        "{} address(es) on {} from {}",
        addresses.len(),
        interface,
        source.source_name()
    );

    for address in &addresses {
        let ip = match address {
            InterfaceAddress::Prefixed(net) => net.addr(),
            InterfaceAddress::Other { network } => {
                return Err(Error::address_type(network.as_str(), interface));
            }
        };

        if let Some(found) = match_family(ip, family) {
            debug!("Resolved {} address {} on {}", family, found, interface);
            return Ok(found);
        }
    }

    Err(Error::address_not_found(family, interface))
}

/// Check a single address against `family`
///
/// Returns the address in the form it should be published in.
pub fn match_family(ip: IpAddr, family: AddressFamily) -> Option<IpAddr> {
    match (family, as_ipv4(ip)) {
        (AddressFamily::Ipv4, Some(v4)) => Some(v4),
        (AddressFamily::Ipv4, None) => None,
        (AddressFamily::Ipv6, Some(_)) => None,
        (AddressFamily::Ipv6, None) => match ip {
            IpAddr::V6(v6) if is_global_unicast(&v6) => Some(ip),
            _ => None,
        },
    }
}

fn as_ipv4(ip: IpAddr) -> Option<IpAddr> {
    match ip {
        IpAddr::V4(_) => Some(ip),
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4),
    }
}

fn is_global_unicast(ip: &Ipv6Addr) -> bool {
    !ip.is_unspecified() && !ip.is_loopback() && !ip.is_multicast() && !ip.is_unicast_link_local()
}
