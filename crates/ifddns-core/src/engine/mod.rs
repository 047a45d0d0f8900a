//! Update engines
//!
//! Two engines, one per tool:
//!
//! - [`HostEngine`]: resolve each configured host's address and push it
//!   through a [`HostUpdater`]
//! - [`ZoneEngine`]: resolve one address and replace a record in a
//!   versioned zone through a [`ZoneApi`](crate::traits::ZoneApi)
//!
//! ## Event Flow (hosts)
//!
//! ```text
//! for host in config.hosts:
//!     AddressSource ── resolve(interface, family) ──► IpAddr
//!     HostUpdater   ── update_host(host, IpAddr)  ──► Ok / Err (stop)
//! ```
//!
//! Both engines are strictly sequential and stop at the first error. There
//! is no retry and no state carried between runs.

mod zone;

pub use zone::{DEFAULT_RECORD_TTL, ZoneEngine, ZoneUpdateOutcome};

use crate::config::{Config, Host};
use crate::error::Result;
use crate::resolver::resolve_interface_address;
use crate::traits::{AddressSource, HostUpdater};
use std::net::IpAddr;
use tracing::{debug, info};

/// Engine for the GET-based host updater
pub struct HostEngine {
    /// Source of interface addresses
    source: Box<dyn AddressSource>,

    /// Update service
    updater: Box<dyn HostUpdater>,
}

impl HostEngine {
    /// Create a new host engine
    pub fn new(source: Box<dyn AddressSource>, updater: Box<dyn HostUpdater>) -> Self {
        Self { source, updater }
    }

    /// Update every configured host, in order
    ///
    /// Stops at the first failing host; later hosts are not attempted.
    ///
    /// # Returns
    ///
    /// The number of hosts updated.
    pub async fn run(&self, config: &Config) -> Result<usize> {
        info!(
            "Updating {} host(s) via {}",
            config.hosts.len(),
            self.updater.provider_name()
        );

        for host in &config.hosts {
            self.update_host(host).await?;
        }

        Ok(config.hosts.len())
    }

    /// Resolve and publish the address of a single host
    ///
    /// Resolver errors are returned unchanged.
    pub async fn update_host(&self, host: &Host) -> Result<IpAddr> {
        let address = resolve_interface_address(self.source.as_ref(), &host.interface, host.family)?;
        debug!(
            "Host {}: {} address {} from {}",
            host.name, host.family, address, host.interface
        );

        self.updater.update_host(host, address).await?;
        info!("Updated {} -> {}", host.name, address);

        Ok(address)
    }
}
