// # Host Updater Trait
//
// Defines the interface for pushing one host's address to a GET-style
// update service.
//
// ## Implementations
//
// - freedns.afraid.org sync protocol: `ifddns-provider-afraid` crate

use async_trait::async_trait;
use std::net::IpAddr;

use crate::config::Host;

/// Trait for single-request host update services
///
/// Implementations make exactly one request per call and never retry.
/// Any response other than success is returned as an error.
#[async_trait]
pub trait HostUpdater: Send + Sync {
    /// Publish `address` for `host`
    ///
    /// `address` was resolved from `host.interface` for `host.family`.
    async fn update_host(&self, host: &Host, address: IpAddr) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
