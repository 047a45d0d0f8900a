//! Core traits for the updater
//!
//! This module defines the seams between the core logic and the outside world.
//!
//! - [`AddressSource`]: Enumerate the addresses of a local interface
//! - [`HostUpdater`]: Push one host's address with a single request
//! - [`ZoneApi`]: Edit records in versioned zones

pub mod address_source;
pub mod host_updater;
pub mod zone_api;

pub use address_source::{AddressSource, InterfaceAddress};
pub use host_updater::HostUpdater;
pub use zone_api::{NewRecord, ZoneApi, ZoneInfo, ZoneRecord};
