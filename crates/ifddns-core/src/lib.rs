// # ifddns-core
//
// Core library for interface-driven dynamic DNS updates.
//
// ## Architecture Overview
//
// This library provides the pieces shared by both updater tools:
// - **AddressFamily**: Family token parsing and family → record type mapping
// - **AddressSource**: Trait for enumerating a local interface's addresses
// - **resolve_interface_address**: Picks the address to publish
// - **HostUpdater**: Trait for single-request update services
// - **ZoneApi**: Trait for versioned-zone providers
// - **HostEngine / ZoneEngine**: Sequential, fail-fast orchestration
//
// ## Design Principles
//
// 1. **Library-First**: Entry points only parse flags and wire components
// 2. **Plugin-Based**: Providers and address sources live in their own crates
// 3. **One Shot**: No monitoring, no retries, no persisted state

pub mod config;
pub mod engine;
pub mod error;
pub mod family;
pub mod resolver;
pub mod traits;

// Re-export core types for convenience
pub use config::{Config, Host, ZoneTarget, read_api_key};
pub use engine::{HostEngine, ZoneEngine, ZoneUpdateOutcome};
pub use error::{Error, Result};
pub use family::AddressFamily;
pub use resolver::resolve_interface_address;
pub use traits::{AddressSource, HostUpdater, InterfaceAddress, ZoneApi};
