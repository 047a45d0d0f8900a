//! Error types for the updater
//!
//! Every failure is fatal to the run that produced it, so the variants only
//! need to identify what went wrong; nothing matches on them to recover.

use crate::family::AddressFamily;
use thiserror::Error;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the updater
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing credentials, missing flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local file errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unrecognized address family token
    #[error("Unable to parse \"{0}\" as an address family")]
    FamilyParse(String),

    /// The named interface does not exist or could not be queried
    #[error("Interface lookup failed for {interface}: {message}")]
    InterfaceLookup {
        /// Interface name as given by the caller
        interface: String,
        /// Underlying OS error text
        message: String,
    },

    /// An interface reported an address that is not a network-prefixed IP
    #[error("Unexpected address type {network} for interface {interface}")]
    AddressType {
        /// Network or family name of the offending address
        network: String,
        /// Interface name
        interface: String,
    },

    /// No address of the requested family on the interface
    #[error("Unable to find address of family {family} on interface {interface}")]
    AddressNotFound {
        /// Requested family
        family: AddressFamily,
        /// Interface name
        interface: String,
    },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider answered with something other than 200 OK
    #[error("Non-OK status received: {0}")]
    Status(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an interface lookup error
    pub fn interface_lookup(interface: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InterfaceLookup {
            interface: interface.into(),
            message: message.into(),
        }
    }

    /// Create an unexpected address type error
    pub fn address_type(network: impl Into<String>, interface: impl Into<String>) -> Self {
        Self::AddressType {
            network: network.into(),
            interface: interface.into(),
        }
    }

    /// Create an "address not found" error
    pub fn address_not_found(family: AddressFamily, interface: impl Into<String>) -> Self {
        Self::AddressNotFound {
            family,
            interface: interface.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a non-OK status error
    pub fn status(status: impl Into<String>) -> Self {
        Self::Status(status.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
