//! Configuration types for the updater
//!
//! Both tools build their configuration once at startup and pass it by
//! reference from there on:
//!
//! - [`Config`]: the host list of the GET-based updater, loaded from JSON
//! - [`ZoneTarget`]: the record the zone updater replaces, built from flags

use crate::error::{Error, Result};
use crate::family::AddressFamily;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Host updater configuration
///
/// ```json
/// {
///   "User": "alice",
///   "Password": "hunter2",
///   "Hosts": [
///     { "Name": "home.example.org", "Interface": "eth0", "AddressFamily": "ipv6" }
///   ]
/// }
/// ```
#[derive(Clone)]
pub struct Config {
    /// Account user name
    pub user: String,

    /// Account password
    /// ⚠️ NEVER log this value
    pub password: String,

    /// Hosts to update, in order
    pub hosts: Vec<Host>,
}

// Custom Debug implementation that hides the password
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("user", &self.user)
            .field("password", &"<REDACTED>")
            .field("hosts", &self.hosts)
            .finish()
    }
}

/// A single host to update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Fully-qualified host name registered with the provider
    pub name: String,

    /// Local interface whose address is published
    pub interface: String,

    /// Address family to publish
    pub family: AddressFamily,
}

impl Host {
    /// Create a new host entry
    pub fn new(
        name: impl Into<String>,
        interface: impl Into<String>,
        family: AddressFamily,
    ) -> Self {
        Self {
            name: name.into(),
            interface: interface.into(),
            family,
        }
    }
}

// Keys are PascalCase; the lowercase spellings are accepted as well and a
// null host list reads as empty.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawConfig {
    #[serde(default, alias = "user")]
    user: String,
    #[serde(default, alias = "password")]
    password: String,
    #[serde(default, alias = "hosts")]
    hosts: Option<Vec<RawHost>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawHost {
    #[serde(default, alias = "name")]
    name: String,
    #[serde(default, alias = "interface")]
    interface: String,
    #[serde(default, alias = "addressFamily", alias = "addressfamily")]
    address_family: String,
}

impl TryFrom<RawHost> for Host {
    type Error = Error;

    fn try_from(raw: RawHost) -> Result<Self> {
        // An empty family means IPv4
        let family = if raw.address_family.is_empty() {
            AddressFamily::Ipv4
        } else {
            raw.address_family.parse()?
        };

        Ok(Host {
            name: raw.name,
            interface: raw.interface,
            family,
        })
    }
}

impl Config {
    /// Load the configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    /// Parse and validate the configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;

        let mut config = Config {
            user: raw.user,
            password: raw.password,
            hosts: Vec::new(),
        };

        // Credentials are checked before any host entry is looked at
        config.validate()?;

        config.hosts = raw
            .hosts
            .unwrap_or_default()
            .into_iter()
            .map(Host::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.user.is_empty() || self.password.is_empty() {
            return Err(Error::config("Missing User or Password value."));
        }

        Ok(())
    }
}

/// Zone record targeted by the zone updater
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneTarget {
    /// Provider zone ID
    pub zone_id: i64,

    /// Record name (local part of the hostname)
    pub record: String,

    /// Local interface whose address is published
    pub interface: String,

    /// Address family to publish
    pub family: AddressFamily,
}

impl ZoneTarget {
    /// Validate the target
    pub fn validate(&self) -> Result<()> {
        if self.interface.is_empty() {
            return Err(Error::config("Missing interface name"));
        }
        if self.zone_id == 0 {
            return Err(Error::config("Missing zone ID"));
        }
        if self.record.is_empty() {
            return Err(Error::config("Missing record name"));
        }

        Ok(())
    }
}

/// Read an API key from a file
///
/// Leading and trailing newlines and spaces are stripped.
pub fn read_api_key(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Error reading API key from \"{}\": {}",
            path.display(),
            e
        ))
    })?;

    let key = contents.trim_matches(|c| c == '\n' || c == ' ');
    if key.is_empty() {
        return Err(Error::config(format!(
            "API key file \"{}\" is empty",
            path.display()
        )));
    }

    Ok(key.to_string())
}
