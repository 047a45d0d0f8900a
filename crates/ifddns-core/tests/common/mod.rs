//! Test doubles and common utilities for contract tests
//!
//! These doubles record every call so tests can assert on exactly what the
//! engines asked of their collaborators.

#![allow(dead_code)]

use ifddns_core::Error;
use ifddns_core::config::Host;
use ifddns_core::error::Result;
use ifddns_core::traits::{
    AddressSource, HostUpdater, InterfaceAddress, NewRecord, ZoneApi, ZoneInfo, ZoneRecord,
};
use ipnet::IpNet;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

/// An address source backed by a fixed table
#[derive(Default)]
pub struct StaticAddressSource {
    interfaces: HashMap<String, Vec<InterfaceAddress>>,
}

impl StaticAddressSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interface with prefixed addresses given as CIDR strings
    pub fn with_interface(mut self, name: &str, cidrs: &[&str]) -> Self {
        let addresses = cidrs
            .iter()
            .map(|cidr| InterfaceAddress::from(cidr.parse::<IpNet>().expect("valid CIDR")))
            .collect();
        self.interfaces.insert(name.to_string(), addresses);
        self
    }

    /// Add an interface with an explicit address list
    pub fn with_addresses(mut self, name: &str, addresses: Vec<InterfaceAddress>) -> Self {
        self.interfaces.insert(name.to_string(), addresses);
        self
    }
}

impl AddressSource for StaticAddressSource {
    fn interface_addresses(&self, interface: &str) -> Result<Vec<InterfaceAddress>> {
        self.interfaces
            .get(interface)
            .cloned()
            .ok_or_else(|| Error::interface_lookup(interface, "no such network interface"))
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// A host updater that records calls and can be told to fail for one host
#[derive(Clone, Default)]
pub struct RecordingHostUpdater {
    calls: Arc<Mutex<Vec<(String, IpAddr)>>>,
    fail_for: Option<String>,
}

impl RecordingHostUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail (with a status error) when asked to update `host_name`
    pub fn failing_for(host_name: &str) -> Self {
        Self {
            calls: Arc::default(),
            fail_for: Some(host_name.to_string()),
        }
    }

    /// Get the (host, address) pairs received so far
    pub fn calls(&self) -> Vec<(String, IpAddr)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HostUpdater for RecordingHostUpdater {
    async fn update_host(&self, host: &Host, address: IpAddr) -> Result<()> {
        self.calls.lock().unwrap().push((host.name.clone(), address));

        if self.fail_for.as_deref() == Some(host.name.as_str()) {
            return Err(Error::status("500 Internal Server Error"));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// A single call received by [`MockZoneApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneCall {
    Info(i64),
    Clone { zone: i64, from: i64 },
    List { zone: i64, version: i64 },
    Delete { zone: i64, version: i64, record: i64 },
    Add { zone: i64, version: i64, record: NewRecord },
    Activate { zone: i64, version: i64 },
}

/// Which call of [`MockZoneApi`] should fail, and how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneFailure {
    Info,
    Clone,
    List,
    Add,
    /// Delete reports "nothing deleted" without an error
    DeleteRefused,
    /// Activation reports "refused" without an error
    ActivateRefused,
    Activate,
}

struct ZoneState {
    live_version: i64,
    next_version: i64,
    next_record_id: i64,
    versions: HashMap<i64, Vec<ZoneRecord>>,
    calls: Vec<ZoneCall>,
    failure: Option<ZoneFailure>,
}

/// An in-memory versioned zone
#[derive(Clone)]
pub struct MockZoneApi {
    state: Arc<Mutex<ZoneState>>,
}

impl MockZoneApi {
    /// Create a zone whose live version `live_version` holds `records`
    pub fn new(live_version: i64, records: Vec<ZoneRecord>) -> Self {
        let next_record_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let mut versions = HashMap::new();
        versions.insert(live_version, records);

        Self {
            state: Arc::new(Mutex::new(ZoneState {
                live_version,
                next_version: live_version + 1,
                next_record_id,
                versions,
                calls: Vec::new(),
                failure: None,
            })),
        }
    }

    /// Make one kind of call fail
    pub fn failing(self, failure: ZoneFailure) -> Self {
        self.state.lock().unwrap().failure = Some(failure);
        self
    }

    /// Get every call received so far
    pub fn calls(&self) -> Vec<ZoneCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Get the currently live version number
    pub fn live_version(&self) -> i64 {
        self.state.lock().unwrap().live_version
    }

    /// Get the records of a version
    pub fn records(&self, version: i64) -> Vec<ZoneRecord> {
        self.state
            .lock()
            .unwrap()
            .versions
            .get(&version)
            .cloned()
            .unwrap_or_default()
    }

    fn fails(state: &ZoneState, failure: ZoneFailure) -> bool {
        state.failure == Some(failure)
    }
}

fn remote_error(what: &str) -> Error {
    Error::provider("mock", format!("{what} failed"))
}

#[async_trait::async_trait]
impl ZoneApi for MockZoneApi {
    async fn zone_info(&self, zone_id: i64) -> Result<ZoneInfo> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ZoneCall::Info(zone_id));
        if Self::fails(&state, ZoneFailure::Info) {
            return Err(remote_error("zone.info"));
        }

        Ok(ZoneInfo {
            id: zone_id,
            name: "example.org".to_string(),
            version: state.live_version,
        })
    }

    async fn clone_version(&self, zone_id: i64, from_version: i64) -> Result<i64> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ZoneCall::Clone {
            zone: zone_id,
            from: from_version,
        });
        if Self::fails(&state, ZoneFailure::Clone) {
            return Err(remote_error("zone.version.new"));
        }

        let records = state.versions.get(&from_version).cloned().unwrap_or_default();
        let version = state.next_version;
        state.next_version += 1;
        state.versions.insert(version, records);
        Ok(version)
    }

    async fn list_records(&self, zone_id: i64, version: i64) -> Result<Vec<ZoneRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ZoneCall::List {
            zone: zone_id,
            version,
        });
        if Self::fails(&state, ZoneFailure::List) {
            return Err(remote_error("zone.record.list"));
        }

        Ok(state.versions.get(&version).cloned().unwrap_or_default())
    }

    async fn delete_record(&self, zone_id: i64, version: i64, record_id: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ZoneCall::Delete {
            zone: zone_id,
            version,
            record: record_id,
        });
        if Self::fails(&state, ZoneFailure::DeleteRefused) {
            return Ok(false);
        }

        let records = state.versions.entry(version).or_default();
        let before = records.len();
        records.retain(|r| r.id != record_id);
        Ok(records.len() < before)
    }

    async fn add_record(&self, zone_id: i64, version: i64, record: &NewRecord) -> Result<ZoneRecord> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ZoneCall::Add {
            zone: zone_id,
            version,
            record: record.clone(),
        });
        if Self::fails(&state, ZoneFailure::Add) {
            return Err(remote_error("zone.record.add"));
        }

        let added = ZoneRecord {
            id: state.next_record_id,
            name: record.name.clone(),
            record_type: record.record_type.clone(),
            value: record.value.clone(),
            ttl: record.ttl,
        };
        state.next_record_id += 1;
        state.versions.entry(version).or_default().push(added.clone());
        Ok(added)
    }

    async fn activate_version(&self, zone_id: i64, version: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ZoneCall::Activate {
            zone: zone_id,
            version,
        });
        if Self::fails(&state, ZoneFailure::Activate) {
            return Err(remote_error("zone.version.set"));
        }
        if Self::fails(&state, ZoneFailure::ActivateRefused) {
            return Ok(false);
        }

        state.live_version = version;
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to build a zone record
pub fn record(id: i64, name: &str, record_type: &str, value: &str) -> ZoneRecord {
    ZoneRecord {
        id,
        name: name.to_string(),
        record_type: record_type.to_string(),
        value: value.to_string(),
        ttl: 10800,
    }
}
