//! Zone-record replacement
//!
//! Replaces every `name`/`type` record of a zone with a single fresh record:
//!
//! 1. Fetch the zone and clone its active version into a draft
//! 2. Delete every draft record with the target name and type
//! 3. Add the new record (TTL [`DEFAULT_RECORD_TTL`])
//! 4. Make the draft the live version
//!
//! A failure at any step ends the run. Nothing is rolled back; a draft
//! version created before the failure is left behind on the provider.

use crate::config::ZoneTarget;
use crate::error::{Error, Result};
use crate::resolver::resolve_interface_address;
use crate::traits::{AddressSource, NewRecord, ZoneApi, ZoneRecord};
use std::net::IpAddr;
use tracing::info;

/// TTL of records created by the zone engine (seconds)
pub const DEFAULT_RECORD_TTL: u32 = 300;

/// Result of a successful replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneUpdateOutcome {
    /// The address that was published
    pub address: IpAddr,
    /// The new (now live) zone version
    pub version: i64,
    /// IDs of the records removed from the new version
    pub deleted: Vec<i64>,
    /// The record that was added
    pub record: ZoneRecord,
}

/// Engine for the zone-record updater
pub struct ZoneEngine {
    /// Source of interface addresses
    source: Box<dyn AddressSource>,

    /// Zone provider
    api: Box<dyn ZoneApi>,
}

impl ZoneEngine {
    /// Create a new zone engine
    pub fn new(source: Box<dyn AddressSource>, api: Box<dyn ZoneApi>) -> Self {
        Self { source, api }
    }

    /// Validate the target, resolve its address and replace the record
    pub async fn run(&self, target: &ZoneTarget) -> Result<ZoneUpdateOutcome> {
        target.validate()?;

        let address =
            resolve_interface_address(self.source.as_ref(), &target.interface, target.family)?;
        info!(
            "Resolved {} address {} on {}",
            target.family, address, target.interface
        );

        self.replace_record(target, address).await
    }

    /// Replace the target record with one pointing at `address`
    pub async fn replace_record(
        &self,
        target: &ZoneTarget,
        address: IpAddr,
    ) -> Result<ZoneUpdateOutcome> {
        let zone_id = target.zone_id;
        let record_type = target.family.record_type();

        let version = self.clone_live_version(zone_id).await?;
        info!("New version {} created for zone {}", version, zone_id);

        let deleted = self
            .delete_matching(zone_id, version, &target.record, record_type)
            .await?;

        let new_record = NewRecord {
            name: target.record.clone(),
            record_type: record_type.to_string(),
            value: address.to_string(),
            ttl: DEFAULT_RECORD_TTL,
        };
        let record = self.api.add_record(zone_id, version, &new_record).await?;
        info!("New record \"{}\" created with ID {}", record.name, record.id);

        if !self.api.activate_version(zone_id, version).await? {
            return Err(Error::provider(
                self.api.provider_name(),
                "Setting new version live failed, but no error returned.",
            ));
        }
        info!("Version {} set live for zone {}", version, zone_id);

        Ok(ZoneUpdateOutcome {
            address,
            version,
            deleted,
            record,
        })
    }

    async fn clone_live_version(&self, zone_id: i64) -> Result<i64> {
        let info = self.api.zone_info(zone_id).await?;
        self.api.clone_version(zone_id, info.version).await
    }

    async fn delete_matching(
        &self,
        zone_id: i64,
        version: i64,
        name: &str,
        record_type: &str,
    ) -> Result<Vec<i64>> {
        let records = self.api.list_records(zone_id, version).await?;
        let mut deleted = Vec::new();

        for record in records
            .iter()
            .filter(|r| r.name == name && r.record_type == record_type)
        {
            info!("Removing record \"{}\" with ID {}", record.name, record.id);
            if !self.api.delete_record(zone_id, version, record.id).await? {
                return Err(Error::provider(
                    self.api.provider_name(),
                    "Deleting record failed, but no error returned.",
                ));
            }
            deleted.push(record.id);
        }

        Ok(deleted)
    }
}
