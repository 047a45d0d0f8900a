// # Zone API Trait
//
// Defines the interface for providers that manage records inside versioned
// zones: records are edited in a draft copy of the zone, and the draft is
// then made live in one step.
//
// ## Implementations
//
// - Gandi XML-RPC zone API: `ifddns-provider-gandi` crate
//
// ## Usage
//
// ```rust,ignore
// use ifddns_core::ZoneApi;
//
// let info = api.zone_info(zone_id).await?;
// let draft = api.clone_version(zone_id, info.version).await?;
// for record in api.list_records(zone_id, draft).await? {
//     println!("{} {} {}", record.name, record.record_type, record.value);
// }
// ```

use async_trait::async_trait;

/// Summary of a zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneInfo {
    /// Zone ID
    pub id: i64,
    /// Zone name
    pub name: String,
    /// Currently active version
    pub version: i64,
}

/// A record inside a zone version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    /// The record ID (provider-specific)
    pub id: i64,
    /// Record name (local part)
    pub name: String,
    /// Record type (A, AAAA, ...)
    pub record_type: String,
    /// Record value
    pub value: String,
    /// Time-to-live in seconds
    pub ttl: u32,
}

/// A record to add to a zone version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    /// Record name (local part)
    pub name: String,
    /// Record type (A, AAAA, ...)
    pub record_type: String,
    /// Record value
    pub value: String,
    /// Time-to-live in seconds
    pub ttl: u32,
}

/// Trait for versioned-zone DNS providers
///
/// Each method is a single remote call. Implementations do not retry and
/// do not clean up after a failed call; the caller decides what a failure
/// means for the workflow.
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// Fetch zone information, including the active version
    async fn zone_info(&self, zone_id: i64) -> Result<ZoneInfo, crate::Error>;

    /// Create a new version of the zone copied from `from_version`
    ///
    /// Returns the new version number.
    async fn clone_version(&self, zone_id: i64, from_version: i64) -> Result<i64, crate::Error>;

    /// List all records of a zone version
    async fn list_records(&self, zone_id: i64, version: i64)
    -> Result<Vec<ZoneRecord>, crate::Error>;

    /// Delete one record from a zone version
    ///
    /// Returns `false` if the provider reports that nothing was deleted.
    async fn delete_record(
        &self,
        zone_id: i64,
        version: i64,
        record_id: i64,
    ) -> Result<bool, crate::Error>;

    /// Add a record to a zone version
    async fn add_record(
        &self,
        zone_id: i64,
        version: i64,
        record: &NewRecord,
    ) -> Result<ZoneRecord, crate::Error>;

    /// Make `version` the live version of the zone
    ///
    /// Returns `false` if the provider refused without an error.
    async fn activate_version(&self, zone_id: i64, version: i64) -> Result<bool, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
