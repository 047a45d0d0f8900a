// # Gandi Zone API Provider
//
// This crate provides a `ZoneApi` implementation for Gandi's XML-RPC zone
// API (v3).
//
// ## API Reference
//
// Every method takes the API key as its first parameter.
//
// - `domain.zone.info(key, zone)`: zone summary, including the live version
// - `domain.zone.version.new(key, zone, version)`: copy a version, returns the new number
// - `domain.zone.record.list(key, zone, version)`: records of a version
// - `domain.zone.record.delete(key, zone, version, {id})`: returns the number deleted
// - `domain.zone.record.add(key, zone, version, {name, type, value, ttl})`: returns the record
// - `domain.zone.version.set(key, zone, version)`: make a version live
//
// ## Environments
//
// - Production: `https://rpc.gandi.net/xmlrpc/`
// - Testing (OTE): `https://rpc.ote.gandi.net/xmlrpc/`
//
// ## Security Requirements
//
// - The API key NEVER appears in logs or error messages

pub mod xmlrpc;

use async_trait::async_trait;
use ifddns_core::traits::{NewRecord, ZoneApi, ZoneInfo, ZoneRecord};
use ifddns_core::{Error, Result};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use xmlrpc::{ResponseError, Value};

/// Production XML-RPC endpoint
pub const PRODUCTION_ENDPOINT: &str = "https://rpc.gandi.net/xmlrpc/";

/// Operational Test Environment endpoint
pub const TESTING_ENDPOINT: &str = "https://rpc.ote.gandi.net/xmlrpc/";

const PROVIDER_NAME: &str = "gandi";

/// Which Gandi environment to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    /// The OTE sandbox
    Testing,
}

impl Environment {
    /// Pick the environment from the `--use_ote` switch
    pub fn from_use_ote(use_ote: bool) -> Self {
        if use_ote {
            Environment::Testing
        } else {
            Environment::Production
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_ENDPOINT,
            Environment::Testing => TESTING_ENDPOINT,
        }
    }
}

/// Gandi XML-RPC zone API client
///
/// Every trait method is exactly one XML-RPC call.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API key.
pub struct GandiZoneApi {
    /// API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// XML-RPC endpoint URL
    endpoint: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for GandiZoneApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GandiZoneApi")
            .field("api_key", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl GandiZoneApi {
    /// Create a client for one of the Gandi environments
    pub fn new(api_key: impl Into<String>, environment: Environment) -> Result<Self> {
        Self::with_endpoint(api_key, environment.endpoint())
    }

    /// Create a client for an arbitrary XML-RPC endpoint
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Self::with_client(api_key, endpoint, client)
    }

    /// Create a client with a caller-supplied HTTP client
    pub fn with_client(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        client: reqwest::Client,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("API key cannot be empty"));
        }

        Ok(Self {
            api_key,
            endpoint: endpoint.into(),
            client,
        })
    }

    /// The endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Perform one call; the API key is prepended to `params`
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let mut all = Vec::with_capacity(params.len() + 1);
        all.push(Value::from(self.api_key.as_str()));
        all.extend(params);

        let body = xmlrpc::encode_call(method, &all).map_err(|e| {
            Error::provider(PROVIDER_NAME, format!("Failed to encode {}: {}", method, e))
        })?;

        tracing::debug!("XML-RPC {} -> {}", method, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::http(format!("{} request failed: {}", method, e.without_url())))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::http(format!("{} returned HTTP {}", method, status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read {} response: {}", method, e)))?;

        xmlrpc::parse_response(&body).map_err(|e| match e {
            ResponseError::Fault { .. } => {
                Error::provider(PROVIDER_NAME, format!("{} failed: {}", method, e))
            }
            ResponseError::Malformed(_) => Error::provider(PROVIDER_NAME, e.to_string()),
        })
    }
}

fn unexpected(method: &str, what: &str) -> Error {
    Error::provider(
        PROVIDER_NAME,
        format!("Unexpected {} response: {}", method, what),
    )
}

fn int_member(value: &Value, method: &str, name: &str) -> Result<i64> {
    value
        .member(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| unexpected(method, &format!("missing integer \"{}\"", name)))
}

fn str_member(value: &Value, method: &str, name: &str) -> Result<String> {
    value
        .member(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| unexpected(method, &format!("missing string \"{}\"", name)))
}

fn to_record(value: &Value, method: &str) -> Result<ZoneRecord> {
    let ttl = int_member(value, method, "ttl")?;

    Ok(ZoneRecord {
        id: int_member(value, method, "id")?,
        name: str_member(value, method, "name")?,
        record_type: str_member(value, method, "type")?,
        value: str_member(value, method, "value")?,
        ttl: u32::try_from(ttl).map_err(|_| unexpected(method, &format!("ttl {}", ttl)))?,
    })
}

#[async_trait]
impl ZoneApi for GandiZoneApi {
    async fn zone_info(&self, zone_id: i64) -> Result<ZoneInfo> {
        const METHOD: &str = "domain.zone.info";
        let info = self.call(METHOD, vec![Value::from(zone_id)]).await?;

        Ok(ZoneInfo {
            id: int_member(&info, METHOD, "id")?,
            name: str_member(&info, METHOD, "name")?,
            version: int_member(&info, METHOD, "version")?,
        })
    }

    async fn clone_version(&self, zone_id: i64, from_version: i64) -> Result<i64> {
        const METHOD: &str = "domain.zone.version.new";
        self.call(METHOD, vec![Value::from(zone_id), Value::from(from_version)])
            .await?
            .as_i64()
            .ok_or_else(|| unexpected(METHOD, "expected an integer version"))
    }

    async fn list_records(&self, zone_id: i64, version: i64) -> Result<Vec<ZoneRecord>> {
        const METHOD: &str = "domain.zone.record.list";
        let list = self
            .call(METHOD, vec![Value::from(zone_id), Value::from(version)])
            .await?;

        list.as_array()
            .ok_or_else(|| unexpected(METHOD, "expected an array"))?
            .iter()
            .map(|item| to_record(item, METHOD))
            .collect()
    }

    async fn delete_record(&self, zone_id: i64, version: i64, record_id: i64) -> Result<bool> {
        const METHOD: &str = "domain.zone.record.delete";
        let deleted = self
            .call(
                METHOD,
                vec![
                    Value::from(zone_id),
                    Value::from(version),
                    Value::structure([("id", Value::from(record_id))]),
                ],
            )
            .await?
            .as_i64()
            .ok_or_else(|| unexpected(METHOD, "expected a count"))?;

        Ok(deleted == 1)
    }

    async fn add_record(&self, zone_id: i64, version: i64, record: &NewRecord) -> Result<ZoneRecord> {
        const METHOD: &str = "domain.zone.record.add";
        let params = Value::structure([
            ("name", Value::from(record.name.as_str())),
            ("type", Value::from(record.record_type.as_str())),
            ("value", Value::from(record.value.as_str())),
            ("ttl", Value::from(i64::from(record.ttl))),
        ]);

        let created = self
            .call(METHOD, vec![Value::from(zone_id), Value::from(version), params])
            .await?;
        to_record(&created, METHOD)
    }

    async fn activate_version(&self, zone_id: i64, version: i64) -> Result<bool> {
        const METHOD: &str = "domain.zone.version.set";
        self.call(METHOD, vec![Value::from(zone_id), Value::from(version)])
            .await?
            .as_bool()
            .ok_or_else(|| unexpected(METHOD, "expected a boolean"))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
