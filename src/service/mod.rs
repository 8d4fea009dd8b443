pub mod http;

pub use http::HttpMaskingService;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::masking::Configuration;
use crate::record::{Dataset, Record};

/// The remote service that stores records and executes masking rules.
#[async_trait]
pub trait MaskingService: Send + Sync {
    /// The fixed, ordered column schema.
    async fn columns(&self) -> Result<Vec<String>>;

    async fn list_records(&self) -> Result<Dataset>;

    async fn get_record(&self, id: &str) -> Result<Record>;

    async fn create_record(&self, record: &Record) -> Result<()>;

    async fn update_record(&self, id: &str, record: &Record) -> Result<()>;

    async fn delete_record(&self, id: &str) -> Result<()>;

    /// Mask a bounded sample. The sample size is a hint.
    async fn preview(&self, request: &PreviewRequest) -> Result<Dataset>;

    /// Mask a full dataset. The response is expected to match `request.data`
    /// in length, order and field set.
    async fn mask(&self, request: &MaskRequest) -> Result<Dataset>;

    async fn audit_logs(&self) -> Result<Vec<AuditEntry>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsResponse {
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub rules: serde_json::Map<String, serde_json::Value>,
    pub sample_size: usize,
}

impl PreviewRequest {
    pub fn new(config: &Configuration, sample_size: usize) -> Self {
        Self {
            rules: config.rule_map(),
            sample_size,
        }
    }
}

/// Accepted shapes of a preview response.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PreviewResponse {
    Records(Dataset),
    Data { data: Dataset },
    Wrapped { records: Dataset },
}

impl PreviewResponse {
    pub fn into_records(self) -> Dataset {
        match self {
            PreviewResponse::Records(records)
            | PreviewResponse::Data { data: records }
            | PreviewResponse::Wrapped { records } => records,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskRequest {
    pub data: Dataset,
    pub original_data: Dataset,
    pub config: Configuration,
}

/// One row of the service's audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: serde_json::Value,
    /// ISO-8601. Timestamps without an offset are read as UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub action: String,
    pub masked_table: String,
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 timestamp: {raw}")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogResponse {
    pub logs: Vec<AuditEntry>,
}
