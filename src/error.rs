use std::path::PathBuf;

use crate::masking::{MaskingRule, SemanticType};

#[derive(Debug, thiserror::Error)]
pub enum RosterMaskError {
    #[error("failed to fetch {resource}: {reason}")]
    FetchFailure { resource: String, reason: String },

    #[error("rule '{rule}' is not allowed for {data_type} field '{field}'")]
    InvalidRuleForType {
        field: String,
        rule: MaskingRule,
        data_type: SemanticType,
    },

    #[error("field not in masking configuration: {field}")]
    UnknownField { field: String },

    #[error("masking apply failed: {0}")]
    MaskingApply(#[from] MaskingApplyFailure),

    #[error("a masking call is already in flight")]
    MaskingInFlight,

    #[error("config parse error in {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("invalid record: {reason}")]
    InvalidRecord { reason: String },

    #[error("invalid configuration export: {reason}")]
    InvalidExport { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("api error: status={status}, body={body}")]
    Api { status: u16, body: String },
}

/// Ways an apply or preview call can fail. The working dataset is never
/// touched when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum MaskingApplyFailure {
    #[error("service error: {reason}")]
    Service { reason: String },

    #[error("service returned status={status}, body={body}")]
    Api { status: u16, body: String },

    #[error("malformed response shape: {reason}")]
    MalformedResponseShape { reason: String },

    #[error("working dataset has {working} records but the source has {original}")]
    OutOfStep { working: usize, original: usize },
}

impl RosterMaskError {
    /// Service-side failures are surfaced as notifications and the client keeps
    /// running. The rest are contract violations in the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RosterMaskError::FetchFailure { .. }
                | RosterMaskError::MaskingApply(_)
                | RosterMaskError::MaskingInFlight
                | RosterMaskError::Api { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RosterMaskError>;
