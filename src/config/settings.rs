use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, RosterMaskError};

/// Top-level client settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Where the masking service lives and how to reach it.
    #[serde(default)]
    pub service: ServiceConfig,

    /// The record schema.
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Table paging.
    #[serde(default)]
    pub view: ViewConfig,

    /// Preview sampling.
    #[serde(default)]
    pub preview: PreviewConfig,
}

impl Settings {
    /// Load settings from a YAML file. Returns default if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| RosterMaskError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load settings for a project. Checks `.roster-mask/config.yml`, then the
    /// global `~/.config/roster-mask/config.yml`.
    pub fn load_project(project_root: &Path) -> Result<Self> {
        let local = super::dirs_project(project_root).join("config.yml");
        if local.exists() {
            return Self::load_from(&local);
        }
        Self::load_from(&super::dirs_global().join("config.yml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the masking service. Default: `http://127.0.0.1:5000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Per-request timeout. Unset means requests wait for the service.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Honour `HTTP_PROXY`-style environment variables.
    #[serde(default = "default_use_proxy")]
    pub use_proxy: bool,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_use_proxy() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoints: EndpointConfig::default(),
            timeout_secs: None,
            use_proxy: default_use_proxy(),
        }
    }
}

/// Paths of each service operation, relative to the base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub records: String,
    pub columns: String,
    pub preview: String,
    pub mask: String,
    pub audit: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            records: "/students".into(),
            columns: "/api/columns".into(),
            preview: "/api/preview".into(),
            mask: "/api/mask".into(),
            audit: "/api/audit".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Fixed display and export order of fields.
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,

    /// Field holding each record's identity.
    #[serde(default = "default_key_field")]
    pub key_field: String,
}

fn default_columns() -> Vec<String> {
    ["StudentID", "Name", "Year", "GPA", "PhoneNumber", "Address"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_key_field() -> String {
    "StudentID".into()
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            key_field: default_key_field(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    10
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

fn default_sample_size() -> usize {
    5
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
        }
    }
}
