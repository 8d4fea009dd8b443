//! On-disk files: the saved masking configuration and dataset dumps.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, RosterMaskError};
use crate::masking::export::{self, ExportFormat};
use crate::masking::Configuration;
use crate::record::Dataset;

/// Read a saved configuration. `None` if the file doesn't exist.
pub fn load_configuration(path: &Path) -> Result<Option<Configuration>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let config = export::import(&bytes, ExportFormat::Json, None).map_err(|e| {
        RosterMaskError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;
    Ok(Some(config))
}

/// Save a configuration in the JSON export format, fields in `schema` order.
pub fn save_configuration(path: &Path, config: &Configuration, schema: &[String]) -> Result<()> {
    let bytes = export::export(config, schema, ExportFormat::Json)?;
    write_atomic(path, &bytes)
}

/// Read a dataset from a JSON array file.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let contents = fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&contents)?;
    Ok(dataset)
}

/// Write a dataset as a pretty JSON array.
pub fn save_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    let json = serde_json::to_string_pretty(dataset)?;
    write_atomic(path, json.as_bytes())
}

/// Write to a temp file next to `path`, then rename over it.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masking::{FieldConfig, MaskingRule, SemanticType};
    use tempfile::TempDir;

    #[test]
    fn missing_config_is_none() {
        let tmp = TempDir::new().unwrap();
        let result = load_configuration(&tmp.path().join("masking.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn save_then_load_configuration() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("masking.json");
        let config: Configuration = [
            FieldConfig::new("Name", SemanticType::String, MaskingRule::Hash),
            FieldConfig::new("GPA", SemanticType::Number, MaskingRule::None),
        ]
        .into_iter()
        .collect();

        save_configuration(&path, &config, &[]).unwrap();
        let loaded = load_configuration(&path).unwrap().unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn disallowed_saved_rule_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("masking.json");
        fs::write(
            &path,
            r#"{"GPA": {"dataType": "number", "maskingRule": "partial"}}"#,
        )
        .unwrap();
        let err = load_configuration(&path).unwrap_err();
        assert!(matches!(err, RosterMaskError::ConfigParse { .. }));
    }
}
