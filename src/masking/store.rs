use super::catalog::is_allowed;
use super::infer::infer;
use super::{Configuration, MaskingRule};
use crate::error::{Result, RosterMaskError};
use crate::record::Dataset;

/// Holds the masking configuration for the active dataset.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    config: Configuration,
}

impl ConfigStore {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }

    /// Build a store by inferring types from `dataset`.
    pub fn from_dataset(fields: &[String], dataset: &Dataset) -> Self {
        Self::new(infer(fields, dataset))
    }

    /// Change one field's rule. The field's type and every other field are
    /// left as they were. Disallowed rules are rejected, never coerced.
    pub fn set_rule(&mut self, field: &str, rule: MaskingRule) -> Result<()> {
        let entry = self
            .config
            .get_mut(field)
            .ok_or_else(|| RosterMaskError::UnknownField {
                field: field.to_string(),
            })?;

        if !is_allowed(entry.data_type, rule) {
            tracing::warn!(
                field,
                %rule,
                data_type = %entry.data_type,
                "rejected masking rule outside the allowed set"
            );
            return Err(RosterMaskError::InvalidRuleForType {
                field: field.to_string(),
                rule,
                data_type: entry.data_type,
            });
        }

        tracing::debug!(field, from = %entry.masking_rule, to = %rule, "masking rule changed");
        entry.masking_rule = rule;
        Ok(())
    }

    /// Discard the current configuration and infer a fresh one.
    pub fn reset(&mut self, fields: &[String], dataset: &Dataset) {
        self.config = infer(fields, dataset);
    }

    /// An owned copy of the current configuration.
    pub fn snapshot(&self) -> Configuration {
        self.config.clone()
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }
}
