pub mod catalog;
pub mod export;
pub mod infer;
pub mod invoke;
pub mod store;

pub use catalog::{allowed_rules, default_rule, is_allowed};
pub use export::ExportFormat;
pub use infer::infer;
pub use invoke::MaskingClient;
pub use store::ConfigStore;

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, RosterMaskError};

/// The semantic type inferred for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    String,
    Number,
    Boolean,
}

/// Named transformation executed by the masking service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskingRule {
    None,
    Partial,
    Generalized,
    Hash,
    Faker,
}

impl MaskingRule {
    /// Rules that produce the same output for the same input on every call.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, MaskingRule::Faker)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::String => write!(f, "string"),
            SemanticType::Number => write!(f, "number"),
            SemanticType::Boolean => write!(f, "boolean"),
        }
    }
}

impl fmt::Display for MaskingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskingRule::None => write!(f, "none"),
            MaskingRule::Partial => write!(f, "partial"),
            MaskingRule::Generalized => write!(f, "generalized"),
            MaskingRule::Hash => write!(f, "hash"),
            MaskingRule::Faker => write!(f, "faker"),
        }
    }
}

impl std::str::FromStr for SemanticType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" => Ok(SemanticType::String),
            "number" => Ok(SemanticType::Number),
            "boolean" => Ok(SemanticType::Boolean),
            _ => Err(format!("unknown data type: {s}")),
        }
    }
}

impl std::str::FromStr for MaskingRule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(MaskingRule::None),
            "partial" => Ok(MaskingRule::Partial),
            "generalized" => Ok(MaskingRule::Generalized),
            "hash" => Ok(MaskingRule::Hash),
            "faker" => Ok(MaskingRule::Faker),
            _ => Err(format!("unknown masking rule: {s}")),
        }
    }
}

/// Type and chosen rule for one field.
///
/// On the wire the field name is the map key, so it is skipped here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    #[serde(skip)]
    pub field: String,
    pub data_type: SemanticType,
    pub masking_rule: MaskingRule,
}

impl FieldConfig {
    pub fn new(field: impl Into<String>, data_type: SemanticType, masking_rule: MaskingRule) -> Self {
        Self {
            field: field.into(),
            data_type,
            masking_rule,
        }
    }
}

/// Field name to [`FieldConfig`], keyed uniquely by field.
///
/// Entries keep the order they were inserted in, which is the schema order
/// when the configuration comes from [`infer`]. Serializes as a JSON object
/// `{ field: { dataType, maskingRule } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    entries: Vec<FieldConfig>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `config.field`. A replaced entry keeps
    /// its position.
    pub fn insert(&mut self, config: FieldConfig) {
        match self.entries.iter_mut().find(|e| e.field == config.field) {
            Some(existing) => *existing = config,
            None => self.entries.push(config),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldConfig> {
        self.entries.iter().find(|e| e.field == field)
    }

    pub(crate) fn get_mut(&mut self, field: &str) -> Option<&mut FieldConfig> {
        self.entries.iter_mut().find(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldConfig> {
        self.entries.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.field.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reorder entries to follow `schema`. Fields not named in the schema
    /// keep their relative order after the schema fields.
    pub fn reorder(&mut self, schema: &[String]) {
        let rank = |field: &str| {
            schema
                .iter()
                .position(|s| s == field)
                .unwrap_or(schema.len())
        };
        self.entries.sort_by_key(|e| rank(&e.field));
    }

    /// Check every entry's rule against the catalog.
    pub fn validate(&self) -> Result<()> {
        for entry in &self.entries {
            if !is_allowed(entry.data_type, entry.masking_rule) {
                return Err(RosterMaskError::InvalidRuleForType {
                    field: entry.field.clone(),
                    rule: entry.masking_rule,
                    data_type: entry.data_type,
                });
            }
        }
        Ok(())
    }

    /// The `field -> rule` map sent with preview requests.
    pub fn rule_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.entries
            .iter()
            .map(|e| {
                (
                    e.field.clone(),
                    serde_json::Value::String(e.masking_rule.to_string()),
                )
            })
            .collect()
    }

    /// SHA-256 of the canonical JSON form, hex encoded.
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        format!("{:x}", Sha256::digest(&bytes))
    }
}

impl FromIterator<FieldConfig> for Configuration {
    fn from_iter<I: IntoIterator<Item = FieldConfig>>(iter: I) -> Self {
        let mut config = Configuration::new();
        for entry in iter {
            config.insert(entry);
        }
        config
    }
}

impl Serialize for Configuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.field, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Configuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ConfigurationVisitor;

        impl<'de> Visitor<'de> for ConfigurationVisitor {
            type Value = Configuration;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field name to {dataType, maskingRule}")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Configuration, A::Error> {
                let mut config = Configuration::new();
                while let Some((field, mut entry)) = access.next_entry::<String, FieldConfig>()? {
                    entry.field = field;
                    config.insert(entry);
                }
                Ok(config)
            }
        }

        deserializer.deserialize_map(ConfigurationVisitor)
    }
}
