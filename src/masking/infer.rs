use serde_json::Value;

use super::catalog::default_rule;
use super::{Configuration, FieldConfig, MaskingRule, SemanticType};
use crate::record::Dataset;

/// Number of leading records inspected per field.
pub const SAMPLE_WINDOW: usize = 5;

/// Infer a configuration for `fields` from the first [`SAMPLE_WINDOW`] records.
///
/// Per field, the first sampled value that looks numeric or boolean decides
/// the type; numeric is checked before boolean for the same value. Fields with
/// no such evidence are strings. An empty dataset gives every field
/// `string`/`none`.
pub fn infer(fields: &[String], dataset: &Dataset) -> Configuration {
    if dataset.is_empty() {
        return fields
            .iter()
            .map(|f| FieldConfig::new(f.clone(), SemanticType::String, MaskingRule::None))
            .collect();
    }

    let sample = &dataset[..dataset.len().min(SAMPLE_WINDOW)];
    fields
        .iter()
        .map(|field| {
            let data_type = sample
                .iter()
                .filter_map(|record| record.get(field))
                .find_map(evidence)
                .unwrap_or(SemanticType::String);
            tracing::debug!(field = %field, %data_type, "inferred field type");
            FieldConfig::new(field.clone(), data_type, default_rule(data_type))
        })
        .collect()
}

/// Type evidence carried by a single value, if any.
fn evidence(value: &Value) -> Option<SemanticType> {
    match value {
        Value::Null => None,
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map(|_| SemanticType::Number),
        Value::Bool(_) => Some(SemanticType::Boolean),
        Value::String(s) => {
            if is_finite_number(s) {
                Some(SemanticType::Number)
            } else if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
                Some(SemanticType::Boolean)
            } else {
                None
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn is_finite_number(s: &str) -> bool {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return false;
    }
    // f64 parsing accepts "inf" and "nan" spellings; both fail the finite check.
    trimmed.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}
