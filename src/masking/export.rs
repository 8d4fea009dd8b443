//! Portable serialization of a masking configuration.
//!
//! JSON carries `{ field: { dataType, maskingRule } }`; CSV carries the two
//! columns `Field,Masking Rule`. Both enumerate fields in configuration order,
//! which is the schema order for inferred configurations.

use std::fmt;

use super::store::ConfigStore;
use super::{Configuration, MaskingRule};
use crate::error::{Result, RosterMaskError};

const CSV_HEADER: [&str; 2] = ["Field", "Masking Rule"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// File name used when the caller does not choose one.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "masking_config.json",
            ExportFormat::Csv => "masking_config.csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(format!("unknown export format: {s}")),
        }
    }
}

/// Serialize `config` in the chosen format, fields in `schema` order. Fields
/// the schema doesn't name follow in their configured order.
pub fn export(config: &Configuration, schema: &[String], format: ExportFormat) -> Result<Vec<u8>> {
    let mut config = config.clone();
    config.reorder(schema);
    match format {
        ExportFormat::Json => {
            let mut bytes = serde_json::to_vec_pretty(&config)?;
            bytes.push(b'\n');
            Ok(bytes)
        }
        ExportFormat::Csv => {
            let mut out = String::new();
            push_csv_row(&mut out, &CSV_HEADER);
            for entry in config.iter() {
                let rule = entry.masking_rule.to_string();
                push_csv_row(&mut out, &[entry.field.as_str(), rule.as_str()]);
            }
            Ok(out.into_bytes())
        }
    }
}

/// Parse an exported configuration.
///
/// JSON stands on its own. CSV has no type column, so its rules are applied
/// onto `base` and every row must name a field `base` knows about.
pub fn import(bytes: &[u8], format: ExportFormat, base: Option<&Configuration>) -> Result<Configuration> {
    match format {
        ExportFormat::Json => {
            let config: Configuration = serde_json::from_slice(bytes)?;
            config.validate()?;
            Ok(config)
        }
        ExportFormat::Csv => {
            let base = base.ok_or_else(|| RosterMaskError::InvalidExport {
                reason: "csv import needs a base configuration for field types".into(),
            })?;
            let text = std::str::from_utf8(bytes).map_err(|e| RosterMaskError::InvalidExport {
                reason: format!("csv is not valid utf-8: {e}"),
            })?;

            let mut store = ConfigStore::new(base.clone());
            let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

            match lines.next() {
                Some((_, header)) if parse_csv_row(header)? == CSV_HEADER => {}
                _ => {
                    return Err(RosterMaskError::InvalidExport {
                        reason: format!("csv header must be '{}'", CSV_HEADER.join(",")),
                    })
                }
            }

            for (line_num, line) in lines {
                let row = parse_csv_row(line)?;
                let [field, rule] = row.as_slice() else {
                    return Err(RosterMaskError::InvalidExport {
                        reason: format!("line {}: expected 2 columns, got {}", line_num + 1, row.len()),
                    });
                };
                let rule: MaskingRule = rule.parse().map_err(|e| RosterMaskError::InvalidExport {
                    reason: format!("line {}: {}", line_num + 1, e),
                })?;
                store.set_rule(field, rule)?;
            }
            Ok(store.snapshot())
        }
    }
}

fn push_csv_row(out: &mut String, cells: &[&str]) {
    let row: Vec<String> = cells.iter().map(|c| quote_csv(c)).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

fn quote_csv(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Split one CSV line. Quoted cells may contain commas and doubled quotes.
fn parse_csv_row(line: &str) -> Result<Vec<String>> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if cell.is_empty() => in_quotes = true,
            (',', false) => cells.push(std::mem::take(&mut cell)),
            (c, _) => cell.push(c),
        }
    }
    if in_quotes {
        return Err(RosterMaskError::InvalidExport {
            reason: format!("unterminated quote in csv line: {line}"),
        });
    }
    cells.push(cell);
    Ok(cells)
}
