use std::path::Path;

use crate::cli::{print_rows, Context};
use crate::error::Result;
use crate::masking::{allowed_rules, infer, Configuration, ConfigStore, MaskingRule};
use crate::storage;

/// Infer a configuration from records and save it, replacing any edits.
pub async fn run_infer(ctx: &Context, records: Option<&Path>) -> Result<()> {
    let dataset = match records {
        Some(path) => storage::load_dataset(path)?,
        None => ctx.service()?.list_records().await?,
    };
    let config = infer(&ctx.settings.schema.columns, &dataset);

    let path = ctx.saved_config_path();
    storage::save_configuration(&path, &config, &ctx.settings.schema.columns)?;
    eprintln!(
        "roster-mask: inferred {} field(s) from {} record(s), saved to {}",
        config.len(),
        dataset.len(),
        path.display()
    );
    print_config(&config);
    Ok(())
}

pub async fn run_show(ctx: &Context) -> Result<()> {
    let config = require_saved(ctx)?;
    print_config(&config);
    Ok(())
}

/// Change one field's rule in the saved configuration.
pub async fn run_set(ctx: &Context, field: &str, rule: MaskingRule) -> Result<()> {
    let mut store = ConfigStore::new(require_saved(ctx)?);
    store.set_rule(field, rule)?;
    storage::save_configuration(
        &ctx.saved_config_path(),
        store.config(),
        &ctx.settings.schema.columns,
    )?;
    eprintln!("roster-mask: {} -> {}", field, rule);
    Ok(())
}

fn require_saved(ctx: &Context) -> Result<Configuration> {
    match ctx.saved_config()? {
        Some(config) => Ok(config),
        None => {
            eprintln!("roster-mask: no saved masking configuration; run `roster-mask infer` first");
            std::process::exit(1);
        }
    }
}

/// Print fields with their type, rule and the rule menu for that type.
pub fn print_config(config: &Configuration) {
    let headers = ["Field", "Data Type", "Masking Rule", "Allowed"].map(String::from);
    let rows: Vec<Vec<String>> = config
        .iter()
        .map(|entry| {
            let allowed: Vec<String> = allowed_rules(entry.data_type)
                .iter()
                .map(ToString::to_string)
                .collect();
            vec![
                entry.field.clone(),
                entry.data_type.to_string(),
                entry.masking_rule.to_string(),
                allowed.join("|"),
            ]
        })
        .collect();
    print_rows(&headers, &rows);
}
