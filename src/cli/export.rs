use std::io::Write;
use std::path::Path;

use crate::cli::Context;
use crate::error::{Result, RosterMaskError};
use crate::masking::export::{export, import};
use crate::masking::ExportFormat;
use crate::storage;

/// Write the saved configuration to `out`, or stdout. A directory gets the
/// format's default file name.
pub async fn run_export(ctx: &Context, format: ExportFormat, out: Option<&Path>) -> Result<()> {
    let Some(config) = ctx.saved_config()? else {
        eprintln!("roster-mask: no saved masking configuration; run `roster-mask infer` first");
        std::process::exit(1);
    };
    let bytes = export(&config, &ctx.settings.schema.columns, format)?;

    match out {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(format.default_file_name())
            } else {
                path.to_path_buf()
            };
            storage::write_atomic(&path, &bytes)?;
            eprintln!(
                "roster-mask: exported {} field(s) as {} to {} (sha256 {})",
                config.len(),
                format,
                path.display(),
                config.fingerprint()
            );
        }
        None => std::io::stdout().write_all(&bytes)?,
    }
    Ok(())
}

/// Replace the saved configuration from an export file.
pub async fn run_import(ctx: &Context, file: &Path, format: Option<ExportFormat>) -> Result<()> {
    let format = match format {
        Some(format) => format,
        None => format_from_extension(file)?,
    };
    let bytes = std::fs::read(file)?;
    let base = ctx.saved_config()?;
    let config = import(&bytes, format, base.as_ref())?;

    storage::save_configuration(&ctx.saved_config_path(), &config, &ctx.settings.schema.columns)?;
    eprintln!(
        "roster-mask: imported {} field(s) from {}",
        config.len(),
        file.display()
    );
    Ok(())
}

fn format_from_extension(file: &Path) -> Result<ExportFormat> {
    file.extension()
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse().ok())
        .ok_or_else(|| RosterMaskError::InvalidExport {
            reason: format!("cannot tell the format of {}; pass --format", file.display()),
        })
}
