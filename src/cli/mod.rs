pub mod audit;
pub mod export;
pub mod mask;
pub mod records;
pub mod rules;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::{self, Settings};
use crate::error::Result;
use crate::masking::{Configuration, ExportFormat, MaskingClient, MaskingRule};
use crate::record::{display_value, Record};
use crate::service::{HttpMaskingService, MaskingService};
use crate::state::AppState;
use crate::storage;

#[derive(Parser)]
#[command(name = "roster-mask")]
#[command(about = "Configure and preview field-level masking of roster data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Masking service base URL (overrides config)
    #[arg(long, global = true, env = "ROSTER_MASK_URL")]
    pub url: Option<String>,

    /// Project directory holding `.roster-mask/` (default: current directory)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the service's column schema
    Columns,

    /// Record CRUD
    #[command(subcommand)]
    Records(RecordsCommands),

    /// Infer a masking configuration from records and save it
    Infer {
        /// Read records from a local JSON file instead of the service
        #[arg(long)]
        records: Option<PathBuf>,
    },

    /// View or edit the saved masking configuration
    #[command(subcommand)]
    Rules(RulesCommands),

    /// Export or import the masking configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Preview masking on a sample using the saved configuration
    Preview {
        #[arg(long)]
        sample_size: Option<usize>,
    },

    /// Apply masking to the full dataset
    Mask {
        /// Write the masked dataset as JSON instead of printing a page
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long, default_value = "1")]
        page: usize,

        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Print the service's audit log
    Audit,
}

#[derive(Subcommand)]
pub enum RecordsCommands {
    /// List records one page at a time
    List {
        #[arg(long, default_value = "1")]
        page: usize,

        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show one record
    Get { id: String },

    /// Create a record from a JSON object
    Create { json: String },

    /// Replace a record's fields from a JSON object
    Update { id: String, json: String },

    /// Delete a record
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// Show fields, types, rules and the rules each type allows
    Show,

    /// Set one field's masking rule
    Set { field: String, rule: MaskingRule },

    /// Discard edits and infer the configuration again
    Reset {
        #[arg(long)]
        records: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the configuration as JSON or CSV
    Export {
        #[arg(long, default_value = "json")]
        format: ExportFormat,

        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace the saved configuration from an exported file
    Import {
        file: PathBuf,

        /// Defaults to the file extension
        #[arg(long)]
        format: Option<ExportFormat>,
    },
}

/// Resolved settings and paths for one invocation.
pub struct Context {
    pub root: PathBuf,
    pub settings: Settings,
}

impl Context {
    pub fn load(project_dir: Option<PathBuf>, url: Option<String>) -> Result<Self> {
        let root = match project_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let mut settings = Settings::load_project(&root)?;
        if let Some(url) = url {
            settings.service.base_url = url;
        }
        Ok(Self { root, settings })
    }

    pub fn saved_config_path(&self) -> PathBuf {
        config::saved_config_path(&self.root)
    }

    pub fn service(&self) -> Result<Arc<dyn MaskingService>> {
        Ok(Arc::new(HttpMaskingService::new(&self.settings.service)?))
    }

    pub fn client(&self) -> Result<MaskingClient> {
        Ok(MaskingClient::new(self.service()?))
    }

    /// Empty state for the configured schema.
    pub fn empty_state(&self) -> AppState {
        AppState::new(
            self.settings.schema.columns.clone(),
            self.settings.schema.key_field.clone(),
            self.settings.view.page_size,
        )
    }

    pub fn saved_config(&self) -> Result<Option<Configuration>> {
        storage::load_configuration(&self.saved_config_path())
    }

    /// Fetch records and apply the saved configuration if there is one.
    pub async fn load_state(&self, service: &dyn MaskingService) -> Result<AppState> {
        let records = service.list_records().await?;
        let state = self.empty_state().load_dataset(records);
        match self.saved_config()? {
            Some(config) => state.with_config(config),
            None => Ok(state),
        }
    }
}

/// Print records as an aligned text table.
pub fn print_table(fields: &[String], records: &[Record]) {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| fields.iter().map(|f| display_value(r.get(f))).collect())
        .collect();
    print_rows(fields, &rows);
}

pub(crate) fn print_rows(headers: &[String], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(headers).trim_end());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", rule.join("  "));
    for row in rows {
        println!("{}", line(row).trim_end());
    }
}
