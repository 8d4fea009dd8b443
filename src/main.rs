use anyhow::Result;
use clap::Parser;

use roster_mask::cli::{
    self, Cli, Commands, ConfigCommands, Context, RecordsCommands, RulesCommands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let ctx = Context::load(cli.project_dir, cli.url)?;

    match cli.command {
        Commands::Columns => cli::audit::run_columns(&ctx).await?,
        Commands::Records(cmd) => match cmd {
            RecordsCommands::List { page, page_size } => {
                cli::records::run_list(&ctx, page, page_size).await?
            }
            RecordsCommands::Get { id } => cli::records::run_get(&ctx, &id).await?,
            RecordsCommands::Create { json } => cli::records::run_create(&ctx, &json).await?,
            RecordsCommands::Update { id, json } => {
                cli::records::run_update(&ctx, &id, &json).await?
            }
            RecordsCommands::Delete { id } => cli::records::run_delete(&ctx, &id).await?,
        },
        Commands::Infer { records } => cli::rules::run_infer(&ctx, records.as_deref()).await?,
        Commands::Rules(cmd) => match cmd {
            RulesCommands::Show => cli::rules::run_show(&ctx).await?,
            RulesCommands::Set { field, rule } => cli::rules::run_set(&ctx, &field, rule).await?,
            RulesCommands::Reset { records } => {
                cli::rules::run_infer(&ctx, records.as_deref()).await?
            }
        },
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Export { format, out } => {
                cli::export::run_export(&ctx, format, out.as_deref()).await?
            }
            ConfigCommands::Import { file, format } => {
                cli::export::run_import(&ctx, &file, format).await?
            }
        },
        Commands::Preview { sample_size } => cli::mask::run_preview(&ctx, sample_size).await?,
        Commands::Mask {
            out,
            page,
            page_size,
        } => cli::mask::run_mask(&ctx, out.as_deref(), page, page_size).await?,
        Commands::Audit => cli::audit::run_audit(&ctx).await?,
    }

    Ok(())
}
