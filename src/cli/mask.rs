use std::path::Path;

use crate::cli::{print_table, Context};
use crate::error::Result;
use crate::masking::infer;
use crate::state::ApplyStatus;
use crate::storage;

/// Preview masking on a small sample. Uses the saved configuration, or an
/// inferred one when nothing is saved.
pub async fn run_preview(ctx: &Context, sample_size: Option<usize>) -> Result<()> {
    let client = ctx.client()?;
    let config = match ctx.saved_config()? {
        Some(config) => config,
        None => {
            let records = client.service().list_records().await?;
            infer(&ctx.settings.schema.columns, &records)
        }
    };
    let sample_size = sample_size.unwrap_or(ctx.settings.preview.sample_size);

    let sample = client.preview_masking(&config, sample_size).await?;
    print_table(&ctx.settings.schema.columns, &sample);
    eprintln!("\n{} of {} requested record(s)", sample.len(), sample_size);
    Ok(())
}

/// Apply masking to the whole dataset, then print a page or write the result.
pub async fn run_mask(
    ctx: &Context,
    out: Option<&Path>,
    page: usize,
    page_size: Option<usize>,
) -> Result<()> {
    let client = ctx.client()?;
    let state = ctx.load_state(client.service().as_ref()).await?;

    let (pending, ticket) = state.begin_masking()?;
    eprintln!("roster-mask: applying masking to {} record(s)...", ticket.source.len());
    let result = client
        .apply_masking(&ticket.working, &ticket.source, &ticket.config)
        .await;
    let mut state = pending.apply_masking_result(ticket, result);

    if let ApplyStatus::Failed { reason } = state.status() {
        eprintln!("roster-mask: failed to apply masking: {}", reason);
        std::process::exit(1);
    }

    if let Some(path) = out {
        storage::save_dataset(path, state.dataset())?;
        eprintln!(
            "roster-mask: wrote {} masked record(s) to {}",
            state.dataset().len(),
            path.display()
        );
        return Ok(());
    }

    if let Some(size) = page_size {
        state = state.change_page_size(size);
    }
    state = state.change_page(page);
    print_table(state.fields(), state.visible());
    eprintln!(
        "\npage {} of {}",
        state.pager().current_page(),
        state.total_pages()
    );
    Ok(())
}
