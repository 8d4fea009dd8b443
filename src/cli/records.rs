use crate::cli::{print_table, Context};
use crate::error::{Result, RosterMaskError};
use crate::record::Record;

/// Print one page of records.
pub async fn run_list(ctx: &Context, page: usize, page_size: Option<usize>) -> Result<()> {
    let service = ctx.service()?;
    let mut state = ctx.load_state(service.as_ref()).await?;
    if let Some(size) = page_size {
        state = state.change_page_size(size);
    }
    state = state.change_page(page);

    print_table(state.fields(), state.visible());
    eprintln!(
        "\npage {} of {} ({} record(s))",
        state.pager().current_page(),
        state.total_pages(),
        state.dataset().len()
    );
    Ok(())
}

pub async fn run_get(ctx: &Context, id: &str) -> Result<()> {
    let record = ctx.service()?.get_record(id).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

pub async fn run_create(ctx: &Context, json: &str) -> Result<()> {
    let record = parse_record(json)?;
    ctx.service()?.create_record(&record).await?;
    eprintln!("roster-mask: record created");
    Ok(())
}

pub async fn run_update(ctx: &Context, id: &str, json: &str) -> Result<()> {
    let record = parse_record(json)?;
    ctx.service()?.update_record(id, &record).await?;
    eprintln!("roster-mask: record {} updated", id);
    Ok(())
}

pub async fn run_delete(ctx: &Context, id: &str) -> Result<()> {
    ctx.service()?.delete_record(id).await?;
    eprintln!("roster-mask: record {} deleted", id);
    Ok(())
}

fn parse_record(json: &str) -> Result<Record> {
    match serde_json::from_str::<serde_json::Value>(json)? {
        serde_json::Value::Object(record) => Ok(record),
        other => Err(RosterMaskError::InvalidRecord {
            reason: format!("expected a JSON object, got {}", other),
        }),
    }
}
