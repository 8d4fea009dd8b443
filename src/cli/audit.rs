use crate::cli::{print_rows, Context};
use crate::error::Result;

/// Print the column schema the service reports.
pub async fn run_columns(ctx: &Context) -> Result<()> {
    let columns = ctx.service()?.columns().await?;
    for column in &columns {
        println!("{}", column);
    }
    let configured = &ctx.settings.schema.columns;
    if &columns != configured {
        tracing::warn!(?columns, ?configured, "service columns differ from configured schema");
    }
    Ok(())
}

pub async fn run_audit(ctx: &Context) -> Result<()> {
    let logs = ctx.service()?.audit_logs().await?;
    if logs.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    let headers = ["Timestamp", "User", "Action", "Table Affected"].map(String::from);
    let rows: Vec<Vec<String>> = logs
        .iter()
        .map(|entry| {
            vec![
                entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                entry.user_id.clone(),
                entry.action.clone(),
                entry.masked_table.clone(),
            ]
        })
        .collect();
    print_rows(&headers, &rows);
    Ok(())
}
