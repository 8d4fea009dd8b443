//! Application state for the masking workflow.
//!
//! Every transition borrows the current state and returns the next one, so a
//! failed transition leaves the caller holding the state it started from.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, RosterMaskError};
use crate::masking::{ConfigStore, Configuration, MaskingRule};
use crate::record::{record_key, Dataset, Record};
use crate::view::Pager;

/// Progress of the apply call. `Pending` doubles as the busy indicator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ApplyStatus {
    #[default]
    Idle,
    Pending,
    Failed {
        reason: String,
    },
}

/// Identity of one loaded row, unique across every dataset load in the process.
/// Record keys can repeat or be masked, so rows are tracked by this instead.
type RowId = u64;

static NEXT_ROW_ID: AtomicU64 = AtomicU64::new(1);

fn fresh_row_ids(len: usize) -> Vec<RowId> {
    let start = NEXT_ROW_ID.fetch_add(len as u64, Ordering::Relaxed);
    (start..start + len as u64).collect()
}

/// What was sent with an apply call, captured by [`AppState::begin_masking`].
#[derive(Debug, Clone)]
pub struct ApplyTicket {
    pub config: Configuration,
    pub working: Dataset,
    pub source: Dataset,
    sent_rows: Vec<RowId>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    fields: Vec<String>,
    key_field: String,
    source: Dataset,
    working: Dataset,
    rows: Vec<RowId>,
    store: ConfigStore,
    pager: Pager,
    status: ApplyStatus,
}

impl AppState {
    /// An empty state for the given schema.
    pub fn new(fields: Vec<String>, key_field: impl Into<String>, page_size: usize) -> Self {
        let store = ConfigStore::from_dataset(&fields, &Dataset::new());
        Self {
            fields,
            key_field: key_field.into(),
            source: Dataset::new(),
            working: Dataset::new(),
            rows: Vec::new(),
            store,
            pager: Pager::new(page_size),
            status: ApplyStatus::Idle,
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// The records as fetched, never masked.
    pub fn source(&self) -> &Dataset {
        &self.source
    }

    /// The records on display, masked once an apply succeeds.
    pub fn dataset(&self) -> &Dataset {
        &self.working
    }

    pub fn config(&self) -> &Configuration {
        self.store.config()
    }

    pub fn pager(&self) -> Pager {
        self.pager
    }

    pub fn status(&self) -> &ApplyStatus {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status == ApplyStatus::Pending
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.working.len())
    }

    /// Records on the current page.
    pub fn visible(&self) -> &[Record] {
        self.pager.slice(&self.working)
    }

    /// Replace both datasets with a fresh fetch and re-infer the configuration.
    pub fn load_dataset(&self, dataset: Dataset) -> Self {
        let mut next = self.clone();
        next.store.reset(&next.fields, &dataset);
        next.rows = fresh_row_ids(dataset.len());
        next.source = dataset.clone();
        next.working = dataset;
        next.pager.clamp(next.working.len());
        if next.status != ApplyStatus::Pending {
            next.status = ApplyStatus::Idle;
        }
        tracing::info!(records = next.working.len(), "dataset loaded");
        next
    }

    /// Replace the configuration with one loaded from elsewhere, such as a
    /// saved export. It must pass the rule catalog.
    pub fn with_config(&self, mut config: Configuration) -> Result<Self> {
        config.validate()?;
        config.reorder(&self.fields);
        let mut next = self.clone();
        next.store = ConfigStore::new(config);
        Ok(next)
    }

    pub fn apply_config_edit(&self, field: &str, rule: MaskingRule) -> Result<Self> {
        let mut next = self.clone();
        next.store.set_rule(field, rule)?;
        Ok(next)
    }

    /// Mark an apply call as pending and capture what it should send.
    /// Later edits only affect the next call.
    pub fn begin_masking(&self) -> Result<(Self, ApplyTicket)> {
        if self.is_busy() {
            return Err(RosterMaskError::MaskingInFlight);
        }
        let ticket = ApplyTicket {
            config: self.store.snapshot(),
            working: self.working.clone(),
            source: self.source.clone(),
            sent_rows: self.rows.clone(),
        };
        let mut next = self.clone();
        next.status = ApplyStatus::Pending;
        Ok((next, ticket))
    }

    /// Fold an apply outcome into the state.
    ///
    /// Masked records are matched to current rows through the rows they were
    /// produced from, so rows deleted while the call was pending are dropped
    /// rather than brought back. A current row with no masked counterpart
    /// fails the whole result. A failure leaves the data as it was and records
    /// the reason.
    pub fn apply_masking_result(&self, ticket: ApplyTicket, result: Result<Dataset>) -> Self {
        let mut next = self.clone();
        let masked = match result {
            Ok(masked) => masked,
            Err(e) => {
                tracing::warn!(error = %e, "masking not applied");
                next.status = ApplyStatus::Failed {
                    reason: e.to_string(),
                };
                return next;
            }
        };

        match reconcile(&self.rows, ticket.sent_rows, masked) {
            Ok(working) => {
                next.working = working;
                next.pager.clamp(next.working.len());
                next.status = ApplyStatus::Idle;
            }
            Err(reason) => {
                tracing::warn!(%reason, "masking result discarded");
                next.status = ApplyStatus::Failed { reason };
            }
        }
        next
    }

    /// Drop every row whose source record has `key`, from the source and the
    /// view alike. The source is matched because the view may show a masked key.
    pub fn remove_record(&self, key: &str) -> Self {
        let mut next = self.clone();
        let doomed: Vec<bool> = self
            .source
            .iter()
            .map(|r| record_key(r, &self.key_field).as_deref() == Some(key))
            .collect();

        let keep = |idx: usize| !doomed.get(idx).copied().unwrap_or(false);
        next.source = retain_by_index(&self.source, keep);
        next.working = retain_by_index(&self.working, keep);
        next.rows = retain_by_index(&self.rows, keep);
        next.pager.clamp(next.working.len());
        next
    }

    pub fn change_page(&self, page: usize) -> Self {
        let mut next = self.clone();
        next.pager.go_to(page, next.working.len());
        next
    }

    pub fn change_page_size(&self, page_size: usize) -> Self {
        let mut next = self.clone();
        next.pager.set_page_size(page_size);
        next
    }
}

fn retain_by_index<T: Clone>(items: &[T], keep: impl Fn(usize) -> bool) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(idx, _)| keep(*idx))
        .map(|(_, item)| item.clone())
        .collect()
}

/// Build the new working dataset from a masked response.
///
/// `sent` pairs with `masked` by position. Each current row takes the masked
/// record produced from it and keeps its current order.
fn reconcile(
    current: &[RowId],
    sent: Vec<RowId>,
    masked: Dataset,
) -> std::result::Result<Dataset, String> {
    if sent.len() != masked.len() {
        return Err(format!(
            "sent {} records but received {}",
            sent.len(),
            masked.len()
        ));
    }

    let mut by_row: HashMap<RowId, Record> = sent.into_iter().zip(masked).collect();
    current
        .iter()
        .map(|row| {
            by_row
                .remove(row)
                .ok_or_else(|| "dataset changed while masking; apply again".to_string())
        })
        .collect()
}
