//! Bulk batch orchestration
//!
//! Accepts a raw candidate list, deduplicates and prefilters it, creates a
//! `SavedList`, and fans the single-address pipeline out over a bounded
//! worker pool. The caller gets the list snapshot back immediately; the batch
//! runs out-of-band. One candidate's failure (including a panic) is isolated
//! at the per-item boundary and recorded as an invalid result; it never
//! aborts the batch.

use crate::{
    store::MemoryStore, validation_pipeline::EmailValidator, syntax, CheckReport, ListStatus,
    SavedList, Status, ValidationError, ValidationResult,
};

use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Read-only progress snapshot for one batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchProgress {
    pub list_id: Uuid,
    pub total: u32,
    pub processed: u32,
    pub valid: u32,
    pub invalid: u32,
    pub risky: u32,
    /// Completion percentage, rounded to 2 decimal places
    pub percentage: f64,
    pub status: ListStatus,
}

/// Orchestrator tying the pipeline, the store, and the worker pool together
pub struct BulkValidator {
    validator: Arc<EmailValidator>,
    store: Arc<MemoryStore>,
    concurrency: usize,
}

impl BulkValidator {
    pub fn new(validator: Arc<EmailValidator>, store: Arc<MemoryStore>, concurrency: usize) -> Self {
        Self {
            validator,
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Submit a raw, not-yet-deduplicated candidate list.
    ///
    /// Candidates are deduplicated case-insensitively (first spelling wins)
    /// and prefiltered through the syntax gate; `total_emails` is fixed from
    /// what survives. An empty survivor set fails fast with `EmptyBatch` and
    /// creates no list. Otherwise the `SavedList` snapshot is returned
    /// immediately and the batch executes out-of-band.
    pub fn submit(
        &self,
        candidates: Vec<String>,
        name: &str,
        tags: &str,
    ) -> Result<SavedList, ValidationError> {
        let emails = prefilter(candidates);

        if emails.is_empty() {
            warn!("batch '{}' rejected: no usable candidates", name);
            return Err(ValidationError::EmptyBatch);
        }

        let list = SavedList::new(name, tags, emails.len() as u32);
        let snapshot = list.clone();
        self.store.insert_list(list);

        info!(
            "batch '{}' ({}) accepted with {} candidates",
            name, snapshot.id, snapshot.total_emails
        );

        let validator = Arc::clone(&self.validator);
        let store = Arc::clone(&self.store);
        let concurrency = self.concurrency;
        let list_id = snapshot.id;
        tokio::spawn(drive_batch(
            Arc::clone(&self.store),
            list_id,
            run_batch(validator, store, list_id, emails, concurrency),
        ));

        Ok(snapshot)
    }

    /// Progress snapshot, computable at any time
    pub fn progress(&self, list_id: Uuid) -> Result<BatchProgress, ValidationError> {
        let list = self.store.get_list(list_id)?;
        let processed = list.processed();
        let percentage = if list.total_emails == 0 {
            0.0
        } else {
            (f64::from(processed) * 10_000.0 / f64::from(list.total_emails)).round() / 100.0
        };

        Ok(BatchProgress {
            list_id,
            total: list.total_emails,
            processed,
            valid: list.valid_emails,
            invalid: list.invalid_emails,
            risky: list.risky_emails,
            percentage,
            status: list.status,
        })
    }
}

/// Case-insensitive dedup (first spelling wins) plus syntax prefilter
fn prefilter(candidates: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| syntax::parse(c).is_some())
        .filter(|c| seen.insert(c.to_lowercase()))
        .collect()
}

/// Supervise one batch run. Per-item failures are already absorbed inside
/// `run_batch`; if the driver itself dies the list is marked failed so it is
/// never left looking permanently in-flight.
async fn drive_batch<F>(store: Arc<MemoryStore>, list_id: Uuid, batch: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    if let Err(e) = tokio::spawn(batch).await {
        warn!("batch {} driver crashed: {}", list_id, e);
        store.set_list_status(list_id, ListStatus::Failed);
    }
}

/// Fan the pipeline out over a bounded worker pool and finish the list
async fn run_batch(
    validator: Arc<EmailValidator>,
    store: Arc<MemoryStore>,
    list_id: Uuid,
    emails: Vec<String>,
    concurrency: usize,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut workers = JoinSet::new();

    for email in emails {
        let validator = Arc::clone(&validator);
        let store = Arc::clone(&store);
        let semaphore = Arc::clone(&semaphore);

        workers.spawn(async move {
            let _permit = semaphore.acquire_owned().await;

            // The pipeline runs in its own task so a panic is confined to
            // this item
            let item = {
                let validator = Arc::clone(&validator);
                let email = email.clone();
                tokio::spawn(async move { validator.validate(&email).await })
            };

            let result = match item.await {
                Ok(Ok(mut result)) => {
                    result.list_id = Some(list_id);
                    result
                }
                Ok(Err(err)) => {
                    warn!("candidate '{}' rejected during batch: {}", email, err);
                    failed_item(&email, list_id)
                }
                Err(join_err) => {
                    warn!("candidate '{}' crashed during batch: {}", email, join_err);
                    failed_item(&email, list_id)
                }
            };

            store.record_batch_result(result);
        });
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            // The inner task already isolated pipeline panics; a failure
            // here is a worker-shell bug worth logging, not propagating
            warn!("batch worker failed: {}", e);
        }
    }

    store.set_list_status(list_id, ListStatus::Completed);
    debug!("batch {} completed", list_id);
}

/// Invalid placeholder recorded when an item fails unexpectedly
fn failed_item(email: &str, list_id: Uuid) -> ValidationResult {
    ValidationResult {
        id: Uuid::new_v4(),
        email: email.to_string(),
        is_valid: false,
        score: 0,
        checks: CheckReport::all_failed(),
        status: Status::Invalid,
        suggestion: None,
        list_id: Some(list_id),
        created_at: Utc::now(),
    }
}
