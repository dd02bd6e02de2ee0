use std::slice::Chunks;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{info, warn};
use thiserror::Error;

use crate::import::api::{ImportJobApi, ImportJobError, StartReadSetImportJobRequest, StartReadSetImportJobResponse};
use crate::import::pacing::Pacer;
use crate::import::retry::RetryPolicy;
use crate::manifest::entry::ManifestEntry;

/// Hard limit on the number of sources in one read set import job
pub const MAX_BATCH_LIMIT: usize = 100;

/// Everything the submitter needs to know about the target and the API limits
#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub sequence_store_id: String,
    pub role_arn: String,
    /// Sources per import job, 1 to [`MAX_BATCH_LIMIT`]
    pub batch_limit: usize,
    pub pacing: Duration,
    pub retry: RetryPolicy,
}

/// A started import job
#[derive(Debug, Clone, PartialEq)]
pub struct ImportJobRecord {
    pub id: String,
    /// 0-based position of the batch in its manifest
    pub batch: usize,
    pub read_sets: usize,
    pub submitted_at: DateTime<Utc>,
}

/// An import job failed and the remaining batches of the manifest were abandoned
///
/// Jobs that already started are not rolled back, they're listed in `submitted`.
#[derive(Debug, Error)]
#[error("import job for batch {} of {} failed after {} job(s) started", .batch + 1, .batches, .submitted.len())]
pub struct SubmissionError {
    pub batch: usize,
    pub batches: usize,
    pub submitted: Vec<ImportJobRecord>,
    pub source: ImportJobError,
}

/// Split entries into consecutive batches of at most `limit` entries
///
/// Order is preserved and only the last batch can be shorter than `limit`. `limit` must be
/// greater than zero.
pub fn batches<T>(entries: &[T], limit: usize) -> Chunks<'_, T> {
    entries.chunks(limit)
}

/// Submits manifests as a sequence of paced, size-limited import jobs
///
/// One submitter should be used for a whole invocation so pacing also applies between
/// manifests.
pub struct BatchSubmitter<'a> {
    api: &'a dyn ImportJobApi,
    settings: &'a SubmitSettings,
    pacer: Pacer,
}

impl<'a> BatchSubmitter<'a> {
    pub fn new(api: &'a dyn ImportJobApi, settings: &'a SubmitSettings) -> BatchSubmitter<'a> {
        BatchSubmitter { api, settings, pacer: Pacer::new(settings.pacing) }
    }

    /// Start one import job per batch, in order
    ///
    /// Stops at the first batch that still fails after retrying.
    pub async fn submit(&mut self, entries: &[ManifestEntry]) -> Result<Vec<ImportJobRecord>, SubmissionError> {
        let n_batches = entries.len().div_ceil(self.settings.batch_limit);
        info!("Submitting {} read sets in {} import job(s)", entries.len(), n_batches);

        let mut submitted: Vec<ImportJobRecord> = Vec::with_capacity(n_batches);
        for (i, batch) in batches(entries, self.settings.batch_limit).enumerate() {
            match self.start_job(batch).await {
                Ok(response) => {
                    info!("Started read set import job {} ({}/{})", response.id, i + 1, n_batches);
                    submitted.push(ImportJobRecord {
                        id: response.id,
                        batch: i,
                        read_sets: batch.len(),
                        submitted_at: Utc::now(),
                    });
                }
                Err(source) => {
                    warn!("Import job for batch {}/{} failed, abandoning remaining batches", i + 1, n_batches);
                    return Err(SubmissionError { batch: i, batches: n_batches, submitted, source });
                }
            }
        }

        Ok(submitted)
    }

    async fn start_job(&mut self, sources: &[ManifestEntry]) -> Result<StartReadSetImportJobResponse, ImportJobError> {
        let request = StartReadSetImportJobRequest {
            sequence_store_id: &self.settings.sequence_store_id,
            role_arn: &self.settings.role_arn,
            sources,
        };

        let retry = &self.settings.retry;
        let mut attempt = 1;
        loop {
            self.pacer.ready().await;
            match self.api.start_read_set_import_job(&request).await {
                Ok(response) => return Ok(response),
                Err(err) if retry.should_retry(&err, attempt) => {
                    let delay = retry.backoff(attempt);
                    warn!("Attempt {attempt}/{} failed: {err}, retrying in {delay:?}", retry.max_attempts);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
