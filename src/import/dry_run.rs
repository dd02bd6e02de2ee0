use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use log::info;

use crate::import::api::{ImportJobApi, ImportJobError, StartReadSetImportJobRequest, StartReadSetImportJobResponse};

/// Logs import job requests instead of sending them
///
/// Returned job ids are `dry-run-<n>`, counting from 1.
#[derive(Debug, Default)]
pub struct DryRunJobApi {
    jobs: AtomicUsize,
}

#[async_trait]
impl ImportJobApi for DryRunJobApi {
    async fn start_read_set_import_job(
        &self,
        request: &StartReadSetImportJobRequest<'_>,
    ) -> Result<StartReadSetImportJobResponse, ImportJobError> {
        let n = self.jobs.fetch_add(1, Ordering::SeqCst) + 1;
        let sources = serde_json::to_string_pretty(request.sources)
            .map_err(|err| ImportJobError::Payload(err.to_string()))?;
        info!("--dry-run set, not starting import job into sequence store {}", request.sequence_store_id);
        info!("Import job sources: {sources}");

        Ok(StartReadSetImportJobResponse { id: format!("dry-run-{n}"), status: None })
    }
}
