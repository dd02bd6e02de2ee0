use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::manifest::entry::ManifestEntry;

/// Body of a `StartReadSetImportJob` call
///
/// The sequence store id is part of the request path, not the body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartReadSetImportJobRequest<'a> {
    #[serde(skip)]
    pub sequence_store_id: &'a str,
    pub role_arn: &'a str,
    pub sources: &'a [ManifestEntry],
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartReadSetImportJobResponse {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Error)]
pub enum ImportJobError {
    #[error("import job request throttled: {0}")]
    Throttled(String),
    #[error("import job service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("import job request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("can't reach import job service: {0}")]
    Transport(String),
    #[error("can't sign import job request: {0}")]
    Credentials(String),
    #[error("can't encode or decode import job payload: {0}")]
    Payload(String),
}

impl ImportJobError {
    /// Classify a failed HTTP response
    pub fn from_status(status: u16, body: &str) -> ImportJobError {
        let message = body.to_string();
        match status {
            429 => ImportJobError::Throttled(message),
            // throttling is sometimes reported as a plain 400 with the exception name in the body
            400 if body.contains("ThrottlingException") => ImportJobError::Throttled(message),
            500..=599 => ImportJobError::Service { status, message },
            _ => ImportJobError::Rejected { status, message },
        }
    }

    /// Throttling, server side and transport failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ImportJobError::Throttled(_) | ImportJobError::Service { .. } | ImportJobError::Transport(_)
        )
    }
}

/// Something that can start read set import jobs
#[async_trait]
pub trait ImportJobApi: Send + Sync {
    async fn start_read_set_import_job(
        &self,
        request: &StartReadSetImportJobRequest<'_>,
    ) -> Result<StartReadSetImportJobResponse, ImportJobError>;
}
