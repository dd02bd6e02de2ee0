use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::info;
use rusoto_core::request::{DispatchSignedRequest, HttpClient};
use rusoto_core::signature::SignedRequest;
use rusoto_core::Region;
use rusoto_credential::{DefaultCredentialsProvider, ProvideAwsCredentials};

use crate::import::api::{ImportJobApi, ImportJobError, StartReadSetImportJobRequest, StartReadSetImportJobResponse};

/// Signing name of the HealthOmics API
static SERVICE: &str = "omics";

/// Minimal HealthOmics client, only starts read set import jobs
///
/// There's no rusoto service crate for HealthOmics, so requests are signed and dispatched with
/// the rusoto_core building blocks that the generated clients use.
pub struct OmicsClient {
    region: Region,
    credentials: DefaultCredentialsProvider,
    dispatcher: HttpClient,
}

impl OmicsClient {
    pub fn new(region: Region) -> Result<OmicsClient> {
        let credentials = DefaultCredentialsProvider::new().context("Can't set up AWS credentials provider")?;
        let dispatcher = HttpClient::new().map_err(|err| anyhow!("Can't create HTTP client: {err}"))?;
        info!("HealthOmics client in region {}", region.name());
        Ok(OmicsClient { region, credentials, dispatcher })
    }
}

/// Read set import jobs are served from the storage control plane endpoint
///
/// Custom regions (e.g. local mocks) already carry their own endpoint.
fn control_plane_hostname(region: &Region) -> Option<String> {
    match region {
        Region::Custom { .. } => None,
        region => Some(format!("control-storage-omics.{}.amazonaws.com", region.name())),
    }
}

#[async_trait]
impl ImportJobApi for OmicsClient {
    async fn start_read_set_import_job(
        &self,
        request: &StartReadSetImportJobRequest<'_>,
    ) -> Result<StartReadSetImportJobResponse, ImportJobError> {
        let path = format!("/sequencestore/{}/importjob", request.sequence_store_id);
        let payload = serde_json::to_vec(request).map_err(|err| ImportJobError::Payload(err.to_string()))?;

        let mut signed = SignedRequest::new("POST", SERVICE, &self.region, &path);
        signed.set_hostname(control_plane_hostname(&self.region));
        signed.set_content_type("application/json".to_owned());
        signed.set_payload(Some(payload));

        let credentials = self
            .credentials
            .credentials()
            .await
            .map_err(|err| ImportJobError::Credentials(err.to_string()))?;
        signed.sign(&credentials);

        let response = self
            .dispatcher
            .dispatch(signed, None)
            .await
            .map_err(|err| ImportJobError::Transport(err.to_string()))?
            .buffer()
            .await
            .map_err(|err| ImportJobError::Transport(err.to_string()))?;

        if !response.status.is_success() {
            let body = String::from_utf8_lossy(&response.body);
            return Err(ImportJobError::from_status(response.status.as_u16(), &body));
        }

        serde_json::from_slice(&response.body).map_err(|err| ImportJobError::Payload(err.to_string()))
    }
}
