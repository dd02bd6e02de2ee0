//! Turn one S3 event notification into read set import jobs

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::event::marker::{marker_prefixes, ImportPrefix};
use crate::event::notification::Notification;
use crate::import::api::ImportJobApi;
use crate::import::batch::{BatchSubmitter, ImportJobRecord};
use crate::manifest::builder::FastqManifest;
use crate::manifest::entry::{ManifestEntry, SourceFileType};
use crate::storage::{as_s3_uri, ObjectLister};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    /// JSON encoded [`ResponseBody`]
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseBody<'a> {
    pub event: &'a Value,
    #[serde(rename = "sequenceStore")]
    pub sequence_store: &'a str,
    pub import_job_ids: Vec<String>,
}

pub struct Handler<'a> {
    config: &'a Config,
    lister: &'a dyn ObjectLister,
    api: &'a dyn ImportJobApi,
}

impl<'a> Handler<'a> {
    pub fn new(config: &'a Config, lister: &'a dyn ObjectLister, api: &'a dyn ImportJobApi) -> Handler<'a> {
        Handler { config, lister, api }
    }

    /// Build one manifest per marker file, then start import jobs for each manifest in order
    ///
    /// All manifests are built before anything is submitted, so a listing or naming failure
    /// never leaves a notification half imported. A failed import job stops the invocation,
    /// jobs that already started are logged but not rolled back.
    pub async fn handle(&self, notification: &Notification) -> Result<Response> {
        let prefixes = marker_prefixes(&notification.event, &self.config.marker_filename);
        if prefixes.is_empty() {
            info!("No {} marker files in notification", self.config.marker_filename);
        }

        let mut manifests: Vec<Vec<ManifestEntry>> = Vec::with_capacity(prefixes.len());
        for prefix in &prefixes {
            manifests.push(self.get_import_manifest(prefix).await?);
        }

        let mut submitter = BatchSubmitter::new(self.api, &self.config.submit);
        let mut started: Vec<ImportJobRecord> = Vec::new();
        for (manifest, prefix) in manifests.iter().zip(&prefixes) {
            match submitter.submit(manifest).await {
                Ok(records) => started.extend(records),
                Err(err) => {
                    started.extend(err.submitted.iter().cloned());
                    for record in &started {
                        warn!(
                            "Import job {} ({} read sets) was started at {} before the failure",
                            record.id, record.read_sets, record.submitted_at
                        );
                    }
                    let ids: Vec<&str> = started.iter().map(|record| record.id.as_str()).collect();
                    return Err(err).with_context(|| {
                        format!(
                            "Importing s3://{}/{} failed, import jobs already started: {:?}",
                            prefix.bucket, prefix.prefix, ids
                        )
                    });
                }
            }
        }

        info!("Started {} read set import job(s)", started.len());
        let body = ResponseBody {
            event: &notification.payload,
            sequence_store: &self.config.sequence_store.arn,
            import_job_ids: started.into_iter().map(|record| record.id).collect(),
        };

        Ok(Response { status_code: 200, body: serde_json::to_string(&body)? })
    }

    /// List FASTQ files under a marker's directory and pair them into read sets
    pub async fn get_import_manifest(&self, prefix: &ImportPrefix) -> Result<Vec<ManifestEntry>> {
        let keys = self.lister.list_keys(&prefix.bucket, &prefix.prefix).await?;

        let mut manifest = FastqManifest::new(self.config.naming);
        for key in keys.iter().filter(|key| SourceFileType::from_key(key).is_some()) {
            let uri = as_s3_uri(&prefix.bucket, key);
            info!("Adding object to import manifest: {uri}");
            manifest
                .add(&uri)
                .with_context(|| format!("Can't build manifest for s3://{}/{}", prefix.bucket, prefix.prefix))?;
        }

        info!("Manifest for s3://{}/{} has {} read sets", prefix.bucket, prefix.prefix, manifest.count());
        Ok(manifest.finalize())
    }
}
