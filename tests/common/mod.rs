// Shared fakes for integration tests, not every test file uses every helper
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use rusoto_core::Region;
use tokio::time::Instant;

use readset_importer::config::{Config, SequenceStore};
use readset_importer::import::api::{ImportJobApi, ImportJobError, StartReadSetImportJobRequest, StartReadSetImportJobResponse};
use readset_importer::import::batch::SubmitSettings;
use readset_importer::import::retry::RetryPolicy;
use readset_importer::manifest::builder::NamingPolicy;
use readset_importer::manifest::entry::{ManifestEntry, SourceFileType, SourceFiles};
use readset_importer::storage::ObjectLister;

pub static STORE_ARN: &str = "arn:aws:omics:us-east-1:123456789012:sequenceStore/1234567890";
pub static STORE_ID: &str = "1234567890";
pub static ROLE_ARN: &str = "arn:aws:iam::123456789012:role/importJobRole";

/// A bucket held in memory
pub struct FakeLister {
    pub bucket: String,
    pub keys: Vec<String>,
}

impl FakeLister {
    pub fn new(bucket: &str, keys: &[&str]) -> FakeLister {
        FakeLister { bucket: bucket.to_string(), keys: keys.iter().map(|k| k.to_string()).collect() }
    }
}

#[async_trait]
impl ObjectLister for FakeLister {
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        if bucket != self.bucket {
            anyhow::bail!("NoSuchBucket: {bucket}");
        }
        Ok(self.keys.iter().filter(|key| key.starts_with(prefix)).cloned().collect())
    }
}

#[derive(Debug, Clone)]
pub struct Call {
    pub at: Instant,
    pub sequence_store_id: String,
    pub role_arn: String,
    pub sources: Vec<ManifestEntry>,
}

/// Records every request, fails according to a script
///
/// Each scripted `Some(err)` fails one call, `None` lets it succeed. Calls past the end of the
/// script succeed. Successful calls return `job-1`, `job-2`, ...
#[derive(Default)]
pub struct RecordingJobApi {
    pub calls: Mutex<Vec<Call>>,
    script: Mutex<VecDeque<Option<ImportJobError>>>,
    started: Mutex<usize>,
}

impl RecordingJobApi {
    pub fn new() -> RecordingJobApi {
        RecordingJobApi::default()
    }

    pub fn with_script(script: Vec<Option<ImportJobError>>) -> RecordingJobApi {
        RecordingJobApi { script: Mutex::new(script.into()), ..Default::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImportJobApi for RecordingJobApi {
    async fn start_read_set_import_job(
        &self,
        request: &StartReadSetImportJobRequest<'_>,
    ) -> Result<StartReadSetImportJobResponse, ImportJobError> {
        self.calls.lock().unwrap().push(Call {
            at: Instant::now(),
            sequence_store_id: request.sequence_store_id.to_string(),
            role_arn: request.role_arn.to_string(),
            sources: request.sources.to_vec(),
        });

        if let Some(Some(err)) = self.script.lock().unwrap().pop_front() {
            return Err(err);
        }

        let mut started = self.started.lock().unwrap();
        *started += 1;
        Ok(StartReadSetImportJobResponse { id: format!("job-{}", *started), status: Some("SUBMITTED".to_string()) })
    }
}

pub fn throttled() -> ImportJobError {
    ImportJobError::Throttled("Rate exceeded".to_string())
}

pub fn rejected() -> ImportJobError {
    ImportJobError::Rejected { status: 400, message: "ValidationException".to_string() }
}

/// Default limits, without jitter so backoff is predictable
pub fn settings() -> SubmitSettings {
    SubmitSettings {
        sequence_store_id: STORE_ID.to_string(),
        role_arn: ROLE_ARN.to_string(),
        batch_limit: 100,
        pacing: Duration::from_millis(200),
        retry: RetryPolicy { jitter: 0.0, ..Default::default() },
    }
}

pub fn config() -> Config {
    Config {
        event_path: PathBuf::from("event.json"),
        marker_filename: "progress.AWS".to_string(),
        sequence_store: SequenceStore::from_arn(STORE_ARN).unwrap(),
        submit: settings(),
        naming: NamingPolicy::Lenient,
        s3_region: Region::UsEast1,
        omics_region: Region::UsEast1,
        dry_run: false,
    }
}

/// A paired read set for sample `s<i>`
pub fn entry(i: usize) -> ManifestEntry {
    ManifestEntry {
        name: format!("s3://bucket/run/Lane1/fc_s{i}.fq.gz"),
        source_file_type: SourceFileType::Fastq,
        subject_id: "fc".to_string(),
        sample_id: format!("s{i}"),
        source_files: SourceFiles {
            source1: format!("s3://bucket/run/Lane1/fc_s{i}.R1.fq.gz"),
            source2: Some(format!("s3://bucket/run/Lane1/fc_s{i}.R2.fq.gz")),
        },
    }
}

/// An S3 event notification for objects created in one bucket
pub fn notification_json(bucket: &str, keys: &[&str]) -> String {
    let records: Vec<serde_json::Value> = keys
        .iter()
        .map(|key| {
            serde_json::json!({
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "awsRegion": "us-east-1",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": bucket, "arn": format!("arn:aws:s3:::{bucket}") },
                    "object": { "key": key, "size": 0 }
                }
            })
        })
        .collect();
    serde_json::json!({ "Records": records }).to_string()
}
