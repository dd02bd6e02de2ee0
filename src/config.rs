//! Process-wide configuration, read once at startup

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use log::info;
use rusoto_core::Region;
use thiserror::Error;
use url::Url;

use crate::import::batch::{SubmitSettings, MAX_BATCH_LIMIT};
use crate::import::retry::RetryPolicy;
use crate::manifest::builder::NamingPolicy;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("can't parse a sequence store id from '{0}', expected arn:<partition>:omics:<region>:<account>:sequenceStore/<id>")]
    MalformedSequenceStoreArn(String),
    #[error("unknown AWS region '{0}'")]
    InvalidRegion(String),
}

/// Import paired FASTQ files into a HealthOmics sequence store when a marker file is uploaded
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Path to an S3 event notification (JSON)
    #[arg(short, long)]
    pub event: PathBuf,
    /// Object name that marks a directory as complete
    #[arg(long, env = "MARKER_FILENAME", default_value = "progress.AWS")]
    pub marker_filename: String,
    #[arg(long, env = "TARGET_SEQUENCE_STORE_ARN")]
    pub sequence_store_arn: String,
    /// Role the import job assumes to read from S3
    #[arg(long, env = "IMPORT_JOB_ROLE_ARN")]
    pub role_arn: String,
    /// Read sets per import job
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u16).range(1..=MAX_BATCH_LIMIT as i64))]
    pub batch_limit: u16,
    /// Minimum milliseconds between import job requests
    #[arg(long, default_value_t = 200)]
    pub pacing_ms: u64,
    /// Attempts per import job request, 1 disables retries
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub max_attempts: u32,
    /// Reject files that don't follow the <subject>_<sample>.R{1,2}.fq.gz naming convention
    #[arg(long)]
    pub strict_naming: bool,
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,
    /// Override the S3 endpoint (e.g. a local mock)
    #[arg(long)]
    pub s3_endpoint: Option<Url>,
    /// Override the HealthOmics endpoint
    #[arg(long)]
    pub omics_endpoint: Option<Url>,
    /// Build manifests and log them without starting import jobs
    #[arg(long)]
    pub dry_run: bool,
}

/// Target sequence store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceStore {
    pub arn: String,
    pub id: String,
}

impl SequenceStore {
    /// `arn:aws:omics:us-east-1:123456789012:sequenceStore/1234567890` -> `1234567890`
    pub fn from_arn(arn: &str) -> Result<SequenceStore, ConfigError> {
        let malformed = || ConfigError::MalformedSequenceStoreArn(arn.to_string());
        if !arn.starts_with("arn:") {
            return Err(malformed());
        }

        let id = arn.split('/').nth(1).filter(|id| !id.is_empty()).ok_or_else(malformed)?;
        Ok(SequenceStore { arn: arn.to_string(), id: id.to_string() })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub event_path: PathBuf,
    pub marker_filename: String,
    pub sequence_store: SequenceStore,
    pub submit: SubmitSettings,
    pub naming: NamingPolicy,
    pub s3_region: Region,
    pub omics_region: Region,
    pub dry_run: bool,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Config, ConfigError> {
        let sequence_store = SequenceStore::from_arn(&args.sequence_store_arn)?;
        info!("Target sequence store {} ({})", sequence_store.id, sequence_store.arn);

        let region = match &args.region {
            Some(name) => Region::from_str(name).map_err(|_| ConfigError::InvalidRegion(name.clone()))?,
            None => Region::default(),
        };

        let submit = SubmitSettings {
            sequence_store_id: sequence_store.id.clone(),
            role_arn: args.role_arn,
            batch_limit: usize::from(args.batch_limit),
            pacing: Duration::from_millis(args.pacing_ms),
            retry: RetryPolicy { max_attempts: args.max_attempts, ..Default::default() },
        };

        let naming = match args.strict_naming {
            true => NamingPolicy::Strict,
            false => NamingPolicy::Lenient,
        };

        Ok(Config {
            event_path: args.event,
            marker_filename: args.marker_filename,
            sequence_store,
            submit,
            naming,
            s3_region: with_endpoint(&region, args.s3_endpoint.as_ref()),
            omics_region: with_endpoint(&region, args.omics_endpoint.as_ref()),
            dry_run: args.dry_run,
        })
    }
}

fn with_endpoint(region: &Region, endpoint: Option<&Url>) -> Region {
    match endpoint {
        Some(url) => Region::Custom {
            name: region.name().to_string(),
            endpoint: url.as_str().trim_end_matches('/').to_string(),
        },
        None => region.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static STORE_ARN: &str = "arn:aws:omics:us-east-1:123456789012:sequenceStore/1234567890";
    static ROLE_ARN: &str = "arn:aws:iam::123456789012:role/importJobRole";

    fn parse(extra: &[&str]) -> Result<Config, ConfigError> {
        let mut argv = vec![
            "readset-importer",
            "--event",
            "event.json",
            "--sequence-store-arn",
            STORE_ARN,
            "--role-arn",
            ROLE_ARN,
            "--region",
            "us-east-1",
        ];
        argv.extend_from_slice(extra);
        Config::from_args(Args::parse_from(argv))
    }

    #[test]
    fn test_store_id_from_arn() {
        let store = SequenceStore::from_arn(STORE_ARN).unwrap();
        assert_eq!(store.id, "1234567890");
        assert_eq!(store.arn, STORE_ARN);
    }

    #[test]
    fn test_malformed_arns() {
        for arn in ["", "1234567890", "arn:aws:omics:us-east-1:123456789012:sequenceStore", "arn:aws:omics:x/"] {
            assert_eq!(
                SequenceStore::from_arn(arn),
                Err(ConfigError::MalformedSequenceStoreArn(arn.to_string()))
            );
        }
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.marker_filename, "progress.AWS");
        assert_eq!(config.sequence_store.id, "1234567890");
        assert_eq!(config.submit.sequence_store_id, "1234567890");
        assert_eq!(config.submit.role_arn, ROLE_ARN);
        assert_eq!(config.submit.batch_limit, 100);
        assert_eq!(config.submit.pacing, Duration::from_millis(200));
        assert_eq!(config.submit.retry.max_attempts, 3);
        assert_eq!(config.naming, NamingPolicy::Lenient);
        assert_eq!(config.s3_region, Region::UsEast1);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--batch-limit",
            "10",
            "--max-attempts",
            "1",
            "--strict-naming",
            "--omics-endpoint",
            "http://localhost:4566/",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(config.submit.batch_limit, 10);
        assert_eq!(config.submit.retry, RetryPolicy::none());
        assert_eq!(config.naming, NamingPolicy::Strict);
        assert_eq!(
            config.omics_region,
            Region::Custom { name: "us-east-1".to_string(), endpoint: "http://localhost:4566".to_string() }
        );
        assert_eq!(config.s3_region, Region::UsEast1);
        assert!(config.dry_run);
    }

    #[test]
    fn test_batch_limit_is_bounded() {
        let argv = |limit: &'static str| {
            [
                "readset-importer",
                "--event",
                "e.json",
                "--sequence-store-arn",
                STORE_ARN,
                "--role-arn",
                ROLE_ARN,
                "--batch-limit",
                limit,
            ]
        };
        assert!(Args::try_parse_from(argv("0")).is_err());
        assert!(Args::try_parse_from(argv("101")).is_err());
        assert!(Args::try_parse_from(argv("100")).is_ok());
    }

    #[test]
    fn test_bad_region() {
        let argv = [
            "readset-importer",
            "--event",
            "e.json",
            "--sequence-store-arn",
            STORE_ARN,
            "--role-arn",
            ROLE_ARN,
            "--region",
            "mars-north-1",
        ];
        let err = Config::from_args(Args::parse_from(argv)).unwrap_err();
        assert_eq!(err, ConfigError::InvalidRegion("mars-north-1".to_string()));
    }
}
