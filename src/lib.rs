//! Import paired FASTQ uploads into a HealthOmics sequence store
//!
//! A sequencer uploads a run directory to S3 and writes a marker file when it's done. The
//! marker's notification triggers one invocation: FASTQ files under the marker's directory are
//! paired into read sets by name and submitted as read set import jobs of at most 100 sources.

pub mod config;
pub mod event;
pub mod handler;
pub mod import;
pub mod manifest;
pub mod storage;
