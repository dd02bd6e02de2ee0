//! Start read set import jobs from finished manifests
//!
//! Manifests are split into batches of at most 100 sources (the service hard limit) and each
//! batch becomes one import job. Requests are paced to stay under 5 TPS and retried with backoff
//! when throttled.

/// The import job API seam and its error classification
pub mod api;
/// SigV4-signed HealthOmics client
pub mod omics;
/// Log requests instead of starting jobs (--dry-run)
pub mod dry_run;
pub mod pacing;
pub mod retry;
/// Chunk manifests and submit them in order
pub mod batch;
