//! List uploaded objects that should be imported

use anyhow::Result;
use async_trait::async_trait;

/// List objects in a bucket with rusoto
pub mod s3;

/// Something that can list object keys under a prefix
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// All object keys under `prefix`, including nested "directories"
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;
}

/// Build the `s3://` URI that import jobs use to locate an object
///
/// The key is used as is, a leading `/` is part of the key.
pub fn as_s3_uri(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}
