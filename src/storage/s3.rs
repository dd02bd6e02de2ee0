use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use rusoto_core::Region;
use rusoto_s3::{ListObjectsV2Output, ListObjectsV2Request, S3Client, S3};

use crate::storage::ObjectLister;

pub struct S3Lister {
    client: S3Client,
}

impl S3Lister {
    pub fn new(region: Region) -> S3Lister {
        info!("S3 client in region {}", region.name());
        S3Lister { client: S3Client::new(region) }
    }
}

#[async_trait]
impl ObjectLister for S3Lister {
    /// Follows continuation tokens, ListObjectsV2 returns at most 1000 keys per page
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let request = ListObjectsV2Request {
                bucket: bucket.to_string(),
                prefix: Some(prefix.to_string()),
                continuation_token,
                ..Default::default()
            };

            let output = self
                .client
                .list_objects_v2(request)
                .await
                .with_context(|| format!("Can't list objects in s3://{bucket}/{prefix}"))?;

            let next = next_page(&output);
            let page = output.contents.unwrap_or_default();
            info!("Listed {} objects in s3://{bucket}/{prefix}", page.len());
            keys.extend(page.into_iter().filter_map(|object| object.key));

            match next {
                Some(token) => continuation_token = Some(token),
                None => break,
            }
        }

        Ok(keys)
    }
}

/// Continuation token for the next page, if there is one
fn next_page(output: &ListObjectsV2Output) -> Option<String> {
    match &output.next_continuation_token {
        Some(token) if output.is_truncated.unwrap_or(false) => Some(token.clone()),
        _ => None,
    }
}
