use anyhow::{anyhow, Context, Result};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

/// included S3 event notification schema
static SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/s3_event.json"));

/// Compile the notification schema
///
/// The schema only has internal references, so no resolver is needed.
pub fn load_schema() -> Result<JSONSchema> {
    let schema: Value = serde_json::from_str(SCHEMA).context("Notification schema isn't valid JSON")?;
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|err| anyhow!("Can't compile notification schema: {err}"))
}
