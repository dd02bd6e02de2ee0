use std::fs;
use std::path::Path;

use anyhow::Result;
use jsonschema::JSONSchema;
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::event::schema::load_schema;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("notification fails schema validation")]
    ValidationError,
    #[error("notification isn't valid JSON: {0}")]
    DecodeError(String),
    #[error("notification can't be deserialised: {0}")]
    DeserialisationError(String),
    #[error("can't read notification: {0}")]
    ReadError(String),
}

#[derive(Debug, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records")]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord {
    #[serde(default)]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct S3Object {
    pub key: String,
}

/// A validated notification
///
/// The untyped payload is kept because it's echoed back in the response.
#[derive(Debug)]
pub struct Notification {
    pub payload: Value,
    pub event: S3Event,
}

/// Reads S3 event notifications and validates them against the notification schema
pub struct EventReader {
    compiled_schema: JSONSchema,
}

impl EventReader {
    pub fn new() -> Result<EventReader> {
        Ok(EventReader { compiled_schema: load_schema()? })
    }

    pub fn read(&self, path: &Path) -> Result<Notification, EventError> {
        info!("Reading notification at {}", path.display());
        let json_string = fs::read_to_string(path).map_err(|err| {
            warn!("Can't read notification at path {}: {}", path.display(), err);
            EventError::ReadError(err.to_string())
        })?;
        self.parse(&json_string)
    }

    pub fn parse(&self, json_string: &str) -> Result<Notification, EventError> {
        let payload: Value = self.parse_untyped_json(json_string)?;

        match self.validate(&payload) {
            Ok(_) => {
                info!("Notification is valid");
                let event = self.parse_json(&payload)?;
                Ok(Notification { payload, event })
            }
            Err(err) => {
                warn!("Notification fails validation");
                Err(err)
            }
        }
    }

    fn validate(&self, json: &Value) -> Result<(), EventError> {
        info!("Validating notification against S3 event schema");
        self.compiled_schema.validate(json).map_err(|errors| {
            for err in errors {
                warn!("{} at {}", err, err.instance_path);
            }
            EventError::ValidationError
        })
    }

    fn parse_json(&self, value: &Value) -> Result<S3Event, EventError> {
        info!("Deserialising notification records");
        S3Event::deserialize(value).map_err(|err| EventError::DeserialisationError(err.to_string()))
    }

    fn parse_untyped_json(&self, json_string: &str) -> Result<Value, EventError> {
        info!("Parsing notification JSON");
        serde_json::from_str::<Value>(json_string).map_err(|err| EventError::DecodeError(err.to_string()))
    }
}
