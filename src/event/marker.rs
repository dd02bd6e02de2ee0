use std::path::Path;

use log::info;

use crate::event::notification::S3Event;

/// A directory to import, signalled by a marker file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPrefix {
    pub bucket: String,
    /// Parent directory of the marker file, with a trailing `/` unless it's the bucket root
    pub prefix: String,
}

/// Keep records created by marker files and return their parent directories
///
/// A sequencer writes the marker once a run directory is complete, so every other object in the
/// notification is ignored.
pub fn marker_prefixes(event: &S3Event, marker_filename: &str) -> Vec<ImportPrefix> {
    event
        .records
        .iter()
        .filter(|record| is_marker(&record.s3.object.key, marker_filename))
        .map(|record| {
            let key = &record.s3.object.key;
            let prefix = parent_prefix(key);
            info!(
                "Marker file s3://{}/{} found ({}), importing prefix '{}'",
                record.s3.bucket.name,
                key,
                record.event_name.as_deref().unwrap_or("unknown event"),
                prefix
            );
            ImportPrefix { bucket: record.s3.bucket.name.clone(), prefix }
        })
        .collect()
}

fn is_marker(key: &str, marker_filename: &str) -> bool {
    Path::new(key).file_name().map_or(false, |name| name == marker_filename)
}

/// `run/Lane1/progress.AWS` -> `run/Lane1/`, `progress.AWS` -> ``, `/progress.AWS` -> `/`
fn parent_prefix(key: &str) -> String {
    match Path::new(key).parent().and_then(|parent| parent.to_str()) {
        Some(parent) if parent.ends_with('/') => parent.to_string(),
        Some(parent) if !parent.is_empty() => format!("{parent}/"),
        _ => String::new(),
    }
}
