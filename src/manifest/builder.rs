use std::collections::HashMap;

use log::{info, warn};

use crate::manifest::entry::{ManifestEntry, SourceFileType, SourceFiles};
use crate::manifest::key::{check_convention, derive_ids, derive_key, NamingError};

/// What to do with files that don't follow the paired FASTQ naming convention
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NamingPolicy {
    /// Keep the file as an unmerged entry with whatever ids could be parsed
    #[default]
    Lenient,
    /// Reject the file
    Strict,
}

/// Builds read set sources for paired FASTQ files
///
/// Entries are keyed by pairing key and kept in the order each key was first added. The index
/// map points into `entries`, so the order is part of the structure and doesn't depend on map
/// iteration order.
#[derive(Debug, Default)]
pub struct FastqManifest {
    index: HashMap<String, usize>,
    entries: Vec<ManifestEntry>,
    policy: NamingPolicy,
}

impl FastqManifest {
    pub fn new(policy: NamingPolicy) -> FastqManifest {
        FastqManifest { policy, ..Default::default() }
    }

    /// Add a file to the manifest
    ///
    /// The first file for a key becomes `source1`, any later file for the same key is written to
    /// `source2`. A third mate replaces the second one.
    pub fn add(&mut self, file: &str) -> Result<(), NamingError> {
        if let Err(err) = check_convention(file) {
            match self.policy {
                NamingPolicy::Strict => return Err(err),
                NamingPolicy::Lenient => warn!("{err}, adding as an unpaired read set"),
            }
        }

        let key = derive_key(file);
        match self.index.get(&key) {
            Some(&i) => {
                let sources = &mut self.entries[i].source_files;
                if let Some(previous) = &sources.source2 {
                    warn!("{key} already has a second mate {previous}, replacing with {file}");
                }
                sources.source2 = Some(file.to_string());
            }
            None => {
                let (subject_id, sample_id) = derive_ids(file);
                info!("New read set {key} (subject {subject_id}, sample {sample_id})");
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(ManifestEntry {
                    name: key,
                    source_file_type: SourceFileType::Fastq,
                    subject_id,
                    sample_id,
                    source_files: SourceFiles { source1: file.to_string(), source2: None },
                });
            }
        }

        Ok(())
    }

    /// Number of distinct read sets
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the builder, returning read sets in first-seen order
    pub fn finalize(self) -> Vec<ManifestEntry> {
        self.entries
    }
}
