use std::fmt;

use serde::{Deserialize, Serialize};

/// File types accepted by read set import jobs
///
/// Only paired FASTQ files are grouped into read sets at the moment. Other types (BAM, CRAM,
/// uBAM) would need their own pairing rules.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceFileType {
    Fastq,
}

/// Recognised object key suffixes and their source file type
static FILE_SUFFIXES: [(&str, SourceFileType); 2] = [
    (".fq.gz", SourceFileType::Fastq),
    (".fastq.gz", SourceFileType::Fastq),
];

impl SourceFileType {
    /// Match an object key against the recognised suffixes
    pub fn from_key(key: &str) -> Option<SourceFileType> {
        FILE_SUFFIXES
            .iter()
            .find(|(suffix, _)| key.ends_with(suffix))
            .map(|(_, file_type)| *file_type)
    }
}

impl fmt::Display for SourceFileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceFileType::Fastq => write!(f, "FASTQ"),
        }
    }
}

/// First and second mate of a read set
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFiles {
    pub source1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source2: Option<String>,
}

/// One read set in an import job's `sources` list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub name: String,
    pub source_file_type: SourceFileType,
    pub subject_id: String,
    pub sample_id: String,
    pub source_files: SourceFiles,
}
