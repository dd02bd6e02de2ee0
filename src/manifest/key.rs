use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    /// `<stem>.R{1,2}<ext>`, e.g. `/runid/Lane1/flowcellid_sampleid.R1.fq.gz`
    static ref FASTQ_FILE_REGEX: Regex = Regex::new(r"(.+)\.R[12](\..+)").unwrap();
}

/// A file that doesn't follow the `<subject>_<sample>.R{1,2}<ext>` naming convention
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    #[error("{0} has no .R1 / .R2 read number token")]
    MissingReadNumber(String),
    #[error("{0} doesn't have a <subject>_<sample> file name")]
    MissingSampleId(String),
}

/// Derive the key shared by both mates of a pair
///
/// The read number token is erased but the directory and file extension are kept, so
/// `/run/Lane1/fc_s1.R1.fq.gz` and `/run/Lane1/fc_s1.R2.fq.gz` both become
/// `/run/Lane1/fc_s1.fq.gz`. Files without a read number token are returned unchanged.
pub fn derive_key(file: &str) -> String {
    FASTQ_FILE_REGEX.replace(file, "${1}${2}").into_owned()
}

/// Parse subject and sample ids from the base file name
///
/// The flowcell id is used as the subject id. Extra `_` delimited tokens are discarded and a
/// missing sample token gives an empty sample id.
pub fn derive_ids(file: &str) -> (String, String) {
    let stem = file_stem(file);
    let mut tokens = stem.split('_');
    let subject_id = tokens.next().unwrap_or_default().to_string();
    let sample_id = tokens.next().unwrap_or_default().to_string();
    (subject_id, sample_id)
}

/// Check a file name against the paired FASTQ naming convention
pub fn check_convention(file: &str) -> Result<(), NamingError> {
    let name = base_name(file);
    if !FASTQ_FILE_REGEX.is_match(name) {
        return Err(NamingError::MissingReadNumber(file.to_string()));
    }

    let (_, sample_id) = derive_ids(file);
    if sample_id.is_empty() {
        return Err(NamingError::MissingSampleId(file.to_string()));
    }

    Ok(())
}

/// Base file name with the read number token and extension removed
fn file_stem(file: &str) -> String {
    FASTQ_FILE_REGEX.replace(base_name(file), "${1}").into_owned()
}

fn base_name(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}
