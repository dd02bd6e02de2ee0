//! Group paired FASTQ files into read set sources
//!
//! Mates are paired by file name: `/runid/Lane1/flowcellid_sampleid.R{1,2}.fq.gz`. The
//! flowcell id is used as the subject id.

/// Derive pairing keys and subject / sample ids from file names
pub mod key;
/// Read set sources, serialised the way the import job API expects them
pub mod entry;
/// Accumulate files into an insertion-ordered manifest
pub mod builder;
