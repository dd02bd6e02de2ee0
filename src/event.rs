//! Read S3 event notifications and find marker files

/// Validate and deserialise notifications
pub mod notification;
/// Embedded JSON schema for notifications
pub mod schema;
pub mod marker;
