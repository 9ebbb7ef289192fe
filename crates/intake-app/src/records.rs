//! Parsing of storage-service notification documents.
//!
//! # Design
//! - The envelope must be well-formed; individual records may not be. A broken record is
//!   reported by index and its siblings still run.
//! - Keys are passed through exactly as delivered; decoding happens in the engine.

use intake_core::NotificationRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Records")]
    records: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    s3: StorageEntity,
}

#[derive(Debug, Deserialize)]
struct StorageEntity {
    bucket: BucketEntity,
    object: ObjectEntity,
}

#[derive(Debug, Deserialize)]
struct BucketEntity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ObjectEntity {
    key: String,
}

/// Record that could not be turned into a [`NotificationRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedRecord {
    /// Position of the record in the document.
    pub index: usize,
    /// Decoder message describing what was wrong.
    pub reason: String,
}

/// Records extracted from one notification document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBatch {
    /// Well-formed records in document order.
    pub records: Vec<NotificationRecord>,
    /// Records that were skipped.
    pub malformed: Vec<MalformedRecord>,
}

/// Parse a `{"Records": [...]}` notification document.
///
/// # Errors
///
/// Returns [`AppError::Records`] when the document is not JSON or has no `Records` array.
pub fn parse_records(document: &str) -> AppResult<ParsedBatch> {
    let envelope: Envelope = serde_json::from_str(document).map_err(|source| AppError::Records {
        reason: "invalid_envelope",
        source: Some(source),
    })?;

    let mut batch = ParsedBatch::default();
    for (index, raw) in envelope.records.into_iter().enumerate() {
        match serde_json::from_value::<EventRecord>(raw) {
            Ok(record) => batch.records.push(NotificationRecord::new(
                record.s3.bucket.name,
                record.s3.object.key,
            )),
            Err(err) => {
                warn!(index, error = %err, "skipping malformed notification record");
                batch.malformed.push(MalformedRecord {
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }
    Ok(batch)
}
