//! Checksummed snapshot envelope.
//!
//! The curation store persists its leads inside this envelope so a truncated
//! or hand-edited snapshot file is detected on load instead of silently
//! corrupting state. The checksum covers the serialized data string only.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedSnapshot {
    /// JSON-serialized payload.
    pub data: String,
    /// Hex SHA-256 of `data`.
    pub checksum: String,
    /// Envelope format version.
    pub version: u32,
}

const SNAPSHOT_VERSION: u32 = 1;

fn checksum_of(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

impl ValidatedSnapshot {
    pub fn new(data: String) -> Self {
        let checksum = checksum_of(&data);
        Self {
            data,
            checksum,
            version: SNAPSHOT_VERSION,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.version == SNAPSHOT_VERSION && checksum_of(&self.data) == self.checksum
    }

    /// Serializes the envelope itself to JSON.
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses an envelope and returns the inner data only when the checksum
    /// holds. Any parse or checksum failure yields `None`.
    pub fn deserialize_and_validate(raw: &str) -> Option<String> {
        let snapshot: ValidatedSnapshot = serde_json::from_str(raw).ok()?;
        if snapshot.is_valid() {
            Some(snapshot.data)
        } else {
            None
        }
    }
}
