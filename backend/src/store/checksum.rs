//! Content hash behind every `DatasetVersion`.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the CSV bytes a snapshot was published from.
///
/// Two publishes of byte-identical files report the same checksum, which is how
/// clients of `GET /v1/dataset` tell a re-upload from a changed dataset.
pub fn calculate_checksum(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}
