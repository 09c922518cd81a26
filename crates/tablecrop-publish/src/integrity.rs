// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content fingerprints for published artifacts.

use sha2::{Digest, Sha256};
use tablecrop_core::error::{Result, TablecropError};

/// SHA-256 of `data` as lowercase hex.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Check `data` against an expected SHA-256 hex digest. A mismatch means the
/// stored copy differs from what was published.
pub fn verify_hash(data: &[u8], expected_hex: &str) -> Result<()> {
    let actual = hash_bytes(data);
    if actual.eq_ignore_ascii_case(expected_hex) {
        Ok(())
    } else {
        Err(TablecropError::Publish(format!(
            "stored content hash {actual} does not match {expected_hex}"
        )))
    }
}
