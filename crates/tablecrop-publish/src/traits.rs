// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The publishing seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tablecrop_core::error::Result;

/// Where a published file ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedArtifact {
    pub filename: String,
    /// Publicly reachable location of the file.
    pub url: String,
    /// SHA-256 of the published bytes, lowercase hex.
    pub sha256: String,
    /// Size in bytes.
    pub bytes: usize,
    pub published_at: DateTime<Utc>,
}

/// Stores encoded output and returns a URL for it.
///
/// Implementations must be usable from several requests at once.
pub trait Publisher: Send + Sync {
    /// Human-readable backend name for logs (e.g. "local directory").
    fn backend_name(&self) -> &str;

    /// Store `data` under `filename` and report where it can be fetched.
    fn publish(&self, filename: &str, data: &[u8], mime_type: &str) -> Result<PublishedArtifact>;
}
