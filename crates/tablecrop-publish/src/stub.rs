// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub publisher for deployments without hosting configured.

use tablecrop_core::error::{Result, TablecropError};

use crate::traits::{PublishedArtifact, Publisher};

/// Refuses every upload.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubPublisher;

impl Publisher for StubPublisher {
    fn backend_name(&self) -> &str {
        "unconfigured (stub)"
    }

    fn publish(&self, filename: &str, _data: &[u8], _mime_type: &str) -> Result<PublishedArtifact> {
        tracing::warn!(filename, "Publisher::publish called on stub publisher");
        Err(TablecropError::Publish(
            "no hosting backend is configured".into(),
        ))
    }
}
