// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tablecrop-publish — Hands encoded results to wherever they are hosted.
//
// The `Publisher` trait is the seam between the pipeline and storage. A
// local-directory implementation covers the CLI and tests; the stub stands in
// when no hosting is configured.

pub mod integrity;
pub mod local;
pub mod naming;
pub mod response;
pub mod stub;
pub mod traits;

pub use integrity::{hash_bytes, verify_hash};
pub use local::LocalPublisher;
pub use naming::{OutputKind, output_name, output_stem};
pub use response::{ArtifactLink, CropPreviewResponse, ErrorResponse, HealthResponse, SplitResponse};
pub use stub::StubPublisher;
pub use traits::{PublishedArtifact, Publisher};
