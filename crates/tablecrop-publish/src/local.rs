// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local-directory publisher: writes artifacts to disk and hands back file://
// URLs.

use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use tablecrop_core::error::{Result, TablecropError};
use tracing::{info, instrument};

use crate::integrity::{hash_bytes, verify_hash};
use crate::traits::{PublishedArtifact, Publisher};

/// Publishes into a single directory. Existing files with the same name are
/// replaced.
#[derive(Debug, Clone)]
pub struct LocalPublisher {
    root: PathBuf,
}

impl LocalPublisher {
    /// Use `root` as the output directory, creating it if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        std::fs::create_dir_all(root.as_ref())?;
        let root = root.as_ref().canonicalize()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Publisher for LocalPublisher {
    fn backend_name(&self) -> &str {
        "local directory"
    }

    #[instrument(skip(self, data), fields(bytes = data.len()))]
    fn publish(&self, filename: &str, data: &[u8], mime_type: &str) -> Result<PublishedArtifact> {
        check_filename(filename)?;

        let path = self.root.join(filename);
        std::fs::write(&path, data)?;

        let sha256 = hash_bytes(data);
        verify_hash(&std::fs::read(&path)?, &sha256)?;

        let url = format!("file://{}", path.display());
        info!(%url, "Artifact published");
        Ok(PublishedArtifact {
            filename: filename.to_owned(),
            url,
            sha256,
            bytes: data.len(),
            published_at: Utc::now(),
        })
    }
}

/// A published name must be one plain path component so it cannot escape the
/// output directory.
fn check_filename(filename: &str) -> Result<()> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(TablecropError::Publish(format!(
            "refusing to publish under the name {filename:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_file_and_reports_url() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = LocalPublisher::new(dir.path()).unwrap();

        let artifact = publisher
            .publish("receipt_preview.png", b"\x89PNG fake", "image/png")
            .unwrap();

        let stored = std::fs::read(publisher.root().join("receipt_preview.png")).unwrap();
        assert_eq!(stored, b"\x89PNG fake");
        assert_eq!(artifact.filename, "receipt_preview.png");
        assert_eq!(artifact.bytes, b"\x89PNG fake".len());
        assert_eq!(artifact.sha256, hash_bytes(b"\x89PNG fake"));
        assert!(artifact.url.starts_with("file://"));
        assert!(artifact.url.ends_with("receipt_preview.png"));
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("today");
        let publisher = LocalPublisher::new(&nested).unwrap();
        publisher.publish("a_top_half.png", b"x", "image/png").unwrap();
        assert!(nested.join("a_top_half.png").is_file());
    }

    #[test]
    fn rejects_names_that_leave_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = LocalPublisher::new(dir.path()).unwrap();
        for name in ["../escape.png", "sub/dir.png", "", "..", "/abs.png"] {
            let err = publisher.publish(name, b"x", "image/png").unwrap_err();
            assert!(matches!(err, TablecropError::Publish(_)), "{name:?} accepted");
        }
    }
}
