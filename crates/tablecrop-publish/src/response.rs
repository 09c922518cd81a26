// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON result descriptors returned to whoever submitted the image.

use serde::{Deserialize, Serialize};
use tablecrop_core::TablecropError;
use tablecrop_core::human_errors::{humanize_error, status_code};

use crate::traits::PublishedArtifact;

const SUCCESS: &str = "success";

/// Name and location of one published file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactLink {
    pub filename: String,
    pub url: String,
}

impl From<&PublishedArtifact> for ArtifactLink {
    fn from(artifact: &PublishedArtifact) -> Self {
        Self {
            filename: artifact.filename.clone(),
            url: artifact.url.clone(),
        }
    }
}

/// `{"status": "success", "filename": ..., "url": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropPreviewResponse {
    pub status: String,
    pub filename: String,
    pub url: String,
}

impl CropPreviewResponse {
    pub fn success(artifact: &PublishedArtifact) -> Self {
        Self {
            status: SUCCESS.into(),
            filename: artifact.filename.clone(),
            url: artifact.url.clone(),
        }
    }
}

/// `{"status": "success", "top_half": {...}, "bottom_half": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResponse {
    pub status: String,
    pub top_half: ArtifactLink,
    pub bottom_half: ArtifactLink,
}

impl SplitResponse {
    pub fn success(top: &PublishedArtifact, bottom: &PublishedArtifact) -> Self {
        Self {
            status: SUCCESS.into(),
            top_half: top.into(),
            bottom_half: bottom.into(),
        }
    }
}

/// `{"status": "error", "message": ..., "suggestion": ...}` plus the
/// HTTP-style status code a front end would answer with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: u16,
    pub message: String,
    pub suggestion: String,
    pub retriable: bool,
}

impl From<&TablecropError> for ErrorResponse {
    fn from(err: &TablecropError) -> Self {
        let human = humanize_error(err);
        Self {
            status: "error".into(),
            code: status_code(err),
            message: human.message,
            suggestion: human.suggestion,
            retriable: human.retriable,
        }
    }
}

/// Liveness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(service: &str, version: &str) -> Self {
        Self {
            status: "healthy".into(),
            service: service.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn artifact(name: &str) -> PublishedArtifact {
        PublishedArtifact {
            filename: name.into(),
            url: format!("file:///tmp/out/{name}"),
            sha256: String::new(),
            bytes: 0,
            published_at: Utc::now(),
        }
    }

    #[test]
    fn preview_descriptor_shape() {
        let value = serde_json::to_value(CropPreviewResponse::success(&artifact("a_preview.png"))).unwrap();
        assert_eq!(
            value,
            json!({
                "status": "success",
                "filename": "a_preview.png",
                "url": "file:///tmp/out/a_preview.png"
            })
        );
    }

    #[test]
    fn split_descriptor_nests_both_halves() {
        let response = SplitResponse::success(&artifact("a_top_half.png"), &artifact("a_bottom_half.png"));
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["top_half"]["filename"], "a_top_half.png");
        assert_eq!(value["bottom_half"]["url"], "file:///tmp/out/a_bottom_half.png");
    }

    #[test]
    fn error_descriptor_hides_geometry_details() {
        let err = TablecropError::Geometry("det 1.2e-14 for [[0.0, 1.0]]".into());
        let response = ErrorResponse::from(&err);
        assert_eq!(response.status, "error");
        assert_eq!(response.code, 422);
        assert!(!response.message.contains("1.2e-14"));
        assert!(!response.suggestion.contains("[["));
    }

    #[test]
    fn health_reports_version() {
        let health = HealthResponse::healthy("tablecrop", "0.3.0");
        assert_eq!(serde_json::to_value(health).unwrap()["status"], "healthy");
    }
}
