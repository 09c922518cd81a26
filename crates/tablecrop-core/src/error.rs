// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Tablecrop.

use thiserror::Error;

/// Top-level error type for all Tablecrop operations.
#[derive(Debug, Error)]
pub enum TablecropError {
    // -- Input errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("empty image upload")]
    EmptyInput,

    #[error("image too large: {width}x{height} exceeds the {max} pixel limit per side")]
    ImageTooLarge { width: u32, height: u32, max: u32 },

    #[error("upload too large: {bytes} bytes exceeds the {max} byte limit")]
    UploadTooLarge { bytes: usize, max: usize },

    // -- Pipeline errors --
    #[error("degenerate geometry: {0}")]
    Geometry(String),

    // -- Output errors --
    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("publishing failed: {0}")]
    Publish(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TablecropError {
    /// Whether this error originates from the caller's input rather than from
    /// the pipeline or its collaborators.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_)
                | Self::UnsupportedFormat(_)
                | Self::EmptyInput
                | Self::ImageTooLarge { .. }
                | Self::UploadTooLarge { .. }
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TablecropError>;
