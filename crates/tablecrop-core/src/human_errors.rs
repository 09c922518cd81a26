// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for whoever uploaded the photo.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Internal geometry (matrices, contour coordinates) never appears in the text.

use crate::error::TablecropError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Storage hiccup or similar; retrying may help.
    Transient,
    /// The user must change the input (retake the photo, pick another file).
    ActionRequired,
    /// Cannot be fixed by retrying: misconfiguration or an unsupported input.
    Permanent,
}

/// A human-readable error with a plain English message and a suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try next.
    pub suggestion: String,
    /// Whether the caller may retry the same request unchanged.
    pub retriable: bool,
    pub severity: Severity,
}

/// HTTP-style status code for request-handling layers: 4xx when the input is
/// at fault, 5xx otherwise.
pub fn status_code(err: &TablecropError) -> u16 {
    match err {
        TablecropError::UploadTooLarge { .. } | TablecropError::ImageTooLarge { .. } => 413,
        TablecropError::Geometry(_) => 422,
        e if e.is_input_error() => 400,
        _ => 500,
    }
}

/// Convert a `TablecropError` into a `HumanError`.
pub fn humanize_error(err: &TablecropError) -> HumanError {
    match err {
        // -- Input --
        TablecropError::Decode(_) => HumanError {
            message: "We couldn't read this image.".into(),
            suggestion: "The file may be damaged. Try exporting it again as PNG or JPEG.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        TablecropError::UnsupportedFormat(detail) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!("Upload a PNG, JPG, JPEG, BMP or TIFF image. (File type: {detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        TablecropError::EmptyInput => HumanError {
            message: "The uploaded file is empty.".into(),
            suggestion: "Choose the photo again and make sure it finished uploading.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        TablecropError::ImageTooLarge { max, .. } => HumanError {
            message: "This image is too large to process.".into(),
            suggestion: format!("Resize the photo so neither side is longer than {max} pixels."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        TablecropError::UploadTooLarge { .. } => HumanError {
            message: "This file is too large to upload.".into(),
            suggestion: "Try a smaller or more compressed version of the photo.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Pipeline --
        TablecropError::Geometry(_) => HumanError {
            message: "We couldn't straighten the table in this photo.".into(),
            suggestion: "Retake the photo so all four corners of the table are visible and not hidden behind anything.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Output --
        TablecropError::Encode(_) => HumanError {
            message: "We couldn't save the processed image.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        TablecropError::Publish(_) => HumanError {
            message: "We couldn't store the result.".into(),
            suggestion: "The storage service may be unavailable. Try again in a moment.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Configuration / persistence --
        TablecropError::Config(detail) => HumanError {
            message: "The service is misconfigured.".into(),
            suggestion: format!("Check the configuration file. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        TablecropError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or copy the file somewhere else first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        TablecropError::Serialization(_) => HumanError {
            message: "We had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
