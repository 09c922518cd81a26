// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output file naming: `<stem>_preview.png`, `<stem>_top_half.png`,
// `<stem>_bottom_half.png`.

use std::path::Path;

/// Stem used when the upload carried no usable file name.
pub const DEFAULT_STEM: &str = "uploaded";

/// Which derived image a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Preview,
    TopHalf,
    BottomHalf,
}

impl OutputKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::TopHalf => "top_half",
            Self::BottomHalf => "bottom_half",
        }
    }
}

/// Base name for outputs derived from an uploaded file name.
///
/// Directories and the extension are dropped; characters other than ASCII
/// letters, digits, `-` and `_` become `_`.
pub fn output_stem(original_name: Option<&str>) -> String {
    let stem = original_name
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or(name))
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();

    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if cleaned.is_empty() {
        DEFAULT_STEM.to_owned()
    } else {
        cleaned
    }
}

/// Full output file name, e.g. `receipt_top_half.png`.
pub fn output_name(stem: &str, kind: OutputKind, extension: &str) -> String {
    format!("{stem}_{}.{extension}", kind.suffix())
}
