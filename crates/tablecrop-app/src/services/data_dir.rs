// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Default locations for configuration and published output.

use std::path::PathBuf;

/// `$XDG_DATA_HOME/tablecrop`, falling back to `~/.local/share/tablecrop` and
/// finally the system temp directory. Not created here.
pub fn data_dir() -> PathBuf {
    base_dir().join("tablecrop")
}

/// Where outputs go when the configuration does not say.
pub fn default_output_dir() -> PathBuf {
    data_dir().join("output")
}

/// Configuration file read when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    data_dir().join("config.json")
}

fn base_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}
