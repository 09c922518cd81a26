// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration: the cropper settings plus where results are
// published.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tablecrop_core::CropperConfig;
use tablecrop_core::config::{read_json, write_json};
use tablecrop_core::error::Result;
use tracing::{debug, info};

use crate::services::data_dir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cropper: CropperConfig,
    /// Directory that receives published images.
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cropper: CropperConfig::default(),
            output_dir: data_dir::default_output_dir(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// A missing default file means defaults; a missing explicit file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => {
                let default = data_dir::default_config_path();
                if !default.is_file() {
                    debug!(path = %default.display(), "No configuration file; using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let config: Self = read_json(&path)?;
        config.cropper.validate()?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Write as pretty JSON, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)?;
        info!(path = %path.display(), "Configuration written");
        Ok(())
    }
}
