// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tablecrop — table cropper and half splitter for photographed documents.
//
// Entry point. Initialises logging, loads configuration, runs one command and
// prints its JSON result descriptor on stdout. Logs go to stderr.

mod config;
mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tablecrop_core::error::Result;
use tablecrop_publish::ErrorResponse;

use config::AppConfig;
use services::app_services::{AppServices, Upload};

/// Rectify photographed tables and split them into halves.
#[derive(Parser, Debug)]
#[command(name = "tablecrop")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON configuration file (defaults to the data directory's config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory that receives the output images
    #[arg(short, long, global = true)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect the table, rectify it and publish a trimmed preview
    CropPreview {
        /// Input image (PNG, JPG, JPEG, BMP or TIFF)
        image: PathBuf,
    },
    /// Split an image into top and bottom halves and publish both
    SplitHalves {
        /// Input image (PNG, JPG, JPEG, BMP or TIFF)
        image: PathBuf,

        /// Rectify the table before splitting
        #[arg(long)]
        rectify: bool,
    },
    /// Report service status
    Health,
    /// Write the effective configuration to a file for editing
    InitConfig {
        /// Destination (defaults to the data directory's config.json)
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "Tablecrop starting");

    match run(cli) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            let response = ErrorResponse::from(&err);
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{json}"),
                Err(_) => println!("{{\"status\": \"error\"}}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.out_dir {
        config.output_dir = dir;
    }

    match cli.command {
        Command::InitConfig { path } => {
            let path = path.unwrap_or_else(services::data_dir::default_config_path);
            config.save(&path)?;
            to_json(&serde_json::json!({
                "status": "success",
                "config": path.display().to_string(),
            }))
        }
        Command::Health => {
            let services = AppServices::init(&config)?;
            to_json(&services.health())
        }
        Command::CropPreview { image } => {
            let services = AppServices::init(&config)?;
            let upload = Upload::from_path(&image)?;
            to_json(&services.crop_preview(&upload)?)
        }
        Command::SplitHalves { image, rectify } => {
            let services = AppServices::init(&config)?;
            let upload = Upload::from_path(&image)?;
            to_json(&services.split_halves(&upload, rectify)?)
        }
    }
}

fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn split_flags_parse() {
        let cli = Cli::parse_from(["tablecrop", "split-halves", "scan.png", "--rectify", "-o", "/tmp/out"]);
        assert_eq!(cli.out_dir, Some(PathBuf::from("/tmp/out")));
        match cli.command {
            Command::SplitHalves { image, rectify } => {
                assert_eq!(image, PathBuf::from("scan.png"));
                assert!(rectify);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn health_runs_without_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "tablecrop",
            "--out-dir",
            dir.path().to_str().unwrap(),
            "--config",
            dir.path().join("missing.json").to_str().unwrap(),
            "health",
        ]);
        // An explicit config path that does not exist is an error.
        assert!(run(cli).is_err());

        let cli = Cli::parse_from(["tablecrop", "-o", dir.path().to_str().unwrap(), "health"]);
        let json = run(cli).unwrap();
        assert!(json.contains("\"healthy\""));
    }

    #[test]
    fn init_config_writes_a_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("tablecrop.json");
        let out = dir.path().join("published");
        let cli = Cli::parse_from([
            "tablecrop",
            "--out-dir",
            out.to_str().unwrap(),
            "init-config",
            path.to_str().unwrap(),
        ]);
        let json = run(cli).unwrap();
        assert!(json.contains("\"success\""));

        let written = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(written.output_dir, out);
    }
}
