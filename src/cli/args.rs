//! Command-line argument definitions for the eRezept extractor
//!
//! This module defines the CLI interface using the clap derive API. Logging
//! and configuration flags are global so they can follow any subcommand.

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// CLI arguments for the eRezept AVD extractor
///
/// Extracts AVD billing attributes from eRezept FHIR-XML bundles using an
/// AVD specification CSV, and reports on the quality of that CSV.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "erezept-extractor",
    version,
    about = "Extract AVD billing attributes from eRezept FHIR-XML documents",
    long_about = "Reads an AVD specification table (CSV) describing which XPath selectors and \
                  business rules yield each billing attribute, applies it to one or more eRezept \
                  FHIR-XML bundles, and prints the extracted values with validation results as JSON."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    ///
    /// TOML file overriding column names, the namespace binding, the
    /// optional-length marker and the default value table.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Extract AVD attributes from FHIR-XML documents
    Extract(ExtractArgs),
    /// Validate an AVD specification table and print a quality report
    ValidateSpec(SpecArgs),
    /// List the FHIR profiles referenced by a specification table
    Profiles(ProfilesArgs),
}

/// Arguments for the extract command
#[derive(Debug, Clone, Parser)]
pub struct ExtractArgs {
    /// AVD specification CSV
    #[arg(short = 's', long = "spec", value_name = "CSV", help = "AVD specification CSV file")]
    pub spec: PathBuf,

    /// Documents or directories to process
    ///
    /// Directories are searched recursively for `*.xml` files.
    #[arg(
        value_name = "DOCUMENT|DIR",
        required = true,
        num_args = 1..,
        help = "FHIR-XML documents or directories containing them"
    )]
    pub inputs: Vec<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long = "pretty", help = "Pretty-print the JSON outcomes")]
    pub pretty: bool,

    /// Output file for JSON outcomes
    ///
    /// If not specified, outcomes are written to stdout.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write JSON outcomes to a file instead of stdout"
    )]
    pub output_file: Option<PathBuf>,
}

/// Arguments for the validate-spec command
#[derive(Debug, Clone, Parser)]
pub struct SpecArgs {
    /// AVD specification CSV
    #[arg(short = 's', long = "spec", value_name = "CSV", help = "AVD specification CSV file")]
    pub spec: PathBuf,

    /// Output format for the report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the report"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the profiles command
#[derive(Debug, Clone, Parser)]
pub struct ProfilesArgs {
    /// AVD specification CSV
    #[arg(short = 's', long = "spec", value_name = "CSV", help = "AVD specification CSV file")]
    pub spec: PathBuf,

    /// Only list specifications that need business logic
    #[arg(long = "complex", help = "Only list specifications that need business logic")]
    pub complex_only: bool,

    /// Output format for the listing
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the listing"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Validate global arguments
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            require_file(config_file, "Config file")?;
        }
        Ok(())
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Whether to print the colored run summary
    pub fn show_summary(&self) -> bool {
        !self.quiet
    }
}

impl ExtractArgs {
    /// Validate extract arguments
    ///
    /// The specification file is not checked here: a missing table is
    /// reported through the extraction outcomes.
    pub fn validate(&self) -> Result<()> {
        for input in &self.inputs {
            if !input.exists() {
                return Err(Error::configuration(format!(
                    "Input path does not exist: {}",
                    input.display()
                )));
            }
        }

        if let Some(output_file) = &self.output_file {
            if let Some(parent) = output_file.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(Error::configuration(format!(
                        "Output file directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }
}

fn require_file(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        return Err(Error::configuration(format!(
            "{} does not exist: {}",
            what,
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(Error::configuration(format!(
            "{} is not a file: {}",
            what,
            path.display()
        )));
    }
    Ok(())
}
