pub mod cli;
pub mod rules;

use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET: &str = "EliteProAIDemo 2/AppStore.swift";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "demo-scrub")]
#[command(about = "Removes hard-coded demo data blocks from the app store source")]
pub struct CliConfig {
    /// Source file to rewrite in place
    #[arg(long, default_value = DEFAULT_TARGET)]
    pub path: String,

    /// TOML rule file replacing the built-in demo block rules
    #[arg(long)]
    pub rules: Option<String>,

    /// Show what would be removed without writing the file
    #[arg(long)]
    pub dry_run: bool,

    /// Fail when a rule's match count differs from its expected count
    #[arg(long)]
    pub strict: bool,

    /// Keep a timestamped copy of the original file
    #[arg(long)]
    pub backup: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub report: ReportFormat,

    /// Print the built-in rules as a TOML rule file and exit
    #[arg(long)]
    pub print_rules: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("path", &self.path)?;
        if let Some(rules) = &self.rules {
            validate_path("rules", rules)?;
        }
        Ok(())
    }
}
