pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{cli::LocalStorage, rules::RuleFile, CliConfig, ReportFormat};
pub use crate::core::{
    engine::{ScrubEngine, ScrubOptions},
    scrub::{builtin_rules, normalize_line_endings, replace_demo_block, replace_demo_block_literal, Scrubber},
};
pub use crate::domain::model::{RuleOutcome, ScrubReport, ScrubRule};
pub use crate::utils::error::{Result, ScrubError};
