pub mod engine;
pub mod scrub;

pub use crate::domain::model::{RuleOutcome, ScrubReport, ScrubRule};
pub use crate::domain::ports::{RuleProvider, Storage};
pub use crate::utils::error::Result;
