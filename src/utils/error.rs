use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrubError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("File is not valid UTF-8: {path}")]
    InvalidEncoding { path: String },

    #[error("Invalid pattern for rule '{rule}': {source}")]
    PatternError {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("Rule file error: {message}")]
    RuleFileError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Validation error in '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Rule '{rule}' matched {found} time(s), expected {expected}")]
    UnexpectedMatchCount {
        rule: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Matching,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ScrubError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) | Self::InvalidEncoding { .. } => ErrorCategory::Io,
            Self::PatternError { .. }
            | Self::RuleFileError { .. }
            | Self::ValidationError { .. } => ErrorCategory::Configuration,
            Self::UnexpectedMatchCount { .. } => ErrorCategory::Matching,
            Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Matching => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// 依錯誤嚴重程度決定程序退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not read or write the target file: {}", e),
            Self::InvalidEncoding { path } => {
                format!("'{}' is not a UTF-8 text file", path)
            }
            Self::PatternError { rule, .. } => {
                format!("The pattern of rule '{}' is not a valid regular expression", rule)
            }
            Self::RuleFileError { message } => format!("The rule file could not be loaded: {}", message),
            Self::SerializationError(e) => format!("Could not render the report: {}", e),
            Self::ValidationError { field, message } => {
                format!("Invalid setting '{}': {}", field, message)
            }
            Self::UnexpectedMatchCount {
                rule,
                expected,
                found,
            } => format!(
                "Block '{}' was found {} time(s) but {} was expected; the file was left untouched",
                rule, found, expected
            ),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) => "Check that the path exists and that you have write permission",
            Self::InvalidEncoding { .. } => "Point --path at a UTF-8 source file",
            Self::PatternError { .. } => "Fix the regular expression in the rule file",
            Self::RuleFileError { .. } => "Make sure the rule file exists and is valid TOML",
            Self::SerializationError(_) => "Re-run with --report text",
            Self::ValidationError { .. } => "Correct the value and run again",
            Self::UnexpectedMatchCount { .. } => {
                "The file may already be cleaned or its layout drifted; run without --strict or update the rule"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrubError>;
