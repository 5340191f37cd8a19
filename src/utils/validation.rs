use crate::utils::error::{Result, ScrubError};
use regex::Regex;
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ScrubError::validation(field_name, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(ScrubError::validation(field_name, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ScrubError::validation(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// 編譯規則的正規表達式，失敗時錯誤帶上規則名稱
pub fn validate_pattern(rule_name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ScrubError::PatternError {
        rule: rule_name.to_string(),
        source,
    })
}

pub fn validate_unique_names<'a, I>(field_name: &str, names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ScrubError::validation(
                field_name,
                format!("Duplicate rule name: {}", name),
            ));
        }
    }
    Ok(())
}
