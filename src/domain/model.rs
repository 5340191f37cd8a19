use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// 具名的整檔搜尋/替換規則
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubRule {
    pub name: String,
    /// 主控台顯示名稱，例如 "Conversations block removed" 中的 `Conversations`
    pub label: Option<String>,
    pub pattern: String,
    pub replacement: String,
    /// 為 true 時替換文字原樣寫入，不展開 `$0`、`${name}` 等捕獲群組
    #[serde(default)]
    pub literal: bool,
    /// 預期匹配次數；`None` 表示不檢查
    pub expected: Option<usize>,
}

impl ScrubRule {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub name: String,
    pub label: String,
    pub match_count: usize,
    pub expected: Option<usize>,
}

impl RuleOutcome {
    pub fn is_expected(&self) -> bool {
        self.expected.map_or(true, |n| n == self.match_count)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrubReport {
    pub path: String,
    pub outcomes: Vec<RuleOutcome>,
    /// 長度以字元計算，不是位元組
    pub original_len: usize,
    pub new_len: usize,
    pub written: bool,
    pub backup_path: Option<String>,
    pub dry_run: bool,
    pub finished_at: String,
}

impl ScrubReport {
    pub fn removed(&self) -> i64 {
        self.original_len as i64 - self.new_len as i64
    }

    pub fn total_matches(&self) -> usize {
        self.outcomes.iter().map(|o| o.match_count).sum()
    }

    pub fn unexpected(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|o| !o.is_expected())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
