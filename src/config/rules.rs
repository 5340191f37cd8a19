use crate::core::scrub::builtin_rules;
use crate::core::{RuleProvider, ScrubRule};
use crate::utils::error::{Result, ScrubError};
use crate::utils::validation::{
    validate_non_empty_string, validate_pattern, validate_unique_names, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 從 TOML 載入的規則集合，每個 `[[rules]]` 表格對應一條規則
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFile {
    pub rules: Vec<ScrubRule>,
}

impl RuleFile {
    /// 從 TOML 檔案載入規則
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ScrubError::RuleFileError {
            message: format!("{}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析規則
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ScrubError::RuleFileError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 內建的三個示範資料區塊規則
    pub fn builtin() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// 輸出為可編輯的規則檔內容 (--print-rules)
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ScrubError::RuleFileError {
            message: format!("TOML serialization error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${APP_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        // 使用正規表達式匹配 ${VAR_NAME} 格式
        static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl RuleProvider for RuleFile {
    fn rules(&self) -> Vec<ScrubRule> {
        self.rules.clone()
    }
}

impl Validate for RuleFile {
    fn validate(&self) -> Result<()> {
        // 至少需要一條規則
        if self.rules.is_empty() {
            return Err(ScrubError::validation("rules", "At least one rule is required"));
        }

        // 驗證每條規則的名稱與正規表達式
        for (index, rule) in self.rules.iter().enumerate() {
            validate_non_empty_string(&format!("rules[{}].name", index), &rule.name)?;
            validate_non_empty_string(&format!("rules[{}].pattern", index), &rule.pattern)?;
            validate_pattern(&rule.name, &rule.pattern)?;
        }

        // 規則名稱不可重複
        validate_unique_names("rules", self.rules.iter().map(|r| r.name.as_str()))
    }
}
