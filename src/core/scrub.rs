use crate::domain::model::{RuleOutcome, ScrubRule};
use crate::domain::ports::RuleProvider;
use crate::utils::error::Result;
use crate::utils::validation::validate_pattern;
use regex::{Captures, Regex};
use std::borrow::Cow;

const CONVERSATIONS_PATTERN: &str = r"(?s)        // Demo conversations\s*\n        self\.conversations = \[.*?\n        \]\n";
const FRIENDS_PATTERN: &str = r"(?s)        // Demo friends.*?\n        self\.friends = \[.*?\] \+ Self\.generateBulkFriends\(count: \d+\)\n";
const DISCOVERABLE_FRIENDS_PATTERN: &str = r"(?s)        // Demo discoverable friends.*?\n        self\.discoverableFriends = \[.*?\n        \]\n";

/// App store 的三個示範資料區塊，依套用順序排列
pub fn builtin_rules() -> Vec<ScrubRule> {
    vec![
        ScrubRule {
            name: "conversations".to_string(),
            label: Some("Conversations".to_string()),
            pattern: CONVERSATIONS_PATTERN.to_string(),
            replacement: "        // Conversations loaded from API\n        self.conversations = []\n"
                .to_string(),
            literal: true,
            expected: Some(1),
        },
        ScrubRule {
            name: "friends".to_string(),
            label: Some("Friends".to_string()),
            pattern: FRIENDS_PATTERN.to_string(),
            replacement: "        // Friends loaded from API\n        self.friends = []\n".to_string(),
            literal: true,
            expected: Some(1),
        },
        ScrubRule {
            name: "discoverable_friends".to_string(),
            label: Some("DiscoverableFriends".to_string()),
            pattern: DISCOVERABLE_FRIENDS_PATTERN.to_string(),
            replacement:
                "        // Discoverable users loaded from API\n        self.discoverableFriends = []\n"
                    .to_string(),
            literal: true,
            expected: Some(1),
        },
    ]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRules;

impl RuleProvider for BuiltinRules {
    fn rules(&self) -> Vec<ScrubRule> {
        builtin_rules()
    }
}

/// 逐一替換 `pattern` 的所有不重疊匹配，回傳新文字與替換次數。
///
/// `replacement` 會對每個匹配展開捕獲群組 (`$1`、`${name}`，`$$` 為字面 `$`)。
/// 沒有匹配時原文不變，次數為 0。
pub fn replace_demo_block(text: &str, pattern: &Regex, replacement: &str) -> (String, usize) {
    let mut count = 0;
    let replaced = pattern.replace_all(text, |caps: &Captures<'_>| {
        count += 1;
        let mut expanded = String::new();
        caps.expand(replacement, &mut expanded);
        expanded
    });
    (replaced.into_owned(), count)
}

/// 與 [`replace_demo_block`] 相同，但替換文字原樣插入，
/// Swift 的 `$0` 等閉包簡寫不會被展開
pub fn replace_demo_block_literal(text: &str, pattern: &Regex, replacement: &str) -> (String, usize) {
    let mut count = 0;
    // 閉包回傳的字串不會做捕獲群組展開
    let replaced = pattern.replace_all(text, |_: &Captures<'_>| {
        count += 1;
        replacement
    });
    (replaced.into_owned(), count)
}

/// 將 `\r\n` 與單獨的 `\r` 統一為 `\n`，規則只認 `\n` 換行
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: ScrubRule,
    pub regex: Regex,
}

impl CompiledRule {
    pub fn compile(rule: ScrubRule) -> Result<Self> {
        let regex = validate_pattern(&rule.name, &rule.pattern)?;
        Ok(Self { rule, regex })
    }

    pub fn apply(&self, text: &str) -> (String, RuleOutcome) {
        let (replaced, match_count) = if self.rule.literal {
            replace_demo_block_literal(text, &self.regex, &self.rule.replacement)
        } else {
            replace_demo_block(text, &self.regex, &self.rule.replacement)
        };
        let outcome = RuleOutcome {
            name: self.rule.name.clone(),
            label: self.rule.display_label().to_string(),
            match_count,
            expected: self.rule.expected,
        };
        (replaced, outcome)
    }
}

/// 已編譯的規則序列，每條規則處理上一條的輸出
#[derive(Debug, Clone)]
pub struct Scrubber {
    rules: Vec<CompiledRule>,
}

impl Scrubber {
    pub fn new(rules: Vec<ScrubRule>) -> Result<Self> {
        let rules = rules
            .into_iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn from_provider<P: RuleProvider + ?Sized>(provider: &P) -> Result<Self> {
        Self::new(provider.rules())
    }

    pub fn builtin() -> Result<Self> {
        Self::from_provider(&BuiltinRules)
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn apply(&self, text: &str) -> (String, Vec<RuleOutcome>) {
        let mut current = text.to_string();
        let mut outcomes = Vec::with_capacity(self.rules.len());

        // 依序套用，並記錄每條規則的匹配次數
        for rule in &self.rules {
            let (next, outcome) = rule.apply(&current);
            tracing::debug!(
                "Rule '{}' matched {} time(s)",
                outcome.name,
                outcome.match_count
            );
            current = next;
            outcomes.push(outcome);
        }

        (current, outcomes)
    }
}

#[cfg(test)]
pub(crate) const APP_STORE_FIXTURE: &str = r#"import Foundation

final class AppStore: ObservableObject {
    @Published var conversations: [Conversation] = []
    @Published var friends: [Friend] = []
    @Published var discoverableFriends: [Friend] = []

    init() {
        // Demo conversations
        self.conversations = [
            Conversation(title: "Morning Run Crew", lastMessage: "See you at 6!"),
            Conversation(title: "Coach Dana", lastMessage: "Great pace [today]")
        ]

        // Demo communities
        self.communities = []

        // Demo friends (seeded for screenshots)
        self.friends = [
            Friend(name: "Avery", tags: ["runner"]),
            Friend(name: "Jordan", tags: [])
        ] + Self.generateBulkFriends(count: 230)

        // Demo discoverable friends
        self.discoverableFriends = [
            Friend(name: "Riley", tags: ["cyclist"])
        ]
    }
}
"#;
