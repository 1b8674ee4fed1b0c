//! Advisory rule tables for titles and abstracts
//!
//! A rule table is an ordered list of groups. Each group is an ordered list of
//! arms; the first arm whose predicate holds emits its message and the rest of
//! the group is skipped. Length bands and either/or keyword checks are
//! multi-arm groups, additive checks are single-arm groups.

pub mod abstracts;
pub mod title;

pub use abstracts::AbstractRules;
pub use title::TitleRules;

use super::text::TextStats;
use crate::{Advisory, Field, Rule};
use tracing::debug;

/// Placeholder replaced by the input's word count when a message is rendered
pub const WORD_COUNT_PLACEHOLDER: &str = "{words}";

/// Condition an arm checks against the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Always matches (the fallback arm of a group)
    Always,
    /// Fewer than n words
    WordsBelow(usize),
    /// More than n words
    WordsAbove(usize),
    /// Lowercased text contains any of the keywords (stored lowercased)
    ContainsAny(Vec<String>),
    /// Raw text contains the character
    ContainsChar(char),
}

impl Predicate {
    /// Keyword predicate; keywords are lowercased so matching is case-insensitive
    pub fn contains_any<S: AsRef<str>>(keywords: &[S]) -> Self {
        Predicate::ContainsAny(
            keywords
                .iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        )
    }

    pub fn matches(&self, text: &str, stats: &TextStats) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::WordsBelow(n) => stats.word_count < *n,
            Predicate::WordsAbove(n) => stats.word_count > *n,
            Predicate::ContainsAny(keywords) => {
                keywords.iter().any(|k| stats.lowercase.contains(k.as_str()))
            }
            Predicate::ContainsChar(c) => text.contains(*c),
        }
    }
}

/// A predicate and the advisory it produces
#[derive(Debug, Clone)]
pub struct RuleArm {
    pub rule: Rule,
    pub predicate: Predicate,
    /// Message template; may contain `{words}`
    pub message: &'static str,
}

impl RuleArm {
    pub fn new(rule: Rule, predicate: Predicate, message: &'static str) -> Self {
        Self {
            rule,
            predicate,
            message,
        }
    }

    fn render(&self, stats: &TextStats) -> String {
        if self.message.contains(WORD_COUNT_PLACEHOLDER) {
            self.message
                .replace(WORD_COUNT_PLACEHOLDER, &stats.word_count.to_string())
        } else {
            self.message.to_string()
        }
    }

    fn advisory(&self, stats: &TextStats) -> Advisory {
        Advisory {
            rule: self.rule,
            severity: self.rule.default_severity(),
            message: self.render(stats),
        }
    }
}

/// Mutually exclusive arms; at most one emits
#[derive(Debug, Clone)]
pub struct RuleGroup {
    pub name: &'static str,
    pub arms: Vec<RuleArm>,
}

impl RuleGroup {
    pub fn new(name: &'static str, arms: Vec<RuleArm>) -> Self {
        Self { name, arms }
    }

    /// First arm whose predicate holds
    pub fn first_match(&self, text: &str, stats: &TextStats) -> Option<&RuleArm> {
        self.arms
            .iter()
            .find(|arm| arm.predicate.matches(text, stats))
    }
}

/// Ordered groups for one field
#[derive(Debug, Clone)]
pub struct RuleTable {
    pub field: Field,
    pub groups: Vec<RuleGroup>,
}

impl RuleTable {
    /// Evaluate every group in order. Advisories carry default severities.
    pub fn evaluate(&self, text: &str, stats: &TextStats) -> Vec<Advisory> {
        self.groups
            .iter()
            .filter_map(|group| {
                let arm = group.first_match(text, stats);
                if let Some(arm) = arm {
                    debug!(group = group.name, rule = %arm.rule, "matched");
                }
                arm
            })
            .map(|arm| arm.advisory(stats))
            .collect()
    }

    /// Rules this table can emit, in table order
    pub fn rules(&self) -> Vec<Rule> {
        self.groups
            .iter()
            .flat_map(|g| g.arms.iter().map(|a| a.rule))
            .collect()
    }
}

/// Trait for the per-field rule sets
pub trait FeedbackRules {
    /// Field the rules inspect
    fn field(&self) -> Field;

    /// The rule table
    fn table(&self) -> &RuleTable;

    /// Evaluate the input and return advisories in table order
    fn evaluate(&self, text: &str, stats: &TextStats) -> Vec<Advisory> {
        self.table().evaluate(text, stats)
    }
}
