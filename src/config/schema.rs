//! Config schema and deserialization

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_TITLE_MIN_WORDS: usize = 6;
pub const DEFAULT_TITLE_MAX_WORDS: usize = 15;
pub const DEFAULT_ABSTRACT_MIN_WORDS: usize = 50;
pub const DEFAULT_ABSTRACT_MAX_WORDS: usize = 250;

const DEFAULT_CAUSAL_KEYWORDS: &[&str] = &["effect", "impact"];
const DEFAULT_FINDING_KEYWORDS: &[&str] = &["find", "result"];
const DEFAULT_CONTRIBUTION_KEYWORDS: &[&str] = &["contribute", "extend"];
const DEFAULT_DRAFT_PATTERNS: &[&str] = &[".md", ".txt", ".markdown"];

/// Rule severity override (warning, info, off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Warning,
    Info,
    /// Disable the rule entirely
    Off,
}

impl RuleSeverity {
    /// Convert to crate::Severity if not Off
    pub fn to_severity(self) -> Option<crate::Severity> {
        match self {
            RuleSeverity::Warning => Some(crate::Severity::Warning),
            RuleSeverity::Info => Some(crate::Severity::Info),
            RuleSeverity::Off => None,
        }
    }
}

/// Title heuristics. Unset fields fall back to the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_words: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_words: Option<usize>,
    /// Words that signal a causal claim (matched case-insensitively)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causal_keywords: Option<Vec<String>>,
}

/// Abstract heuristics. Unset fields fall back to the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbstractConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_words: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_words: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finding_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution_keywords: Option<Vec<String>>,
}

/// Root config structure for .econwriterc.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    #[serde(default)]
    pub title: TitleConfig,

    #[serde(default, rename = "abstract")]
    pub abstract_text: AbstractConfig,

    /// Per-rule severity overrides. Key is rule name in kebab-case.
    #[serde(default)]
    pub rules: HashMap<String, RuleSeverity>,

    /// Glob patterns for files/directories to exclude from batch analysis
    #[serde(default)]
    pub ignore: Vec<String>,

    /// File suffixes treated as drafts (default: .md, .txt, .markdown)
    #[serde(default)]
    pub draft_patterns: Vec<String>,

    /// Exit 1 when any warning advisory remains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

/// Thresholds and keyword lists with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heuristics {
    pub title_min_words: usize,
    pub title_max_words: usize,
    pub causal_keywords: Vec<String>,
    pub abstract_min_words: usize,
    pub abstract_max_words: usize,
    pub finding_keywords: Vec<String>,
    pub contribution_keywords: Vec<String>,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            title_min_words: DEFAULT_TITLE_MIN_WORDS,
            title_max_words: DEFAULT_TITLE_MAX_WORDS,
            causal_keywords: owned(DEFAULT_CAUSAL_KEYWORDS),
            abstract_min_words: DEFAULT_ABSTRACT_MIN_WORDS,
            abstract_max_words: DEFAULT_ABSTRACT_MAX_WORDS,
            finding_keywords: owned(DEFAULT_FINDING_KEYWORDS),
            contribution_keywords: owned(DEFAULT_CONTRIBUTION_KEYWORDS),
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_strict: bool) -> Self {
        if cli_strict {
            self.strict = Some(true);
        }
        self
    }

    /// Get the configured severity for a rule, if any
    pub fn rule_severity(&self, rule_id: &str) -> Option<RuleSeverity> {
        self.rules.get(rule_id).copied()
    }

    pub fn is_strict(&self) -> bool {
        self.strict.unwrap_or(false)
    }

    /// Resolve thresholds and keyword lists, applying defaults
    pub fn heuristics(&self) -> Heuristics {
        let defaults = Heuristics::default();
        Heuristics {
            title_min_words: self.title.min_words.unwrap_or(defaults.title_min_words),
            title_max_words: self.title.max_words.unwrap_or(defaults.title_max_words),
            causal_keywords: self
                .title
                .causal_keywords
                .clone()
                .unwrap_or(defaults.causal_keywords),
            abstract_min_words: self
                .abstract_text
                .min_words
                .unwrap_or(defaults.abstract_min_words),
            abstract_max_words: self
                .abstract_text
                .max_words
                .unwrap_or(defaults.abstract_max_words),
            finding_keywords: self
                .abstract_text
                .finding_keywords
                .clone()
                .unwrap_or(defaults.finding_keywords),
            contribution_keywords: self
                .abstract_text
                .contribution_keywords
                .clone()
                .unwrap_or(defaults.contribution_keywords),
        }
    }

    /// Check thresholds and keyword lists for values the rule table can't use
    pub fn validate(&self) -> Result<(), ConfigError> {
        let h = self.heuristics();
        if h.title_min_words > h.title_max_words {
            return Err(ConfigError::InvalidRange {
                field: "title",
                min: h.title_min_words,
                max: h.title_max_words,
            });
        }
        if h.abstract_min_words > h.abstract_max_words {
            return Err(ConfigError::InvalidRange {
                field: "abstract",
                min: h.abstract_min_words,
                max: h.abstract_max_words,
            });
        }
        check_keywords("title.causalKeywords", &h.causal_keywords)?;
        check_keywords("abstract.findingKeywords", &h.finding_keywords)?;
        check_keywords("abstract.contributionKeywords", &h.contribution_keywords)?;
        for rule_id in self.rules.keys() {
            if rule_id.parse::<crate::Rule>().is_err() {
                return Err(ConfigError::UnknownRule(rule_id.clone()));
            }
        }
        Ok(())
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.strict.is_none() {
            self.strict = base.strict;
        }

        if self.title.min_words.is_none() {
            self.title.min_words = base.title.min_words;
        }
        if self.title.max_words.is_none() {
            self.title.max_words = base.title.max_words;
        }
        if self.title.causal_keywords.is_none() {
            self.title.causal_keywords = base.title.causal_keywords;
        }

        let base_abstract = base.abstract_text;
        let ours = &mut self.abstract_text;
        if ours.min_words.is_none() {
            ours.min_words = base_abstract.min_words;
        }
        if ours.max_words.is_none() {
            ours.max_words = base_abstract.max_words;
        }
        if ours.finding_keywords.is_none() {
            ours.finding_keywords = base_abstract.finding_keywords;
        }
        if ours.contribution_keywords.is_none() {
            ours.contribution_keywords = base_abstract.contribution_keywords;
        }

        // Merge rules (this config takes precedence)
        for (rule, severity) in base.rules {
            self.rules.entry(rule).or_insert(severity);
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.draft_patterns.is_empty() {
            self.draft_patterns = base.draft_patterns;
        }
    }

    /// Get draft file suffixes
    pub fn get_draft_patterns(&self) -> Vec<&str> {
        if self.draft_patterns.is_empty() {
            DEFAULT_DRAFT_PATTERNS.to_vec()
        } else {
            self.draft_patterns.iter().map(|s| s.as_str()).collect()
        }
    }
}

fn check_keywords(field: &'static str, words: &[String]) -> Result<(), ConfigError> {
    if words.is_empty() {
        return Err(ConfigError::EmptyKeywords(field));
    }
    if words.iter().any(|w| w.trim().is_empty()) {
        return Err(ConfigError::BlankKeyword(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_guide_thresholds() {
        let h = Config::default().heuristics();
        assert_eq!(h.title_min_words, 6);
        assert_eq!(h.title_max_words, 15);
        assert_eq!(h.abstract_min_words, 50);
        assert_eq!(h.abstract_max_words, 250);
        assert_eq!(h.causal_keywords, vec!["effect", "impact"]);
        assert_eq!(h.finding_keywords, vec!["find", "result"]);
        assert_eq!(h.contribution_keywords, vec!["contribute", "extend"]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "title": { "maxWords": 12 }, "abstract": { "minWords": 100 } }"#)
                .unwrap();
        let h = config.heuristics();
        assert_eq!(h.title_min_words, 6);
        assert_eq!(h.title_max_words, 12);
        assert_eq!(h.abstract_min_words, 100);
        assert_eq!(h.abstract_max_words, 250);
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let config: Config =
            serde_json::from_str(r#"{ "title": { "minWords": 20, "maxWords": 10 } }"#).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidRange {
                field: "title",
                min: 20,
                max: 10
            })
        );
    }

    #[test]
    fn validate_rejects_empty_and_blank_keywords() {
        let empty: Config =
            serde_json::from_str(r#"{ "abstract": { "findingKeywords": [] } }"#).unwrap();
        assert_eq!(
            empty.validate(),
            Err(ConfigError::EmptyKeywords("abstract.findingKeywords"))
        );

        let blank: Config =
            serde_json::from_str(r#"{ "title": { "causalKeywords": ["effect", "  "] } }"#).unwrap();
        assert_eq!(
            blank.validate(),
            Err(ConfigError::BlankKeyword("title.causalKeywords"))
        );
    }

    #[test]
    fn validate_rejects_unknown_rule() {
        let config: Config =
            serde_json::from_str(r#"{ "rules": { "weak-assertion": "off" } }"#).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownRule("weak-assertion".to_string()))
        );
    }

    #[test]
    fn merge_prefers_child_values() {
        let mut child: Config = serde_json::from_str(
            r#"{ "title": { "maxWords": 12 }, "rules": { "title-dual-part": "off" }, "ignore": ["b"] }"#,
        )
        .unwrap();
        let base: Config = serde_json::from_str(
            r#"{ "title": { "minWords": 4, "maxWords": 20 }, "strict": true,
                 "rules": { "title-dual-part": "warning", "abstract-too-long": "info" },
                 "ignore": ["a"] }"#,
        )
        .unwrap();
        child.merge_from(base);
        assert_eq!(child.title.min_words, Some(4));
        assert_eq!(child.title.max_words, Some(12));
        assert!(child.is_strict());
        assert_eq!(child.rule_severity("title-dual-part"), Some(RuleSeverity::Off));
        assert_eq!(
            child.rule_severity("abstract-too-long"),
            Some(RuleSeverity::Info)
        );
        assert_eq!(child.ignore, vec!["a", "b"]);
    }

    #[test]
    fn cli_strict_overrides_config() {
        let config = Config::default().merge_with_cli(true);
        assert!(config.is_strict());
        assert!(!Config::default().merge_with_cli(false).is_strict());
    }

    #[test]
    fn default_draft_patterns() {
        assert!(Config::default().get_draft_patterns().contains(&".md"));
    }
}
