//! econwrite: title and abstract feedback for economics journal manuscripts
//!
//! This library evaluates a paper title and abstract against a small table of
//! writing heuristics (length bands, causal wording, contribution statements)
//! and returns advisory lines an author can act on. It also models the page
//! layout of the accompanying writing guide.

pub mod analyzer;
pub mod config;
pub mod draft;
pub mod guide;
pub mod mcp;
pub mod reporter;
pub mod watcher;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Which part of the manuscript an advisory is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Abstract,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Title => write!(f, "Title"),
            Field::Abstract => write!(f, "Abstract"),
        }
    }
}

/// Severity levels for advisories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Something the author should change
    Warning,
    /// An observation; nothing necessarily wrong
    Info,
}

/// Advisory rules. Each variant is one arm of the title or abstract rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    TitleTooShort,
    TitleTooLong,
    TitleLengthOk,
    /// Title wording ("effect", "impact") implies a causal claim
    TitleCausalClaim,
    /// Title uses a "Concept: Application" structure
    TitleDualPart,
    AbstractTooShort,
    AbstractTooLong,
    AbstractLengthOk,
    /// Findings are mentioned but without magnitudes
    AbstractFindingsMagnitudes,
    AbstractMissingResults,
    AbstractContributionNoted,
    AbstractMissingContribution,
}

impl Rule {
    /// Every rule, in table order
    pub const ALL: [Rule; 12] = [
        Rule::TitleTooShort,
        Rule::TitleTooLong,
        Rule::TitleLengthOk,
        Rule::TitleCausalClaim,
        Rule::TitleDualPart,
        Rule::AbstractTooShort,
        Rule::AbstractTooLong,
        Rule::AbstractLengthOk,
        Rule::AbstractFindingsMagnitudes,
        Rule::AbstractMissingResults,
        Rule::AbstractContributionNoted,
        Rule::AbstractMissingContribution,
    ];

    /// Which field this rule inspects
    pub fn field(&self) -> Field {
        match self {
            Rule::TitleTooShort
            | Rule::TitleTooLong
            | Rule::TitleLengthOk
            | Rule::TitleCausalClaim
            | Rule::TitleDualPart => Field::Title,
            _ => Field::Abstract,
        }
    }

    /// Severity used when no config override applies
    pub fn default_severity(&self) -> Severity {
        match self {
            Rule::TitleTooShort
            | Rule::TitleTooLong
            | Rule::AbstractTooShort
            | Rule::AbstractTooLong
            | Rule::AbstractMissingResults
            | Rule::AbstractMissingContribution => Severity::Warning,
            Rule::TitleLengthOk
            | Rule::TitleCausalClaim
            | Rule::TitleDualPart
            | Rule::AbstractLengthOk
            | Rule::AbstractFindingsMagnitudes
            | Rule::AbstractContributionNoted => Severity::Info,
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::TitleTooShort => write!(f, "title-too-short"),
            Rule::TitleTooLong => write!(f, "title-too-long"),
            Rule::TitleLengthOk => write!(f, "title-length-ok"),
            Rule::TitleCausalClaim => write!(f, "title-causal-claim"),
            Rule::TitleDualPart => write!(f, "title-dual-part"),
            Rule::AbstractTooShort => write!(f, "abstract-too-short"),
            Rule::AbstractTooLong => write!(f, "abstract-too-long"),
            Rule::AbstractLengthOk => write!(f, "abstract-length-ok"),
            Rule::AbstractFindingsMagnitudes => write!(f, "abstract-findings-magnitudes"),
            Rule::AbstractMissingResults => write!(f, "abstract-missing-results"),
            Rule::AbstractContributionNoted => write!(f, "abstract-contribution-noted"),
            Rule::AbstractMissingContribution => write!(f, "abstract-missing-contribution"),
        }
    }
}

impl FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::ALL
            .iter()
            .copied()
            .find(|rule| rule.to_string() == s)
            .ok_or_else(|| format!("unknown rule: {}", s))
    }
}

/// One line of feedback produced by a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    /// Rule that produced this advisory
    pub rule: Rule,
    /// Severity (after config overrides)
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

/// Feedback for a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub field: Field,
    /// Whitespace-delimited token count of the input
    pub word_count: usize,
    /// Advisories in rule-table order
    pub advisories: Vec<Advisory>,
}

impl Feedback {
    /// Advisory messages only, in order
    pub fn lines(&self) -> Vec<String> {
        self.advisories.iter().map(|a| a.message.clone()).collect()
    }

    /// Messages joined by a blank line, the way the guide displays them
    pub fn text(&self) -> String {
        self.lines().join("\n\n")
    }

    pub fn warning_count(&self) -> usize {
        self.advisories
            .iter()
            .filter(|a| a.severity == Severity::Warning)
            .count()
    }
}

/// Feedback for a title/abstract pair. Either side may be absent when only one
/// was supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    /// Draft file the inputs came from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Feedback>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_feedback: Option<Feedback>,
}

impl FeedbackReport {
    pub fn warning_count(&self) -> usize {
        self.title.as_ref().map_or(0, Feedback::warning_count)
            + self
                .abstract_feedback
                .as_ref()
                .map_or(0, Feedback::warning_count)
    }

    /// Label used by reporters ("inline" when there is no file)
    pub fn display_name(&self) -> String {
        match self.source {
            Some(ref path) => path.display().to_string(),
            None => "inline".to_string(),
        }
    }
}

/// Evaluate a title with the default rule table and return the advisory lines.
///
/// Total over any input: an empty title is "too short".
pub fn evaluate_title(title: &str) -> Vec<String> {
    analyzer::FeedbackEngine::new().evaluate_title(title).lines()
}

/// Evaluate an abstract with the default rule table and return the advisory lines.
pub fn evaluate_abstract(text: &str) -> Vec<String> {
    analyzer::FeedbackEngine::new().evaluate_abstract(text).lines()
}

/// Public API: analyze a draft file using the config found from `work_dir`.
///
/// * `path` - draft file (title + abstract)
/// * `work_dir` - directory for config lookup
/// * `config_path` - optional explicit config; if None, searches from work_dir
pub fn analyze_draft_file(
    path: &std::path::Path,
    work_dir: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<FeedbackReport> {
    let config = crate::config::load_config(work_dir, config_path)?;
    let engine = analyzer::FeedbackEngine::from_config(&config)?;
    engine.analyze_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_ids_round_trip_through_from_str() {
        for rule in Rule::ALL {
            assert_eq!(rule.to_string().parse::<Rule>(), Ok(rule));
        }
        assert!("weak-assertion".parse::<Rule>().is_err());
    }

    #[test]
    fn rule_serde_matches_display() {
        let json = serde_json::to_string(&Rule::AbstractMissingContribution).unwrap();
        assert_eq!(json, "\"abstract-missing-contribution\"");
    }

    #[test]
    fn rule_fields() {
        assert_eq!(Rule::TitleDualPart.field(), Field::Title);
        assert_eq!(Rule::AbstractLengthOk.field(), Field::Abstract);
    }

    #[test]
    fn feedback_text_joins_with_blank_line() {
        let fb = Feedback {
            field: Field::Title,
            word_count: 2,
            advisories: vec![
                Advisory {
                    rule: Rule::TitleTooShort,
                    severity: Severity::Warning,
                    message: "a".to_string(),
                },
                Advisory {
                    rule: Rule::TitleDualPart,
                    severity: Severity::Info,
                    message: "b".to_string(),
                },
            ],
        };
        assert_eq!(fb.text(), "a\n\nb");
        assert_eq!(fb.warning_count(), 1);
    }

    #[test]
    fn report_serializes_abstract_key() {
        let report = FeedbackReport {
            source: None,
            title: None,
            abstract_feedback: Some(Feedback {
                field: Field::Abstract,
                word_count: 0,
                advisories: vec![],
            }),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"abstract\""));
        assert!(!json.contains("\"title\""));
        assert!(!json.contains("\"source\""));
    }

    #[test]
    fn top_level_functions_use_default_table() {
        assert_eq!(evaluate_title("").len(), 1);
        assert_eq!(evaluate_abstract("").len(), 3);
    }
}
