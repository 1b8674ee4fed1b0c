//! Feedback engine - runs the title and abstract rule tables

use crate::config::{Config, RuleSeverity};
use crate::draft::Draft;
use crate::{Advisory, Feedback, FeedbackReport, Field, Rule};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::rules::{AbstractRules, FeedbackRules, TitleRules};
use super::text::TextStats;

/// Main engine that evaluates titles and abstracts
pub struct FeedbackEngine {
    title_rules: TitleRules,
    abstract_rules: AbstractRules,
    /// Per-rule severity overrides from config
    severity_overrides: HashMap<Rule, RuleSeverity>,
}

impl FeedbackEngine {
    /// Engine with the default thresholds and keywords
    pub fn new() -> Self {
        Self {
            title_rules: TitleRules::new(),
            abstract_rules: AbstractRules::new(),
            severity_overrides: HashMap::new(),
        }
    }

    /// Engine using the thresholds, keywords and rule overrides from config
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate().context("Invalid config")?;
        let heuristics = config.heuristics();

        let severity_overrides: HashMap<Rule, RuleSeverity> = Rule::ALL
            .iter()
            .filter_map(|rule| {
                config
                    .rule_severity(&rule.to_string())
                    .map(|severity| (*rule, severity))
            })
            .collect();

        Ok(Self {
            title_rules: TitleRules::with_heuristics(&heuristics),
            abstract_rules: AbstractRules::with_heuristics(&heuristics),
            severity_overrides,
        })
    }

    /// Drop advisories whose rule is off and apply severity overrides
    fn apply_overrides(&self, advisories: Vec<Advisory>) -> Vec<Advisory> {
        if self.severity_overrides.is_empty() {
            return advisories;
        }
        let mut out = Vec::with_capacity(advisories.len());
        for mut advisory in advisories {
            match self.severity_overrides.get(&advisory.rule) {
                Some(RuleSeverity::Off) => continue,
                Some(rs) => {
                    if let Some(sev) = rs.to_severity() {
                        advisory.severity = sev;
                    }
                    out.push(advisory);
                }
                None => out.push(advisory),
            }
        }
        out
    }

    fn run(&self, rules: &dyn FeedbackRules, text: &str) -> Feedback {
        let stats = TextStats::new(text);
        let advisories = self.apply_overrides(rules.evaluate(text, &stats));
        debug!(
            field = %rules.field(),
            words = stats.word_count,
            advisories = advisories.len(),
            "evaluated"
        );
        Feedback {
            field: rules.field(),
            word_count: stats.word_count,
            advisories,
        }
    }

    pub fn evaluate_title(&self, title: &str) -> Feedback {
        self.run(&self.title_rules, title)
    }

    pub fn evaluate_abstract(&self, text: &str) -> Feedback {
        self.run(&self.abstract_rules, text)
    }

    /// Evaluate whichever fields were supplied
    pub fn evaluate(&self, title: Option<&str>, abstract_text: Option<&str>) -> FeedbackReport {
        FeedbackReport {
            source: None,
            title: title.map(|t| self.evaluate_title(t)),
            abstract_feedback: abstract_text.map(|a| self.evaluate_abstract(a)),
        }
    }

    /// Evaluate both fields of a draft
    pub fn evaluate_draft(&self, draft: &Draft, source: Option<PathBuf>) -> FeedbackReport {
        FeedbackReport {
            source,
            ..self.evaluate(Some(&draft.title), Some(&draft.abstract_text))
        }
    }

    /// Read a draft file and evaluate it
    pub fn analyze_file(&self, path: &Path) -> Result<FeedbackReport> {
        let draft = Draft::from_file(path)?;
        Ok(self.evaluate_draft(&draft, Some(path.to_path_buf())))
    }

    /// Analyze multiple draft files sequentially
    pub fn analyze_many(&self, paths: &[PathBuf]) -> Vec<Result<FeedbackReport>> {
        paths.iter().map(|p| self.analyze_file(p)).collect()
    }

    /// Analyze multiple draft files in parallel using rayon
    pub fn analyze_parallel(&self, paths: &[PathBuf]) -> Vec<Result<FeedbackReport>> {
        use rayon::prelude::*;

        paths.par_iter().map(|p| self.analyze_file(p)).collect()
    }

    /// Summary numbers for a batch
    pub fn aggregate_stats(reports: &[FeedbackReport]) -> AggregateStats {
        let mut stats = AggregateStats {
            drafts_analyzed: reports.len(),
            ..AggregateStats::default()
        };
        for report in reports {
            let warnings = report.warning_count();
            stats.total_warnings += warnings;
            if warnings == 0 {
                stats.clean_drafts += 1;
            }
            for feedback in [&report.title, &report.abstract_feedback]
                .into_iter()
                .flatten()
            {
                for advisory in &feedback.advisories {
                    *stats.rule_counts.entry(advisory.rule).or_insert(0) += 1;
                }
            }
        }
        stats
    }
}

impl Default for FeedbackEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate statistics across multiple drafts
#[derive(Debug, Clone, Default)]
pub struct AggregateStats {
    pub drafts_analyzed: usize,
    /// Drafts with no warning advisories
    pub clean_drafts: usize,
    pub total_warnings: usize,
    /// How often each rule fired
    pub rule_counts: HashMap<Rule, usize>,
}

impl AggregateStats {
    /// Rules that fired, most frequent first, restricted to one field
    pub fn top_rules(&self, field: Field) -> Vec<(Rule, usize)> {
        let mut rules: Vec<(Rule, usize)> = self
            .rule_counts
            .iter()
            .filter(|(rule, _)| rule.field() == field)
            .map(|(rule, count)| (*rule, *count))
            .collect();
        rules.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.to_string().cmp(&b.0.to_string())));
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_draft(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".md").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_engine_title() {
        let fb = FeedbackEngine::new()
            .evaluate_title("The Impact of Monetary Policy on Household Income Inequality");
        assert_eq!(fb.field, Field::Title);
        assert_eq!(fb.word_count, 9);
        let rules: Vec<Rule> = fb.advisories.iter().map(|a| a.rule).collect();
        assert_eq!(rules, vec![Rule::TitleLengthOk, Rule::TitleCausalClaim]);
    }

    #[test]
    fn test_evaluate_only_title() {
        let report = FeedbackEngine::new().evaluate(Some("Short Title"), None);
        assert!(report.title.is_some());
        assert!(report.abstract_feedback.is_none());
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn test_rule_off_drops_advisory() {
        let config: Config =
            serde_json::from_str(r#"{ "rules": { "title-dual-part": "off" } }"#).unwrap();
        let engine = FeedbackEngine::from_config(&config).unwrap();
        let fb = engine.evaluate_title("Beyond GDP: Measuring Welfare across Many Countries");
        assert_eq!(fb.advisories.len(), 1);
        assert_eq!(fb.advisories[0].rule, Rule::TitleLengthOk);
    }

    #[test]
    fn test_severity_override() {
        let config: Config =
            serde_json::from_str(r#"{ "rules": { "abstract-missing-contribution": "info" } }"#)
                .unwrap();
        let engine = FeedbackEngine::from_config(&config).unwrap();
        let fb = engine.evaluate_abstract("");
        assert_eq!(fb.advisories[2].rule, Rule::AbstractMissingContribution);
        assert_eq!(fb.advisories[2].severity, Severity::Info);
        assert_eq!(fb.advisories[0].severity, Severity::Warning);
    }

    #[test]
    fn test_config_thresholds_flow_through() {
        let config: Config =
            serde_json::from_str(r#"{ "abstract": { "minWords": 3, "maxWords": 5 } }"#).unwrap();
        let engine = FeedbackEngine::from_config(&config).unwrap();
        let fb = engine.evaluate_abstract("one two three four");
        assert_eq!(fb.advisories[0].rule, Rule::AbstractLengthOk);
        assert_eq!(
            fb.advisories[0].message,
            "Your abstract length (4 words) is appropriate."
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config: Config =
            serde_json::from_str(r#"{ "rules": { "nonsense": "off" } }"#).unwrap();
        assert!(FeedbackEngine::from_config(&config).is_err());
    }

    #[test]
    fn test_analyze_file() {
        let file = make_draft("Title: Essays on Trade\nAbstract: We find results.");
        let report = FeedbackEngine::new().analyze_file(file.path()).unwrap();
        assert_eq!(report.source.as_deref(), Some(file.path()));
        let title = report.title.unwrap();
        assert_eq!(title.word_count, 3);
        assert_eq!(title.advisories[0].rule, Rule::TitleTooShort);
        let abs = report.abstract_feedback.unwrap();
        assert_eq!(abs.advisories[1].rule, Rule::AbstractFindingsMagnitudes);
    }

    #[test]
    fn test_analyze_parallel_matches_sequential() {
        let a = make_draft("A Study of Trade Policy in Small Open Economies\nWe extend the model.");
        let b = make_draft("Short\n");
        let paths = vec![a.path().to_path_buf(), b.path().to_path_buf()];
        let engine = FeedbackEngine::new();
        let seq: Vec<FeedbackReport> = engine
            .analyze_many(&paths)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        let par: Vec<FeedbackReport> = engine
            .analyze_parallel(&paths)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_aggregate_stats() {
        let engine = FeedbackEngine::new();
        let reports = vec![
            engine.evaluate(Some("Short"), Some("")),
            engine.evaluate(Some("Short Again"), None),
        ];
        let stats = FeedbackEngine::aggregate_stats(&reports);
        assert_eq!(stats.drafts_analyzed, 2);
        assert_eq!(stats.clean_drafts, 0);
        // title-too-short twice, plus three abstract warnings
        assert_eq!(stats.total_warnings, 5);
        assert_eq!(
            stats.top_rules(Field::Title),
            vec![(Rule::TitleTooShort, 2)]
        );
    }
}
