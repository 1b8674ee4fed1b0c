//! JSON reporter for machine-readable output

use crate::analyzer::AggregateStats;
use crate::guide::{ContentBlock, Page};
use crate::FeedbackReport;
use serde::Serialize;
use std::collections::BTreeMap;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        out.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single feedback report as JSON
    pub fn report(&self, report: &FeedbackReport) -> String {
        self.to_json(report, "{}")
    }

    /// Report multiple reports as JSON array
    pub fn report_many(&self, reports: &[FeedbackReport]) -> String {
        self.to_json(reports, "[]")
    }

    /// Report with summary
    pub fn report_with_summary(&self, reports: &[FeedbackReport], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results: reports,
            summary: JsonSummary {
                drafts_analyzed: stats.drafts_analyzed,
                clean_drafts: stats.clean_drafts,
                total_warnings: stats.total_warnings,
                rule_counts: stats
                    .rule_counts
                    .iter()
                    .map(|(rule, count)| (rule.to_string(), *count))
                    .collect(),
            },
        };
        self.to_json(&output, "{}")
    }

    /// A guide page with its blocks
    pub fn report_page(&self, page: Page, blocks: &[ContentBlock]) -> String {
        let output = JsonPage {
            page,
            label: page.label(),
            blocks,
        };
        self.to_json(&output, "{}")
    }

    /// The page list
    pub fn report_pages(&self) -> String {
        let pages: Vec<JsonPageEntry> = Page::ALL
            .iter()
            .map(|p| JsonPageEntry {
                slug: p.slug(),
                label: p.label(),
            })
            .collect();
        self.to_json(&pages, "[]")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [FeedbackReport],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    drafts_analyzed: usize,
    clean_drafts: usize,
    total_warnings: usize,
    rule_counts: BTreeMap<String, usize>,
}

#[derive(Serialize)]
struct JsonPage<'a> {
    page: Page,
    label: String,
    blocks: &'a [ContentBlock],
}

#[derive(Serialize)]
struct JsonPageEntry {
    slug: &'static str,
    label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::FeedbackEngine;
    use crate::guide;

    #[test]
    fn single_report_shape() {
        let report = FeedbackEngine::new().evaluate(Some("Short Title"), Some(""));
        let json: serde_json::Value =
            serde_json::from_str(&JsonReporter::new().report(&report)).unwrap();
        assert_eq!(json["title"]["wordCount"], 2);
        assert_eq!(json["title"]["advisories"][0]["rule"], "title-too-short");
        assert_eq!(json["title"]["advisories"][0]["severity"], "warning");
        assert_eq!(json["abstract"]["advisories"].as_array().unwrap().len(), 3);
        assert!(json.get("source").is_none());
    }

    #[test]
    fn summary_counts() {
        let engine = FeedbackEngine::new();
        let reports = vec![
            engine.evaluate(Some("Short"), None),
            engine.evaluate(Some("Short Too"), None),
        ];
        let stats = FeedbackEngine::aggregate_stats(&reports);
        let out = JsonReporter::new()
            .pretty()
            .report_with_summary(&reports, &stats);
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["summary"]["draftsAnalyzed"], 2);
        assert_eq!(json["summary"]["totalWarnings"], 2);
        assert_eq!(json["summary"]["ruleCounts"]["title-too-short"], 2);
        assert_eq!(json["results"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn page_output() {
        let page = Page::Results;
        let out = JsonReporter::new().report_page(page, &guide::render(page));
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["page"], "results");
        assert_eq!(json["label"], "8. Results");
        assert_eq!(json["blocks"][0]["type"], "heading");
    }

    #[test]
    fn pages_list() {
        let json: serde_json::Value =
            serde_json::from_str(&JsonReporter::new().report_pages()).unwrap();
        let pages = json.as_array().unwrap();
        assert_eq!(pages.len(), 15);
        assert_eq!(pages[4]["slug"], "title-abstract");
    }
}
