//! Console reporter with colored output

use crate::analyzer::AggregateStats;
use crate::guide::{ContentBlock, Page};
use crate::{Feedback, FeedbackReport, Field, Severity};
use colored::Colorize;
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show rule ids next to advisories
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single feedback report
    pub fn report(&self, report: &FeedbackReport) {
        print!("{}", self.render(report));
    }

    /// Report multiple drafts with summary
    pub fn report_many(&self, reports: &[FeedbackReport], stats: &AggregateStats) {
        for report in reports {
            self.report(report);
            println!("{}", "-".repeat(60));
        }
        print!("{}", self.render_summary(stats));
    }

    /// Report in quiet mode (one line per draft)
    pub fn report_quiet(&self, report: &FeedbackReport) {
        println!("{}", self.render_quiet(report));
    }

    /// Print a guide page
    pub fn report_page(&self, page: Page, blocks: &[ContentBlock]) {
        print!("{}", self.render_page(page, blocks));
    }

    /// Render a feedback report as text
    pub fn render(&self, report: &FeedbackReport) -> String {
        let mut out = String::new();
        let header = format!("Title & Abstract Feedback: {}", report.display_name());
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.paint_bold(&header));
        let _ = writeln!(out);
        for feedback in [&report.title, &report.abstract_feedback]
            .into_iter()
            .flatten()
        {
            self.render_feedback(&mut out, feedback);
        }
        out
    }

    fn render_feedback(&self, out: &mut String, feedback: &Feedback) {
        let heading = format!(
            "{} Analysis ({} {}):",
            feedback.field,
            feedback.word_count,
            if feedback.word_count == 1 { "word" } else { "words" }
        );
        let _ = writeln!(out, "   {}", self.paint_bold(&heading));
        for advisory in &feedback.advisories {
            let marker = match advisory.severity {
                Severity::Warning => self.paint_warning("!"),
                Severity::Info => self.paint_info("i"),
            };
            if self.verbose {
                let _ = writeln!(
                    out,
                    "   {} {} {}",
                    marker,
                    advisory.message,
                    self.paint_dim(&format!("[{}]", advisory.rule))
                );
            } else {
                let _ = writeln!(out, "   {} {}", marker, advisory.message);
            }
        }
        let _ = writeln!(out);
    }

    /// One line: name, warning count, title/abstract word counts
    pub fn render_quiet(&self, report: &FeedbackReport) -> String {
        let warnings = report.warning_count();
        let status = if warnings == 0 {
            self.paint_info("ok")
        } else {
            self.paint_warning(&format!(
                "{} warning{}",
                warnings,
                if warnings == 1 { "" } else { "s" }
            ))
        };
        let mut parts = vec![format!("{}: {}", report.display_name(), status)];
        if let Some(ref t) = report.title {
            parts.push(format!("title {}w", t.word_count));
        }
        if let Some(ref a) = report.abstract_feedback {
            parts.push(format!("abstract {}w", a.word_count));
        }
        parts.join(" | ")
    }

    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(out, "{}", self.paint_bold("Summary"));
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(out, "   Drafts analyzed: {}", stats.drafts_analyzed);
        let _ = writeln!(out, "   Without warnings: {}", stats.clean_drafts);
        let _ = writeln!(out, "   Total warnings:  {}", stats.total_warnings);
        for field in [Field::Title, Field::Abstract] {
            let top = stats.top_rules(field);
            if top.is_empty() {
                continue;
            }
            let listed: Vec<String> = top
                .iter()
                .map(|(rule, count)| format!("{} x{}", rule, count))
                .collect();
            let _ = writeln!(out, "   {} rules: {}", field, listed.join(", "));
        }
        let _ = writeln!(out);
        out
    }

    pub fn render_page(&self, page: Page, blocks: &[ContentBlock]) -> String {
        let mut out = String::new();
        for block in blocks {
            match block {
                ContentBlock::Heading { text } => {
                    let _ = writeln!(out, "{}", self.paint_bold(text));
                    let _ = writeln!(out);
                }
                ContentBlock::Text { text } => {
                    let _ = writeln!(out, "{}", text);
                    let _ = writeln!(out);
                }
                ContentBlock::Table {
                    caption,
                    columns,
                    rows,
                } => {
                    let _ = writeln!(out, "{}", self.paint_bold(caption));
                    let _ = writeln!(out, "   {}", columns.join(" | "));
                    for row in rows {
                        let _ = writeln!(out, "   {}", row.join(" | "));
                    }
                    let _ = writeln!(out);
                }
                ContentBlock::Checklist { items } => {
                    for item in items {
                        let _ = writeln!(out, "   [ ] {}", item);
                    }
                    let _ = writeln!(out);
                }
                ContentBlock::AnalyzerTool {
                    default_title,
                    default_abstract,
                    ..
                } => {
                    let _ = writeln!(out, "{}", self.paint_bold("Title and Abstract Analyzer"));
                    let _ = writeln!(
                        out,
                        "   Try: econwrite --title {} --abstract {}",
                        shell_quote(default_title),
                        shell_quote(default_abstract)
                    );
                    let _ = writeln!(out);
                }
            }
        }
        let nav: Vec<String> = [page.previous(), page.next()]
            .into_iter()
            .zip(["previous", "next"])
            .filter_map(|(p, dir)| p.map(|p| format!("{}: {}", dir, p.slug())))
            .collect();
        if !nav.is_empty() {
            let _ = writeln!(out, "{}", self.paint_dim(&nav.join("  ")));
        }
        out
    }

    fn paint_bold(&self, s: &str) -> String {
        if self.use_colors {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_warning(&self, s: &str) -> String {
        if self.use_colors {
            s.yellow().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_info(&self, s: &str) -> String {
        if self.use_colors {
            s.blue().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_dim(&self, s: &str) -> String {
        if self.use_colors {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }
}

/// Single-quote `s` for a POSIX shell
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
