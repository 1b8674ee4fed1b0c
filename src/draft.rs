//! Draft files: a title and an abstract in one text or markdown file
//!
//! Labeled layout (labels are case-insensitive, `#` heading markers allowed):
//!
//! ```text
//! Title: The Impact of Monetary Policy on Household Income Inequality
//!
//! ## Abstract
//! This paper examines ...
//! ```
//!
//! Without labels the first non-empty line is the title and everything after
//! it is the abstract.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

/// Title and abstract text taken from a draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Title,
    Abstract,
}

fn label_regex() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:#{1,6}\s*)?(title|abstract)\s*(?::\s*(.*))?$")
            .expect("label pattern is valid")
    })
}

fn heading_marker_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"^\s*#{1,6}\s*").expect("heading pattern is valid"))
}

impl Draft {
    pub fn new(title: impl Into<String>, abstract_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            abstract_text: abstract_text.into(),
        }
    }

    /// Parse draft content. Never fails; missing parts come back empty.
    pub fn parse(content: &str) -> Self {
        if content.lines().any(|l| label_regex().is_match(l)) {
            Self::parse_labeled(content)
        } else {
            Self::parse_plain(content)
        }
    }

    /// Read and parse a draft file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read draft: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    /// Read and parse a draft from a reader (stdin)
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .context("Failed to read draft from stdin")?;
        Ok(Self::parse(&content))
    }

    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.abstract_text.trim().is_empty()
    }

    fn parse_plain(content: &str) -> Self {
        let mut lines = content.lines();
        let title = lines
            .by_ref()
            .find(|l| !l.trim().is_empty())
            .map(strip_heading)
            .unwrap_or_default();
        let rest: Vec<&str> = lines.collect();
        Self {
            title,
            abstract_text: rest.join("\n").trim().to_string(),
        }
    }

    fn parse_labeled(content: &str) -> Self {
        let mut section = Section::Preamble;
        let mut preamble: Vec<&str> = Vec::new();
        let mut title: Vec<&str> = Vec::new();
        let mut abstract_lines: Vec<&str> = Vec::new();

        for line in content.lines() {
            if let Some(caps) = label_regex().captures(line) {
                section = if caps[1].eq_ignore_ascii_case("title") {
                    Section::Title
                } else {
                    Section::Abstract
                };
                if let Some(inline) = caps.get(2) {
                    push_section(section, inline.as_str(), &mut title, &mut abstract_lines);
                }
                continue;
            }
            match section {
                Section::Preamble => preamble.push(line),
                _ => push_section(section, line, &mut title, &mut abstract_lines),
            }
        }

        let mut title = title
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if title.is_empty() {
            // Unlabeled title line ahead of the abstract label
            title = preamble
                .iter()
                .find(|l| !l.trim().is_empty())
                .map(|l| strip_heading(l))
                .unwrap_or_default();
        }

        Self {
            title,
            abstract_text: abstract_lines.join("\n").trim().to_string(),
        }
    }
}

fn push_section<'a>(
    section: Section,
    line: &'a str,
    title: &mut Vec<&'a str>,
    abstract_lines: &mut Vec<&'a str>,
) {
    match section {
        Section::Title => title.push(line),
        Section::Abstract => abstract_lines.push(line),
        Section::Preamble => {}
    }
}

fn strip_heading(line: &str) -> String {
    heading_marker_regex().replace(line, "").trim().to_string()
}
