//! Guide pages and the content blocks a host renders for them
//!
//! The guide is a fixed sequence of sections. A host picks a [`Page`] and
//! calls [`render`] to get structured blocks; turning those into widgets is
//! the host's job.

use crate::config::Heuristics;
use serde::Serialize;
use std::str::FromStr;

/// Default title shown in the analyzer tool
pub const DEFAULT_TOOL_TITLE: &str = "The Impact of Monetary Policy on Household Income Inequality";
/// Default abstract shown in the analyzer tool
pub const DEFAULT_TOOL_ABSTRACT: &str =
    "This paper examines the distributional effects of monetary policy.";

/// A section of the writing guide, in sidebar order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Overview,
    FindingResearchIdeas,
    PreliminaryResearch,
    ImradStructure,
    TitleAbstract,
    Introduction,
    LiteratureReview,
    Methodology,
    Results,
    Discussion,
    Conclusion,
    References,
    SubmissionProcess,
    RespondingToReviewers,
    Resources,
}

impl Page {
    pub const ALL: [Page; 15] = [
        Page::Overview,
        Page::FindingResearchIdeas,
        Page::PreliminaryResearch,
        Page::ImradStructure,
        Page::TitleAbstract,
        Page::Introduction,
        Page::LiteratureReview,
        Page::Methodology,
        Page::Results,
        Page::Discussion,
        Page::Conclusion,
        Page::References,
        Page::SubmissionProcess,
        Page::RespondingToReviewers,
        Page::Resources,
    ];

    /// Section number shown in the sidebar (the overview page has none)
    pub fn number(&self) -> Option<usize> {
        match self {
            Page::Overview => None,
            other => Page::ALL.iter().position(|p| p == other),
        }
    }

    /// Heading text without the section number
    pub fn name(&self) -> &'static str {
        match self {
            Page::Overview => "Introduction",
            Page::FindingResearchIdeas => "Finding Research Ideas",
            Page::PreliminaryResearch => "Preliminary Research",
            Page::ImradStructure => "IMRAD Structure",
            Page::TitleAbstract => "Title & Abstract",
            Page::Introduction => "Introduction",
            Page::LiteratureReview => "Literature Review",
            Page::Methodology => "Methodology",
            Page::Results => "Results",
            Page::Discussion => "Discussion",
            Page::Conclusion => "Conclusion",
            Page::References => "References & Citations",
            Page::SubmissionProcess => "Submission Process",
            Page::RespondingToReviewers => "Responding to Reviewers",
            Page::Resources => "Resources & Templates",
        }
    }

    /// Sidebar label, e.g. "4. Title & Abstract"
    pub fn label(&self) -> String {
        match self.number() {
            Some(n) => format!("{}. {}", n, self.name()),
            None => self.name().to_string(),
        }
    }

    /// Stable identifier for URLs and the CLI
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::FindingResearchIdeas => "finding-research-ideas",
            Page::PreliminaryResearch => "preliminary-research",
            Page::ImradStructure => "imrad-structure",
            Page::TitleAbstract => "title-abstract",
            Page::Introduction => "introduction",
            Page::LiteratureReview => "literature-review",
            Page::Methodology => "methodology",
            Page::Results => "results",
            Page::Discussion => "discussion",
            Page::Conclusion => "conclusion",
            Page::References => "references",
            Page::SubmissionProcess => "submission-process",
            Page::RespondingToReviewers => "responding-to-reviewers",
            Page::Resources => "resources",
        }
    }

    /// One-paragraph lede for the page
    pub fn summary(&self) -> &'static str {
        match self {
            Page::Overview => "A step-by-step guide to writing research papers for economics journals, from finding a question to responding to reviewers.",
            Page::FindingResearchIdeas => "Where impactful research questions come from and how to evaluate them for significance, novelty and feasibility.",
            Page::PreliminaryResearch => "Surveying the literature, assessing data availability and checking that an idea is feasible before committing to it.",
            Page::ImradStructure => "How economics papers adapt the Introduction, Methods, Results and Discussion structure.",
            Page::TitleAbstract => "Titles and abstracts are the most visible and widely read parts of your paper. They determine whether readers will continue to your full article.",
            Page::Introduction => "Motivating the question, previewing the findings and stating the contribution within the first pages.",
            Page::LiteratureReview => "Organizing prior work into strands and positioning your contribution against identified gaps.",
            Page::Methodology => "Describing data, empirical strategy and identification so that readers can assess causal claims.",
            Page::Results => "Presenting estimates with tables and figures and interpreting both statistical and economic significance.",
            Page::Discussion => "Connecting findings to theory, mechanisms and policy, and acknowledging limitations.",
            Page::Conclusion => "Summarizing contributions and implications without introducing new results.",
            Page::References => "Citation conventions and reference management for economics journals.",
            Page::SubmissionProcess => "Choosing a journal, preparing the submission package and writing the cover letter.",
            Page::RespondingToReviewers => "Structuring a response letter and handling revise-and-resubmit decisions.",
            Page::Resources => "Checklists, templates and further reading.",
        }
    }

    pub fn next(&self) -> Option<Page> {
        let i = self.index();
        Page::ALL.get(i + 1).copied()
    }

    pub fn previous(&self) -> Option<Page> {
        let i = self.index();
        i.checked_sub(1).map(|j| Page::ALL[j])
    }

    fn index(&self) -> usize {
        Page::ALL.iter().position(|p| p == self).unwrap_or(0)
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Page {
    type Err = String;

    /// Accepts a slug ("title-abstract", exact), a sidebar label
    /// ("4. Title & Abstract", any case) or a section number ("4", "0" for the
    /// overview).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            return Page::ALL
                .get(n)
                .copied()
                .ok_or_else(|| format!("no guide section {}", n));
        }
        Page::ALL
            .iter()
            .copied()
            .find(|p| p.slug() == s)
            .or_else(|| {
                Page::ALL
                    .iter()
                    .copied()
                    .find(|p| p.label().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| format!("unknown guide page: {}", s))
    }
}

/// A structured piece of page content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentBlock {
    Heading { text: String },
    Text { text: String },
    Table {
        caption: String,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Checklist { items: Vec<String> },
    /// The title/abstract analyzer widget
    #[serde(rename_all = "camelCase")]
    AnalyzerTool {
        default_title: String,
        default_abstract: String,
        title_words: (usize, usize),
        abstract_words: (usize, usize),
    },
}

/// Blocks for a page
pub fn render(page: Page) -> Vec<ContentBlock> {
    let mut blocks = vec![
        ContentBlock::Heading { text: page.label() },
        ContentBlock::Text {
            text: page.summary().to_string(),
        },
    ];
    if page == Page::TitleAbstract {
        blocks.extend(title_abstract_blocks());
    }
    blocks
}

fn title_abstract_blocks() -> Vec<ContentBlock> {
    let h = Heuristics::default();
    let patterns = [
        ("Question Format", "Does Foreign Aid Reduce Poverty?", "Research directly answers a specific question"),
        ("Main Finding", "The Declining Labor Share of Income", "Paper presents a robust, novel finding"),
        ("Causal Relationship", "How Minimum Wages Affect Employment", "Study identifies causal mechanisms"),
        ("Geographic Focus", "Income Inequality in Developing Countries", "Results are specific to certain regions"),
        ("Methodological Signal", "A Regression Discontinuity Analysis of Educational Returns", "Novel methodology is a key contribution"),
        ("Theoretical Framing", "Toward a Theory of Optimal Currency Areas", "Paper develops new theoretical framework"),
        ("Dual-Part with Colon", "Beyond GDP: Measuring Welfare across Countries", "Conceptual framework followed by specific application"),
    ];

    vec![
        ContentBlock::Table {
            caption: "Title Patterns in Top Economics Journals".to_string(),
            columns: vec![
                "Pattern".to_string(),
                "Example".to_string(),
                "When to Use".to_string(),
            ],
            rows: patterns
                .iter()
                .map(|(p, e, w)| vec![p.to_string(), e.to_string(), w.to_string()])
                .collect(),
        },
        ContentBlock::Checklist {
            items: vec![
                "Opens with the research question or objective".to_string(),
                "Briefly explains the methodology".to_string(),
                "Presents key findings with specific numbers".to_string(),
                "States the contribution and implications".to_string(),
                "Stays within the journal's word limit (typically 150-250 words)".to_string(),
            ],
        },
        ContentBlock::AnalyzerTool {
            default_title: DEFAULT_TOOL_TITLE.to_string(),
            default_abstract: DEFAULT_TOOL_ABSTRACT.to_string(),
            title_words: (h.title_min_words, h.title_max_words),
            abstract_words: (h.abstract_min_words, h.abstract_max_words),
        },
    ]
}
