//! Title heuristics: length band, causal wording, dual-part structure.

use super::{FeedbackRules, Predicate, RuleArm, RuleGroup, RuleTable};
use crate::config::Heuristics;
use crate::{Field, Rule};

pub const TOO_SHORT: &str =
    "Your title may be too short. Consider adding more specificity about variables or methodology.";
pub const TOO_LONG: &str =
    "Your title may be too long. Consider making it more concise while retaining key information.";
pub const LENGTH_OK: &str = "Your title length is within the typical range for economics papers.";
pub const CAUSAL_CLAIM: &str =
    "Your title indicates a causal relationship. Ensure your methodology supports causal claims.";
pub const DUAL_PART: &str = "You're using a dual-part title structure, which can be effective for combining conceptual framework with specific application.";

/// Rule set for paper titles
pub struct TitleRules {
    table: RuleTable,
}

impl TitleRules {
    pub fn new() -> Self {
        Self::with_heuristics(&Heuristics::default())
    }

    pub fn with_heuristics(h: &Heuristics) -> Self {
        let table = RuleTable {
            field: Field::Title,
            groups: vec![
                RuleGroup::new(
                    "length",
                    vec![
                        RuleArm::new(
                            Rule::TitleTooShort,
                            Predicate::WordsBelow(h.title_min_words),
                            TOO_SHORT,
                        ),
                        RuleArm::new(
                            Rule::TitleTooLong,
                            Predicate::WordsAbove(h.title_max_words),
                            TOO_LONG,
                        ),
                        RuleArm::new(Rule::TitleLengthOk, Predicate::Always, LENGTH_OK),
                    ],
                ),
                RuleGroup::new(
                    "causal",
                    vec![RuleArm::new(
                        Rule::TitleCausalClaim,
                        Predicate::contains_any(h.causal_keywords.as_slice()),
                        CAUSAL_CLAIM,
                    )],
                ),
                RuleGroup::new(
                    "structure",
                    vec![RuleArm::new(
                        Rule::TitleDualPart,
                        Predicate::ContainsChar(':'),
                        DUAL_PART,
                    )],
                ),
            ],
        };
        Self { table }
    }
}

impl Default for TitleRules {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackRules for TitleRules {
    fn field(&self) -> Field {
        Field::Title
    }

    fn table(&self) -> &RuleTable {
        &self.table
    }
}
