//! Abstract heuristics: length band, findings, contribution.

use super::{FeedbackRules, Predicate, RuleArm, RuleGroup, RuleTable};
use crate::config::Heuristics;
use crate::{Field, Rule};

pub const TOO_SHORT: &str =
    "Your abstract is too short. Expand to include methodology, specific findings, and contributions.";
pub const TOO_LONG: &str =
    "Your abstract exceeds typical length limits. Consider focusing on the most essential elements.";
pub const LENGTH_OK: &str = "Your abstract length ({words} words) is appropriate.";
pub const FINDINGS_MAGNITUDES: &str =
    "You mention findings, but consider adding specific magnitudes and effect sizes.";
pub const MISSING_RESULTS: &str = "Consider adding specific results with numerical values.";
pub const CONTRIBUTION_NOTED: &str =
    "You mention contribution, which is essential for positioning your paper.";
pub const MISSING_CONTRIBUTION: &str =
    "Consider explicitly stating your contribution to the literature.";

/// Rule set for abstracts. Every group has a fallback arm, so exactly three
/// advisories are produced.
pub struct AbstractRules {
    table: RuleTable,
}

impl AbstractRules {
    pub fn new() -> Self {
        Self::with_heuristics(&Heuristics::default())
    }

    pub fn with_heuristics(h: &Heuristics) -> Self {
        let table = RuleTable {
            field: Field::Abstract,
            groups: vec![
                RuleGroup::new(
                    "length",
                    vec![
                        RuleArm::new(
                            Rule::AbstractTooShort,
                            Predicate::WordsBelow(h.abstract_min_words),
                            TOO_SHORT,
                        ),
                        RuleArm::new(
                            Rule::AbstractTooLong,
                            Predicate::WordsAbove(h.abstract_max_words),
                            TOO_LONG,
                        ),
                        RuleArm::new(Rule::AbstractLengthOk, Predicate::Always, LENGTH_OK),
                    ],
                ),
                RuleGroup::new(
                    "findings",
                    vec![
                        RuleArm::new(
                            Rule::AbstractFindingsMagnitudes,
                            Predicate::contains_any(h.finding_keywords.as_slice()),
                            FINDINGS_MAGNITUDES,
                        ),
                        RuleArm::new(
                            Rule::AbstractMissingResults,
                            Predicate::Always,
                            MISSING_RESULTS,
                        ),
                    ],
                ),
                RuleGroup::new(
                    "contribution",
                    vec![
                        RuleArm::new(
                            Rule::AbstractContributionNoted,
                            Predicate::contains_any(h.contribution_keywords.as_slice()),
                            CONTRIBUTION_NOTED,
                        ),
                        RuleArm::new(
                            Rule::AbstractMissingContribution,
                            Predicate::Always,
                            MISSING_CONTRIBUTION,
                        ),
                    ],
                ),
            ],
        };
        Self { table }
    }
}

impl Default for AbstractRules {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackRules for AbstractRules {
    fn field(&self) -> Field {
        Field::Abstract
    }

    fn table(&self) -> &RuleTable {
        &self.table
    }
}
