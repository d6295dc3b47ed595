//! Decision rules: when a tally closes a vote.
//!
//! A rule is consulted after every accepted ballot and either leaves the vote
//! open (`None`) or names its terminal status.

use devreg_types::{DecisionRuleKind, RegistryParams, VoteStatus};

use crate::Tally;

/// A pluggable tally comparator.
pub trait DecisionRule: Send + Sync {
    /// Human-readable name of this rule.
    fn name(&self) -> &str;

    /// Terminal status the tally reaches, if any.
    fn decide(&self, tally: &Tally) -> Option<VoteStatus>;
}

/// Approve once `valid > invalid` with at least `min_ballots` cast.
///
/// There is no rejecting outcome: a vote that never gets a valid majority
/// stays `PENDING`.
#[derive(Clone, Copy, Debug)]
pub struct SimpleMajority {
    pub min_ballots: u32,
}

impl Default for SimpleMajority {
    fn default() -> Self {
        Self { min_ballots: 1 }
    }
}

impl DecisionRule for SimpleMajority {
    fn name(&self) -> &str {
        "simple_majority"
    }

    fn decide(&self, tally: &Tally) -> Option<VoteStatus> {
        if tally.vote_count >= self.min_ballots.max(1) && tally.valid_votes > tally.invalid_votes {
            Some(VoteStatus::Approved)
        } else {
            None
        }
    }
}

/// [`SimpleMajority`], plus rejection once `invalid > valid`.
#[derive(Clone, Copy, Debug)]
pub struct SymmetricMajority {
    pub min_ballots: u32,
}

impl DecisionRule for SymmetricMajority {
    fn name(&self) -> &str {
        "symmetric_majority"
    }

    fn decide(&self, tally: &Tally) -> Option<VoteStatus> {
        if tally.vote_count < self.min_ballots.max(1) {
            return None;
        }
        match tally.valid_votes.cmp(&tally.invalid_votes) {
            std::cmp::Ordering::Greater => Some(VoteStatus::Approved),
            std::cmp::Ordering::Less => Some(VoteStatus::Rejected),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Build the rule selected by `params`.
pub fn rule_for(params: &RegistryParams) -> Box<dyn DecisionRule> {
    match params.decision_rule {
        DecisionRuleKind::SimpleMajority => Box::new(SimpleMajority {
            min_ballots: params.min_ballots,
        }),
        DecisionRuleKind::SymmetricMajority => Box::new(SymmetricMajority {
            min_ballots: params.min_ballots,
        }),
    }
}
