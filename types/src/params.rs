//! Registry parameters: which decision rule and vote-id derivation a deployment runs.
//!
//! Defaults reproduce the base behaviour exactly: a single-ballot simple majority
//! with no path to `REJECTED`, and vote ids taken from the first evidence hash.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypeError;

/// Decision rule applied after every accepted ballot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRuleKind {
    /// `valid > invalid` approves; nothing ever rejects.
    #[default]
    SimpleMajority,
    /// As `SimpleMajority`, plus `invalid > valid` rejects. Opt-in.
    SymmetricMajority,
}

impl DecisionRuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SimpleMajority => "simple_majority",
            Self::SymmetricMajority => "symmetric_majority",
        }
    }
}

impl fmt::Display for DecisionRuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionRuleKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple_majority" | "simple" => Ok(Self::SimpleMajority),
            "symmetric_majority" | "symmetric" => Ok(Self::SymmetricMajority),
            _ => Err(TypeError::UnknownVariant {
                kind: "decision rule",
                value: s.to_string(),
            }),
        }
    }
}

/// How a vote id is derived from a registration request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteIdDerivation {
    /// `vote-<first evidence hash>`. Two registrations sharing a first hash collide.
    #[default]
    FirstEvidence,
    /// `vote-<sha256(key digest, every evidence hash)>`. Opt-in.
    EvidenceSet,
}

impl VoteIdDerivation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstEvidence => "first_evidence",
            Self::EvidenceSet => "evidence_set",
        }
    }
}

impl FromStr for VoteIdDerivation {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first_evidence" => Ok(Self::FirstEvidence),
            "evidence_set" => Ok(Self::EvidenceSet),
            _ => Err(TypeError::UnknownVariant {
                kind: "vote id derivation",
                value: s.to_string(),
            }),
        }
    }
}

/// Tunable registry behaviour, loaded from the `[params]` table of the daemon config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryParams {
    #[serde(default)]
    pub decision_rule: DecisionRuleKind,

    /// Ballots required before the decision rule may fire.
    #[serde(default = "default_min_ballots")]
    pub min_ballots: u32,

    #[serde(default)]
    pub vote_id: VoteIdDerivation,
}

fn default_min_ballots() -> u32 {
    1
}

impl Default for RegistryParams {
    fn default() -> Self {
        Self {
            decision_rule: DecisionRuleKind::default(),
            min_ballots: default_min_ballots(),
            vote_id: VoteIdDerivation::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_base_rule() {
        let p = RegistryParams::default();
        assert_eq!(p.decision_rule, DecisionRuleKind::SimpleMajority);
        assert_eq!(p.min_ballots, 1);
        assert_eq!(p.vote_id, VoteIdDerivation::FirstEvidence);
    }

    #[test]
    fn parse_rule_names() {
        assert_eq!(
            "symmetric".parse::<DecisionRuleKind>().unwrap(),
            DecisionRuleKind::SymmetricMajority
        );
        assert!("quadratic".parse::<DecisionRuleKind>().is_err());
        assert_eq!(
            "evidence_set".parse::<VoteIdDerivation>().unwrap(),
            VoteIdDerivation::EvidenceSet
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let p: RegistryParams = serde_json::from_str(r#"{"decision_rule":"symmetric_majority"}"#)
            .unwrap();
        assert_eq!(p.decision_rule, DecisionRuleKind::SymmetricMajority);
        assert_eq!(p.min_ballots, 1);
    }
}
