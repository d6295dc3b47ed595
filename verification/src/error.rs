use devreg_store::StoreError;
use devreg_types::{IdentityError, VoteStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid signature for {0}")]
    InvalidSignature(String),

    #[error("{kind} {key} does not exist")]
    NotFound { kind: &'static str, key: String },

    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: &'static str, key: String },

    #[error("photo with hash {0} already exists")]
    DuplicateEvidence(String),

    #[error("voter {voter} has already voted on {vote_id}")]
    DuplicateVote { vote_id: String, voter: String },

    #[error("voting on {vote_id} has ended with status {status}")]
    VotingClosed { vote_id: String, status: VoteStatus },

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl RegistrationError {
    pub(crate) fn not_found(kind: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub(crate) fn already_exists(kind: &'static str, key: impl ToString) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.to_string(),
        }
    }
}
