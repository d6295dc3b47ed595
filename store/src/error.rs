use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    /// A value read by the transaction changed before it committed.
    #[error("concurrent update to {0}")]
    Conflict(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}
