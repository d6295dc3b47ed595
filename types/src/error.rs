use thiserror::Error;

/// Errors raised when parsing or validating a primitive type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid key digest: {0}")]
    InvalidDigest(String),

    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("identifier {0:?} contains a NUL byte")]
    NulInIdentifier(String),

    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}
