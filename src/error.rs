//! Error types for the CheeseUp client core

use thiserror::Error;

use crate::provider::ProviderError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Every configured chain endpoint failed or returned a malformed
    /// response. Distinct from a legitimately empty table.
    #[error("chain data unavailable: all endpoints exhausted")]
    Unavailable,

    #[error("no active wallet session")]
    NotConnected,

    #[error("total amount must be positive")]
    InvalidAmount,

    #[error("insufficient balance: need {required:.4}, have {available:.4}")]
    InsufficientBalance { required: f64, available: f64 },

    #[error("invalid recipient account name: {0:?}")]
    InvalidRecipient(String),

    /// The chain rejected the transaction for lack of CPU/NET on the
    /// signer's account. Actionable by the user (e.g. a fee sponsor),
    /// so kept separate from generic submission failures.
    #[error("insufficient network resources: {0}")]
    InsufficientResources(String),

    #[error("transaction failed: {0}")]
    Submission(String),

    #[error("signing provider error: {0}")]
    Provider(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        Error::Provider(err.to_string())
    }
}
