//! Error conditions raised by the augmentation engine.

use thiserror::Error;

/// The root cause attached to engine failures. Downcast an [anyhow::Error] to
/// inspect it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AugmentError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("the policy '{0}' is not recognized")]
    UnrecognizedPolicy(String),
    #[error("no transform is available for '{0}'")]
    UnsupportedOperation(String),
}

impl AugmentError {
    pub fn invalid_argument(msg: impl ToString) -> Self {
        Self::InvalidArgument(msg.to_string())
    }
}
