//! Rule errors
use forge_core::ForgeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Rule type is required")]
    MissingKind,

    #[error("Rule name is required")]
    MissingName,

    #[error("No rule with id {0}")]
    UnknownRule(String),

    #[error("Unknown rule type: {0}")]
    UnknownKind(String),

    #[error("Rule serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RuleError> for ForgeError {
    fn from(err: RuleError) -> Self {
        ForgeError::RuleError(err.to_string())
    }
}
