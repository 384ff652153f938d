//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("DECODE/{0}")]
    DecodeError(String),

    #[error("SCHEMA/{0}")]
    SchemaError(String),

    #[error("RULE/{0}")]
    RuleError(String),

    #[error("EXPORT/{0}")]
    ExportError(String),

    #[error("CONFIG/{0}")]
    ConfigError(String),
}

impl ForgeError {
    /// Short category code, used by the HTTP layer as the error `code`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DecodeError(_) => "DECODE",
            Self::SchemaError(_) => "SCHEMA",
            Self::RuleError(_) => "RULE",
            Self::ExportError(_) => "EXPORT",
            Self::ConfigError(_) => "CONFIG",
        }
    }
}
