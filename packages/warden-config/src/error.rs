use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("unknown chain: {0}")]
    UnknownChain(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to parse amount: {0}")]
    InvalidAmount(String),

    #[error("{0}")]
    Other(String),
}

impl ConfigError {
    pub fn missing_env(var_name: impl Into<String>) -> Self {
        Self::MissingEnvVar(var_name.into())
    }

    pub fn unknown_chain(chain_id: impl Into<String>) -> Self {
        Self::UnknownChain(chain_id.into())
    }
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
