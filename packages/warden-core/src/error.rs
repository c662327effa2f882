use thiserror::Error;

/// The main error type for warden operations.
///
/// This enum provides structured, recoverable error types that library consumers
/// can match against to handle specific error conditions.
#[derive(Error, Debug)]
pub enum WardenError {
    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] warden_config::ConfigError),

    /// Address parsing and validation
    #[error("address error: {0}")]
    Address(#[from] warden_address::AddressError),

    /// Exec payloads that could not be routed to a message builder
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Network and REST-related errors
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Transaction-related errors
    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),

    /// Generic error wrapper for compatibility with anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised while turning an exec request into a message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("operation not supported: {0}")]
    Unsupported(String),

    #[error("missing operation type")]
    MissingKind,

    #[error("invalid payload for {kind}: {reason}")]
    InvalidPayload { kind: String, reason: String },
}

/// Network and connectivity errors
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("REST request to {url} failed with status {status}: {message}")]
    Rest {
        url: String,
        status: u16,
        message: String,
    },

    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("{0}")]
    Other(String),
}

/// Transaction errors
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("failed to build transaction: {0}")]
    BuildFailed(String),

    #[error("failed to sign transaction: {0}")]
    SigningFailed(String),

    #[error("transaction broadcast failed: {0}")]
    BroadcastFailed(String),

    #[error("{0}")]
    Other(String),
}

impl DispatchError {
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::Unsupported(kind.into())
    }

    pub fn invalid_payload(kind: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidPayload {
            kind: kind.into(),
            reason: reason.to_string(),
        }
    }
}

impl NetworkError {
    pub fn rest(url: impl ToString, status: u16, message: impl Into<String>) -> Self {
        Self::Rest {
            url: url.to_string(),
            status,
            message: message.into(),
        }
    }
}

/// Type alias for Results using WardenError
pub type Result<T> = std::result::Result<T, WardenError>;
