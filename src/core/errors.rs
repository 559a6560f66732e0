use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Invalid key pair: {0}")]
    InvalidKeyPair(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Exchange rejected {method}: {}", codes.join(", "))]
    ExchangeApi {
        codes: Vec<String>,
        method: String,
        request_body: String,
    },

    #[error("Unknown exchange error for {method}: {errors:?}")]
    UnknownExchange {
        errors: Vec<String>,
        method: String,
        request_body: String,
    },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Other error: {0}")]
    Other(String),
}

impl ExchangeError {
    /// Whether another attempt of the same request could succeed.
    ///
    /// Only transient transport failures qualify; exchange-level rejections
    /// are deterministic for a given request.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Failure of a single HTTP attempt.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("network error: {0}")]
    Network(String),

    /// The request could not be built, e.g. a malformed URL
    #[error("invalid request: {0}")]
    Request(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connect(_) | Self::Network(_) => true,
            Self::Request(_) => false,
            Self::Status { status, .. } => *status >= 500 || *status == 408 || *status == 429,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Self::Request(e.to_string())
        } else if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
