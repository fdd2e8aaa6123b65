//! Error kinds raised by the request builder and response accessors.

/// Errors produced by this crate.
///
/// Functions return `anyhow::Result`; callers that need the kind can
/// recover it with `err.downcast_ref::<HttpError>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// An argument was missing or malformed. Raised before any I/O happens.
    InvalidArgument(String),
    /// The transport failed to complete the request (DNS, connect, TLS, ...).
    Request(String),
    /// The response body did not match its declared Content-Type.
    Parse(String),
}

impl HttpError {
    pub fn invalid_argument(msg: impl Into<String>) -> anyhow::Error {
        anyhow::Error::from(HttpError::InvalidArgument(msg.into()))
    }

    pub fn request(msg: impl Into<String>) -> anyhow::Error {
        anyhow::Error::from(HttpError::Request(msg.into()))
    }

    pub fn parse(msg: impl Into<String>) -> anyhow::Error {
        anyhow::Error::from(HttpError::Parse(msg.into()))
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            HttpError::Request(msg) => write!(f, "Request failed: {}", msg),
            HttpError::Parse(msg) => write!(f, "Failed to parse response content: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}
