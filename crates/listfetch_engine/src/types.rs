use std::fmt;

/// Failure of one page fetch. The controller stores it without inspecting it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The request could not be built (bad base URL, unsupported scheme).
    MalformedRequest,
    Network,
    Timeout,
    /// 4xx; the service's explanation is in [`FetchError::message`].
    Client { status: u16 },
    /// 5xx.
    Server { status: u16 },
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Body was not the expected JSON shape.
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::MalformedRequest => write!(f, "malformed request"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Client { status } => write!(f, "client error {status}"),
            FailureKind::Server { status } => write!(f, "server error {status}"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "decoding failed"),
        }
    }
}
