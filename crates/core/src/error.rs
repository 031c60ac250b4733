use thiserror::Error;

/// Failure taxonomy for the client. Transport and precondition failures may
/// be retried by re-issuing the same request; a validation failure cannot be
/// (the selection itself is invalid and must change upstream).
///
/// The type is `Clone` because a cached failure is handed to every observer
/// of the entry that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HelperError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("{kind} {value:?} is not offered by the server")]
    Validation { kind: SelectionKind, value: String },
    #[error("filename is required for analysis")]
    MissingFilename,
    #[error("io error: {0}")]
    Io(String),
    #[error("serde json error: {0}")]
    Json(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Dictionary,
    Strategy,
}

impl std::fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionKind::Dictionary => write!(f, "dictionary"),
            SelectionKind::Strategy => write!(f, "strategy"),
        }
    }
}

impl HelperError {
    pub fn transport(message: impl std::fmt::Display) -> Self {
        Self::Transport(message.to_string())
    }

    /// Whether re-issuing the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Validation { .. })
    }
}

impl From<std::io::Error> for HelperError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HelperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HelperError>;
