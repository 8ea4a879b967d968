use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("{operation}: backend unreachable: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation}: HTTP {status}: {message}")]
    Rejected {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("{operation}: malformed response body: {reason}")]
    Malformed {
        operation: &'static str,
        reason: String,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown actor: {0}")]
    UnknownActor(String),

    #[error("invalid leave status: {0}")]
    InvalidStatus(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl VerifyError {
    /// True when the backend could not be reached at all (connect failure,
    /// timeout, broken connection), as opposed to answering with an error.
    pub fn is_transport(&self) -> bool {
        matches!(self, VerifyError::Transport { .. })
    }

    /// Server-supplied rejection message, if the backend answered non-2xx.
    pub fn rejection_message(&self) -> Option<&str> {
        match self {
            VerifyError::Rejected { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;
