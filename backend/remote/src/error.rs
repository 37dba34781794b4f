use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream responded with status {0}")]
    Status(u16),
}

impl RemoteError {
    /// Status code the backend answered with, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Transport(e) => e.status().map(|status| status.as_u16()),
            RemoteError::Status(code) => Some(*code),
        }
    }
}
