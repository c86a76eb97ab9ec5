/// Core error type.
///
/// Adapter crates map their SDK errors into this type so the relay can handle
/// failures consistently (user-facing notice vs. log-only).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("telegram error: {0}")]
    Transport(String),

    #[error("chatgpt error: {0}")]
    Backend(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the backend rejected the stored credentials; the relay sends
    /// a dedicated notice asking the operator to refresh the token.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Error::Backend(msg) if msg.contains("session token may have expired"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
