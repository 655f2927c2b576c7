#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the witness with HTTP 400.
    #[error("witness length rejected by prover")]
    InvalidWitnessLength,

    #[error("unexpected http status {0}")]
    UnexpectedStatus(u16),

    /// `/verify` replied with something other than the two fixed texts.
    #[error("unexpected verify reply: {0:?}")]
    UnexpectedVerifyReply(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ClientError>;
