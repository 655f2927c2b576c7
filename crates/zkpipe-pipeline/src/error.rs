#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid state transition: {from} → {to}")]
    InvalidTransition { from: String, to: String },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, PipelineError>;
