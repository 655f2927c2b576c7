#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("group {group_index}: failed to spawn `{command}`: {source}")]
    Spawn {
        group_index: usize,
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    pub fn group_index(&self) -> usize {
        match self {
            Self::Spawn { group_index, .. } => *group_index,
        }
    }
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, LaunchError>;
