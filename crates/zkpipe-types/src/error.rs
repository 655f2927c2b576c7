// Configuration errors. Each validator check has its own variant so a
// rejected config names exactly what was wrong.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown field '{0}' (expected gf2ext128, m31ext3, or fr)")]
    UnknownField(String),

    #[error("n_groups is {expected} but {actual} cpu id lists were given")]
    GroupCountMismatch { expected: usize, actual: usize },

    #[error("group {group}: expected {expected} cpu ids, got {actual}")]
    GroupSizeMismatch {
        group: usize,
        expected: usize,
        actual: usize,
    },

    #[error("group size {0} is not a nonzero power of two")]
    GroupSizeNotPowerOfTwo(usize),

    #[error("group {group}: duplicate cpu id {cpu}")]
    DuplicateCpuId { group: usize, cpu: usize },

    #[error("group {group}: cpu id {cpu} outside [0, {physical})")]
    CpuIdOutOfRange {
        group: usize,
        cpu: usize,
        physical: usize,
    },

    #[error("physical cpu count could not be determined on this host")]
    CpuCountUnknown,

    #[error("recursive aggregation requires the fr field, got {0}")]
    RecursionUnsupported(String),

    #[error("cpu id {cpu} is assigned to more than one group")]
    CpuSharedAcrossGroups { cpu: usize },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ConfigError>;
