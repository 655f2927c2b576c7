use std::fmt;
use std::path::Path;
use std::process::ExitStatus;

use zkpipe_types::PipelineStage;

// ── Worker status ────────────────────────────────────────────────────────────

/// Terminal status of one worker process. Joining never raises; every way a
/// worker can end folds into one of these values so callers aggregate
/// uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerStatus {
    /// Process terminated normally with this exit code.
    Exited(i32),
    /// Process was killed by a signal.
    Signaled,
    /// Spawn was refused; the process never started.
    SpawnFailed(String),
    /// The process started but its status could not be collected.
    Lost(String),
}

impl WorkerStatus {
    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }

    /// Exit code for aggregation: the real code when there is one, 1 for
    /// every other way a worker can die.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exited(code) => *code,
            Self::Signaled | Self::SpawnFailed(_) | Self::Lost(_) => 1,
        }
    }
}

impl From<ExitStatus> for WorkerStatus {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => Self::Exited(code),
            None => Self::Signaled,
        }
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exit {code}"),
            Self::Signaled => write!(f, "killed by signal"),
            Self::SpawnFailed(reason) => write!(f, "spawn failed: {reason}"),
            Self::Lost(reason) => write!(f, "status lost: {reason}"),
        }
    }
}

// ── Stage result interpretation ──────────────────────────────────────────────

/// Whether a stage outcome counts as success.
///
/// Prove additionally requires the declared artifact to exist afterward: an
/// exit-0 prover that wrote nothing is a failure.
pub fn stage_succeeded(
    stage: PipelineStage,
    status: &WorkerStatus,
    artifact: Option<&Path>,
) -> bool {
    if !status.success() {
        return false;
    }
    match stage {
        PipelineStage::Prove => artifact.is_some_and(Path::exists),
        PipelineStage::Verify | PipelineStage::Recurse => true,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
