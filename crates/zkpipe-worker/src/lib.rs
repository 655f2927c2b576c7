//! `zkpipe-worker` — External prover invocation.
//!
//! Two halves, deliberately separate:
//!
//! - [`command`] is a pure argument-vector builder plus result interpreter.
//!   It knows the external binaries' calling conventions and nothing about
//!   processes. No shell strings anywhere, so there is nothing to quote.
//! - [`launcher`] owns process management: spawn one OS process per group
//!   (pinned to its CPU set through the `mpiexec -cpu-set` prefix baked into
//!   the command) and join it for a status value.
//!
//! The [`StageRunner`] trait is the seam the pipeline coordinator drives;
//! tests substitute a recording mock for [`ProcessGroupLauncher`].

pub mod command;
pub mod error;
pub mod launcher;
pub mod status;

// ── Public re-exports ────────────────────────────────────────────────────────

pub use command::{proof_artifact_path, CommandBuilder, WorkerCommand};
pub use error::{LaunchError, Result};
pub use launcher::{GroupExit, ProcessGroupLauncher, StageRunner, WorkerHandle};
pub use status::{stage_succeeded, WorkerStatus};
