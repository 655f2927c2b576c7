//! Process-group launch and join.
//!
//! `launch` starts one OS process per group asynchronously; the CPU pinning
//! is carried by the `mpiexec -cpu-set` prefix already present in the
//! command. `join` blocks until termination and always returns a status
//! value — a worker that dies badly is an outcome, not an error, so the
//! coordinator can aggregate every group uniformly at the barrier.

use std::process::Stdio;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::command::WorkerCommand;
use crate::error::{LaunchError, Result};
use crate::status::WorkerStatus;

/// How much captured stderr to keep for diagnostics.
const STDERR_TAIL_BYTES: usize = 2048;

// ── Handle and exit ──────────────────────────────────────────────────────────

/// A launched, not-yet-joined worker process.
#[derive(Debug)]
pub struct WorkerHandle {
    group_index: usize,
    command_line: String,
    child: tokio::process::Child,
}

impl WorkerHandle {
    pub fn group_index(&self) -> usize {
        self.group_index
    }
}

/// Everything the coordinator learns from one joined worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupExit {
    pub group_index: usize,
    pub status: WorkerStatus,
    /// Last bytes of captured stderr, for the failure summary.
    pub stderr_tail: String,
}

// ── Launcher ─────────────────────────────────────────────────────────────────

/// Spawns and reaps the per-group worker processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessGroupLauncher;

impl ProcessGroupLauncher {
    pub fn new() -> Self {
        Self
    }

    /// Start the group's process without waiting for it. Spawn refusal
    /// (binary missing, permission denied) is a [`LaunchError`] carrying
    /// the group index.
    pub fn launch(&self, group_index: usize, command: &WorkerCommand) -> Result<WorkerHandle> {
        let command_line = command.to_string();
        info!(group_index, command = %command_line, "launching worker");

        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &command.current_dir {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            group_index,
            command: command_line.clone(),
            source,
        })?;

        Ok(WorkerHandle {
            group_index,
            command_line,
            child,
        })
    }

    /// Wait for termination. Never fails: collection problems fold into
    /// [`WorkerStatus::Lost`].
    pub async fn join(&self, handle: WorkerHandle) -> GroupExit {
        let WorkerHandle {
            group_index,
            command_line,
            child,
        } = handle;

        match child.wait_with_output().await {
            Ok(output) => {
                let status = WorkerStatus::from(output.status);
                let stderr_tail = tail_utf8(&output.stderr);
                debug!(group_index, %status, "worker joined");
                GroupExit {
                    group_index,
                    status,
                    stderr_tail,
                }
            }
            Err(err) => GroupExit {
                group_index,
                status: WorkerStatus::Lost(format!("waiting on `{command_line}`: {err}")),
                stderr_tail: String::new(),
            },
        }
    }
}

fn tail_utf8(bytes: &[u8]) -> String {
    let start = bytes.len().saturating_sub(STDERR_TAIL_BYTES);
    String::from_utf8_lossy(&bytes[start..]).into_owned()
}

// ── Coordinator seam ─────────────────────────────────────────────────────────

/// Launch-then-join for one group at one stage. The pipeline coordinator
/// only sees this trait; tests drive it with a recording mock.
#[async_trait]
pub trait StageRunner: Send + Sync {
    async fn run(&self, group_index: usize, command: WorkerCommand) -> Result<GroupExit>;
}

#[async_trait]
impl StageRunner for ProcessGroupLauncher {
    async fn run(&self, group_index: usize, command: WorkerCommand) -> Result<GroupExit> {
        let handle = self.launch(group_index, &command)?;
        Ok(self.join(handle).await)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn command_for(program: &str, args: &[&str]) -> WorkerCommand {
        WorkerCommand {
            program: PathBuf::from(program),
            args: args.iter().map(|s| s.to_string()).collect(),
            current_dir: None,
        }
    }

    #[tokio::test]
    async fn missing_binary_is_a_launch_error() {
        let launcher = ProcessGroupLauncher::new();
        let cmd = command_for("/nonexistent/zkpipe-test-binary", &[]);
        let err = launcher.launch(3, &cmd).unwrap_err();
        assert_eq!(err.group_index(), 3);
    }

    #[tokio::test]
    async fn join_reports_exit_code() {
        let launcher = ProcessGroupLauncher::new();
        let handle = launcher
            .launch(0, &command_for("sh", &["-c", "exit 7"]))
            .unwrap();
        let exit = launcher.join(handle).await;
        assert_eq!(exit.group_index, 0);
        assert_eq!(exit.status, WorkerStatus::Exited(7));
    }

    #[tokio::test]
    async fn join_captures_stderr_tail() {
        let launcher = ProcessGroupLauncher::new();
        let handle = launcher
            .launch(0, &command_for("sh", &["-c", "echo boom >&2; exit 1"]))
            .unwrap();
        let exit = launcher.join(handle).await;
        assert_eq!(exit.status, WorkerStatus::Exited(1));
        assert!(exit.stderr_tail.contains("boom"));
    }

    #[tokio::test]
    async fn run_combines_launch_and_join() {
        let launcher = ProcessGroupLauncher::new();
        let exit = launcher
            .run(1, command_for("true", &[]))
            .await
            .unwrap();
        assert_eq!(exit.group_index, 1);
        assert!(exit.status.success());
    }
}
