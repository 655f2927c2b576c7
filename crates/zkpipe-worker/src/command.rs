//! Argument-vector builders for the external prove / verify / recurse
//! binaries, and the per-group artifact naming convention.
//!
//! The external prover's flag dialect, fixed:
//!
//! ```text
//! mpiexec -cpu-set 0,1 -n 2 <prover> -f SHA256 -p Raw -c <circuit> prove  -w <witness> -o <proof>
//!                           <prover> -f SHA256 -p Raw -c <circuit> verify -w <witness> -i <proof> -m 2
//! <aggregator> groth16 --circuit-file <c> --witness-files <w> --gkr-proofs <p> --mpi-size 2
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use zkpipe_types::{PipelineStage, ProofConfig, WorkerBinaries};

// ── Worker command ───────────────────────────────────────────────────────────

/// An explicit argv for one worker process. Never passes through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory override; `None` inherits the controller's.
    pub current_dir: Option<PathBuf>,
}

impl fmt::Display for WorkerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// ── Artifact naming ──────────────────────────────────────────────────────────

/// Per-group proof artifact path: `<template>.mpi-cpus-<dash-joined ids>`.
///
/// The suffix identifies the group by its CPU set, so concurrent groups
/// never collide on output paths.
pub fn proof_artifact_path(template: &Path, cpu_ids: &[usize]) -> PathBuf {
    let joined = cpu_ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("-");
    let mut path = template.as_os_str().to_os_string();
    path.push(format!(".mpi-cpus-{joined}"));
    PathBuf::from(path)
}

// ── Command builder ──────────────────────────────────────────────────────────

/// Builds the exact command line for each stage of one group's work.
pub struct CommandBuilder<'a> {
    proof: &'a ProofConfig,
    binaries: &'a WorkerBinaries,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(proof: &'a ProofConfig, binaries: &'a WorkerBinaries) -> Self {
        Self { proof, binaries }
    }

    /// The artifact this group's Prove stage writes.
    pub fn artifact(&self, cpu_ids: &[usize]) -> PathBuf {
        proof_artifact_path(&self.proof.proof_output_template, cpu_ids)
    }

    pub fn stage_command(&self, stage: PipelineStage, cpu_ids: &[usize]) -> WorkerCommand {
        match stage {
            PipelineStage::Prove => self.prove_command(cpu_ids),
            PipelineStage::Verify => self.verify_command(cpu_ids),
            PipelineStage::Recurse => self.recurse_command(cpu_ids),
        }
    }

    /// Multi-rank prove, pinned to the group's CPU set via `mpiexec`.
    fn prove_command(&self, cpu_ids: &[usize]) -> WorkerCommand {
        let cpu_set = cpu_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let mut args = vec![
            "-cpu-set".into(),
            cpu_set,
            "-n".into(),
            cpu_ids.len().to_string(),
            self.binaries.prover.display().to_string(),
        ];
        args.extend(self.prover_flags());
        args.extend([
            "prove".into(),
            "-w".into(),
            self.proof.witness_path.display().to_string(),
            "-o".into(),
            self.artifact(cpu_ids).display().to_string(),
        ]);

        WorkerCommand {
            program: PathBuf::from("mpiexec"),
            args,
            current_dir: None,
        }
    }

    /// Single-process verify; the rank count travels as a flag instead.
    fn verify_command(&self, cpu_ids: &[usize]) -> WorkerCommand {
        let mut args = self.prover_flags();
        args.extend([
            "verify".into(),
            "-w".into(),
            self.proof.witness_path.display().to_string(),
            "-i".into(),
            self.artifact(cpu_ids).display().to_string(),
            "-m".into(),
            cpu_ids.len().to_string(),
        ]);

        WorkerCommand {
            program: self.binaries.prover.clone(),
            args,
            current_dir: None,
        }
    }

    /// GKR → Groth16 aggregation. Runs inside the recursion working
    /// directory, so input paths are rewritten relative to its parent.
    fn recurse_command(&self, cpu_ids: &[usize]) -> WorkerCommand {
        let from_recursion_dir = |p: &Path| Path::new("..").join(p).display().to_string();

        WorkerCommand {
            program: self.binaries.recursion_aggregator.clone(),
            args: vec![
                "groth16".into(),
                "--circuit-file".into(),
                from_recursion_dir(&self.proof.circuit_path),
                "--witness-files".into(),
                from_recursion_dir(&self.proof.witness_path),
                "--gkr-proofs".into(),
                from_recursion_dir(&self.artifact(cpu_ids)),
                "--mpi-size".into(),
                cpu_ids.len().to_string(),
            ],
            current_dir: Some(self.binaries.recursion_dir.clone()),
        }
    }

    /// The `-f/-p/-c` flag block shared by prove and verify.
    fn prover_flags(&self) -> Vec<String> {
        vec![
            "-f".into(),
            self.proof.fs_hash().to_string(),
            "-p".into(),
            self.proof.pcs().to_string(),
            "-c".into(),
            self.proof.circuit_path.display().to_string(),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use zkpipe_types::FieldKind;

    fn proof_config() -> ProofConfig {
        ProofConfig {
            field: FieldKind::Fr,
            circuit_path: PathBuf::from("data/circuit_bn254.txt"),
            witness_path: PathBuf::from("data/witness_bn254.txt"),
            proof_output_template: PathBuf::from("data/bn254_gkr_proof.txt"),
            fs_hash_scheme: None,
            pcs_scheme: None,
            recursion: true,
        }
    }

    #[test]
    fn artifact_suffix_joins_cpu_ids_with_dashes() {
        let first = proof_artifact_path(Path::new("data/p.txt"), &[0, 1, 2, 3, 4, 5, 6, 7]);
        let second = proof_artifact_path(Path::new("data/p.txt"), &[8, 9, 10, 11, 12, 13, 14, 15]);
        assert_eq!(first, PathBuf::from("data/p.txt.mpi-cpus-0-1-2-3-4-5-6-7"));
        assert_eq!(
            second,
            PathBuf::from("data/p.txt.mpi-cpus-8-9-10-11-12-13-14-15")
        );
        assert_ne!(first, second);
    }

    #[test]
    fn prove_command_argv() {
        let proof = proof_config();
        let binaries = WorkerBinaries::default();
        let builder = CommandBuilder::new(&proof, &binaries);

        let cmd = builder.stage_command(PipelineStage::Prove, &[0, 1]);
        assert_eq!(cmd.program, PathBuf::from("mpiexec"));
        assert_eq!(
            cmd.args,
            vec![
                "-cpu-set",
                "0,1",
                "-n",
                "2",
                "target/release/gkr-exec",
                "-f",
                "SHA256",
                "-p",
                "Raw",
                "-c",
                "data/circuit_bn254.txt",
                "prove",
                "-w",
                "data/witness_bn254.txt",
                "-o",
                "data/bn254_gkr_proof.txt.mpi-cpus-0-1",
            ]
        );
        assert!(cmd.current_dir.is_none());
    }

    #[test]
    fn verify_command_argv() {
        let proof = proof_config();
        let binaries = WorkerBinaries::default();
        let builder = CommandBuilder::new(&proof, &binaries);

        let cmd = builder.stage_command(PipelineStage::Verify, &[0, 1]);
        assert_eq!(cmd.program, PathBuf::from("target/release/gkr-exec"));
        assert_eq!(
            cmd.args,
            vec![
                "-f",
                "SHA256",
                "-p",
                "Raw",
                "-c",
                "data/circuit_bn254.txt",
                "verify",
                "-w",
                "data/witness_bn254.txt",
                "-i",
                "data/bn254_gkr_proof.txt.mpi-cpus-0-1",
                "-m",
                "2",
            ]
        );
    }

    #[test]
    fn recurse_command_runs_in_recursion_dir() {
        let proof = proof_config();
        let binaries = WorkerBinaries::default();
        let builder = CommandBuilder::new(&proof, &binaries);

        let cmd = builder.stage_command(PipelineStage::Recurse, &[0, 1]);
        assert_eq!(cmd.program, PathBuf::from("gkr-recursion"));
        assert_eq!(cmd.current_dir, Some(PathBuf::from("recursion")));
        assert_eq!(
            cmd.args,
            vec![
                "groth16",
                "--circuit-file",
                "../data/circuit_bn254.txt",
                "--witness-files",
                "../data/witness_bn254.txt",
                "--gkr-proofs",
                "../data/bn254_gkr_proof.txt.mpi-cpus-0-1",
                "--mpi-size",
                "2",
            ]
        );
    }

    #[test]
    fn scheme_selectors_flow_through() {
        let mut proof = proof_config();
        proof.fs_hash_scheme = Some("Poseidon".into());
        proof.pcs_scheme = Some("Orion".into());
        let binaries = WorkerBinaries::default();
        let builder = CommandBuilder::new(&proof, &binaries);

        let cmd = builder.stage_command(PipelineStage::Verify, &[0, 1]);
        assert_eq!(cmd.args[1], "Poseidon");
        assert_eq!(cmd.args[3], "Orion");
    }

    #[test]
    fn display_renders_full_command_line() {
        let proof = proof_config();
        let binaries = WorkerBinaries::default();
        let builder = CommandBuilder::new(&proof, &binaries);

        let rendered = builder.stage_command(PipelineStage::Prove, &[0, 1]).to_string();
        assert!(rendered.starts_with("mpiexec -cpu-set 0,1 -n 2"));
        assert!(rendered.contains("prove -w data/witness_bn254.txt"));
    }
}
