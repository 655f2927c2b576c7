//! Run configuration: the on-disk JSON schema and the typed pieces it
//! splits into.
//!
//! One structured record, parsed and validated centrally before any side
//! effect. The JSON field names follow the external prover's conventions
//! (`mpi_size_each_group`, `fiat_shamir_hash`, …).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::field::FieldKind;

// ── Run Mode ─────────────────────────────────────────────────────────────────

/// Whether the run uses the full configured topology or is restricted to a
/// single group for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    #[default]
    Standard,
    /// Keep only the first configured group. Replaces the old process-wide
    /// DEBUG toggle that forced `n_groups = 1`.
    SingleGroupDebug,
}

// ── Topology ─────────────────────────────────────────────────────────────────

/// Process-group topology: how many groups, how many ranks each, and which
/// physical CPUs every group is pinned to.
///
/// Immutable once validated; see [`crate::validator::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub n_groups: usize,
    /// Ranks per group. Must be a nonzero power of two.
    #[serde(rename = "mpi_size_each_group")]
    pub group_size: usize,
    /// One CPU-id list per group, each of length `group_size`.
    pub cpu_ids: Vec<Vec<usize>>,
}

impl TopologyConfig {
    /// Apply a [`RunMode`] before validation.
    pub fn apply_mode(self, mode: RunMode) -> Self {
        match mode {
            RunMode::Standard => self,
            RunMode::SingleGroupDebug => self.restricted_to_single_group(),
        }
    }

    /// Keep only the first group's CPU assignment.
    pub fn restricted_to_single_group(mut self) -> Self {
        self.cpu_ids.truncate(1);
        self.n_groups = self.cpu_ids.len();
        self
    }
}

// ── Proof configuration ──────────────────────────────────────────────────────

/// What to prove and where the artifacts go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofConfig {
    pub field: FieldKind,
    pub circuit_path: PathBuf,
    pub witness_path: PathBuf,
    /// Per-group artifact paths are derived from this template by appending
    /// a group-identifying CPU suffix, so concurrent groups never collide.
    pub proof_output_template: PathBuf,
    /// Fiat-Shamir hash selector passed to the external prover.
    pub fs_hash_scheme: Option<String>,
    /// Polynomial commitment scheme selector passed to the external prover.
    pub pcs_scheme: Option<String>,
    /// Run the recursive-aggregation stage after verification.
    pub recursion: bool,
}

impl ProofConfig {
    /// External prover's own default: SHA256.
    pub fn fs_hash(&self) -> &str {
        self.fs_hash_scheme.as_deref().unwrap_or("SHA256")
    }

    /// External prover's own default: Raw.
    pub fn pcs(&self) -> &str {
        self.pcs_scheme.as_deref().unwrap_or("Raw")
    }
}

// ── Worker binaries ──────────────────────────────────────────────────────────

/// Locations of the external binaries the pipeline drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerBinaries {
    /// The prove/verify executable.
    pub prover: PathBuf,
    /// The recursive-aggregation executable (a second proof system).
    pub recursion_aggregator: PathBuf,
    /// Working directory the aggregator runs in; artifact paths are passed
    /// relative to its parent.
    pub recursion_dir: PathBuf,
}

impl Default for WorkerBinaries {
    fn default() -> Self {
        Self {
            prover: PathBuf::from("target/release/gkr-exec"),
            recursion_aggregator: PathBuf::from("gkr-recursion"),
            recursion_dir: PathBuf::from("recursion"),
        }
    }
}

// ── On-disk schema ───────────────────────────────────────────────────────────

/// The JSON run-config file, combining topology, proof inputs, and worker
/// binary locations.
///
/// ```json
/// { "field": "fr",
///   "n_groups": 2,
///   "mpi_size_each_group": 8,
///   "cpu_ids": [[0,1,2,3,4,5,6,7],[8,9,10,11,12,13,14,15]],
///   "circuit_file": "data/circuit.txt",
///   "witness_file": "data/witness.txt",
///   "proof_output": "data/gkr_proof.txt",
///   "recursion": true }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfigFile {
    pub field: FieldKind,
    pub n_groups: usize,
    pub mpi_size_each_group: usize,
    pub cpu_ids: Vec<Vec<usize>>,

    pub circuit_file: PathBuf,
    pub witness_file: PathBuf,
    pub proof_output: PathBuf,
    #[serde(default)]
    pub fiat_shamir_hash: Option<String>,
    #[serde(default)]
    pub poly_commitment_scheme: Option<String>,
    #[serde(default)]
    pub recursion: bool,

    #[serde(default)]
    pub binaries: Option<WorkerBinaries>,
}

impl RunConfigFile {
    /// Split into the typed topology and proof configurations.
    pub fn split(self) -> (TopologyConfig, ProofConfig, WorkerBinaries) {
        let topology = TopologyConfig {
            n_groups: self.n_groups,
            group_size: self.mpi_size_each_group,
            cpu_ids: self.cpu_ids,
        };
        let proof = ProofConfig {
            field: self.field,
            circuit_path: self.circuit_file,
            witness_path: self.witness_file,
            proof_output_template: self.proof_output,
            fs_hash_scheme: self.fiat_shamir_hash,
            pcs_scheme: self.poly_commitment_scheme,
            recursion: self.recursion,
        };
        (topology, proof, self.binaries.unwrap_or_default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "field": "fr",
        "n_groups": 2,
        "mpi_size_each_group": 8,
        "cpu_ids": [[0,1,2,3,4,5,6,7],[8,9,10,11,12,13,14,15]],
        "circuit_file": "data/circuit_bn254.txt",
        "witness_file": "data/witness_bn254.txt",
        "proof_output": "data/bn254_gkr_proof.txt",
        "fiat_shamir_hash": "MiMC5",
        "poly_commitment_scheme": "Raw",
        "recursion": true
    }"#;

    #[test]
    fn full_config_deserializes_and_splits() {
        let file: RunConfigFile = serde_json::from_str(FULL).unwrap();
        let (topology, proof, binaries) = file.split();

        assert_eq!(topology.n_groups, 2);
        assert_eq!(topology.group_size, 8);
        assert_eq!(topology.cpu_ids[1], vec![8, 9, 10, 11, 12, 13, 14, 15]);

        assert_eq!(proof.field, FieldKind::Fr);
        assert_eq!(proof.fs_hash(), "MiMC5");
        assert!(proof.recursion);

        assert_eq!(binaries, WorkerBinaries::default());
    }

    #[test]
    fn scheme_selectors_default() {
        let minimal = r#"{
            "field": "m31ext3",
            "n_groups": 1,
            "mpi_size_each_group": 2,
            "cpu_ids": [[0,1]],
            "circuit_file": "c.txt",
            "witness_file": "w.txt",
            "proof_output": "p.txt"
        }"#;
        let file: RunConfigFile = serde_json::from_str(minimal).unwrap();
        let (_, proof, _) = file.split();
        assert_eq!(proof.fs_hash(), "SHA256");
        assert_eq!(proof.pcs(), "Raw");
        assert!(!proof.recursion);
    }

    #[test]
    fn unknown_field_fails_to_parse() {
        let bad = r#"{
            "field": "bls377",
            "n_groups": 1,
            "mpi_size_each_group": 2,
            "cpu_ids": [[0,1]],
            "circuit_file": "c.txt",
            "witness_file": "w.txt",
            "proof_output": "p.txt"
        }"#;
        assert!(serde_json::from_str::<RunConfigFile>(bad).is_err());
    }

    #[test]
    fn single_group_debug_keeps_first_group() {
        let topology = TopologyConfig {
            n_groups: 2,
            group_size: 2,
            cpu_ids: vec![vec![0, 1], vec![2, 3]],
        };
        let restricted = topology.apply_mode(RunMode::SingleGroupDebug);
        assert_eq!(restricted.n_groups, 1);
        assert_eq!(restricted.cpu_ids, vec![vec![0, 1]]);
    }

    #[test]
    fn standard_mode_is_identity() {
        let topology = TopologyConfig {
            n_groups: 2,
            group_size: 2,
            cpu_ids: vec![vec![0, 1], vec![2, 3]],
        };
        assert_eq!(topology.clone().apply_mode(RunMode::Standard), topology);
    }
}
