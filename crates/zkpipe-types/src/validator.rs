//! Central configuration gate.
//!
//! Checks run in a fixed order and the first failure wins. Pure: nothing is
//! spawned, nothing is written. A [`ValidatedConfig`] can only be obtained
//! through [`validate`], so downstream code never re-checks.

use std::collections::HashSet;

use crate::config::{ProofConfig, TopologyConfig};
use crate::error::{ConfigError, Result};

// ── Options ──────────────────────────────────────────────────────────────────

/// Optional strictness knobs for validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOptions {
    /// Also reject CPU ids shared between groups. Off by default: the
    /// classic behavior trusts the caller-supplied disjoint assignment and
    /// only checks duplicates within a group.
    pub strict_cpu_exclusivity: bool,
}

// ── Validated config ─────────────────────────────────────────────────────────

/// Witness that a `(TopologyConfig, ProofConfig)` pair passed validation.
///
/// Fields are private; construction goes through [`validate`] only.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    topology: TopologyConfig,
    proof: ProofConfig,
}

impl ValidatedConfig {
    pub fn topology(&self) -> &TopologyConfig {
        &self.topology
    }

    pub fn proof(&self) -> &ProofConfig {
        &self.proof
    }

    pub fn n_groups(&self) -> usize {
        self.topology.n_groups
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Validate against the host's physical CPU count.
pub fn validate(
    topology: TopologyConfig,
    proof: ProofConfig,
    opts: &ValidateOptions,
) -> Result<ValidatedConfig> {
    let physical = physical_cpu_count().ok_or(ConfigError::CpuCountUnknown)?;
    validate_with_cpu_count(topology, proof, opts, physical)
}

/// Validate with an explicit physical CPU count (injectable for tests).
pub fn validate_with_cpu_count(
    topology: TopologyConfig,
    proof: ProofConfig,
    opts: &ValidateOptions,
    physical_cpus: usize,
) -> Result<ValidatedConfig> {
    // 1. Field recognition is structural: FieldKind cannot hold an unknown
    //    value. String input fails earlier, in FromStr / deserialization.

    // 2. One CPU-id list per group.
    if topology.n_groups != topology.cpu_ids.len() {
        return Err(ConfigError::GroupCountMismatch {
            expected: topology.n_groups,
            actual: topology.cpu_ids.len(),
        });
    }

    // 3. Every list has exactly group_size entries.
    for (group, ids) in topology.cpu_ids.iter().enumerate() {
        if ids.len() != topology.group_size {
            return Err(ConfigError::GroupSizeMismatch {
                group,
                expected: topology.group_size,
                actual: ids.len(),
            });
        }
    }

    // 4. Rank count must be a nonzero power of two.
    if topology.group_size == 0 || !topology.group_size.is_power_of_two() {
        return Err(ConfigError::GroupSizeNotPowerOfTwo(topology.group_size));
    }

    // 5. No duplicate CPU id within a group.
    for (group, ids) in topology.cpu_ids.iter().enumerate() {
        let mut seen = HashSet::with_capacity(ids.len());
        for &cpu in ids {
            if !seen.insert(cpu) {
                return Err(ConfigError::DuplicateCpuId { group, cpu });
            }
        }
    }

    // 6. Every CPU id lies on the host.
    for (group, ids) in topology.cpu_ids.iter().enumerate() {
        for &cpu in ids {
            if cpu >= physical_cpus {
                return Err(ConfigError::CpuIdOutOfRange {
                    group,
                    cpu,
                    physical: physical_cpus,
                });
            }
        }
    }

    // 7. Recursion backend constraint.
    if proof.recursion && !proof.field.supports_recursion() {
        return Err(ConfigError::RecursionUnsupported(
            proof.field.as_str().to_string(),
        ));
    }

    // Opt-in: cross-group exclusivity. Historically unchecked, so this only
    // runs under the strictness flag.
    if opts.strict_cpu_exclusivity {
        let mut seen = HashSet::new();
        for ids in &topology.cpu_ids {
            for &cpu in ids {
                if !seen.insert(cpu) {
                    return Err(ConfigError::CpuSharedAcrossGroups { cpu });
                }
            }
        }
    }

    Ok(ValidatedConfig { topology, proof })
}

/// Physical (not logical) core count, `None` when it cannot be determined.
pub fn physical_cpu_count() -> Option<usize> {
    match num_cpus::get_physical() {
        0 => None,
        n => Some(n),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
