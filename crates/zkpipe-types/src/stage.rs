use std::fmt;

// ── Pipeline Stage ───────────────────────────────────────────────────────────

/// The ordered stages of one pipeline run.
///
/// `Recurse` only runs when recursive aggregation is configured; see
/// [`PipelineStage::sequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    /// Run the distributed prover, producing one proof artifact per group.
    Prove,
    /// Vanilla-verify every group's proof artifact.
    Verify,
    /// Aggregate each group's GKR proof into a second proof system.
    Recurse,
}

impl PipelineStage {
    /// The stage order for a run, with or without recursive aggregation.
    pub fn sequence(recursion: bool) -> &'static [PipelineStage] {
        if recursion {
            &[Self::Prove, Self::Verify, Self::Recurse]
        } else {
            &[Self::Prove, Self::Verify]
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prove => "prove",
            Self::Verify => "verify",
            Self::Recurse => "recurse",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_without_recursion() {
        assert_eq!(
            PipelineStage::sequence(false),
            &[PipelineStage::Prove, PipelineStage::Verify]
        );
    }

    #[test]
    fn sequence_with_recursion() {
        assert_eq!(
            PipelineStage::sequence(true),
            &[
                PipelineStage::Prove,
                PipelineStage::Verify,
                PipelineStage::Recurse
            ]
        );
    }

    #[test]
    fn stages_are_ordered() {
        assert!(PipelineStage::Prove < PipelineStage::Verify);
        assert!(PipelineStage::Verify < PipelineStage::Recurse);
    }
}
