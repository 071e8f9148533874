//! §EXP-3: the static size-threshold configuration that replaces the source
//! repository's adaptive/ML algorithm selection (§9). Every field here has a
//! concrete, documented default and is threaded through constructors rather
//! than read from a file — that's a collaborator's job (§1).

/// Tunables shared by the NPDA/NTM simulators, the minimizer's algorithm
/// selection, and the complexity sampler.
#[derive(bon::Builder, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits {
    /// Upper bound on simultaneously live NPDA configurations (§4.4) or NTM
    /// branches (§4.8) explored per step.
    #[builder(default = 4096)]
    pub max_branches: usize,
    /// Step budget for bounded simulation (§5, §7 `BudgetExceeded`).
    #[builder(default = 1_000_000)]
    pub max_steps: u64,
    /// `|Q|` at or above which `minimize` (C3) selects AVL-partitioned
    /// Hopcroft over a naive O(n²) equivalence-table pass (§9).
    #[builder(default = 64)]
    pub hopcroft_threshold: usize,
    /// Length bound `L` used by the ambiguity checker (C6) and by C10's
    /// conversion equivalence verification.
    #[builder(default = 6)]
    pub equivalence_sample_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits::builder().build()
    }
}

/// Input-size schedule and trial count for the complexity sampler (C11).
#[derive(bon::Builder, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleSchedule {
    #[builder(default = vec![1, 2, 4, 8, 16, 32, 64, 128])]
    pub sizes: Vec<usize>,
    #[builder(default = 5)]
    pub trials_per_size: usize,
}

impl Default for SampleSchedule {
    fn default() -> Self {
        SampleSchedule::builder().build()
    }
}
