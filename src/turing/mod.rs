//! C9: the Turing kernel — DTM/NTM/multi-tape data model, the shared tape
//! representation, and bounded simulation with a computation-tree report for
//! the non-deterministic case (§4.8).

pub mod convert;
pub mod simulate;
pub mod tape;
pub mod types;

pub use simulate::{simulate, simulate_multi_tape, simulate_report, simulate_with_steps, ComputationTreeReport};
pub use tape::Tape;
pub use types::{build_multi_tape_tm, build_tm, Determinism, Move, MultiTapeTm, Tm};
