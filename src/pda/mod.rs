//! C5: the pushdown kernel — PDA/DPDA/NPDA data model, bounded simulation,
//! and the union/concatenation/Kleene-star language operations of §4.4.

pub mod ops;
pub mod simulate;
pub mod stack;
pub mod types;

pub use ops::{concatenation, kleene_star, union};
pub use simulate::simulate;
pub use stack::Stack;
pub use types::{build_dpda, build_pda, AcceptMode, Determinism, Pda};
