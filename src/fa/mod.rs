//! C3: the finite-automaton kernel — DFA/NFA/ε-NFA data model, recognition,
//! ε-closure, subset construction, Hopcroft minimization, and the language
//! operations of §4.2.

pub mod closure;
pub mod minimize;
pub mod ops;
pub mod subset;
pub mod types;

pub use closure::{accepts, epsilon_closure};
pub use minimize::{minimize, prune_unreachable};
pub use subset::subset_construct;
pub use types::{build_fa, Edge, Fa, Flavor};
