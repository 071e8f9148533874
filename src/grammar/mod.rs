//! C6: context-free grammars — the `(V, T, P, S)` data model, the
//! normalization pipeline to CNF/GNF, and the bounded ambiguity checker.

pub mod ambiguity;
pub mod cnf;
pub mod gnf;
pub mod normalize;
pub mod types;

pub use ambiguity::{check as check_ambiguity, AmbiguityReport};
pub use cnf::to_cnf;
pub use gnf::to_gnf;
pub use normalize::{eliminate_epsilon, eliminate_unit, prune_unproductive, prune_unreachable};
pub use types::{build_cfg, Cfg, Form, Production};
