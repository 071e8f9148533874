//! C8: the pushdown ↔ grammar bridge — PDA → CFG, CFG → PDA, and stack-symbol
//! minimization via the C2 partition engine.

pub mod cfg_to_pda;
pub mod minimize;
pub mod pda_to_cfg;

pub use cfg_to_pda::cfg_to_pda;
pub use minimize::minimize_stack_symbols;
pub use pda_to_cfg::pda_to_cfg;
