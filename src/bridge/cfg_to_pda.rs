//! CFG → PDA (§4.7): the single-state non-deterministic construction. The
//! result always comes out as an [`crate::pda::Determinism::NonDeterministic`]
//! NPDA — converting it onward to a DPDA (if the source language admits one)
//! is a separate, fallible step the caller opts into.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::grammar::types::Cfg;
use crate::ids::StateId;
use crate::pda::{build_pda, AcceptMode, Pda};

/// Builds a single-state NPDA that accepts by empty stack, stack alphabet
/// `V ∪ T`, initial stack symbol the grammar's start variable. One ε-rule
/// per production (expand the top variable), one input-consuming rule per
/// terminal (match and pop).
pub fn cfg_to_pda(cfg: &Cfg) -> Result<Pda> {
    #[cfg(feature = "log")]
    log::debug!("bridge::cfg_to_pda: |V|={} |P|={}", cfg.variables().len(), cfg.productions().len());

    let q0 = StateId(0);
    let input_alphabet: Vec<_> = cfg.terminals().iter().copied().collect();
    let stack_alphabet: Vec<_> =
        cfg.variables().iter().chain(cfg.terminals()).copied().collect();

    let mut transitions = Vec::new();
    for (lhs, rhs) in cfg.productions() {
        transitions.push((q0, None, *lhs, q0, rhs.clone()));
    }
    for &a in &input_alphabet {
        transitions.push((q0, Some(a), a, q0, vec![]));
    }

    build_pda(
        1,
        input_alphabet,
        stack_alphabet,
        transitions,
        q0,
        cfg.start(),
        BTreeSet::from([q0]),
        AcceptMode::EmptyStack,
    )
}
