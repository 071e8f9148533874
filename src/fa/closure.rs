//! ε-closure and the `accepts` contract of C3 (§4.2): O(|w|) single-trace
//! for DFA, O(|Q|²·|w|) explicit-frontier for NFA, same plus ε-closure for
//! ε-NFA.

use std::collections::BTreeSet;

use super::types::{Fa, Flavor};
use crate::ids::{StateId, SymbolId};

/// Set of all states reachable from `start` by zero or more ε-transitions.
pub fn epsilon_closure(fa: &Fa, start: &BTreeSet<StateId>) -> BTreeSet<StateId> {
    let mut closure: BTreeSet<StateId> = start.clone();
    let mut stack: Vec<StateId> = start.iter().copied().collect();
    while let Some(q) = stack.pop() {
        for next in fa.epsilon_targets(q) {
            if closure.insert(next) {
                stack.push(next);
            }
        }
    }
    closure
}

/// One frontier step: `{ δ(q, a) : q ∈ frontier }`, without ε-closing.
fn step(fa: &Fa, frontier: &BTreeSet<StateId>, a: SymbolId) -> BTreeSet<StateId> {
    let mut out = BTreeSet::new();
    for &q in frontier {
        out.extend(fa.targets(q, Some(a)));
    }
    out
}

/// `accepts(fa, w)` per §4.2. Symbols of `w` not in the declared alphabet
/// lead to rejection (frontier becomes empty), not an error, matching the
/// "non-strict mode" default of §4.2.
pub fn accepts(fa: &Fa, word: &[SymbolId]) -> bool {
    #[cfg(feature = "log")]
    log::trace!("fa::accepts: flavor={:?} |w|={}", fa.flavor(), word.len());
    match fa.flavor() {
        Flavor::Dfa => accepts_dfa(fa, word),
        Flavor::Nfa => accepts_nfa(fa, word),
        Flavor::EpsilonNfa => accepts_epsilon_nfa(fa, word),
    }
}

fn accepts_dfa(fa: &Fa, word: &[SymbolId]) -> bool {
    let mut q = fa.initial();
    for &a in word {
        let targets = fa.targets(q, Some(a));
        match targets.into_iter().next() {
            Some(next) => q = next,
            // Symbol outside the alphabet (or an incomplete DFA without a
            // sink, which `build_fa` never produces, but defend anyway).
            None => return false,
        }
    }
    fa.is_final(q)
}

fn accepts_nfa(fa: &Fa, word: &[SymbolId]) -> bool {
    let mut frontier: BTreeSet<StateId> = [fa.initial()].into_iter().collect();
    for &a in word {
        frontier = step(fa, &frontier, a);
        if frontier.is_empty() {
            return false;
        }
    }
    frontier.iter().any(|q| fa.is_final(*q))
}

fn accepts_epsilon_nfa(fa: &Fa, word: &[SymbolId]) -> bool {
    let mut frontier: BTreeSet<StateId> =
        epsilon_closure(fa, &[fa.initial()].into_iter().collect());
    for &a in word {
        let stepped = step(fa, &frontier, a);
        frontier = epsilon_closure(fa, &stepped);
        if frontier.is_empty() {
            return false;
        }
    }
    frontier.iter().any(|q| fa.is_final(*q))
}
