//! The first four normalization passes of §4.5, in required order:
//! reachability prune, productivity prune, ε-production elimination,
//! unit-production elimination.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{build_cfg, Cfg, Production};
use crate::error::{Error, GrammarPhase, Result};
use crate::ids::SymbolId;

/// Removes variables (and their productions) not reachable from `S`.
pub fn prune_unreachable(cfg: &Cfg) -> Result<Cfg> {
    #[cfg(feature = "log")]
    log::trace!("grammar::prune_unreachable: |V|={}", cfg.variables().len());

    let mut reachable: BTreeSet<SymbolId> = [cfg.start()].into_iter().collect();
    let mut stack = vec![cfg.start()];
    while let Some(v) = stack.pop() {
        for rhs in cfg.productions_of(v) {
            for &s in rhs {
                if cfg.is_variable(s) && reachable.insert(s) {
                    stack.push(s);
                }
            }
        }
    }

    let variables: Vec<SymbolId> = cfg.variables().iter().copied().filter(|v| reachable.contains(v)).collect();
    let terminals: Vec<SymbolId> = cfg
        .productions()
        .iter()
        .filter(|(lhs, _)| reachable.contains(lhs))
        .flat_map(|(_, rhs)| rhs.iter().copied())
        .filter(|s| cfg.is_terminal(*s))
        .collect();
    let productions: Vec<Production> =
        cfg.productions().iter().filter(|(lhs, _)| reachable.contains(lhs)).cloned().collect();

    build_cfg(variables, terminals, productions, cfg.start()).map_err(|e| wrap(e, GrammarPhase::ReachabilityPrune))
}

/// Removes variables that derive no terminal string (least fixed point of
/// "productive"), and with them any production mentioning one.
pub fn prune_unproductive(cfg: &Cfg) -> Result<Cfg> {
    #[cfg(feature = "log")]
    log::trace!("grammar::prune_unproductive: |V|={}", cfg.variables().len());

    let mut productive: BTreeSet<SymbolId> = BTreeSet::new();
    loop {
        let mut changed = false;
        for (lhs, rhs) in cfg.productions() {
            if productive.contains(lhs) {
                continue;
            }
            if rhs.iter().all(|s| cfg.is_terminal(*s) || productive.contains(s)) {
                productive.insert(*lhs);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    if !productive.contains(&cfg.start()) {
        return Err(Error::GrammarError {
            phase: GrammarPhase::ProductivityPrune,
            detail: "start symbol derives no terminal string".into(),
        });
    }

    let variables: Vec<SymbolId> = cfg.variables().iter().copied().filter(|v| productive.contains(v)).collect();
    let productions: Vec<Production> = cfg
        .productions()
        .iter()
        .filter(|(lhs, rhs)| {
            productive.contains(lhs) && rhs.iter().all(|s| cfg.is_terminal(*s) || productive.contains(s))
        })
        .cloned()
        .collect();
    let terminals: Vec<SymbolId> =
        productions.iter().flat_map(|(_, rhs)| rhs.iter().copied()).filter(|s| cfg.is_terminal(*s)).collect();

    build_cfg(variables, terminals, productions, cfg.start()).map_err(|e| wrap(e, GrammarPhase::ProductivityPrune))
}

fn nullable_set(cfg: &Cfg) -> BTreeSet<SymbolId> {
    let mut nullable: BTreeSet<SymbolId> = BTreeSet::new();
    loop {
        let mut changed = false;
        for (lhs, rhs) in cfg.productions() {
            if nullable.contains(lhs) {
                continue;
            }
            if rhs.iter().all(|s| nullable.contains(s)) {
                nullable.insert(*lhs);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    nullable
}

/// All ways to independently delete a subset of nullable occurrences from
/// `rhs`, excluding the all-deleted (empty) result unless `rhs` itself was
/// already empty.
fn nullable_variants(rhs: &[SymbolId], nullable: &BTreeSet<SymbolId>) -> Vec<Vec<SymbolId>> {
    let nullable_positions: Vec<usize> =
        rhs.iter().enumerate().filter(|(_, s)| nullable.contains(s)).map(|(i, _)| i).collect();
    let k = nullable_positions.len();
    let mut out = BTreeSet::new();
    for mask in 0..(1u32 << k) {
        let mut variant = Vec::with_capacity(rhs.len());
        for (i, &s) in rhs.iter().enumerate() {
            let drop = nullable_positions
                .iter()
                .position(|&p| p == i)
                .map(|bit| (mask >> bit) & 1 == 1)
                .unwrap_or(false);
            if !drop {
                variant.push(s);
            }
        }
        out.insert(variant);
    }
    out.into_iter().filter(|v| !v.is_empty()).collect()
}

/// Eliminates ε-productions. `A → ε` is removed for every `A` except
/// possibly the start symbol; when the empty word is in the language, a
/// fresh start symbol `S'` is introduced with `S' → S | ε` so the original
/// start never appears on a right-hand side (§4.5 step 3).
pub fn eliminate_epsilon(cfg: &Cfg) -> Result<Cfg> {
    #[cfg(feature = "log")]
    log::trace!("grammar::eliminate_epsilon: |V|={}", cfg.variables().len());

    let nullable = nullable_set(cfg);
    let empty_word_in_language = nullable.contains(&cfg.start());

    let mut new_productions: BTreeSet<Production> = BTreeSet::new();
    for (lhs, rhs) in cfg.productions() {
        if rhs.is_empty() {
            continue;
        }
        for variant in nullable_variants(rhs, &nullable) {
            new_productions.insert((*lhs, variant));
        }
    }

    let mut variables: Vec<SymbolId> = cfg.variables().iter().copied().collect();
    let start = if empty_word_in_language {
        let fresh = cfg.fresh_symbol();
        variables.push(fresh);
        new_productions.insert((fresh, vec![cfg.start()]));
        new_productions.insert((fresh, vec![]));
        fresh
    } else {
        cfg.start()
    };

    build_cfg(variables, cfg.terminals().iter().copied().collect(), new_productions.into_iter().collect(), start)
        .map_err(|e| wrap(e, GrammarPhase::EpsilonElimination))
}

/// Eliminates unit productions `A → B` (`B` a single variable). Computes the
/// transitive closure of the unit relation, then for each `(A, B)` and each
/// non-unit `B → γ` adds `A → γ`; all unit productions are then dropped.
pub fn eliminate_unit(cfg: &Cfg) -> Result<Cfg> {
    #[cfg(feature = "log")]
    log::trace!("grammar::eliminate_unit: |V|={}", cfg.variables().len());

    let is_unit = |rhs: &[SymbolId]| rhs.len() == 1 && cfg.is_variable(rhs[0]);

    let mut closure: BTreeMap<SymbolId, BTreeSet<SymbolId>> = BTreeMap::new();
    for &v in cfg.variables() {
        closure.entry(v).or_default().insert(v);
    }
    loop {
        let mut changed = false;
        let snapshot = closure.clone();
        for (lhs, rhs) in cfg.productions() {
            if is_unit(rhs) {
                let b = rhs[0];
                if let Some(reachable_from_b) = snapshot.get(&b).cloned() {
                    let entry = closure.entry(*lhs).or_default();
                    for r in reachable_from_b {
                        changed |= entry.insert(r);
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }

    let mut new_productions: BTreeSet<Production> = BTreeSet::new();
    for (a, reachable) in &closure {
        for b in reachable {
            for (lhs, rhs) in cfg.productions() {
                if lhs == b && !is_unit(rhs) {
                    new_productions.insert((*a, rhs.clone()));
                }
            }
        }
    }

    build_cfg(
        cfg.variables().iter().copied().collect(),
        cfg.terminals().iter().copied().collect(),
        new_productions.into_iter().collect(),
        cfg.start(),
    )
    .map_err(|e| wrap(e, GrammarPhase::UnitElimination))
}

fn wrap(e: Error, phase: GrammarPhase) -> Error {
    match e {
        Error::InvalidAutomaton { reason } => Error::GrammarError { phase, detail: reason },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::types::build_cfg;

    fn v(n: u32) -> SymbolId {
        SymbolId(n)
    }
    fn t(n: u32) -> SymbolId {
        SymbolId(1000 + n)
    }

    #[test]
    fn prune_unreachable_drops_isolated_variables() {
        let (s, unused) = (v(0), v(1));
        let a = t(0);
        let cfg = build_cfg(vec![s, unused], vec![a], vec![(s, vec![a]), (unused, vec![a])], s).unwrap();
        let pruned = prune_unreachable(&cfg).unwrap();
        assert!(!pruned.variables().contains(&unused));
    }

    #[test]
    fn prune_unproductive_drops_variables_that_never_bottom_out() {
        let (s, dead) = (v(0), v(1));
        let a = t(0);
        // dead -> dead (never produces a terminal string).
        let cfg = build_cfg(vec![s, dead], vec![a], vec![(s, vec![a]), (dead, vec![dead])], s).unwrap();
        let pruned = prune_unproductive(&cfg).unwrap();
        assert!(!pruned.variables().contains(&dead));
    }

    #[test]
    fn eliminate_epsilon_preserves_empty_word_via_fresh_start() {
        // S -> a S b | ε  (spec scenario 4's grammar)
        let s = v(0);
        let (a, b) = (t(0), t(1));
        let cfg = build_cfg(vec![s], vec![a, b], vec![(s, vec![a, s, b]), (s, vec![])], s).unwrap();
        let no_eps = eliminate_epsilon(&cfg).unwrap();
        assert_ne!(no_eps.start(), s);
        assert!(no_eps.productions_of(no_eps.start()).any(|rhs| rhs.is_empty()));
        assert!(!no_eps.productions().iter().any(|(_, rhs)| rhs.is_empty() && no_eps.start() != s));
    }

    #[test]
    fn eliminate_unit_removes_all_single_variable_right_hand_sides() {
        let (s, a_var) = (v(0), v(1));
        let a = t(0);
        let cfg = build_cfg(vec![s, a_var], vec![a], vec![(s, vec![a_var]), (a_var, vec![a])], s).unwrap();
        let no_units = eliminate_unit(&cfg).unwrap();
        assert!(!no_units.productions().iter().any(|(_, rhs)| rhs.len() == 1 && no_units.is_variable(rhs[0])));
        assert!(no_units.productions_of(s).any(|rhs| rhs == [a]));
    }
}
