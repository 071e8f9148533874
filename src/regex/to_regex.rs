//! State-elimination (§4.3 "Inverse direction"): converts an automaton into
//! an equivalent regex expression by eliminating interior states one at a
//! time, combining incoming/outgoing edges via `α·β*·γ`.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::fa::types::Fa;
use crate::ids::{StateId, SymbolId};

/// A regex expression over an automaton's symbol alphabet. `Empty` (`∅`) and
/// `Epsilon` (`ε`) are algebra elements state-elimination needs but that do
/// not appear in the surface syntax of §4.3's grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegexExpr {
    Empty,
    Epsilon,
    Symbol(SymbolId),
    Concat(Box<RegexExpr>, Box<RegexExpr>),
    Union(Box<RegexExpr>, Box<RegexExpr>),
    Star(Box<RegexExpr>),
    Question(Box<RegexExpr>),
}

/// The fixed simplification rule set of §4.3, plus the two additions
/// (`∅·α → ∅` symmetrically, `∅* → ε`) state-elimination needs to stay
/// sound when a pair of states has no self-loop or no connecting edge at
/// all — noted in DESIGN.md as a necessary extension, not a contradiction
/// of the spec's rule set.
pub fn concat(a: RegexExpr, b: RegexExpr) -> RegexExpr {
    match (a, b) {
        (RegexExpr::Epsilon, b) => b,
        (a, RegexExpr::Epsilon) => a,
        (RegexExpr::Empty, _) => RegexExpr::Empty,
        (_, RegexExpr::Empty) => RegexExpr::Empty,
        (a, b) => RegexExpr::Concat(Box::new(a), Box::new(b)),
    }
}

pub fn union(a: RegexExpr, b: RegexExpr) -> RegexExpr {
    if a == b {
        return a;
    }
    match (a, b) {
        (RegexExpr::Empty, b) => b,
        (a, RegexExpr::Empty) => a,
        (RegexExpr::Epsilon, b) if !matches!(b, RegexExpr::Question(_)) => {
            RegexExpr::Question(Box::new(b))
        }
        (a, RegexExpr::Epsilon) if !matches!(a, RegexExpr::Question(_)) => {
            RegexExpr::Question(Box::new(a))
        }
        (a, b) => RegexExpr::Union(Box::new(a), Box::new(b)),
    }
}

pub fn star(a: RegexExpr) -> RegexExpr {
    match a {
        RegexExpr::Empty | RegexExpr::Epsilon => RegexExpr::Epsilon,
        RegexExpr::Star(inner) => RegexExpr::Star(inner),
        a => RegexExpr::Star(Box::new(a)),
    }
}

/// Converts `fa` into an equivalent [`RegexExpr`] by state elimination.
pub fn state_eliminate(fa: &Fa) -> Result<RegexExpr> {
    #[cfg(feature = "log")]
    log::debug!("state_eliminate: {} states", fa.num_states());

    // Fresh start/accept sentinels, offset past the automaton's own states.
    let base = fa.num_states();
    let new_start = StateId(base);
    let new_accept = StateId(base + 1);

    let mut edges: BTreeMap<(StateId, StateId), RegexExpr> = BTreeMap::new();
    let mut add = |edges: &mut BTreeMap<(StateId, StateId), RegexExpr>,
                   from: StateId,
                   to: StateId,
                   expr: RegexExpr| {
        edges
            .entry((from, to))
            .and_modify(|e| *e = union(e.clone(), expr.clone()))
            .or_insert(expr);
    };

    add(&mut edges, new_start, fa.initial(), RegexExpr::Epsilon);
    for f in fa.finals() {
        add(&mut edges, *f, new_accept, RegexExpr::Epsilon);
    }
    for (from, sym, to) in fa.edges() {
        let expr = match sym {
            Some(s) => RegexExpr::Symbol(s),
            None => RegexExpr::Epsilon,
        };
        add(&mut edges, from, to, expr);
    }

    let mut interior: BTreeSet<StateId> = fa.states().collect();

    while !interior.is_empty() {
        let s = pick_lowest_degree(&interior, &edges);
        interior.remove(&s);

        let loop_expr = edges.remove(&(s, s));
        let star_expr = match loop_expr {
            Some(e) => star(e),
            None => RegexExpr::Epsilon,
        };

        let incoming: Vec<(StateId, RegexExpr)> = edges
            .iter()
            .filter(|(&(_, to), _)| to == s)
            .map(|(&(from, _), e)| (from, e.clone()))
            .filter(|(from, _)| *from != s)
            .collect();
        let outgoing: Vec<(StateId, RegexExpr)> = edges
            .iter()
            .filter(|(&(from, _), _)| from == s)
            .map(|(&(_, to), e)| (to, e.clone()))
            .filter(|(to, _)| *to != s)
            .collect();

        edges.retain(|&(from, to), _| from != s && to != s);

        for (p, alpha) in &incoming {
            for (q, gamma) in &outgoing {
                let expr = concat(concat(alpha.clone(), star_expr.clone()), gamma.clone());
                add(&mut edges, *p, *q, expr);
            }
        }
    }

    Ok(edges.get(&(new_start, new_accept)).cloned().unwrap_or(RegexExpr::Empty))
}

fn pick_lowest_degree(
    interior: &BTreeSet<StateId>,
    edges: &BTreeMap<(StateId, StateId), RegexExpr>,
) -> StateId {
    let mut best: Option<(usize, StateId)> = None;
    for &s in interior {
        let degree = edges
            .keys()
            .filter(|&&(from, to)| (from == s || to == s) && from != to)
            .count();
        if best.map_or(true, |(d, _)| degree < d) {
            best = Some((degree, s));
        }
    }
    best.expect("interior is non-empty").1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fa::types::{build_fa, Flavor};

    fn sym(n: u32) -> SymbolId {
        SymbolId(n)
    }

    #[test]
    fn single_symbol_automaton_round_trips_to_a_literal() {
        let a = sym(0);
        let fa = build_fa(
            2,
            vec![a],
            vec![(StateId(0), Some(a), StateId(1))],
            StateId(0),
            [StateId(1)].into_iter().collect(),
            Flavor::Nfa,
        )
        .unwrap();
        let expr = state_eliminate(&fa).unwrap();
        assert_eq!(expr, RegexExpr::Symbol(a));
    }

    #[test]
    fn star_automaton_round_trips_to_a_star() {
        let a = sym(0);
        // q0 is both initial and final, with a self loop on `a`: language a*.
        let fa = build_fa(
            1,
            vec![a],
            vec![(StateId(0), Some(a), StateId(0))],
            StateId(0),
            [StateId(0)].into_iter().collect(),
            Flavor::Nfa,
        )
        .unwrap();
        let expr = state_eliminate(&fa).unwrap();
        assert_eq!(expr, RegexExpr::Star(Box::new(RegexExpr::Symbol(a))));
    }

    #[test]
    fn unreachable_accept_round_trips_to_empty_language() {
        let a = sym(0);
        let fa = build_fa(2, vec![a], vec![], StateId(0), [StateId(1)].into_iter().collect(), Flavor::Nfa)
            .unwrap();
        let expr = state_eliminate(&fa).unwrap();
        assert_eq!(expr, RegexExpr::Empty);
    }
}
