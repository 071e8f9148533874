//! The FA data model (§3.1): `(Q, Σ, δ, q₀, F, flavor)`.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::ids::{StateId, SymbolId};

/// Which of the three finite-automaton shapes a [`Fa`] instance is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Flavor {
    Dfa,
    Nfa,
    EpsilonNfa,
}

/// One `(from, symbol, to)` edge. `symbol == None` means ε and is only
/// valid when the owning automaton's flavor is [`Flavor::EpsilonNfa`].
pub type Edge = (StateId, Option<SymbolId>, StateId);

/// Finite automaton: DFA, NFA or ε-NFA, distinguished by [`Flavor`].
/// Immutable once constructed — every operation in this module returns a
/// fresh instance (§3.2).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fa {
    pub(crate) flavor: Flavor,
    pub(crate) num_states: u32,
    pub(crate) alphabet: Vec<SymbolId>,
    /// `(state, symbol-or-epsilon) -> targets`. For a completed DFA every
    /// `(q, Some(a))` with `a` in the alphabet maps to exactly one target.
    pub(crate) delta: BTreeMap<(StateId, Option<SymbolId>), BTreeSet<StateId>>,
    pub(crate) initial: StateId,
    pub(crate) finals: BTreeSet<StateId>,
}

impl Fa {
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn num_states(&self) -> u32 {
        self.num_states
    }

    pub fn states(&self) -> impl Iterator<Item = StateId> {
        (0..self.num_states).map(StateId)
    }

    pub fn alphabet(&self) -> &[SymbolId] {
        &self.alphabet
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn finals(&self) -> &BTreeSet<StateId> {
        &self.finals
    }

    pub fn is_final(&self, q: StateId) -> bool {
        self.finals.contains(&q)
    }

    /// Raw outgoing targets of `(q, symbol)`; `symbol = None` means ε.
    pub fn targets(&self, q: StateId, symbol: Option<SymbolId>) -> BTreeSet<StateId> {
        self.delta.get(&(q, symbol)).cloned().unwrap_or_default()
    }

    /// All `(symbol, target)` pairs leaving `q`, excluding ε edges.
    pub fn edges_from(&self, q: StateId) -> impl Iterator<Item = (SymbolId, StateId)> + '_ {
        self.delta
            .range((q, None)..=(q, Some(SymbolId(u32::MAX))))
            .flat_map(|(&(_, sym), targets)| {
                sym.into_iter()
                    .flat_map(move |sym| targets.iter().map(move |&t| (sym, t)))
            })
    }

    pub fn epsilon_targets(&self, q: StateId) -> BTreeSet<StateId> {
        self.targets(q, None)
    }

    /// Total number of edges, counting each `(from, symbol, to)` triple once.
    pub fn num_edges(&self) -> usize {
        self.delta.values().map(|t| t.len()).sum()
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.delta.iter().flat_map(|(&(from, sym), targets)| {
            targets.iter().map(move |&to| (from, sym, to))
        })
    }
}

/// Builds and validates an [`Fa`] from raw dense IDs (§6 `build_fa`).
///
/// `initial` must be `< num_states`; every `finals` entry and every
/// transition endpoint must reference a state `< num_states`; every
/// transition symbol (when `Some`) must be a member of `alphabet`, and `None`
/// (ε) is only legal when `flavor == EpsilonNfa`. For a [`Flavor::Dfa`],
/// missing `(q, a)` pairs are completed with an implicit sink state appended
/// after `num_states`.
pub fn build_fa(
    num_states: u32,
    alphabet: Vec<SymbolId>,
    transitions: Vec<Edge>,
    initial: StateId,
    finals: BTreeSet<StateId>,
    flavor: Flavor,
) -> Result<Fa> {
    if initial.index() as u32 >= num_states {
        return Err(Error::InvalidAutomaton {
            reason: format!("initial state {initial:?} out of range"),
        });
    }
    for &q in &finals {
        if q.index() as u32 >= num_states {
            return Err(Error::InvalidAutomaton {
                reason: format!("final state {q:?} out of range"),
            });
        }
    }
    let alphabet_set: BTreeSet<SymbolId> = alphabet.iter().copied().collect();
    let mut delta: BTreeMap<(StateId, Option<SymbolId>), BTreeSet<StateId>> = BTreeMap::new();
    for (from, sym, to) in transitions {
        if from.index() as u32 >= num_states || to.index() as u32 >= num_states {
            return Err(Error::InvalidAutomaton {
                reason: format!("transition ({from:?}, {sym:?}, {to:?}) references an undefined state"),
            });
        }
        match sym {
            Some(s) if !alphabet_set.contains(&s) => {
                return Err(Error::InvalidAutomaton {
                    reason: format!("symbol {s:?} is not in the declared alphabet"),
                });
            }
            None if flavor != Flavor::EpsilonNfa => {
                return Err(Error::InvalidAutomaton {
                    reason: "epsilon transition on a non-epsilon-NFA flavor".into(),
                });
            }
            _ => {}
        }
        delta.entry((from, sym)).or_default().insert(to);
    }

    let mut num_states = num_states;
    if flavor == Flavor::Dfa {
        for (from, sym, targets) in delta_non_epsilon_snapshot(&delta) {
            if targets.len() > 1 {
                return Err(Error::InvalidAutomaton {
                    reason: format!(
                        "state {from:?} has {} targets on symbol {sym:?}, but a DFA requires at most one",
                        targets.len()
                    ),
                });
            }
        }
        let sink = StateId(num_states);
        let mut needs_sink = false;
        for q in (0..num_states).map(StateId) {
            for &a in &alphabet {
                if delta.get(&(q, Some(a))).map_or(true, |t| t.is_empty()) {
                    needs_sink = true;
                    delta.entry((q, Some(a))).or_default().insert(sink);
                }
            }
        }
        if needs_sink {
            for &a in &alphabet {
                delta.entry((sink, Some(a))).or_default().insert(sink);
            }
            num_states += 1;
        }
    }

    Ok(Fa { flavor, num_states, alphabet, delta, initial, finals })
}

fn delta_non_epsilon_snapshot(
    delta: &BTreeMap<(StateId, Option<SymbolId>), BTreeSet<StateId>>,
) -> Vec<(StateId, SymbolId, BTreeSet<StateId>)> {
    delta
        .iter()
        .filter_map(|(&(q, sym), t)| sym.map(|s| (q, s, t.clone())))
        .collect()
}
