//! The TM data model (§3.1): `(Q, Σ, Γ, δ, q₀, q_accept, q_reject, b,
//! tape_count)`, split into the single-tape [`Tm`] (DTM or NTM, selected by
//! [`Determinism`]) and [`MultiTapeTm`] (always deterministic — §4.8 only
//! defines a total/partial function for the multi-tape case).

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ConflictSite, Error, Result};
use crate::ids::{StateId, SymbolId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Determinism {
    Deterministic,
    NonDeterministic,
}

/// Head movement, `{L, R, S}` of §3.1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Move {
    L,
    R,
    S,
}

/// One outgoing alternative of `δ(q, a)`: `(weight, to, write, move)`. The
/// weight orders NTM exploration (§4.8: "each outgoing alternative carries
/// a nonnegative weight used only to order exploration") — lower weight is
/// explored first; weight never suppresses a branch, only its position in
/// the frontier.
pub type TmTarget = (u32, StateId, SymbolId, Move);

type Delta = BTreeMap<(StateId, SymbolId), BTreeSet<TmTarget>>;

/// Single-tape Turing machine. `determinism == Deterministic` statically
/// guarantees at most one target per `(q, a)`, checked at construction
/// (the DTM analogue of the DPDA determinism check, §4.1/§7).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tm {
    pub(crate) determinism: Determinism,
    pub(crate) num_states: u32,
    pub(crate) input_alphabet: Vec<SymbolId>,
    pub(crate) tape_alphabet: Vec<SymbolId>,
    pub(crate) blank: SymbolId,
    pub(crate) delta: Delta,
    pub(crate) initial: StateId,
    pub(crate) accept: StateId,
    pub(crate) reject: StateId,
}

impl Tm {
    pub fn determinism(&self) -> Determinism {
        self.determinism
    }

    pub fn num_states(&self) -> u32 {
        self.num_states
    }

    pub fn states(&self) -> impl Iterator<Item = StateId> {
        (0..self.num_states).map(StateId)
    }

    pub fn input_alphabet(&self) -> &[SymbolId] {
        &self.input_alphabet
    }

    pub fn tape_alphabet(&self) -> &[SymbolId] {
        &self.tape_alphabet
    }

    pub fn blank(&self) -> SymbolId {
        self.blank
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }

    pub fn reject(&self) -> StateId {
        self.reject
    }

    pub fn is_halting(&self, q: StateId) -> bool {
        q == self.accept || q == self.reject
    }

    /// Successors of `(q, a)` sorted ascending by weight (§4.8's exploration
    /// tie-break). For a DTM this has at most one element.
    pub fn delta_successors(&self, q: StateId, a: SymbolId) -> Vec<TmTarget> {
        self.delta.get(&(q, a)).map(|s| s.iter().copied().collect()).unwrap_or_default()
    }

    pub fn rules(&self) -> impl Iterator<Item = (StateId, SymbolId, &TmTarget)> + '_ {
        self.delta.iter().flat_map(|(&(q, a), targets)| targets.iter().map(move |t| (q, a, t)))
    }
}

/// Builds and validates a [`Tm`] (§6 `build_tm`). `transitions` are raw
/// `(from, read, to, write, move, weight)` tuples; `weight` is ignored for a
/// [`Determinism::Deterministic`] machine (only one target is legal there).
#[allow(clippy::too_many_arguments)]
pub fn build_tm(
    num_states: u32,
    input_alphabet: Vec<SymbolId>,
    tape_alphabet: Vec<SymbolId>,
    blank: SymbolId,
    transitions: Vec<(StateId, SymbolId, StateId, SymbolId, Move, u32)>,
    initial: StateId,
    accept: StateId,
    reject: StateId,
    determinism: Determinism,
) -> Result<Tm> {
    if accept == reject {
        return Err(Error::InvalidAutomaton {
            reason: "accept and reject states must differ".into(),
        });
    }
    let tape_set: BTreeSet<SymbolId> = tape_alphabet.iter().copied().collect();
    if !tape_set.contains(&blank) {
        return Err(Error::InvalidAutomaton {
            reason: format!("blank symbol {blank:?} is not in the tape alphabet"),
        });
    }
    for &a in &input_alphabet {
        if a == blank {
            return Err(Error::InvalidAutomaton {
                reason: "blank symbol may not be a member of the input alphabet".into(),
            });
        }
        if !tape_set.contains(&a) {
            return Err(Error::InvalidAutomaton {
                reason: format!("input symbol {a:?} is not in the tape alphabet"),
            });
        }
    }
    let in_range = |q: StateId| q.index() as u32 >= num_states;
    for &q in [initial, accept, reject].iter() {
        if in_range(q) {
            return Err(Error::InvalidAutomaton { reason: format!("state {q:?} out of range") });
        }
    }

    let mut delta: Delta = BTreeMap::new();
    for (from, read, to, write, mv, weight) in transitions {
        if in_range(from) || in_range(to) {
            return Err(Error::InvalidAutomaton {
                reason: format!("transition from {from:?} to {to:?} references an undefined state"),
            });
        }
        if !tape_set.contains(&read) || !tape_set.contains(&write) {
            return Err(Error::InvalidAutomaton {
                reason: format!("transition ({from:?}, {read:?}) -> ({to:?}, {write:?}) uses a symbol outside the tape alphabet"),
            });
        }
        delta.entry((from, read)).or_default().insert((weight, to, write, mv));
    }

    if determinism == Determinism::Deterministic {
        for (&(q, a), targets) in &delta {
            if targets.len() > 1 {
                return Err(Error::DeterminismConflict {
                    site: ConflictSite { state: q, symbol: Some(a), stack_top: None },
                });
            }
        }
    }

    Ok(Tm {
        determinism,
        num_states,
        input_alphabet,
        tape_alphabet,
        blank,
        delta,
        initial,
        accept,
        reject,
    })
}

/// Deterministic multi-tape machine: `δ: Q × Γᵏ → Q × Γᵏ × {L,R,S}ᵏ`, each
/// tape carrying its own alphabet and blank.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiTapeTm {
    pub(crate) num_states: u32,
    pub(crate) num_tapes: usize,
    pub(crate) tape_alphabets: Vec<Vec<SymbolId>>,
    pub(crate) blanks: Vec<SymbolId>,
    pub(crate) delta: BTreeMap<(StateId, Vec<SymbolId>), (StateId, Vec<SymbolId>, Vec<Move>)>,
    pub(crate) initial: StateId,
    pub(crate) accept: StateId,
    pub(crate) reject: StateId,
}

impl MultiTapeTm {
    pub fn num_states(&self) -> u32 {
        self.num_states
    }

    pub fn num_tapes(&self) -> usize {
        self.num_tapes
    }

    pub fn tape_alphabet(&self, tape: usize) -> &[SymbolId] {
        &self.tape_alphabets[tape]
    }

    pub fn blank(&self, tape: usize) -> SymbolId {
        self.blanks[tape]
    }

    pub fn blanks(&self) -> &[SymbolId] {
        &self.blanks
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }

    pub fn reject(&self) -> StateId {
        self.reject
    }

    pub fn step(&self, q: StateId, reads: &[SymbolId]) -> Option<(StateId, Vec<SymbolId>, Vec<Move>)> {
        self.delta.get(&(q, reads.to_vec())).cloned()
    }

    pub fn rules(&self) -> impl Iterator<Item = (StateId, &[SymbolId], &(StateId, Vec<SymbolId>, Vec<Move>))> + '_ {
        self.delta.iter().map(|(k, v)| (k.0, k.1.as_slice(), v))
    }
}

/// Builds and validates a [`MultiTapeTm`] (§6 `build_tm`'s multi-tape
/// variant, "per-tape blanks").
#[allow(clippy::too_many_arguments)]
pub fn build_multi_tape_tm(
    num_states: u32,
    tape_alphabets: Vec<Vec<SymbolId>>,
    blanks: Vec<SymbolId>,
    transitions: Vec<(StateId, Vec<SymbolId>, StateId, Vec<SymbolId>, Vec<Move>)>,
    initial: StateId,
    accept: StateId,
    reject: StateId,
) -> Result<MultiTapeTm> {
    let num_tapes = tape_alphabets.len();
    if blanks.len() != num_tapes {
        return Err(Error::InvalidAutomaton {
            reason: "one blank symbol is required per tape".into(),
        });
    }
    if accept == reject {
        return Err(Error::InvalidAutomaton {
            reason: "accept and reject states must differ".into(),
        });
    }
    for (i, alphabet) in tape_alphabets.iter().enumerate() {
        if !alphabet.contains(&blanks[i]) {
            return Err(Error::InvalidAutomaton {
                reason: format!("tape {i}'s blank {:?} is not in its own alphabet", blanks[i]),
            });
        }
    }
    let in_range = |q: StateId| q.index() as u32 >= num_states;
    for &q in [initial, accept, reject].iter() {
        if in_range(q) {
            return Err(Error::InvalidAutomaton { reason: format!("state {q:?} out of range") });
        }
    }

    let mut delta = BTreeMap::new();
    for (from, reads, to, writes, moves) in transitions {
        if in_range(from) || in_range(to) {
            return Err(Error::InvalidAutomaton {
                reason: format!("transition from {from:?} to {to:?} references an undefined state"),
            });
        }
        if reads.len() != num_tapes || writes.len() != num_tapes || moves.len() != num_tapes {
            return Err(Error::InvalidAutomaton {
                reason: format!("transition vectors must have length {num_tapes} (one per tape)"),
            });
        }
        for i in 0..num_tapes {
            if !tape_alphabets[i].contains(&reads[i]) || !tape_alphabets[i].contains(&writes[i]) {
                return Err(Error::InvalidAutomaton {
                    reason: format!("tape {i} symbol outside its declared alphabet"),
                });
            }
        }
        if delta.insert((from, reads), (to, writes, moves)).is_some() {
            return Err(Error::DeterminismConflict {
                site: ConflictSite { state: from, symbol: None, stack_top: None },
            });
        }
    }

    Ok(MultiTapeTm { num_states, num_tapes, tape_alphabets, blanks, delta, initial, accept, reject })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(n: u32) -> SymbolId {
        SymbolId(n)
    }

    #[test]
    fn build_tm_rejects_deterministic_conflict() {
        let (q0, q1, q2) = (StateId(0), StateId(1), StateId(2));
        let (blank, a) = (sym(0), sym(1));
        let err = build_tm(
            3,
            vec![a],
            vec![blank, a],
            blank,
            vec![
                (q0, a, q1, a, Move::R, 0),
                (q0, a, q2, a, Move::R, 1),
            ],
            q0,
            q1,
            q2,
            Determinism::Deterministic,
        );
        assert!(matches!(err, Err(Error::DeterminismConflict { .. })));
    }

    #[test]
    fn build_tm_rejects_blank_in_input_alphabet() {
        let (q0, q1, q2) = (StateId(0), StateId(1), StateId(2));
        let blank = sym(0);
        let err = build_tm(3, vec![blank], vec![blank], blank, vec![], q0, q1, q2, Determinism::Deterministic);
        assert!(err.is_err());
    }
}
