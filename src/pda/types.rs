//! The PDA data model (§3.1): `(Q, Σ, Γ, δ, q₀, Z₀, F, determinism)`.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ConflictSite, Error, Result};
use crate::ids::{StateId, SymbolId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Determinism {
    Deterministic,
    NonDeterministic,
}

/// Selected per-automaton at construction (§4.4: "an alternative 'accept by
/// empty stack' mode MAY be offered but must be selected per-automaton at
/// construction").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AcceptMode {
    FinalState,
    EmptyStack,
}

/// One `(to, push)` successor of a `(from, input-or-ε, stack-top)` rule.
/// `push[0]` becomes the new stack top, per [`super::stack::Stack`]'s
/// replacement convention.
pub type PdaTarget = (StateId, Vec<SymbolId>);

pub type PdaTransitions = BTreeMap<(StateId, Option<SymbolId>, SymbolId), BTreeSet<PdaTarget>>;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pda {
    pub(crate) determinism: Determinism,
    pub(crate) num_states: u32,
    pub(crate) input_alphabet: Vec<SymbolId>,
    pub(crate) stack_alphabet: Vec<SymbolId>,
    pub(crate) delta: PdaTransitions,
    pub(crate) initial: StateId,
    pub(crate) initial_stack_symbol: SymbolId,
    pub(crate) finals: BTreeSet<StateId>,
    pub(crate) accept_mode: AcceptMode,
}

impl Pda {
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

    pub fn stack_alphabet(&self) -> &[SymbolId] {
        &self.stack_alphabet
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn initial_stack_symbol(&self) -> SymbolId {
        self.initial_stack_symbol
    }

    pub fn finals(&self) -> &BTreeSet<StateId> {
        &self.finals
    }

    pub fn is_final(&self, q: StateId) -> bool {
        self.finals.contains(&q)
    }

    pub fn accept_mode(&self) -> AcceptMode {
        self.accept_mode
    }

    /// Successors of `(q, a, Z)`; `a = None` means the ε-rules at `(q, Z)`.
    pub fn successors(&self, q: StateId, a: Option<SymbolId>, z: SymbolId) -> &BTreeSet<PdaTarget> {
        static EMPTY: BTreeSet<PdaTarget> = BTreeSet::new();
        self.delta.get(&(q, a, z)).unwrap_or(&EMPTY)
    }

    pub fn rules(&self) -> impl Iterator<Item = (StateId, Option<SymbolId>, SymbolId, &PdaTarget)> + '_ {
        self.delta.iter().flat_map(|(&(q, a, z), targets)| {
            targets.iter().map(move |t| (q, a, z, t))
        })
    }
}

/// Builds and validates a (non-deterministic) [`Pda`] (§6 `build_pda`).
pub fn build_pda(
    num_states: u32,
    input_alphabet: Vec<SymbolId>,
    stack_alphabet: Vec<SymbolId>,
    transitions: Vec<(StateId, Option<SymbolId>, SymbolId, StateId, Vec<SymbolId>)>,
    initial: StateId,
    initial_stack_symbol: SymbolId,
    finals: BTreeSet<StateId>,
    accept_mode: AcceptMode,
) -> Result<Pda> {
    if initial.index() as u32 >= num_states {
        return Err(Error::InvalidAutomaton {
            reason: format!("initial state {initial:?} out of range"),
        });
    }
    if !stack_alphabet.contains(&initial_stack_symbol) {
        return Err(Error::InvalidAutomaton {
            reason: "initial stack symbol must be a member of the stack alphabet".into(),
        });
    }
    for &q in &finals {
        if q.index() as u32 >= num_states {
            return Err(Error::InvalidAutomaton {
                reason: format!("final state {q:?} out of range"),
            });
        }
    }
    let input_set: BTreeSet<SymbolId> = input_alphabet.iter().copied().collect();
    let stack_set: BTreeSet<SymbolId> = stack_alphabet.iter().copied().collect();

    let mut delta: PdaTransitions = BTreeMap::new();
    for (from, a, z, to, push) in transitions {
        if from.index() as u32 >= num_states || to.index() as u32 >= num_states {
            return Err(Error::InvalidAutomaton {
                reason: format!("transition from {from:?} to {to:?} references an undefined state"),
            });
        }
        if let Some(a) = a {
            if !input_set.contains(&a) {
                return Err(Error::InvalidAutomaton {
                    reason: format!("input symbol {a:?} is not in the declared alphabet"),
                });
            }
        }
        if !stack_set.contains(&z) {
            return Err(Error::InvalidAutomaton {
                reason: format!("stack symbol {z:?} read by a transition is not in the declared stack alphabet"),
            });
        }
        for &s in &push {
            if !stack_set.contains(&s) {
                return Err(Error::InvalidAutomaton {
                    reason: format!("pushed stack symbol {s:?} is not in the declared stack alphabet"),
                });
            }
        }
        delta.entry((from, a, z)).or_default().insert((to, push));
    }

    Ok(Pda {
        determinism: Determinism::NonDeterministic,
        num_states,
        input_alphabet,
        stack_alphabet,
        delta,
        initial,
        initial_stack_symbol,
        finals,
        accept_mode,
    })
}

/// Builds a [`Pda`] and statically checks the DPDA contract of §3.1/§4.4:
/// for every `(q, Z)`, either the ε-rule set is empty and each input symbol
/// has at most one rule, or there is exactly one ε-rule and no input-symbol
/// rules at all.
pub fn build_dpda(
    num_states: u32,
    input_alphabet: Vec<SymbolId>,
    stack_alphabet: Vec<SymbolId>,
    transitions: Vec<(StateId, Option<SymbolId>, SymbolId, StateId, Vec<SymbolId>)>,
    initial: StateId,
    initial_stack_symbol: SymbolId,
    finals: BTreeSet<StateId>,
    accept_mode: AcceptMode,
) -> Result<Pda> {
    let mut pda = build_pda(
        num_states,
        input_alphabet,
        stack_alphabet,
        transitions,
        initial,
        initial_stack_symbol,
        finals,
        accept_mode,
    )?;
    check_determinism(&pda)?;
    pda.determinism = Determinism::Deterministic;
    Ok(pda)
}

fn check_determinism(pda: &Pda) -> Result<()> {
    for q in pda.states() {
        for &z in &pda.stack_alphabet {
            let epsilon_count = pda.successors(q, None, z).len();
            if epsilon_count > 1 {
                return Err(Error::DeterminismConflict {
                    site: ConflictSite { state: q, symbol: None, stack_top: Some(z) },
                });
            }
            if epsilon_count == 1 {
                for &a in &pda.input_alphabet {
                    if !pda.successors(q, Some(a), z).is_empty() {
                        return Err(Error::DeterminismConflict {
                            site: ConflictSite { state: q, symbol: Some(a), stack_top: Some(z) },
                        });
                    }
                }
            } else {
                for &a in &pda.input_alphabet {
                    if pda.successors(q, Some(a), z).len() > 1 {
                        return Err(Error::DeterminismConflict {
                            site: ConflictSite { state: q, symbol: Some(a), stack_top: Some(z) },
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(n: u32) -> SymbolId {
        SymbolId(n)
    }

    #[test]
    fn build_dpda_rejects_two_epsilon_rules_at_same_state_and_top() {
        let z0 = sym(100);
        let err = build_dpda(
            1,
            vec![],
            vec![z0],
            vec![
                (StateId(0), None, z0, StateId(0), vec![z0]),
                (StateId(0), None, z0, StateId(0), vec![]),
            ],
            StateId(0),
            z0,
            BTreeSet::new(),
            AcceptMode::FinalState,
        );
        assert!(matches!(err, Err(Error::DeterminismConflict { .. })));
    }

    #[test]
    fn build_dpda_rejects_epsilon_alongside_input_rule() {
        let a = sym(0);
        let z0 = sym(100);
        let err = build_dpda(
            1,
            vec![a],
            vec![z0],
            vec![
                (StateId(0), None, z0, StateId(0), vec![z0]),
                (StateId(0), Some(a), z0, StateId(0), vec![z0]),
            ],
            StateId(0),
            z0,
            BTreeSet::new(),
            AcceptMode::FinalState,
        );
        assert!(matches!(err, Err(Error::DeterminismConflict { .. })));
    }

    #[test]
    fn build_dpda_accepts_well_formed_transitions() {
        let a = sym(0);
        let z0 = sym(100);
        let pda = build_dpda(
            1,
            vec![a],
            vec![z0],
            vec![(StateId(0), Some(a), z0, StateId(0), vec![z0])],
            StateId(0),
            z0,
            [StateId(0)].into_iter().collect(),
            AcceptMode::FinalState,
        )
        .unwrap();
        assert_eq!(pda.determinism(), Determinism::Deterministic);
    }
}
