//! PDA → CFG (§4.7): the standard triple construction. For every reachable
//! triple `(p, A, q)` a variable `[pAq]` is introduced, generating exactly
//! the strings that drive the PDA from `p` with `A` on top down to `q` with
//! `A` popped and nothing else disturbed below it.
//!
//! The triple construction is only sound over **empty-stack** acceptance:
//! `[pAq]` says nothing about a computation that reaches `q` with `A`
//! popped but other symbols still sitting below it, which is exactly what a
//! final-state PDA is allowed to do. A `AcceptMode::FinalState` input is
//! therefore first run through [`to_empty_stack`], the textbook
//! final-state-to-empty-stack construction, before the triples are built.

use std::collections::{BTreeSet, HashMap};

use crate::error::Result;
use crate::grammar::types::{build_cfg, Cfg, Production};
use crate::ids::{StateId, SymbolId};
use crate::pda::{build_pda, AcceptMode, Pda};

/// Interns `(p, A, q)` triples to fresh grammar variables, disjoint from
/// every symbol already in use by the PDA (its input and stack alphabets).
struct TripleRegistry {
    map: HashMap<(StateId, SymbolId, StateId), SymbolId>,
    next: u32,
}

impl TripleRegistry {
    fn new(pda: &Pda) -> Self {
        let base = pda
            .input_alphabet()
            .iter()
            .chain(pda.stack_alphabet())
            .map(|s| s.0)
            .max()
            .unwrap_or(0)
            + 1;
        Self { map: HashMap::new(), next: base }
    }

    fn intern(&mut self, p: StateId, a: SymbolId, q: StateId) -> SymbolId {
        *self.map.entry((p, a, q)).or_insert_with(|| {
            let id = SymbolId(self.next);
            self.next += 1;
            id
        })
    }
}

/// Converts `pda` to an equivalent CFG, `O(|Q|²·|δ|)` for transitions that
/// push at most two symbols (the PDA's own §4.4 normal form); deeper pushes
/// cost an extra `O(|Q|^(k-1))` factor per transition, `k` the push length.
pub fn pda_to_cfg(pda: &Pda) -> Result<Cfg> {
    #[cfg(feature = "log")]
    log::debug!("bridge::pda_to_cfg: |Q|={} |δ|={}", pda.num_states(), pda.rules().count());

    let converted;
    let pda: &Pda = match pda.accept_mode() {
        AcceptMode::FinalState => {
            converted = to_empty_stack(pda)?;
            &converted
        }
        AcceptMode::EmptyStack => pda,
    };

    let mut reg = TripleRegistry::new(pda);
    let mut productions: Vec<Production> = Vec::new();
    let states: Vec<StateId> = pda.states().collect();

    for (p, a, z, (&r, push)) in pda.rules() {
        let rhs_terminal: Vec<SymbolId> = a.into_iter().collect();
        if push.is_empty() {
            let lhs = reg.intern(p, z, r);
            productions.push((lhs, rhs_terminal));
            continue;
        }
        for chain in state_chains(&states, push.len() - 1) {
            // chain has push.len() - 1 intermediate states; the boundary
            // states are r (entry after the move) and the triple's own q.
            for &q in &states {
                let lhs = reg.intern(p, z, q);
                let mut rhs = rhs_terminal.clone();
                let mut left = r;
                for (i, &bi) in push.iter().enumerate() {
                    let right = if i + 1 < push.len() { chain[i] } else { q };
                    rhs.push(reg.intern(left, bi, right));
                    left = right;
                }
                productions.push((lhs, rhs));
            }
        }
    }

    let start = SymbolId(reg.next);
    reg.next += 1;
    // `pda` is empty-stack accepting at this point (original or converted by
    // `to_empty_stack` above), so every state is a valid landing state once
    // the stack is empty — §4.7's "unioned over final q ∈ F" is this set
    // specialized to the final-state case, which no longer applies here.
    let accepting: BTreeSet<StateId> = states.iter().copied().collect();
    for &q in &accepting {
        let body = reg.intern(pda.initial(), pda.initial_stack_symbol(), q);
        productions.push((start, vec![body]));
    }

    let mut variables: Vec<SymbolId> = reg.map.values().copied().collect();
    variables.push(start);
    let terminals: Vec<SymbolId> = pda.input_alphabet().to_vec();

    let cfg = build_cfg(variables, terminals, productions, start)?;
    let cfg = crate::grammar::normalize::prune_unreachable(&cfg)?;
    crate::grammar::normalize::prune_unproductive(&cfg)
}

/// Converts a final-state-accepting `pda` into an equivalent empty-stack
/// PDA (the standard construction): a fresh initial state `p₀` pushes a new
/// bottom marker `X₀` under the original start symbol and hands control to
/// the original machine unchanged; from every original final state, and
/// from every stack symbol that might be on top there, an ε-move drops into
/// a fresh drain state that ε-pops one symbol at a time — including `X₀`
/// itself — until the stack is genuinely empty. A computation that reaches
/// a final state therefore always has a path to empty stack, and the
/// converted machine never empties its stack any other way (the original
/// machine's own transitions are never defined on `X₀`, so it cannot reach
/// past its own bottom `Z₀` on its own).
fn to_empty_stack(pda: &Pda) -> Result<Pda> {
    if pda.accept_mode() == AcceptMode::EmptyStack {
        return Ok(pda.clone());
    }

    let bottom = fresh_symbol(pda.stack_alphabet());
    let mut stack_alphabet = pda.stack_alphabet().to_vec();
    stack_alphabet.push(bottom);

    let new_initial = StateId(pda.num_states());
    let drain = StateId(pda.num_states() + 1);

    let mut transitions: Vec<(StateId, Option<SymbolId>, SymbolId, StateId, Vec<SymbolId>)> = pda
        .rules()
        .map(|(q, a, z, (to, push))| (q, a, z, *to, push.clone()))
        .collect();

    transitions.push((
        new_initial,
        None,
        bottom,
        pda.initial(),
        vec![pda.initial_stack_symbol(), bottom],
    ));
    for &f in pda.finals() {
        for &s in &stack_alphabet {
            transitions.push((f, None, s, drain, vec![]));
        }
    }
    for &s in &stack_alphabet {
        transitions.push((drain, None, s, drain, vec![]));
    }

    build_pda(
        pda.num_states() + 2,
        pda.input_alphabet().to_vec(),
        stack_alphabet,
        transitions,
        new_initial,
        bottom,
        BTreeSet::new(),
        AcceptMode::EmptyStack,
    )
}

/// A fresh `SymbolId` guaranteed not to collide with any stack symbol
/// already in use.
fn fresh_symbol(stack_alphabet: &[SymbolId]) -> SymbolId {
    SymbolId(stack_alphabet.iter().map(|s| s.0).max().unwrap_or(0) + 1)
}

/// Every length-`len` sequence of states, used to range the intermediate
/// `q₁..q_{k-1}` states a multi-symbol push introduces.
fn state_chains(states: &[StateId], len: usize) -> Vec<Vec<StateId>> {
    if len == 0 {
        return vec![vec![]];
    }
    let mut out = Vec::new();
    for &s in states {
        for rest in state_chains(states, len - 1) {
            let mut chain = vec![s];
            chain.extend(rest);
            out.push(chain);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet as Bts;

    fn sym(n: u32) -> SymbolId {
        SymbolId(n)
    }

    /// `{aⁿbⁿ | n ≥ 0}` by final state: push `A` on every `a`, pop on every
    /// `b`, accept when the stack is back to bare `Z0`.
    fn anbn_pda() -> Pda {
        let (a, b) = (sym(0), sym(1));
        let (z0, sa) = (sym(100), sym(101));
        build_pda(
            1,
            vec![a, b],
            vec![z0, sa],
            vec![
                (StateId(0), Some(a), z0, StateId(0), vec![sa, z0]),
                (StateId(0), Some(a), sa, StateId(0), vec![sa, sa]),
                (StateId(0), Some(b), sa, StateId(0), vec![]),
            ],
            StateId(0),
            z0,
            Bts::from([StateId(0)]),
            AcceptMode::FinalState,
        )
        .unwrap()
    }

    #[test]
    fn pda_to_cfg_preserves_the_recognized_language_on_small_words() {
        let pda = anbn_pda();
        let cfg = pda_to_cfg(&pda).unwrap();
        let (a, b) = (sym(0), sym(1));
        assert!(crate::recognize::earley_accepts(&cfg, &[]));
        assert!(crate::recognize::earley_accepts(&cfg, &[a, b]));
        assert!(crate::recognize::earley_accepts(&cfg, &[a, a, b, b]));
        assert!(!crate::recognize::earley_accepts(&cfg, &[a, a, b]));
        assert!(!crate::recognize::earley_accepts(&cfg, &[b, a]));
    }

    /// The final-state `anbn_pda` never pops its own `Z0` — exactly the case
    /// that made the triple construction unproductive before routing
    /// final-state PDAs through `to_empty_stack` first. Simulating the
    /// converted machine directly (rather than through the CFG bridge)
    /// checks the conversion itself preserves the language.
    #[test]
    fn to_empty_stack_preserves_the_recognized_language() {
        use crate::cancel::never;
        use crate::config::Limits;

        let pda = anbn_pda();
        let converted = to_empty_stack(&pda).unwrap();
        assert_eq!(converted.accept_mode(), AcceptMode::EmptyStack);

        let (a, b) = (sym(0), sym(1));
        let limits = Limits::default();
        let cancel = never();
        for accepted in [vec![], vec![a, b], vec![a, a, b, b]] {
            assert!(crate::pda::simulate(&converted, &accepted, &limits, &cancel).is_accept());
        }
        for rejected in [vec![a, a, b], vec![b, a]] {
            assert!(!crate::pda::simulate(&converted, &rejected, &limits, &cancel).is_accept());
        }
    }
}
