//! Language operations on PDAs (§4.4): "union, concatenation, Kleene star of
//! PDAs follow the textbook new-initial-state construction; results are
//! NPDAs even when inputs are DPDAs." All three rely on final-state
//! acceptance: a PDA never pops past the symbol it started with (no
//! transition is defined on an empty stack), so an unused bottom marker
//! buried under a sub-automaton's own stack is never disturbed by it.

use std::collections::BTreeSet;

use super::types::{build_pda, AcceptMode, Pda};
use crate::error::Result;
use crate::ids::{StateId, SymbolId};

type RawTransition = (StateId, Option<SymbolId>, SymbolId, StateId, Vec<SymbolId>);

fn offset_state(q: StateId, by: u32) -> StateId {
    StateId(q.0 + by)
}

fn disjoint_union(a: &Pda, b: &Pda) -> (u32, Vec<RawTransition>, Vec<SymbolId>, Vec<SymbolId>) {
    let state_offset = a.num_states();
    let mut input_alphabet: BTreeSet<SymbolId> = a.input_alphabet().iter().copied().collect();
    input_alphabet.extend(b.input_alphabet().iter().copied());
    let mut stack_alphabet: Vec<SymbolId> = a.stack_alphabet().to_vec();
    stack_alphabet.extend(b.stack_alphabet().iter().copied());

    let mut transitions: Vec<RawTransition> = Vec::new();
    for (q, input, z, target) in a.rules() {
        let (to, push) = target;
        transitions.push((q, input, z, *to, push.clone()));
    }
    for (q, input, z, target) in b.rules() {
        let (to, push) = target;
        transitions.push((offset_state(q, state_offset), input, z, offset_state(*to, state_offset), push.clone()));
    }
    (state_offset, transitions, input_alphabet.into_iter().collect(), stack_alphabet)
}

/// A fresh `SymbolId` guaranteed not to collide with anything already in
/// `used` — the crate-wide reserved IDs (`EPSILON`, `BLANK`) are excluded by
/// construction since ordinary alphabets never approach `u32::MAX`.
fn fresh_symbol(used: &[SymbolId]) -> SymbolId {
    let max = used.iter().map(|s| s.0).max().unwrap_or(0);
    SymbolId(max + 1)
}

/// New fresh initial state pushing either sub-automaton's own start symbol
/// on top of a fresh bottom marker, then handing control to that
/// sub-automaton's initial state.
pub fn union(a: &Pda, b: &Pda) -> Result<Pda> {
    let (state_offset, mut transitions, input_alphabet, mut stack_alphabet) = disjoint_union(a, b);
    let new_initial_stack = fresh_symbol(&stack_alphabet);
    stack_alphabet.push(new_initial_stack);
    let new_initial = StateId(a.num_states() + b.num_states());

    transitions.push((
        new_initial,
        None,
        new_initial_stack,
        a.initial(),
        vec![a.initial_stack_symbol(), new_initial_stack],
    ));
    transitions.push((
        new_initial,
        None,
        new_initial_stack,
        offset_state(b.initial(), state_offset),
        vec![b.initial_stack_symbol(), new_initial_stack],
    ));

    let finals: BTreeSet<StateId> = a
        .finals()
        .iter()
        .copied()
        .chain(b.finals().iter().map(|q| offset_state(*q, state_offset)))
        .collect();

    build_pda(
        a.num_states() + b.num_states() + 1,
        input_alphabet,
        stack_alphabet,
        transitions,
        new_initial,
        new_initial_stack,
        finals,
        AcceptMode::FinalState,
    )
}

/// From every final state of `a`, for every stack symbol `a` might have on
/// top when it gets there, push `b`'s start symbol and jump to `b`'s start
/// — preserving whatever of `a`'s stack remains beneath.
pub fn concatenation(a: &Pda, b: &Pda) -> Result<Pda> {
    let (state_offset, mut transitions, input_alphabet, stack_alphabet) = disjoint_union(a, b);
    for &f in a.finals() {
        for &s in a.stack_alphabet() {
            transitions.push((
                f,
                None,
                s,
                offset_state(b.initial(), state_offset),
                vec![b.initial_stack_symbol(), s],
            ));
        }
    }
    let finals: BTreeSet<StateId> = b.finals().iter().map(|q| offset_state(*q, state_offset)).collect();
    build_pda(
        a.num_states() + b.num_states(),
        input_alphabet,
        stack_alphabet,
        transitions,
        a.initial(),
        a.initial_stack_symbol(),
        finals,
        AcceptMode::FinalState,
    )
}

/// Fresh initial/accepting state with an ε-move into `a`'s start (covering
/// zero repetitions) and, from every final state of `a`, an ε-move back into
/// the fresh state (marking "at least one repetition complete") which in
/// turn may ε-loop back into `a`'s start again (another repetition).
pub fn kleene_star(a: &Pda) -> Result<Pda> {
    let mut stack_alphabet = a.stack_alphabet().to_vec();
    let new_bottom = fresh_symbol(&stack_alphabet);
    stack_alphabet.push(new_bottom);
    let new_state = StateId(a.num_states());

    let mut transitions: Vec<RawTransition> = Vec::new();
    for (q, input, z, target) in a.rules() {
        let (to, push) = target;
        transitions.push((q, input, z, *to, push.clone()));
    }

    transitions.push((
        new_state,
        None,
        new_bottom,
        a.initial(),
        vec![a.initial_stack_symbol(), new_bottom],
    ));
    for &f in a.finals() {
        for &s in a.stack_alphabet() {
            transitions.push((f, None, s, new_state, vec![s]));
        }
    }
    for &s in a.stack_alphabet() {
        transitions.push((new_state, None, s, a.initial(), vec![a.initial_stack_symbol(), s]));
    }
    transitions.push((new_state, None, new_bottom, a.initial(), vec![a.initial_stack_symbol(), new_bottom]));

    build_pda(
        a.num_states() + 1,
        a.input_alphabet().to_vec(),
        stack_alphabet,
        transitions,
        new_state,
        new_bottom,
        [new_state].into_iter().collect(),
        AcceptMode::FinalState,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::never;
    use crate::config::Limits;
    use crate::error::Outcome;
    use crate::pda::simulate::simulate;
    use crate::pda::types::build_dpda;

    fn sym(n: u32) -> SymbolId {
        SymbolId(n)
    }

    /// A tiny DPDA accepting exactly the one-symbol word `on`.
    fn single_symbol_pda(on: SymbolId, alphabet: Vec<SymbolId>) -> Pda {
        let z = sym(1000);
        let (q0, q1) = (StateId(0), StateId(1));
        build_dpda(
            2,
            alphabet,
            vec![z],
            vec![(q0, Some(on), z, q1, vec![z])],
            q0,
            z,
            [q1].into_iter().collect(),
            AcceptMode::FinalState,
        )
        .unwrap()
    }

    #[test]
    fn union_accepts_either_language() {
        let (a, b) = (sym(0), sym(1));
        let pa = single_symbol_pda(a, vec![a, b]);
        let pb = single_symbol_pda(b, vec![a, b]);
        let u = union(&pa, &pb).unwrap();
        let limits = Limits::default();
        let cancel = never();
        assert_eq!(simulate(&u, &[a], &limits, &cancel), Outcome::Accept);
        assert_eq!(simulate(&u, &[b], &limits, &cancel), Outcome::Accept);
        assert_eq!(simulate(&u, &[a, b], &limits, &cancel), Outcome::Reject);
    }

    #[test]
    fn concatenation_accepts_exactly_the_concatenated_word() {
        let (a, b) = (sym(0), sym(1));
        let pa = single_symbol_pda(a, vec![a, b]);
        let pb = single_symbol_pda(b, vec![a, b]);
        let cat = concatenation(&pa, &pb).unwrap();
        let limits = Limits::default();
        let cancel = never();
        assert_eq!(simulate(&cat, &[a, b], &limits, &cancel), Outcome::Accept);
        assert_eq!(simulate(&cat, &[a], &limits, &cancel), Outcome::Reject);
        assert_eq!(simulate(&cat, &[b, a], &limits, &cancel), Outcome::Reject);
    }

    #[test]
    fn kleene_star_accepts_empty_word_and_any_number_of_repetitions() {
        let a = sym(0);
        let pa = single_symbol_pda(a, vec![a]);
        let star = kleene_star(&pa).unwrap();
        let limits = Limits::default();
        let cancel = never();
        assert_eq!(simulate(&star, &[], &limits, &cancel), Outcome::Accept);
        assert_eq!(simulate(&star, &[a], &limits, &cancel), Outcome::Accept);
        assert_eq!(simulate(&star, &[a, a, a], &limits, &cancel), Outcome::Accept);
    }
}
