//! Language operations on finite automata (§4.2): `union`, `intersection`
//! (product construction), `complement` (DFA only — and in this crate every
//! [`Flavor::Dfa`] instance is complete by construction, so there is no
//! "partial DFA" ambiguity to resolve at complement time, see DESIGN.md),
//! `concatenation`, `kleene_star`, `difference`, `symmetric_difference`,
//! `power`, and the (inverse) homomorphism substitutions.

use std::collections::BTreeSet;

use super::types::{build_fa, Edge, Fa, Flavor};
use crate::error::{Error, Result};
use crate::ids::{StateId, SymbolId};

fn require_dfa(fa: &Fa, op: &str) -> Result<()> {
    if fa.flavor() != Flavor::Dfa {
        return Err(Error::InvalidAutomaton {
            reason: format!("{op} requires a completed DFA; determinize first"),
        });
    }
    Ok(())
}

fn common_alphabet(a: &Fa, b: &Fa) -> Vec<SymbolId> {
    let sa: BTreeSet<SymbolId> = a.alphabet().iter().copied().collect();
    let sb: BTreeSet<SymbolId> = b.alphabet().iter().copied().collect();
    sa.union(&sb).copied().collect()
}

/// Completes `fa` over `common`, which may be a strict superset of `fa`'s
/// own alphabet: every real state's transitions on symbols `fa` doesn't
/// declare, plus `sink` itself on every symbol in `common`, route to a
/// fresh, never-final `sink` appended one past `fa`'s own states. Without
/// this, a symbol that is only in the *other* operand's alphabet would have
/// no target at all on `fa`'s side, and the caller would have to drop the
/// whole product edge rather than correctly routing it to `fa`'s own
/// rejecting state.
fn extended_target(fa: &Fa, own_alphabet: &BTreeSet<SymbolId>, sink: StateId, state: StateId, sym: SymbolId) -> StateId {
    if state == sink {
        return sink;
    }
    if own_alphabet.contains(&sym) {
        fa.targets(state, Some(sym)).into_iter().next().unwrap_or(sink)
    } else {
        sink
    }
}

/// Product construction shared by `union` and `intersection`. `accept`
/// decides, from the pair of booleans `(a_final, b_final)`, whether the
/// product state is accepting. Both operands are completed over the
/// *union* of their alphabets before the product is taken (see
/// [`extended_target`]), so a symbol absent from one operand's own
/// alphabet still only affects that operand's half of the product —
/// `intersection` happens to be insensitive to this (a symbol either
/// operand can't follow already forces "not accepting" for that operand),
/// but `union` is not: a `b`-only symbol accepted by `b` must still accept
/// the product even though `a` has no transition of its own to offer.
fn product(a: &Fa, b: &Fa, accept: impl Fn(bool, bool) -> bool) -> Result<Fa> {
    require_dfa(a, "product construction")?;
    require_dfa(b, "product construction")?;
    let alphabet = common_alphabet(a, b);
    let a_alphabet: BTreeSet<SymbolId> = a.alphabet().iter().copied().collect();
    let b_alphabet: BTreeSet<SymbolId> = b.alphabet().iter().copied().collect();
    let (na, nb) = (a.num_states(), b.num_states());
    let (sink_a, sink_b) = (StateId(na), StateId(nb));
    let (na1, nb1) = (na + 1, nb + 1);
    let id = |pa: StateId, pb: StateId| StateId(pa.0 * nb1 + pb.0);

    let mut edges: Vec<Edge> = Vec::new();
    let mut finals = BTreeSet::new();
    for pa in (0..na1).map(StateId) {
        let a_final = pa != sink_a && a.is_final(pa);
        for pb in (0..nb1).map(StateId) {
            let b_final = pb != sink_b && b.is_final(pb);
            let from = id(pa, pb);
            if accept(a_final, b_final) {
                finals.insert(from);
            }
            for &sym in &alphabet {
                let ta = extended_target(a, &a_alphabet, sink_a, pa, sym);
                let tb = extended_target(b, &b_alphabet, sink_b, pb, sym);
                edges.push((from, Some(sym), id(ta, tb)));
            }
        }
    }
    build_fa(na1 * nb1, alphabet, edges, id(a.initial(), b.initial()), finals, Flavor::Dfa)
}

pub fn union(a: &Fa, b: &Fa) -> Result<Fa> {
    product(a, b, |fa, fb| fa || fb)
}

pub fn intersection(a: &Fa, b: &Fa) -> Result<Fa> {
    product(a, b, |fa, fb| fa && fb)
}

/// Requires a completed DFA. Every [`Flavor::Dfa`] value produced by
/// [`super::types::build_fa`] already is one (Open Question #2, resolved).
pub fn complement(a: &Fa) -> Result<Fa> {
    require_dfa(a, "complement")?;
    let finals: BTreeSet<StateId> = a.states().filter(|q| !a.is_final(*q)).collect();
    build_fa(
        a.num_states(),
        a.alphabet().to_vec(),
        a.edges().collect(),
        a.initial(),
        finals,
        Flavor::Dfa,
    )
}

pub fn difference(a: &Fa, b: &Fa) -> Result<Fa> {
    intersection(a, &complement(b)?)
}

pub fn symmetric_difference(a: &Fa, b: &Fa) -> Result<Fa> {
    difference(&union(a, b)?, &intersection(a, b)?)
}

/// Disjoint-unions the state spaces of `a` and `b`, offsetting `b`'s IDs by
/// `a.num_states()`. Returns `(offset_b, edges, alphabet)`.
fn disjoint_union(a: &Fa, b: &Fa) -> (u32, Vec<Edge>, Vec<SymbolId>) {
    let offset = a.num_states();
    let alphabet = common_alphabet(a, b);
    let mut edges: Vec<Edge> = a.edges().map(|(f, s, t)| (f, s, t)).collect();
    for (f, s, t) in b.edges() {
        edges.push((StateId(f.0 + offset), s, StateId(t.0 + offset)));
    }
    (offset, edges, alphabet)
}

/// Thompson-style concatenation: ε from every final of `a` to `initial(b)`.
/// Always returns an ε-NFA.
pub fn concatenation(a: &Fa, b: &Fa) -> Result<Fa> {
    let (offset, mut edges, alphabet) = disjoint_union(a, b);
    for f in a.finals() {
        edges.push((*f, None, StateId(b.initial().0 + offset)));
    }
    let finals: BTreeSet<StateId> = b.finals().iter().map(|q| StateId(q.0 + offset)).collect();
    build_fa(
        a.num_states() + b.num_states(),
        alphabet,
        edges,
        a.initial(),
        finals,
        Flavor::EpsilonNfa,
    )
}

/// Thompson-style Kleene star: fresh initial/accepting state with ε to the
/// old initial, and ε back from every old final to the new state.
pub fn kleene_star(a: &Fa) -> Result<Fa> {
    let new_init = StateId(a.num_states());
    let mut edges: Vec<Edge> = a.edges().collect();
    edges.push((new_init, None, a.initial()));
    for f in a.finals() {
        edges.push((*f, None, new_init));
    }
    let finals: BTreeSet<StateId> = [new_init].into_iter().collect();
    build_fa(
        a.num_states() + 1,
        a.alphabet().to_vec(),
        edges,
        new_init,
        finals,
        Flavor::EpsilonNfa,
    )
}

/// An ε-NFA accepting exactly `{ε}`, used as the base case of [`power`].
fn empty_word_automaton(alphabet: Vec<SymbolId>) -> Result<Fa> {
    build_fa(1, alphabet, vec![], StateId(0), [StateId(0)].into_iter().collect(), Flavor::EpsilonNfa)
}

/// `A^n` via binary exponentiation of [`concatenation`].
pub fn power(a: &Fa, n: u32) -> Result<Fa> {
    if n == 0 {
        return empty_word_automaton(a.alphabet().to_vec());
    }
    let mut result: Option<Fa> = None;
    let mut base = a.clone();
    let mut exp = n;
    while exp > 0 {
        if exp & 1 == 1 {
            result = Some(match result {
                Some(r) => concatenation(&r, &base)?,
                None => base.clone(),
            });
        }
        exp >>= 1;
        if exp > 0 {
            base = concatenation(&base, &base)?;
        }
    }
    Ok(result.unwrap())
}

/// Substitutes each edge labelled `a` with its image `h(a)` (possibly the
/// empty word, possibly several symbols), threading fresh intermediate
/// states when `|h(a)| != 1` (§4.2).
pub fn homomorphism(a: &Fa, h: impl Fn(SymbolId) -> Vec<SymbolId>) -> Result<Fa> {
    let mut edges: Vec<Edge> = Vec::new();
    let mut next_state = a.num_states();
    let mut new_alphabet: BTreeSet<SymbolId> = BTreeSet::new();
    for (from, sym, to) in a.edges() {
        match sym {
            None => edges.push((from, None, to)),
            Some(sym) => {
                let image = h(sym);
                new_alphabet.extend(image.iter().copied());
                if image.is_empty() {
                    edges.push((from, None, to));
                } else if image.len() == 1 {
                    edges.push((from, Some(image[0]), to));
                } else {
                    let mut cur = from;
                    for (i, &c) in image.iter().enumerate() {
                        let target = if i + 1 == image.len() { to } else { StateId(next_state) };
                        edges.push((cur, Some(c), target));
                        if i + 1 != image.len() {
                            next_state += 1;
                        }
                        cur = target;
                    }
                }
            }
        }
    }
    build_fa(
        next_state,
        new_alphabet.into_iter().collect(),
        edges,
        a.initial(),
        a.finals().clone(),
        Flavor::EpsilonNfa,
    )
}

/// `inverse_homomorphism(A, h)`: for each edge `q -a-> q'` in the *target*
/// alphabet, trace `h(a)` through `a` from `q`; if some run ends in `q'`,
/// install a direct `q -a-> q'` edge in the result.
pub fn inverse_homomorphism(
    a: &Fa,
    new_alphabet: &[SymbolId],
    h: impl Fn(SymbolId) -> Vec<SymbolId>,
) -> Result<Fa> {
    let mut edges: Vec<Edge> = Vec::new();
    for q in a.states() {
        for &sym in new_alphabet {
            let image = h(sym);
            let mut frontier: BTreeSet<StateId> = [q].into_iter().collect();
            for c in &image {
                frontier = frontier
                    .iter()
                    .flat_map(|&s| a.targets(s, Some(*c)))
                    .collect();
                if frontier.is_empty() {
                    break;
                }
            }
            for end in frontier {
                edges.push((q, Some(sym), end));
            }
        }
    }
    build_fa(
        a.num_states(),
        new_alphabet.to_vec(),
        edges,
        a.initial(),
        a.finals().clone(),
        a.flavor(),
    )
}
