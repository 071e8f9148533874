//! Thompson construction (§4.3): single-entry single-exit ε-NFA fragments
//! composed inductively, `O(|regex|)` states.

use std::collections::BTreeSet;

use super::ast::Ast;
use crate::error::Result;
use crate::fa::types::{build_fa, Edge, Fa, Flavor};
use crate::ids::{InternTable, StateId, SymbolId};

#[derive(Clone, Copy)]
struct Fragment {
    start: StateId,
    accept: StateId,
}

struct Builder {
    num_states: u32,
    edges: Vec<Edge>,
    symbols: InternTable<SymbolId>,
}

impl Builder {
    fn new() -> Self {
        Self { num_states: 0, edges: Vec::new(), symbols: InternTable::new() }
    }

    fn fresh_state(&mut self) -> StateId {
        let id = StateId(self.num_states);
        self.num_states += 1;
        id
    }

    fn edge(&mut self, from: StateId, sym: Option<SymbolId>, to: StateId) {
        self.edges.push((from, sym, to));
    }

    fn literal(&mut self, c: char) -> Fragment {
        let sym = self.symbols.intern(c.to_string());
        let start = self.fresh_state();
        let accept = self.fresh_state();
        self.edge(start, Some(sym), accept);
        Fragment { start, accept }
    }

    fn concat(&mut self, parts: &[Ast]) -> Result<Fragment> {
        let mut frags: Vec<Fragment> = Vec::with_capacity(parts.len());
        for part in parts {
            frags.push(self.compile(part)?);
        }
        for w in frags.windows(2) {
            self.edge(w[0].accept, None, w[1].start);
        }
        Ok(Fragment { start: frags.first().unwrap().start, accept: frags.last().unwrap().accept })
    }

    fn union(&mut self, a: &Ast, b: &Ast) -> Result<Fragment> {
        let fa = self.compile(a)?;
        let fb = self.compile(b)?;
        let start = self.fresh_state();
        let accept = self.fresh_state();
        self.edge(start, None, fa.start);
        self.edge(start, None, fb.start);
        self.edge(fa.accept, None, accept);
        self.edge(fb.accept, None, accept);
        Ok(Fragment { start, accept })
    }

    fn star(&mut self, inner: &Ast) -> Result<Fragment> {
        let f = self.compile(inner)?;
        let start = self.fresh_state();
        let accept = self.fresh_state();
        self.edge(start, None, f.start);
        self.edge(start, None, accept);
        self.edge(f.accept, None, f.start);
        self.edge(f.accept, None, accept);
        Ok(Fragment { start, accept })
    }

    fn plus(&mut self, inner: &Ast) -> Result<Fragment> {
        let f = self.compile(inner)?;
        let accept = self.fresh_state();
        self.edge(f.accept, None, f.start);
        self.edge(f.accept, None, accept);
        Ok(Fragment { start: f.start, accept })
    }

    fn question(&mut self, inner: &Ast) -> Result<Fragment> {
        let f = self.compile(inner)?;
        let start = self.fresh_state();
        let accept = self.fresh_state();
        self.edge(start, None, f.start);
        self.edge(start, None, accept);
        self.edge(f.accept, None, accept);
        Ok(Fragment { start, accept })
    }

    fn char_class(&mut self, members: &[char]) -> Fragment {
        let start = self.fresh_state();
        let accept = self.fresh_state();
        for &c in members {
            let sym = self.symbols.intern(c.to_string());
            self.edge(start, Some(sym), accept);
        }
        Fragment { start, accept }
    }

    fn compile(&mut self, ast: &Ast) -> Result<Fragment> {
        match ast {
            Ast::Literal(c) => Ok(self.literal(*c)),
            Ast::CharClass(kind) => Ok(self.char_class(&kind.members())),
            Ast::Concat(parts) => self.concat(parts),
            Ast::Union(a, b) => self.union(a, b),
            Ast::Star(inner) => self.star(inner),
            Ast::Plus(inner) => self.plus(inner),
            Ast::Question(inner) => self.question(inner),
        }
    }
}

/// Compiles a parsed [`Ast`] into an ε-NFA. The output alphabet is exactly
/// the set of characters that appear as literals (directly, or via a
/// character class) somewhere in the pattern.
pub fn thompson_construct(ast: &Ast) -> Result<Fa> {
    #[cfg(feature = "log")]
    log::trace!("thompson_construct: {ast:?}");
    let mut builder = Builder::new();
    let frag = builder.compile(ast)?;
    let alphabet: Vec<SymbolId> = (0..builder.symbols.len() as u32).map(SymbolId).collect();
    let finals: BTreeSet<StateId> = [frag.accept].into_iter().collect();
    build_fa(builder.num_states, alphabet, builder.edges, frag.start, finals, Flavor::EpsilonNfa)
}

/// Parses `pattern` and runs [`thompson_construct`] in one step, returning
/// the ε-NFA together with the symbol table mapping the characters used to
/// their [`SymbolId`]s (needed by callers to translate haystacks to words).
pub fn compile(pattern: &str) -> Result<(Fa, InternTable<SymbolId>)> {
    let ast = super::parser::parse(pattern)?;
    let mut builder = Builder::new();
    let frag = builder.compile(&ast)?;
    let alphabet: Vec<SymbolId> = (0..builder.symbols.len() as u32).map(SymbolId).collect();
    let finals: BTreeSet<StateId> = [frag.accept].into_iter().collect();
    let fa = build_fa(builder.num_states, alphabet, builder.edges, frag.start, finals, Flavor::EpsilonNfa)?;
    Ok((fa, builder.symbols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fa::closure::accepts;
    use crate::fa::minimize::minimize;
    use crate::fa::subset::subset_construct;
    use crate::config::Limits;

    fn word(symbols: &InternTable<SymbolId>, s: &str) -> Vec<SymbolId> {
        s.chars().map(|c| symbols.get(&c.to_string()).unwrap()).collect()
    }

    #[test]
    fn spec_scenario_3_thompson_then_minimize() {
        // (a|b)*abb
        let (nfa, symbols) = compile("(a|b)*abb").unwrap();
        let dfa = subset_construct(&nfa).unwrap();
        let min = minimize(&dfa, &Limits::default()).unwrap();
        assert_eq!(min.num_states(), 4);
        assert!(accepts(&min, &word(&symbols, "abb")));
        assert!(accepts(&min, &word(&symbols, "ababb")));
        assert!(accepts(&min, &word(&symbols, "babbabb")));
        assert!(!accepts(&min, &word(&symbols, "")));
        assert!(!accepts(&min, &word(&symbols, "ab")));
        assert!(!accepts(&min, &word(&symbols, "abba")));
    }

    #[test]
    fn plus_matches_one_or_more() {
        let (nfa, symbols) = compile("a+").unwrap();
        let dfa = subset_construct(&nfa).unwrap();
        assert!(accepts(&dfa, &word(&symbols, "a")));
        assert!(accepts(&dfa, &word(&symbols, "aaaa")));
        assert!(!accepts(&dfa, &word(&symbols, "")));
    }

    #[test]
    fn question_matches_zero_or_one() {
        let (nfa, symbols) = compile("ab?").unwrap();
        let dfa = subset_construct(&nfa).unwrap();
        assert!(accepts(&dfa, &word(&symbols, "a")));
        assert!(accepts(&dfa, &word(&symbols, "ab")));
        assert!(!accepts(&dfa, &word(&symbols, "abb")));
    }

    #[test]
    fn digit_class_matches_any_digit() {
        let (nfa, symbols) = compile(r"\d\d").unwrap();
        let dfa = subset_construct(&nfa).unwrap();
        assert!(accepts(&dfa, &word(&symbols, "42")));
        assert!(!accepts(&dfa, &word(&symbols, "4")));
    }
}
