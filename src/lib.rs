/*!
A library for the classical hierarchy of abstract machines — finite
automata, pushdown automata, and Turing machines — as a coherent,
interoperable collection of recognizers, converters, and analyzers.

## Features
- [Finite-automaton kernel](fa): DFA / NFA / ε-NFA recognition, ε-closure,
  subset construction, Hopcroft minimization, and the standard language
  operations (union, intersection, complement, concatenation, Kleene star,
  homomorphism).
- [Regex front-end](regex): parsing, Thompson construction into an ε-NFA,
  and the inverse direction — automaton to regex by state elimination.
- [Pushdown kernel](pda): DPDA/NPDA simulation with bounded configuration
  exploration and a hash-consed persistent stack.
- [Grammar engine](grammar): the `(V, T, P, S)` context-free model, plus
  ε-production/unit-production/unreachable/nonproductive elimination, CNF,
  GNF, and left-recursion elimination.
- [Recognizers](recognize): CYK over CNF and Earley over any CFG, both
  producing a shared packed parse forest.
- [Pushdown ↔ grammar bridge](bridge): PDA↔CFG conversions and
  stack-symbol minimization.
- [Turing kernel](turing): DTM/NTM/multi-tape simulation with a shared step
  model, NTM→DTM dovetailed simulation, and multi-tape→single-tape track
  encoding.

Cross-cutting: a [partition-refinement engine](partition) backing DFA
minimization, a [complexity sampler](sampler) that classifies empirical
scaling, and a [content-addressed conversion cache](cache).

## Crate features
*/
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(feature = "doc", doc = document_features::document_features!())]

pub mod bridge;
pub mod cache;
pub mod cancel;
pub mod config;
pub mod error;
pub mod fa;
pub mod grammar;
pub mod ids;
pub mod partition;
pub mod pda;
pub mod recognize;
pub mod regex;
pub mod sampler;
pub mod turing;
pub mod view;
