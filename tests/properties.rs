//! Property tests for the universal invariants of §8: determinize/minimize
//! preserve language, minimization is idempotent, CNF normalization and the
//! two recognizers agree, the pushdown↔grammar bridge preserves language,
//! and product-construction intersection matches pointwise conjunction.

use proptest::prelude::*;

use machina::bridge::{cfg_to_pda, pda_to_cfg};
use machina::config::Limits;
use machina::fa::closure::accepts as fa_accepts;
use machina::fa::minimize::minimize;
use machina::fa::ops::intersection;
use machina::fa::subset::subset_construct;
use machina::fa::types::{build_fa, Flavor};
use machina::grammar::{build_cfg, to_cnf};
use machina::ids::{StateId, SymbolId};
use machina::pda::{simulate as pda_simulate, types::AcceptMode};
use machina::recognize::{earley_accepts, recognize_cyk};
use machina::regex::compile;

const A: SymbolId = SymbolId(0);
const B: SymbolId = SymbolId(1);

fn ab_word(bits: &[bool]) -> Vec<SymbolId> {
    bits.iter().map(|&bit| if bit { A } else { B }).collect()
}

fn sample_words() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 0..8)
}

proptest! {
    /// `accepts(A, w) = accepts(minimize(determinize(A)), w)` for every word.
    #[test]
    fn minimized_dfa_preserves_nfa_language(bits in sample_words()) {
        let nfa = build_fa(
            3,
            vec![A, B],
            vec![
                (StateId(0), Some(A), StateId(0)),
                (StateId(0), Some(A), StateId(1)),
                (StateId(0), Some(B), StateId(0)),
                (StateId(1), Some(B), StateId(2)),
            ],
            StateId(0),
            [StateId(2)].into_iter().collect(),
            Flavor::Nfa,
        )
        .unwrap();
        let dfa = subset_construct(&nfa).unwrap();
        let minimized = minimize(&dfa, &Limits::default()).unwrap();

        let word = ab_word(&bits);
        prop_assert_eq!(fa_accepts(&nfa, &word), fa_accepts(&minimized, &word));
    }

    /// `minimize(minimize(A)) ≡ minimize(A)`: a second pass changes neither
    /// the state count nor the accepted language.
    #[test]
    fn minimize_is_idempotent(bits in sample_words()) {
        let dfa = build_fa(
            4,
            vec![A, B],
            vec![
                (StateId(0), Some(A), StateId(1)),
                (StateId(0), Some(B), StateId(0)),
                (StateId(1), Some(A), StateId(1)),
                (StateId(1), Some(B), StateId(2)),
                (StateId(2), Some(A), StateId(1)),
                (StateId(2), Some(B), StateId(3)),
                (StateId(3), Some(A), StateId(1)),
                (StateId(3), Some(B), StateId(3)),
            ],
            StateId(0),
            [StateId(3)].into_iter().collect(),
            Flavor::Dfa,
        )
        .unwrap();
        let once = minimize(&dfa, &Limits::default()).unwrap();
        let twice = minimize(&once, &Limits::default()).unwrap();
        prop_assert_eq!(once.num_states(), twice.num_states());

        let word = ab_word(&bits);
        prop_assert_eq!(fa_accepts(&once, &word), fa_accepts(&twice, &word));
    }

    /// Thompson construction followed by determinize+minimize preserves the
    /// regex's language for arbitrary words, not just the scenario examples.
    #[test]
    fn compiled_regex_language_survives_determinize_and_minimize(bits in sample_words()) {
        let (nfa, symbols) = compile("(a|b)*abb").unwrap();
        let dfa = subset_construct(&nfa).unwrap();
        let minimized = minimize(&dfa, &Limits::default()).unwrap();
        let a = symbols.get("a").unwrap();
        let b = symbols.get("b").unwrap();
        let word: Vec<SymbolId> = bits.iter().map(|&bit| if bit { a } else { b }).collect();

        prop_assert_eq!(fa_accepts(&nfa, &word), fa_accepts(&minimized, &word));
    }

    /// `L(CNF(G)) = L(G)`: CYK over the normalized grammar agrees with
    /// Earley over the original for every word.
    #[test]
    fn cnf_normalization_preserves_language(bits in sample_words()) {
        let s = SymbolId(0);
        let cfg = build_cfg(vec![s], vec![A, B], vec![(s, vec![A, s, B]), (s, vec![])], s).unwrap();
        let cnf = to_cnf(&cfg).unwrap();

        let word = ab_word(&bits);
        let cyk_accepts = recognize_cyk(&cnf, &word).unwrap().is_some();
        let earley_accepts_word = earley_accepts(&cfg, &word);
        prop_assert_eq!(cyk_accepts, earley_accepts_word);
    }

    /// The PDA↔CFG bridge round-trips a DPDA's language through
    /// `pda_to_cfg`: every word the pushdown automaton accepts is also
    /// derivable from the generated grammar, and vice versa.
    #[test]
    fn pda_to_cfg_bridge_preserves_language(n in 0usize..5) {
        let (q0, q1, q2) = (StateId(0), StateId(1), StateId(2));
        let (z0, marker) = (SymbolId(100), SymbolId(101));
        let pda = machina::pda::build_dpda(
            3,
            vec![A, B],
            vec![z0, marker],
            vec![
                (q0, Some(A), z0, q0, vec![z0, marker]),
                (q0, Some(A), marker, q0, vec![marker, marker]),
                (q0, Some(B), marker, q1, vec![]),
                (q1, Some(B), marker, q1, vec![]),
                (q1, None, z0, q2, vec![z0]),
            ],
            q0,
            z0,
            [q2].into_iter().collect(),
            AcceptMode::FinalState,
        )
        .unwrap();

        let cfg = pda_to_cfg(&pda).unwrap();
        let word: Vec<SymbolId> = std::iter::repeat(A).take(n).chain(std::iter::repeat(B).take(n)).collect();

        let pda_outcome = pda_simulate(&pda, &word, &Limits::default(), &machina::cancel::never());
        prop_assert_eq!(pda_outcome.is_accept(), earley_accepts(&cfg, &word));
    }

    /// `cfg_to_pda` then simulating accepts exactly the words the grammar
    /// derives, for a small balanced-parens-shaped grammar.
    #[test]
    fn cfg_to_pda_bridge_preserves_language(n in 0usize..5) {
        let s = SymbolId(0);
        let cfg = build_cfg(vec![s], vec![A, B], vec![(s, vec![A, s, B]), (s, vec![])], s).unwrap();
        let pda = cfg_to_pda(&cfg).unwrap();

        let word: Vec<SymbolId> = std::iter::repeat(A).take(n).chain(std::iter::repeat(B).take(n)).collect();
        let pda_outcome = pda_simulate(&pda, &word, &Limits::default(), &machina::cancel::never());
        prop_assert_eq!(pda_outcome.is_accept(), earley_accepts(&cfg, &word));
    }

    /// Product-construction intersection matches pointwise conjunction of
    /// the two component DFAs' acceptance.
    #[test]
    fn intersection_matches_pointwise_conjunction(bits in sample_words()) {
        let no_b = build_fa(
            2,
            vec![A, B],
            vec![
                (StateId(0), Some(A), StateId(0)),
                (StateId(0), Some(B), StateId(1)),
                (StateId(1), Some(A), StateId(1)),
                (StateId(1), Some(B), StateId(1)),
            ],
            StateId(0),
            [StateId(0)].into_iter().collect(),
            Flavor::Dfa,
        )
        .unwrap();
        let even_length = build_fa(
            2,
            vec![A, B],
            vec![
                (StateId(0), Some(A), StateId(1)),
                (StateId(0), Some(B), StateId(1)),
                (StateId(1), Some(A), StateId(0)),
                (StateId(1), Some(B), StateId(0)),
            ],
            StateId(0),
            [StateId(0)].into_iter().collect(),
            Flavor::Dfa,
        )
        .unwrap();

        let both = intersection(&no_b, &even_length).unwrap();
        let word = ab_word(&bits);
        let expected = fa_accepts(&no_b, &word) && fa_accepts(&even_length, &word);
        prop_assert_eq!(fa_accepts(&both, &word), expected);
    }
}
