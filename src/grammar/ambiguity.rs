//! Ambiguity detection (§4.5): an undecidable-admitting bounded check.
//! Generates every terminal string up to length `L`, counts distinct
//! derivations via Earley's SPPF, and reports the first ambiguous witness —
//! or `ambiguity_undetermined` if none turns up within the bound.

use crate::grammar::types::Cfg;
use crate::ids::SymbolId;
use crate::recognize::earley;

/// The outcome of a bounded ambiguity check. Never claims "unambiguous":
/// an absence of evidence within the bound is reported as `Undetermined`,
/// not as a proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AmbiguityReport {
    /// A string with more than one distinct derivation was found.
    Ambiguous { witness: Vec<SymbolId>, derivation_count: u64 },
    /// No ambiguous string was found among every string of length `<= length_bound`.
    Undetermined { length_bound: usize },
}

/// Checks `cfg` for ambiguity by enumerating every word over its terminal
/// alphabet up to `length_bound` symbols long, shortest first, and returns
/// as soon as one admits more than one derivation.
pub fn check(cfg: &Cfg, length_bound: usize) -> AmbiguityReport {
    #[cfg(feature = "log")]
    log::debug!("grammar::ambiguity::check: length_bound={length_bound}");
    let terminals: Vec<SymbolId> = cfg.terminals().iter().copied().collect();

    for len in 0..=length_bound {
        for word in words_of_length(&terminals, len) {
            if let Some(forest) = earley::recognize(cfg, &word) {
                let count = forest.derivation_count();
                if count > 1 {
                    #[cfg(feature = "log")]
                    log::trace!("grammar::ambiguity::check: witness found, |w|={len} count={count}");
                    return AmbiguityReport::Ambiguous { witness: word, derivation_count: count };
                }
            }
        }
    }
    AmbiguityReport::Undetermined { length_bound }
}

/// Every word of exactly `len` symbols drawn from `alphabet`, in
/// lexicographic order of `alphabet`'s own ordering.
fn words_of_length(alphabet: &[SymbolId], len: usize) -> Vec<Vec<SymbolId>> {
    if len == 0 {
        return vec![vec![]];
    }
    let mut out = Vec::new();
    for &first in alphabet {
        for rest in words_of_length(alphabet, len - 1) {
            let mut word = vec![first];
            word.extend(rest);
            out.push(word);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::types::build_cfg;

    fn v(n: u32) -> SymbolId {
        SymbolId(n)
    }
    fn t(n: u32) -> SymbolId {
        SymbolId(1000 + n)
    }

    #[test]
    fn detects_ambiguity_in_the_classic_expression_grammar() {
        let e = v(0);
        let (plus, n) = (t(0), t(1));
        let cfg =
            build_cfg(vec![e], vec![plus, n], vec![(e, vec![e, plus, e]), (e, vec![n])], e).unwrap();
        match check(&cfg, 5) {
            AmbiguityReport::Ambiguous { derivation_count, .. } => assert!(derivation_count > 1),
            other => panic!("expected Ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn unambiguous_grammar_is_undetermined_within_the_bound() {
        // S -> a S b | ε : every word has a unique derivation.
        let s = v(0);
        let (a, b) = (t(0), t(1));
        let cfg = build_cfg(vec![s], vec![a, b], vec![(s, vec![a, s, b]), (s, vec![])], s).unwrap();
        assert_eq!(check(&cfg, 6), AmbiguityReport::Undetermined { length_bound: 6 });
    }
}
