//! Earley recognition (§4.6): `predict`/`scan`/`complete` over item sets
//! `S₀..Sₙ`, accepting any CFG (left recursion included, without special
//! casing). Parse-forest reconstruction is a second, memoized pass over the
//! same grammar and word rather than back-pointers threaded through items —
//! simpler to get right while producing the identical [`SppfNode`] shape
//! [`super::cyk`] builds.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use super::SppfNode;
use crate::grammar::types::Cfg;
use crate::ids::SymbolId;

/// `(production index, dot position, origin)`.
type Item = (usize, usize, usize);

fn productions(cfg: &Cfg) -> Vec<(SymbolId, Vec<SymbolId>)> {
    cfg.productions().to_vec()
}

/// Builds item sets `S₀..Sₙ` via predict/scan/complete.
fn earley_sets(cfg: &Cfg, word: &[SymbolId], prods: &[(SymbolId, Vec<SymbolId>)]) -> Vec<BTreeSet<Item>> {
    let n = word.len();
    let mut sets: Vec<BTreeSet<Item>> = vec![BTreeSet::new(); n + 1];

    for (p, (lhs, _)) in prods.iter().enumerate() {
        if *lhs == cfg.start() {
            sets[0].insert((p, 0, 0));
        }
    }

    for k in 0..=n {
        let mut worklist: Vec<Item> = sets[k].iter().copied().collect();
        let mut cursor = 0;
        while cursor < worklist.len() {
            let (p, dot, origin) = worklist[cursor];
            cursor += 1;
            let (lhs, rhs) = &prods[p];
            if dot == rhs.len() {
                // complete: advance every item in S_origin waiting on `lhs`.
                let waiting: Vec<Item> = sets[origin]
                    .iter()
                    .copied()
                    .filter(|&(p2, dot2, _)| prods[p2].1.get(dot2) == Some(lhs))
                    .collect();
                for (p2, dot2, origin2) in waiting {
                    let advanced = (p2, dot2 + 1, origin2);
                    if sets[k].insert(advanced) {
                        worklist.push(advanced);
                    }
                }
            } else if cfg.is_variable(rhs[dot]) {
                // predict
                let sym = rhs[dot];
                for (p3, (lhs3, _)) in prods.iter().enumerate() {
                    if *lhs3 == sym {
                        let item = (p3, 0, k);
                        if sets[k].insert(item) {
                            worklist.push(item);
                        }
                    }
                }
            }
        }

        // scan: next symbol is terminal `word[k]` -> advance into S_{k+1}.
        if k < n {
            for &(p, dot, origin) in &sets[k] {
                let (_, rhs) = &prods[p];
                if rhs.get(dot) == Some(&word[k]) {
                    sets[k + 1].insert((p, dot + 1, origin));
                }
            }
        }
    }
    sets
}

/// `true` iff `cfg` (any CFG, no normalization required) derives `word`.
/// Acceptance per §4.6: `(S → γ·, 0) ∈ Sₙ`.
pub fn accepts(cfg: &Cfg, word: &[SymbolId]) -> bool {
    let prods = productions(cfg);
    let sets = earley_sets(cfg, word, &prods);
    let n = word.len();
    sets[n].iter().any(|&(p, dot, origin)| {
        origin == 0 && prods[p].0 == cfg.start() && dot == prods[p].1.len()
    })
}

/// Runs the recognizer and, if `word` is accepted, builds the parse forest
/// rooted at the start symbol.
pub fn recognize(cfg: &Cfg, word: &[SymbolId]) -> Option<Rc<SppfNode>> {
    #[cfg(feature = "log")]
    log::trace!("recognize::earley: |w|={}", word.len());
    if !accepts(cfg, word) {
        return None;
    }
    let mut memo: HashMap<(SymbolId, usize, usize), Rc<SppfNode>> = HashMap::new();
    let mut in_progress: HashSet<(SymbolId, usize, usize)> = HashSet::new();
    build_node(cfg, word, &mut memo, &mut in_progress, cfg.start(), 0, word.len())
}

fn build_node(
    cfg: &Cfg,
    word: &[SymbolId],
    memo: &mut HashMap<(SymbolId, usize, usize), Rc<SppfNode>>,
    in_progress: &mut HashSet<(SymbolId, usize, usize)>,
    symbol: SymbolId,
    start: usize,
    end: usize,
) -> Option<Rc<SppfNode>> {
    let key = (symbol, start, end);
    if let Some(n) = memo.get(&key) {
        return Some(n.clone());
    }
    if !in_progress.insert(key) {
        return None;
    }

    let mut alternatives: Vec<Vec<Rc<SppfNode>>> = Vec::new();
    for rhs in cfg.productions_of(symbol) {
        alternatives.extend(match_seq(cfg, word, memo, in_progress, rhs, start, end));
    }

    in_progress.remove(&key);
    if alternatives.is_empty() {
        return None;
    }
    let node = Rc::new(SppfNode { symbol, start, end, alternatives });
    memo.insert(key, node.clone());
    Some(node)
}

fn match_seq(
    cfg: &Cfg,
    word: &[SymbolId],
    memo: &mut HashMap<(SymbolId, usize, usize), Rc<SppfNode>>,
    in_progress: &mut HashSet<(SymbolId, usize, usize)>,
    rhs: &[SymbolId],
    start: usize,
    end: usize,
) -> Vec<Vec<Rc<SppfNode>>> {
    let Some((&first, rest)) = rhs.split_first() else {
        return if start == end { vec![vec![]] } else { vec![] };
    };

    let mut results = Vec::new();
    if cfg.is_terminal(first) {
        if start < end && word[start] == first {
            for tail in match_seq(cfg, word, memo, in_progress, rest, start + 1, end) {
                let mut seq = vec![SppfNode::leaf(first, start, start + 1)];
                seq.extend(tail);
                results.push(seq);
            }
        }
    } else {
        for k in start..=end {
            if let Some(node) = build_node(cfg, word, memo, in_progress, first, start, k) {
                for tail in match_seq(cfg, word, memo, in_progress, rest, k, end) {
                    let mut seq = vec![node.clone()];
                    seq.extend(tail);
                    results.push(seq);
                }
            }
        }
    }
    results
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
    fn accepts_a_left_recursive_grammar_without_special_casing() {
        // S -> S a | a  (left recursive; accepts a+)
        let s = v(0);
        let a = t(0);
        let cfg = build_cfg(vec![s], vec![a], vec![(s, vec![s, a]), (s, vec![a])], s).unwrap();
        assert!(accepts(&cfg, &[a]));
        assert!(accepts(&cfg, &[a, a, a]));
        assert!(!accepts(&cfg, &[]));
    }

    #[test]
    fn ambiguous_grammar_surfaces_more_than_one_alternative() {
        // E -> E + E | n  over a single terminal `n` standing in for a number,
        // with `+` a second terminal: classic ambiguous expression grammar.
        let e = v(0);
        let (plus, n) = (t(0), t(1));
        let cfg =
            build_cfg(vec![e], vec![plus, n], vec![(e, vec![e, plus, e]), (e, vec![n])], e).unwrap();
        let forest = recognize(&cfg, &[n, plus, n, plus, n]).unwrap();
        assert!(forest.derivation_count() > 1);
    }

    #[test]
    fn scenario_4_grammar_also_recognized_by_earley() {
        let s = v(0);
        let (a, b) = (t(0), t(1));
        let cfg = build_cfg(vec![s], vec![a, b], vec![(s, vec![a, s, b]), (s, vec![])], s).unwrap();
        assert!(accepts(&cfg, &[a, a, b, b]));
        assert!(accepts(&cfg, &[]));
        assert!(!accepts(&cfg, &[a, a, b]));
    }
}
