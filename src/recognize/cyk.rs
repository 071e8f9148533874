//! CYK recognition (§4.6): requires a CNF grammar. `O(n³·|P|)` time,
//! `O(n²·|V|)` space; the table doubles as a parse forest via back-pointers.

use std::collections::BTreeMap;
use std::rc::Rc;

use super::SppfNode;
use crate::error::{Error, Result};
use crate::grammar::types::{Cfg, Form};
use crate::ids::SymbolId;

#[derive(Clone)]
enum Justification {
    Terminal,
    Binary(SymbolId, SymbolId, usize),
}

/// `table[(start, len)]` maps each derivable variable to every `(B, C,
/// split)` justification, keyed by `(start, len)` spans of `word`.
type Table = BTreeMap<(usize, usize), BTreeMap<SymbolId, Vec<Justification>>>;

/// Runs CYK on `word` against `cfg`. `cfg` must be in CNF ([`Error::GrammarError`]
/// otherwise). Returns `Some(forest)` rooted at the start symbol when
/// accepted, `None` on reject; the empty-word case is accepted exactly when
/// the start symbol has a (preserved, §9 Open Question 3) ε-production.
pub fn recognize(cfg: &Cfg, word: &[SymbolId]) -> Result<Option<Rc<SppfNode>>> {
    if cfg.form() != Form::Cnf {
        return Err(Error::GrammarError {
            phase: crate::error::GrammarPhase::Binarization,
            detail: "CYK requires a grammar already normalized to CNF".into(),
        });
    }
    #[cfg(feature = "log")]
    log::trace!("recognize::cyk: |w|={}", word.len());

    if word.is_empty() {
        let accepts_empty = cfg.productions_of(cfg.start()).any(|rhs| rhs.is_empty());
        return Ok(if accepts_empty {
            Some(Rc::new(SppfNode { symbol: cfg.start(), start: 0, end: 0, alternatives: vec![vec![]] }))
        } else {
            None
        });
    }

    let n = word.len();
    let mut table: Table = BTreeMap::new();

    for i in 0..n {
        let mut entry: BTreeMap<SymbolId, Vec<Justification>> = BTreeMap::new();
        for (lhs, rhs) in cfg.productions() {
            if rhs.len() == 1 && rhs[0] == word[i] {
                entry.entry(*lhs).or_default().push(Justification::Terminal);
            }
        }
        table.insert((i, 1), entry);
    }

    for len in 2..=n {
        for start in 0..=(n - len) {
            let mut entry: BTreeMap<SymbolId, Vec<Justification>> = BTreeMap::new();
            for split in 1..len {
                let left = table.get(&(start, split)).cloned().unwrap_or_default();
                let right = table.get(&(start + split, len - split)).cloned().unwrap_or_default();
                for (lhs, rhs) in cfg.productions() {
                    if rhs.len() != 2 {
                        continue;
                    }
                    let (b, c) = (rhs[0], rhs[1]);
                    if left.contains_key(&b) && right.contains_key(&c) {
                        entry.entry(*lhs).or_default().push(Justification::Binary(b, c, split));
                    }
                }
            }
            table.insert((start, len), entry);
        }
    }

    if !table.get(&(0, n)).map_or(false, |e| e.contains_key(&cfg.start())) {
        return Ok(None);
    }
    Ok(Some(build_forest(&table, cfg.start(), 0, n)))
}

fn build_forest(table: &Table, symbol: SymbolId, start: usize, len: usize) -> Rc<SppfNode> {
    let justifications = table.get(&(start, len)).and_then(|e| e.get(&symbol)).cloned().unwrap_or_default();
    let mut alternatives = Vec::with_capacity(justifications.len());
    for j in justifications {
        match j {
            Justification::Terminal => alternatives.push(vec![]),
            Justification::Binary(b, c, split) => {
                let left = build_forest(table, b, start, split);
                let right = build_forest(table, c, start + split, len - split);
                alternatives.push(vec![left, right]);
            }
        }
    }
    Rc::new(SppfNode { symbol, start, end: start + len, alternatives })
}
