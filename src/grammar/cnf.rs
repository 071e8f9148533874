//! Chomsky Normal Form (§4.5 step 5 + the `to_cnf` pipeline): binarize
//! length-≥3 right-hand sides, factor terminals out of mixed length-2 ones.

use std::collections::BTreeMap;

use super::normalize::{eliminate_epsilon, eliminate_unit, prune_unproductive, prune_unreachable};
use super::types::{build_cfg, Cfg, Form, Production};
use crate::error::{Error, GrammarPhase, Result};
use crate::ids::SymbolId;

/// Runs the full CNF pipeline in the required order (§4.5): reachability
/// prune, productivity prune, ε-elimination, unit-elimination, then
/// binarize/terminal-factor.
pub fn to_cnf(cfg: &Cfg) -> Result<Cfg> {
    #[cfg(feature = "log")]
    log::debug!("grammar::to_cnf: |V|={} |P|={}", cfg.variables().len(), cfg.productions().len());
    let cfg = prune_unreachable(cfg)?;
    let cfg = prune_unproductive(&cfg)?;
    let cfg = eliminate_epsilon(&cfg)?;
    let cfg = eliminate_unit(&cfg)?;
    binarize(&cfg)
}

/// Replaces every right-hand side of length ≥ 3 with a cascade of length-2
/// productions via fresh variables, and every mixed length-2 right-hand side
/// containing a terminal with a new variable standing for that terminal.
pub fn binarize(cfg: &Cfg) -> Result<Cfg> {
    let mut variables: Vec<SymbolId> = cfg.variables().iter().copied().collect();
    let mut next_fresh = cfg.fresh_symbol().0;
    let mut fresh = || {
        let id = SymbolId(next_fresh);
        next_fresh += 1;
        id
    };

    // One fresh variable per terminal that appears inside a length ≥ 2 body.
    let mut terminal_vars: BTreeMap<SymbolId, SymbolId> = BTreeMap::new();
    let mut new_productions: Vec<Production> = Vec::new();

    for (lhs, rhs) in cfg.productions() {
        match rhs.len() {
            0 => {
                if *lhs != cfg.start() {
                    return Err(Error::GrammarError {
                        phase: GrammarPhase::Binarization,
                        detail: format!("non-start ε-production survived unit/epsilon elimination for {lhs:?}"),
                    });
                }
                new_productions.push((*lhs, vec![]));
            }
            1 => new_productions.push((*lhs, rhs.clone())),
            _ => {
                // First, replace every terminal occurrence with its stand-in
                // variable so the body is entirely over variables.
                let body: Vec<SymbolId> = rhs
                    .iter()
                    .map(|&s| {
                        if cfg.is_terminal(s) {
                            *terminal_vars.entry(s).or_insert_with(&mut fresh)
                        } else {
                            s
                        }
                    })
                    .collect();
                // Cascade: A -> B1 X1, X1 -> B2 X2, ..., X_{k-2} -> B_{k-1} Bk.
                let mut chain_lhs = *lhs;
                for i in 0..body.len() - 2 {
                    let x = fresh();
                    variables.push(x);
                    new_productions.push((chain_lhs, vec![body[i], x]));
                    chain_lhs = x;
                }
                new_productions.push((chain_lhs, vec![body[body.len() - 2], body[body.len() - 1]]));
            }
        }
    }

    for (&terminal, &var) in &terminal_vars {
        variables.push(var);
        new_productions.push((var, vec![terminal]));
    }

    build_cfg(variables, cfg.terminals().iter().copied().collect(), new_productions, cfg.start())
        .map(|mut cfg| {
            cfg.form = Form::Cnf;
            cfg
        })
        .map_err(|e| match e {
            Error::InvalidAutomaton { reason } => Error::GrammarError { phase: GrammarPhase::Binarization, detail: reason },
            other => other,
        })
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
    fn to_cnf_produces_only_binary_or_terminal_bodies() {
        // S -> a S b | ε  (spec scenario 4's grammar)
        let s = v(0);
        let (a, b) = (t(0), t(1));
        let cfg = build_cfg(vec![s], vec![a, b], vec![(s, vec![a, s, b]), (s, vec![])], s).unwrap();
        let cnf = to_cnf(&cfg).unwrap();
        assert_eq!(cnf.form(), Form::Cnf);
        for (lhs, rhs) in cnf.productions() {
            match rhs.len() {
                0 => assert_eq!(*lhs, cnf.start()),
                1 => assert!(cnf.is_terminal(rhs[0])),
                2 => assert!(cnf.is_variable(rhs[0]) && cnf.is_variable(rhs[1])),
                n => panic!("unexpected body length {n}"),
            }
        }
    }
}
