//! Greibach Normal Form (§4.5): CNF, then order variables, substitute away
//! leading lower-indexed variables, eliminate immediate left recursion, and
//! finally collapse every remaining leading nonterminal into a leading
//! terminal.

use std::collections::BTreeMap;

use super::cnf::to_cnf;
use super::types::{build_cfg, Cfg, Form, Production};
use crate::error::{Error, GrammarPhase, Result};
use crate::ids::SymbolId;

pub fn to_gnf(cfg: &Cfg) -> Result<Cfg> {
    #[cfg(feature = "log")]
    log::debug!("grammar::to_gnf: starting from |P|={}", cfg.productions().len());
    let cnf = to_cnf(cfg)?;
    let (productions, mut variables) = eliminate_left_recursion(&cnf)?;
    let productions = collapse_leading_nonterminals(productions, &variables)?;
    variables.sort();
    build_cfg(variables, cnf.terminals().iter().copied().collect(), productions, cnf.start())
        .map(|mut g| {
            g.form = Form::Gnf;
            g
        })
        .map_err(|e| match e {
            Error::InvalidAutomaton { reason } => {
                Error::GrammarError { phase: GrammarPhase::LeftRecursionElimination, detail: reason }
            }
            other => other,
        })
}

/// Orders variables `A1..An` (ascending `SymbolId`, matching the `BTreeSet`
/// iteration order everywhere else in this module), substitutes away
/// `Ai → Aj γ` for `j < i`, then eliminates immediate left recursion at
/// `Ai` via the standard `Ai → β A'i, A'i → α A'i | α` transform (the `| α`
/// alternative replaces the usual `| ε`, since this pipeline never
/// reintroduces ε-productions once §4.5 step 3 has run).
fn eliminate_left_recursion(cnf: &Cfg) -> Result<(Vec<Production>, Vec<SymbolId>)> {
    let order: Vec<SymbolId> = cnf.variables().iter().copied().collect();
    let mut by_var: BTreeMap<SymbolId, Vec<Vec<SymbolId>>> = BTreeMap::new();
    for &v in &order {
        by_var.insert(v, cnf.productions_of(v).map(|r| r.to_vec()).collect());
    }

    let mut all_variables: Vec<SymbolId> = order.clone();
    let mut next_fresh = cnf.fresh_symbol().0;

    for i in 0..order.len() {
        let ai = order[i];
        // Substitute away leading Aj, j < i.
        loop {
            let bodies = by_var.get(&ai).cloned().unwrap_or_default();
            let mut expanded = Vec::with_capacity(bodies.len());
            let mut changed = false;
            for body in bodies {
                if let Some(&first) = body.first() {
                    if cnf.is_variable(first) {
                        if let Some(j) = order.iter().position(|&x| x == first) {
                            if j < i {
                                changed = true;
                                let rest = &body[1..];
                                for sub in by_var.get(&first).cloned().unwrap_or_default() {
                                    let mut new_body = sub;
                                    new_body.extend_from_slice(rest);
                                    expanded.push(new_body);
                                }
                                continue;
                            }
                        }
                    }
                }
                expanded.push(body);
            }
            by_var.insert(ai, expanded);
            if !changed {
                break;
            }
        }

        // Eliminate immediate left recursion Ai -> Ai α.
        let bodies = by_var.get(&ai).cloned().unwrap_or_default();
        let (recursive, nonrecursive): (Vec<_>, Vec<_>) =
            bodies.into_iter().partition(|b| b.first() == Some(&ai));
        if !recursive.is_empty() {
            let prime = SymbolId(next_fresh);
            next_fresh += 1;
            all_variables.push(prime);

            let mut ai_bodies = Vec::new();
            for beta in &nonrecursive {
                ai_bodies.push(beta.clone());
                let mut with_prime = beta.clone();
                with_prime.push(prime);
                ai_bodies.push(with_prime);
            }
            by_var.insert(ai, ai_bodies);

            let mut prime_bodies = Vec::new();
            for rec in &recursive {
                let alpha = &rec[1..];
                prime_bodies.push(alpha.to_vec());
                let mut with_prime = alpha.to_vec();
                with_prime.push(prime);
                prime_bodies.push(with_prime);
            }
            by_var.insert(prime, prime_bodies);
        }
    }

    let productions: Vec<Production> =
        by_var.into_iter().flat_map(|(lhs, bodies)| bodies.into_iter().map(move |b| (lhs, b))).collect();
    Ok((productions, all_variables))
}

/// Repeatedly substitutes any production whose body still starts with a
/// variable by that variable's (already-substituted) bodies, until every
/// body starts with a terminal. The forward pass above guarantees this
/// converges: leading symbols only ever point to already-resolved variables
/// once cycles are broken by left-recursion elimination.
fn collapse_leading_nonterminals(mut productions: Vec<Production>, variables: &[SymbolId]) -> Result<Vec<Production>> {
    let is_var = |s: SymbolId| variables.contains(&s);
    let max_rounds = variables.len() * variables.len() + 4;

    for _ in 0..max_rounds {
        let by_var: BTreeMap<SymbolId, Vec<Vec<SymbolId>>> = {
            let mut m: BTreeMap<SymbolId, Vec<Vec<SymbolId>>> = BTreeMap::new();
            for (lhs, rhs) in &productions {
                m.entry(*lhs).or_default().push(rhs.clone());
            }
            m
        };

        let mut changed = false;
        let mut next: Vec<Production> = Vec::with_capacity(productions.len());
        for (lhs, rhs) in &productions {
            match rhs.first() {
                Some(&first) if is_var(first) && first != *lhs => {
                    changed = true;
                    for sub in by_var.get(&first).cloned().unwrap_or_default() {
                        let mut new_body = sub;
                        new_body.extend_from_slice(&rhs[1..]);
                        next.push((*lhs, new_body));
                    }
                }
                _ => next.push((*lhs, rhs.clone())),
            }
        }
        productions = next;
        if !changed {
            return Ok(productions);
        }
    }

    Err(Error::GrammarError {
        phase: GrammarPhase::LeftRecursionElimination,
        detail: "leading-nonterminal collapse did not converge".into(),
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
    fn to_gnf_produces_only_terminal_leading_bodies() {
        // S -> a S b | a b  (a simple, already terminal-leading-friendly grammar)
        let s = v(0);
        let (a, b) = (t(0), t(1));
        let cfg = build_cfg(vec![s], vec![a, b], vec![(s, vec![a, s, b]), (s, vec![a, b])], s).unwrap();
        let gnf = to_gnf(&cfg).unwrap();
        assert_eq!(gnf.form(), Form::Gnf);
        for (_, rhs) in gnf.productions() {
            assert!(!rhs.is_empty());
            assert!(gnf.is_terminal(rhs[0]), "body {rhs:?} does not start with a terminal");
            for s in &rhs[1..] {
                assert!(gnf.is_variable(*s));
            }
        }
    }
}
