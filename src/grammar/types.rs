//! The CFG data model (§3.1): `(V, T, P, S)` with `V ∩ T = ∅`, plus the form
//! tag (`general`/`CNF`/`GNF`) set by the last normalization step.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::ids::SymbolId;

/// Which normalization step last produced this grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Form {
    General,
    Cnf,
    Gnf,
}

/// `A → α`. The right-hand side is a word over `V ∪ T`; `rhs == []` is the
/// ε-production.
pub type Production = (SymbolId, Vec<SymbolId>);

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cfg {
    pub(crate) variables: BTreeSet<SymbolId>,
    pub(crate) terminals: BTreeSet<SymbolId>,
    pub(crate) productions: Vec<Production>,
    pub(crate) start: SymbolId,
    pub(crate) form: Form,
}

impl Cfg {
    pub fn variables(&self) -> &BTreeSet<SymbolId> {
        &self.variables
    }

    pub fn terminals(&self) -> &BTreeSet<SymbolId> {
        &self.terminals
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn productions_of(&self, lhs: SymbolId) -> impl Iterator<Item = &[SymbolId]> {
        self.productions.iter().filter(move |(l, _)| *l == lhs).map(|(_, rhs)| rhs.as_slice())
    }

    pub fn start(&self) -> SymbolId {
        self.start
    }

    pub fn form(&self) -> Form {
        self.form
    }

    pub fn is_variable(&self, s: SymbolId) -> bool {
        self.variables.contains(&s)
    }

    pub fn is_terminal(&self, s: SymbolId) -> bool {
        self.terminals.contains(&s)
    }

    /// A `SymbolId` distinct from every variable and terminal currently in
    /// the grammar — used by every normalization step that introduces fresh
    /// nonterminals.
    pub fn fresh_symbol(&self) -> SymbolId {
        let max = self
            .variables
            .iter()
            .chain(self.terminals.iter())
            .map(|s| s.0)
            .max()
            .unwrap_or(0);
        SymbolId(max + 1)
    }
}

/// Builds and validates a [`Cfg`] (§6 `build_cfg`).
pub fn build_cfg(
    variables: Vec<SymbolId>,
    terminals: Vec<SymbolId>,
    productions: Vec<Production>,
    start: SymbolId,
) -> Result<Cfg> {
    let variables: BTreeSet<SymbolId> = variables.into_iter().collect();
    let terminals: BTreeSet<SymbolId> = terminals.into_iter().collect();
    if !variables.is_disjoint(&terminals) {
        return Err(Error::InvalidAutomaton {
            reason: "a CFG's variables and terminals must be disjoint".into(),
        });
    }
    if !variables.contains(&start) {
        return Err(Error::InvalidAutomaton {
            reason: format!("start symbol {start:?} is not among the declared variables"),
        });
    }
    for (lhs, rhs) in &productions {
        if !variables.contains(lhs) {
            return Err(Error::InvalidAutomaton {
                reason: format!("production left-hand side {lhs:?} is not a variable"),
            });
        }
        for s in rhs {
            if !variables.contains(s) && !terminals.contains(s) {
                return Err(Error::InvalidAutomaton {
                    reason: format!("right-hand side symbol {s:?} is neither variable nor terminal"),
                });
            }
        }
    }
    Ok(Cfg { variables, terminals, productions, start, form: Form::General })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: u32) -> SymbolId {
        SymbolId(n)
    }

    fn t(n: u32) -> SymbolId {
        SymbolId(1000 + n)
    }

    #[test]
    fn build_cfg_rejects_overlapping_variables_and_terminals() {
        let s = v(0);
        let err = build_cfg(vec![s], vec![s], vec![], s);
        assert!(err.is_err());
    }

    #[test]
    fn build_cfg_accepts_well_formed_grammar() {
        let s = v(0);
        let a = t(0);
        let cfg = build_cfg(vec![s], vec![a], vec![(s, vec![a])], s).unwrap();
        assert_eq!(cfg.form(), Form::General);
        assert_eq!(cfg.productions_of(s).count(), 1);
    }
}
