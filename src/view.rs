//! §6's "Serialization contract (for collaborators)": a canonical in-memory
//! structured value per automaton kind, independent of this crate's
//! internal `BTreeMap`/`BTreeSet` representations. Collaborators (CLI
//! front-ends, graph renderers, wire-format encoders) round-trip against
//! these view types rather than the kernel's own data structures, which are
//! free to change shape without breaking that contract.

use crate::fa::types::{Fa, Flavor};
use crate::grammar::types::{Cfg, Form};
use crate::ids::{StateId, SymbolId};
use crate::pda::types::{AcceptMode, Determinism as PdaDeterminism, Pda};
use crate::turing::types::{Determinism as TmDeterminism, Move, MultiTapeTm, Tm};

/// `{flavor, states:[…], alphabet:[…], transitions:[(from, symbol|ε, to)…], initial, finals}` (§6).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaView {
    pub flavor: Flavor,
    pub states: Vec<StateId>,
    pub alphabet: Vec<SymbolId>,
    pub transitions: Vec<(StateId, Option<SymbolId>, StateId)>,
    pub initial: StateId,
    pub finals: Vec<StateId>,
}

impl From<&Fa> for FaView {
    fn from(fa: &Fa) -> Self {
        FaView {
            flavor: fa.flavor(),
            states: fa.states().collect(),
            alphabet: fa.alphabet().to_vec(),
            transitions: fa.edges().collect(),
            initial: fa.initial(),
            finals: fa.finals().iter().copied().collect(),
        }
    }
}

impl std::fmt::Display for FaView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?} over {} states, initial {:?}, finals {:?}", self.flavor, self.states.len(), self.initial, self.finals)?;
        for (from, sym, to) in &self.transitions {
            match sym {
                Some(s) => writeln!(f, "  {from:?} --{s:?}--> {to:?}")?,
                None => writeln!(f, "  {from:?} --ε--> {to:?}")?,
            }
        }
        Ok(())
    }
}

/// `{…, stack_alphabet, initial_stack_symbol, transitions:[(from, input|ε, stack_read, to, stack_write:[…])]}` (§6).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PdaView {
    pub determinism: PdaDeterminism,
    pub accept_mode: AcceptMode,
    pub states: Vec<StateId>,
    pub input_alphabet: Vec<SymbolId>,
    pub stack_alphabet: Vec<SymbolId>,
    pub transitions: Vec<(StateId, Option<SymbolId>, SymbolId, StateId, Vec<SymbolId>)>,
    pub initial: StateId,
    pub initial_stack_symbol: SymbolId,
    pub finals: Vec<StateId>,
}

impl From<&Pda> for PdaView {
    fn from(pda: &Pda) -> Self {
        PdaView {
            determinism: pda.determinism(),
            accept_mode: pda.accept_mode(),
            states: pda.states().collect(),
            input_alphabet: pda.input_alphabet().to_vec(),
            stack_alphabet: pda.stack_alphabet().to_vec(),
            transitions: pda
                .rules()
                .map(|(from, a, z, (to, push))| (from, a, z, *to, push.clone()))
                .collect(),
            initial: pda.initial(),
            initial_stack_symbol: pda.initial_stack_symbol(),
            finals: pda.finals().iter().copied().collect(),
        }
    }
}

impl std::fmt::Display for PdaView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:?}/{:?} over {} states, initial {:?}/{:?}, finals {:?}",
            self.determinism,
            self.accept_mode,
            self.states.len(),
            self.initial,
            self.initial_stack_symbol,
            self.finals
        )?;
        for (from, a, z, to, push) in &self.transitions {
            let a = a.map(|s| format!("{s:?}")).unwrap_or_else(|| "ε".to_string());
            writeln!(f, "  {from:?}, {a}, {z:?} -> {to:?}, push {push:?}")?;
        }
        Ok(())
    }
}

/// `{…, tape_alphabets:[…]ᵏ, blank_symbols:[…]ᵏ, transitions:[(from, read:[…]ᵏ, to, write:[…]ᵏ, moves:[L|R|S]ᵏ)]}` (§6).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TmView {
    pub determinism: TmDeterminism,
    pub states: Vec<StateId>,
    pub tape_alphabets: Vec<Vec<SymbolId>>,
    pub blank_symbols: Vec<SymbolId>,
    pub transitions: Vec<(StateId, Vec<SymbolId>, StateId, Vec<SymbolId>, Vec<Move>)>,
    pub initial: StateId,
    pub accept: StateId,
    pub reject: StateId,
}

impl From<&Tm> for TmView {
    fn from(tm: &Tm) -> Self {
        TmView {
            determinism: tm.determinism(),
            states: tm.states().collect(),
            tape_alphabets: vec![tm.tape_alphabet().to_vec()],
            blank_symbols: vec![tm.blank()],
            transitions: tm
                .rules()
                .map(|(q, a, &(_, to, write, mv))| (q, vec![a], to, vec![write], vec![mv]))
                .collect(),
            initial: tm.initial(),
            accept: tm.accept(),
            reject: tm.reject(),
        }
    }
}

impl From<&MultiTapeTm> for TmView {
    fn from(mt: &MultiTapeTm) -> Self {
        TmView {
            determinism: TmDeterminism::Deterministic,
            states: (0..mt.num_states()).map(StateId).collect(),
            tape_alphabets: (0..mt.num_tapes()).map(|i| mt.tape_alphabet(i).to_vec()).collect(),
            blank_symbols: mt.blanks().to_vec(),
            transitions: mt
                .rules()
                .map(|(from, reads, (to, writes, moves))| {
                    (from, reads.to_vec(), *to, writes.clone(), moves.clone())
                })
                .collect(),
            initial: mt.initial(),
            accept: mt.accept(),
            reject: mt.reject(),
        }
    }
}

impl std::fmt::Display for TmView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:?} over {} states/{} tapes, initial {:?}, accept {:?}, reject {:?}",
            self.determinism,
            self.states.len(),
            self.tape_alphabets.len(),
            self.initial,
            self.accept,
            self.reject
        )?;
        for (from, read, to, write, mv) in &self.transitions {
            writeln!(f, "  {from:?}, read {read:?} -> {to:?}, write {write:?}, move {mv:?}")?;
        }
        Ok(())
    }
}

/// `{variables, terminals, productions:[(lhs, rhs:[…])], start, form}` (§6).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CfgView {
    pub variables: Vec<SymbolId>,
    pub terminals: Vec<SymbolId>,
    pub productions: Vec<(SymbolId, Vec<SymbolId>)>,
    pub start: SymbolId,
    pub form: Form,
}

impl From<&Cfg> for CfgView {
    fn from(cfg: &Cfg) -> Self {
        CfgView {
            variables: cfg.variables().iter().copied().collect(),
            terminals: cfg.terminals().iter().copied().collect(),
            productions: cfg.productions().to_vec(),
            start: cfg.start(),
            form: cfg.form(),
        }
    }
}

impl std::fmt::Display for CfgView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?} grammar, start {:?}", self.form, self.start)?;
        for (lhs, rhs) in &self.productions {
            if rhs.is_empty() {
                writeln!(f, "  {lhs:?} -> ε")?;
            } else {
                writeln!(f, "  {lhs:?} -> {rhs:?}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fa::types::build_fa;

    fn sym(n: u32) -> SymbolId {
        SymbolId(n)
    }

    #[test]
    fn fa_view_round_trips_structure() {
        let fa = build_fa(
            2,
            vec![sym(0)],
            vec![(StateId(0), Some(sym(0)), StateId(1))],
            StateId(0),
            [StateId(1)].into_iter().collect(),
            Flavor::Dfa,
        )
        .unwrap();
        let view = FaView::from(&fa);
        assert_eq!(view.initial, StateId(0));
        assert_eq!(view.finals, vec![StateId(1)]);
        assert!(view.transitions.contains(&(StateId(0), Some(sym(0)), StateId(1))));
        assert!(!format!("{view}").is_empty());
    }
}
