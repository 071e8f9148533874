//! Stack-symbol minimization (§4.7): collapse stack symbols indistinguishable
//! in every transition, via the same partition-refinement engine (C2)
//! [`crate::fa::minimize`] uses for DFA state merging.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::ids::{StateId, SymbolId};
use crate::partition::{BlockId, Partition};
use crate::pda::{build_dpda, build_pda, Determinism, Pda};

type Signature = Vec<(StateId, Option<SymbolId>, BTreeSet<(StateId, Vec<Option<BlockId>>)>)>;

/// Runs Moore-style refinement to a fixpoint, then rebuilds `pda` with every
/// stack symbol replaced by its block's representative.
pub fn minimize_stack_symbols(pda: &Pda) -> Result<Pda> {
    #[cfg(feature = "log")]
    log::debug!("bridge::minimize_stack_symbols: |Γ|={}", pda.stack_alphabet().len());

    let mut partition = Partition::new();
    let all: BTreeSet<SymbolId> = pda.stack_alphabet().iter().copied().collect();
    partition.insert(all)?;

    while refine_round(pda, &mut partition)? {}

    let mut representative: BTreeMap<BlockId, SymbolId> = BTreeMap::new();
    for id in partition.block_ids() {
        let members = partition.block(id).expect("block id just listed by block_ids");
        let rep = if members.contains(&pda.initial_stack_symbol()) {
            pda.initial_stack_symbol()
        } else {
            *members.iter().min().expect("blocks are never empty")
        };
        representative.insert(id, rep);
    }
    let map_symbol = |s: SymbolId| -> SymbolId {
        let id = partition.find(s).expect("every stack symbol was inserted into the partition");
        representative[&id]
    };

    let mut stack_alphabet: Vec<SymbolId> = representative.values().copied().collect();
    stack_alphabet.sort();
    stack_alphabet.dedup();

    let mut transitions = Vec::new();
    for (q, a, z, (r, push)) in pda.rules() {
        let new_z = map_symbol(z);
        let new_push: Vec<SymbolId> = push.iter().copied().map(map_symbol).collect();
        transitions.push((q, a, new_z, *r, new_push));
    }

    let build = if pda.determinism() == Determinism::Deterministic { build_dpda } else { build_pda };
    build(
        pda.num_states(),
        pda.input_alphabet().to_vec(),
        stack_alphabet,
        transitions,
        pda.initial(),
        map_symbol(pda.initial_stack_symbol()),
        pda.finals().clone(),
        pda.accept_mode(),
    )
}

/// One Moore refinement pass: splits every block whose members disagree on
/// behavior under some `(state, input-or-ε)` pair. Returns whether any block
/// actually split.
fn refine_round(pda: &Pda, partition: &mut Partition) -> Result<bool> {
    let block_ids: Vec<BlockId> = partition.block_ids().collect();
    let mut changed = false;

    for id in block_ids {
        let Some(members) = partition.block(id).cloned() else { continue };
        if members.len() <= 1 {
            continue;
        }

        let mut groups: Vec<(Signature, BTreeSet<SymbolId>)> = Vec::new();
        for &z in &members {
            let sig = signature_of(pda, partition, z);
            if let Some((_, set)) = groups.iter_mut().find(|(s, _)| *s == sig) {
                set.insert(z);
            } else {
                groups.push((sig, [z].into_iter().collect()));
            }
        }

        if groups.len() > 1 {
            changed = true;
            let mut remaining = id;
            for (_, group_members) in &groups[..groups.len() - 1] {
                let result = partition.split(remaining, group_members)?;
                remaining = result.out_block.expect("a later, still-unprocessed group keeps the remainder non-empty");
            }
        }
    }
    Ok(changed)
}

fn signature_of(pda: &Pda, partition: &Partition, z: SymbolId) -> Signature {
    let mut sig = Signature::new();
    let labels = std::iter::once(None).chain(pda.input_alphabet().iter().copied().map(Some));
    for q in pda.states() {
        for a in labels.clone() {
            let targets: BTreeSet<(StateId, Vec<Option<BlockId>>)> = pda
                .successors(q, a, z)
                .iter()
                .map(|(r, push)| (*r, push.iter().map(|s| partition.find(*s)).collect()))
                .collect();
            if !targets.is_empty() {
                sig.push((q, a, targets));
            }
        }
    }
    sig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pda::{build_dpda, AcceptMode};

    fn sym(n: u32) -> SymbolId {
        SymbolId(n)
    }

    #[test]
    fn collapses_stack_symbols_with_identical_behavior() {
        // Z0 and a redundant duplicate B behave identically to Z0 under every
        // transition (both are simply never read): only Z0 ever appears on
        // top of stack, so B is free to merge with it.
        let a = sym(0);
        let (z0, b) = (sym(100), sym(101));
        let pda = build_dpda(
            1,
            vec![a],
            vec![z0, b],
            vec![(StateId(0), Some(a), z0, StateId(0), vec![z0])],
            StateId(0),
            z0,
            BTreeSet::from([StateId(0)]),
            AcceptMode::FinalState,
        )
        .unwrap();

        let minimized = minimize_stack_symbols(&pda).unwrap();
        assert!(minimized.stack_alphabet().len() <= pda.stack_alphabet().len());
        assert_eq!(minimized.initial_stack_symbol(), z0);
    }
}
