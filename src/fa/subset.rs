//! `subset_construct(εNFA) → DFA` (§4.2): BFS over ε-closed subsets, memoized
//! by the subset itself, dead/unreachable states pruned before return.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::closure::epsilon_closure;
use super::types::{build_fa, Edge, Fa, Flavor};
use crate::error::Result;
use crate::ids::StateId;

/// Canonical subset DFA for `fa` (which may be any flavor; ε-edges, if any,
/// are closed over). The output alphabet equals the input alphabet.
pub fn subset_construct(fa: &Fa) -> Result<Fa> {
    #[cfg(feature = "log")]
    log::debug!("subset_construct: input has {} states", fa.num_states());

    let start = epsilon_closure(fa, &[fa.initial()].into_iter().collect());
    let mut id_of: BTreeMap<BTreeSet<StateId>, StateId> = BTreeMap::new();
    let mut subsets: Vec<BTreeSet<StateId>> = Vec::new();
    let mut queue: VecDeque<BTreeSet<StateId>> = VecDeque::new();

    let start_id = StateId(0);
    id_of.insert(start.clone(), start_id);
    subsets.push(start.clone());
    queue.push_back(start);

    let mut edges: Vec<Edge> = Vec::new();
    let mut finals: BTreeSet<StateId> = BTreeSet::new();

    while let Some(subset) = queue.pop_front() {
        let from = id_of[&subset];
        if subset.iter().any(|q| fa.is_final(*q)) {
            finals.insert(from);
        }
        for &a in fa.alphabet() {
            let mut raw = BTreeSet::new();
            for &q in &subset {
                raw.extend(fa.targets(q, Some(a)));
            }
            let closed = epsilon_closure(fa, &raw);
            if closed.is_empty() {
                continue; // no transition; DFA completion adds the sink later.
            }
            let to = *id_of.entry(closed.clone()).or_insert_with(|| {
                let id = StateId(subsets.len() as u32);
                subsets.push(closed.clone());
                queue.push_back(closed.clone());
                id
            });
            edges.push((from, Some(a), to));
        }
    }

    build_fa(
        subsets.len() as u32,
        fa.alphabet().to_vec(),
        edges,
        start_id,
        finals,
        Flavor::Dfa,
    )
}
