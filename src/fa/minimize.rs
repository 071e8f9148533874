//! `minimize(DFA) → DFA` (§4.2): delegates to the C2 partition engine via
//! Hopcroft's algorithm above [`Limits::hopcroft_threshold`], or a naive
//! O(n²) table-filling equivalence pass below it (§9's documented
//! size-threshold table, replacing the source's adaptive/ML selection).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::types::{build_fa, Edge, Fa, Flavor};
use crate::config::Limits;
use crate::error::{Error, Result};
use crate::ids::{StateId, SymbolId};
use crate::partition::Partition;

/// Removes states unreachable from `fa.initial()`. Always run before
/// minimization (§4.2 "Unreachable states: always pruned").
pub fn prune_unreachable(fa: &Fa) -> Result<Fa> {
    let mut reachable = BTreeSet::new();
    let mut queue = VecDeque::new();
    reachable.insert(fa.initial());
    queue.push_back(fa.initial());
    while let Some(q) = queue.pop_front() {
        let mut nexts: Vec<StateId> = fa.epsilon_targets(q).into_iter().collect();
        for &a in fa.alphabet() {
            nexts.extend(fa.targets(q, Some(a)));
        }
        for n in nexts {
            if reachable.insert(n) {
                queue.push_back(n);
            }
        }
    }
    let mut renumber: BTreeMap<StateId, StateId> = BTreeMap::new();
    for (new, old) in reachable.iter().enumerate() {
        renumber.insert(*old, StateId(new as u32));
    }
    let edges: Vec<Edge> = fa
        .edges()
        .filter(|(from, _, to)| reachable.contains(from) && reachable.contains(to))
        .map(|(from, sym, to)| (renumber[&from], sym, renumber[&to]))
        .collect();
    let finals = fa.finals().iter().filter_map(|q| renumber.get(q).copied()).collect();
    build_fa(
        reachable.len() as u32,
        fa.alphabet().to_vec(),
        edges,
        renumber[&fa.initial()],
        finals,
        fa.flavor(),
    )
}

/// `minimize(DFA) → DFA`. Requires a completed DFA (§4.2); the output has
/// minimum state count, is renumbered `[0..k)` in BFS order from `q₀`, and
/// is isomorphic across equivalent inputs.
pub fn minimize(fa: &Fa, limits: &Limits) -> Result<Fa> {
    if fa.flavor() != Flavor::Dfa {
        return Err(Error::InvalidAutomaton {
            reason: "minimize requires a completed DFA; determinize first".into(),
        });
    }
    let pruned = prune_unreachable(fa)?;
    #[cfg(feature = "log")]
    log::debug!(
        "minimize: {} states, hopcroft_threshold={}",
        pruned.num_states(),
        limits.hopcroft_threshold
    );
    let classes = if pruned.num_states() as usize >= limits.hopcroft_threshold {
        hopcroft_classes(&pruned)?
    } else {
        naive_classes(&pruned)
    };
    rebuild_from_classes(&pruned, &classes)
}

/// Maps each state to a representative of its equivalence class.
fn naive_classes(fa: &Fa) -> BTreeMap<StateId, StateId> {
    let n = fa.num_states();
    let states: Vec<StateId> = (0..n).map(StateId).collect();
    // distinguishable[i][j] for i < j
    let mut distinguishable = vec![vec![false; n as usize]; n as usize];
    for &p in &states {
        for &q in &states {
            if p < q && fa.is_final(p) != fa.is_final(q) {
                distinguishable[p.index()][q.index()] = true;
            }
        }
    }
    loop {
        let mut changed = false;
        for &p in &states {
            for &q in &states {
                if p >= q || distinguishable[p.index()][q.index()] {
                    continue;
                }
                for &a in fa.alphabet() {
                    let tp = fa.targets(p, Some(a)).into_iter().next();
                    let tq = fa.targets(q, Some(a)).into_iter().next();
                    if let (Some(tp), Some(tq)) = (tp, tq) {
                        let (lo, hi) = if tp < tq { (tp, tq) } else { (tq, tp) };
                        if tp != tq && distinguishable[lo.index()][hi.index()] {
                            distinguishable[p.index()][q.index()] = true;
                            changed = true;
                        }
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
    let mut repr: BTreeMap<StateId, StateId> = BTreeMap::new();
    for &p in &states {
        if repr.contains_key(&p) {
            continue;
        }
        repr.insert(p, p);
        for &q in &states {
            if q > p {
                let (lo, hi) = (p, q);
                if !distinguishable[lo.index()][hi.index()] {
                    repr.entry(q).or_insert(p);
                }
            }
        }
    }
    repr
}

fn hopcroft_classes(fa: &Fa) -> Result<BTreeMap<StateId, StateId>> {
    let states: BTreeSet<StateId> = fa.states().collect();
    let (accepting, non_accepting): (BTreeSet<StateId>, BTreeSet<StateId>) =
        states.iter().partition(|q| fa.is_final(**q));

    let mut partition = Partition::new();
    let mut worklist: VecDeque<(crate::partition::BlockId, SymbolId)> = VecDeque::new();

    // Reverse transitions: (symbol, target) -> sources.
    let mut preimage: BTreeMap<(SymbolId, StateId), BTreeSet<StateId>> = BTreeMap::new();
    for &a in fa.alphabet() {
        for q in fa.states() {
            for t in fa.targets(q, Some(a)) {
                preimage.entry((a, t)).or_default().insert(q);
            }
        }
    }

    let mut blocks_of_interest = Vec::new();
    if !accepting.is_empty() {
        blocks_of_interest.push(partition.insert(accepting.clone())?);
    }
    if !non_accepting.is_empty() {
        blocks_of_interest.push(partition.insert(non_accepting.clone())?);
    }
    // Seed the worklist with the smaller of the two initial blocks for every symbol,
    // per §4.1 ("worklist contains the smaller side of each recent split").
    let smaller = if accepting.len() <= non_accepting.len() && !accepting.is_empty() {
        Some(accepting.clone())
    } else if !non_accepting.is_empty() {
        Some(non_accepting.clone())
    } else {
        None
    };
    if let Some(seed) = smaller {
        let seed_block = partition.find(*seed.iter().next().unwrap()).unwrap();
        for &a in fa.alphabet() {
            worklist.push_back((seed_block, a));
        }
    }

    while let Some((block, a)) = worklist.pop_front() {
        if partition.block(block).is_none() {
            continue; // block was since split away under a different id
        }
        let target_members: BTreeSet<StateId> = partition.block(block).unwrap().clone();
        let mut preimage_states: BTreeSet<StateId> = BTreeSet::new();
        for t in &target_members {
            if let Some(sources) = preimage.get(&(a, *t)) {
                preimage_states.extend(sources.iter().copied());
            }
        }
        if preimage_states.is_empty() {
            continue;
        }
        // Which blocks does the preimage intersect? Snapshot first: split()
        // mutates the partition, and we must not revisit a block twice in
        // one pass using a stale id.
        let touched: BTreeSet<crate::partition::BlockId> =
            preimage_states.iter().filter_map(|q| partition.find(*q)).collect();
        for y in touched {
            let result = partition.split(y, &preimage_states)?;
            if result.did_split() {
                let (in_b, out_b) = (result.in_block.unwrap(), result.out_block.unwrap());
                let in_size = partition.block(in_b).unwrap().len();
                let out_size = partition.block(out_b).unwrap().len();
                let smaller = if in_size <= out_size { in_b } else { out_b };
                for &sym in fa.alphabet() {
                    worklist.push_back((smaller, sym));
                }
            }
        }
    }

    let mut repr: BTreeMap<StateId, StateId> = BTreeMap::new();
    for block in partition.block_ids() {
        let members = partition.block(block).unwrap();
        let leader = *members.iter().min().unwrap();
        for &q in members {
            repr.insert(q, leader);
        }
    }
    Ok(repr)
}

fn rebuild_from_classes(fa: &Fa, classes: &BTreeMap<StateId, StateId>) -> Result<Fa> {
    let leaders: BTreeSet<StateId> = classes.values().copied().collect();
    // BFS from the initial state's leader to assign canonical [0..k) IDs.
    let init_leader = classes[&fa.initial()];
    let mut new_id: BTreeMap<StateId, StateId> = BTreeMap::new();
    new_id.insert(init_leader, StateId(0));
    let mut order = vec![init_leader];
    let mut queue = VecDeque::from([init_leader]);
    while let Some(leader) = queue.pop_front() {
        for &a in fa.alphabet() {
            if let Some(t) = fa.targets(leader, Some(a)).into_iter().next() {
                let t_leader = classes[&t];
                if !new_id.contains_key(&t_leader) {
                    new_id.insert(t_leader, StateId(order.len() as u32));
                    order.push(t_leader);
                    queue.push_back(t_leader);
                }
            }
        }
    }
    // Any leaders unreachable in this traversal (shouldn't happen post-prune) still get IDs.
    for &leader in &leaders {
        if !new_id.contains_key(&leader) {
            new_id.insert(leader, StateId(order.len() as u32));
            order.push(leader);
        }
    }

    let mut edges: Vec<Edge> = Vec::new();
    let mut finals = BTreeSet::new();
    for &leader in &order {
        let from = new_id[&leader];
        if fa.is_final(leader) {
            finals.insert(from);
        }
        for &a in fa.alphabet() {
            if let Some(t) = fa.targets(leader, Some(a)).into_iter().next() {
                let to = new_id[&classes[&t]];
                edges.push((from, Some(a), to));
            }
        }
    }

    build_fa(
        order.len() as u32,
        fa.alphabet().to_vec(),
        edges,
        StateId(0),
        finals,
        Flavor::Dfa,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fa::closure::accepts;

    fn sym(n: u32) -> SymbolId {
        SymbolId(n)
    }

    fn spec_scenario_1_dfa() -> Fa {
        let (a, b) = (sym(0), sym(1));
        build_fa(
            5,
            vec![a, b],
            vec![
                (StateId(0), Some(a), StateId(1)),
                (StateId(0), Some(b), StateId(2)),
                (StateId(1), Some(a), StateId(3)),
                (StateId(1), Some(b), StateId(4)),
                (StateId(2), Some(a), StateId(4)),
                (StateId(2), Some(b), StateId(3)),
                (StateId(3), Some(a), StateId(3)),
                (StateId(3), Some(b), StateId(4)),
                (StateId(4), Some(a), StateId(4)),
                (StateId(4), Some(b), StateId(3)),
            ],
            StateId(0),
            [StateId(3)].into_iter().collect(),
            Flavor::Dfa,
        )
        .unwrap()
    }

    fn word(a: SymbolId, b: SymbolId, s: &str) -> Vec<SymbolId> {
        s.bytes().map(|c| if c == b'a' { a } else { b }).collect()
    }

    #[test]
    fn scenario_1_minimizes_to_two_states_naive() {
        let fa = spec_scenario_1_dfa();
        let min = minimize(&fa, &Limits::builder().hopcroft_threshold(1000).build()).unwrap();
        assert_eq!(min.num_states(), 2);
        let (a, b) = (sym(0), sym(1));
        assert!(accepts(&min, &word(a, b, "ab")));
        assert!(accepts(&min, &word(a, b, "ba")));
        assert!(accepts(&min, &word(a, b, "abaa")));
        assert!(!accepts(&min, &word(a, b, "")));
        assert!(!accepts(&min, &word(a, b, "a")));
        assert!(!accepts(&min, &word(a, b, "aa")));
        assert!(!accepts(&min, &word(a, b, "bb")));
    }

    #[test]
    fn scenario_1_minimizes_to_two_states_hopcroft() {
        let fa = spec_scenario_1_dfa();
        let min = minimize(&fa, &Limits::builder().hopcroft_threshold(0).build()).unwrap();
        assert_eq!(min.num_states(), 2);
    }

    #[test]
    fn minimize_is_idempotent() {
        let fa = spec_scenario_1_dfa();
        let limits = Limits::default();
        let once = minimize(&fa, &limits).unwrap();
        let twice = minimize(&once, &limits).unwrap();
        assert_eq!(once.num_states(), twice.num_states());
        assert_eq!(once.num_edges(), twice.num_edges());
    }
}
