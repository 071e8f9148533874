//! Bounded simulation (§4.8): a single deterministic trace for DTM and for
//! the multi-tape machine, breadth-first-with-dovetailing-style bounded
//! exploration for NTM.

use std::collections::HashSet;

use super::tape::Tape;
use super::types::{Determinism, MultiTapeTm, Move, Tm};
use crate::cancel::CancelToken;
use crate::config::Limits;
use crate::error::Outcome;
use crate::ids::{StateId, SymbolId};

/// Runs `tm` on `word`, dispatching on [`Determinism`]. The non-deterministic
/// path additionally returns a [`ComputationTreeReport`] (§4.8); the
/// deterministic path has no tree to report, so callers that want a uniform
/// signature should use [`simulate_report`].
pub fn simulate(tm: &Tm, word: &[SymbolId], limits: &Limits, cancel: &CancelToken) -> Outcome {
    match tm.determinism() {
        Determinism::Deterministic => simulate_dtm(tm, word, limits, cancel).0,
        Determinism::NonDeterministic => simulate_ntm(tm, word, limits, cancel).0,
    }
}

/// Like [`simulate`], but also returns the step count taken — the growth
/// metric C11's complexity sampler fits against an input-size schedule.
pub fn simulate_with_steps(tm: &Tm, word: &[SymbolId], limits: &Limits, cancel: &CancelToken) -> (Outcome, u64) {
    match tm.determinism() {
        Determinism::Deterministic => simulate_dtm(tm, word, limits, cancel),
        Determinism::NonDeterministic => {
            let (outcome, report) = simulate_ntm(tm, word, limits, cancel);
            (outcome, report.total_nodes)
        }
    }
}

/// Uniform `(Outcome, ComputationTreeReport)` signature for callers (e.g.
/// C11) that always want tree statistics, even the degenerate single-path
/// tree a DTM run produces.
pub fn simulate_report(
    tm: &Tm,
    word: &[SymbolId],
    limits: &Limits,
    cancel: &CancelToken,
) -> (Outcome, ComputationTreeReport) {
    match tm.determinism() {
        Determinism::Deterministic => {
            let (outcome, _) = simulate_dtm(tm, word, limits, cancel);
            let report = ComputationTreeReport {
                total_nodes: 1,
                accepting_paths: (outcome == Outcome::Accept) as u64,
                rejecting_paths: (outcome == Outcome::Reject) as u64,
                truncated_paths: matches!(outcome, Outcome::BudgetExceeded { .. }) as u64,
                max_depth_reached: 0,
            };
            (outcome, report)
        }
        Determinism::NonDeterministic => simulate_ntm(tm, word, limits, cancel),
    }
}

/// Single-configuration deterministic run (§4.8: "look up δ(q, head_symbol);
/// write, move, update state. Undefined ⇒ immediate reject.").
fn simulate_dtm(tm: &Tm, word: &[SymbolId], limits: &Limits, cancel: &CancelToken) -> (Outcome, u64) {
    let mut state = tm.initial();
    let mut tape = Tape::new(word, tm.blank());
    let mut steps = 0u64;

    loop {
        if cancel.is_cancelled() {
            return (Outcome::Cancelled, steps);
        }
        if state == tm.accept() {
            return (Outcome::Accept, steps);
        }
        if state == tm.reject() {
            return (Outcome::Reject, steps);
        }
        if steps >= limits.max_steps {
            return (Outcome::BudgetExceeded { frontier_size: 1, steps }, steps);
        }
        let sym = tape.read();
        let targets = tm.delta_successors(state, sym);
        let Some((_, next_state, write, mv)) = targets.into_iter().next() else {
            return (Outcome::Reject, steps);
        };
        tape.write(write);
        tape.step_head(mv);
        state = next_state;
        steps += 1;
    }
}

/// Per-run statistics over the NTM computation tree (§4.8).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComputationTreeReport {
    pub total_nodes: u64,
    pub accepting_paths: u64,
    pub rejecting_paths: u64,
    pub truncated_paths: u64,
    pub max_depth_reached: u64,
}

#[derive(Clone)]
struct Config {
    state: StateId,
    tape: Tape,
    depth: u64,
}

/// Breadth-first over configurations, ordering each layer's expansion by
/// ascending transition weight (§4.8 tie-break), deduping visited
/// `(state, tape, head)` triples. Accept iff any branch reaches `q_accept`
/// within `limits.max_branches`/`limits.max_steps`; reject iff every branch
/// halts or dead-ends first.
fn simulate_ntm(
    tm: &Tm,
    word: &[SymbolId],
    limits: &Limits,
    cancel: &CancelToken,
) -> (Outcome, ComputationTreeReport) {
    #[cfg(feature = "log")]
    log::debug!("turing::simulate_ntm: |w|={}", word.len());

    let mut report = ComputationTreeReport::default();
    let mut frontier = vec![Config { state: tm.initial(), tape: Tape::new(word, tm.blank()), depth: 0 }];
    let mut visited: HashSet<(StateId, Tape)> = HashSet::new();
    let mut steps = 0u64;

    loop {
        if cancel.is_cancelled() {
            return (Outcome::Cancelled, report);
        }
        if frontier.is_empty() {
            return (Outcome::Reject, report);
        }
        if frontier.len() > limits.max_branches {
            #[cfg(feature = "log")]
            log::warn!("turing::simulate_ntm: frontier {} exceeds max_branches", frontier.len());
            report.truncated_paths += frontier.len() as u64;
            return (Outcome::BudgetExceeded { frontier_size: frontier.len(), steps }, report);
        }
        if steps >= limits.max_steps {
            report.truncated_paths += frontier.len() as u64;
            return (Outcome::BudgetExceeded { frontier_size: frontier.len(), steps }, report);
        }

        let mut next = Vec::new();
        for config in frontier {
            report.total_nodes += 1;
            report.max_depth_reached = report.max_depth_reached.max(config.depth);

            if config.state == tm.accept() {
                report.accepting_paths += 1;
                return (Outcome::Accept, report);
            }
            if config.state == tm.reject() {
                report.rejecting_paths += 1;
                continue;
            }
            let key = (config.state, config.tape.clone());
            if !visited.insert(key) {
                continue; // cycle pruned (§4.8 visited set)
            }
            let sym = config.tape.read();
            let targets = tm.delta_successors(config.state, sym);
            if targets.is_empty() {
                report.rejecting_paths += 1; // undefined transition halts this branch
                continue;
            }
            for (_, next_state, write, mv) in targets {
                let mut tape = config.tape.clone();
                tape.write(write);
                tape.step_head(mv);
                next.push(Config { state: next_state, tape, depth: config.depth + 1 });
            }
        }
        frontier = next;
        steps += 1;
    }
}

/// Deterministic vectorized step over `k` tapes (§4.8).
pub fn simulate_multi_tape(
    mt: &MultiTapeTm,
    inputs: &[Vec<SymbolId>],
    limits: &Limits,
    cancel: &CancelToken,
) -> Outcome {
    let k = mt.num_tapes();
    let mut tapes: Vec<Tape> = (0..k)
        .map(|i| Tape::new(inputs.get(i).map(|v| v.as_slice()).unwrap_or(&[]), mt.blank(i)))
        .collect();
    let mut state = mt.initial();
    let mut steps = 0u64;

    loop {
        if cancel.is_cancelled() {
            return Outcome::Cancelled;
        }
        if state == mt.accept() {
            return Outcome::Accept;
        }
        if state == mt.reject() {
            return Outcome::Reject;
        }
        if steps >= limits.max_steps {
            return Outcome::BudgetExceeded { frontier_size: 1, steps };
        }
        let reads: Vec<SymbolId> = tapes.iter().map(|t| t.read()).collect();
        let Some((next_state, writes, moves)) = mt.step(state, &reads) else {
            return Outcome::Reject;
        };
        for i in 0..k {
            tapes[i].write(writes[i]);
            tapes[i].step_head(moves[i]);
        }
        state = next_state;
        steps += 1;
    }
}
