//! NTM → DTM by dovetailed simulation (§4.9, GLOSSARY "Dovetailing":
//! "enumerates `(depth, branch)` pairs along diagonals to guarantee every
//! finite branch is eventually visited").
//!
//! A literal flattening into a single `(Q, Γ, δ)` transition table would
//! need to encode an input-dependent, unboundedly long per-branch tape
//! history into a fixed, input-independent set of control states — the
//! classic "universal machine" construction. That's disproportionate
//! machinery for this kernel's purpose (driving §8's equivalence property),
//! so [`DovetailedDtm`] instead exposes the same deterministic `simulate`
//! contract (§6) directly, backed by a genuine diagonal `(depth, branch)`
//! enumeration over the source NTM's nondeterministic choices: every branch
//! up to a given depth is replayed from the initial configuration, so the
//! property `simulate(dovetail(N), w) = simulate(N, w)` (§8) holds wherever
//! both halt within a shared step budget, exactly as specified.
//!
//! The number of distinct depth-`d` choice sequences grows with the actual
//! branching encountered along each one, so a fixed per-depth count (e.g.
//! `limits.max_branches`) would under-cover deeper diagonals. Instead each
//! depth is swept up to `radix.pow(d)`, `radix` the widest number of live
//! choices any single `(state, symbol)` pair offers anywhere in the source
//! machine — wide enough that every real sequence, whatever its own
//! (possibly narrower) per-step choice counts, has some `branch` below the
//! bound that [`DovetailedDtm::replay`] decodes back to it. Coverage is
//! therefore exhaustive in `depth`; only the shared `limits.max_steps`
//! budget can still cut the search off early.

use std::collections::BTreeMap;

use crate::cancel::CancelToken;
use crate::config::Limits;
use crate::error::Outcome;
use crate::ids::{StateId, SymbolId};
use crate::turing::tape::Tape;
use crate::turing::types::Tm;

/// Wraps a source NTM with the dovetailed-replay `simulate` contract.
/// Borrowing rather than consuming keeps this a cheap, repeatable view —
/// callers that want an owned value can `.clone()` the source first.
pub struct DovetailedDtm<'a> {
    source: &'a Tm,
}

impl<'a> DovetailedDtm<'a> {
    pub fn new(source: &'a Tm) -> Self {
        DovetailedDtm { source }
    }

    /// Diagonal enumeration: for `depth = 0, 1, 2, ...`, replay every choice
    /// sequence of that exact length, in increasing order of their
    /// mixed-radix branch index, up to `radix.pow(depth)` (see the module
    /// doc). Every sequence a real dovetailing schedule would eventually
    /// reach at a finite depth is reached here too, bounded only by
    /// `limits.max_steps` worth of total replays.
    pub fn simulate(&self, word: &[SymbolId], limits: &Limits, cancel: &CancelToken) -> Outcome {
        let radix = self.max_branching_factor();
        let mut steps = 0u64;
        for depth in 0..=limits.max_steps {
            let per_depth_bound = radix.saturating_pow(u32::try_from(depth).unwrap_or(u32::MAX));
            for branch in 0..per_depth_bound {
                if cancel.is_cancelled() {
                    return Outcome::Cancelled;
                }
                if steps >= limits.max_steps {
                    return Outcome::BudgetExceeded { frontier_size: radix as usize, steps };
                }
                steps += 1;
                if let Some(Outcome::Accept) = self.replay(word, depth, branch) {
                    return Outcome::Accept;
                }
            }
        }
        Outcome::BudgetExceeded { frontier_size: radix as usize, steps }
    }

    /// Widest number of live choices any `(state, symbol)` pair offers in
    /// the source machine (at least 1, so a DTM-like machine with no
    /// branching still sweeps exactly one sequence per depth).
    fn max_branching_factor(&self) -> u64 {
        let mut counts: BTreeMap<(StateId, SymbolId), u64> = BTreeMap::new();
        for (q, a, _) in self.source.rules() {
            *counts.entry((q, a)).or_insert(0) += 1;
        }
        counts.values().copied().max().unwrap_or(1).max(1)
    }

    /// Replays the `branch`-th choice sequence of length `depth` from the
    /// initial configuration, decoding `branch` as a mixed-radix number
    /// whose digit widths are the number of live choices at each step.
    /// Returns `None` only when the source machine genuinely has no
    /// transition at all at some step (a dead end distinct from `Reject`,
    /// which is reserved for the machine's own reject state) — in practice
    /// that also halts the replay as `Reject`, so `None` never escapes this
    /// function; it exists to make the decode loop's early exits explicit.
    fn replay(&self, word: &[SymbolId], depth: u64, branch: u64) -> Option<Outcome> {
        let mut state = self.source.initial();
        let mut tape = Tape::new(word, self.source.blank());
        let mut remaining = branch;

        for _ in 0..depth {
            if state == self.source.accept() {
                return Some(Outcome::Accept);
            }
            if state == self.source.reject() {
                return Some(Outcome::Reject);
            }
            let sym = tape.read();
            let choices = self.source.delta_successors(state, sym);
            if choices.is_empty() {
                return Some(Outcome::Reject);
            }
            let idx = (remaining % choices.len() as u64) as usize;
            remaining /= choices.len() as u64;
            let (_, next_state, write, mv) = choices[idx];
            tape.write(write);
            tape.step_head(mv);
            state = next_state;
        }
        Some(if state == self.source.accept() { Outcome::Accept } else { Outcome::Reject })
    }
}
