//! Structural fingerprinting (§4.11: "a structural fingerprint of the input
//! automaton (canonical state renumbering + sorted transition list hashed
//! into a fixed-width digest)"). Hashing is SHA-256 rather than a
//! general-purpose `Hash` impl: the cache key must be stable across process
//! runs (a `std::hash::Hash`-derived value is seed-randomized per process),
//! and a cryptographic digest is cheap insurance against accidental
//! collisions between structurally distinct automata.

use sha2::{Digest, Sha256};

use crate::fa::types::Fa;
use crate::ids::{StateId, SymbolId};
use crate::pda::types::Pda;
use crate::turing::types::Tm;

/// A fixed-width (32-byte) structural digest, usable as a cache key (§4.11).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(pub [u8; 32]);

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "…")
    }
}

/// Implemented by every automaton kind the cache (C12) can key on. Expected
/// to be called on an already canonically-renumbered instance (e.g. the
/// output of `minimize`, `subset_construct`, or a fresh `build_*` call) —
/// fingerprinting itself does not renumber, since most callers already hold
/// a canonical instance and renumbering here would hide accidental
/// non-canonical input rather than surface it.
pub trait Fingerprintable {
    /// A canonical byte encoding: every structural fact that distinguishes
    /// this automaton from another, independent of incidental layout (e.g.
    /// `BTreeMap` iteration order, which is already sorted by key).
    fn canonical_bytes(&self) -> Vec<u8>;
}

/// Hashes `value`'s canonical encoding into a [`Fingerprint`].
pub fn fingerprint_of(value: &impl Fingerprintable) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(value.canonical_bytes());
    Fingerprint(hasher.finalize().into())
}

fn push_state(buf: &mut Vec<u8>, q: StateId) {
    buf.extend_from_slice(&q.0.to_le_bytes());
}

fn push_symbol(buf: &mut Vec<u8>, s: SymbolId) {
    buf.extend_from_slice(&s.0.to_le_bytes());
}

impl Fingerprintable for Fa {
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(self.flavor() as u8);
        buf.extend_from_slice(&self.num_states().to_le_bytes());
        push_state(&mut buf, self.initial());
        for &a in self.alphabet() {
            push_symbol(&mut buf, a);
        }
        for q in self.finals() {
            push_state(&mut buf, *q);
        }
        // `edges()` iterates a `BTreeMap` keyed `(from, symbol)` then a
        // `BTreeSet<StateId>` of targets — already sorted (§4.1 "sorted
        // transition list").
        for (from, sym, to) in self.edges() {
            push_state(&mut buf, from);
            buf.extend_from_slice(&sym.map(|s| s.0).unwrap_or(u32::MAX).to_le_bytes());
            push_state(&mut buf, to);
        }
        buf
    }
}

impl Fingerprintable for Pda {
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(self.determinism() as u8);
        buf.push(self.accept_mode() as u8);
        buf.extend_from_slice(&self.num_states().to_le_bytes());
        push_state(&mut buf, self.initial());
        push_symbol(&mut buf, self.initial_stack_symbol());
        for &a in self.input_alphabet() {
            push_symbol(&mut buf, a);
        }
        for &z in self.stack_alphabet() {
            push_symbol(&mut buf, z);
        }
        for q in self.finals() {
            push_state(&mut buf, *q);
        }
        for (from, a, z, (to, push)) in self.rules() {
            push_state(&mut buf, from);
            buf.extend_from_slice(&a.map(|s| s.0).unwrap_or(u32::MAX).to_le_bytes());
            push_symbol(&mut buf, z);
            push_state(&mut buf, *to);
            buf.extend_from_slice(&(push.len() as u32).to_le_bytes());
            for &s in push {
                push_symbol(&mut buf, s);
            }
        }
        buf
    }
}

impl Fingerprintable for Tm {
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(self.determinism() as u8);
        buf.extend_from_slice(&self.num_states().to_le_bytes());
        push_state(&mut buf, self.initial());
        push_state(&mut buf, self.accept());
        push_state(&mut buf, self.reject());
        push_symbol(&mut buf, self.blank());
        for &a in self.input_alphabet() {
            push_symbol(&mut buf, a);
        }
        for &g in self.tape_alphabet() {
            push_symbol(&mut buf, g);
        }
        for (q, a, &(weight, to, write, mv)) in self.rules() {
            push_state(&mut buf, q);
            push_symbol(&mut buf, a);
            buf.extend_from_slice(&weight.to_le_bytes());
            push_state(&mut buf, to);
            push_symbol(&mut buf, write);
            buf.push(mv as u8);
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fa::types::{build_fa, Flavor};

    fn sym(n: u32) -> SymbolId {
        SymbolId(n)
    }

    #[test]
    fn identical_automata_fingerprint_equal() {
        let build = || {
            build_fa(
                2,
                vec![sym(0)],
                vec![(StateId(0), Some(sym(0)), StateId(1))],
                StateId(0),
                [StateId(1)].into_iter().collect(),
                Flavor::Dfa,
            )
            .unwrap()
        };
        assert_eq!(fingerprint_of(&build()), fingerprint_of(&build()));
    }

    #[test]
    fn structurally_different_automata_fingerprint_differently() {
        let a = build_fa(
            2,
            vec![sym(0)],
            vec![(StateId(0), Some(sym(0)), StateId(1))],
            StateId(0),
            [StateId(1)].into_iter().collect(),
            Flavor::Dfa,
        )
        .unwrap();
        let b = build_fa(
            2,
            vec![sym(0)],
            vec![(StateId(0), Some(sym(0)), StateId(0))],
            StateId(0),
            [StateId(1)].into_iter().collect(),
            Flavor::Dfa,
        )
        .unwrap();
        assert_ne!(fingerprint_of(&a), fingerprint_of(&b));
    }
}
