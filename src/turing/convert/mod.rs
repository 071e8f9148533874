//! C10: Turing conversions — NTM → DTM by dovetailed simulation, multi-tape
//! → single-tape by track encoding, state/symbol minimization, and the
//! post-conversion equivalence verification shared by both (§4.9).

pub mod dovetail;
pub mod minimize;
pub mod track;

pub use dovetail::DovetailedDtm;
pub use minimize::{minimize_states, minimize_symbols, verify_equivalence, verify_tm_equivalence, words_up_to};
pub use track::{TrackEncodedDtm, TrackEncoder};
