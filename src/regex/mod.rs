//! C4: the regex front-end — parsing (§4.3's grammar), Thompson construction
//! into an ε-NFA, and the inverse direction (automaton → regex) by state
//! elimination.

pub mod ast;
pub mod parser;
pub mod thompson;
pub mod to_regex;

pub use ast::{Ast, ClassKind};
pub use parser::parse;
pub use thompson::{compile, thompson_construct};
pub use to_regex::{state_eliminate, RegexExpr};
