//! The error taxonomy (§7): one [`Error`] enum shared by every kernel, plus
//! the four-valued recognition [`Outcome`] that must never collapse budget
//! exhaustion or cancellation into `Reject`.

use std::fmt;

/// Where a [`Error::DeterminismConflict`] was detected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConflictSite {
    pub state: crate::ids::StateId,
    pub symbol: Option<crate::ids::SymbolId>,
    pub stack_top: Option<crate::ids::SymbolId>,
}

impl fmt::Display for ConflictSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state {:?}", self.state)?;
        if let Some(sym) = self.symbol {
            write!(f, ", symbol {:?}", sym)?;
        }
        if let Some(top) = self.stack_top {
            write!(f, ", stack top {:?}", top)?;
        }
        Ok(())
    }
}

/// Position + kind of a malformed regex, for [`Error::RegexSyntaxError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegexSyntaxKind {
    UnbalancedParens,
    TrailingPostfixOperator,
    UnknownEscape(char),
    EmptyGroup,
    UnexpectedEnd,
}

impl fmt::Display for RegexSyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexSyntaxKind::UnbalancedParens => write!(f, "unbalanced parentheses"),
            RegexSyntaxKind::TrailingPostfixOperator => {
                write!(f, "trailing postfix operator with nothing to apply to")
            }
            RegexSyntaxKind::UnknownEscape(c) => write!(f, "unknown escape sequence '\\{c}'"),
            RegexSyntaxKind::EmptyGroup => write!(f, "empty group"),
            RegexSyntaxKind::UnexpectedEnd => write!(f, "unexpected end of pattern"),
        }
    }
}

/// Which normalization phase of the grammar engine (C6) failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrammarPhase {
    ReachabilityPrune,
    ProductivityPrune,
    EpsilonElimination,
    UnitElimination,
    Binarization,
    LeftRecursionElimination,
}

impl fmt::Display for GrammarPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GrammarPhase::ReachabilityPrune => "reachability prune",
            GrammarPhase::ProductivityPrune => "productivity prune",
            GrammarPhase::EpsilonElimination => "epsilon-production elimination",
            GrammarPhase::UnitElimination => "unit-production elimination",
            GrammarPhase::Binarization => "binarization",
            GrammarPhase::LeftRecursionElimination => "left-recursion elimination",
        };
        write!(f, "{s}")
    }
}

/// The full error taxonomy of §7, shared by all twelve components.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("invalid automaton: {reason}")]
    InvalidAutomaton { reason: String },

    #[error("determinism conflict at {site}")]
    DeterminismConflict { site: ConflictSite },

    #[error("regex syntax error at position {position}: {kind}")]
    RegexSyntaxError {
        position: usize,
        kind: RegexSyntaxKind,
    },

    #[error("grammar error during {phase}: {detail}")]
    GrammarError { phase: GrammarPhase, detail: String },

    #[error("conversion equivalence failure on witness {witness:?}")]
    ConversionEquivalenceFailure { witness: Vec<crate::ids::SymbolId> },

    #[error("budget exceeded after {steps} steps with frontier size {frontier_size}")]
    BudgetExceeded { frontier_size: usize, steps: u64 },

    #[error("operation cancelled")]
    Cancelled,

    #[error("partition engine contract violation: {detail}")]
    PartitionContract { detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// The four-valued recognition outcome (§6, §7). Never folds `BudgetExceeded`
/// or `Cancelled` into `Reject` — callers that want "treat as reject" must
/// say so explicitly via [`Outcome::accepted`]'s counterpart or by matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Accept,
    Reject,
    BudgetExceeded { frontier_size: usize, steps: u64 },
    Cancelled,
}

impl Outcome {
    /// `true` only for [`Outcome::Accept`]. Shorthand for callers that do
    /// want to collapse the non-accept cases, making that choice explicit at
    /// the call site instead of silently in the kernel.
    pub fn is_accept(self) -> bool {
        matches!(self, Outcome::Accept)
    }
}
