//! Bounded simulation (§4.4): a single deterministic trace for DPDA, bounded
//! BFS over configurations for NPDA.

use std::collections::{HashSet, VecDeque};

use super::stack::Stack;
use super::types::{AcceptMode, Determinism, Pda};
use crate::cancel::CancelToken;
use crate::config::Limits;
use crate::error::Outcome;
use crate::ids::SymbolId;

fn accepted(pda: &Pda, state: crate::ids::StateId, stack: &Stack) -> bool {
    match pda.accept_mode() {
        AcceptMode::FinalState => pda.is_final(state),
        AcceptMode::EmptyStack => stack.is_empty(),
    }
}

/// Runs `pda` on `word`, dispatching on [`Determinism`]. Both paths accept a
/// [`CancelToken`] and consult `limits.max_steps` as the bound on how many
/// configuration transitions (deterministic) or BFS layers× frontier
/// (non-deterministic) may be explored before giving up.
pub fn simulate(pda: &Pda, word: &[SymbolId], limits: &Limits, cancel: &CancelToken) -> Outcome {
    match pda.determinism() {
        Determinism::Deterministic => simulate_dpda(pda, word, limits, cancel),
        Determinism::NonDeterministic => simulate_npda(pda, word, limits, cancel),
    }
}

/// Single-configuration run. ε-moves are taken eagerly exactly when they are
/// the unique applicable transition — guaranteed unique by the DPDA
/// construction-time check, so "eager" here just means "prefer ε over
/// consuming input whenever `(q, ε, Z)` is non-empty".
fn simulate_dpda(pda: &Pda, word: &[SymbolId], limits: &Limits, cancel: &CancelToken) -> Outcome {
    let mut state = pda.initial();
    let mut stack = Stack::from_vec(&[pda.initial_stack_symbol()]);
    let mut pos = 0usize;
    let mut visited: HashSet<(crate::ids::StateId, usize, Stack)> = HashSet::new();
    let mut steps = 0u64;

    loop {
        if cancel.is_cancelled() {
            return Outcome::Cancelled;
        }
        if steps >= limits.max_steps {
            return Outcome::BudgetExceeded { frontier_size: 1, steps };
        }
        if !visited.insert((state, pos, stack.clone())) {
            // Self-looping ε-cycle consuming no input (§4.4 edge case).
            return Outcome::BudgetExceeded { frontier_size: 1, steps };
        }

        let top = match stack.top() {
            Some(t) => t,
            None => return Outcome::Reject,
        };
        let eps = pda.successors(state, None, top);
        if let Some((next_state, push)) = eps.iter().next() {
            state = *next_state;
            stack = stack.replace_top(push);
            steps += 1;
            continue;
        }

        if pos == word.len() {
            return if accepted(pda, state, &stack) { Outcome::Accept } else { Outcome::Reject };
        }

        let a = word[pos];
        let rules = pda.successors(state, Some(a), top);
        match rules.iter().next() {
            Some((next_state, push)) => {
                state = *next_state;
                stack = stack.replace_top(push);
                pos += 1;
                steps += 1;
            }
            None => return Outcome::Reject,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct Config {
    state: crate::ids::StateId,
    pos: usize,
    stack: Stack,
}

/// Bounded BFS per §4.4: pops the frontier, enqueues every reachable
/// successor under the current symbol or ε, stopping at input end (accept
/// if any configuration is accepting), an empty frontier (reject), or
/// `limits.max_branches` live configurations (`BudgetExceeded`).
fn simulate_npda(pda: &Pda, word: &[SymbolId], limits: &Limits, cancel: &CancelToken) -> Outcome {
    #[cfg(feature = "log")]
    log::debug!("simulate_npda: |w|={}", word.len());

    let start = Config { state: pda.initial(), pos: 0, stack: Stack::from_vec(&[pda.initial_stack_symbol()]) };
    let mut frontier: VecDeque<Config> = VecDeque::from([start]);
    let mut visited: HashSet<(crate::ids::StateId, usize, Stack)> = HashSet::new();
    let mut steps = 0u64;

    while !frontier.is_empty() {
        if cancel.is_cancelled() {
            return Outcome::Cancelled;
        }
        if frontier.len() > limits.max_branches {
            #[cfg(feature = "log")]
            log::warn!("simulate_npda: frontier {} exceeds max_branches", frontier.len());
            return Outcome::BudgetExceeded { frontier_size: frontier.len(), steps };
        }
        if steps >= limits.max_steps {
            return Outcome::BudgetExceeded { frontier_size: frontier.len(), steps };
        }

        let mut next: VecDeque<Config> = VecDeque::new();
        let mut any_expanded = false;
        for config in frontier.drain(..) {
            if config.pos == word.len() && accepted(pda, config.state, &config.stack) {
                return Outcome::Accept;
            }
            let top = match config.stack.top() {
                Some(t) => t,
                None => continue,
            };
            let key = (config.state, config.pos, config.stack.clone());
            if !visited.insert(key) {
                continue;
            }

            for (next_state, push) in pda.successors(config.state, None, top) {
                any_expanded = true;
                next.push_back(Config {
                    state: *next_state,
                    pos: config.pos,
                    stack: config.stack.replace_top(push),
                });
            }
            if config.pos < word.len() {
                let a = word[config.pos];
                for (next_state, push) in pda.successors(config.state, Some(a), top) {
                    any_expanded = true;
                    next.push_back(Config {
                        state: *next_state,
                        pos: config.pos + 1,
                        stack: config.stack.replace_top(push),
                    });
                }
            }
        }
        if !any_expanded {
            return Outcome::Reject;
        }
        frontier = next;
        steps += 1;
    }
    Outcome::Reject
}
