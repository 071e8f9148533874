//! C11: the complexity sampler. "Wraps recognition. For a given machine and
//! an input-size schedule `n₁ < n₂ < … < nₘ`, runs `S` trials per size and
//! records `(steps, materialized_cells, wall_time)`." (§4.10)
//!
//! The sampler is deliberately generic over *how* a trial is run — it
//! doesn't know FA from PDA from TM, only that the caller can produce an
//! input of a given size and run it, reporting back a step count and a
//! materialized-cell count alongside the [`Outcome`]. That keeps this module
//! a thin cross-cutting layer over C3/C5/C9 rather than a fourth kernel.

pub mod decidability;
pub mod shapes;

pub use decidability::{classify, DecidabilityLabel};
pub use shapes::{fit_shape, Shape, ShapeFit};

use std::time::{Duration, Instant};

use crate::config::SampleSchedule;
use crate::error::Outcome;

/// One trial's raw measurements, before any fitting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trial {
    pub size: usize,
    pub outcome: Outcome,
    pub steps: u64,
    pub materialized_cells: u64,
    pub wall_time: Duration,
}

/// The sampler's full output: growth-shape fits for both measured metrics,
/// plus an empirical decidability label (§4.10 — "never claims
/// `Undecidable`").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleReport {
    pub steps_fit: ShapeFit,
    pub cells_fit: ShapeFit,
    pub decidability: DecidabilityLabel,
    pub trial_count: usize,
}

/// Tolerance `τ` used to decide which shapes are "close enough" to the best
/// residual (§4.10). Not caller-configurable: it's a fitting-quality
/// constant, not a resource budget, so it doesn't belong in [`crate::config::Limits`].
const SHAPE_TOLERANCE: f64 = 0.15;

/// Runs `run` over every `(size, trial)` pair in `schedule`, fitting the
/// resulting step and cell series to the closed growth family and
/// classifying the collected outcomes' decidability.
///
/// `make_input(size)` produces one input of the requested size; `run(input)`
/// executes it and reports `(outcome, steps, materialized_cells)`. Called
/// `schedule.sizes.len() * schedule.trials_per_size` times.
pub fn sample(
    schedule: &SampleSchedule,
    mut make_input: impl FnMut(usize) -> Vec<crate::ids::SymbolId>,
    mut run: impl FnMut(&[crate::ids::SymbolId]) -> (Outcome, u64, u64),
) -> SampleReport {
    let mut trials = Vec::with_capacity(schedule.sizes.len() * schedule.trials_per_size);

    for &size in &schedule.sizes {
        for _ in 0..schedule.trials_per_size {
            let input = make_input(size);
            let start = Instant::now();
            let (outcome, steps, materialized_cells) = run(&input);
            let wall_time = start.elapsed();
            #[cfg(feature = "log")]
            log::trace!("sampler::sample: size={size} steps={steps} cells={materialized_cells}");
            trials.push(Trial { size, outcome, steps, materialized_cells, wall_time });
        }
    }

    report_from(&trials)
}

/// Builds a [`SampleReport`] from already-collected trials — the split from
/// [`sample`] exists so callers with their own trial-collection loop (e.g.
/// one that also checks a [`crate::cancel::CancelToken`] between sizes) can
/// still reuse the fitting and classification logic.
pub fn report_from(trials: &[Trial]) -> SampleReport {
    assert!(!trials.is_empty(), "report_from requires at least one trial");

    let steps_points: Vec<(usize, u64)> = trials.iter().map(|t| (t.size, t.steps)).collect();
    let cells_points: Vec<(usize, u64)> = trials.iter().map(|t| (t.size, t.materialized_cells)).collect();
    let outcomes: Vec<Outcome> = trials.iter().map(|t| t.outcome).collect();

    SampleReport {
        steps_fit: fit_shape(&steps_points, SHAPE_TOLERANCE),
        cells_fit: fit_shape(&cells_points, SHAPE_TOLERANCE),
        decidability: classify(&outcomes),
        trial_count: trials.len(),
    }
}
