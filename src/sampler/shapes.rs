//! Closed-family growth-shape fitting (§4.10): "Fits each series to the
//! closed family `{c, c·n, c·n·log n, c·n², c·n³, c·2ⁿ}` by least-squares in
//! log space; picks the lowest-growth member whose residual is within a
//! fixed tolerance `τ` of the best."

use std::fmt;

/// One member of the closed growth family, ordered from lowest to highest
/// growth — the order [`fit_shape`] uses to break ties toward simplicity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Constant,
    Linear,
    Linearithmic,
    Quadratic,
    Cubic,
    Exponential,
}

impl Shape {
    const ALL: [Shape; 6] = [
        Shape::Constant,
        Shape::Linear,
        Shape::Linearithmic,
        Shape::Quadratic,
        Shape::Cubic,
        Shape::Exponential,
    ];

    /// `g(n)` for the shape's growth function, ignoring the fitted constant.
    fn growth(self, n: f64) -> f64 {
        match self {
            Shape::Constant => 1.0,
            Shape::Linear => n,
            Shape::Linearithmic => n * n.max(2.0).ln(),
            Shape::Quadratic => n * n,
            Shape::Cubic => n * n * n,
            Shape::Exponential => 2f64.powf(n),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Shape::Constant => "c",
            Shape::Linear => "c·n",
            Shape::Linearithmic => "c·n·log n",
            Shape::Quadratic => "c·n²",
            Shape::Cubic => "c·n³",
            Shape::Exponential => "c·2ⁿ",
        };
        write!(f, "{s}")
    }
}

/// Result of fitting one `(size, value)` series to the closed family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeFit {
    pub shape: Shape,
    pub constant: f64,
    pub residual: f64,
    /// `1 − (second_best_residual / best_residual)`, clamped to `[0, 1]`.
    pub confidence: f64,
}

/// Least-squares fit of `log(value) = log(c) + log(g(n))` per shape —
/// equivalently `log(c) = mean(log(value) - log(g(n)))`, with the residual
/// the mean squared error of that fit in log space. Picks the lowest-growth
/// shape whose residual is within `tolerance` of the best; ties broken by
/// [`Shape`]'s declared order (lowest growth first).
pub fn fit_shape(points: &[(usize, u64)], tolerance: f64) -> ShapeFit {
    assert!(!points.is_empty(), "fit_shape requires at least one sample point");

    let mut candidates: Vec<(Shape, f64, f64)> = Vec::new();
    for shape in Shape::ALL {
        let (log_c, residual) = fit_one(shape, points);
        candidates.push((shape, log_c, residual));
    }
    candidates.sort_by(|a, b| a.2.partial_cmp(&b.2).expect("residuals are finite"));

    let best_residual = candidates[0].2;
    let second_best_residual = candidates.get(1).map(|c| c.2).unwrap_or(best_residual);

    let chosen = candidates
        .iter()
        .filter(|(_, _, r)| *r <= best_residual + tolerance)
        .min_by_key(|(shape, _, _)| *shape)
        .expect("candidates is non-empty");

    let confidence = if best_residual.abs() < 1e-12 {
        1.0
    } else {
        (1.0 - second_best_residual / best_residual).clamp(0.0, 1.0)
    };

    ShapeFit { shape: chosen.0, constant: chosen.1.exp(), residual: chosen.2, confidence }
}

fn fit_one(shape: Shape, points: &[(usize, u64)]) -> (f64, f64) {
    let logs: Vec<(f64, f64)> = points
        .iter()
        .map(|&(n, v)| {
            let log_g = shape.growth(n as f64).max(f64::MIN_POSITIVE).ln();
            let log_v = (v as f64).max(1.0).ln();
            (log_v, log_g)
        })
        .collect();

    let log_c = logs.iter().map(|(log_v, log_g)| log_v - log_g).sum::<f64>() / logs.len() as f64;
    let residual = logs
        .iter()
        .map(|(log_v, log_g)| {
            let predicted = log_c + log_g;
            (log_v - predicted).powi(2)
        })
        .sum::<f64>()
        / logs.len() as f64;

    (log_c, residual)
}
