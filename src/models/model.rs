//! Polynomial design rows and prediction.
//!
//! Coefficients are ordered from the highest power down to the constant term,
//! so `theta = [a, b, c]` means `y = a*x^2 + b*x + c`.

/// Fill a design row `[x^d, x^(d-1), ..., x, 1]` where `d = out.len() - 1`.
pub fn fill_design_row(x: f64, out: &mut [f64]) {
    let mut power = 1.0;
    for slot in out.iter_mut().rev() {
        *slot = power;
        power *= x;
    }
}

/// Evaluate the fitted polynomial at `x` (Horner's scheme).
pub fn predict(theta: &[f64], x: f64) -> f64 {
    theta.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Evaluate the fitted polynomial over a grid of x-values.
pub fn predict_grid(theta: &[f64], xs: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| predict(theta, x)).collect()
}

/// `steps` evenly spaced points from `lo` to `hi`, both ends included.
///
/// `steps < 2` yields just `[lo]` (or nothing for `0`).
pub fn linspace(lo: f64, hi: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![lo],
        _ => (0..steps)
            .map(|i| {
                let t = i as f64 / (steps - 1) as f64;
                lo + t * (hi - lo)
            })
            .collect(),
    }
}
