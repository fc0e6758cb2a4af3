use std::f64::consts::PI;
use ndarray::Array2;

/// Truncated orthonormal DCT-II basis.
///
/// Row `k` holds the `k`-th cosine over `n` samples, so `C · X · Cᵀ` gives the
/// `keep`×`keep` lowest-frequency coefficients of an `n`×`n` block `X`.
#[derive(Debug, Clone)]
pub struct DctBasis {
    c: Array2<f64>,
}

impl DctBasis {
    pub fn new(n: usize, keep: usize) -> Self {
        let keep = keep.min(n);
        let nf = n as f64;
        let c = Array2::from_shape_fn((keep, n), |(k, i)| {
            let alpha = if k == 0 { (1.0 / nf).sqrt() } else { (2.0 / nf).sqrt() };
            alpha * (PI * (2 * i + 1) as f64 * k as f64 / (2.0 * nf)).cos()
        });
        Self { c }
    }

    /// Low-frequency block of `block`, indexed `[vertical, horizontal]`.
    pub fn low_frequencies(&self, block: &Array2<f64>) -> Array2<f64> {
        self.c.dot(block).dot(&self.c.t())
    }
}
