//! Diagonal helpers for mesh operators
//!
//! Products, transposes, stacking and Kronecker products come straight
//! from sprs; these cover the diagonal bookkeeping sprs has no name for.

use sprs::CsMat;

/// Diagonal matrix with `d` on the diagonal
pub fn sdiag(d: &[f64]) -> CsMat<f64> {
    let n = d.len();
    CsMat::new((n, n), (0..=n).collect(), (0..n).collect(), d.to_vec())
}

/// Main diagonal of a matrix (missing entries are 0)
pub fn diagonal(a: &CsMat<f64>) -> Vec<f64> {
    a.diag_iter().map(|v| v.copied().unwrap_or(0.0)).collect()
}

/// Inverse of a diagonal matrix, entry by entry
///
/// Only the diagonal of `a` is read. A zero diagonal entry becomes infinite.
pub fn sd_inv(a: &CsMat<f64>) -> CsMat<f64> {
    let inv: Vec<f64> = diagonal(a).iter().map(|&x| 1.0 / x).collect();
    sdiag(&inv)
}
