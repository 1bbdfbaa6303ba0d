use std::sync::OnceLock;

use nalgebra::DMatrix;

use super::location::LocType;

/// Cartesian product of per-axis coordinate vectors
///
/// Returns an `M × d` matrix, `M` the product of the vector lengths, with
/// the first axis varying fastest:
///
/// ```text
/// row = i0 + n0 * i1 + n0 * n1 * i2
/// ```
pub fn ndgrid(vectors: &[Vec<f64>]) -> DMatrix<f64> {
    let lens: Vec<usize> = vectors.iter().map(|v| v.len()).collect();
    let rows: usize = lens.iter().product();

    DMatrix::from_fn(rows, vectors.len(), |row, axis| {
        let stride: usize = lens[..axis].iter().product();
        vectors[axis][(row / stride) % lens[axis]]
    })
}

/// Tensor (Kronecker) product of 1-D factors, flattened first-axis-fastest
///
/// For two factors this is the column-major flattening of `outer(a, b)`.
pub fn tensor_product(factors: &[Vec<f64>]) -> Vec<f64> {
    let mut out = vec![1.0];
    for factor in factors {
        let mut next = Vec::with_capacity(out.len() * factor.len());
        for &f in factor {
            next.extend(out.iter().map(|&o| o * f));
        }
        out = next;
    }
    out
}

/// Compute-once storage for the eight staggered grids of a mesh
///
/// Each slot is filled with a whole matrix on first access and never
/// invalidated; the mesh widths and origin cannot change after construction.
#[derive(Debug, Clone, Default)]
pub struct GridCache {
    cc: OnceLock<DMatrix<f64>>,
    n: OnceLock<DMatrix<f64>>,
    fx: OnceLock<DMatrix<f64>>,
    fy: OnceLock<DMatrix<f64>>,
    fz: OnceLock<DMatrix<f64>>,
    ex: OnceLock<DMatrix<f64>>,
    ey: OnceLock<DMatrix<f64>>,
    ez: OnceLock<DMatrix<f64>>,
}

impl GridCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn slot(&self, loc: LocType) -> &OnceLock<DMatrix<f64>> {
        match loc {
            LocType::CC => &self.cc,
            LocType::N => &self.n,
            LocType::Fx => &self.fx,
            LocType::Fy => &self.fy,
            LocType::Fz => &self.fz,
            LocType::Ex => &self.ex,
            LocType::Ey => &self.ey,
            LocType::Ez => &self.ez,
        }
    }

    /// Number of grids materialised so far
    pub fn len(&self) -> usize {
        LocType::ALL
            .iter()
            .filter(|loc| self.slot(**loc).get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndgrid_first_axis_fastest() {
        let grid = ndgrid(&[vec![0.0, 1.0, 2.0], vec![10.0, 20.0]]);

        assert_eq!(grid.nrows(), 6);
        assert_eq!(grid.ncols(), 2);
        let xs: Vec<f64> = grid.column(0).iter().copied().collect();
        let ys: Vec<f64> = grid.column(1).iter().copied().collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert_eq!(ys, vec![10.0, 10.0, 10.0, 20.0, 20.0, 20.0]);
    }

    #[test]
    fn test_ndgrid_three_axes() {
        let grid = ndgrid(&[vec![0.0, 1.0], vec![0.0, 1.0], vec![5.0, 6.0]]);
        assert_eq!(grid.nrows(), 8);
        // row = i + 2j + 4k
        assert_eq!(grid[(5, 0)], 1.0);
        assert_eq!(grid[(5, 1)], 0.0);
        assert_eq!(grid[(5, 2)], 6.0);
    }

    #[test]
    fn test_tensor_product() {
        assert_eq!(tensor_product(&[vec![1.0, 2.0]]), vec![1.0, 2.0]);
        assert_eq!(
            tensor_product(&[vec![1.0, 2.0], vec![3.0, 5.0]]),
            vec![3.0, 6.0, 5.0, 10.0]
        );
        assert_eq!(tensor_product(&[vec![1.0; 2], vec![1.0; 3], vec![2.0]]).len(), 6);
    }

    #[test]
    fn test_cache_starts_empty() {
        let cache = GridCache::new();
        assert!(cache.is_empty());
        cache.slot(LocType::Fy).get_or_init(|| ndgrid(&[vec![0.0]]));
        assert_eq!(cache.len(), 1);
    }
}
