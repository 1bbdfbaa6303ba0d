use sprs::CsMat;

/// A linear operator A that can be applied to a vector
pub trait LinearOperator {
    /// Apply the operator to vector v: out = A * v
    fn apply(&self, v: &[f64]) -> Vec<f64>;

    /// Apply the transposed operator: out = Aᵀ * v
    fn apply_transpose(&self, v: &[f64]) -> Vec<f64>;

    /// Number of rows (output dimension)
    fn rows(&self) -> usize;

    /// Number of columns (input dimension)
    fn cols(&self) -> usize;
}

impl LinearOperator for CsMat<f64> {
    fn apply(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.cols());
        let mut result = vec![0.0; self.rows()];
        for (&val, (row, col)) in self.iter() {
            result[row] += val * v[col];
        }
        result
    }

    fn apply_transpose(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.rows());
        let mut result = vec![0.0; self.cols()];
        for (&val, (row, col)) in self.iter() {
            result[col] += val * v[row];
        }
        result
    }

    fn rows(&self) -> usize {
        self.rows()
    }

    fn cols(&self) -> usize {
        self.cols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprs::TriMat;
    use approx::assert_relative_eq;

    #[test]
    fn test_apply_and_transpose() {
        // [2 1 0; 0 1 3]
        let mut triplets = TriMat::new((2, 3));
        triplets.add_triplet(0, 0, 2.0);
        triplets.add_triplet(0, 1, 1.0);
        triplets.add_triplet(1, 1, 1.0);
        triplets.add_triplet(1, 2, 3.0);
        let a: CsMat<f64> = triplets.to_csr();

        let ax = a.apply(&[1.0, 2.0, 3.0]);
        assert_relative_eq!(ax[0], 4.0, epsilon = 1e-14);
        assert_relative_eq!(ax[1], 11.0, epsilon = 1e-14);

        let aty = a.apply_transpose(&[1.0, -1.0]);
        assert_eq!(aty, vec![2.0, 0.0, -3.0]);
        assert_eq!(LinearOperator::rows(&a), 2);
        assert_eq!(LinearOperator::cols(&a), 3);
    }
}
