use nalgebra::DMatrix;
use sprs::{CsMat, TriMat};
use tracing::debug;

use super::interpmat::interpmat;
use crate::error::{MeshError, Result};
use crate::mesh::{LocType, MeshKind, TensorMesh};

/// What to do with interpolation points outside the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutsidePolicy {
    /// Fail with [`MeshError::OutsideMesh`]
    #[default]
    Reject,
    /// Give every outside point an all-zero row
    ZeroFill,
}

impl TensorMesh {
    fn check_points(&self, pts: &DMatrix<f64>) -> Result<()> {
        if pts.ncols() != self.dim() {
            return Err(MeshError::DimensionMismatch {
                expected: self.dim(),
                got: pts.ncols(),
            });
        }
        Ok(())
    }

    /// Which points lie inside the extent of a location type's grid
    ///
    /// A point is inside when every coordinate lies within the closed range
    /// spanned by that axis' coordinate vector. On a cylindrical mesh the
    /// nodal extent starts at r = 0.
    ///
    /// # Arguments
    /// * `pts` - `M × dim` points
    /// * `loc` - Location type whose extent is tested (usually [`LocType::N`])
    pub fn is_inside(&self, pts: &DMatrix<f64>, loc: LocType) -> Result<Vec<bool>> {
        self.check_points(pts)?;
        if self.n_loc(loc) == 0 {
            return Err(MeshError::UnsupportedLocation { loc, dim: self.dim() });
        }

        let mut tensors = self.get_tensor(loc);
        if loc == LocType::N && self.kind() == MeshKind::Cylindrical {
            tensors[0].insert(0, 0.0);
        }

        let bounds: Vec<(f64, f64)> = tensors
            .iter()
            .map(|t| {
                let min = t.iter().copied().fold(f64::INFINITY, f64::min);
                let max = t.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (min, max)
            })
            .collect();

        Ok(pts
            .row_iter()
            .map(|point| {
                bounds
                    .iter()
                    .enumerate()
                    .all(|(axis, &(min, max))| point[axis] >= min && point[axis] <= max)
            })
            .collect())
    }

    /// Interpolation matrix from a staggered grid to scattered points
    ///
    /// Points are checked against the nodal extent. For face and edge
    /// components the matrix spans all faces (or edges); only the columns
    /// of the requested component are populated.
    ///
    /// # Arguments
    /// * `pts` - `M × dim` points
    /// * `loc` - Location type being interpolated
    /// * `policy` - Reject outside points, or give them all-zero rows
    ///
    /// # Returns
    /// `M × n` CSR matrix, `n` the number of grid points (scalar types) or
    /// faces/edges (component types).
    pub fn get_interpolation_mat(
        &self,
        pts: &DMatrix<f64>,
        loc: LocType,
        policy: OutsidePolicy,
    ) -> Result<CsMat<f64>> {
        self.check_points(pts)?;
        if self.n_loc(loc) == 0 {
            return Err(MeshError::UnsupportedLocation { loc, dim: self.dim() });
        }

        let inside = self.is_inside(pts, LocType::N)?;
        let outside: Vec<usize> = inside
            .iter()
            .enumerate()
            .filter(|(_, inside)| !**inside)
            .map(|(row, _)| row)
            .collect();

        let mut locs = pts.clone();
        if !outside.is_empty() {
            match policy {
                OutsidePolicy::Reject => {
                    return Err(MeshError::OutsideMesh { count: outside.len() });
                }
                OutsidePolicy::ZeroFill => {
                    debug!(count = outside.len(), "zero-filling points outside of mesh");
                    // Park outside points on the mesh centroid so the bracket search stays valid
                    let centroid: Vec<f64> = self
                        .get_tensor(LocType::CC)
                        .iter()
                        .map(|t| t.iter().sum::<f64>() / t.len() as f64)
                        .collect();
                    for &row in &outside {
                        for (axis, c) in centroid.iter().enumerate() {
                            locs[(row, axis)] = *c;
                        }
                    }
                }
            }
        }

        let q = interpmat(&locs, &self.get_tensor(loc));
        let (offset, n_cols) = match loc.component() {
            None => (0, q.cols()),
            Some(axis) => {
                let counts = if loc.is_face() { self.vn_f() } else { self.vn_e() };
                (counts[..axis].iter().sum(), counts.iter().sum())
            }
        };

        let mut triplets = TriMat::with_capacity((pts.nrows(), n_cols), q.nnz());
        for (&val, (row, col)) in q.iter() {
            if inside[row] {
                triplets.add_triplet(row, offset + col, val);
            }
        }
        Ok(triplets.to_csr())
    }
}
