use sprs::{CsMat, TriMat};
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::linalg::{sd_inv, sdiag, LinearOperator};
use crate::mesh::TensorMesh;

/// Which staggered degrees of freedom an inner product pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerProductKind {
    Faces,
    Edges,
}

type AveragingAccessor = fn(&TensorMesh) -> &CsMat<f64>;

/// Scalar and vector averaging operators used by one kind of inner product
struct AveragingPair {
    scalar: AveragingAccessor,
    vector: AveragingAccessor,
}

impl InnerProductKind {
    fn averaging(self) -> AveragingPair {
        match self {
            InnerProductKind::Faces => AveragingPair {
                scalar: TensorMesh::ave_f2cc,
                vector: TensorMesh::ave_f2ccv,
            },
            InnerProductKind::Edges => AveragingPair {
                scalar: TensorMesh::ave_e2cc,
                vector: TensorMesh::ave_e2ccv,
            },
        }
    }
}

/// Material property weighting an inner product
///
/// `Values` holds either one value per cell (isotropic) or `dim` blocks of
/// one value per cell (diagonal anisotropy, x block first).
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Scalar(f64),
    Values(Vec<f64>),
}

impl From<f64> for Property {
    fn from(value: f64) -> Self {
        Property::Scalar(value)
    }
}

impl From<Vec<f64>> for Property {
    fn from(values: Vec<f64>) -> Self {
        Property::Values(values)
    }
}

impl From<&[f64]> for Property {
    fn from(values: &[f64]) -> Self {
        Property::Values(values.to_vec())
    }
}

impl TensorMesh {
    /// Diagonal inner-product matrix for scalar or diagonally anisotropic properties
    ///
    /// Isotropic (`nC` values): `M = dim · diag(Avᵀ (vol ⊙ σ))` with the scalar
    /// average. Anisotropic (`nC·dim` values): `M = diag(AvVᵀ (vol ⊗ 1_dim ⊙ σ))`
    /// with the vector average.
    ///
    /// # Arguments
    /// * `kind` - Faces or edges
    /// * `prop` - Material property; `None` means unit property
    /// * `invert_property` - Use 1/σ
    /// * `invert_result` - Return M⁻¹ (M is diagonal, so entry-wise reciprocal)
    ///
    /// # Returns
    /// `None` when the property layout is neither `nC` nor `nC·dim` values;
    /// the caller should fall back to a general inner-product assembly.
    pub fn fast_inner_product(
        &self,
        kind: InnerProductKind,
        prop: Option<&Property>,
        invert_property: bool,
        invert_result: bool,
    ) -> Option<CsMat<f64>> {
        let nc = self.n_cells();
        let dim = self.dim();

        let mut values = match prop {
            None => vec![1.0; nc],
            Some(Property::Scalar(s)) => vec![*s; nc],
            Some(Property::Values(v)) => v.clone(),
        };
        if invert_property {
            values.iter_mut().for_each(|v| *v = 1.0 / *v);
        }

        let averaging = kind.averaging();
        let vol = self.vol();

        let m = if values.len() == nc {
            let av = (averaging.scalar)(self);
            let weighted: Vec<f64> = vol.iter().zip(&values).map(|(v, p)| v * p).collect();
            let diag: Vec<f64> = av
                .apply_transpose(&weighted)
                .into_iter()
                .map(|d| dim as f64 * d)
                .collect();
            sdiag(&diag)
        } else if values.len() == nc * dim {
            let av = (averaging.vector)(self);
            let weighted: Vec<f64> = values
                .iter()
                .enumerate()
                .map(|(i, p)| vol[i % nc] * p)
                .collect();
            sdiag(&av.apply_transpose(&weighted))
        } else {
            debug!(
                ?kind,
                len = values.len(),
                n_cells = nc,
                "property layout not supported by the fast inner product"
            );
            return None;
        };

        Some(if invert_result { sd_inv(&m) } else { m })
    }

    pub fn fast_face_inner_product(
        &self,
        prop: Option<&Property>,
        invert_property: bool,
        invert_result: bool,
    ) -> Option<CsMat<f64>> {
        self.fast_inner_product(InnerProductKind::Faces, prop, invert_property, invert_result)
    }

    pub fn fast_edge_inner_product(
        &self,
        prop: Option<&Property>,
        invert_property: bool,
        invert_result: bool,
    ) -> Option<CsMat<f64>> {
        self.fast_inner_product(InnerProductKind::Edges, prop, invert_property, invert_result)
    }

    /// Derivative of the (un-inverted) fast inner product with respect to the property
    ///
    /// * scalar property: `dim · Avᵀ · diag(vol) · 1`, a single column
    /// * `nC` values: `dim · Avᵀ · diag(vol)`
    /// * `nC·dim` values: `AvVᵀ · diag(vol ⊗ 1_dim)`
    ///
    /// When `v` is given the result is left-multiplied by `diag(v)`.
    /// `Ok(None)` for a unit (`None`) property or an unsupported layout.
    ///
    /// # Errors
    /// [`MeshError::VectorLength`] if `v` does not have one entry per face
    /// (or edge).
    pub fn fast_inner_product_deriv(
        &self,
        kind: InnerProductKind,
        prop: Option<&Property>,
        v: Option<&[f64]>,
    ) -> Result<Option<CsMat<f64>>> {
        let n_dofs = self.n_dofs(kind);
        if let Some(v) = v {
            if v.len() != n_dofs {
                return Err(MeshError::VectorLength {
                    expected: n_dofs,
                    got: v.len(),
                });
            }
        }
        let Some(prop) = prop else {
            return Ok(None);
        };

        let nc = self.n_cells();
        let dim = self.dim() as f64;
        let averaging = kind.averaging();
        let vol = self.vol();

        let deriv = match prop {
            Property::Scalar(_) => {
                let column = (averaging.scalar)(self)
                    .apply_transpose(vol)
                    .into_iter()
                    .map(|d| dim * d);
                let mut triplets = TriMat::new((n_dofs, 1));
                for (row, val) in column.enumerate() {
                    if val != 0.0 {
                        triplets.add_triplet(row, 0, val);
                    }
                }
                triplets.to_csr()
            }
            Property::Values(values) if values.len() == nc => {
                let scaled_vol: Vec<f64> = vol.iter().map(|v| dim * v).collect();
                &(averaging.scalar)(self).transpose_view() * &sdiag(&scaled_vol)
            }
            Property::Values(values) if values.len() == nc * self.dim() => {
                let block_vol: Vec<f64> = (0..values.len()).map(|i| vol[i % nc]).collect();
                &(averaging.vector)(self).transpose_view() * &sdiag(&block_vol)
            }
            Property::Values(values) => {
                debug!(
                    ?kind,
                    len = values.len(),
                    n_cells = nc,
                    "property layout not supported by the fast inner product derivative"
                );
                return Ok(None);
            }
        };

        let deriv = match v {
            Some(v) => &sdiag(v) * &deriv,
            None => deriv,
        };
        Ok(Some(deriv.into_csr()))
    }

    pub fn fast_face_inner_product_deriv(
        &self,
        prop: Option<&Property>,
        v: Option<&[f64]>,
    ) -> Result<Option<CsMat<f64>>> {
        self.fast_inner_product_deriv(InnerProductKind::Faces, prop, v)
    }

    pub fn fast_edge_inner_product_deriv(
        &self,
        prop: Option<&Property>,
        v: Option<&[f64]>,
    ) -> Result<Option<CsMat<f64>>> {
        self.fast_inner_product_deriv(InnerProductKind::Edges, prop, v)
    }

    fn n_dofs(&self, kind: InnerProductKind) -> usize {
        match kind {
            InnerProductKind::Faces => self.n_faces(),
            InnerProductKind::Edges => self.n_edges(),
        }
    }
}
