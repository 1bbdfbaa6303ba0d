use std::fmt;
use std::sync::OnceLock;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::grid::{ndgrid, GridCache};
use super::location::{AxisVector, LocType};
use super::tensor::{AxisSpec, Origin, TensorSpec};
use crate::error::Result;
use crate::operators::AveragingCache;

/// Coordinate system the widths are laid out in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshKind {
    /// Plain cartesian tensor mesh
    #[default]
    Tensor,
    /// Radial first axis; the axis of symmetry at r = 0 counts as inside
    Cylindrical,
}

/// Axis-aligned tensor-product mesh
///
/// Fully described by one width vector per axis and an origin. Every
/// derived array (grids, volumes, areas, edge lengths, averaging operators)
/// is computed on first use and memoised; `h` and `x0` never change after
/// construction so the memoised values stay valid for the mesh's lifetime.
///
/// All flattened arrays are ordered first-axis-fastest.
#[derive(Debug, Clone)]
pub struct TensorMesh {
    h: Vec<Vec<f64>>,
    x0: Vec<f64>,
    kind: MeshKind,
    pub(crate) grids: GridCache,
    pub(crate) vol: OnceLock<Vec<f64>>,
    pub(crate) area: OnceLock<Vec<f64>>,
    pub(crate) edge: OnceLock<Vec<f64>>,
    pub(crate) averaging: AveragingCache,
}

impl TensorMesh {
    /// Build a tensor mesh
    ///
    /// # Arguments
    /// * `h_in` - Width specification per axis (cell count, widths or padded segments)
    /// * `x0_in` - Optional origin anchor per axis
    ///
    /// # Example
    /// ```
    /// use tensor_mesh::{AxisSpec, Origin, TensorMesh};
    /// let mesh = TensorMesh::new(
    ///     &[AxisSpec::Widths(vec![1.0, 1.0]), AxisSpec::Widths(vec![2.0, 2.0])],
    ///     Some(&[Origin::Center, Origin::Zero]),
    /// ).unwrap();
    /// assert_eq!(mesh.n_cells(), 4);
    /// assert_eq!(mesh.x0(), &[-1.0, 0.0]);
    /// ```
    pub fn new(h_in: &[AxisSpec], x0_in: Option<&[Origin]>) -> Result<Self> {
        Ok(Self::from_spec(TensorSpec::new(h_in, x0_in)?, MeshKind::Tensor))
    }

    /// Build a mesh with origin codes given as strings (`"0"`, `"C"`, `"N"` or a number)
    pub fn with_origin_codes(h_in: &[AxisSpec], codes: &[&str]) -> Result<Self> {
        Ok(Self::from_spec(
            TensorSpec::with_origin_codes(h_in, codes)?,
            MeshKind::Tensor,
        ))
    }

    /// Build a mesh whose first axis is radial
    pub fn cylindrical(h_in: &[AxisSpec], x0_in: Option<&[Origin]>) -> Result<Self> {
        Ok(Self::from_spec(TensorSpec::new(h_in, x0_in)?, MeshKind::Cylindrical))
    }

    /// Build a mesh from already-normalised widths and origin
    pub fn from_spec(spec: TensorSpec, kind: MeshKind) -> Self {
        let TensorSpec { h, x0 } = spec;
        debug!(
            dim = h.len(),
            cells = ?h.iter().map(Vec::len).collect::<Vec<_>>(),
            ?kind,
            "built tensor mesh"
        );
        Self {
            h,
            x0,
            kind,
            grids: GridCache::new(),
            vol: OnceLock::new(),
            area: OnceLock::new(),
            edge: OnceLock::new(),
            averaging: AveragingCache::default(),
        }
    }

    // --------------- Widths and origin ---------------

    /// Number of spatial dimensions (1, 2 or 3)
    pub fn dim(&self) -> usize {
        self.h.len()
    }

    pub fn kind(&self) -> MeshKind {
        self.kind
    }

    /// Cell widths, one vector per axis
    pub fn h(&self) -> &[Vec<f64>] {
        &self.h
    }

    /// Origin (first node coordinate) per axis
    pub fn x0(&self) -> &[f64] {
        &self.x0
    }

    /// Cell widths along `axis`, `None` if the mesh has no such axis
    pub fn widths(&self, axis: usize) -> Option<&[f64]> {
        self.h.get(axis).map(Vec::as_slice)
    }

    pub fn hx(&self) -> &[f64] {
        &self.h[0]
    }

    pub fn hy(&self) -> Option<&[f64]> {
        self.widths(1)
    }

    pub fn hz(&self) -> Option<&[f64]> {
        self.widths(2)
    }

    // --------------- Counts ---------------

    /// Cells per axis
    pub fn vn_c(&self) -> Vec<usize> {
        self.h.iter().map(Vec::len).collect()
    }

    /// Nodes per axis
    pub fn vn_n(&self) -> Vec<usize> {
        self.h.iter().map(|h| h.len() + 1).collect()
    }

    pub fn n_cells(&self) -> usize {
        self.vn_c().iter().product()
    }

    pub fn n_nodes(&self) -> usize {
        self.vn_n().iter().product()
    }

    /// Shape of the grid for a location type, `None` when the location's
    /// component axis does not exist on this mesh
    pub fn loc_shape(&self, loc: LocType) -> Option<Vec<usize>> {
        if loc.component().is_some_and(|axis| axis >= self.dim()) {
            return None;
        }
        let selection = loc.axis_vectors();
        Some(
            self.h
                .iter()
                .zip(selection.iter())
                .map(|(h, v)| match v {
                    AxisVector::Node => h.len() + 1,
                    AxisVector::CellCenter => h.len(),
                })
                .collect(),
        )
    }

    /// Number of grid points of a location type (0 when absent)
    pub fn n_loc(&self, loc: LocType) -> usize {
        self.loc_shape(loc)
            .map(|shape| shape.iter().product())
            .unwrap_or(0)
    }

    /// Faces normal to each axis, in component order
    pub fn vn_f(&self) -> Vec<usize> {
        [LocType::Fx, LocType::Fy, LocType::Fz][..self.dim()]
            .iter()
            .map(|loc| self.n_loc(*loc))
            .collect()
    }

    /// Edges along each axis, in component order
    pub fn vn_e(&self) -> Vec<usize> {
        [LocType::Ex, LocType::Ey, LocType::Ez][..self.dim()]
            .iter()
            .map(|loc| self.n_loc(*loc))
            .collect()
    }

    pub fn n_faces(&self) -> usize {
        self.vn_f().iter().sum()
    }

    pub fn n_edges(&self) -> usize {
        self.vn_e().iter().sum()
    }

    pub fn n_fx(&self) -> usize {
        self.n_loc(LocType::Fx)
    }

    pub fn n_fy(&self) -> usize {
        self.n_loc(LocType::Fy)
    }

    pub fn n_fz(&self) -> usize {
        self.n_loc(LocType::Fz)
    }

    pub fn n_ex(&self) -> usize {
        self.n_loc(LocType::Ex)
    }

    pub fn n_ey(&self) -> usize {
        self.n_loc(LocType::Ey)
    }

    pub fn n_ez(&self) -> usize {
        self.n_loc(LocType::Ez)
    }

    // --------------- Coordinate vectors ---------------

    /// Node coordinates along `axis`: running sum of widths shifted by the origin
    pub fn vector_n(&self, axis: usize) -> Option<Vec<f64>> {
        let h = self.h.get(axis)?;
        let mut nodes = Vec::with_capacity(h.len() + 1);
        let mut x = self.x0[axis];
        nodes.push(x);
        for w in h {
            x += w;
            nodes.push(x);
        }
        Some(nodes)
    }

    /// Cell-centre coordinates along `axis`
    pub fn vector_cc(&self, axis: usize) -> Option<Vec<f64>> {
        let h = self.h.get(axis)?;
        let nodes = self.vector_n(axis)?;
        Some(nodes.iter().zip(h).map(|(x, w)| x + 0.5 * w).collect())
    }

    pub fn vector_nx(&self) -> Vec<f64> {
        self.vector_n(0).unwrap_or_default()
    }

    pub fn vector_ny(&self) -> Option<Vec<f64>> {
        self.vector_n(1)
    }

    pub fn vector_nz(&self) -> Option<Vec<f64>> {
        self.vector_n(2)
    }

    pub fn vector_ccx(&self) -> Vec<f64> {
        self.vector_cc(0).unwrap_or_default()
    }

    pub fn vector_ccy(&self) -> Option<Vec<f64>> {
        self.vector_cc(1)
    }

    pub fn vector_ccz(&self) -> Option<Vec<f64>> {
        self.vector_cc(2)
    }

    /// The 1-D coordinate vectors whose cartesian product is the grid of `loc`
    ///
    /// One vector per existing axis:
    ///
    /// | loc | x | y | z |
    /// |-----|---|---|---|
    /// | CC  | cc | cc | cc |
    /// | N   | n | n | n |
    /// | Fx  | n | cc | cc |
    /// | Fy  | cc | n | cc |
    /// | Fz  | cc | cc | n |
    /// | Ex  | cc | n | n |
    /// | Ey  | n | cc | n |
    /// | Ez  | n | n | cc |
    pub fn get_tensor(&self, loc: LocType) -> Vec<Vec<f64>> {
        loc.axis_vectors()
            .iter()
            .enumerate()
            .filter_map(|(axis, v)| match v {
                AxisVector::Node => self.vector_n(axis),
                AxisVector::CellCenter => self.vector_cc(axis),
            })
            .collect()
    }

    // --------------- Grids ---------------

    /// Full `M × dim` grid of a location type
    ///
    /// `None` for face and edge components along an axis the mesh does not have.
    pub fn grid(&self, loc: LocType) -> Option<&DMatrix<f64>> {
        if self.n_loc(loc) == 0 {
            return None;
        }
        Some(self.grids.slot(loc).get_or_init(|| {
            trace!(%loc, "materialising grid");
            ndgrid(&self.get_tensor(loc))
        }))
    }

    pub fn grid_cc(&self) -> &DMatrix<f64> {
        self.grid(LocType::CC).expect("cell-centre grid always exists")
    }

    pub fn grid_n(&self) -> &DMatrix<f64> {
        self.grid(LocType::N).expect("nodal grid always exists")
    }

    pub fn grid_fx(&self) -> Option<&DMatrix<f64>> {
        self.grid(LocType::Fx)
    }

    pub fn grid_fy(&self) -> Option<&DMatrix<f64>> {
        self.grid(LocType::Fy)
    }

    pub fn grid_fz(&self) -> Option<&DMatrix<f64>> {
        self.grid(LocType::Fz)
    }

    pub fn grid_ex(&self) -> Option<&DMatrix<f64>> {
        self.grid(LocType::Ex)
    }

    pub fn grid_ey(&self) -> Option<&DMatrix<f64>> {
        self.grid(LocType::Ey)
    }

    pub fn grid_ez(&self) -> Option<&DMatrix<f64>> {
        self.grid(LocType::Ez)
    }
}

/// Run-length compressed widths, e.g. ` 3*10.00, 12.50`
fn format_widths(h: &[f64]) -> String {
    let mut parts = Vec::new();
    let mut i = 0;
    while i < h.len() {
        let mut run = 1;
        while i + run < h.len() && h[i + run] == h[i] {
            run += 1;
        }
        if run == 1 {
            parts.push(format!(" {:.2}", h[i]));
        } else {
            parts.push(format!(" {}*{:.2}", run, h[i]));
        }
        i += run;
    }
    parts.join(",")
}

impl fmt::Display for TensorMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const AXES: [&str; 3] = ["x", "y", "z"];

        write!(f, "  ---- {}-D TensorMesh ----  ", self.dim())?;
        for (axis, x0) in self.x0.iter().enumerate() {
            write!(f, "\n   {}0: {:.2}", AXES[axis], x0)?;
        }
        for (axis, h) in self.h.iter().enumerate() {
            write!(f, "\n  nC{}: {}", AXES[axis], h.len())?;
        }
        for (axis, h) in self.h.iter().enumerate() {
            write!(f, "\n   h{}:{}", AXES[axis], format_widths(h))?;
        }
        Ok(())
    }
}
