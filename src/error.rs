use thiserror::Error;

use crate::mesh::LocType;

/// Errors raised while building or querying a tensor mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The width specification did not have 1, 2 or 3 axes.
    #[error("a tensor mesh needs 1, 2 or 3 axes, got {0}")]
    Dimension(usize),

    /// An axis width specification did not reduce to positive widths.
    #[error("invalid widths for axis {axis}: {reason}")]
    InvalidWidths { axis: usize, reason: String },

    /// The origin has a different number of entries than the mesh has axes.
    #[error("dimension mismatch: x0 has {got} entries but h has {expected}")]
    OriginLength { expected: usize, got: usize },

    /// An origin entry was neither a finite number nor one of the symbolic codes.
    #[error("x0[{axis}] = {code:?} must be a finite number, '0' to be zero, 'C' to center, or 'N' to be negative")]
    OriginCode { axis: usize, code: String },

    /// An origin given outside of a mesh description was not understood.
    #[error("origin {0:?} must be a finite number, '0' to be zero, 'C' to center, or 'N' to be negative")]
    InvalidOrigin(String),

    /// Query points do not have one coordinate per mesh axis.
    #[error("points have {got} coordinates but the mesh is {expected}-dimensional")]
    DimensionMismatch { expected: usize, got: usize },

    /// A weighting vector does not have one entry per degree of freedom.
    #[error("vector has {got} entries but the operator has {expected} rows")]
    VectorLength { expected: usize, got: usize },

    /// Interpolation points fell outside the mesh without the zero-fill policy.
    #[error("{count} point(s) outside of mesh")]
    OutsideMesh { count: usize },

    /// The location type has no grid on a mesh of this dimension.
    #[error("location type {loc} is not available on a {dim}-D mesh")]
    UnsupportedLocation { loc: LocType, dim: usize },

    /// A location code that is not one of CC, N, Fx, Fy, Fz, Ex, Ey, Ez.
    #[error("unknown location type {0:?}")]
    UnknownLocation(String),

    #[error("failed to read mesh config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse mesh config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, MeshError>;
