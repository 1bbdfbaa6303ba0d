pub mod error;
pub mod config;
pub mod mesh;
pub mod linalg;
pub mod operators;
pub mod interp;

pub use error::{MeshError, Result};
pub use config::MeshConfig;
pub use mesh::{mesh_tensor, AxisSpec, BoundaryMasks, LocType, MeshKind, Origin, Segment, TensorMesh, TensorSpec};
pub use linalg::{sd_inv, sdiag, LinearOperator};
pub use operators::{InnerProductKind, Property};
pub use interp::{interpmat, OutsidePolicy};
