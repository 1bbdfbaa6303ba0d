pub mod tensor;
pub mod location;
pub mod grid;
pub mod geometry;
pub mod measures;

pub use tensor::{mesh_tensor, AxisSpec, Origin, Segment, TensorSpec};
pub use location::{AxisVector, LocType};
pub use grid::{ndgrid, tensor_product, GridCache};
pub use geometry::{MeshKind, TensorMesh};
pub use measures::BoundaryMasks;
