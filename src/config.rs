//! Mesh description files
//!
//! A mesh is described in TOML by its per-axis widths, an optional origin
//! and an optional kind:
//!
//! ```toml
//! kind = "tensor"
//! h = [
//!     [[10.0, 3, -1.3], [10.0, 8], [10.0, 3, 1.3]],
//!     [[5.0, 4]],
//!     6,
//! ]
//! x0 = ["C", "C", "N"]
//! ```
//!
//! Each `h` entry is a cell count, a list of widths, or a list of padded
//! segments (`width`, `[width, count]` or `[width, count, factor]`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::mesh::{AxisSpec, MeshKind, Origin, TensorMesh, TensorSpec};

/// Serialisable description of a tensor mesh
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MeshConfig {
    pub h: Vec<AxisSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x0: Option<Vec<Origin>>,
    #[serde(default)]
    pub kind: MeshKind,
}

impl MeshConfig {
    /// Load a mesh description from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading mesh config");
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validate the description and build the mesh
    pub fn build(&self) -> Result<TensorMesh> {
        let spec = TensorSpec::new(&self.h, self.x0.as_deref())?;
        Ok(TensorMesh::from_spec(spec, self.kind))
    }
}
