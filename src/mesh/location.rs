use std::fmt;
use std::str::FromStr;

use crate::error::MeshError;

/// Which 1-D coordinate vector an axis contributes to a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisVector {
    /// Node coordinates (`n + 1` values)
    Node,
    /// Cell-centre coordinates (`n` values)
    CellCenter,
}

/// Staggered location of a degree of freedom on a tensor mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocType {
    /// Scalar field on cell centres
    CC,
    /// Scalar field on nodes
    N,
    /// x-component of a field on faces
    Fx,
    /// y-component of a field on faces
    Fy,
    /// z-component of a field on faces
    Fz,
    /// x-component of a field on edges
    Ex,
    /// y-component of a field on edges
    Ey,
    /// z-component of a field on edges
    Ez,
}

use AxisVector::{CellCenter as C, Node as N};

impl LocType {
    pub const ALL: [LocType; 8] = [
        LocType::CC,
        LocType::N,
        LocType::Fx,
        LocType::Fy,
        LocType::Fz,
        LocType::Ex,
        LocType::Ey,
        LocType::Ez,
    ];

    /// Per-axis choice of node or cell-centre vector for this location.
    pub fn axis_vectors(self) -> [AxisVector; 3] {
        match self {
            LocType::CC => [C, C, C],
            LocType::N => [N, N, N],
            LocType::Fx => [N, C, C],
            LocType::Fy => [C, N, C],
            LocType::Fz => [C, C, N],
            LocType::Ex => [C, N, N],
            LocType::Ey => [N, C, N],
            LocType::Ez => [N, N, C],
        }
    }

    /// Component axis for face and edge locations, `None` for scalar ones.
    pub fn component(self) -> Option<usize> {
        match self {
            LocType::CC | LocType::N => None,
            LocType::Fx | LocType::Ex => Some(0),
            LocType::Fy | LocType::Ey => Some(1),
            LocType::Fz | LocType::Ez => Some(2),
        }
    }

    pub fn is_face(self) -> bool {
        matches!(self, LocType::Fx | LocType::Fy | LocType::Fz)
    }

    pub fn is_edge(self) -> bool {
        matches!(self, LocType::Ex | LocType::Ey | LocType::Ez)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            LocType::CC => 0,
            LocType::N => 1,
            LocType::Fx => 2,
            LocType::Fy => 3,
            LocType::Fz => 4,
            LocType::Ex => 5,
            LocType::Ey => 6,
            LocType::Ez => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LocType::CC => "CC",
            LocType::N => "N",
            LocType::Fx => "Fx",
            LocType::Fy => "Fy",
            LocType::Fz => "Fz",
            LocType::Ex => "Ex",
            LocType::Ey => "Ey",
            LocType::Ez => "Ez",
        }
    }
}

impl fmt::Display for LocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocType {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocType::ALL
            .iter()
            .copied()
            .find(|loc| loc.as_str() == s)
            .ok_or_else(|| MeshError::UnknownLocation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for loc in LocType::ALL {
            assert_eq!(loc.as_str().parse::<LocType>().unwrap(), loc);
        }
        assert!(matches!("Fw".parse::<LocType>(), Err(MeshError::UnknownLocation(_))));
    }

    #[test]
    fn test_staggering_table() {
        // A face is a node along its normal and a cell centre across it
        for loc in [LocType::Fx, LocType::Fy, LocType::Fz] {
            let axis = loc.component().unwrap();
            for (i, v) in loc.axis_vectors().iter().enumerate() {
                assert_eq!(*v == AxisVector::Node, i == axis);
            }
        }
        // Edges are the dual arrangement
        for loc in [LocType::Ex, LocType::Ey, LocType::Ez] {
            let axis = loc.component().unwrap();
            for (i, v) in loc.axis_vectors().iter().enumerate() {
                assert_eq!(*v == AxisVector::CellCenter, i == axis);
            }
        }
    }
}
