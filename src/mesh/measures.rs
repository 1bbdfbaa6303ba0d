use tracing::trace;

use super::geometry::TensorMesh;
use super::grid::tensor_product;
use super::location::LocType;

/// Masks selecting the lowest and highest layer along one axis
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryMasks {
    pub lower: Vec<bool>,
    pub upper: Vec<bool>,
}

impl BoundaryMasks {
    fn from_coordinates(coords: &[f64]) -> Self {
        let min = coords.iter().copied().fold(f64::INFINITY, f64::min);
        let max = coords.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            lower: coords.iter().map(|&x| x == min).collect(),
            upper: coords.iter().map(|&x| x == max).collect(),
        }
    }
}

impl TensorMesh {
    /// Cell volumes (lengths in 1-D, areas in 2-D)
    pub fn vol(&self) -> &[f64] {
        self.vol.get_or_init(|| {
            trace!("computing cell volumes");
            tensor_product(self.h())
        })
    }

    /// Face areas, stacked Fx, Fy, Fz
    ///
    /// A face normal to axis `i` spans the widths of the other axes; in 1-D
    /// every face has unit area.
    pub fn area(&self) -> &[f64] {
        self.area.get_or_init(|| {
            trace!("computing face areas");
            let h = self.h();
            let mut area = Vec::with_capacity(self.n_faces());
            for normal in 0..self.dim() {
                let factors: Vec<Vec<f64>> = h
                    .iter()
                    .enumerate()
                    .map(|(axis, widths)| {
                        if axis == normal {
                            vec![1.0; widths.len() + 1]
                        } else {
                            widths.clone()
                        }
                    })
                    .collect();
                area.extend(tensor_product(&factors));
            }
            area
        })
    }

    /// Edge lengths, stacked Ex, Ey, Ez
    ///
    /// An edge along axis `i` has that axis' width and is repeated over the
    /// nodes of the other axes.
    pub fn edge(&self) -> &[f64] {
        self.edge.get_or_init(|| {
            trace!("computing edge lengths");
            let h = self.h();
            let mut edge = Vec::with_capacity(self.n_edges());
            for along in 0..self.dim() {
                let factors: Vec<Vec<f64>> = h
                    .iter()
                    .enumerate()
                    .map(|(axis, widths)| {
                        if axis == along {
                            widths.clone()
                        } else {
                            vec![1.0; widths.len() + 1]
                        }
                    })
                    .collect();
                edge.extend(tensor_product(&factors));
            }
            edge
        })
    }

    /// Boundary faces per axis
    ///
    /// Entry `i` masks the faces normal to axis `i` (indexed within that
    /// component's block) lying on the minimum and maximum coordinate.
    pub fn face_boundary_ind(&self) -> Vec<BoundaryMasks> {
        [LocType::Fx, LocType::Fy, LocType::Fz][..self.dim()]
            .iter()
            .enumerate()
            .filter_map(|(axis, loc)| {
                self.grid(*loc).map(|grid| {
                    let coords: Vec<f64> = grid.column(axis).iter().copied().collect();
                    BoundaryMasks::from_coordinates(&coords)
                })
            })
            .collect()
    }

    /// Boundary cells per axis: cells whose centre is the lowest or highest along that axis
    pub fn cell_boundary_ind(&self) -> Vec<BoundaryMasks> {
        let grid = self.grid_cc();
        (0..self.dim())
            .map(|axis| {
                let coords: Vec<f64> = grid.column(axis).iter().copied().collect();
                BoundaryMasks::from_coordinates(&coords)
            })
            .collect()
    }
}
