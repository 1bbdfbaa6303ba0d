use std::sync::OnceLock;

use sprs::{CsMat, CsMatView, TriMat};
use tracing::trace;

use crate::mesh::TensorMesh;

/// Compute-once storage for the four averaging operators
#[derive(Debug, Clone, Default)]
pub struct AveragingCache {
    f2cc: OnceLock<CsMat<f64>>,
    f2ccv: OnceLock<CsMat<f64>>,
    e2cc: OnceLock<CsMat<f64>>,
    e2ccv: OnceLock<CsMat<f64>>,
}

/// 1-D average from `n + 1` nodes to `n` cell centres
fn av_1d(n: usize) -> CsMat<f64> {
    let mut triplets = TriMat::with_capacity((n, n + 1), 2 * n);
    for i in 0..n {
        triplets.add_triplet(i, i, 0.5);
        triplets.add_triplet(i, i + 1, 0.5);
    }
    triplets.to_csr()
}

/// Kronecker product of per-axis factors, first axis fastest
fn kron_axes(factors: Vec<CsMat<f64>>) -> CsMat<f64> {
    factors
        .into_iter()
        .reduce(|fast, slow| sprs::kronecker_product(slow.view(), fast.view()))
        .unwrap_or_else(|| CsMat::eye(1))
}

impl TensorMesh {
    /// Per-axis blocks averaging one face component to cell centres
    fn face_average_blocks(&self) -> Vec<CsMat<f64>> {
        let n = self.vn_c();
        (0..self.dim())
            .map(|normal| {
                kron_axes(
                    n.iter()
                        .enumerate()
                        .map(|(axis, &nc)| if axis == normal { av_1d(nc) } else { CsMat::eye(nc) })
                        .collect(),
                )
            })
            .collect()
    }

    /// Per-axis blocks averaging one edge component to cell centres
    fn edge_average_blocks(&self) -> Vec<CsMat<f64>> {
        let n = self.vn_c();
        (0..self.dim())
            .map(|along| {
                kron_axes(
                    n.iter()
                        .enumerate()
                        .map(|(axis, &nc)| if axis == along { CsMat::eye(nc) } else { av_1d(nc) })
                        .collect(),
                )
            })
            .collect()
    }

    /// Average all faces to a scalar cell-centred quantity (nC × nF)
    pub fn ave_f2cc(&self) -> &CsMat<f64> {
        self.averaging.f2cc.get_or_init(|| {
            trace!("building face to cell-centre average");
            mean_of_blocks(&self.face_average_blocks())
        })
    }

    /// Average faces to a cell-centred vector, one block per component (nC·dim × nF)
    pub fn ave_f2ccv(&self) -> &CsMat<f64> {
        self.averaging.f2ccv.get_or_init(|| {
            trace!("building face to cell-centre vector average");
            block_diagonal(&self.face_average_blocks())
        })
    }

    /// Average all edges to a scalar cell-centred quantity (nC × nE)
    pub fn ave_e2cc(&self) -> &CsMat<f64> {
        self.averaging.e2cc.get_or_init(|| {
            trace!("building edge to cell-centre average");
            mean_of_blocks(&self.edge_average_blocks())
        })
    }

    /// Average edges to a cell-centred vector, one block per component (nC·dim × nE)
    pub fn ave_e2ccv(&self) -> &CsMat<f64> {
        self.averaging.e2ccv.get_or_init(|| {
            trace!("building edge to cell-centre vector average");
            block_diagonal(&self.edge_average_blocks())
        })
    }
}

/// `[B_0 B_1 ...] / n`: averages the per-component blocks into one scalar
fn mean_of_blocks(blocks: &[CsMat<f64>]) -> CsMat<f64> {
    let views: Vec<CsMatView<f64>> = blocks.iter().map(|block| block.view()).collect();
    let mut av = sprs::hstack(&views).into_csr();
    av.scale(1.0 / blocks.len() as f64);
    av
}

/// `diag(B_0, B_1, ...)`: keeps one cell-centred block per component
fn block_diagonal(blocks: &[CsMat<f64>]) -> CsMat<f64> {
    let rows: Vec<Vec<Option<CsMatView<f64>>>> = blocks
        .iter()
        .enumerate()
        .map(|(i, _)| {
            blocks
                .iter()
                .enumerate()
                .map(|(j, block)| (i == j).then(|| block.view()))
                .collect()
        })
        .collect();
    sprs::bmat(&rows).into_csr()
}
