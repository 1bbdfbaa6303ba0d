use nalgebra::DMatrix;
use sprs::{CsMat, TriMat};

/// Bracketing indices and linear weights of `xr` in the sorted vector `x`
///
/// Returns `(i1, i2, w1, w2)` with `w1 + w2 = 1`. Outside the span of `x`
/// both indices collapse onto the nearest end point, which then carries the
/// full weight split as 0.5/0.5.
pub fn interp_point_1d(x: &[f64], xr: f64) -> (usize, usize, f64, f64) {
    let last = x.len() - 1;
    let im = x
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, &xi)| {
            let dist = (xi - xr).abs();
            if dist < best.1 {
                (i, dist)
            } else {
                best
            }
        })
        .0;

    let (i1, i2) = if xr - x[im] >= 0.0 {
        (im as isize, im as isize + 1)
    } else {
        (im as isize - 1, im as isize)
    };
    let clamp = |i: isize| i.clamp(0, last as isize) as usize;
    let (i1, i2) = (clamp(i1), clamp(i2));

    if i1 == i2 {
        return (i1, i1, 0.5, 0.5);
    }

    let h = x[i2] - x[i1];
    let w1 = 1.0 - (xr - x[i1]) / h;
    let w2 = 1.0 - (x[i2] - xr) / h;
    (i1, i2, w1, w2)
}

/// Multilinear interpolation matrix from a tensor grid to scattered points
///
/// # Arguments
/// * `locs` - `M × d` query points
/// * `tensors` - The `d` sorted coordinate vectors spanning the grid
///
/// # Returns
/// `M × prod(len(tensors))` CSR matrix with at most `2^d` entries per row.
/// Columns follow the grid's first-axis-fastest ordering.
pub fn interpmat(locs: &DMatrix<f64>, tensors: &[Vec<f64>]) -> CsMat<f64> {
    let dim = tensors.len();
    debug_assert_eq!(locs.ncols(), dim);

    let n_grid: usize = tensors.iter().map(Vec::len).product();
    let mut strides = Vec::with_capacity(dim);
    let mut stride = 1;
    for t in tensors {
        strides.push(stride);
        stride *= t.len();
    }

    let corners = 1usize << dim;
    let mut triplets = TriMat::with_capacity((locs.nrows(), n_grid), locs.nrows() * corners);

    for (row, point) in locs.row_iter().enumerate() {
        let brackets: Vec<(usize, usize, f64, f64)> = tensors
            .iter()
            .enumerate()
            .map(|(axis, t)| interp_point_1d(t, point[axis]))
            .collect();

        // Corner bit `axis` picks the upper bracket along that axis
        for corner in 0..corners {
            let mut col = 0;
            let mut weight = 1.0;
            for (axis, &(i1, i2, w1, w2)) in brackets.iter().enumerate() {
                let (index, w) = if corner & (1 << axis) == 0 {
                    (i1, w1)
                } else {
                    (i2, w2)
                };
                col += index * strides[axis];
                weight *= w;
            }
            if weight != 0.0 {
                triplets.add_triplet(row, col, weight);
            }
        }
    }

    triplets.to_csr()
}
