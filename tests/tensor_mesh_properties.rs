use approx::assert_relative_eq;
use nalgebra::DMatrix;
use tensor_mesh::{
    mesh_tensor, AxisSpec, InnerProductKind, LocType, LinearOperator, OutsidePolicy, Origin,
    Property, Segment, TensorMesh,
};

fn padded_mesh() -> TensorMesh {
    let hx = mesh_tensor(&[
        Segment::Padding(2.0, 3, -1.4),
        Segment::Uniform(2.0, 4),
        Segment::Padding(2.0, 3, 1.4),
    ]);
    TensorMesh::new(
        &[
            AxisSpec::Widths(hx),
            AxisSpec::Widths(vec![0.5, 1.0, 1.5, 2.0]),
            AxisSpec::Count(3),
        ],
        Some(&[Origin::Center, Origin::Negative, Origin::Value(-4.0)]),
    )
    .unwrap()
}

#[test]
fn test_node_vectors_increase_and_conserve_width() {
    let mesh = padded_mesh();
    for axis in 0..mesh.dim() {
        let nodes = mesh.vector_n(axis).unwrap();
        let h = mesh.widths(axis).unwrap();
        assert_eq!(nodes.len(), h.len() + 1);
        assert!(nodes.windows(2).all(|w| w[1] > w[0]));
        assert_relative_eq!(
            nodes[nodes.len() - 1] - nodes[0],
            h.iter().sum::<f64>(),
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_center_code_is_symmetric() {
    let mesh = padded_mesh();
    let nodes = mesh.vector_nx();
    let length: f64 = mesh.hx().iter().sum();
    assert_relative_eq!(nodes[0], -length / 2.0, epsilon = 1e-12);
    assert_relative_eq!(nodes[nodes.len() - 1], length / 2.0, epsilon = 1e-12);

    // "N" puts the last node at zero
    let ny = mesh.vector_ny().unwrap();
    assert_relative_eq!(ny[ny.len() - 1], 0.0, epsilon = 1e-12);
}

#[test]
fn test_volume_conserves_domain_measure() {
    let mesh = TensorMesh::new(
        &[AxisSpec::Widths(vec![1.0, 1.0]), AxisSpec::Widths(vec![2.0, 2.0])],
        None,
    )
    .unwrap();
    assert_relative_eq!(mesh.vol().iter().sum::<f64>(), 8.0);

    let mesh = padded_mesh();
    let expected: f64 = (0..3)
        .map(|axis| mesh.widths(axis).unwrap().iter().sum::<f64>())
        .product();
    assert_relative_eq!(mesh.vol().iter().sum::<f64>(), expected, epsilon = 1e-10);
}

#[test]
fn test_interpolating_cell_centres_is_identity() {
    let mesh = padded_mesh();
    let q = mesh
        .get_interpolation_mat(mesh.grid_cc(), LocType::CC, OutsidePolicy::Reject)
        .unwrap();

    assert_eq!((q.rows(), q.cols()), (mesh.n_cells(), mesh.n_cells()));
    for (&val, (row, col)) in q.iter() {
        if row == col {
            assert_relative_eq!(val, 1.0, epsilon = 1e-12);
        } else {
            assert_relative_eq!(val, 0.0, epsilon = 1e-12);
        }
    }
    for i in 0..mesh.n_cells() {
        assert!(q.get(i, i).is_some());
    }
}

#[test]
fn test_point_on_node_is_one_hot() {
    let mesh = padded_mesh();
    let grid = mesh.grid_n();
    let picks = [0, 17, mesh.n_nodes() - 1];
    let mut pts = DMatrix::zeros(picks.len(), 3);
    for (row, &node) in picks.iter().enumerate() {
        for axis in 0..3 {
            pts[(row, axis)] = grid[(node, axis)];
        }
    }

    let q = mesh
        .get_interpolation_mat(&pts, LocType::N, OutsidePolicy::Reject)
        .unwrap();
    for (row, &node) in picks.iter().enumerate() {
        let mut weights = vec![0.0; mesh.n_nodes()];
        weights[node] = 1.0;
        let hit = q.apply(&weights);
        assert_relative_eq!(hit[row], 1.0, epsilon = 1e-12);
        let total: f64 = q.outer_view(row).unwrap().iter().map(|(_, v)| *v).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_zero_fill_outside_row() {
    let mesh = padded_mesh();
    let pts = DMatrix::from_row_slice(2, 3, &[0.0, -1.0, -3.5, 1e6, -1.0, -3.5]);

    let q = mesh
        .get_interpolation_mat(&pts, LocType::CC, OutsidePolicy::ZeroFill)
        .unwrap();
    assert_eq!(q.rows(), 2);
    assert!(q.outer_view(0).unwrap().nnz() > 0);
    assert_eq!(q.outer_view(1).unwrap().nnz(), 0);

    assert!(mesh
        .get_interpolation_mat(&pts, LocType::CC, OutsidePolicy::Reject)
        .is_err());
}

#[test]
fn test_is_inside_cell_centres_and_beyond_nodes() {
    let mesh = padded_mesh();
    assert!(mesh.is_inside(mesh.grid_cc(), LocType::N).unwrap().iter().all(|&b| b));

    let mut beyond = mesh.grid_cc().clone();
    for axis in 0..3 {
        let max = mesh
            .vector_n(axis)
            .unwrap()
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        beyond[(axis, axis)] = max + 1e-6;
    }
    let inside = mesh.is_inside(&beyond, LocType::N).unwrap();
    assert_eq!(&inside[..3], &[false, false, false]);
    assert!(inside[3..].iter().all(|&b| b));
}

#[test]
fn test_unit_property_on_uniform_mesh() {
    // h = [1, 1, 1] on every axis: interior faces carry a full cell volume,
    // boundary faces half of one
    let h = vec![AxisSpec::Widths(vec![1.0, 1.0, 1.0]); 3];
    let mesh = TensorMesh::new(&h, None).unwrap();
    let m = mesh
        .fast_inner_product(InnerProductKind::Faces, None, false, false)
        .unwrap();
    let m_inv = mesh
        .fast_inner_product(InnerProductKind::Faces, None, false, true)
        .unwrap();

    let fx = mesh.grid_fx().unwrap();
    for face in 0..mesh.n_fx() {
        let on_boundary = fx[(face, 0)] == 0.0 || fx[(face, 0)] == 3.0;
        let expected = if on_boundary { 0.5 } else { 1.0 };
        assert_relative_eq!(*m.get(face, face).unwrap(), expected, epsilon = 1e-12);
        assert_relative_eq!(*m_inv.get(face, face).unwrap(), 1.0 / expected, epsilon = 1e-12);
    }

    // Total weight is dim times the domain volume
    let total: f64 = m.iter().map(|(v, _)| *v).sum();
    assert_relative_eq!(total, 3.0 * 27.0, epsilon = 1e-10);
}

#[test]
fn test_anisotropic_path_matches_isotropic() {
    let mesh = padded_mesh();
    let nc = mesh.n_cells();
    let sigma: Vec<f64> = (0..nc).map(|i| 1.0 + 0.1 * i as f64).collect();
    let sigma_aniso: Vec<f64> = sigma.iter().cycle().take(3 * nc).copied().collect();

    for kind in [InnerProductKind::Faces, InnerProductKind::Edges] {
        let iso = mesh
            .fast_inner_product(kind, Some(&Property::from(sigma.clone())), false, false)
            .unwrap();
        let aniso = mesh
            .fast_inner_product(kind, Some(&Property::from(sigma_aniso.clone())), false, false)
            .unwrap();
        assert_eq!(iso.rows(), aniso.rows());
        let d_iso = tensor_mesh::linalg::diagonal(&iso);
        let d_aniso = tensor_mesh::linalg::diagonal(&aniso);
        for (a, b) in d_iso.iter().zip(&d_aniso) {
            assert_relative_eq!(a, b, max_relative = 1e-12);
        }
    }
}

#[test]
fn test_double_inversion_round_trip() {
    let mesh = padded_mesh();
    let prop = Property::Scalar(3.5);
    let m = mesh.fast_edge_inner_product(Some(&prop), false, false).unwrap();
    let m_inv = mesh.fast_edge_inner_product(Some(&prop), false, true).unwrap();
    let back = tensor_mesh::sd_inv(&m_inv);

    let (d, d_back) = (
        tensor_mesh::linalg::diagonal(&m),
        tensor_mesh::linalg::diagonal(&back),
    );
    for (a, b) in d.iter().zip(&d_back) {
        assert_relative_eq!(a, b, max_relative = 1e-12);
    }
}
