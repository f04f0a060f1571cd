use approx::assert_abs_diff_eq;
use neurovol::affine::{voxel_to_world, world_to_voxel};
use neurovol::{HeaderModel, RawAxis, RawHeader, VoxelCoords, WorldCoords};

mod util;

/// An oblique header: rotated 30 degrees around z, negative x step,
/// stored x major.
fn oblique() -> HeaderModel {
    let (s, c) = (30f64.to_radians().sin(), 30f64.to_radians().cos());
    let raw = RawHeader {
        order: Some(vec!["xspace".into(), "zspace".into(), "yspace".into()]),
        xspace: Some(RawAxis::new(10, 12.5, -1.5).with_cosines([c, s, 0.])),
        yspace: Some(RawAxis::new(8, -40., 2.).with_cosines([-s, c, 0.])),
        zspace: Some(RawAxis::new(6, 3., 0.75).with_cosines([0., 0., 1.])),
        ..Default::default()
    };
    HeaderModel::normalize(raw).unwrap()
}

#[test]
fn voxel_world_round_trip() {
    let header = oblique();
    for i in 0..10 {
        for j in 0..6 {
            for k in 0..8 {
                let voxel = VoxelCoords::new(i as f64, j as f64, k as f64);
                let back = world_to_voxel(&header, voxel_to_world(&header, voxel));
                assert_abs_diff_eq!(back.i, voxel.i, epsilon = 1e-6);
                assert_abs_diff_eq!(back.j, voxel.j, epsilon = 1e-6);
                assert_abs_diff_eq!(back.k, voxel.k, epsilon = 1e-6);
            }
        }
    }
}

#[test]
fn voxel_zero_is_origin() {
    let header = oblique();
    let w = voxel_to_world(&header, VoxelCoords::new(0., 0., 0.));
    let o = header.voxel_origin();
    assert_abs_diff_eq!(w.x, o[0], epsilon = 1e-12);
    assert_abs_diff_eq!(w.y, o[1], epsilon = 1e-12);
    assert_abs_diff_eq!(w.z, o[2], epsilon = 1e-12);
}

#[test]
fn storage_order_indices() {
    // z, y, x storage: i runs along z, k along x
    let header = util::zyx_header([4, 5, 6], [2., 3., -1.]);
    let w = voxel_to_world(&header, VoxelCoords::new(1., 2., 3.));
    assert_abs_diff_eq!(w.x, 6., epsilon = 1e-12);
    assert_abs_diff_eq!(w.y, 6., epsilon = 1e-12);
    assert_abs_diff_eq!(w.z, -1., epsilon = 1e-12);

    let v = world_to_voxel(&header, WorldCoords::new(6., 6., -1.));
    assert_abs_diff_eq!(v.i, 1., epsilon = 1e-12);
    assert_abs_diff_eq!(v.j, 2., epsilon = 1e-12);
    assert_abs_diff_eq!(v.k, 3., epsilon = 1e-12);
}

#[test]
fn world_to_voxel_rounds_on_request() {
    let header = util::zyx_header([4, 5, 6], [1., 1., 1.]);
    let v = world_to_voxel(&header, WorldCoords::new(2.4, 1.6, 0.51)).round();
    assert_eq!(v, VoxelCoords::new(1, 2, 2));
}

#[cfg(feature = "nalgebra_affine")]
mod nalgebra_affine {
    use super::oblique;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector4;
    use neurovol::affine::voxel_to_world;
    use neurovol::VoxelCoords;

    #[test]
    fn affine_matches_voxel_to_world() {
        let header = oblique();
        let affine = header.affine();
        let w = voxel_to_world(&header, VoxelCoords::new(3., 1., 4.));
        let m = affine * Vector4::new(3., 1., 4., 1.);
        assert_abs_diff_eq!(m[0], w.x, epsilon = 1e-9);
        assert_abs_diff_eq!(m[1], w.y, epsilon = 1e-9);
        assert_abs_diff_eq!(m[2], w.z, epsilon = 1e-9);
        assert_abs_diff_eq!(m[3], 1., epsilon = 1e-12);
    }
}
