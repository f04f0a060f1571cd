//! Voxel to world coordinate transforms.
//!
//! The voxel to world map applied here is
//!
//! ```text
//! cxx * stepx | cyx * stepy | czx * stepz | ox
//! cxy * stepx | cyy * stepy | czy * stepz | oy
//! cxz * stepx | cyz * stepy | czz * stepz | oz
//! 0           | 0           | 0           | 1
//! ```
//!
//! where `c` are the direction cosines of each axis and `o` is the voxel
//! origin. Voxel indices are always given in storage order.

use crate::header::{AxisDescriptor, HeaderModel};
use crate::typedef::Space;
use approx::abs_diff_eq;

/// A 4x4 transform, stored row major.
pub type Mat44 = [[f64; 4]; 4];

/// Voxel coordinates in storage order: `i` runs along `order[0]`, `j`
/// along `order[1]` and `k` along `order[2]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoxelCoords<T = f64> {
    /// Outermost index
    pub i: T,
    /// Middle index
    pub j: T,
    /// Innermost index
    pub k: T,
}

impl<T> VoxelCoords<T> {
    /// Create a new triple.
    pub fn new(i: T, j: T, k: T) -> Self {
        VoxelCoords { i, j, k }
    }
}

impl VoxelCoords<f64> {
    /// Round to the nearest voxel.
    pub fn round(self) -> VoxelCoords<i64> {
        VoxelCoords {
            i: self.i.round() as i64,
            j: self.j.round() as i64,
            k: self.k.round() as i64,
        }
    }
}

/// World coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldCoords {
    #[allow(missing_docs)]
    pub x: f64,
    #[allow(missing_docs)]
    pub y: f64,
    #[allow(missing_docs)]
    pub z: f64,
}

impl WorldCoords {
    /// Create a new world position.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        WorldCoords { x, y, z }
    }
}

/// World coordinates of voxel (0, 0, 0).
///
/// Each axis' `start` is measured along that axis' own direction, so the
/// origin is the sum of the starts scaled by their direction cosines.
/// Axes are expected in x, y, z order.
pub fn voxel_origin(spaces: &[AxisDescriptor; 3]) -> [f64; 3] {
    let mut o = [0.; 3];
    for axis in spaces {
        for (c, oc) in o.iter_mut().enumerate() {
            *oc += axis.start * axis.direction_cosines[c];
        }
    }
    o
}

/// Map storage order voxel indices onto world coordinates.
pub fn voxel_to_world(header: &HeaderModel, voxel: VoxelCoords) -> WorldCoords {
    let mut named = [0.; 3];
    let order = header.order();
    named[order[0].index()] = voxel.i;
    named[order[1].index()] = voxel.j;
    named[order[2].index()] = voxel.k;

    let mut world = header.voxel_origin();
    for space in Space::ALL.iter() {
        let axis = header.axis(*space);
        let v = named[space.index()] * axis.step;
        for (c, w) in world.iter_mut().enumerate() {
            *w += v * axis.direction_cosines[c];
        }
    }
    WorldCoords::new(world[0], world[1], world[2])
}

/// The world to voxel map, one row per named axis (x, y, z):
///
/// ```text
/// cxx / stepx | cxy / stepx | cxz / stepx | (-o . cx) / stepx
/// cyx / stepy | cyy / stepy | cyz / stepy | (-o . cy) / stepy
/// czx / stepz | czy / stepz | czz / stepz | (-o . cz) / stepz
/// ```
///
/// The direction cosine matrix is orthonormal by convention, so its
/// transpose is its inverse.
pub fn world_to_voxel_matrix(header: &HeaderModel) -> [[f64; 4]; 3] {
    let o = header.voxel_origin();
    let mut m = [[0.; 4]; 3];
    for space in Space::ALL.iter() {
        let axis = header.axis(*space);
        let c = axis.direction_cosines;
        let row = &mut m[space.index()];
        row[0] = c[0] / axis.step;
        row[1] = c[1] / axis.step;
        row[2] = c[2] / axis.step;
        row[3] = -(o[0] * c[0] + o[1] * c[1] + o[2] * c[2]) / axis.step;
    }
    m
}

/// Map world coordinates onto continuous storage order voxel indices.
/// Round the result for discrete voxel coordinates.
pub fn world_to_voxel(header: &HeaderModel, world: WorldCoords) -> VoxelCoords {
    let m = world_to_voxel_matrix(header);
    let mut named = [0.; 3];
    for (n, row) in named.iter_mut().zip(m.iter()) {
        *n = world.x * row[0] + world.y * row[1] + world.z * row[2] + row[3];
    }
    let order = header.order();
    VoxelCoords::new(
        named[order[0].index()],
        named[order[1].index()],
        named[order[2].index()],
    )
}

/// Build the NIfTI-1 qform transform out of its quaternion parameters,
/// voxel sizes and handedness factor, as done by `nifti1_io`.
///
/// Non-positive voxel sizes are replaced by 1 and a negative `qfac`
/// flips the third axis.
#[allow(clippy::too_many_arguments)]
pub fn quaternion_to_mat44(
    qb: f64,
    qc: f64,
    qd: f64,
    qx: f64,
    qy: f64,
    qz: f64,
    dx: f64,
    dy: f64,
    dz: f64,
    qfac: f64,
) -> Mat44 {
    let (mut b, mut c, mut d) = (qb, qc, qd);
    let mut a = 1.0 - (b * b + c * c + d * d);
    if a < 1.0e-7 {
        // 180 degree rotation: normalize (b, c, d)
        a = 1.0 / (b * b + c * c + d * d).sqrt();
        b *= a;
        c *= a;
        d *= a;
        a = 0.0;
    } else {
        a = a.sqrt();
    }

    let xd = if dx > 0.0 { dx } else { 1.0 };
    let yd = if dy > 0.0 { dy } else { 1.0 };
    let mut zd = if dz > 0.0 { dz } else { 1.0 };
    if qfac < 0.0 {
        zd = -zd;
    }

    [
        [
            (a * a + b * b - c * c - d * d) * xd,
            2.0 * (b * c - a * d) * yd,
            2.0 * (b * d + a * c) * zd,
            qx,
        ],
        [
            2.0 * (b * c + a * d) * xd,
            (a * a + c * c - b * b - d * d) * yd,
            2.0 * (c * d - a * b) * zd,
            qy,
        ],
        [
            2.0 * (b * d - a * c) * xd,
            2.0 * (c * d + a * b) * yd,
            (a * a + d * d - c * c - b * b) * zd,
            qz,
        ],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Per axis steps, direction cosines and starts equivalent to a 4x4
/// transform whose columns are already in x, y, z axis order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisGeometry {
    /// Signed step of each axis
    pub steps: [f64; 3],
    /// Unit direction of each axis
    pub cosines: [[f64; 3]; 3],
    /// Start of each axis, along its own direction
    pub starts: [f64; 3],
}

/// Decompose an affine transform into MINC style axis geometry.
///
/// Each column `a` of the rotation part becomes a step (its magnitude,
/// signed like the diagonal element) and a unit direction. The starts
/// solve `sum(start_a * cosines_a) = translation` by Cramer's rule.
pub fn transform_to_axes(transform: &Mat44) -> AxisGeometry {
    let mut steps = [0.; 3];
    let mut cosines = [[0.; 3]; 3];
    for a in 0..3 {
        let column = [transform[0][a], transform[1][a], transform[2][a]];
        let magnitude = (column[0] * column[0] + column[1] * column[1] + column[2] * column[2]).sqrt();
        if magnitude > 0. {
            let step = if transform[a][a] < 0. { -magnitude } else { magnitude };
            steps[a] = step;
            for (r, c) in cosines[a].iter_mut().enumerate() {
                *c = column[r] / step;
            }
        } else {
            steps[a] = 1.;
            cosines[a][a] = 1.;
        }
    }

    let translation = [transform[0][3], transform[1][3], transform[2][3]];
    let [cx, cy, cz] = cosines;
    let denom = determinant(&cx, &cy, &cz);
    let starts = if abs_diff_eq!(denom, 0., epsilon = 1e-12) {
        log::warn!("singular direction cosines, using the raw translation as starts");
        translation
    } else {
        [
            determinant(&translation, &cy, &cz) / denom,
            determinant(&cx, &translation, &cz) / denom,
            determinant(&cx, &cy, &translation) / denom,
        ]
    };

    AxisGeometry {
        steps,
        cosines,
        starts,
    }
}

/// Determinant of the 3x3 matrix with the given rows (or columns).
pub fn determinant(c0: &[f64; 3], c1: &[f64; 3], c2: &[f64; 3]) -> f64 {
    c0[0] * (c1[1] * c2[2] - c1[2] * c2[1]) - c0[1] * (c1[0] * c2[2] - c1[2] * c2[0])
        + c0[2] * (c1[0] * c2[1] - c1[1] * c2[0])
}

#[cfg(feature = "nalgebra_affine")]
mod nalgebra_affine {
    use super::*;
    use nalgebra::Matrix4;

    impl HeaderModel {
        /// The voxel to world transform as a matrix applied to storage
        /// order column vectors `(i, j, k, 1)`.
        #[rustfmt::skip]
        pub fn affine(&self) -> Matrix4<f64> {
            let o = self.voxel_origin();
            let col = |n: usize| {
                let axis = self.axis(self.order()[n]);
                let c = axis.direction_cosines;
                [c[0] * axis.step, c[1] * axis.step, c[2] * axis.step]
            };
            let (ci, cj, ck) = (col(0), col(1), col(2));
            Matrix4::new(
                ci[0], cj[0], ck[0], o[0],
                ci[1], cj[1], ck[1], o[1],
                ci[2], cj[2], ck[2], o[2],
                0.0,   0.0,   0.0,   1.0,
            )
        }
    }
}
