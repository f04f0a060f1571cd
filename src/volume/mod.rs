//! This module defines the in-memory volume, which owns a sample buffer
//! together with its normalized header, tracks the viewer's cursor, and
//! hands out slices and coordinate conversions.
//! An integration with `ndarray` is available through the
//! `ndarray_volumes` feature.

pub mod element;
#[cfg(feature = "ndarray_volumes")]
pub mod ndarray;
pub mod slice;

pub use self::element::{Sample, Samples};
pub use self::slice::{Slice, SliceCache};

use crate::affine::{self, VoxelCoords, WorldCoords};
use crate::error::{Result, VolumeError};
use crate::header::HeaderModel;
use crate::typedef::{DataType, Space};

/// A fully loaded volume.
///
/// The header and the size of the sample buffer never change after
/// creation. The cursor (`position`, `current_time`) is plain mutable state
/// of the owning viewer session.
///
/// # Example
///
/// ```
/// use neurovol::{HeaderModel, RawAxis, RawHeader, Samples, Space, VolumeData};
/// # use neurovol::Result;
///
/// # fn run() -> Result<()> {
/// let raw = RawHeader {
///     order: Some(vec!["zspace".into(), "yspace".into(), "xspace".into()]),
///     xspace: Some(RawAxis::new(2, 0., 1.)),
///     yspace: Some(RawAxis::new(2, 0., 1.)),
///     zspace: Some(RawAxis::new(2, 0., 1.)),
///     ..Default::default()
/// };
/// let volume = VolumeData::new(
///     HeaderModel::normalize(raw)?,
///     Samples::Uint8((0..8).collect()),
/// )?;
/// let slice = volume.slice(Space::Z, Some(1), None).unwrap();
/// assert_eq!((slice.width, slice.height), (2, 2));
/// assert_eq!(volume.intensity_max(), 7.);
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeData {
    header: HeaderModel,
    data: Samples,
    position: [i64; 3],
    current_time: usize,
    intensity_min: f64,
    intensity_max: f64,
    generation: u64,
}

impl VolumeData {
    /// Wrap a sample buffer with its header, scanning the intensity range.
    ///
    /// # Errors
    ///
    /// - `VolumeError::DataLength` if the buffer does not hold exactly as
    ///   many samples as the header declares.
    pub fn new(header: HeaderModel, data: Samples) -> Result<Self> {
        let expected = header.element_count();
        if data.len() != expected {
            let size = data.data_type().size_of();
            return Err(VolumeError::DataLength(
                expected.saturating_mul(size),
                data.len() * size,
            ));
        }
        let (intensity_min, intensity_max) = data.range().unwrap_or((0., 0.));
        log::debug!(
            "volume of {} {:?} samples, intensity range [{}, {}]",
            expected,
            data.data_type(),
            intensity_min,
            intensity_max
        );

        Ok(VolumeData {
            header,
            data,
            position: [0; 3],
            current_time: 0,
            intensity_min,
            intensity_max,
            generation: 0,
        })
    }

    /// The normalized header.
    pub fn header(&self) -> &HeaderModel {
        &self.header
    }

    /// The raw sample buffer, in storage order.
    pub fn data(&self) -> &Samples {
        &self.data
    }

    /// Retrieve the sample buffer, consuming the volume.
    pub fn into_data(self) -> Samples {
        self.data
    }

    /// Numeric type of the samples.
    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    /// Smallest sample value, as scanned at load time.
    pub fn intensity_min(&self) -> f64 {
        self.intensity_min
    }

    /// Largest sample value, as scanned at load time.
    pub fn intensity_max(&self) -> f64 {
        self.intensity_max
    }

    /// Counter bumped every time a sample is overwritten.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cursor position along a spatial axis, in display orientation.
    pub fn position(&self, space: Space) -> i64 {
        self.position[space.index()]
    }

    /// Move the cursor along one spatial axis, in display orientation.
    pub fn set_position(&mut self, space: Space, value: i64) {
        self.position[space.index()] = value;
    }

    /// Current time frame.
    pub fn current_time(&self) -> usize {
        self.current_time
    }

    /// Select the current time frame.
    pub fn set_current_time(&mut self, time: usize) {
        self.current_time = time;
    }

    /// Extract a slice normal to `axis`.
    ///
    /// `slice_num` (in display orientation) defaults to the cursor position
    /// along `axis`, `time` to the current time frame. A slice number out
    /// of the volume yields a zero filled slice. Returns `None` if the time
    /// frame does not exist, in which case there is nothing to render.
    pub fn slice(&self, axis: Space, slice_num: Option<i64>, time: Option<usize>) -> Option<Slice> {
        let slice_num = slice_num.unwrap_or_else(|| self.position(axis));
        let time = time.unwrap_or(self.current_time);
        slice::extract(&self.header, &self.data, axis, slice_num, time)
    }

    /// Sample value at storage order voxel `(i, j, k)` and frame `time`.
    ///
    /// Missing arguments default to the cursor. Coordinates outside of
    /// the volume are not an error and read as 0.
    pub fn get_intensity_value(
        &self,
        i: Option<i64>,
        j: Option<i64>,
        k: Option<i64>,
        time: Option<usize>,
    ) -> f64 {
        let vc = self.get_voxel_coords();
        let ijk = [i.unwrap_or(vc.i), j.unwrap_or(vc.j), k.unwrap_or(vc.k)];
        let time = time.unwrap_or(self.current_time);
        if time >= self.header.frames() {
            return 0.;
        }

        let mut index = self.header.time().map(|t| time * t.offset).unwrap_or(0);
        for (v, space) in ijk.iter().zip(self.header.order()) {
            let axis = self.header.axis(*space);
            if *v < 0 || *v as usize >= axis.space_length {
                return 0.;
            }
            index += *v as usize * axis.offset;
        }
        self.data.get_f64(index).unwrap_or(0.)
    }

    /// The cursor as storage order voxel coordinates.
    pub fn get_voxel_coords(&self) -> VoxelCoords<i64> {
        let order = self.header.order();
        VoxelCoords::new(
            self.flip(order[0], self.position(order[0])),
            self.flip(order[1], self.position(order[1])),
            self.flip(order[2], self.position(order[2])),
        )
    }

    /// Move the cursor to storage order voxel coordinates.
    pub fn set_voxel_coords(&mut self, i: i64, j: i64, k: i64) {
        let order = *self.header.order();
        for (space, v) in order.iter().zip(&[i, j, k]) {
            let p = self.flip(*space, *v);
            self.set_position(*space, p);
        }
    }

    /// The cursor in world coordinates.
    pub fn get_world_coords(&self) -> WorldCoords {
        let v = self.get_voxel_coords();
        self.voxel_to_world(VoxelCoords::new(v.i as f64, v.j as f64, v.k as f64))
    }

    /// Move the cursor to the voxel nearest to a world position.
    pub fn set_world_coords(&mut self, x: f64, y: f64, z: f64) {
        let v = self.world_to_voxel(WorldCoords::new(x, y, z)).round();
        self.set_voxel_coords(v.i, v.j, v.k);
    }

    /// See [`affine::voxel_to_world`](../affine/fn.voxel_to_world.html).
    pub fn voxel_to_world(&self, voxel: VoxelCoords) -> WorldCoords {
        affine::voxel_to_world(&self.header, voxel)
    }

    /// See [`affine::world_to_voxel`](../affine/fn.world_to_voxel.html).
    pub fn world_to_voxel(&self, world: WorldCoords) -> VoxelCoords {
        affine::world_to_voxel(&self.header, world)
    }

    /// Sample at the named voxel coordinates `(x, y, z)` of the current
    /// time frame, with no display flip. Returns `None` outside of the volume.
    pub fn get_volume_data_intensity_value(&self, x: i64, y: i64, z: i64) -> Option<f64> {
        let index = self.named_index(x, y, z)?;
        self.data.get_f64(index)
    }

    /// Overwrite the sample at the named voxel coordinates `(x, y, z)` of
    /// the current time frame. The value is cast to the volume's data type.
    ///
    /// # Errors
    ///
    /// - `VolumeError::OutOfBounds` if the coordinates fall outside of the volume.
    pub fn set_intensity_value(&mut self, x: i64, y: i64, z: i64, value: f64) -> Result<()> {
        let index = self
            .named_index(x, y, z)
            .ok_or_else(|| VolumeError::OutOfBounds(vec![x, y, z]))?;
        if !self.data.set_f64(index, value) {
            return Err(VolumeError::OutOfBounds(vec![x, y, z]));
        }
        self.generation += 1;
        Ok(())
    }

    /// The largest zoom at which every slice of the volume fits a panel of
    /// the given size.
    pub fn preferred_zoom(&self, width: f64, height: f64) -> f64 {
        let fov = |s: Space| {
            let a = self.header.axis(s);
            a.space_length as f64 * a.step.abs()
        };
        let (x_fov, y_fov, z_fov) = (fov(Space::X), fov(Space::Y), fov(Space::Z));
        (width / x_fov)
            .min(width / y_fov)
            .min(height / y_fov)
            .min(height / z_fov)
    }

    /// Display flip of a position along `space`. Its own inverse.
    fn flip(&self, space: Space, v: i64) -> i64 {
        let axis = self.header.axis(space);
        if axis.step > 0. {
            v
        } else {
            axis.space_length as i64 - v
        }
    }

    fn named_index(&self, x: i64, y: i64, z: i64) -> Option<usize> {
        let mut index = self
            .header
            .time()
            .map(|t| self.current_time * t.offset)
            .unwrap_or(0);
        for (space, v) in Space::ALL.iter().zip(&[x, y, z]) {
            let axis = self.header.axis(*space);
            if *v < 0 || *v as usize >= axis.space_length {
                return None;
            }
            index += *v as usize * axis.offset;
        }
        Some(index)
    }
}
