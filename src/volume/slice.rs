//! Extraction of 2D slices out of a volume buffer.
//!
//! A slice is taken with one spatial axis as its normal. The two other
//! axes span the slice following the fixed plane convention of
//! [`Space::plane`]. Every axis may step negatively, in which case its
//! storage order runs against increasing world coordinates; the walk
//! below flips such axes so that the resulting image is always laid out
//! in display orientation.
//!
//! [`Space::plane`]: ../../typedef/enum.Space.html#method.plane

use super::element::{with_samples, Samples};
use super::VolumeData;
use crate::header::{AxisDescriptor, HeaderModel};
use crate::typedef::Space;
use std::collections::HashMap;

/// A 2D cut through a volume, in row major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    /// The slice normal
    pub axis: Space,
    /// `width * height` samples, of the same type as the volume
    pub data: Samples,
    /// Axis running along each row
    pub width_space: AxisDescriptor,
    /// Axis running down the rows
    pub height_space: AxisDescriptor,
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

impl Slice {
    /// Fetch the sample at the given column and row.
    pub fn get_f64(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get_f64(row * self.width + col)
    }
}

/// Everything the buffer walk needs, resolved from the header.
#[derive(Debug, Clone, Copy)]
struct Walk {
    width: usize,
    height: usize,
    depth: usize,
    time_offset: usize,
    axis_offset: usize,
    width_offset: usize,
    height_offset: usize,
    x_positive: bool,
    y_positive: bool,
    /// storage index along the slice normal
    z: i64,
}

impl Walk {
    fn run<T: Copy + Default>(&self, src: &[T]) -> Vec<T> {
        let mut out = vec![T::default(); self.width * self.height];
        if self.z < 0 || self.z as usize >= self.depth {
            return out;
        }
        let tz_offset = self.time_offset + self.z as usize * self.axis_offset;

        let mut i = 0;
        // source rows are walked bottom to top, so that row 0 of the
        // output is the top of the image
        for row in (0..self.height).rev() {
            let y = if self.y_positive { row } else { self.height - row - 1 };
            let tzy_offset = tz_offset + y * self.height_offset;

            for col in 0..self.width {
                let x = if self.x_positive { col } else { self.width - col - 1 };
                out[i] = src[tzy_offset + x * self.width_offset];
                i += 1;
            }
        }
        out
    }
}

/// Extract one slice. Returns `None` if the time frame does not exist.
pub(crate) fn extract(
    header: &HeaderModel,
    data: &Samples,
    axis: Space,
    slice_num: i64,
    time: usize,
) -> Option<Slice> {
    if time >= header.frames() {
        return None;
    }
    let time_offset = header.time().map(|t| time * t.offset).unwrap_or(0);

    let axis_space = *header.axis(axis);
    let plane = header.plane(axis);
    let width_space = *header.axis(plane.width_space);
    let height_space = *header.axis(plane.height_space);

    let z_positive = axis_space.step > 0.;
    let length = axis_space.space_length as i64;
    let walk = Walk {
        width: plane.width,
        height: plane.height,
        depth: axis_space.space_length,
        time_offset,
        axis_offset: axis_space.offset,
        width_offset: width_space.offset,
        height_offset: height_space.offset,
        x_positive: width_space.step > 0.,
        y_positive: height_space.step > 0.,
        z: if z_positive {
            slice_num
        } else {
            // any index that does not fit is off the volume anyway
            length
                .checked_sub(slice_num)
                .and_then(|z| z.checked_sub(1))
                .unwrap_or(-1)
        },
    };

    let data = with_samples!(data, v => Samples::from(walk.run(v)));

    Some(Slice {
        axis,
        data,
        width_space,
        height_space,
        width: plane.width,
        height: plane.height,
    })
}

/// A memo of extracted slices for one volume, keyed by
/// `(axis, time, slice_num)`.
///
/// The cache remembers the volume's [`generation`] and drops every slice
/// as soon as the volume's samples have been modified. A cache must only
/// ever be used with a single volume.
///
/// [`generation`]: ../struct.VolumeData.html#method.generation
#[derive(Debug, Default)]
pub struct SliceCache {
    generation: u64,
    slices: HashMap<(Space, usize, i64), Slice>,
}

impl SliceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        SliceCache::default()
    }

    /// Fetch a slice from the cache, extracting it on a miss. Arguments
    /// default exactly as in [`VolumeData::slice`].
    ///
    /// [`VolumeData::slice`]: ../struct.VolumeData.html#method.slice
    pub fn slice(
        &mut self,
        volume: &VolumeData,
        axis: Space,
        slice_num: Option<i64>,
        time: Option<usize>,
    ) -> Option<&Slice> {
        if volume.generation() != self.generation {
            self.slices.clear();
            self.generation = volume.generation();
        }
        let slice_num = slice_num.unwrap_or_else(|| volume.position(axis));
        let time = time.unwrap_or_else(|| volume.current_time());
        let key = (axis, time, slice_num);
        if !self.slices.contains_key(&key) {
            let slice = volume.slice(axis, Some(slice_num), Some(time))?;
            let _ = self.slices.insert(key, slice);
        }
        self.slices.get(&key)
    }

    /// Number of cached slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Drop every cached slice.
    pub fn clear(&mut self) {
        self.slices.clear();
    }
}
