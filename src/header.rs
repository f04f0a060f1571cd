//! This module defines the `HeaderModel` struct, the canonical and
//! format independent description of a volume's axes, along with the
//! loose `RawHeader` which format adapters fill in before normalization.
//!
//! # Example
//!
//! ```
//! use neurovol::{RawHeader, HeaderModel, Space};
//! # use neurovol::Result;
//!
//! # fn run() -> Result<()> {
//! let raw: RawHeader = serde_json::from_str(r#"{
//!     "order": ["zspace", "yspace", "xspace"],
//!     "xspace": {"space_length": "30", "start": 0, "step": 1},
//!     "yspace": {"space_length": 20, "start": 0, "step": 1},
//!     "zspace": {"space_length": 10, "start": 0, "step": 1}
//! }"#)?;
//! let header = HeaderModel::normalize(raw)?;
//! assert_eq!(header.axis(Space::Z).offset, 600);
//! assert_eq!(header.axis(Space::X).offset, 1);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```

use crate::affine;
use crate::error::{Result, VolumeError};
use crate::typedef::{AxisName, DataType, Space};
use serde::Deserialize;
use serde_json::Value;

/// One axis of a raw header, with every numeric field kept in whatever
/// representation the source format used (number or numeric string).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAxis {
    /// Number of samples along the axis
    pub space_length: Option<Value>,
    /// World coordinate of sample 0 along the axis' own direction
    pub start: Option<Value>,
    /// Signed sample spacing
    pub step: Option<Value>,
    /// Orientation of the axis in world space
    pub direction_cosines: Option<Vec<Value>>,
}

impl RawAxis {
    /// Build a raw axis out of already numeric values.
    pub fn new(space_length: usize, start: f64, step: f64) -> Self {
        RawAxis {
            space_length: Some(Value::from(space_length as u64)),
            start: Some(Value::from(start)),
            step: Some(Value::from(step)),
            direction_cosines: None,
        }
    }

    /// Attach direction cosines to this axis.
    pub fn with_cosines(mut self, cosines: [f64; 3]) -> Self {
        self.direction_cosines = Some(cosines.iter().map(|c| Value::from(*c)).collect());
        self
    }
}

/// A volume header as handed over by a format adapter, prior to validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawHeader {
    /// Storage order of the flattened buffer, outermost axis first.
    /// May be prefixed with `time`.
    pub order: Option<Vec<String>>,
    /// The x axis
    pub xspace: Option<RawAxis>,
    /// The y axis
    pub yspace: Option<RawAxis>,
    /// The z axis
    pub zspace: Option<RawAxis>,
    /// The optional time axis
    pub time: Option<RawAxis>,
    /// Format specific datatype name
    pub datatype: Option<String>,
}

/// A normalized axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDescriptor {
    /// Which axis this is
    pub name: AxisName,
    /// Number of samples along this axis
    pub space_length: usize,
    /// World coordinate of sample 0, along this axis' direction
    pub start: f64,
    /// Signed sample spacing. A negative step means sample 0 sits at the
    /// high end of the axis.
    pub step: f64,
    /// Orientation of this axis in world space
    pub direction_cosines: [f64; 3],
    /// Linear stride, in samples, of one unit along this axis
    pub offset: usize,
}

/// Shape of the slices taken with a given spatial axis as normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlicePlane {
    /// Axis running along the rows of the slice
    pub width_space: Space,
    /// Axis running along the columns of the slice
    pub height_space: Space,
    /// `space_length` of `width_space`
    pub width: usize,
    /// `space_length` of `height_space`
    pub height: usize,
}

/// The canonical volume header.
///
/// Always holds the three spatial axes with their strides resolved against
/// the actual storage `order`, the slice plane of each, and the world
/// coordinates of voxel (0, 0, 0).
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderModel {
    spaces: [AxisDescriptor; 3],
    planes: [SlicePlane; 3],
    time: Option<AxisDescriptor>,
    order: [Space; 3],
    voxel_origin: [f64; 3],
    datatype: Option<String>,
    frame_len: usize,
    element_count: usize,
}

impl HeaderModel {
    /// Validate a raw header and derive all dependent fields.
    ///
    /// # Errors
    ///
    /// - `VolumeError::HeaderParse` if a required field is missing or is
    ///   not numeric, or if a 4-element order comes without a time axis.
    /// - `VolumeError::FormatParse` if `order` does not name each spatial
    ///   axis exactly once.
    /// - `VolumeError::HeaderParse` if the axis lengths multiply to more
    ///   samples than can be addressed.
    pub fn normalize(raw: RawHeader) -> Result<HeaderModel> {
        let RawHeader {
            order,
            xspace,
            yspace,
            zspace,
            time,
            datatype,
        } = raw;

        let raw_order = order.ok_or_else(|| VolumeError::header_parse("order", "missing"))?;
        let order = parse_order(&raw_order, time.is_some())?;

        let mut spaces = [
            spatial_axis(Space::X, xspace)?,
            spatial_axis(Space::Y, yspace)?,
            spatial_axis(Space::Z, zspace)?,
        ];

        let lengths = [
            spaces[0].space_length,
            spaces[1].space_length,
            spaces[2].space_length,
        ];
        let len = |s: Space| lengths[s.index()];
        let (outer, middle, inner) = (order[0], order[1], order[2]);
        let plane_len = checked_product(&[len(middle), len(inner)])?;
        let frame_len = checked_product(&[len(outer), plane_len])?;
        let strides = [plane_len, len(inner), 1];
        for (space, stride) in order.iter().zip(strides.iter()) {
            spaces[space.index()].offset = *stride;
        }

        let mut planes = [SlicePlane {
            width_space: Space::Y,
            height_space: Space::Z,
            width: 0,
            height: 0,
        }; 3];
        for space in Space::ALL.iter() {
            let (width_space, height_space) = space.plane();
            planes[space.index()] = SlicePlane {
                width_space,
                height_space,
                width: len(width_space),
                height: len(height_space),
            };
        }

        let time = match time {
            Some(raw_time) => {
                let mut t = axis_descriptor(AxisName::Time, raw_time)?;
                t.offset = frame_len;
                Some(t)
            }
            None => None,
        };
        let frames = time.map(|t| t.space_length).unwrap_or(1);
        let element_count = checked_product(&[frame_len, frames])?;

        let voxel_origin = affine::voxel_origin(&spaces);

        Ok(HeaderModel {
            spaces,
            planes,
            time,
            order,
            voxel_origin,
            datatype,
            frame_len,
            element_count,
        })
    }

    /// The descriptor of a spatial axis.
    pub fn axis(&self, space: Space) -> &AxisDescriptor {
        &self.spaces[space.index()]
    }

    /// Look up any axis by name. Only `AxisName::Time` may be absent.
    pub fn get(&self, name: AxisName) -> Option<&AxisDescriptor> {
        match name.space() {
            Some(space) => Some(self.axis(space)),
            None => self.time.as_ref(),
        }
    }

    /// The slice plane of a spatial axis.
    pub fn plane(&self, space: Space) -> &SlicePlane {
        &self.planes[space.index()]
    }

    /// The time axis, if the volume has one.
    pub fn time(&self) -> Option<&AxisDescriptor> {
        self.time.as_ref()
    }

    /// Spatial storage order, outermost axis first.
    pub fn order(&self) -> &[Space; 3] {
        &self.order
    }

    /// World coordinates of voxel (0, 0, 0).
    pub fn voxel_origin(&self) -> [f64; 3] {
        self.voxel_origin
    }

    /// The datatype name declared by the source header, if any.
    pub fn datatype_name(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    /// Number of samples in one time frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Number of time frames, 1 for a 3D volume.
    pub fn frames(&self) -> usize {
        self.time.map(|t| t.space_length).unwrap_or(1)
    }

    /// Total number of samples the volume buffer must hold.
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Size in bytes of a buffer holding every sample as `datatype`.
    ///
    /// # Errors
    ///
    /// - `VolumeError::HeaderParse` if that size cannot be addressed.
    pub fn byte_len(&self, datatype: DataType) -> Result<usize> {
        checked_product(&[self.element_count, datatype.size_of()])
    }

    /// Number of dimensions, 3 or 4.
    pub fn dimensionality(&self) -> usize {
        if self.time.is_some() {
            4
        } else {
            3
        }
    }

    /// Resolve a sample type from the declared datatype name, MINC style.
    pub(crate) fn minc_data_type(&self) -> DataType {
        match self.datatype_name() {
            Some(name) => DataType::from_minc_name(name).unwrap_or_else(|| {
                log::warn!("unknown datatype `{}`, reading voxels as uint8", name);
                DataType::Uint8
            }),
            None => DataType::Uint8,
        }
    }
}

fn checked_product(factors: &[usize]) -> Result<usize> {
    factors
        .iter()
        .try_fold(1usize, |acc, f| acc.checked_mul(*f))
        .ok_or_else(|| {
            VolumeError::header_parse(
                "space_length",
                format!("volume of {:?} samples is too large", factors),
            )
        })
}

fn parse_order(raw: &[String], has_time: bool) -> Result<[Space; 3]> {
    let spatial = match raw.len() {
        3 => raw,
        4 => {
            if !has_time {
                return Err(VolumeError::header_parse(
                    "time",
                    "4-dimensional order without a time axis",
                ));
            }
            &raw[1..]
        }
        n => {
            return Err(VolumeError::FormatParse(format!(
                "order must list 3 or 4 axes, got {}",
                n
            )))
        }
    };

    let mut order = [Space::X; 3];
    for (slot, name) in order.iter_mut().zip(spatial) {
        *slot = name.parse()?;
    }
    if order[0] == order[1] || order[1] == order[2] || order[0] == order[2] {
        return Err(VolumeError::FormatParse(format!(
            "order {:?} does not name every spatial axis",
            raw
        )));
    }
    Ok(order)
}

fn spatial_axis(space: Space, raw: Option<RawAxis>) -> Result<AxisDescriptor> {
    let raw = raw.ok_or_else(|| VolumeError::header_parse(space.name(), "missing"))?;
    let mut axis = axis_descriptor(space.into(), raw)?;
    if axis.step == 0. {
        return Err(VolumeError::header_parse(
            format!("{}.step", space),
            "must be non-zero",
        ));
    }
    if axis.direction_cosines == [0.; 3] {
        axis.direction_cosines = standard_basis(space);
    }
    Ok(axis)
}

fn axis_descriptor(name: AxisName, raw: RawAxis) -> Result<AxisDescriptor> {
    let field = |f: &str| format!("{}.{}", name, f);

    let length = coerce(&field("space_length"), raw.space_length.as_ref())?;
    if length < 1. || length.fract() != 0. {
        return Err(VolumeError::header_parse(
            field("space_length"),
            format!("expected a positive integer, got {}", length),
        ));
    }
    let start = coerce(&field("start"), raw.start.as_ref())?;
    let step = coerce(&field("step"), raw.step.as_ref())?;

    let direction_cosines = match (raw.direction_cosines, name.space()) {
        (Some(values), _) => {
            if values.len() != 3 {
                return Err(VolumeError::header_parse(
                    field("direction_cosines"),
                    format!("expected 3 components, got {}", values.len()),
                ));
            }
            let mut c = [0.; 3];
            for (i, v) in values.iter().enumerate() {
                c[i] = coerce(&field("direction_cosines"), Some(v))?;
            }
            c
        }
        (None, Some(space)) => standard_basis(space),
        (None, None) => [0.; 3],
    };

    Ok(AxisDescriptor {
        name,
        space_length: length as usize,
        start,
        step,
        direction_cosines,
        offset: 0,
    })
}

/// Read a loose numeric header value.
fn coerce(field: &str, value: Option<&Value>) -> Result<f64> {
    let v = match value {
        None | Some(Value::Null) => return Err(VolumeError::header_parse(field, "missing")),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match v {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(VolumeError::header_parse(
            field,
            format!("not a number: {}", value.map(Value::to_string).unwrap_or_default()),
        )),
    }
}

fn standard_basis(space: Space) -> [f64; 3] {
    let mut c = [0.; 3];
    c[space.index()] = 1.;
    c
}
