//! This module contains the named types shared by the header model and
//! the format adapters: axis names, the sample data types a volume may be
//! stored in, and the NIfTI-1 datatype codes which map onto them.

use crate::error::{Result, VolumeError};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::fmt;
use std::str::FromStr;

/// One of the three spatial axes of a volume.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum Space {
    /// `xspace`
    X,
    /// `yspace`
    Y,
    /// `zspace`
    Z,
}

impl Space {
    /// All spatial axes, in canonical x, y, z order.
    pub const ALL: [Space; 3] = [Space::X, Space::Y, Space::Z];

    /// Position of this axis in canonical x, y, z order.
    pub fn index(self) -> usize {
        match self {
            Space::X => 0,
            Space::Y => 1,
            Space::Z => 2,
        }
    }

    /// The textual name used by volume headers.
    pub fn name(self) -> &'static str {
        match self {
            Space::X => "xspace",
            Space::Y => "yspace",
            Space::Z => "zspace",
        }
    }

    /// The two other spatial axes, as `(width, height)` of a slice
    /// taken with this axis as its normal.
    ///
    /// An x-normal slice has y as width and z as height, a y-normal slice
    /// has x as width and z as height, a z-normal slice has x as width and
    /// y as height.
    pub fn plane(self) -> (Space, Space) {
        match self {
            Space::X => (Space::Y, Space::Z),
            Space::Y => (Space::X, Space::Z),
            Space::Z => (Space::X, Space::Y),
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Space {
    type Err = VolumeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "xspace" => Ok(Space::X),
            "yspace" => Ok(Space::Y),
            "zspace" => Ok(Space::Z),
            other => Err(VolumeError::FormatParse(format!(
                "unknown spatial axis `{}`",
                other
            ))),
        }
    }
}

/// Any named axis of a volume, including time.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum AxisName {
    /// `xspace`
    XSpace,
    /// `yspace`
    YSpace,
    /// `zspace`
    ZSpace,
    /// `time`
    Time,
}

impl AxisName {
    /// The spatial axis this name refers to, if any.
    pub fn space(self) -> Option<Space> {
        match self {
            AxisName::XSpace => Some(Space::X),
            AxisName::YSpace => Some(Space::Y),
            AxisName::ZSpace => Some(Space::Z),
            AxisName::Time => None,
        }
    }

    /// The textual name used by volume headers.
    pub fn name(self) -> &'static str {
        match self.space() {
            Some(space) => space.name(),
            None => "time",
        }
    }
}

impl From<Space> for AxisName {
    fn from(space: Space) -> Self {
        match space {
            Space::X => AxisName::XSpace,
            Space::Y => AxisName::YSpace,
            Space::Z => AxisName::ZSpace,
        }
    }
}

impl fmt::Display for AxisName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AxisName {
    type Err = VolumeError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "time" {
            Ok(AxisName::Time)
        } else {
            s.parse::<Space>().map(AxisName::from)
        }
    }
}

/// Numeric type of the samples held by a volume.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum DataType {
    /// unsigned char
    Uint8,
    /// signed char
    Int8,
    /// unsigned short
    Uint16,
    /// signed short
    Int16,
    /// unsigned int
    Uint32,
    /// signed int
    Int32,
    /// 32 bit float
    Float32,
    /// 64 bit float
    Float64,
}

impl DataType {
    /// Retrieve the size of an element of this data type, in bytes.
    pub fn size_of(self) -> usize {
        use self::DataType::*;
        match self {
            Uint8 | Int8 => 1,
            Uint16 | Int16 => 2,
            Uint32 | Int32 | Float32 => 4,
            Float64 => 8,
        }
    }

    /// The typed array name of this data type, as in `"float32"`.
    pub fn name(self) -> &'static str {
        use self::DataType::*;
        match self {
            Uint8 => "uint8",
            Int8 => "int8",
            Uint16 => "uint16",
            Int16 => "int16",
            Uint32 => "uint32",
            Int32 => "int32",
            Float32 => "float32",
            Float64 => "float64",
        }
    }

    /// Map a MINC header datatype name onto a sample type.
    ///
    /// Both the MINC type names (`SHORT`, `FLOAT`, ...) and the typed array
    /// names (`int16`, `float32`, ...) are understood. Returns `None` for
    /// anything else; callers fall back to `Uint8`.
    pub fn from_minc_name(name: &str) -> Option<DataType> {
        use self::DataType::*;
        let dt = match name {
            "CHAR" | "BYTE" | "uint8" => Uint8,
            "int8" => Int8,
            "SHORT" | "int16" => Int16,
            "USHORT" | "uint16" => Uint16,
            "LONG" | "INT" | "int32" => Int32,
            // rgb8 volumes carry one packed pixel per voxel
            "ULONG" | "UINT" | "uint32" | "rgb8" => Uint32,
            "FLOAT" | "float32" => Float32,
            "DOUBLE" | "float64" => Float64,
            _ => return None,
        };
        Some(dt)
    }
}

/// Data type codes of the NIfTI-1 `datatype` header field.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum NiftiType {
    /// unsigned char.
    // NIFTI_TYPE_UINT8           2
    Uint8 = 2,
    /// signed short.
    // NIFTI_TYPE_INT16           4
    Int16 = 4,
    /// signed int.
    // NIFTI_TYPE_INT32           8
    Int32 = 8,
    /// 32 bit float.
    // NIFTI_TYPE_FLOAT32        16
    Float32 = 16,
    /// 64 bit complex = 2 32 bit floats.
    // NIFTI_TYPE_COMPLEX64      32
    Complex64 = 32,
    /// 64 bit float = double.
    // NIFTI_TYPE_FLOAT64        64
    Float64 = 64,
    /// 3 8 bit bytes.
    // NIFTI_TYPE_RGB24         128
    Rgb24 = 128,
    /// signed char.
    // NIFTI_TYPE_INT8          256
    Int8 = 256,
    /// unsigned short.
    // NIFTI_TYPE_UINT16        512
    Uint16 = 512,
    /// unsigned int.
    // NIFTI_TYPE_UINT32        768
    Uint32 = 768,
    /// signed long long.
    // NIFTI_TYPE_INT64        1024
    Int64 = 1024,
    /// unsigned long long.
    // NIFTI_TYPE_UINT64       1280
    Uint64 = 1280,
    /// 128 bit float = long double.
    // NIFTI_TYPE_FLOAT128     1536
    Float128 = 1536,
    /// 128 bit complex = 2 64 bit floats.
    // NIFTI_TYPE_COMPLEX128   1792
    Complex128 = 1792,
    /// 256 bit complex = 2 128 bit floats
    // NIFTI_TYPE_COMPLEX256   2048
    Complex256 = 2048,
    /// 4 8 bit bytes.
    // NIFTI_TYPE_RGBA32       2304
    Rgba32 = 2304,
}

impl NiftiType {
    /// Validate a raw `datatype` code and map it onto a sample type.
    ///
    /// # Errors
    ///
    /// - `VolumeError::UnsupportedDatatype` for unknown codes and for the
    ///   64-bit integer, complex, RGB(A) and 128-bit float types.
    pub fn data_type_of(code: i16) -> Result<DataType> {
        let nifti_type = NiftiType::from_i16(code)
            .ok_or_else(|| VolumeError::UnsupportedDatatype(code.to_string()))?;
        nifti_type.data_type()
    }

    /// The sample type used to hold voxels of this NIfTI type.
    pub fn data_type(self) -> Result<DataType> {
        match self {
            NiftiType::Uint8 => Ok(DataType::Uint8),
            NiftiType::Int16 => Ok(DataType::Int16),
            NiftiType::Int32 => Ok(DataType::Int32),
            NiftiType::Float32 => Ok(DataType::Float32),
            NiftiType::Float64 => Ok(DataType::Float64),
            NiftiType::Int8 => Ok(DataType::Int8),
            NiftiType::Uint16 => Ok(DataType::Uint16),
            NiftiType::Uint32 => Ok(DataType::Uint32),
            other => Err(VolumeError::UnsupportedDatatype(format!(
                "{} ({:?})",
                other as i16, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_names_round_trip() {
        for space in Space::ALL.iter() {
            assert_eq!(space.name().parse::<Space>().unwrap(), *space);
            assert_eq!(space.to_string(), space.name());
        }
        assert_eq!("time".parse::<AxisName>().unwrap(), AxisName::Time);
        assert_eq!("zspace".parse::<AxisName>().unwrap(), AxisName::ZSpace);
        assert!("wspace".parse::<Space>().is_err());
        assert!("time".parse::<Space>().is_err());
    }

    #[test]
    fn plane_convention() {
        assert_eq!(Space::X.plane(), (Space::Y, Space::Z));
        assert_eq!(Space::Y.plane(), (Space::X, Space::Z));
        assert_eq!(Space::Z.plane(), (Space::X, Space::Y));
    }

    #[test]
    fn nifti_codes() {
        assert_eq!(NiftiType::data_type_of(2).unwrap(), DataType::Uint8);
        assert_eq!(NiftiType::data_type_of(64).unwrap(), DataType::Float64);
        assert_eq!(NiftiType::data_type_of(768).unwrap(), DataType::Uint32);
        for code in &[0, 1, 32, 128, 1024, 1280, 1536, 1792, 2048, 2304] {
            match NiftiType::data_type_of(*code) {
                Err(VolumeError::UnsupportedDatatype(msg)) => {
                    assert!(msg.starts_with(&code.to_string()), "{}", msg)
                }
                other => panic!("code {} gave {:?}", code, other),
            }
        }
    }

    #[test]
    fn minc_names() {
        assert_eq!(DataType::from_minc_name("SHORT"), Some(DataType::Int16));
        assert_eq!(DataType::from_minc_name("uint16"), Some(DataType::Uint16));
        assert_eq!(DataType::from_minc_name("DOUBLE"), Some(DataType::Float64));
        assert_eq!(DataType::from_minc_name("complex"), None);
    }
}
