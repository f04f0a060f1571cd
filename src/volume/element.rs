//! This module defines the sample element API: the primitive numeric types
//! a volume buffer may hold, and the `Samples` container which owns one
//! such buffer regardless of its element type.
use crate::error::{Result, VolumeError};
use crate::typedef::DataType;
use byteordered::Endianness;
use bytemuck::Pod;
use num_traits::cast::AsPrimitive;

/// Trait type for characterizing a sample element, implemented for the
/// primitive numeric types a volume may be stored in.
pub trait Sample:
    'static + Pod + Default + PartialOrd + AsPrimitive<f32> + AsPrimitive<f64>
{
    /// The data type mapped to this element
    const DATA_TYPE: DataType;

    /// Reverse the byte order of the element.
    fn swap_bytes(self) -> Self;

    /// Wrap a buffer of this element into a `Samples` value.
    fn wrap(data: Vec<Self>) -> Samples;

    /// Decode a whole buffer of raw bytes stored with the given byte order.
    ///
    /// The byte count must be a multiple of the element size.
    fn from_raw_vec(bytes: &[u8], endianness: Endianness) -> Vec<Self> {
        let mut v: Vec<Self> = bytemuck::pod_collect_to_vec(bytes);
        if endianness != Endianness::native() && std::mem::size_of::<Self>() > 1 {
            for x in v.iter_mut() {
                *x = x.swap_bytes();
            }
        }
        v
    }
}

macro_rules! impl_sample_int {
    ($t: ty, $dt: ident) => {
        impl Sample for $t {
            const DATA_TYPE: DataType = DataType::$dt;
            fn swap_bytes(self) -> Self {
                <$t>::swap_bytes(self)
            }
            fn wrap(data: Vec<Self>) -> Samples {
                Samples::$dt(data)
            }
        }

        impl From<Vec<$t>> for Samples {
            fn from(data: Vec<$t>) -> Samples {
                Samples::$dt(data)
            }
        }
    };
}

macro_rules! impl_sample_float {
    ($t: ty, $dt: ident) => {
        impl Sample for $t {
            const DATA_TYPE: DataType = DataType::$dt;
            fn swap_bytes(self) -> Self {
                <$t>::from_bits(self.to_bits().swap_bytes())
            }
            fn wrap(data: Vec<Self>) -> Samples {
                Samples::$dt(data)
            }
        }

        impl From<Vec<$t>> for Samples {
            fn from(data: Vec<$t>) -> Samples {
                Samples::$dt(data)
            }
        }
    };
}

impl_sample_int!(u8, Uint8);
impl_sample_int!(i8, Int8);
impl_sample_int!(u16, Uint16);
impl_sample_int!(i16, Int16);
impl_sample_int!(u32, Uint32);
impl_sample_int!(i32, Int32);
impl_sample_float!(f32, Float32);
impl_sample_float!(f64, Float64);

/// A contiguous buffer of samples of one numeric type.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    #[allow(missing_docs)]
    Uint8(Vec<u8>),
    #[allow(missing_docs)]
    Int8(Vec<i8>),
    #[allow(missing_docs)]
    Uint16(Vec<u16>),
    #[allow(missing_docs)]
    Int16(Vec<i16>),
    #[allow(missing_docs)]
    Uint32(Vec<u32>),
    #[allow(missing_docs)]
    Int32(Vec<i32>),
    #[allow(missing_docs)]
    Float32(Vec<f32>),
    #[allow(missing_docs)]
    Float64(Vec<f64>),
}

/// Run `$body` with `$v` bound to the inner vector of a `Samples` value.
macro_rules! with_samples {
    ($samples: expr, $v: ident => $body: expr) => {
        match $samples {
            Samples::Uint8($v) => $body,
            Samples::Int8($v) => $body,
            Samples::Uint16($v) => $body,
            Samples::Int16($v) => $body,
            Samples::Uint32($v) => $body,
            Samples::Int32($v) => $body,
            Samples::Float32($v) => $body,
            Samples::Float64($v) => $body,
        }
    };
}

pub(crate) use with_samples;

impl Samples {
    /// Decode raw bytes into a buffer of the given data type.
    ///
    /// # Errors
    ///
    /// - `VolumeError::DataLength` if the byte count is not a multiple of
    ///   the element size.
    pub fn from_bytes(datatype: DataType, bytes: &[u8], endianness: Endianness) -> Result<Self> {
        let size = datatype.size_of();
        if bytes.len() % size != 0 {
            let expected = (bytes.len() / size + 1) * size;
            return Err(VolumeError::DataLength(expected, bytes.len()));
        }
        let samples = match datatype {
            DataType::Uint8 => Samples::Uint8(bytes.to_vec()),
            DataType::Int8 => i8::wrap(i8::from_raw_vec(bytes, endianness)),
            DataType::Uint16 => u16::wrap(u16::from_raw_vec(bytes, endianness)),
            DataType::Int16 => i16::wrap(i16::from_raw_vec(bytes, endianness)),
            DataType::Uint32 => u32::wrap(u32::from_raw_vec(bytes, endianness)),
            DataType::Int32 => i32::wrap(i32::from_raw_vec(bytes, endianness)),
            DataType::Float32 => f32::wrap(f32::from_raw_vec(bytes, endianness)),
            DataType::Float64 => f64::wrap(f64::from_raw_vec(bytes, endianness)),
        };
        Ok(samples)
    }

    /// The data type of the held samples.
    pub fn data_type(&self) -> DataType {
        match self {
            Samples::Uint8(_) => DataType::Uint8,
            Samples::Int8(_) => DataType::Int8,
            Samples::Uint16(_) => DataType::Uint16,
            Samples::Int16(_) => DataType::Int16,
            Samples::Uint32(_) => DataType::Uint32,
            Samples::Int32(_) => DataType::Int32,
            Samples::Float32(_) => DataType::Float32,
            Samples::Float64(_) => DataType::Float64,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        with_samples!(self, v => v.len())
    }

    /// Whether there are no samples at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a sample as a double precision value.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        with_samples!(self, v => v.get(index).map(|x| AsPrimitive::<f64>::as_(*x)))
    }

    /// Overwrite a sample, casting the value into the buffer's type.
    /// Returns false if the index is out of range.
    pub fn set_f64(&mut self, index: usize, value: f64) -> bool {
        fn set<T: Sample>(v: &mut [T], index: usize, value: f64) -> bool
        where
            f64: AsPrimitive<T>,
        {
            match v.get_mut(index) {
                Some(x) => {
                    *x = AsPrimitive::<T>::as_(value);
                    true
                }
                None => false,
            }
        }
        with_samples!(self, v => set(v, index, value))
    }

    /// Minimum and maximum sample, in a single pass.
    /// Returns `None` for an empty buffer.
    pub fn range(&self) -> Option<(f64, f64)> {
        fn scan<T: Sample>(v: &[T]) -> Option<(f64, f64)> {
            let (first, rest) = v.split_first()?;
            let (mut min, mut max) = (*first, *first);
            for x in rest {
                if *x < min {
                    min = *x;
                }
                if *x > max {
                    max = *x;
                }
            }
            Some((AsPrimitive::<f64>::as_(min), AsPrimitive::<f64>::as_(max)))
        }
        with_samples!(self, v => scan(v))
    }

    /// Rescale every sample as `value * slope + intercept` into a
    /// single precision buffer. A zero slope leaves the buffer untouched.
    pub fn scaled(self, slope: f32, intercept: f32) -> Samples {
        if slope == 0. {
            return self;
        }
        with_samples!(self, v => Samples::Float32(
            v.into_iter()
                .map(|x| crate::util::raw_to_value(AsPrimitive::<f32>::as_(x), slope, intercept))
                .collect()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_little_and_big() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        let le = Samples::from_bytes(DataType::Uint16, &bytes, Endianness::Little).unwrap();
        assert_eq!(le, Samples::Uint16(vec![0x0201, 0x0403]));
        let be = Samples::from_bytes(DataType::Uint16, &bytes, Endianness::Big).unwrap();
        assert_eq!(be, Samples::Uint16(vec![0x0102, 0x0304]));
    }

    #[test]
    fn decode_float_big() {
        let bytes = 1.5f32.to_be_bytes();
        let s = Samples::from_bytes(DataType::Float32, &bytes, Endianness::Big).unwrap();
        assert_eq!(s, Samples::Float32(vec![1.5]));
    }

    #[test]
    fn decode_bad_length() {
        let bytes = [0u8; 5];
        assert!(Samples::from_bytes(DataType::Int32, &bytes, Endianness::Little).is_err());
    }

    #[test]
    fn range_and_access() {
        let mut s = Samples::Int16(vec![3, -7, 12, 0]);
        assert_eq!(s.range(), Some((-7., 12.)));
        assert_eq!(s.get_f64(2), Some(12.));
        assert_eq!(s.get_f64(4), None);
        assert!(s.set_f64(1, 100.));
        assert!(!s.set_f64(9, 1.));
        assert_eq!(s.range(), Some((0., 100.)));
        assert_eq!(Samples::Float64(vec![]).range(), None);
    }

    #[test]
    fn scaling() {
        let s = Samples::Uint8(vec![0, 10, 255]).scaled(2., -1.);
        assert_eq!(s, Samples::Float32(vec![-1., 19., 509.]));
        let s = Samples::Uint8(vec![0, 10]).scaled(0., 5.);
        assert_eq!(s, Samples::Uint8(vec![0, 10]));
    }
}
