//! Interfaces and implementations specific to integration with `ndarray`.
//!
//! This module introduces the trait [`IntoNdArray`], implemented for
//! volumes and slices, which maps them into an [`Array`] of an arbitrary
//! element type. Values are cast from their double precision reading.
//!
//! #### Note on memory order
//!
//! A volume maps onto an array in storage order: the time axis comes
//! first if present, followed by `order[0]`, `order[1]` and `order[2]`.
//! A slice maps onto a `(height, width)` array, row 0 being the top row.
//!
//! [`IntoNdArray`]: ./trait.IntoNdArray.html
//! [`Array`]: ../../../ndarray/type.Array.html
use super::{Slice, VolumeData};
use ndarray::{Array, Dimension, Ix2, IxDyn};
use num_traits::AsPrimitive;

/// Trait for values which can be converted to an ndarray.
pub trait IntoNdArray {
    /// Dimensionality of the resulting array
    type Dim: Dimension;

    /// Consume the value into an ndarray of element type `T`.
    fn into_ndarray<T>(self) -> Array<T, Self::Dim>
    where
        T: Copy + 'static,
        f64: AsPrimitive<T>;
}

impl IntoNdArray for Slice {
    type Dim = Ix2;

    fn into_ndarray<T>(self) -> Array<T, Ix2>
    where
        T: Copy + 'static,
        f64: AsPrimitive<T>,
    {
        Array::from_shape_fn((self.height, self.width), |(row, col)| {
            AsPrimitive::<T>::as_(self.get_f64(col, row).unwrap_or(0.))
        })
    }
}

impl IntoNdArray for VolumeData {
    type Dim = IxDyn;

    fn into_ndarray<T>(self) -> Array<T, IxDyn>
    where
        T: Copy + 'static,
        f64: AsPrimitive<T>,
    {
        let header = self.header();
        let mut shape = Vec::with_capacity(4);
        if let Some(time) = header.time() {
            shape.push(time.space_length);
        }
        shape.extend(header.order().iter().map(|s| header.axis(*s).space_length));

        let mut strides = vec![1; shape.len()];
        for d in (0..shape.len().saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * shape[d + 1];
        }

        let data = self.data();
        Array::from_shape_fn(IxDyn(&shape), |idx| {
            let linear: usize = (0..strides.len()).map(|d| idx[d] * strides[d]).sum();
            AsPrimitive::<T>::as_(data.get_f64(linear).unwrap_or(0.))
        })
    }
}
