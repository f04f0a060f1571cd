//! Volumetric neuro-imaging data model.
//!
//! This crate turns MINC (JSON header plus raw payload) and NIfTI-1 volumes
//! into one format independent description: a normalized [`HeaderModel`]
//! with the strides, slice planes and world origin of the voxel grid, and
//! a [`VolumeData`] owning the samples. On top of it sit the voxel to world
//! transforms of the [`affine`] module and the extraction of 2D slices
//! along any of the three spatial axes, always laid out in display
//! orientation whatever the sign of each axis' step.
//!
//! # Example
//!
//! ```no_run
//! use neurovol::{nifti, ReaderOptions, Space};
//! # use neurovol::Result;
//!
//! # fn run() -> Result<()> {
//! let mut volume = nifti::read_volume_file("brain.nii.gz", &ReaderOptions::new())?;
//! volume.set_world_coords(0., -18., 12.);
//! let axial = volume.slice(Space::Z, None, None);
//! println!("{:?}", axial.map(|s| (s.width, s.height)));
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `ndarray_volumes` (default): conversion of volumes and slices into
//!   `ndarray` arrays, see [`volume::ndarray`].
//! - `nalgebra_affine`: the voxel to world transform as a `nalgebra` matrix.
//!
//! [`HeaderModel`]: header/struct.HeaderModel.html
//! [`VolumeData`]: volume/struct.VolumeData.html
//! [`affine`]: affine/index.html
//! [`volume::ndarray`]: volume/ndarray/index.html
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

pub mod affine;
pub mod error;
pub mod header;
pub mod minc;
pub mod nifti;
pub mod options;
pub mod typedef;
mod util;
pub mod volume;

pub use crate::affine::{VoxelCoords, WorldCoords};
pub use crate::error::{Result, VolumeError};
pub use crate::header::{AxisDescriptor, HeaderModel, RawAxis, RawHeader, SlicePlane};
pub use crate::nifti::NiftiHeader;
pub use crate::options::ReaderOptions;
pub use crate::typedef::{AxisName, DataType, NiftiType, Space};
pub use crate::volume::{Sample, Samples, Slice, SliceCache, VolumeData};
pub use byteordered::Endianness;
