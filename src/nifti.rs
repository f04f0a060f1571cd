//! Reading of single file NIfTI-1 volumes (`.nii`, `.nii.gz`).
//!
//! Only the header fields which describe the voxel grid are decoded. The
//! voxel to world transform of the file (sform, qform, or plain voxel
//! sizes) is decomposed into per axis steps, direction cosines and starts,
//! so that the volume ends up described exactly like a MINC volume.

use crate::affine::{quaternion_to_mat44, transform_to_axes, Mat44};
use crate::error::{Result, VolumeError};
use crate::header::{HeaderModel, RawAxis, RawHeader};
use crate::options::ReaderOptions;
use crate::typedef::{DataType, NiftiType, Space};
use crate::util::{inflate, inflate_if_gz, is_gz_bytes, is_gz_file};
use crate::volume::{Samples, VolumeData};
use byteordered::{ByteOrdered, Endianness};
use std::borrow::Cow;
use std::path::Path;

/// Size of a NIfTI-1 header, in bytes.
pub const HEADER_SIZE: usize = 348;

/// Smallest offset of the voxel data in a single file NIfTI-1 volume.
pub const MIN_DATA_OFFSET: usize = 352;

/// Magic code of single file NIfTI-1 volumes.
pub const MAGIC_CODE_NIP1: &[u8; 4] = b"n+1\0";

/// The voxel grid fields of a NIfTI-1 header.
#[derive(Debug, Clone, PartialEq)]
pub struct NiftiHeader {
    /// Header size, must be 348
    pub sizeof_hdr: i32,
    /// Data array dimensions
    pub dim: [u16; 8],
    /// Defines data type
    pub datatype: i16,
    /// Number bits/voxel
    pub bitpix: i16,
    /// Grid spacings
    pub pixdim: [f32; 8],
    /// Offset into .nii file
    pub vox_offset: f32,
    /// Data scaling: slope
    pub scl_slope: f32,
    /// Data scaling: offset
    pub scl_inter: f32,
    /// NIFTIXFORM code
    pub qform_code: i16,
    /// NIFTIXFORM code
    pub sform_code: i16,
    /// Quaternion b param
    pub quatern_b: f32,
    /// Quaternion c param
    pub quatern_c: f32,
    /// Quaternion d param
    pub quatern_d: f32,
    /// Quaternion x shift
    pub quatern_x: f32,
    /// Quaternion y shift
    pub quatern_y: f32,
    /// Quaternion z shift
    pub quatern_z: f32,
    /// 1st row affine transform
    pub srow_x: [f32; 4],
    /// 2nd row affine transform
    pub srow_y: [f32; 4],
    /// 3rd row affine transform
    pub srow_z: [f32; 4],
    /// Magic code. Must be `b"n+1\0"`
    pub magic: [u8; 4],
    /// Byte order of the header and of the voxel data
    pub endianness: Endianness,
}

impl Default for NiftiHeader {
    fn default() -> NiftiHeader {
        NiftiHeader {
            sizeof_hdr: HEADER_SIZE as i32,
            dim: [3, 1, 1, 1, 0, 0, 0, 0],
            datatype: NiftiType::Uint8 as i16,
            bitpix: 8,
            pixdim: [1.; 8],
            vox_offset: MIN_DATA_OFFSET as f32,
            scl_slope: 0.,
            scl_inter: 0.,
            qform_code: 0,
            sform_code: 0,
            quatern_b: 0.,
            quatern_c: 0.,
            quatern_d: 0.,
            quatern_x: 0.,
            quatern_y: 0.,
            quatern_z: 0.,
            srow_x: [1., 0., 0., 0.],
            srow_y: [0., 1., 0., 0.],
            srow_z: [0., 0., 1., 0.],
            magic: *MAGIC_CODE_NIP1,
            endianness: Endianness::Little,
        }
    }
}

impl NiftiHeader {
    /// Decode a header from the leading bytes of a NIfTI-1 file.
    ///
    /// # Errors
    ///
    /// - `VolumeError::FormatParse` if there are fewer than 348 bytes or
    ///   `sizeof_hdr` is not 348 in either byte order.
    /// - `VolumeError::BadMagicNumber` if the file is not a single file
    ///   NIfTI-1 volume.
    /// - `VolumeError::UnsupportedDimensionality` unless `dim[0]` is 3 or 4.
    pub fn from_bytes(bytes: &[u8]) -> Result<NiftiHeader> {
        if bytes.len() < HEADER_SIZE {
            return Err(VolumeError::FormatParse(format!(
                "expected at least {} header bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let endianness = match &bytes[..4] {
            [0x5c, 0x01, 0x00, 0x00] => Endianness::Little,
            [0x00, 0x00, 0x01, 0x5c] => Endianness::Big,
            other => {
                return Err(VolumeError::FormatParse(format!(
                    "bad sizeof_hdr {:02x?}",
                    other
                )))
            }
        };
        log::debug!("NIfTI header is {:?} endian", endianness);

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[344..HEADER_SIZE]);
        if &magic != MAGIC_CODE_NIP1 {
            return Err(VolumeError::BadMagicNumber(magic));
        }

        let mut h = NiftiHeader {
            magic,
            endianness,
            ..NiftiHeader::default()
        };

        let mut input = ByteOrdered::runtime(&bytes[40..], endianness);
        for v in &mut h.dim {
            *v = input.read_u16()?;
        }
        if h.dim[0] != 3 && h.dim[0] != 4 {
            return Err(VolumeError::UnsupportedDimensionality(h.dim[0]));
        }

        let mut input = ByteOrdered::runtime(&bytes[70..], endianness);
        h.datatype = input.read_i16()?;
        h.bitpix = input.read_i16()?;
        let _slice_start = input.read_i16()?;
        for v in &mut h.pixdim {
            *v = input.read_f32()?;
        }
        h.vox_offset = input.read_f32()?;
        h.scl_slope = input.read_f32()?;
        h.scl_inter = input.read_f32()?;

        let mut input = ByteOrdered::runtime(&bytes[252..], endianness);
        h.qform_code = input.read_i16()?;
        h.sform_code = input.read_i16()?;
        h.quatern_b = input.read_f32()?;
        h.quatern_c = input.read_f32()?;
        h.quatern_d = input.read_f32()?;
        h.quatern_x = input.read_f32()?;
        h.quatern_y = input.read_f32()?;
        h.quatern_z = input.read_f32()?;
        for v in &mut h.srow_x {
            *v = input.read_f32()?;
        }
        for v in &mut h.srow_y {
            *v = input.read_f32()?;
        }
        for v in &mut h.srow_z {
            *v = input.read_f32()?;
        }

        Ok(h)
    }

    /// Retrieve the sample type of the voxels.
    pub fn data_type(&self) -> Result<DataType> {
        NiftiType::data_type_of(self.datatype)
    }

    /// Offset of the voxel data, never less than 352.
    pub fn data_offset(&self) -> usize {
        let offset = self.vox_offset.max(0.) as usize;
        if offset < MIN_DATA_OFFSET {
            log::warn!("vox_offset {} is below {}", self.vox_offset, MIN_DATA_OFFSET);
            MIN_DATA_OFFSET
        } else {
            offset
        }
    }

    /// The voxel to world transform in file axis order: the sform if
    /// present, the qform otherwise, or just the voxel sizes.
    pub fn transform(&self) -> Mat44 {
        if self.sform_code > 0 {
            log::debug!("using sform (code {})", self.sform_code);
            let row = |r: &[f32; 4]| [r[0] as f64, r[1] as f64, r[2] as f64, r[3] as f64];
            [
                row(&self.srow_x),
                row(&self.srow_y),
                row(&self.srow_z),
                [0., 0., 0., 1.],
            ]
        } else if self.qform_code > 0 {
            log::debug!("using qform (code {})", self.qform_code);
            let qfac = if self.pixdim[0] < 0. { -1. } else { 1. };
            quaternion_to_mat44(
                self.quatern_b as f64,
                self.quatern_c as f64,
                self.quatern_d as f64,
                self.quatern_x as f64,
                self.quatern_y as f64,
                self.quatern_z as f64,
                self.pixdim[1] as f64,
                self.pixdim[2] as f64,
                self.pixdim[3] as f64,
                qfac,
            )
        } else {
            log::debug!("no spatial transform, using voxel sizes");
            let p = |i: usize| self.pixdim[i] as f64;
            [
                [p(1), 0., 0., 0.],
                [0., p(2), 0., 0.],
                [0., 0., p(3), 0.],
                [0., 0., 0., 1.],
            ]
        }
    }

    /// Describe the volume with the axis model shared by all formats.
    ///
    /// # Errors
    ///
    /// - `VolumeError::UnsupportedDatatype` if the voxel type is not supported.
    pub fn raw_header(&self) -> Result<RawHeader> {
        let datatype = self.data_type()?;
        let transform = self.transform();
        let order = storage_order(&transform).unwrap_or_else(|| {
            log::warn!("degenerate transform, assuming zspace, yspace, xspace storage order");
            [Space::Z, Space::Y, Space::X]
        });

        // file column c runs along order[2 - c]
        let column_of = |s: Space| 2 - order.iter().position(|o| *o == s).unwrap_or(0);
        let mut world = [[0.; 4]; 4];
        for s in Space::ALL.iter() {
            let c = column_of(*s);
            for (r, row) in world.iter_mut().enumerate() {
                row[s.index()] = transform[r][c];
            }
        }
        for (r, row) in world.iter_mut().enumerate() {
            row[3] = transform[r][3];
        }
        let geometry = transform_to_axes(&world);

        let axis = |s: Space| {
            let i = s.index();
            RawAxis::new(
                self.dim[column_of(s) + 1] as usize,
                geometry.starts[i],
                geometry.steps[i],
            )
            .with_cosines(geometry.cosines[i])
        };

        let mut names: Vec<String> = order.iter().map(|s| s.name().to_string()).collect();
        let time = if self.dim[0] == 4 {
            names.insert(0, "time".to_string());
            Some(RawAxis::new(self.dim[4] as usize, 0., self.pixdim[4] as f64))
        } else {
            None
        };

        Ok(RawHeader {
            order: Some(names),
            xspace: Some(axis(Space::X)),
            yspace: Some(axis(Space::Y)),
            zspace: Some(axis(Space::Z)),
            time,
            datatype: Some(datatype.name().to_string()),
        })
    }
}

/// Storage order implied by a transform: the world axis which dominates
/// file column `c` is stored at `order[2 - c]`. Returns `None` if the
/// columns do not name every axis once.
fn storage_order(transform: &Mat44) -> Option<[Space; 3]> {
    let mut order = [Space::Z, Space::Y, Space::X];
    for c in 0..3 {
        let column = [transform[0][c], transform[1][c], transform[2][c]];
        let mut dominant = 0;
        for r in 1..3 {
            if column[r].abs() > column[dominant].abs() {
                dominant = r;
            }
        }
        if column[dominant] == 0. {
            return None;
        }
        order[2 - c] = Space::ALL[dominant];
    }
    if order[0] == order[1] || order[1] == order[2] || order[0] == order[2] {
        return None;
    }
    Some(order)
}

/// Read a whole NIfTI-1 volume from memory. Gzip compressed input is
/// inflated first.
///
/// # Errors
///
/// - any error of [`NiftiHeader::from_bytes`] and [`HeaderModel::normalize`]
/// - `VolumeError::UnsupportedDatatype` for unsupported voxel types
/// - `VolumeError::DataLength` if the file ends before the last voxel
///
/// [`NiftiHeader::from_bytes`]: struct.NiftiHeader.html#method.from_bytes
/// [`HeaderModel::normalize`]: ../header/struct.HeaderModel.html#method.normalize
pub fn read_volume(bytes: &[u8], options: &ReaderOptions) -> Result<VolumeData> {
    let bytes = inflate_if_gz(bytes)?;
    read_plain_volume(&bytes, options)
}

/// Read a whole NIfTI-1 volume from a file. A `.gz` file name or gzip
/// content both mean that the file is inflated first.
pub fn read_volume_file<P: AsRef<Path>>(path: P, options: &ReaderOptions) -> Result<VolumeData> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    let bytes = if is_gz_file(path) || is_gz_bytes(&bytes) {
        Cow::Owned(inflate(&bytes)?)
    } else {
        Cow::Borrowed(&bytes[..])
    };
    read_plain_volume(&bytes, options)
}

fn read_plain_volume(bytes: &[u8], options: &ReaderOptions) -> Result<VolumeData> {
    let header = NiftiHeader::from_bytes(bytes)?;
    let model = HeaderModel::normalize(header.raw_header()?)?;
    let datatype = header.data_type()?;

    let offset = header.data_offset();
    let len = model.byte_len(datatype)?;
    let available = bytes.len().saturating_sub(offset);
    if available < len {
        return Err(VolumeError::DataLength(len, available));
    }
    log::debug!(
        "reading {} NIfTI voxels of {:?} at offset {}",
        model.element_count(),
        datatype,
        offset
    );

    let mut samples = Samples::from_bytes(datatype, &bytes[offset..offset + len], header.endianness)?;
    if options.scaling() && header.scl_slope != 0. {
        samples = samples.scaled(header.scl_slope, header.scl_inter);
    }
    VolumeData::new(model, samples)
}
