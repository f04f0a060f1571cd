//! Reading of MINC volumes, served as a JSON header plus a raw sample
//! payload.
//!
//! The header already follows the axis layout of [`RawHeader`], with its
//! numeric fields possibly encoded as strings. The payload is a flat buffer
//! in the header's storage order, little endian unless told otherwise.
//!
//! [`RawHeader`]: ../header/struct.RawHeader.html

use crate::error::{Result, VolumeError};
use crate::header::{HeaderModel, RawHeader};
use crate::options::ReaderOptions;
use crate::util::inflate_if_gz;
use crate::volume::{Samples, VolumeData};

/// Parse a MINC JSON header.
///
/// # Errors
///
/// - `VolumeError::Json` if the text is not a JSON object of the
///   expected shape.
pub fn read_header(text: &str) -> Result<RawHeader> {
    Ok(serde_json::from_str(text)?)
}

/// Build a volume out of a MINC JSON header and its raw sample payload.
///
/// A gzip compressed payload is inflated first.
///
/// # Example
///
/// ```
/// use neurovol::{minc, ReaderOptions, Space};
/// # use neurovol::Result;
///
/// # fn run() -> Result<()> {
/// let header = r#"{
///     "order": ["zspace", "yspace", "xspace"],
///     "xspace": {"space_length": "2", "start": "0", "step": "1"},
///     "yspace": {"space_length": "2", "start": "0", "step": "1"},
///     "zspace": {"space_length": "1", "start": "0", "step": "1"},
///     "datatype": "SHORT"
/// }"#;
/// let raw = [1, 0, 2, 0, 3, 0, 4, 0];
/// let volume = minc::read_volume(header, &raw, &ReaderOptions::default())?;
/// assert_eq!(volume.get_volume_data_intensity_value(1, 1, 0), Some(4.));
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
///
/// # Errors
///
/// - any error of [`read_header`] and [`HeaderModel::normalize`]
/// - `VolumeError::DataLength` if the payload does not hold exactly one
///   sample per voxel
///
/// [`read_header`]: fn.read_header.html
/// [`HeaderModel::normalize`]: ../header/struct.HeaderModel.html#method.normalize
pub fn read_volume(header_text: &str, raw: &[u8], options: &ReaderOptions) -> Result<VolumeData> {
    let header = HeaderModel::normalize(read_header(header_text)?)?;
    let datatype = header.minc_data_type();
    let raw = inflate_if_gz(raw)?;

    let expected = header.byte_len(datatype)?;
    if raw.len() != expected {
        return Err(VolumeError::DataLength(expected, raw.len()));
    }
    log::debug!(
        "reading {} MINC voxels as {:?} ({:?})",
        header.element_count(),
        datatype,
        options.minc_byte_order()
    );
    let samples = Samples::from_bytes(datatype, &raw, options.minc_byte_order())?;
    VolumeData::new(header, samples)
}
