//! Private utility module
use crate::error::Result;
use flate2::bufread::GzDecoder;
use std::borrow::Cow;
use std::io::Read;
use std::ops::{Add, Mul};
use std::path::Path;

/// The two leading bytes of every gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Convert a raw volume value to the scale defined
/// by the given scale slope and intercept parameters.
/// A slope of zero means that no scaling applies.
pub fn raw_to_value<V, T>(value: V, slope: T, intercept: T) -> T
where
    V: Into<T>,
    T: num_traits::Num,
    T: Mul<Output = T>,
    T: Add<Output = T>,
{
    if slope != T::zero() {
        value.into() * slope + intercept
    } else {
        value.into()
    }
}

/// Whether the file name carries the `.gz` extension.
pub fn is_gz_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// Whether the given bytes start with the gzip magic number.
pub fn is_gz_bytes(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[..2] == GZIP_MAGIC
}

/// Inflate a gzip stream.
pub fn inflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(bytes.len() * 4);
    let _ = GzDecoder::new(bytes).read_to_end(&mut out)?;
    log::debug!("inflated {} gzip bytes into {}", bytes.len(), out.len());
    Ok(out)
}

/// Inflate `bytes` if they hold a gzip stream, borrow them untouched otherwise.
pub fn inflate_if_gz(bytes: &[u8]) -> Result<Cow<'_, [u8]>> {
    if is_gz_bytes(bytes) {
        Ok(Cow::Owned(inflate(bytes)?))
    } else {
        Ok(Cow::Borrowed(bytes))
    }
}
