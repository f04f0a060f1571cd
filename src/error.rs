//! Types for error handling go here.
use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum VolumeError {
        /// The header bytes or text are not in a recognized layout.
        FormatParse(reason: String) {
            display("Invalid volume header: {}", reason)
        }
        /// The header text is not JSON, or not of the expected shape.
        Json(err: serde_json::Error) {
            from()
            source(err)
            display("Malformed JSON header: {}", err)
        }
        /// A required header field is missing or could not be read as a number.
        HeaderParse(field: String, reason: String) {
            display("Bad header field `{}`: {}", field, reason)
        }
        /// Only 3D and 4D volumes are supported.
        UnsupportedDimensionality(dims: u16) {
            display("Cannot handle {}-dimensional images", dims)
        }
        /// The voxel data type has no numeric buffer counterpart.
        UnsupportedDatatype(datatype: String) {
            display("Unsupported data type: {}", datatype)
        }
        /// The NIfTI-1 magic code at offset 344 is not `n+1\0`.
        BadMagicNumber(magic: [u8; 4]) {
            display("Bad magic number: {:?}", String::from_utf8_lossy(magic))
        }
        /// The raw voxel buffer does not match the size declared by the header.
        DataLength(expected: usize, got: usize) {
            display("Expected {} bytes of voxel data, got {}", expected, got)
        }
        /// Attempted to write outside the volume's boundaries.
        OutOfBounds(coords: Vec<i64>) {
            display("Out of bounds access to volume: {:?}", coords)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
    }
}

impl VolumeError {
    pub(crate) fn header_parse<F, R>(field: F, reason: R) -> Self
    where
        F: Into<String>,
        R: Into<String>,
    {
        VolumeError::HeaderParse(field.into(), reason.into())
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, VolumeError>;
