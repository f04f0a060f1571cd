//! Options shared by the volume readers.

use byteordered::Endianness;

/// Knobs for turning raw files into volumes.
///
/// ```
/// use neurovol::{Endianness, ReaderOptions};
///
/// let options = ReaderOptions::new()
///     .apply_scaling(false)
///     .minc_endianness(Endianness::Big);
/// assert!(!options.scaling());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    apply_scaling: bool,
    minc_endianness: Endianness,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            apply_scaling: true,
            minc_endianness: Endianness::Little,
        }
    }
}

impl ReaderOptions {
    /// Default options: scaling on, little endian MINC payloads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether to rescale NIfTI samples with `scl_slope` and `scl_inter`.
    pub fn apply_scaling(mut self, apply: bool) -> Self {
        self.apply_scaling = apply;
        self
    }

    /// Byte order of the raw MINC sample payload.
    pub fn minc_endianness(mut self, endianness: Endianness) -> Self {
        self.minc_endianness = endianness;
        self
    }

    /// Whether NIfTI intensity scaling is applied.
    pub fn scaling(&self) -> bool {
        self.apply_scaling
    }

    /// Byte order assumed for MINC payloads.
    pub fn minc_byte_order(&self) -> Endianness {
        self.minc_endianness
    }
}
