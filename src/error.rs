use core::fmt;

/// Buffer geometry rejected at an API boundary.
///
/// Kernels themselves never fail. Every public entry point checks its
/// buffers once up front and returns one of these before touching a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SizeError {
    /// A buffer holds fewer elements than the requested width or plane needs.
    BufferTooSmall { needed: usize, actual: usize },
    /// `|stride|` is smaller than the row width, or the row math overflowed.
    InvalidStride,
    /// Two planes that must share dimensions (or transposed dimensions) don't.
    DimensionMismatch,
    /// A width or ratio the kernel cannot express: 3/4 and 3/8 rows need a
    /// multiple of 3 outputs and 16.16 positions must fit `i32`. Also a
    /// squared-error block longer than a `u32` total can hold.
    UnsupportedGeometry,
}

impl fmt::Display for SizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { needed, actual } => {
                write!(f, "buffer too small: need {needed} elements, got {actual}")
            }
            Self::InvalidStride => f.write_str("stride is smaller than the row width"),
            Self::DimensionMismatch => f.write_str("plane dimensions do not match"),
            Self::UnsupportedGeometry => f.write_str("geometry not supported by this kernel"),
        }
    }
}

impl core::error::Error for SizeError {}

/// `Ok(())` if `actual >= needed`.
#[inline]
pub(crate) fn check_len(actual: usize, needed: usize) -> Result<(), SizeError> {
    if actual < needed {
        Err(SizeError::BufferTooSmall { needed, actual })
    } else {
        Ok(())
    }
}

/// `count * per` elements, or [`SizeError::InvalidStride`] on overflow.
#[inline]
pub(crate) fn elems(count: usize, per: usize) -> Result<usize, SizeError> {
    count.checked_mul(per).ok_or(SizeError::InvalidStride)
}
