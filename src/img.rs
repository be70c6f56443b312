//! Whole-image operations on [`imgref`] types.
//!
//! Inputs may be strided [`ImgRef`]s; results are tightly packed
//! [`ImgVec`]s. Each function wraps the plane operation of the same name.
//!
//! ```rust
//! use imgref::ImgVec;
//! use pixmill::{FilterMode, img};
//!
//! let src = ImgVec::new(vec![7u8; 64 * 48], 64, 48);
//! let small = img::scale(src.as_ref(), 32, 24, FilterMode::Box).unwrap();
//! assert_eq!((small.width(), small.height()), (32, 24));
//! assert!(small.buf().iter().all(|&p| p == 7));
//!
//! let turned = img::rotate_90(small.as_ref()).unwrap();
//! assert_eq!((turned.width(), turned.height()), (24, 32));
//! ```

use alloc::vec;

use imgref::{ImgRef, ImgVec};
use rgb::Bgra;

use crate::{FilterMode, Plane, PlaneMut, SizeError, YuvConstants};

fn plane<'a>(img: ImgRef<'a, u8>) -> Result<Plane<'a, u8>, SizeError> {
    let stride = isize::try_from(img.stride()).map_err(|_| SizeError::InvalidStride)?;
    Plane::new(img.into_buf(), img.width(), img.height(), stride)
}

fn with_output(
    width: usize,
    height: usize,
    op: impl FnOnce(PlaneMut<'_, u8>) -> Result<(), SizeError>,
) -> Result<ImgVec<u8>, SizeError> {
    let mut buf = vec![0u8; crate::error::elems(width, height)?];
    op(PlaneMut::packed(&mut buf, width, height)?)?;
    Ok(ImgVec::new(buf, width, height))
}

// ---------------------------------------------------------------------------
// Transpose and rotate
// ---------------------------------------------------------------------------

/// Swap rows and columns.
pub fn transpose(img: ImgRef<'_, u8>) -> Result<ImgVec<u8>, SizeError> {
    let src = plane(img)?;
    with_output(img.height(), img.width(), |dst| crate::transpose_plane(src, dst))
}

/// Rotate clockwise.
pub fn rotate_90(img: ImgRef<'_, u8>) -> Result<ImgVec<u8>, SizeError> {
    let src = plane(img)?;
    with_output(img.height(), img.width(), |dst| crate::rotate_plane_90(src, dst))
}

/// Rotate half a turn.
pub fn rotate_180(img: ImgRef<'_, u8>) -> Result<ImgVec<u8>, SizeError> {
    let src = plane(img)?;
    with_output(img.width(), img.height(), |dst| crate::rotate_plane_180(src, dst))
}

/// Rotate counter-clockwise.
pub fn rotate_270(img: ImgRef<'_, u8>) -> Result<ImgVec<u8>, SizeError> {
    let src = plane(img)?;
    with_output(img.height(), img.width(), |dst| crate::rotate_plane_270(src, dst))
}

// ---------------------------------------------------------------------------
// Scale
// ---------------------------------------------------------------------------

/// Resample to `width × height` with `filter`.
pub fn scale(
    img: ImgRef<'_, u8>,
    width: usize,
    height: usize,
    filter: FilterMode,
) -> Result<ImgVec<u8>, SizeError> {
    let src = plane(img)?;
    with_output(width, height, |dst| crate::scale_plane(src, dst, filter))
}

// ---------------------------------------------------------------------------
// YUV → BGRA
// ---------------------------------------------------------------------------

/// Three I422 planes → one `Bgra<u8>` image the size of `y`.
///
/// `u` and `v` are `y.width().div_ceil(2)` wide and as tall as `y`.
pub fn i422_to_bgra(
    y: ImgRef<'_, u8>,
    u: ImgRef<'_, u8>,
    v: ImgRef<'_, u8>,
    c: &YuvConstants,
) -> Result<ImgVec<Bgra<u8>>, SizeError> {
    let (w, h) = (y.width(), y.height());
    let mut buf = vec![Bgra::default(); crate::error::elems(w, h)?];
    let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut buf);
    let dst = PlaneMut::packed(bytes, crate::error::elems(w, 4)?, h)?;
    crate::i422_to_argb_plane(plane(y)?, plane(u)?, plane(v)?, dst, c)?;
    Ok(ImgVec::new(buf, w, h))
}

// ---------------------------------------------------------------------------
// Compare
// ---------------------------------------------------------------------------

/// Sum of squared error between two images of equal size.
pub fn sum_square_error(a: ImgRef<'_, u8>, b: ImgRef<'_, u8>) -> Result<u64, SizeError> {
    crate::plane_sum_square_error(plane(a)?, plane(b)?)
}

/// PSNR between two images of equal size.
#[cfg(feature = "std")]
pub fn psnr(a: ImgRef<'_, u8>, b: ImgRef<'_, u8>) -> Result<f64, SizeError> {
    crate::plane_psnr(plane(a)?, plane(b)?)
}
