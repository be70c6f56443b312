//! Conversions on [`rgb`] crate pixel types via bytemuck.
//!
//! The byte-order names used by the row kernels map onto `rgb` types as
//! follows: ARGB is [`Bgra<u8>`], ABGR is [`Rgba<u8>`], RGB24 is
//! [`Bgr<u8>`], RAW is [`Rgb<u8>`], AR64 is [`Bgra<u16>`] and AB64 is
//! [`Rgba<u16>`]. Width is the source slice length; the destination must
//! hold at least that many pixels.
//!
//! ```rust
//! use rgb::{Bgra, Rgb};
//! use pixmill::typed;
//!
//! let src = vec![Rgb::new(255u8, 0, 128); 10];
//! let mut dst = vec![Bgra::default(); 10];
//! typed::rgb_to_bgra(&src, &mut dst).unwrap();
//! assert_eq!(dst[0], Bgra { b: 128, g: 0, r: 255, a: 255 });
//! ```

use crate::{SizeError, YuvConstants};
use rgb::{Bgr, Bgra, Rgb, Rgba};

// ---------------------------------------------------------------------------
// YUV 4:2:2 → typed pixels
// ---------------------------------------------------------------------------

/// I422 → `Bgra<u8>` with alpha 255. `u` and `v` hold
/// `y.len().div_ceil(2)` samples.
pub fn i422_to_bgra(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [Bgra<u8>],
    c: &YuvConstants,
) -> Result<(), SizeError> {
    crate::i422_to_argb(y, u, v, bytemuck::cast_slice_mut(dst), y.len(), c)
}

/// I422 → `Rgba<u8>` with alpha 255.
pub fn i422_to_rgba(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [Rgba<u8>],
    c: &YuvConstants,
) -> Result<(), SizeError> {
    crate::i422_to_abgr(y, u, v, bytemuck::cast_slice_mut(dst), y.len(), c)
}

/// I422 → `Bgr<u8>`.
pub fn i422_to_bgr(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [Bgr<u8>],
    c: &YuvConstants,
) -> Result<(), SizeError> {
    crate::i422_to_rgb24(y, u, v, bytemuck::cast_slice_mut(dst), y.len(), c)
}

// ---------------------------------------------------------------------------
// 3 ↔ 4 bpp reorders
// ---------------------------------------------------------------------------

/// `Rgb<u8>` → `Bgra<u8>`, alpha 255.
pub fn rgb_to_bgra(src: &[Rgb<u8>], dst: &mut [Bgra<u8>]) -> Result<(), SizeError> {
    crate::raw_to_argb(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst), src.len())
}

/// `Bgr<u8>` → `Bgra<u8>`, alpha 255.
pub fn bgr_to_bgra(src: &[Bgr<u8>], dst: &mut [Bgra<u8>]) -> Result<(), SizeError> {
    crate::rgb24_to_argb(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst), src.len())
}

/// `Rgb<u8>` → `Bgr<u8>`.
pub fn rgb_to_bgr(src: &[Rgb<u8>], dst: &mut [Bgr<u8>]) -> Result<(), SizeError> {
    crate::raw_to_rgb24(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst), src.len())
}

/// `Bgra<u8>` → `Bgr<u8>`, dropping alpha.
pub fn bgra_to_bgr(src: &[Bgra<u8>], dst: &mut [Bgr<u8>]) -> Result<(), SizeError> {
    crate::argb_to_rgb24(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst), src.len())
}

/// `Bgra<u8>` → `Rgb<u8>`, dropping alpha.
pub fn bgra_to_rgb(src: &[Bgra<u8>], dst: &mut [Rgb<u8>]) -> Result<(), SizeError> {
    crate::argb_to_raw(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst), src.len())
}

// ---------------------------------------------------------------------------
// 8 ↔ 16 bit
// ---------------------------------------------------------------------------

/// `Bgra<u8>` → `Bgra<u16>`; each channel `v` becomes `v * 257`.
pub fn bgra_to_bgra16(src: &[Bgra<u8>], dst: &mut [Bgra<u16>]) -> Result<(), SizeError> {
    crate::argb_to_ar64(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst), src.len())
}

/// `Bgra<u8>` → `Rgba<u16>`.
pub fn bgra_to_rgba16(src: &[Bgra<u8>], dst: &mut [Rgba<u16>]) -> Result<(), SizeError> {
    crate::argb_to_ab64(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst), src.len())
}

/// `Bgra<u16>` → `Bgra<u8>`, keeping the high byte.
pub fn bgra16_to_bgra(src: &[Bgra<u16>], dst: &mut [Bgra<u8>]) -> Result<(), SizeError> {
    crate::ar64_to_argb(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst), src.len())
}

/// `Rgba<u16>` → `Bgra<u8>`, keeping the high byte.
pub fn rgba16_to_bgra(src: &[Rgba<u16>], dst: &mut [Bgra<u8>]) -> Result<(), SizeError> {
    crate::ab64_to_argb(bytemuck::cast_slice(src), bytemuck::cast_slice_mut(dst), src.len())
}
