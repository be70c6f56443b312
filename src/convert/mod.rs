// ---------------------------------------------------------------------------
// Row-level pixel format conversion with SIMD dispatch.
//
// Architecture: #[rite] row functions hold the SIMD loops and hand their
// remainder to the scalar row, which is the reference for every tier.
// #[arcane] wrappers are the incant! targets: contiguous (one row) and
// plane (loop over rows, single dispatch).
//
// Byte orders follow libyuv naming: ARGB is B,G,R,A in memory, ABGR is
// R,G,B,A, RGBA is A,B,G,R, RGB24 is B,G,R and RAW is R,G,B. AR64 and AB64
// are ARGB and ABGR with 16-bit channels.
// ---------------------------------------------------------------------------

use crate::error::{check_len, elems};
use crate::{Plane, PlaneMut, SizeError};
use archmage::incant;

mod yuv;
pub use yuv::YuvConstants;

mod scalar;
use scalar::*;

#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "x86_64")]
use avx2::*;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "aarch64")]
use neon::*;

#[cfg(test)]
mod tests;

/// Packed output layout of an I422 plane conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum I422Layout {
    Argb,
    Rgba,
    Rgb24,
}

impl I422Layout {
    fn bpp(self) -> usize {
        match self {
            Self::Argb | Self::Rgba => 4,
            Self::Rgb24 => 3,
        }
    }
}

// ===========================================================================
// Validation helpers
// ===========================================================================

/// Trim a source to exactly `width * bpp` elements.
#[inline]
fn src_row<T>(src: &[T], width: usize, bpp: usize) -> Result<&[T], SizeError> {
    let n = elems(width, bpp)?;
    check_len(src.len(), n)?;
    Ok(&src[..n])
}

#[inline]
fn dst_row<T>(dst: &mut [T], width: usize, bpp: usize) -> Result<&mut [T], SizeError> {
    let n = elems(width, bpp)?;
    check_len(dst.len(), n)?;
    Ok(&mut dst[..n])
}

type I422Rows<'a, 'd> = (&'a [u8], &'a [u8], &'a [u8], &'d mut [u8]);

#[inline]
fn i422_rows<'a, 'd>(
    y: &'a [u8],
    u: &'a [u8],
    v: &'a [u8],
    dst: &'d mut [u8],
    width: usize,
    bpp: usize,
) -> Result<I422Rows<'a, 'd>, SizeError> {
    let cw = width.div_ceil(2);
    Ok((
        src_row(y, width, 1)?,
        src_row(u, cw, 1)?,
        src_row(v, cw, 1)?,
        dst_row(dst, width, bpp)?,
    ))
}

fn check_i422_planes(
    y: &Plane<'_, u8>,
    u: &Plane<'_, u8>,
    v: &Plane<'_, u8>,
    dst: &PlaneMut<'_, u8>,
    bpp: usize,
) -> Result<(), SizeError> {
    let cw = y.width().div_ceil(2);
    let h = y.height();
    if u.width() != cw || v.width() != cw || u.height() != h || v.height() != h {
        return Err(SizeError::DimensionMismatch);
    }
    if dst.width() != elems(y.width(), bpp)? || dst.height() != h {
        return Err(SizeError::DimensionMismatch);
    }
    Ok(())
}

// ===========================================================================
// Public API: YUV 4:2:2 → RGB rows
// ===========================================================================

/// I422 → ARGB (B,G,R,A in memory) for `width` pixels.
///
/// `u` and `v` hold `width.div_ceil(2)` samples; each chroma pair covers two
/// luma samples and an odd final pixel reuses the last pair. Alpha is 255.
pub fn i422_to_argb(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    width: usize,
    c: &YuvConstants,
) -> Result<(), SizeError> {
    let (y, u, v, dst) = i422_rows(y, u, v, dst, width, 4)?;
    incant!(i422_to_argb_impl(y, u, v, dst, c), [v3, arm_v2, scalar]);
    Ok(())
}

/// I422 → RGBA (A,B,G,R in memory). Alpha is 255.
pub fn i422_to_rgba(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    width: usize,
    c: &YuvConstants,
) -> Result<(), SizeError> {
    let (y, u, v, dst) = i422_rows(y, u, v, dst, width, 4)?;
    incant!(i422_to_rgba_impl(y, u, v, dst, c), [v3, arm_v2, scalar]);
    Ok(())
}

/// I422 → RGB24 (B,G,R in memory).
pub fn i422_to_rgb24(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    width: usize,
    c: &YuvConstants,
) -> Result<(), SizeError> {
    let (y, u, v, dst) = i422_rows(y, u, v, dst, width, 3)?;
    incant!(i422_to_rgb24_impl(y, u, v, dst, c), [v3, arm_v2, scalar]);
    Ok(())
}

/// I422 → ABGR (R,G,B,A in memory). Alpha is 255.
///
/// Runs the ARGB kernel with the chroma planes exchanged and
/// [`YuvConstants::yvu`] coefficients.
pub fn i422_to_abgr(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    width: usize,
    c: &YuvConstants,
) -> Result<(), SizeError> {
    i422_to_argb(y, v, u, dst, width, &c.yvu())
}

// ===========================================================================
// Public API: YUV 4:2:2 → RGB planes
// ===========================================================================

fn i422_plane_checked(
    y: Plane<'_, u8>,
    u: Plane<'_, u8>,
    v: Plane<'_, u8>,
    dst: PlaneMut<'_, u8>,
    c: &YuvConstants,
    layout: I422Layout,
) -> Result<(), SizeError> {
    check_i422_planes(&y, &u, &v, &dst, layout.bpp())?;
    if y.is_empty() {
        return Ok(());
    }
    incant!(i422_plane(y, u, v, dst, c, layout), [v3, arm_v2, scalar]);
    Ok(())
}

/// Whole-plane I422 → ARGB. `dst` is a byte plane `4 * y.width()` wide.
///
/// Chroma planes are `y.width().div_ceil(2)` wide and as tall as `y`.
/// Any plane may have a negative stride.
pub fn i422_to_argb_plane(
    y: Plane<'_, u8>,
    u: Plane<'_, u8>,
    v: Plane<'_, u8>,
    dst: PlaneMut<'_, u8>,
    c: &YuvConstants,
) -> Result<(), SizeError> {
    i422_plane_checked(y, u, v, dst, c, I422Layout::Argb)
}

/// Whole-plane I422 → RGBA (A,B,G,R). `dst` is `4 * y.width()` bytes wide.
pub fn i422_to_rgba_plane(
    y: Plane<'_, u8>,
    u: Plane<'_, u8>,
    v: Plane<'_, u8>,
    dst: PlaneMut<'_, u8>,
    c: &YuvConstants,
) -> Result<(), SizeError> {
    i422_plane_checked(y, u, v, dst, c, I422Layout::Rgba)
}

/// Whole-plane I422 → RGB24. `dst` is `3 * y.width()` bytes wide.
pub fn i422_to_rgb24_plane(
    y: Plane<'_, u8>,
    u: Plane<'_, u8>,
    v: Plane<'_, u8>,
    dst: PlaneMut<'_, u8>,
    c: &YuvConstants,
) -> Result<(), SizeError> {
    i422_plane_checked(y, u, v, dst, c, I422Layout::Rgb24)
}

/// Whole-plane I422 → ABGR (R,G,B,A). `dst` is `4 * y.width()` bytes wide.
pub fn i422_to_abgr_plane(
    y: Plane<'_, u8>,
    u: Plane<'_, u8>,
    v: Plane<'_, u8>,
    dst: PlaneMut<'_, u8>,
    c: &YuvConstants,
) -> Result<(), SizeError> {
    i422_plane_checked(y, v, u, dst, &c.yvu(), I422Layout::Argb)
}

// ===========================================================================
// Public API: 8 ↔ 16 bit
// ===========================================================================

/// ARGB → AR64. Each byte `v` becomes `v * 0x0101`.
pub fn argb_to_ar64(src: &[u8], dst: &mut [u16], width: usize) -> Result<(), SizeError> {
    let (src, dst) = (src_row(src, width, 4)?, dst_row(dst, width, 4)?);
    incant!(expand_impl(src, dst), [v3, arm_v2, scalar]);
    Ok(())
}

/// ARGB → AB64: expand and exchange B with R.
pub fn argb_to_ab64(src: &[u8], dst: &mut [u16], width: usize) -> Result<(), SizeError> {
    let (src, dst) = (src_row(src, width, 4)?, dst_row(dst, width, 4)?);
    incant!(expand_swap_br_impl(src, dst), [v3, arm_v2, scalar]);
    Ok(())
}

/// AR64 → ARGB. Keeps the high byte of each channel; no rounding.
pub fn ar64_to_argb(src: &[u16], dst: &mut [u8], width: usize) -> Result<(), SizeError> {
    let (src, dst) = (src_row(src, width, 4)?, dst_row(dst, width, 4)?);
    incant!(contract_impl(src, dst), [v3, arm_v2, scalar]);
    Ok(())
}

/// AB64 → ARGB: keep the high byte and exchange R with B.
pub fn ab64_to_argb(src: &[u16], dst: &mut [u8], width: usize) -> Result<(), SizeError> {
    let (src, dst) = (src_row(src, width, 4)?, dst_row(dst, width, 4)?);
    incant!(contract_swap_br_impl(src, dst), [v3, arm_v2, scalar]);
    Ok(())
}

// ===========================================================================
// Public API: channel reorders
// ===========================================================================

/// RGB24 → ARGB, alpha 255.
pub fn rgb24_to_argb(src: &[u8], dst: &mut [u8], width: usize) -> Result<(), SizeError> {
    let (src, dst) = (src_row(src, width, 3)?, dst_row(dst, width, 4)?);
    incant!(rgb24_to_argb_impl(src, dst), [v3, arm_v2, scalar]);
    Ok(())
}

/// RAW → ARGB, alpha 255.
pub fn raw_to_argb(src: &[u8], dst: &mut [u8], width: usize) -> Result<(), SizeError> {
    let (src, dst) = (src_row(src, width, 3)?, dst_row(dst, width, 4)?);
    incant!(raw_to_argb_impl(src, dst), [v3, arm_v2, scalar]);
    Ok(())
}

/// RAW → RGBA (A,B,G,R), alpha 255.
pub fn raw_to_rgba(src: &[u8], dst: &mut [u8], width: usize) -> Result<(), SizeError> {
    let (src, dst) = (src_row(src, width, 3)?, dst_row(dst, width, 4)?);
    incant!(raw_to_rgba_impl(src, dst), [v3, arm_v2, scalar]);
    Ok(())
}

/// RAW → RGB24. Swaps the first and third byte of each pixel.
pub fn raw_to_rgb24(src: &[u8], dst: &mut [u8], width: usize) -> Result<(), SizeError> {
    let (src, dst) = (src_row(src, width, 3)?, dst_row(dst, width, 3)?);
    incant!(raw_to_rgb24_impl(src, dst), [v3, arm_v2, scalar]);
    Ok(())
}

/// ARGB → RGB24, dropping alpha.
pub fn argb_to_rgb24(src: &[u8], dst: &mut [u8], width: usize) -> Result<(), SizeError> {
    let (src, dst) = (src_row(src, width, 4)?, dst_row(dst, width, 3)?);
    incant!(argb_to_rgb24_impl(src, dst), [v3, arm_v2, scalar]);
    Ok(())
}

/// ARGB → RAW, dropping alpha.
pub fn argb_to_raw(src: &[u8], dst: &mut [u8], width: usize) -> Result<(), SizeError> {
    let (src, dst) = (src_row(src, width, 4)?, dst_row(dst, width, 3)?);
    incant!(argb_to_raw_impl(src, dst), [v3, arm_v2, scalar]);
    Ok(())
}

// ===========================================================================
// Public API: planar ↔ packed
// ===========================================================================

/// Packed R,G,B → three planes.
pub fn split_rgb(
    src: &[u8],
    r: &mut [u8],
    g: &mut [u8],
    b: &mut [u8],
    width: usize,
) -> Result<(), SizeError> {
    let src = src_row(src, width, 3)?;
    let (r, g, b) = (dst_row(r, width, 1)?, dst_row(g, width, 1)?, dst_row(b, width, 1)?);
    incant!(split_rgb_impl(src, r, g, b), [arm_v2, scalar]);
    Ok(())
}

/// Three planes → packed R,G,B.
pub fn merge_rgb(
    r: &[u8],
    g: &[u8],
    b: &[u8],
    dst: &mut [u8],
    width: usize,
) -> Result<(), SizeError> {
    let (r, g, b) = (src_row(r, width, 1)?, src_row(g, width, 1)?, src_row(b, width, 1)?);
    let dst = dst_row(dst, width, 3)?;
    incant!(merge_rgb_impl(r, g, b, dst), [arm_v2, scalar]);
    Ok(())
}

/// ARGB → four planes.
pub fn split_argb(
    src: &[u8],
    r: &mut [u8],
    g: &mut [u8],
    b: &mut [u8],
    a: &mut [u8],
    width: usize,
) -> Result<(), SizeError> {
    let src = src_row(src, width, 4)?;
    let (r, g) = (dst_row(r, width, 1)?, dst_row(g, width, 1)?);
    let (b, a) = (dst_row(b, width, 1)?, dst_row(a, width, 1)?);
    incant!(split_argb_impl(src, r, g, b, a), [arm_v2, scalar]);
    Ok(())
}

/// Four planes → ARGB.
pub fn merge_argb(
    r: &[u8],
    g: &[u8],
    b: &[u8],
    a: &[u8],
    dst: &mut [u8],
    width: usize,
) -> Result<(), SizeError> {
    let (r, g) = (src_row(r, width, 1)?, src_row(g, width, 1)?);
    let (b, a) = (src_row(b, width, 1)?, src_row(a, width, 1)?);
    let dst = dst_row(dst, width, 4)?;
    incant!(merge_argb_impl(r, g, b, a, dst), [arm_v2, scalar]);
    Ok(())
}

/// ARGB → three planes, discarding alpha.
pub fn split_xrgb(
    src: &[u8],
    r: &mut [u8],
    g: &mut [u8],
    b: &mut [u8],
    width: usize,
) -> Result<(), SizeError> {
    let src = src_row(src, width, 4)?;
    let (r, g, b) = (dst_row(r, width, 1)?, dst_row(g, width, 1)?, dst_row(b, width, 1)?);
    split_xrgb_row(src, r, g, b);
    Ok(())
}

/// Three planes → ARGB with alpha 255.
pub fn merge_xrgb(
    r: &[u8],
    g: &[u8],
    b: &[u8],
    dst: &mut [u8],
    width: usize,
) -> Result<(), SizeError> {
    let (r, g, b) = (src_row(r, width, 1)?, src_row(g, width, 1)?, src_row(b, width, 1)?);
    let dst = dst_row(dst, width, 4)?;
    merge_xrgb_row(r, g, b, dst);
    Ok(())
}
