// ---------------------------------------------------------------------------
// Row-level scaling kernels and the plane scaler built on them.
//
// Row functions take exact output widths and validate their sources once.
// The plane scaler picks a specialized path by ratio (3/4, 1/2, 3/8, 1/4,
// 2x), then falls back to box, bilinear, or point sampling.
//
// 16.16 fixed point throughout: `x >> 16` is the source index and the low
// 16 bits the fraction.
// ---------------------------------------------------------------------------

use crate::error::{check_len, elems};
use crate::SizeError;
use archmage::incant;

mod geometry;
pub use geometry::{FilterMode, ScaleGeometry};

mod driver;
pub use driver::scale_plane;

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

// ===========================================================================
// Validation helpers
// ===========================================================================

#[inline]
fn src_span<T>(src: &[T], n: usize) -> Result<&[T], SizeError> {
    check_len(src.len(), n)?;
    Ok(&src[..n])
}

#[inline]
fn dst_span<T>(dst: &mut [T], n: usize) -> Result<&mut [T], SizeError> {
    check_len(dst.len(), n)?;
    Ok(&mut dst[..n])
}

/// `src` trimmed for a two-tap walk: every left tap is required, plus the
/// right tap of the last position when the caller has it.
#[inline]
fn tap_span<T>(src: &[T], left_taps: usize) -> Result<&[T], SizeError> {
    check_len(src.len(), left_taps)?;
    Ok(&src[..src.len().min(left_taps + 1)])
}

fn check_multiple_of_3(dst_width: usize) -> Result<(), SizeError> {
    if dst_width % 3 != 0 {
        return Err(SizeError::UnsupportedGeometry);
    }
    Ok(())
}

/// Source samples a 16.16 walk of `dst_width` steps reads, counting the
/// sample at the last position.
fn walk_len(dst_width: usize, x: i32, dx: i32) -> Result<usize, SizeError> {
    if x < 0 || dx < 0 {
        return Err(SizeError::UnsupportedGeometry);
    }
    let steps = i64::try_from(dst_width - 1).map_err(|_| SizeError::UnsupportedGeometry)?;
    let last = steps
        .checked_mul(i64::from(dx))
        .and_then(|v| v.checked_add(i64::from(x)))
        .ok_or(SizeError::UnsupportedGeometry)?;
    Ok((last >> 16) as usize + 1)
}

// ===========================================================================
// Dispatch shims shared by the row API and the plane scaler
// ===========================================================================

#[inline]
fn down2_dispatch(src: &[u8], dst: &mut [u8]) {
    incant!(down2_impl(src, dst), [v3, arm_v2, scalar])
}

#[inline]
fn down2_linear_dispatch(src: &[u8], dst: &mut [u8]) {
    incant!(down2_linear_impl(src, dst), [v3, arm_v2, scalar])
}

#[inline]
fn down2_box_dispatch(src0: &[u8], src1: &[u8], dst: &mut [u8]) {
    incant!(down2_box_impl(src0, src1, dst), [v3, arm_v2, scalar])
}

#[inline]
fn add_row_dispatch(src: &[u8], acc: &mut [u16]) {
    incant!(add_row_impl(src, acc), [v3, arm_v2, scalar])
}

#[inline]
fn interpolate_dispatch(src0: &[u8], src1: &[u8], dst: &mut [u8], fraction: u8) {
    incant!(interpolate_impl(src0, src1, dst, fraction), [v3, arm_v2, scalar])
}

// ===========================================================================
// Public API: 1/2 and 1/4
// ===========================================================================

/// Keep every second pixel: `dst[x] = src[2x + 1]`.
pub fn scale_row_down2(src: &[u8], dst: &mut [u8], dst_width: usize) -> Result<(), SizeError> {
    let src = src_span(src, elems(dst_width, 2)?)?;
    let dst = dst_span(dst, dst_width)?;
    down2_dispatch(src, dst);
    Ok(())
}

/// Average horizontal pairs: `(src[2x] + src[2x + 1] + 1) >> 1`.
pub fn scale_row_down2_linear(src: &[u8], dst: &mut [u8], dst_width: usize) -> Result<(), SizeError> {
    let src = src_span(src, elems(dst_width, 2)?)?;
    let dst = dst_span(dst, dst_width)?;
    down2_linear_dispatch(src, dst);
    Ok(())
}

/// Average 2×2 blocks from two rows, rounding to nearest.
pub fn scale_row_down2_box(
    src0: &[u8],
    src1: &[u8],
    dst: &mut [u8],
    dst_width: usize,
) -> Result<(), SizeError> {
    let n = elems(dst_width, 2)?;
    let (src0, src1) = (src_span(src0, n)?, src_span(src1, n)?);
    let dst = dst_span(dst, dst_width)?;
    down2_box_dispatch(src0, src1, dst);
    Ok(())
}

/// `dst[x] = src[4x + 2]`.
pub fn scale_row_down4(src: &[u8], dst: &mut [u8], dst_width: usize) -> Result<(), SizeError> {
    let src = src_span(src, elems(dst_width, 4)?)?;
    let dst = dst_span(dst, dst_width)?;
    down4_row(src, dst);
    Ok(())
}

/// Average 4×4 blocks from four rows, rounding to nearest.
pub fn scale_row_down4_box(rows: [&[u8]; 4], dst: &mut [u8], dst_width: usize) -> Result<(), SizeError> {
    let n = elems(dst_width, 4)?;
    let rows = [
        src_span(rows[0], n)?,
        src_span(rows[1], n)?,
        src_span(rows[2], n)?,
        src_span(rows[3], n)?,
    ];
    let dst = dst_span(dst, dst_width)?;
    down4_box_row(rows, dst);
    Ok(())
}

// ===========================================================================
// Public API: 3/4 and 3/8
// ===========================================================================

/// Four pixels to three by keeping pixels 0, 1 and 3. `dst_width` must be a
/// multiple of 3.
pub fn scale_row_down34(src: &[u8], dst: &mut [u8], dst_width: usize) -> Result<(), SizeError> {
    check_multiple_of_3(dst_width)?;
    let src = src_span(src, dst_width / 3 * 4)?;
    let dst = dst_span(dst, dst_width)?;
    down34_row(src, dst);
    Ok(())
}

/// Four pixels to three with 3:1, 1:1, 1:3 horizontal taps, then rows
/// blended 3:1 toward `src0`.
pub fn scale_row_down34_0_box(
    src0: &[u8],
    src1: &[u8],
    dst: &mut [u8],
    dst_width: usize,
) -> Result<(), SizeError> {
    check_multiple_of_3(dst_width)?;
    let n = dst_width / 3 * 4;
    let (src0, src1) = (src_span(src0, n)?, src_span(src1, n)?);
    let dst = dst_span(dst, dst_width)?;
    down34_0_box_row(src0, src1, dst);
    Ok(())
}

/// As [`scale_row_down34_0_box`] with the rows blended 1:1.
pub fn scale_row_down34_1_box(
    src0: &[u8],
    src1: &[u8],
    dst: &mut [u8],
    dst_width: usize,
) -> Result<(), SizeError> {
    check_multiple_of_3(dst_width)?;
    let n = dst_width / 3 * 4;
    let (src0, src1) = (src_span(src0, n)?, src_span(src1, n)?);
    let dst = dst_span(dst, dst_width)?;
    down34_1_box_row(src0, src1, dst);
    Ok(())
}

/// Eight pixels to three by keeping pixels 0, 3 and 6. `dst_width` must be
/// a multiple of 3.
pub fn scale_row_down38(src: &[u8], dst: &mut [u8], dst_width: usize) -> Result<(), SizeError> {
    check_multiple_of_3(dst_width)?;
    let src = src_span(src, dst_width / 3 * 8)?;
    let dst = dst_span(dst, dst_width)?;
    down38_row(src, dst);
    Ok(())
}

/// Eight pixels of three rows to three: 3×3, 3×3 and 2×3 box means.
pub fn scale_row_down38_3_box(
    src0: &[u8],
    src1: &[u8],
    src2: &[u8],
    dst: &mut [u8],
    dst_width: usize,
) -> Result<(), SizeError> {
    check_multiple_of_3(dst_width)?;
    let n = dst_width / 3 * 8;
    let (src0, src1, src2) = (src_span(src0, n)?, src_span(src1, n)?, src_span(src2, n)?);
    let dst = dst_span(dst, dst_width)?;
    down38_3_box_row(src0, src1, src2, dst);
    Ok(())
}

/// Eight pixels of two rows to three: 3×2, 3×2 and 2×2 box means.
pub fn scale_row_down38_2_box(
    src0: &[u8],
    src1: &[u8],
    dst: &mut [u8],
    dst_width: usize,
) -> Result<(), SizeError> {
    check_multiple_of_3(dst_width)?;
    let n = dst_width / 3 * 8;
    let (src0, src1) = (src_span(src0, n)?, src_span(src1, n)?);
    let dst = dst_span(dst, dst_width)?;
    down38_2_box_row(src0, src1, dst);
    Ok(())
}

// ===========================================================================
// Public API: accumulation, column stepping, interpolation
// ===========================================================================

/// `acc[i] += src[i]` for `width` samples, saturating at `u16::MAX`.
pub fn scale_add_row(src: &[u8], acc: &mut [u16], width: usize) -> Result<(), SizeError> {
    let src = src_span(src, width)?;
    check_len(acc.len(), width)?;
    add_row_dispatch(src, &mut acc[..width]);
    Ok(())
}

/// Point sample `dst_width` pixels at `x`, `x + dx`, ... (16.16).
pub fn scale_cols(src: &[u8], dst: &mut [u8], dst_width: usize, x: i32, dx: i32) -> Result<(), SizeError> {
    if dst_width == 0 {
        return Ok(());
    }
    let src = src_span(src, walk_len(dst_width, x, dx)?)?;
    let dst = dst_span(dst, dst_width)?;
    cols_row(src, dst, x, dx);
    Ok(())
}

/// Duplicate each source pixel: `dst[i] = src[i / 2]`.
pub fn scale_cols_up2(src: &[u8], dst: &mut [u8], dst_width: usize) -> Result<(), SizeError> {
    let src = src_span(src, dst_width.div_ceil(2))?;
    let dst = dst_span(dst, dst_width)?;
    cols_up2_row(src, dst);
    Ok(())
}

/// Two-tap filter at `x`, `x + dx`, ... (16.16) with 7-bit weights.
///
/// `src` must cover every left tap; the right tap of the last position is
/// read when `src` has it and otherwise repeats the last pixel.
pub fn scale_filter_cols(
    src: &[u8],
    dst: &mut [u8],
    dst_width: usize,
    x: i32,
    dx: i32,
) -> Result<(), SizeError> {
    if dst_width == 0 {
        return Ok(());
    }
    let src = tap_span(src, walk_len(dst_width, x, dx)?)?;
    let dst = dst_span(dst, dst_width)?;
    filter_cols_row(src, dst, x, dx);
    Ok(())
}

/// Blend two rows: `(src0 * (256 - f) + src1 * f + 128) >> 8`.
///
/// `fraction == 0` copies `src0`; 128 is the rounded average.
pub fn interpolate_row(
    src0: &[u8],
    src1: &[u8],
    dst: &mut [u8],
    width: usize,
    fraction: u8,
) -> Result<(), SizeError> {
    let (src0, src1) = (src_span(src0, width)?, src_span(src1, width)?);
    let dst = dst_span(dst, width)?;
    interpolate_dispatch(src0, src1, dst, fraction);
    Ok(())
}

// ===========================================================================
// Public API: 2x upsampling
// ===========================================================================

/// Horizontal 2x with 3:1 weights. Reads `dst_width.div_ceil(2)` pixels.
pub fn scale_row_up2_linear(src: &[u8], dst: &mut [u8], dst_width: usize) -> Result<(), SizeError> {
    if dst_width == 0 {
        return Ok(());
    }
    let src = src_span(src, dst_width.div_ceil(2))?;
    let dst = dst_span(dst, dst_width)?;
    up2_linear_row(src, dst);
    Ok(())
}

/// 2x in both directions: two source rows make two output rows with
/// 9:3:3:1 weights. `dst0` sits nearer `src0`.
pub fn scale_row_up2_bilinear(
    src0: &[u8],
    src1: &[u8],
    dst0: &mut [u8],
    dst1: &mut [u8],
    dst_width: usize,
) -> Result<(), SizeError> {
    if dst_width == 0 {
        return Ok(());
    }
    let n = dst_width.div_ceil(2);
    let (src0, src1) = (src_span(src0, n)?, src_span(src1, n)?);
    let (dst0, dst1) = (dst_span(dst0, dst_width)?, dst_span(dst1, dst_width)?);
    up2_bilinear_row(src0, src1, dst0, dst1);
    Ok(())
}

/// [`scale_row_up2_linear`] on 16-bit samples.
pub fn scale_row_up2_linear_16(src: &[u16], dst: &mut [u16], dst_width: usize) -> Result<(), SizeError> {
    if dst_width == 0 {
        return Ok(());
    }
    let src = src_span(src, dst_width.div_ceil(2))?;
    let dst = dst_span(dst, dst_width)?;
    up2_linear_16_row(src, dst);
    Ok(())
}

/// [`scale_row_up2_bilinear`] on 16-bit samples.
pub fn scale_row_up2_bilinear_16(
    src0: &[u16],
    src1: &[u16],
    dst0: &mut [u16],
    dst1: &mut [u16],
    dst_width: usize,
) -> Result<(), SizeError> {
    if dst_width == 0 {
        return Ok(());
    }
    let n = dst_width.div_ceil(2);
    let (src0, src1) = (src_span(src0, n)?, src_span(src1, n)?);
    let (dst0, dst1) = (dst_span(dst0, dst_width)?, dst_span(dst1, dst_width)?);
    up2_bilinear_16_row(src0, src1, dst0, dst1);
    Ok(())
}

// ===========================================================================
// Public API: ARGB and interleaved UV rows
// ===========================================================================

/// Keep every second 4-byte pixel.
pub fn scale_argb_row_down2(src: &[u8], dst: &mut [u8], dst_width: usize) -> Result<(), SizeError> {
    let src = src_span(src, elems(dst_width, 8)?)?;
    let dst = dst_span(dst, elems(dst_width, 4)?)?;
    argb_down2_row(src, dst);
    Ok(())
}

/// Average horizontal pixel pairs per channel.
pub fn scale_argb_row_down2_linear(src: &[u8], dst: &mut [u8], dst_width: usize) -> Result<(), SizeError> {
    let src = src_span(src, elems(dst_width, 8)?)?;
    let dst = dst_span(dst, elems(dst_width, 4)?)?;
    argb_down2_linear_row(src, dst);
    Ok(())
}

/// Average 2×2 pixel blocks per channel.
pub fn scale_argb_row_down2_box(
    src0: &[u8],
    src1: &[u8],
    dst: &mut [u8],
    dst_width: usize,
) -> Result<(), SizeError> {
    let n = elems(dst_width, 8)?;
    let (src0, src1) = (src_span(src0, n)?, src_span(src1, n)?);
    let dst = dst_span(dst, elems(dst_width, 4)?)?;
    argb_down2_box_row(src0, src1, dst);
    Ok(())
}

fn even_span(dst_width: usize, src_step: usize, taps: usize) -> Result<usize, SizeError> {
    if src_step == 0 {
        return Err(SizeError::UnsupportedGeometry);
    }
    let px = elems(dst_width - 1, src_step)?
        .checked_add(taps)
        .ok_or(SizeError::InvalidStride)?;
    elems(px, 4)
}

/// Every `src_step`-th 4-byte pixel.
pub fn scale_argb_row_down_even(
    src: &[u8],
    src_step: usize,
    dst: &mut [u8],
    dst_width: usize,
) -> Result<(), SizeError> {
    if dst_width == 0 {
        return Ok(());
    }
    let src = src_span(src, even_span(dst_width, src_step, 1)?)?;
    let dst = dst_span(dst, elems(dst_width, 4)?)?;
    argb_down_even_row(src, src_step, dst);
    Ok(())
}

/// 2×2 box at every `src_step`-th pixel.
pub fn scale_argb_row_down_even_box(
    src0: &[u8],
    src1: &[u8],
    src_step: usize,
    dst: &mut [u8],
    dst_width: usize,
) -> Result<(), SizeError> {
    if dst_width == 0 {
        return Ok(());
    }
    let n = even_span(dst_width, src_step, 2)?;
    let (src0, src1) = (src_span(src0, n)?, src_span(src1, n)?);
    let dst = dst_span(dst, elems(dst_width, 4)?)?;
    argb_down_even_box_row(src0, src1, src_step, dst);
    Ok(())
}

/// Point sample `dst_width` 4-byte pixels at `x`, `x + dx`, ... (16.16).
pub fn scale_argb_cols(src: &[u8], dst: &mut [u8], dst_width: usize, x: i32, dx: i32) -> Result<(), SizeError> {
    if dst_width == 0 {
        return Ok(());
    }
    let src = src_span(src, elems(walk_len(dst_width, x, dx)?, 4)?)?;
    let dst = dst_span(dst, elems(dst_width, 4)?)?;
    argb_cols_row(src.as_chunks::<4>().0, dst.as_chunks_mut::<4>().0, x, dx);
    Ok(())
}

/// Duplicate each 4-byte pixel.
pub fn scale_argb_cols_up2(src: &[u8], dst: &mut [u8], dst_width: usize) -> Result<(), SizeError> {
    let src = src_span(src, elems(dst_width.div_ceil(2), 4)?)?;
    let dst = dst_span(dst, elems(dst_width, 4)?)?;
    argb_cols_up2_row(src.as_chunks::<4>().0, dst.as_chunks_mut::<4>().0);
    Ok(())
}

/// Two-tap filter over 4-byte pixels at `x`, `x + dx`, ... (16.16).
///
/// Each channel is `(a * (127 - f) + b * f) >> 7` with `f = (x >> 9) & 0x7f`.
/// Source coverage follows [`scale_filter_cols`].
pub fn scale_argb_filter_cols(
    src: &[u8],
    dst: &mut [u8],
    dst_width: usize,
    x: i32,
    dx: i32,
) -> Result<(), SizeError> {
    if dst_width == 0 {
        return Ok(());
    }
    let n = walk_len(dst_width, x, dx)?;
    check_len(src.len(), elems(n, 4)?)?;
    let src = tap_span(src.as_chunks::<4>().0, n)?;
    let dst = dst_span(dst, elems(dst_width, 4)?)?;
    argb_filter_cols_row(src, dst.as_chunks_mut::<4>().0, x, dx);
    Ok(())
}

/// Average 2×2 blocks of interleaved two-channel (UV) samples.
pub fn scale_uv_row_down2_box(
    src0: &[u8],
    src1: &[u8],
    dst: &mut [u8],
    dst_width: usize,
) -> Result<(), SizeError> {
    let n = elems(dst_width, 4)?;
    let (src0, src1) = (src_span(src0, n)?, src_span(src1, n)?);
    let dst = dst_span(dst, elems(dst_width, 2)?)?;
    uv_down2_box_row(src0, src1, dst);
    Ok(())
}
