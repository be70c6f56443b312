// ---------------------------------------------------------------------------
// Plane transposition and the rotations built on it.
//
// Strips of eight source rows go through an 8×8 tile kernel (a butterfly of
// 1-, 2- and 4-byte swaps); the NEON tier takes 16-row strips through a
// 16×16 tile first. Columns past the last full tile and rows past the last
// full strip are copied one sample at a time.
//
// 90° and 270° are transposes of vertically flipped views, so they cost the
// same as a transpose.
// ---------------------------------------------------------------------------

use crate::{Plane, PlaneMut, SizeError};
use archmage::incant;

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


fn check_transposed<T, U>(src: &Plane<'_, T>, dst: &PlaneMut<'_, U>, src_width: usize) -> Result<(), SizeError> {
    if dst.width() != src.height() || dst.height() != src_width {
        return Err(SizeError::DimensionMismatch);
    }
    Ok(())
}

/// `dst[x][y] = src[y][x]`. `dst` must be `src.height()` wide and
/// `src.width()` tall.
pub fn transpose_plane(src: Plane<'_, u8>, dst: PlaneMut<'_, u8>) -> Result<(), SizeError> {
    check_transposed(&src, &dst, src.width())?;
    if src.is_empty() {
        return Ok(());
    }
    incant!(transpose_impl(src, dst), [v3, arm_v2, scalar]);
    Ok(())
}

/// Rotate clockwise: `dst[y][x] = src[h - 1 - x][y]`.
pub fn rotate_plane_90(src: Plane<'_, u8>, dst: PlaneMut<'_, u8>) -> Result<(), SizeError> {
    transpose_plane(src.flipped(), dst)
}

/// Rotate counter-clockwise: `dst[y][x] = src[x][w - 1 - y]`.
pub fn rotate_plane_270(src: Plane<'_, u8>, dst: PlaneMut<'_, u8>) -> Result<(), SizeError> {
    transpose_plane(src, dst.flipped())
}

/// Rotate half a turn. `dst` has the dimensions of `src`.
pub fn rotate_plane_180(src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>) -> Result<(), SizeError> {
    if dst.width() != src.width() || dst.height() != src.height() {
        return Err(SizeError::DimensionMismatch);
    }
    for (y, row) in src.flipped().rows().enumerate() {
        mirror_row(row, dst.row_mut(y));
    }
    Ok(())
}

/// Transpose interleaved two-channel samples into two planes.
///
/// `src` is `2 * w` bytes wide (U, V pairs); `dst_a` receives the first
/// channel and `dst_b` the second, each `src.height()` wide and `w` tall.
pub fn transpose_uv_plane(
    src: Plane<'_, u8>,
    dst_a: PlaneMut<'_, u8>,
    dst_b: PlaneMut<'_, u8>,
) -> Result<(), SizeError> {
    if src.width() % 2 != 0 {
        return Err(SizeError::DimensionMismatch);
    }
    let w = src.width() / 2;
    check_transposed(&src, &dst_a, w)?;
    check_transposed(&src, &dst_b, w)?;
    if src.is_empty() {
        return Ok(());
    }
    incant!(transpose_uv_impl(src, dst_a, dst_b), [v3, arm_v2, scalar]);
    Ok(())
}

/// Deinterleave and rotate clockwise in one pass.
pub fn split_rotate_uv_90(
    src: Plane<'_, u8>,
    dst_a: PlaneMut<'_, u8>,
    dst_b: PlaneMut<'_, u8>,
) -> Result<(), SizeError> {
    transpose_uv_plane(src.flipped(), dst_a, dst_b)
}

/// Deinterleave and rotate counter-clockwise in one pass.
pub fn split_rotate_uv_270(
    src: Plane<'_, u8>,
    dst_a: PlaneMut<'_, u8>,
    dst_b: PlaneMut<'_, u8>,
) -> Result<(), SizeError> {
    transpose_uv_plane(src, dst_a.flipped(), dst_b.flipped())
}
