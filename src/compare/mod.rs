//! Sum of squared error and PSNR between byte buffers.
//!
//! Long buffers are summed in blocks of [`SSE_BLOCK`] samples, each small
//! enough for a 32-bit total, and the block totals are added in 64 bits.
//! With the `rayon` feature the blocks are reduced in parallel; the result
//! is the same integer either way.

use crate::{Plane, SizeError};
use archmage::incant;

#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "rayon")]
use rayon::prelude::ParallelSlice;

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

/// Samples per independently summed block.
pub const SSE_BLOCK: usize = 1 << 15;

/// Longest slice [`sum_square_error_block`] accepts: `65536 * 255²` still
/// fits a `u32`.
pub const SSE_BLOCK_MAX: usize = 1 << 16;

/// Reported PSNR for identical (or nearly identical) inputs.
pub const MAX_PSNR: f64 = 128.0;

#[inline]
fn sse_dispatch(a: &[u8], b: &[u8]) -> u32 {
    incant!(sse_impl(a, b), [v3, arm_v2, scalar])
}

/// `Σ (a[i] - b[i])²` for one block of at most [`SSE_BLOCK_MAX`] samples.
pub fn sum_square_error_block(a: &[u8], b: &[u8]) -> Result<u32, SizeError> {
    if a.len() != b.len() {
        return Err(SizeError::DimensionMismatch);
    }
    if a.len() > SSE_BLOCK_MAX {
        return Err(SizeError::UnsupportedGeometry);
    }
    Ok(sse_dispatch(a, b))
}

#[cfg(feature = "rayon")]
fn full_blocks_sse(a: &[u8], b: &[u8]) -> u64 {
    a.par_chunks_exact(SSE_BLOCK)
        .zip(b.par_chunks_exact(SSE_BLOCK))
        .map(|(a, b)| u64::from(sse_dispatch(a, b)))
        .sum()
}

#[cfg(not(feature = "rayon"))]
fn full_blocks_sse(a: &[u8], b: &[u8]) -> u64 {
    a.chunks_exact(SSE_BLOCK)
        .zip(b.chunks_exact(SSE_BLOCK))
        .map(|(a, b)| u64::from(sse_dispatch(a, b)))
        .sum()
}

/// Sum of squared differences over two equal-length buffers, as the exact
/// integer.
///
/// Full blocks first, then the largest multiple of 16 of what remains
/// through the same kernel, then the last few samples one at a time.
pub fn compute_sum_square_error_u64(a: &[u8], b: &[u8]) -> Result<u64, SizeError> {
    if a.len() != b.len() {
        return Err(SizeError::DimensionMismatch);
    }
    let full = a.len() - a.len() % SSE_BLOCK;
    let mid = full + ((a.len() - full) & !15);
    let mut sse = full_blocks_sse(&a[..full], &b[..full]);
    if mid > full {
        sse += u64::from(sse_dispatch(&a[full..mid], &b[full..mid]));
    }
    sse += u64::from(sse_row(&a[mid..], &b[mid..]));
    Ok(sse)
}

/// [`compute_sum_square_error_u64`] as a float, ready for [`compute_psnr`].
pub fn compute_sum_square_error(a: &[u8], b: &[u8]) -> Result<f64, SizeError> {
    Ok(compute_sum_square_error_u64(a, b)? as f64)
}

/// Sum of squared differences between two planes of equal dimensions.
pub fn plane_sum_square_error(a: Plane<'_, u8>, b: Plane<'_, u8>) -> Result<u64, SizeError> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(SizeError::DimensionMismatch);
    }
    if a.is_empty() {
        return Ok(0);
    }
    let mut sse = 0u64;
    for (ra, rb) in a.rows().zip(b.rows()) {
        sse += compute_sum_square_error_u64(ra, rb)?;
    }
    Ok(sse)
}

/// `10 * log10(255² * size / sse)`, capped at [`MAX_PSNR`].
///
/// `sse` at or below the error that would give [`MAX_PSNR`] (including
/// zero) returns [`MAX_PSNR`] exactly.
#[cfg(feature = "std")]
pub fn compute_psnr(sse: f64, size: u64) -> f64 {
    let peak = 255.0 * 255.0 * size as f64;
    let min_sse = peak / 10f64.powf(MAX_PSNR / 10.0);
    if sse <= min_sse {
        return MAX_PSNR;
    }
    10.0 * (peak / sse).log10()
}

/// PSNR between two planes of equal dimensions.
#[cfg(feature = "std")]
pub fn plane_psnr(a: Plane<'_, u8>, b: Plane<'_, u8>) -> Result<f64, SizeError> {
    let sse = plane_sum_square_error(a, b)?;
    Ok(compute_psnr(sse as f64, (a.width() * a.height()) as u64))
}
