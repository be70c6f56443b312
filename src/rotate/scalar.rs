use alloc::vec;

use archmage::prelude::*;

use crate::{Plane, PlaneMut};

// Odd 1-, 2- and 4-byte groups of a little-endian row.
const M1: u64 = 0xFF00_FF00_FF00_FF00;
const M2: u64 = 0xFFFF_0000_FFFF_0000;
const M4: u64 = 0xFFFF_FFFF_0000_0000;

/// Transpose an 8×8 byte tile held as eight little-endian rows.
///
/// Each stage swaps element `(i, j)` with `(i ^ s, j ^ s)` where bit `s` is
/// set in `j` but not `i`, for `s` = 1, 2, 4.
#[inline]
pub(super) fn transpose_8x8(mut r: [u64; 8]) -> [u64; 8] {
    for (step, hi) in [(1usize, M1), (2, M2), (4, M4)] {
        let shift = step as u32 * 8;
        for i in (0..8).filter(|i| i & step == 0) {
            let (a, b) = (r[i], r[i + step]);
            r[i] = (a & !hi) | ((b << shift) & hi);
            r[i + step] = ((a >> shift) & !hi) | (b & hi);
        }
    }
    r
}

/// Element-by-element transpose of `rows` from column `x0` on, writing
/// column `x` into `dst` row `x` starting at `y0`.
pub(super) fn transpose_wxh(rows: &[&[u8]], x0: usize, dst: &mut PlaneMut<'_, u8>, y0: usize) {
    let w = rows.first().map_or(0, |r| r.len());
    for x in x0..w {
        let d = &mut dst.row_mut(x)[y0..y0 + rows.len()];
        for (d, r) in d.iter_mut().zip(rows) {
            *d = r[x];
        }
    }
}

/// Eight rows of `w` samples laid end to end in `buf`.
#[inline]
pub(super) fn strip_rows(buf: &[u8], w: usize) -> [&[u8]; 8] {
    core::array::from_fn(|k| &buf[k * w..(k + 1) * w])
}

/// Deinterleave `rows` UV rows into `a` and `b`, each holding `rows` rows of
/// `w` samples.
pub(super) fn split_uv_rows(src: &Plane<'_, u8>, y0: usize, rows: usize, a: &mut [u8], b: &mut [u8]) {
    let w = src.width() / 2;
    for k in 0..rows {
        let (pairs, _) = src.row(y0 + k).as_chunks::<2>();
        let ra = &mut a[k * w..(k + 1) * w];
        let rb = &mut b[k * w..(k + 1) * w];
        for ((&[u, v], da), db) in pairs.iter().zip(ra).zip(rb) {
            *da = u;
            *db = v;
        }
    }
}

fn transpose_strip(rows: [&[u8]; 8], dst: &mut PlaneMut<'_, u8>, y0: usize) {
    let blocks = rows[0].len() / 8;
    for bx in 0..blocks {
        let tile = rows.map(|r| u64::from_le_bytes(r.as_chunks::<8>().0[bx]));
        for (k, v) in transpose_8x8(tile).into_iter().enumerate() {
            dst.row_mut(bx * 8 + k)[y0..y0 + 8].copy_from_slice(&v.to_le_bytes());
        }
    }
    transpose_wxh(&rows, blocks * 8, dst, y0);
}

pub(super) fn mirror_row(src: &[u8], dst: &mut [u8]) {
    for (d, &s) in dst.iter_mut().zip(src.iter().rev()) {
        *d = s;
    }
}

// ===========================================================================
// Scalar plane wrappers
// ===========================================================================

pub(super) fn transpose_impl_scalar(_t: ScalarToken, src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>) {
    let strips = src.height() / 8;
    for s in 0..strips {
        let y = s * 8;
        transpose_strip(core::array::from_fn(|k| src.row(y + k)), &mut dst, y);
    }
    for y in strips * 8..src.height() {
        transpose_wxh(&[src.row(y)], 0, &mut dst, y);
    }
}

pub(super) fn transpose_uv_impl_scalar(
    _t: ScalarToken,
    src: Plane<'_, u8>,
    mut dst_a: PlaneMut<'_, u8>,
    mut dst_b: PlaneMut<'_, u8>,
) {
    let w = src.width() / 2;
    let mut sa = vec![0u8; w * 8];
    let mut sb = vec![0u8; w * 8];
    let strips = src.height() / 8;
    for s in 0..strips {
        let y = s * 8;
        split_uv_rows(&src, y, 8, &mut sa, &mut sb);
        transpose_strip(strip_rows(&sa, w), &mut dst_a, y);
        transpose_strip(strip_rows(&sb, w), &mut dst_b, y);
    }
    for y in strips * 8..src.height() {
        split_uv_rows(&src, y, 1, &mut sa, &mut sb);
        transpose_wxh(&[&sa[..w]], 0, &mut dst_a, y);
        transpose_wxh(&[&sb[..w]], 0, &mut dst_b, y);
    }
}
