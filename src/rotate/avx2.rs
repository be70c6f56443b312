use alloc::vec;

use archmage::prelude::*;
use safe_unaligned_simd::x86_64::{_mm_loadu_si64, _mm_storeu_si128};

use super::scalar;
use crate::{Plane, PlaneMut};

/// 8×8 tile through byte, word and dword unpacks. Each result holds two
/// output rows: columns `2k` (low 8 bytes) and `2k + 1` (high 8 bytes).
#[rite]
fn transpose_8x8_v3(_token: X64V3Token, r: [&[u8; 8]; 8]) -> [__m128i; 4] {
    let a0 = _mm_unpacklo_epi8(_mm_loadu_si64(r[0]), _mm_loadu_si64(r[1]));
    let a1 = _mm_unpacklo_epi8(_mm_loadu_si64(r[2]), _mm_loadu_si64(r[3]));
    let a2 = _mm_unpacklo_epi8(_mm_loadu_si64(r[4]), _mm_loadu_si64(r[5]));
    let a3 = _mm_unpacklo_epi8(_mm_loadu_si64(r[6]), _mm_loadu_si64(r[7]));

    let b0 = _mm_unpacklo_epi16(a0, a1);
    let b1 = _mm_unpackhi_epi16(a0, a1);
    let b2 = _mm_unpacklo_epi16(a2, a3);
    let b3 = _mm_unpackhi_epi16(a2, a3);

    [
        _mm_unpacklo_epi32(b0, b2),
        _mm_unpackhi_epi32(b0, b2),
        _mm_unpacklo_epi32(b1, b3),
        _mm_unpackhi_epi32(b1, b3),
    ]
}

#[rite]
fn transpose_strip_v3(t: X64V3Token, rows: [&[u8]; 8], dst: &mut PlaneMut<'_, u8>, y0: usize) {
    let blocks = rows[0].len() / 8;
    let mut tmp = [0u8; 16];
    for bx in 0..blocks {
        let tile = core::array::from_fn(|k| &rows[k].as_chunks::<8>().0[bx]);
        for (k, pair) in transpose_8x8_v3(t, tile).into_iter().enumerate() {
            _mm_storeu_si128(&mut tmp, pair);
            let x = bx * 8 + 2 * k;
            dst.row_mut(x)[y0..y0 + 8].copy_from_slice(&tmp[..8]);
            dst.row_mut(x + 1)[y0..y0 + 8].copy_from_slice(&tmp[8..]);
        }
    }
    scalar::transpose_wxh(&rows, blocks * 8, dst, y0);
}

// ===========================================================================
// x86-64 arcane plane wrappers
// ===========================================================================

#[arcane]
pub(super) fn transpose_impl_v3(t: X64V3Token, src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>) {
    let strips = src.height() / 8;
    for s in 0..strips {
        let y = s * 8;
        transpose_strip_v3(t, core::array::from_fn(|k| src.row(y + k)), &mut dst, y);
    }
    for y in strips * 8..src.height() {
        scalar::transpose_wxh(&[src.row(y)], 0, &mut dst, y);
    }
}

#[arcane]
pub(super) fn transpose_uv_impl_v3(
    t: X64V3Token,
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
        scalar::split_uv_rows(&src, y, 8, &mut sa, &mut sb);
        transpose_strip_v3(t, scalar::strip_rows(&sa, w), &mut dst_a, y);
        transpose_strip_v3(t, scalar::strip_rows(&sb, w), &mut dst_b, y);
    }
    for y in strips * 8..src.height() {
        scalar::split_uv_rows(&src, y, 1, &mut sa, &mut sb);
        scalar::transpose_wxh(&[&sa[..w]], 0, &mut dst_a, y);
        scalar::transpose_wxh(&[&sb[..w]], 0, &mut dst_b, y);
    }
}
