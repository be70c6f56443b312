use alloc::vec;

use archmage::{Arm64V2Token, arcane, rite};
use core::arch::aarch64::*;
use safe_unaligned_simd::aarch64 as simd_mem;

use super::scalar;
use crate::{Plane, PlaneMut};

/// 8×8 tile through `vtrn` at 8, 16 and 32 bits. Each result holds output
/// rows `2k` (low half) and `2k + 1` (high half).
#[rite]
fn transpose_8x8_arm_v2(_token: Arm64V2Token, r: [&[u8; 8]; 8]) -> [uint8x16_t; 4] {
    let t01 = vtrn_u8(simd_mem::vld1_u8(r[0]), simd_mem::vld1_u8(r[1]));
    let t23 = vtrn_u8(simd_mem::vld1_u8(r[2]), simd_mem::vld1_u8(r[3]));
    let t45 = vtrn_u8(simd_mem::vld1_u8(r[4]), simd_mem::vld1_u8(r[5]));
    let t67 = vtrn_u8(simd_mem::vld1_u8(r[6]), simd_mem::vld1_u8(r[7]));

    let u02 = vtrn_u16(vreinterpret_u16_u8(t01.0), vreinterpret_u16_u8(t23.0));
    let u13 = vtrn_u16(vreinterpret_u16_u8(t01.1), vreinterpret_u16_u8(t23.1));
    let u46 = vtrn_u16(vreinterpret_u16_u8(t45.0), vreinterpret_u16_u8(t67.0));
    let u57 = vtrn_u16(vreinterpret_u16_u8(t45.1), vreinterpret_u16_u8(t67.1));

    // columns 0/4, 1/5, 2/6, 3/7
    let v04 = vtrn_u32(vreinterpret_u32_u16(u02.0), vreinterpret_u32_u16(u46.0));
    let v15 = vtrn_u32(vreinterpret_u32_u16(u13.0), vreinterpret_u32_u16(u57.0));
    let v26 = vtrn_u32(vreinterpret_u32_u16(u02.1), vreinterpret_u32_u16(u46.1));
    let v37 = vtrn_u32(vreinterpret_u32_u16(u13.1), vreinterpret_u32_u16(u57.1));

    [
        vcombine_u8(vreinterpret_u8_u32(v04.0), vreinterpret_u8_u32(v15.0)),
        vcombine_u8(vreinterpret_u8_u32(v26.0), vreinterpret_u8_u32(v37.0)),
        vcombine_u8(vreinterpret_u8_u32(v04.1), vreinterpret_u8_u32(v15.1)),
        vcombine_u8(vreinterpret_u8_u32(v26.1), vreinterpret_u8_u32(v37.1)),
    ]
}

#[rite]
fn transpose_strip_arm_v2(t: Arm64V2Token, rows: [&[u8]; 8], dst: &mut PlaneMut<'_, u8>, y0: usize) {
    let blocks = rows[0].len() / 8;
    let mut tmp = [0u8; 16];
    for bx in 0..blocks {
        let tile = core::array::from_fn(|k| &rows[k].as_chunks::<8>().0[bx]);
        for (k, pair) in transpose_8x8_arm_v2(t, tile).into_iter().enumerate() {
            simd_mem::vst1q_u8(&mut tmp, pair);
            let x = bx * 8 + 2 * k;
            dst.row_mut(x)[y0..y0 + 8].copy_from_slice(&tmp[..8]);
            dst.row_mut(x + 1)[y0..y0 + 8].copy_from_slice(&tmp[8..]);
        }
    }
    scalar::transpose_wxh(&rows, blocks * 8, dst, y0);
}

/// 16×16 tile through `trn1`/`trn2` at 64, 32, 16 and 8 bits, coarsest
/// first. Result `c` is output row `c`.
#[rite]
fn transpose_16x16_arm_v2(_token: Arm64V2Token, r: [&[u8; 16]; 16]) -> [uint8x16_t; 16] {
    let mut v = [vdupq_n_u8(0); 16];
    for (d, s) in v.iter_mut().zip(r) {
        *d = simd_mem::vld1q_u8(s);
    }
    let mut t = v;

    // 8-byte halves of rows i and i + 8
    for i in 0..8 {
        let (p, q) = (vreinterpretq_u64_u8(v[i]), vreinterpretq_u64_u8(v[i + 8]));
        t[i] = vreinterpretq_u8_u64(vtrn1q_u64(p, q));
        t[i + 8] = vreinterpretq_u8_u64(vtrn2q_u64(p, q));
    }
    for base in [0, 8] {
        for i in base..base + 4 {
            let (p, q) = (vreinterpretq_u32_u8(t[i]), vreinterpretq_u32_u8(t[i + 4]));
            v[i] = vreinterpretq_u8_u32(vtrn1q_u32(p, q));
            v[i + 4] = vreinterpretq_u8_u32(vtrn2q_u32(p, q));
        }
    }
    for base in [0, 4, 8, 12] {
        for i in base..base + 2 {
            let (p, q) = (vreinterpretq_u16_u8(v[i]), vreinterpretq_u16_u8(v[i + 2]));
            t[i] = vreinterpretq_u8_u16(vtrn1q_u16(p, q));
            t[i + 2] = vreinterpretq_u8_u16(vtrn2q_u16(p, q));
        }
    }
    for i in (0..16).step_by(2) {
        v[i] = vtrn1q_u8(t[i], t[i + 1]);
        v[i + 1] = vtrn2q_u8(t[i], t[i + 1]);
    }
    v
}

#[rite]
fn transpose_strip16_arm_v2(t: Arm64V2Token, rows: [&[u8]; 16], dst: &mut PlaneMut<'_, u8>, y0: usize) {
    let blocks = rows[0].len() / 16;
    let mut tmp = [0u8; 16];
    for bx in 0..blocks {
        let tile = core::array::from_fn(|k| &rows[k].as_chunks::<16>().0[bx]);
        for (c, col) in transpose_16x16_arm_v2(t, tile).into_iter().enumerate() {
            simd_mem::vst1q_u8(&mut tmp, col);
            dst.row_mut(bx * 16 + c)[y0..y0 + 16].copy_from_slice(&tmp);
        }
    }
    scalar::transpose_wxh(&rows, blocks * 16, dst, y0);
}

// ===========================================================================
// ARM arcane plane wrappers
// ===========================================================================

#[arcane]
pub(super) fn transpose_impl_arm_v2(t: Arm64V2Token, src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>) {
    let h = src.height();
    let mut y = 0;
    while y + 16 <= h {
        transpose_strip16_arm_v2(t, core::array::from_fn(|k| src.row(y + k)), &mut dst, y);
        y += 16;
    }
    if y + 8 <= h {
        transpose_strip_arm_v2(t, core::array::from_fn(|k| src.row(y + k)), &mut dst, y);
        y += 8;
    }
    for y in y..h {
        scalar::transpose_wxh(&[src.row(y)], 0, &mut dst, y);
    }
}

#[arcane]
pub(super) fn transpose_uv_impl_arm_v2(
    t: Arm64V2Token,
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
        transpose_strip_arm_v2(t, scalar::strip_rows(&sa, w), &mut dst_a, y);
        transpose_strip_arm_v2(t, scalar::strip_rows(&sb, w), &mut dst_b, y);
    }
    for y in strips * 8..src.height() {
        scalar::split_uv_rows(&src, y, 1, &mut sa, &mut sb);
        scalar::transpose_wxh(&[&sa[..w]], 0, &mut dst_a, y);
        scalar::transpose_wxh(&[&sb[..w]], 0, &mut dst_b, y);
    }
}
