use archmage::{Arm64V2Token, arcane, rite};
use core::arch::aarch64::*;
use safe_unaligned_simd::aarch64 as simd_mem;

use super::scalar;
use super::{I422Layout, YuvConstants};
use crate::{Plane, PlaneMut};

// ===========================================================================
// YUV → RGB, 16 pixels per step
// ===========================================================================

struct YuvVecs {
    ub: uint16x8_t,
    vr: uint16x8_t,
    ug: uint16x8_t,
    vg: uint16x8_t,
    yg: uint16x8_t,
    bb: uint16x8_t,
    bg: uint16x8_t,
    br: uint16x8_t,
}

#[rite]
fn yuv_vecs_arm_v2(_token: Arm64V2Token, c: &YuvConstants) -> YuvVecs {
    let [ub, vr, ug, vg] = c.uv_coeff.map(u16::from);
    let [yg, bb, bg, br] = c.rgb_coeff_bias;
    YuvVecs {
        ub: vdupq_n_u16(ub),
        vr: vdupq_n_u16(vr),
        ug: vdupq_n_u16(ug),
        vg: vdupq_n_u16(vg),
        yg: vdupq_n_u16(yg),
        bb: vdupq_n_u16(bb),
        bg: vdupq_n_u16(bg),
        br: vdupq_n_u16(br),
    }
}

/// Eight pixels of 16-bit Y, U, V → 8-bit B, G, R.
#[rite]
fn yuv_8px_arm_v2(
    _token: Arm64V2Token,
    y: uint16x8_t,
    u: uint16x8_t,
    v: uint16x8_t,
    k: &YuvVecs,
) -> (uint8x8_t, uint8x8_t, uint8x8_t) {
    let y = vorrq_u16(y, vshlq_n_u16::<8>(y));
    let y1 = vcombine_u16(
        vshrn_n_u32::<16>(vmull_u16(vget_low_u16(y), vget_low_u16(k.yg))),
        vshrn_n_u32::<16>(vmull_high_u16(y, k.yg)),
    );
    let b = vqsubq_u16(vaddq_u16(y1, vmulq_u16(u, k.ub)), k.bb);
    let uv_g = vaddq_u16(vmulq_u16(u, k.ug), vmulq_u16(v, k.vg));
    let g = vqsubq_u16(vaddq_u16(y1, k.bg), uv_g);
    let r = vqsubq_u16(vaddq_u16(y1, vmulq_u16(v, k.vr)), k.br);
    (vqshrn_n_u16::<6>(b), vqshrn_n_u16::<6>(g), vqshrn_n_u16::<6>(r))
}

#[rite]
fn yuv_16px_arm_v2(
    t: Arm64V2Token,
    y: &[u8; 16],
    u: &[u8; 8],
    v: &[u8; 8],
    k: &YuvVecs,
) -> (uint8x16_t, uint8x16_t, uint8x16_t) {
    let y = simd_mem::vld1q_u8(y);
    let u = simd_mem::vld1_u8(u);
    let v = simd_mem::vld1_u8(v);
    let (u_lo, u_hi) = (vzip1_u8(u, u), vzip2_u8(u, u));
    let (v_lo, v_hi) = (vzip1_u8(v, v), vzip2_u8(v, v));
    let (b0, g0, r0) = yuv_8px_arm_v2(
        t,
        vmovl_u8(vget_low_u8(y)),
        vmovl_u8(u_lo),
        vmovl_u8(v_lo),
        k,
    );
    let (b1, g1, r1) = yuv_8px_arm_v2(t, vmovl_high_u8(y), vmovl_u8(u_hi), vmovl_u8(v_hi), k);
    (vcombine_u8(b0, b1), vcombine_u8(g0, g1), vcombine_u8(r0, r1))
}

// ===========================================================================
// ARM NEON: rite row implementations
// ===========================================================================

#[rite]
pub(super) fn i422_to_argb_row_arm_v2(
    t: Arm64V2Token,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    c: &YuvConstants,
) {
    let k = yuv_vecs_arm_v2(t, c);
    let alpha = vdupq_n_u8(0xFF);
    let (ys, _) = y.as_chunks::<16>();
    let (us, _) = u.as_chunks::<8>();
    let (vs, _) = v.as_chunks::<8>();
    let (ds, _) = dst.as_chunks_mut::<64>();
    let mut n = 0;
    for (((y, u), v), d) in ys.iter().zip(us).zip(vs).zip(ds) {
        let (b, g, r) = yuv_16px_arm_v2(t, y, u, v, &k);
        simd_mem::vst4q_u8(d, uint8x16x4_t(b, g, r, alpha));
        n += 16;
    }
    scalar::i422_to_argb_row(&y[n..], &u[n / 2..], &v[n / 2..], &mut dst[n * 4..], c);
}

#[rite]
pub(super) fn i422_to_rgba_row_arm_v2(
    t: Arm64V2Token,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    c: &YuvConstants,
) {
    let k = yuv_vecs_arm_v2(t, c);
    let alpha = vdupq_n_u8(0xFF);
    let (ys, _) = y.as_chunks::<16>();
    let (us, _) = u.as_chunks::<8>();
    let (vs, _) = v.as_chunks::<8>();
    let (ds, _) = dst.as_chunks_mut::<64>();
    let mut n = 0;
    for (((y, u), v), d) in ys.iter().zip(us).zip(vs).zip(ds) {
        let (b, g, r) = yuv_16px_arm_v2(t, y, u, v, &k);
        simd_mem::vst4q_u8(d, uint8x16x4_t(alpha, b, g, r));
        n += 16;
    }
    scalar::i422_to_rgba_row(&y[n..], &u[n / 2..], &v[n / 2..], &mut dst[n * 4..], c);
}

#[rite]
pub(super) fn i422_to_rgb24_row_arm_v2(
    t: Arm64V2Token,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    c: &YuvConstants,
) {
    let k = yuv_vecs_arm_v2(t, c);
    let (ys, _) = y.as_chunks::<16>();
    let (us, _) = u.as_chunks::<8>();
    let (vs, _) = v.as_chunks::<8>();
    let (ds, _) = dst.as_chunks_mut::<48>();
    let mut n = 0;
    for (((y, u), v), d) in ys.iter().zip(us).zip(vs).zip(ds) {
        let (b, g, r) = yuv_16px_arm_v2(t, y, u, v, &k);
        simd_mem::vst3q_u8(d, uint8x16x3_t(b, g, r));
        n += 16;
    }
    scalar::i422_to_rgb24_row(&y[n..], &u[n / 2..], &v[n / 2..], &mut dst[n * 3..], c);
}

const BR_SHUF_BYTES: [u8; 16] = [2, 1, 0, 3, 6, 5, 4, 7, 10, 9, 8, 11, 14, 13, 12, 15];

/// 16 bytes → 16 replicated u16 lanes.
#[rite]
fn expand_16_arm_v2(_token: Arm64V2Token, v: uint8x16_t, d: &mut [u16; 16]) {
    // zip(v, v) puts each byte in both halves of a 16-bit lane
    let (halves, _) = d.as_chunks_mut::<8>();
    simd_mem::vst1q_u16(&mut halves[0], vreinterpretq_u16_u8(vzip1q_u8(v, v)));
    simd_mem::vst1q_u16(&mut halves[1], vreinterpretq_u16_u8(vzip2q_u8(v, v)));
}

#[rite]
fn contract_16_arm_v2(_token: Arm64V2Token, s: &[u16; 16]) -> uint8x16_t {
    let (halves, _) = s.as_chunks::<8>();
    let lo = vshrn_n_u16::<8>(simd_mem::vld1q_u16(&halves[0]));
    let hi = vshrn_n_u16::<8>(simd_mem::vld1q_u16(&halves[1]));
    vcombine_u8(lo, hi)
}

#[rite]
pub(super) fn expand_row_arm_v2(t: Arm64V2Token, src: &[u8], dst: &mut [u16]) {
    let (ss, _) = src.as_chunks::<16>();
    let (ds, _) = dst.as_chunks_mut::<16>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        expand_16_arm_v2(t, simd_mem::vld1q_u8(s), d);
    }
    scalar::expand_row(&src[n..], &mut dst[n..]);
}

#[rite]
pub(super) fn expand_swap_br_row_arm_v2(t: Arm64V2Token, src: &[u8], dst: &mut [u16]) {
    let mask = simd_mem::vld1q_u8(&BR_SHUF_BYTES);
    let (ss, _) = src.as_chunks::<16>();
    let (ds, _) = dst.as_chunks_mut::<16>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        expand_16_arm_v2(t, vqtbl1q_u8(simd_mem::vld1q_u8(s), mask), d);
    }
    scalar::expand_swap_br_row(&src[n..], &mut dst[n..]);
}

#[rite]
pub(super) fn contract_row_arm_v2(t: Arm64V2Token, src: &[u16], dst: &mut [u8]) {
    let (ss, _) = src.as_chunks::<16>();
    let (ds, _) = dst.as_chunks_mut::<16>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        simd_mem::vst1q_u8(d, contract_16_arm_v2(t, s));
    }
    scalar::contract_row(&src[n..], &mut dst[n..]);
}

#[rite]
pub(super) fn contract_swap_br_row_arm_v2(t: Arm64V2Token, src: &[u16], dst: &mut [u8]) {
    let mask = simd_mem::vld1q_u8(&BR_SHUF_BYTES);
    let (ss, _) = src.as_chunks::<16>();
    let (ds, _) = dst.as_chunks_mut::<16>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        simd_mem::vst1q_u8(d, vqtbl1q_u8(contract_16_arm_v2(t, s), mask));
    }
    scalar::contract_swap_br_row(&src[n..], &mut dst[n..]);
}

#[rite]
pub(super) fn rgb24_to_argb_row_arm_v2(_token: Arm64V2Token, src: &[u8], dst: &mut [u8]) {
    let alpha = vdupq_n_u8(0xFF);
    let (ss, _) = src.as_chunks::<48>();
    let (ds, _) = dst.as_chunks_mut::<64>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        let bgr = simd_mem::vld3q_u8(s);
        simd_mem::vst4q_u8(d, uint8x16x4_t(bgr.0, bgr.1, bgr.2, alpha));
    }
    scalar::rgb24_to_argb_row(&src[n * 3..], &mut dst[n * 4..]);
}

#[rite]
pub(super) fn raw_to_argb_row_arm_v2(_token: Arm64V2Token, src: &[u8], dst: &mut [u8]) {
    let alpha = vdupq_n_u8(0xFF);
    let (ss, _) = src.as_chunks::<48>();
    let (ds, _) = dst.as_chunks_mut::<64>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        let rgb = simd_mem::vld3q_u8(s);
        simd_mem::vst4q_u8(d, uint8x16x4_t(rgb.2, rgb.1, rgb.0, alpha));
    }
    scalar::raw_to_argb_row(&src[n * 3..], &mut dst[n * 4..]);
}

#[rite]
pub(super) fn raw_to_rgba_row_arm_v2(_token: Arm64V2Token, src: &[u8], dst: &mut [u8]) {
    let alpha = vdupq_n_u8(0xFF);
    let (ss, _) = src.as_chunks::<48>();
    let (ds, _) = dst.as_chunks_mut::<64>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        let rgb = simd_mem::vld3q_u8(s);
        simd_mem::vst4q_u8(d, uint8x16x4_t(alpha, rgb.2, rgb.1, rgb.0));
    }
    scalar::raw_to_rgba_row(&src[n * 3..], &mut dst[n * 4..]);
}

#[rite]
pub(super) fn raw_to_rgb24_row_arm_v2(_token: Arm64V2Token, src: &[u8], dst: &mut [u8]) {
    let (ss, _) = src.as_chunks::<48>();
    let (ds, _) = dst.as_chunks_mut::<48>();
    let n = ss.len().min(ds.len()) * 48;
    for (s, d) in ss.iter().zip(ds) {
        let rgb = simd_mem::vld3q_u8(s);
        simd_mem::vst3q_u8(d, uint8x16x3_t(rgb.2, rgb.1, rgb.0));
    }
    scalar::raw_to_rgb24_row(&src[n..], &mut dst[n..]);
}

#[rite]
pub(super) fn argb_to_rgb24_row_arm_v2(_token: Arm64V2Token, src: &[u8], dst: &mut [u8]) {
    let (ss, _) = src.as_chunks::<64>();
    let (ds, _) = dst.as_chunks_mut::<48>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        let bgra = simd_mem::vld4q_u8(s);
        simd_mem::vst3q_u8(d, uint8x16x3_t(bgra.0, bgra.1, bgra.2));
    }
    scalar::argb_to_rgb24_row(&src[n * 4..], &mut dst[n * 3..]);
}

#[rite]
pub(super) fn argb_to_raw_row_arm_v2(_token: Arm64V2Token, src: &[u8], dst: &mut [u8]) {
    let (ss, _) = src.as_chunks::<64>();
    let (ds, _) = dst.as_chunks_mut::<48>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        let bgra = simd_mem::vld4q_u8(s);
        simd_mem::vst3q_u8(d, uint8x16x3_t(bgra.2, bgra.1, bgra.0));
    }
    scalar::argb_to_raw_row(&src[n * 4..], &mut dst[n * 3..]);
}

#[rite]
pub(super) fn split_rgb_row_arm_v2(
    _token: Arm64V2Token,
    src: &[u8],
    r: &mut [u8],
    g: &mut [u8],
    b: &mut [u8],
) {
    let (ss, _) = src.as_chunks::<48>();
    let (rs, _) = r.as_chunks_mut::<16>();
    let (gs, _) = g.as_chunks_mut::<16>();
    let (bs, _) = b.as_chunks_mut::<16>();
    let n = ss.len() * 16;
    for (((s, r), g), b) in ss.iter().zip(rs).zip(gs).zip(bs) {
        let rgb = simd_mem::vld3q_u8(s);
        simd_mem::vst1q_u8(r, rgb.0);
        simd_mem::vst1q_u8(g, rgb.1);
        simd_mem::vst1q_u8(b, rgb.2);
    }
    scalar::split_rgb_row(&src[n * 3..], &mut r[n..], &mut g[n..], &mut b[n..]);
}

#[rite]
pub(super) fn merge_rgb_row_arm_v2(
    _token: Arm64V2Token,
    r: &[u8],
    g: &[u8],
    b: &[u8],
    dst: &mut [u8],
) {
    let (rs, _) = r.as_chunks::<16>();
    let (gs, _) = g.as_chunks::<16>();
    let (bs, _) = b.as_chunks::<16>();
    let (ds, _) = dst.as_chunks_mut::<48>();
    let n = ds.len() * 16;
    for (((r, g), b), d) in rs.iter().zip(gs).zip(bs).zip(ds) {
        let rgb = uint8x16x3_t(simd_mem::vld1q_u8(r), simd_mem::vld1q_u8(g), simd_mem::vld1q_u8(b));
        simd_mem::vst3q_u8(d, rgb);
    }
    scalar::merge_rgb_row(&r[n..], &g[n..], &b[n..], &mut dst[n * 3..]);
}

#[rite]
pub(super) fn split_argb_row_arm_v2(
    _token: Arm64V2Token,
    src: &[u8],
    r: &mut [u8],
    g: &mut [u8],
    b: &mut [u8],
    a: &mut [u8],
) {
    let (ss, _) = src.as_chunks::<64>();
    let (rs, _) = r.as_chunks_mut::<16>();
    let (gs, _) = g.as_chunks_mut::<16>();
    let (bs, _) = b.as_chunks_mut::<16>();
    let (as_, _) = a.as_chunks_mut::<16>();
    let n = ss.len() * 16;
    for ((((s, r), g), b), a) in ss.iter().zip(rs).zip(gs).zip(bs).zip(as_) {
        let bgra = simd_mem::vld4q_u8(s);
        simd_mem::vst1q_u8(b, bgra.0);
        simd_mem::vst1q_u8(g, bgra.1);
        simd_mem::vst1q_u8(r, bgra.2);
        simd_mem::vst1q_u8(a, bgra.3);
    }
    scalar::split_argb_row(
        &src[n * 4..],
        &mut r[n..],
        &mut g[n..],
        &mut b[n..],
        &mut a[n..],
    );
}

#[rite]
pub(super) fn merge_argb_row_arm_v2(
    _token: Arm64V2Token,
    r: &[u8],
    g: &[u8],
    b: &[u8],
    a: &[u8],
    dst: &mut [u8],
) {
    let (rs, _) = r.as_chunks::<16>();
    let (gs, _) = g.as_chunks::<16>();
    let (bs, _) = b.as_chunks::<16>();
    let (as_, _) = a.as_chunks::<16>();
    let (ds, _) = dst.as_chunks_mut::<64>();
    let n = ds.len() * 16;
    for ((((r, g), b), a), d) in rs.iter().zip(gs).zip(bs).zip(as_).zip(ds) {
        let bgra = uint8x16x4_t(
            simd_mem::vld1q_u8(b),
            simd_mem::vld1q_u8(g),
            simd_mem::vld1q_u8(r),
            simd_mem::vld1q_u8(a),
        );
        simd_mem::vst4q_u8(d, bgra);
    }
    scalar::merge_argb_row(&r[n..], &g[n..], &b[n..], &a[n..], &mut dst[n * 4..]);
}

// ===========================================================================
// ARM arcane contiguous wrappers
// ===========================================================================

#[arcane]
pub(super) fn i422_to_argb_impl_arm_v2(
    t: Arm64V2Token,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    d: &mut [u8],
    c: &YuvConstants,
) {
    i422_to_argb_row_arm_v2(t, y, u, v, d, c);
}
#[arcane]
pub(super) fn i422_to_rgba_impl_arm_v2(
    t: Arm64V2Token,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    d: &mut [u8],
    c: &YuvConstants,
) {
    i422_to_rgba_row_arm_v2(t, y, u, v, d, c);
}
#[arcane]
pub(super) fn i422_to_rgb24_impl_arm_v2(
    t: Arm64V2Token,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    d: &mut [u8],
    c: &YuvConstants,
) {
    i422_to_rgb24_row_arm_v2(t, y, u, v, d, c);
}
#[arcane]
pub(super) fn expand_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u16]) {
    expand_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn expand_swap_br_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u16]) {
    expand_swap_br_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn contract_impl_arm_v2(t: Arm64V2Token, s: &[u16], d: &mut [u8]) {
    contract_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn contract_swap_br_impl_arm_v2(t: Arm64V2Token, s: &[u16], d: &mut [u8]) {
    contract_swap_br_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn rgb24_to_argb_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u8]) {
    rgb24_to_argb_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn raw_to_argb_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u8]) {
    raw_to_argb_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn raw_to_rgba_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u8]) {
    raw_to_rgba_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn raw_to_rgb24_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u8]) {
    raw_to_rgb24_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn argb_to_rgb24_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u8]) {
    argb_to_rgb24_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn argb_to_raw_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u8]) {
    argb_to_raw_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn split_rgb_impl_arm_v2(
    t: Arm64V2Token,
    s: &[u8],
    r: &mut [u8],
    g: &mut [u8],
    b: &mut [u8],
) {
    split_rgb_row_arm_v2(t, s, r, g, b);
}
#[arcane]
pub(super) fn merge_rgb_impl_arm_v2(t: Arm64V2Token, r: &[u8], g: &[u8], b: &[u8], d: &mut [u8]) {
    merge_rgb_row_arm_v2(t, r, g, b, d);
}
#[arcane]
pub(super) fn split_argb_impl_arm_v2(
    t: Arm64V2Token,
    s: &[u8],
    r: &mut [u8],
    g: &mut [u8],
    b: &mut [u8],
    a: &mut [u8],
) {
    split_argb_row_arm_v2(t, s, r, g, b, a);
}
#[arcane]
pub(super) fn merge_argb_impl_arm_v2(
    t: Arm64V2Token,
    r: &[u8],
    g: &[u8],
    b: &[u8],
    a: &[u8],
    d: &mut [u8],
) {
    merge_argb_row_arm_v2(t, r, g, b, a, d);
}

// ===========================================================================
// ARM arcane plane wrappers
// ===========================================================================

#[arcane]
pub(super) fn i422_plane_arm_v2(
    t: Arm64V2Token,
    y: Plane<'_, u8>,
    u: Plane<'_, u8>,
    v: Plane<'_, u8>,
    mut dst: PlaneMut<'_, u8>,
    c: &YuvConstants,
    layout: I422Layout,
) {
    for row in 0..y.height() {
        let (yr, ur, vr) = (y.row(row), u.row(row), v.row(row));
        let d = dst.row_mut(row);
        match layout {
            I422Layout::Argb => i422_to_argb_row_arm_v2(t, yr, ur, vr, d, c),
            I422Layout::Rgba => i422_to_rgba_row_arm_v2(t, yr, ur, vr, d, c),
            I422Layout::Rgb24 => i422_to_rgb24_row_arm_v2(t, yr, ur, vr, d, c),
        }
    }
}
