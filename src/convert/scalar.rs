use archmage::prelude::*;

use super::{I422Layout, YuvConstants};
use crate::{Plane, PlaneMut};

// ===========================================================================
// YUV → RGB
// ===========================================================================

/// One pixel through the fixed-point matrix. Returns `[B, G, R]`.
///
/// Sums wrap at 16 bits and differences saturate at zero, lane for lane
/// what the vector tiers do.
#[inline(always)]
pub(super) fn yuv_pixel(y: u8, u: u8, v: u8, c: &YuvConstants) -> [u8; 3] {
    let [ub, vr, ug, vg] = c.uv_coeff.map(u16::from);
    let [yg, bb, bg, br] = c.rgb_coeff_bias;
    let (u, v) = (u16::from(u), u16::from(v));
    let y16 = u32::from(u16::from(y) * 0x0101);
    let y1 = ((y16 * u32::from(yg)) >> 16) as u16;
    let b = y1.wrapping_add(u * ub).saturating_sub(bb);
    let g = y1.wrapping_add(bg).saturating_sub((u * ug).wrapping_add(v * vg));
    let r = y1.wrapping_add(v * vr).saturating_sub(br);
    [clip6(b), clip6(g), clip6(r)]
}

#[inline(always)]
fn clip6(v: u16) -> u8 {
    (v >> 6).min(255) as u8
}

#[inline(always)]
fn i422_row<const N: usize>(
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    c: &YuvConstants,
    pack: impl Fn([u8; 3]) -> [u8; N],
) {
    let (px, _) = dst.as_chunks_mut::<N>();
    for (x, (d, &yv)) in px.iter_mut().zip(y).enumerate() {
        *d = pack(yuv_pixel(yv, u[x / 2], v[x / 2], c));
    }
}

pub(super) fn i422_to_argb_row(y: &[u8], u: &[u8], v: &[u8], dst: &mut [u8], c: &YuvConstants) {
    i422_row(y, u, v, dst, c, |[b, g, r]| [b, g, r, 0xFF]);
}

pub(super) fn i422_to_rgba_row(y: &[u8], u: &[u8], v: &[u8], dst: &mut [u8], c: &YuvConstants) {
    i422_row(y, u, v, dst, c, |[b, g, r]| [0xFF, b, g, r]);
}

pub(super) fn i422_to_rgb24_row(y: &[u8], u: &[u8], v: &[u8], dst: &mut [u8], c: &YuvConstants) {
    i422_row(y, u, v, dst, c, |bgr| bgr);
}

// ===========================================================================
// 8 ↔ 16 bit
// ===========================================================================

pub(super) fn expand_row(src: &[u8], dst: &mut [u16]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = u16::from(s) * 0x0101;
    }
}

pub(super) fn expand_swap_br_row(src: &[u8], dst: &mut [u16]) {
    let (s4, _) = src.as_chunks::<4>();
    let (d4, _) = dst.as_chunks_mut::<4>();
    for (d, &[b, g, r, a]) in d4.iter_mut().zip(s4) {
        *d = [r, g, b, a].map(|c| u16::from(c) * 0x0101);
    }
}

pub(super) fn contract_row(src: &[u16], dst: &mut [u8]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = (s >> 8) as u8;
    }
}

pub(super) fn contract_swap_br_row(src: &[u16], dst: &mut [u8]) {
    let (s4, _) = src.as_chunks::<4>();
    let (d4, _) = dst.as_chunks_mut::<4>();
    for (d, &[r, g, b, a]) in d4.iter_mut().zip(s4) {
        *d = [b, g, r, a].map(|c| (c >> 8) as u8);
    }
}

// ===========================================================================
// Channel reorders
// ===========================================================================

/// Apply `f` to every 3-byte source pixel, writing 4-byte pixels.
#[inline(always)]
fn map_3_to_4(src: &[u8], dst: &mut [u8], f: impl Fn([u8; 3]) -> [u8; 4]) {
    let (s3, _) = src.as_chunks::<3>();
    let (d4, _) = dst.as_chunks_mut::<4>();
    for (d, &s) in d4.iter_mut().zip(s3) {
        *d = f(s);
    }
}

#[inline(always)]
fn map_4_to_3(src: &[u8], dst: &mut [u8], f: impl Fn([u8; 4]) -> [u8; 3]) {
    let (s4, _) = src.as_chunks::<4>();
    let (d3, _) = dst.as_chunks_mut::<3>();
    for (d, &s) in d3.iter_mut().zip(s4) {
        *d = f(s);
    }
}

pub(super) fn rgb24_to_argb_row(src: &[u8], dst: &mut [u8]) {
    map_3_to_4(src, dst, |[b, g, r]| [b, g, r, 0xFF]);
}

pub(super) fn raw_to_argb_row(src: &[u8], dst: &mut [u8]) {
    map_3_to_4(src, dst, |[r, g, b]| [b, g, r, 0xFF]);
}

pub(super) fn raw_to_rgba_row(src: &[u8], dst: &mut [u8]) {
    map_3_to_4(src, dst, |[r, g, b]| [0xFF, b, g, r]);
}

pub(super) fn raw_to_rgb24_row(src: &[u8], dst: &mut [u8]) {
    let (s3, _) = src.as_chunks::<3>();
    let (d3, _) = dst.as_chunks_mut::<3>();
    for (d, &[r, g, b]) in d3.iter_mut().zip(s3) {
        *d = [b, g, r];
    }
}

pub(super) fn argb_to_rgb24_row(src: &[u8], dst: &mut [u8]) {
    map_4_to_3(src, dst, |[b, g, r, _]| [b, g, r]);
}

pub(super) fn argb_to_raw_row(src: &[u8], dst: &mut [u8]) {
    map_4_to_3(src, dst, |[b, g, r, _]| [r, g, b]);
}

// ===========================================================================
// Planar ↔ packed
// ===========================================================================

pub(super) fn split_rgb_row(src: &[u8], r: &mut [u8], g: &mut [u8], b: &mut [u8]) {
    let (s3, _) = src.as_chunks::<3>();
    for (((s, r), g), b) in s3.iter().zip(r).zip(g).zip(b) {
        [*r, *g, *b] = *s;
    }
}

pub(super) fn merge_rgb_row(r: &[u8], g: &[u8], b: &[u8], dst: &mut [u8]) {
    let (d3, _) = dst.as_chunks_mut::<3>();
    for (((d, &r), &g), &b) in d3.iter_mut().zip(r).zip(g).zip(b) {
        *d = [r, g, b];
    }
}

pub(super) fn split_argb_row(
    src: &[u8],
    r: &mut [u8],
    g: &mut [u8],
    b: &mut [u8],
    a: &mut [u8],
) {
    let (s4, _) = src.as_chunks::<4>();
    for ((((s, r), g), b), a) in s4.iter().zip(r).zip(g).zip(b).zip(a) {
        [*b, *g, *r, *a] = *s;
    }
}

pub(super) fn merge_argb_row(r: &[u8], g: &[u8], b: &[u8], a: &[u8], dst: &mut [u8]) {
    let (d4, _) = dst.as_chunks_mut::<4>();
    for ((((d, &r), &g), &b), &a) in d4.iter_mut().zip(r).zip(g).zip(b).zip(a) {
        *d = [b, g, r, a];
    }
}

pub(super) fn split_xrgb_row(src: &[u8], r: &mut [u8], g: &mut [u8], b: &mut [u8]) {
    let (s4, _) = src.as_chunks::<4>();
    for (((&[sb, sg, sr, _], r), g), b) in s4.iter().zip(r).zip(g).zip(b) {
        (*r, *g, *b) = (sr, sg, sb);
    }
}

pub(super) fn merge_xrgb_row(r: &[u8], g: &[u8], b: &[u8], dst: &mut [u8]) {
    let (d4, _) = dst.as_chunks_mut::<4>();
    for (((d, &r), &g), &b) in d4.iter_mut().zip(r).zip(g).zip(b) {
        *d = [b, g, r, 0xFF];
    }
}

// ===========================================================================
// Scalar dispatch targets
// ===========================================================================

pub(super) fn i422_to_argb_impl_scalar(
    _t: ScalarToken,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    d: &mut [u8],
    c: &YuvConstants,
) {
    i422_to_argb_row(y, u, v, d, c);
}
pub(super) fn i422_to_rgba_impl_scalar(
    _t: ScalarToken,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    d: &mut [u8],
    c: &YuvConstants,
) {
    i422_to_rgba_row(y, u, v, d, c);
}
pub(super) fn i422_to_rgb24_impl_scalar(
    _t: ScalarToken,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    d: &mut [u8],
    c: &YuvConstants,
) {
    i422_to_rgb24_row(y, u, v, d, c);
}
pub(super) fn expand_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u16]) {
    expand_row(s, d);
}
pub(super) fn expand_swap_br_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u16]) {
    expand_swap_br_row(s, d);
}
pub(super) fn contract_impl_scalar(_t: ScalarToken, s: &[u16], d: &mut [u8]) {
    contract_row(s, d);
}
pub(super) fn contract_swap_br_impl_scalar(_t: ScalarToken, s: &[u16], d: &mut [u8]) {
    contract_swap_br_row(s, d);
}
pub(super) fn rgb24_to_argb_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    rgb24_to_argb_row(s, d);
}
pub(super) fn raw_to_argb_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    raw_to_argb_row(s, d);
}
pub(super) fn raw_to_rgba_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    raw_to_rgba_row(s, d);
}
pub(super) fn raw_to_rgb24_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    raw_to_rgb24_row(s, d);
}
pub(super) fn argb_to_rgb24_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    argb_to_rgb24_row(s, d);
}
pub(super) fn argb_to_raw_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    argb_to_raw_row(s, d);
}
pub(super) fn split_rgb_impl_scalar(
    _t: ScalarToken,
    s: &[u8],
    r: &mut [u8],
    g: &mut [u8],
    b: &mut [u8],
) {
    split_rgb_row(s, r, g, b);
}
pub(super) fn merge_rgb_impl_scalar(_t: ScalarToken, r: &[u8], g: &[u8], b: &[u8], d: &mut [u8]) {
    merge_rgb_row(r, g, b, d);
}
pub(super) fn split_argb_impl_scalar(
    _t: ScalarToken,
    s: &[u8],
    r: &mut [u8],
    g: &mut [u8],
    b: &mut [u8],
    a: &mut [u8],
) {
    split_argb_row(s, r, g, b, a);
}
pub(super) fn merge_argb_impl_scalar(
    _t: ScalarToken,
    r: &[u8],
    g: &[u8],
    b: &[u8],
    a: &[u8],
    d: &mut [u8],
) {
    merge_argb_row(r, g, b, a, d);
}

// ===========================================================================
// Scalar plane wrappers
// ===========================================================================

pub(super) fn i422_plane_scalar(
    _t: ScalarToken,
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
            I422Layout::Argb => i422_to_argb_row(yr, ur, vr, d, c),
            I422Layout::Rgba => i422_to_rgba_row(yr, ur, vr, d, c),
            I422Layout::Rgb24 => i422_to_rgb24_row(yr, ur, vr, d, c),
        }
    }
}
