use archmage::prelude::*;

// Every kernel takes slices already trimmed to their exact extents: the
// destination length is the output width and sources hold at least what
// that width reads.

/// `ceil(65536 / n)`: multiply then shift right 16 to divide a box sum of `n`
/// samples. Rounding the reciprocal up keeps uniform input exact.
pub(super) const BOX_DIV: [u32; 10] = [0, 65536, 32768, 21846, 16384, 13108, 10923, 9363, 8192, 7282];

#[inline(always)]
fn avg2(a: u8, b: u8) -> u8 {
    ((u16::from(a) + u16::from(b) + 1) >> 1) as u8
}

#[inline(always)]
fn avg4(a: u8, b: u8, c: u8, d: u8) -> u8 {
    ((u16::from(a) + u16::from(b) + u16::from(c) + u16::from(d) + 2) >> 2) as u8
}

#[inline(always)]
fn blend31(a: u8, b: u8) -> u8 {
    ((u16::from(a) * 3 + u16::from(b) + 2) >> 2) as u8
}

// ===========================================================================
// 1/2 and 1/4
// ===========================================================================

pub(super) fn down2_row(src: &[u8], dst: &mut [u8]) {
    let (pairs, _) = src.as_chunks::<2>();
    for (d, &[_, odd]) in dst.iter_mut().zip(pairs) {
        *d = odd;
    }
}

pub(super) fn down2_linear_row(src: &[u8], dst: &mut [u8]) {
    let (pairs, _) = src.as_chunks::<2>();
    for (d, &[a, b]) in dst.iter_mut().zip(pairs) {
        *d = avg2(a, b);
    }
}

pub(super) fn down2_box_row(src0: &[u8], src1: &[u8], dst: &mut [u8]) {
    let (p0, _) = src0.as_chunks::<2>();
    let (p1, _) = src1.as_chunks::<2>();
    for ((d, &[a, b]), &[c, e]) in dst.iter_mut().zip(p0).zip(p1) {
        *d = avg4(a, b, c, e);
    }
}

pub(super) fn down4_row(src: &[u8], dst: &mut [u8]) {
    let (quads, _) = src.as_chunks::<4>();
    for (d, q) in dst.iter_mut().zip(quads) {
        *d = q[2];
    }
}

pub(super) fn down4_box_row(rows: [&[u8]; 4], dst: &mut [u8]) {
    for (x, d) in dst.iter_mut().enumerate() {
        let sum: u32 = rows
            .iter()
            .flat_map(|r| &r[x * 4..x * 4 + 4])
            .map(|&v| u32::from(v))
            .sum();
        *d = ((sum + 8) >> 4) as u8;
    }
}

// ===========================================================================
// 3/4: four source pixels → three
// ===========================================================================

pub(super) fn down34_row(src: &[u8], dst: &mut [u8]) {
    let (quads, _) = src.as_chunks::<4>();
    let (triples, _) = dst.as_chunks_mut::<3>();
    for (d, &[s0, s1, _, s3]) in triples.iter_mut().zip(quads) {
        *d = [s0, s1, s3];
    }
}

#[inline(always)]
fn down34_taps(&[s0, s1, s2, s3]: &[u8; 4]) -> [u8; 3] {
    [blend31(s0, s1), avg2(s1, s2), blend31(s3, s2)]
}

/// Rows blended 3:1 toward `src0`.
pub(super) fn down34_0_box_row(src0: &[u8], src1: &[u8], dst: &mut [u8]) {
    let (q0, _) = src0.as_chunks::<4>();
    let (q1, _) = src1.as_chunks::<4>();
    let (triples, _) = dst.as_chunks_mut::<3>();
    for ((d, a), b) in triples.iter_mut().zip(q0).zip(q1) {
        let (a, b) = (down34_taps(a), down34_taps(b));
        *d = [0, 1, 2].map(|i| blend31(a[i], b[i]));
    }
}

/// Rows blended 1:1.
pub(super) fn down34_1_box_row(src0: &[u8], src1: &[u8], dst: &mut [u8]) {
    let (q0, _) = src0.as_chunks::<4>();
    let (q1, _) = src1.as_chunks::<4>();
    let (triples, _) = dst.as_chunks_mut::<3>();
    for ((d, a), b) in triples.iter_mut().zip(q0).zip(q1) {
        let (a, b) = (down34_taps(a), down34_taps(b));
        *d = [0, 1, 2].map(|i| avg2(a[i], b[i]));
    }
}

// ===========================================================================
// 3/8: eight source pixels → three
// ===========================================================================

pub(super) fn down38_row(src: &[u8], dst: &mut [u8]) {
    let (octets, _) = src.as_chunks::<8>();
    let (triples, _) = dst.as_chunks_mut::<3>();
    for (d, s) in triples.iter_mut().zip(octets) {
        *d = [s[0], s[3], s[6]];
    }
}

/// Sum columns `cols` of each row in `rows`, divided by their count.
#[inline(always)]
fn box_mean(rows: &[&[u8; 8]], cols: core::ops::Range<usize>) -> u8 {
    let n = rows.len() * cols.len();
    let sum: u32 = rows
        .iter()
        .flat_map(|r| &r[cols.clone()])
        .map(|&v| u32::from(v))
        .sum();
    ((sum * BOX_DIV[n]) >> 16) as u8
}

pub(super) fn down38_3_box_row(src0: &[u8], src1: &[u8], src2: &[u8], dst: &mut [u8]) {
    let (o0, _) = src0.as_chunks::<8>();
    let (o1, _) = src1.as_chunks::<8>();
    let (o2, _) = src2.as_chunks::<8>();
    let (triples, _) = dst.as_chunks_mut::<3>();
    for (((d, a), b), c) in triples.iter_mut().zip(o0).zip(o1).zip(o2) {
        let rows = [a, b, c];
        *d = [box_mean(&rows, 0..3), box_mean(&rows, 3..6), box_mean(&rows, 6..8)];
    }
}

pub(super) fn down38_2_box_row(src0: &[u8], src1: &[u8], dst: &mut [u8]) {
    let (o0, _) = src0.as_chunks::<8>();
    let (o1, _) = src1.as_chunks::<8>();
    let (triples, _) = dst.as_chunks_mut::<3>();
    for ((d, a), b) in triples.iter_mut().zip(o0).zip(o1) {
        let rows = [a, b];
        *d = [box_mean(&rows, 0..3), box_mean(&rows, 3..6), box_mean(&rows, 6..8)];
    }
}

// ===========================================================================
// Arbitrary-ratio box: accumulate rows, then average columns
// ===========================================================================

pub(super) fn add_row(src: &[u8], acc: &mut [u16]) {
    for (a, &s) in acc.iter_mut().zip(src) {
        *a = a.saturating_add(u16::from(s));
    }
}

/// `acc[i] += src[i]` into 32-bit sums, for boxes too tall for `u16`.
pub(super) fn add_row_wide(src: &[u8], acc: &mut [u32]) {
    for (a, &s) in acc.iter_mut().zip(src) {
        *a += u32::from(s);
    }
}

/// `ceil(2^32 / area)`.
#[inline]
fn reciprocal(area: usize) -> u64 {
    (1u64 << 32).div_ceil(area as u64)
}

/// Average `box_height`-row sums in `acc` over the column span each output
/// pixel covers, stepping `x` by `dx` (16.16).
pub(super) fn add_cols_row<A: Copy + Into<u64>>(acc: &[A], dst: &mut [u8], box_height: usize, x: i32, dx: i32) {
    let min_w = ((dx >> 16) as usize).max(1);
    let k = [reciprocal(min_w * box_height), reciprocal((min_w + 1) * box_height)];
    let mut x = i64::from(x);
    for d in dst.iter_mut() {
        let ix = ((x >> 16) as usize).min(acc.len() - 1);
        x += i64::from(dx);
        let end = ((x >> 16) as usize).clamp(ix + 1, acc.len());
        let w = end - ix;
        let sum: u64 = acc[ix..end].iter().map(|&v| v.into()).sum();
        let k = match w.checked_sub(min_w) {
            Some(0) => k[0],
            Some(1) => k[1],
            _ => reciprocal(w * box_height),
        };
        *d = ((sum * k) >> 32).min(255) as u8;
    }
}

// ===========================================================================
// Column stepping and interpolation
// ===========================================================================

/// Point sample at `x`, `x + dx`, ... (16.16).
pub(super) fn cols_row(src: &[u8], dst: &mut [u8], x: i32, dx: i32) {
    let mut x = i64::from(x);
    for d in dst.iter_mut() {
        *d = src[(x >> 16) as usize];
        x += i64::from(dx);
    }
}

pub(super) fn cols_up2_row(src: &[u8], dst: &mut [u8]) {
    for (i, d) in dst.iter_mut().enumerate() {
        *d = src[i / 2];
    }
}

/// Two-tap horizontal filter with a 7-bit weight taken from bits 9..16 of
/// the position. The right tap clamps to the last source pixel.
pub(super) fn filter_cols_row(src: &[u8], dst: &mut [u8], x: i32, dx: i32) {
    let last = src.len() - 1;
    let mut x = i64::from(x);
    for d in dst.iter_mut() {
        let xi = ((x >> 16) as usize).min(last);
        let f = ((x >> 9) & 0x7f) as u32;
        let a = u32::from(src[xi]);
        let b = u32::from(src[(xi + 1).min(last)]);
        *d = ((a * (128 - f) + b * f + 64) >> 7) as u8;
        x += i64::from(dx);
    }
}

/// `(src0 * (256 - f) + src1 * f + 128) >> 8`; `f == 0` copies `src0`.
pub(super) fn interpolate_row(src0: &[u8], src1: &[u8], dst: &mut [u8], fraction: u8) {
    if fraction == 0 {
        dst.copy_from_slice(&src0[..dst.len()]);
        return;
    }
    let f1 = u16::from(fraction);
    let f0 = 256 - f1;
    for ((d, &a), &b) in dst.iter_mut().zip(src0).zip(src1) {
        *d = ((u16::from(a) * f0 + u16::from(b) * f1 + 128) >> 8) as u8;
    }
}

// ===========================================================================
// 2x upsampling
// ===========================================================================

/// Each output pair between source pixels `x` and `x + 1` gets 3:1 and 1:3
/// weights. The first and last outputs copy the edge pixels.
pub(super) fn up2_linear_row(src: &[u8], dst: &mut [u8]) {
    let w = dst.len();
    let inner = (w - 1) & !1;
    dst[0] = src[0];
    for (i, pair) in dst[1..1 + inner].chunks_exact_mut(2).enumerate() {
        pair[0] = blend31(src[i], src[i + 1]);
        pair[1] = blend31(src[i + 1], src[i]);
    }
    dst[w - 1] = src[(w - 1) / 2];
}

#[inline(always)]
fn bilinear_9331(near: u8, side: u8, vert: u8, far: u8) -> u8 {
    ((u16::from(near) * 9 + (u16::from(side) + u16::from(vert)) * 3 + u16::from(far) + 8) >> 4) as u8
}

/// Two output rows from two source rows; `dst0` leans toward `src0`.
pub(super) fn up2_bilinear_row(src0: &[u8], src1: &[u8], dst0: &mut [u8], dst1: &mut [u8]) {
    let w = dst0.len();
    let inner = (w - 1) & !1;
    dst0[0] = blend31(src0[0], src1[0]);
    dst1[0] = blend31(src1[0], src0[0]);
    let p0 = dst0[1..1 + inner].chunks_exact_mut(2);
    let p1 = dst1[1..1 + inner].chunks_exact_mut(2);
    for (i, (d0, d1)) in p0.zip(p1).enumerate() {
        let (s, s1, t, t1) = (src0[i], src0[i + 1], src1[i], src1[i + 1]);
        d0[0] = bilinear_9331(s, s1, t, t1);
        d0[1] = bilinear_9331(s1, s, t1, t);
        d1[0] = bilinear_9331(t, t1, s, s1);
        d1[1] = bilinear_9331(t1, t, s1, s);
    }
    let e = (w - 1) / 2;
    dst0[w - 1] = blend31(src0[e], src1[e]);
    dst1[w - 1] = blend31(src1[e], src0[e]);
}

// ===========================================================================
// 2x upsampling, 16-bit samples
// ===========================================================================

#[inline(always)]
fn blend31_16(a: u16, b: u16) -> u16 {
    ((u32::from(a) * 3 + u32::from(b) + 2) >> 2) as u16
}

#[inline(always)]
fn bilinear_9331_16(near: u16, side: u16, vert: u16, far: u16) -> u16 {
    ((u32::from(near) * 9 + (u32::from(side) + u32::from(vert)) * 3 + u32::from(far) + 8) >> 4) as u16
}

pub(super) fn up2_linear_16_row(src: &[u16], dst: &mut [u16]) {
    let w = dst.len();
    let inner = (w - 1) & !1;
    dst[0] = src[0];
    for (i, pair) in dst[1..1 + inner].chunks_exact_mut(2).enumerate() {
        pair[0] = blend31_16(src[i], src[i + 1]);
        pair[1] = blend31_16(src[i + 1], src[i]);
    }
    dst[w - 1] = src[(w - 1) / 2];
}

pub(super) fn up2_bilinear_16_row(src0: &[u16], src1: &[u16], dst0: &mut [u16], dst1: &mut [u16]) {
    let w = dst0.len();
    let inner = (w - 1) & !1;
    dst0[0] = blend31_16(src0[0], src1[0]);
    dst1[0] = blend31_16(src1[0], src0[0]);
    let p0 = dst0[1..1 + inner].chunks_exact_mut(2);
    let p1 = dst1[1..1 + inner].chunks_exact_mut(2);
    for (i, (d0, d1)) in p0.zip(p1).enumerate() {
        let (s, s1, t, t1) = (src0[i], src0[i + 1], src1[i], src1[i + 1]);
        d0[0] = bilinear_9331_16(s, s1, t, t1);
        d0[1] = bilinear_9331_16(s1, s, t1, t);
        d1[0] = bilinear_9331_16(t, t1, s, s1);
        d1[1] = bilinear_9331_16(t1, t, s1, s);
    }
    let e = (w - 1) / 2;
    dst0[w - 1] = blend31_16(src0[e], src1[e]);
    dst1[w - 1] = blend31_16(src1[e], src0[e]);
}

// ===========================================================================
// ARGB and interleaved UV
// ===========================================================================

pub(super) fn argb_down2_row(src: &[u8], dst: &mut [u8]) {
    let (pairs, _) = src.as_chunks::<8>();
    let (px, _) = dst.as_chunks_mut::<4>();
    for (d, s) in px.iter_mut().zip(pairs) {
        *d = [s[4], s[5], s[6], s[7]];
    }
}

pub(super) fn argb_down2_linear_row(src: &[u8], dst: &mut [u8]) {
    let (pairs, _) = src.as_chunks::<8>();
    let (px, _) = dst.as_chunks_mut::<4>();
    for (d, s) in px.iter_mut().zip(pairs) {
        *d = [0, 1, 2, 3].map(|c| avg2(s[c], s[c + 4]));
    }
}

pub(super) fn argb_down2_box_row(src0: &[u8], src1: &[u8], dst: &mut [u8]) {
    let (p0, _) = src0.as_chunks::<8>();
    let (p1, _) = src1.as_chunks::<8>();
    let (px, _) = dst.as_chunks_mut::<4>();
    for ((d, s), t) in px.iter_mut().zip(p0).zip(p1) {
        *d = [0, 1, 2, 3].map(|c| avg4(s[c], s[c + 4], t[c], t[c + 4]));
    }
}

pub(super) fn argb_down_even_row(src: &[u8], step: usize, dst: &mut [u8]) {
    let (px, _) = dst.as_chunks_mut::<4>();
    for (x, d) in px.iter_mut().enumerate() {
        let i = x * step * 4;
        *d = [src[i], src[i + 1], src[i + 2], src[i + 3]];
    }
}

pub(super) fn argb_down_even_box_row(src0: &[u8], src1: &[u8], step: usize, dst: &mut [u8]) {
    let (px, _) = dst.as_chunks_mut::<4>();
    for (x, d) in px.iter_mut().enumerate() {
        let i = x * step * 4;
        *d = [0, 1, 2, 3].map(|c| avg4(src0[i + c], src0[i + c + 4], src1[i + c], src1[i + c + 4]));
    }
}

pub(super) fn argb_cols_row(src: &[[u8; 4]], dst: &mut [[u8; 4]], x: i32, dx: i32) {
    let mut x = i64::from(x);
    for d in dst.iter_mut() {
        *d = src[(x >> 16) as usize];
        x += i64::from(dx);
    }
}

pub(super) fn argb_cols_up2_row(src: &[[u8; 4]], dst: &mut [[u8; 4]]) {
    for (i, d) in dst.iter_mut().enumerate() {
        *d = src[i / 2];
    }
}

/// Per channel `(a * (127 - f) + b * f) >> 7` with the same 7-bit `f` as
/// [`filter_cols_row`]. The weights sum to 127, so full-scale channels come
/// out slightly darker. The right tap clamps to the last source pixel.
pub(super) fn argb_filter_cols_row(src: &[[u8; 4]], dst: &mut [[u8; 4]], x: i32, dx: i32) {
    let last = src.len() - 1;
    let mut x = i64::from(x);
    for d in dst.iter_mut() {
        let xi = ((x >> 16) as usize).min(last);
        let f = ((x >> 9) & 0x7f) as u16;
        let (a, b) = (src[xi], src[(xi + 1).min(last)]);
        *d = [0, 1, 2, 3].map(|c| ((u16::from(a[c]) * (127 - f) + u16::from(b[c]) * f) >> 7) as u8);
        x += i64::from(dx);
    }
}

pub(super) fn uv_down2_box_row(src0: &[u8], src1: &[u8], dst: &mut [u8]) {
    let (p0, _) = src0.as_chunks::<4>();
    let (p1, _) = src1.as_chunks::<4>();
    let (px, _) = dst.as_chunks_mut::<2>();
    for ((d, s), t) in px.iter_mut().zip(p0).zip(p1) {
        *d = [0, 1].map(|c| avg4(s[c], s[c + 2], t[c], t[c + 2]));
    }
}

// ===========================================================================
// Scalar dispatch targets
// ===========================================================================

pub(super) fn down2_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    down2_row(s, d);
}
pub(super) fn down2_linear_impl_scalar(_t: ScalarToken, s: &[u8], d: &mut [u8]) {
    down2_linear_row(s, d);
}
pub(super) fn down2_box_impl_scalar(_t: ScalarToken, s0: &[u8], s1: &[u8], d: &mut [u8]) {
    down2_box_row(s0, s1, d);
}
pub(super) fn add_row_impl_scalar(_t: ScalarToken, s: &[u8], acc: &mut [u16]) {
    add_row(s, acc);
}
pub(super) fn interpolate_impl_scalar(_t: ScalarToken, s0: &[u8], s1: &[u8], d: &mut [u8], f: u8) {
    interpolate_row(s0, s1, d, f);
}
