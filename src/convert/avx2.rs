use archmage::prelude::*;
use safe_unaligned_simd::x86_64::{
    _mm_loadu_si128, _mm_loadu_si64, _mm_storeu_si128, _mm256_loadu_si256, _mm256_storeu_si256,
};

use super::scalar;
use super::{I422Layout, YuvConstants};
use crate::{Plane, PlaneMut};

// ===========================================================================
// SIMD constants
// ===========================================================================

const BR_SHUF_MASK_SSE: [i8; 16] = [2, 1, 0, 3, 6, 5, 4, 7, 10, 9, 8, 11, 14, 13, 12, 15];

const BR_SHUF_MASK_AVX: [i8; 32] = [
    2, 1, 0, 3, 6, 5, 4, 7, 10, 9, 8, 11, 14, 13, 12, 15, 2, 1, 0, 3, 6, 5, 4, 7, 10, 9, 8, 11, 14,
    13, 12, 15,
];

const ALPHA_HI_MASK_AVX: [i8; 32] = [
    0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0,
    0, 0, -1,
];

const ALPHA_LO_MASK_AVX: [i8; 32] = [
    -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1, 0, 0, 0, -1,
    0, 0, 0,
];

// Spreads 24 source bytes so each 16-byte lane holds four 3-byte pixels.
const RGB_ALIGN_PERM_AVX: [i8; 32] = [
    0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 3, 0, 0, 0, 4, 0, 0, 0, 5, 0, 0, 0, 6, 0, 0, 0,
];

// B,G,R → B,G,R,_
const KEEP_3_TO_4_SHUF_AVX: [i8; 32] = [
    0, 1, 2, -128, 3, 4, 5, -128, 6, 7, 8, -128, 9, 10, 11, -128, 0, 1, 2, -128, 3, 4, 5, -128, 6,
    7, 8, -128, 9, 10, 11, -128,
];

// R,G,B → B,G,R,_
const SWAP_3_TO_4_SHUF_AVX: [i8; 32] = [
    2, 1, 0, -128, 5, 4, 3, -128, 8, 7, 6, -128, 11, 10, 9, -128, 2, 1, 0, -128, 5, 4, 3, -128, 8,
    7, 6, -128, 11, 10, 9, -128,
];

// R,G,B → _,B,G,R
const RAW_TO_RGBA_SHUF_AVX: [i8; 32] = [
    -128, 2, 1, 0, -128, 5, 4, 3, -128, 8, 7, 6, -128, 11, 10, 9, -128, 2, 1, 0, -128, 5, 4, 3,
    -128, 8, 7, 6, -128, 11, 10, 9,
];

// B,G,R,A → B,G,R
const KEEP_4_TO_3_SHUF_AVX: [i8; 32] = [
    0, 1, 2, 4, 5, 6, 8, 9, 10, 12, 13, 14, -128, -128, -128, -128, 0, 1, 2, 4, 5, 6, 8, 9, 10, 12,
    13, 14, -128, -128, -128, -128,
];

// B,G,R,A → R,G,B
const SWAP_4_TO_3_SHUF_AVX: [i8; 32] = [
    2, 1, 0, 6, 5, 4, 10, 9, 8, 14, 13, 12, -128, -128, -128, -128, 2, 1, 0, 6, 5, 4, 10, 9, 8, 14,
    13, 12, -128, -128, -128, -128,
];

const KEEP_4_TO_3_SHUF_SSE: [i8; 16] = [0, 1, 2, 4, 5, 6, 8, 9, 10, 12, 13, 14, -128, -128, -128, -128];

// Gathers the 12 live bytes of each lane into the low 24.
const PACK_3X4_PERM_AVX: [i8; 32] = [
    0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 4, 0, 0, 0, 5, 0, 0, 0, 6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

// 3-byte swap within 12 bytes; bytes 12..16 pass through.
const SWAP_BGR_SHUF_SSE: [i8; 16] = [2, 1, 0, 5, 4, 3, 8, 7, 6, 11, 10, 9, 12, 13, 14, 15];

// ===========================================================================
// YUV → RGB, 16 pixels per step
// ===========================================================================

struct YuvVecs {
    ub: __m256i,
    vr: __m256i,
    ug: __m256i,
    vg: __m256i,
    yg: __m256i,
    bb: __m256i,
    bg: __m256i,
    br: __m256i,
}

#[rite]
fn yuv_vecs_v3(_token: X64V3Token, c: &YuvConstants) -> YuvVecs {
    let [ub, vr, ug, vg] = c.uv_coeff.map(i16::from);
    let [yg, bb, bg, br] = c.rgb_coeff_bias.map(|v| v as i16);
    YuvVecs {
        ub: _mm256_set1_epi16(ub),
        vr: _mm256_set1_epi16(vr),
        ug: _mm256_set1_epi16(ug),
        vg: _mm256_set1_epi16(vg),
        yg: _mm256_set1_epi16(yg),
        bb: _mm256_set1_epi16(bb),
        bg: _mm256_set1_epi16(bg),
        br: _mm256_set1_epi16(br),
    }
}

/// 16 luma and 8 chroma pairs → B, G, R as 16 bytes each.
#[rite]
fn yuv_16px_v3(
    _token: X64V3Token,
    y: &[u8; 16],
    u: &[u8; 8],
    v: &[u8; 8],
    k: &YuvVecs,
) -> (__m128i, __m128i, __m128i) {
    let y16 = _mm256_cvtepu8_epi16(_mm_loadu_si128(y));
    let y16 = _mm256_or_si256(y16, _mm256_slli_epi16::<8>(y16));
    let y1 = _mm256_mulhi_epu16(y16, k.yg);

    let u8x = _mm_loadu_si64(u);
    let v8x = _mm_loadu_si64(v);
    let u16 = _mm256_cvtepu8_epi16(_mm_unpacklo_epi8(u8x, u8x));
    let v16 = _mm256_cvtepu8_epi16(_mm_unpacklo_epi8(v8x, v8x));

    let b = _mm256_add_epi16(y1, _mm256_mullo_epi16(u16, k.ub));
    let b = _mm256_subs_epu16(b, k.bb);
    let uv_g = _mm256_add_epi16(_mm256_mullo_epi16(u16, k.ug), _mm256_mullo_epi16(v16, k.vg));
    let g = _mm256_subs_epu16(_mm256_add_epi16(y1, k.bg), uv_g);
    let r = _mm256_add_epi16(y1, _mm256_mullo_epi16(v16, k.vr));
    let r = _mm256_subs_epu16(r, k.br);

    let b = _mm256_srli_epi16::<6>(b);
    let g = _mm256_srli_epi16::<6>(g);
    let r = _mm256_srli_epi16::<6>(r);
    // packus works per 128-bit lane; 0xD8 puts each source's 16 bytes in one lane
    let bg = _mm256_permute4x64_epi64::<0xD8>(_mm256_packus_epi16(b, g));
    let rr = _mm256_permute4x64_epi64::<0xD8>(_mm256_packus_epi16(r, r));
    (
        _mm256_castsi256_si128(bg),
        _mm256_extracti128_si256::<1>(bg),
        _mm256_castsi256_si128(rr),
    )
}

/// Interleave four byte planes into 16 four-byte pixels.
#[rite]
fn store_4ch_v3(
    _token: X64V3Token,
    c0: __m128i,
    c1: __m128i,
    c2: __m128i,
    c3: __m128i,
    dst: &mut [u8; 64],
) {
    let p01_lo = _mm_unpacklo_epi8(c0, c1);
    let p01_hi = _mm_unpackhi_epi8(c0, c1);
    let p23_lo = _mm_unpacklo_epi8(c2, c3);
    let p23_hi = _mm_unpackhi_epi8(c2, c3);
    let (out, _) = dst.as_chunks_mut::<16>();
    _mm_storeu_si128(&mut out[0], _mm_unpacklo_epi16(p01_lo, p23_lo));
    _mm_storeu_si128(&mut out[1], _mm_unpackhi_epi16(p01_lo, p23_lo));
    _mm_storeu_si128(&mut out[2], _mm_unpacklo_epi16(p01_hi, p23_hi));
    _mm_storeu_si128(&mut out[3], _mm_unpackhi_epi16(p01_hi, p23_hi));
}

#[rite]
fn store_3ch_v3(_token: X64V3Token, c0: __m128i, c1: __m128i, c2: __m128i, dst: &mut [u8; 48]) {
    let strip = _mm_loadu_si128(&KEEP_4_TO_3_SHUF_SSE);
    let zero = _mm_setzero_si128();
    let p01_lo = _mm_unpacklo_epi8(c0, c1);
    let p01_hi = _mm_unpackhi_epi8(c0, c1);
    let p2z_lo = _mm_unpacklo_epi8(c2, zero);
    let p2z_hi = _mm_unpackhi_epi8(c2, zero);
    let px = [
        _mm_unpacklo_epi16(p01_lo, p2z_lo),
        _mm_unpackhi_epi16(p01_lo, p2z_lo),
        _mm_unpacklo_epi16(p01_hi, p2z_hi),
        _mm_unpackhi_epi16(p01_hi, p2z_hi),
    ];
    let (out, _) = dst.as_chunks_mut::<12>();
    for (d, p) in out.iter_mut().zip(px) {
        let mut tmp = [0u8; 16];
        _mm_storeu_si128(&mut tmp, _mm_shuffle_epi8(p, strip));
        d.copy_from_slice(&tmp[..12]);
    }
}

// ===========================================================================
// x86-64 AVX2: rite row implementations
// ===========================================================================

#[rite]
pub(super) fn i422_to_argb_row_v3(
    t: X64V3Token,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    c: &YuvConstants,
) {
    let k = yuv_vecs_v3(t, c);
    let alpha = _mm_set1_epi8(-1);
    let (ys, _) = y.as_chunks::<16>();
    let (us, _) = u.as_chunks::<8>();
    let (vs, _) = v.as_chunks::<8>();
    let (ds, _) = dst.as_chunks_mut::<64>();
    let mut n = 0;
    for (((y, u), v), d) in ys.iter().zip(us).zip(vs).zip(ds) {
        let (b, g, r) = yuv_16px_v3(t, y, u, v, &k);
        store_4ch_v3(t, b, g, r, alpha, d);
        n += 16;
    }
    scalar::i422_to_argb_row(&y[n..], &u[n / 2..], &v[n / 2..], &mut dst[n * 4..], c);
}

#[rite]
pub(super) fn i422_to_rgba_row_v3(
    t: X64V3Token,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    c: &YuvConstants,
) {
    let k = yuv_vecs_v3(t, c);
    let alpha = _mm_set1_epi8(-1);
    let (ys, _) = y.as_chunks::<16>();
    let (us, _) = u.as_chunks::<8>();
    let (vs, _) = v.as_chunks::<8>();
    let (ds, _) = dst.as_chunks_mut::<64>();
    let mut n = 0;
    for (((y, u), v), d) in ys.iter().zip(us).zip(vs).zip(ds) {
        let (b, g, r) = yuv_16px_v3(t, y, u, v, &k);
        store_4ch_v3(t, alpha, b, g, r, d);
        n += 16;
    }
    scalar::i422_to_rgba_row(&y[n..], &u[n / 2..], &v[n / 2..], &mut dst[n * 4..], c);
}

#[rite]
pub(super) fn i422_to_rgb24_row_v3(
    t: X64V3Token,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    dst: &mut [u8],
    c: &YuvConstants,
) {
    let k = yuv_vecs_v3(t, c);
    let (ys, _) = y.as_chunks::<16>();
    let (us, _) = u.as_chunks::<8>();
    let (vs, _) = v.as_chunks::<8>();
    let (ds, _) = dst.as_chunks_mut::<48>();
    let mut n = 0;
    for (((y, u), v), d) in ys.iter().zip(us).zip(vs).zip(ds) {
        let (b, g, r) = yuv_16px_v3(t, y, u, v, &k);
        store_3ch_v3(t, b, g, r, d);
        n += 16;
    }
    scalar::i422_to_rgb24_row(&y[n..], &u[n / 2..], &v[n / 2..], &mut dst[n * 3..], c);
}

#[rite]
pub(super) fn expand_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u16]) {
    let (ss, _) = src.as_chunks::<16>();
    let (ds, _) = bytemuck::cast_slice_mut::<u16, u8>(dst).as_chunks_mut::<32>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        let v = _mm256_cvtepu8_epi16(_mm_loadu_si128(s));
        _mm256_storeu_si256(d, _mm256_or_si256(v, _mm256_slli_epi16::<8>(v)));
    }
    scalar::expand_row(&src[n..], &mut dst[n..]);
}

#[rite]
pub(super) fn expand_swap_br_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u16]) {
    let swap = _mm_loadu_si128(&BR_SHUF_MASK_SSE);
    let (ss, _) = src.as_chunks::<16>();
    let (ds, _) = bytemuck::cast_slice_mut::<u16, u8>(dst).as_chunks_mut::<32>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        let v = _mm256_cvtepu8_epi16(_mm_shuffle_epi8(_mm_loadu_si128(s), swap));
        _mm256_storeu_si256(d, _mm256_or_si256(v, _mm256_slli_epi16::<8>(v)));
    }
    scalar::expand_swap_br_row(&src[n..], &mut dst[n..]);
}

#[rite]
fn contract_32_v3(_token: X64V3Token, s: &[u8; 64]) -> __m256i {
    let (halves, _) = s.as_chunks::<32>();
    let a = _mm256_srli_epi16::<8>(_mm256_loadu_si256(&halves[0]));
    let b = _mm256_srli_epi16::<8>(_mm256_loadu_si256(&halves[1]));
    _mm256_permute4x64_epi64::<0xD8>(_mm256_packus_epi16(a, b))
}

#[rite]
pub(super) fn contract_row_v3(t: X64V3Token, src: &[u16], dst: &mut [u8]) {
    let (ss, _) = bytemuck::cast_slice::<u16, u8>(src).as_chunks::<64>();
    let (ds, _) = dst.as_chunks_mut::<32>();
    let n = ss.len().min(ds.len()) * 32;
    for (s, d) in ss.iter().zip(ds) {
        _mm256_storeu_si256(d, contract_32_v3(t, s));
    }
    scalar::contract_row(&src[n..], &mut dst[n..]);
}

#[rite]
pub(super) fn contract_swap_br_row_v3(t: X64V3Token, src: &[u16], dst: &mut [u8]) {
    let swap = _mm256_loadu_si256(&BR_SHUF_MASK_AVX);
    let (ss, _) = bytemuck::cast_slice::<u16, u8>(src).as_chunks::<64>();
    let (ds, _) = dst.as_chunks_mut::<32>();
    let n = ss.len().min(ds.len()) * 32;
    for (s, d) in ss.iter().zip(ds) {
        _mm256_storeu_si256(d, _mm256_shuffle_epi8(contract_32_v3(t, s), swap));
    }
    scalar::contract_swap_br_row(&src[n..], &mut dst[n..]);
}

/// 3→4 bytes per pixel through `shuf`, OR-ing in `alpha`. Returns pixels done.
#[rite]
fn shuffle_3_to_4_v3(
    _token: X64V3Token,
    src: &[u8],
    dst: &mut [u8],
    shuf: &[i8; 32],
    alpha: &[i8; 32],
) -> usize {
    let perm = _mm256_loadu_si256(&RGB_ALIGN_PERM_AVX);
    let shuf = _mm256_loadu_si256(shuf);
    let alpha = _mm256_loadu_si256(alpha);
    let (mut is, mut id) = (0, 0);
    while let (Some(s), Some(d)) = (src[is..].first_chunk::<32>(), dst[id..].first_chunk_mut::<32>())
    {
        let aligned = _mm256_permutevar8x32_epi32(_mm256_loadu_si256(s), perm);
        let px = _mm256_or_si256(_mm256_shuffle_epi8(aligned, shuf), alpha);
        _mm256_storeu_si256(d, px);
        is += 24;
        id += 32;
    }
    id / 4
}

/// 4→3 bytes per pixel through `shuf`. Returns pixels done.
#[rite]
fn shuffle_4_to_3_v3(_token: X64V3Token, src: &[u8], dst: &mut [u8], shuf: &[i8; 32]) -> usize {
    let shuf = _mm256_loadu_si256(shuf);
    let pack = _mm256_loadu_si256(&PACK_3X4_PERM_AVX);
    let (mut is, mut id) = (0, 0);
    while let (Some(s), Some(d)) = (src[is..].first_chunk::<32>(), dst[id..].first_chunk_mut::<24>())
    {
        let stripped = _mm256_shuffle_epi8(_mm256_loadu_si256(s), shuf);
        let packed = _mm256_permutevar8x32_epi32(stripped, pack);
        let mut tmp = [0u8; 32];
        _mm256_storeu_si256(&mut tmp, packed);
        d.copy_from_slice(&tmp[..24]);
        is += 32;
        id += 24;
    }
    is / 4
}

#[rite]
pub(super) fn rgb24_to_argb_row_v3(t: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let n = shuffle_3_to_4_v3(t, src, dst, &KEEP_3_TO_4_SHUF_AVX, &ALPHA_HI_MASK_AVX);
    scalar::rgb24_to_argb_row(&src[n * 3..], &mut dst[n * 4..]);
}

#[rite]
pub(super) fn raw_to_argb_row_v3(t: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let n = shuffle_3_to_4_v3(t, src, dst, &SWAP_3_TO_4_SHUF_AVX, &ALPHA_HI_MASK_AVX);
    scalar::raw_to_argb_row(&src[n * 3..], &mut dst[n * 4..]);
}

#[rite]
pub(super) fn raw_to_rgba_row_v3(t: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let n = shuffle_3_to_4_v3(t, src, dst, &RAW_TO_RGBA_SHUF_AVX, &ALPHA_LO_MASK_AVX);
    scalar::raw_to_rgba_row(&src[n * 3..], &mut dst[n * 4..]);
}

#[rite]
pub(super) fn argb_to_rgb24_row_v3(t: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let n = shuffle_4_to_3_v3(t, src, dst, &KEEP_4_TO_3_SHUF_AVX);
    scalar::argb_to_rgb24_row(&src[n * 4..], &mut dst[n * 3..]);
}

#[rite]
pub(super) fn argb_to_raw_row_v3(t: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let n = shuffle_4_to_3_v3(t, src, dst, &SWAP_4_TO_3_SHUF_AVX);
    scalar::argb_to_raw_row(&src[n * 4..], &mut dst[n * 3..]);
}

// 16-byte loads and stores, advancing 12 so bytes 12..16 are rewritten next step.
#[rite]
pub(super) fn raw_to_rgb24_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let mask = _mm_loadu_si128(&SWAP_BGR_SHUF_SSE);
    let mut i = 0;
    while let (Some(s), Some(d)) = (src[i..].first_chunk::<16>(), dst[i..].first_chunk_mut::<16>()) {
        _mm_storeu_si128(d, _mm_shuffle_epi8(_mm_loadu_si128(s), mask));
        i += 12;
    }
    scalar::raw_to_rgb24_row(&src[i..], &mut dst[i..]);
}

// ===========================================================================
// x86-64 arcane contiguous wrappers
// ===========================================================================

#[arcane]
pub(super) fn i422_to_argb_impl_v3(
    t: X64V3Token,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    d: &mut [u8],
    c: &YuvConstants,
) {
    i422_to_argb_row_v3(t, y, u, v, d, c);
}
#[arcane]
pub(super) fn i422_to_rgba_impl_v3(
    t: X64V3Token,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    d: &mut [u8],
    c: &YuvConstants,
) {
    i422_to_rgba_row_v3(t, y, u, v, d, c);
}
#[arcane]
pub(super) fn i422_to_rgb24_impl_v3(
    t: X64V3Token,
    y: &[u8],
    u: &[u8],
    v: &[u8],
    d: &mut [u8],
    c: &YuvConstants,
) {
    i422_to_rgb24_row_v3(t, y, u, v, d, c);
}
#[arcane]
pub(super) fn expand_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u16]) {
    expand_row_v3(t, s, d);
}
#[arcane]
pub(super) fn expand_swap_br_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u16]) {
    expand_swap_br_row_v3(t, s, d);
}
#[arcane]
pub(super) fn contract_impl_v3(t: X64V3Token, s: &[u16], d: &mut [u8]) {
    contract_row_v3(t, s, d);
}
#[arcane]
pub(super) fn contract_swap_br_impl_v3(t: X64V3Token, s: &[u16], d: &mut [u8]) {
    contract_swap_br_row_v3(t, s, d);
}
#[arcane]
pub(super) fn rgb24_to_argb_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    rgb24_to_argb_row_v3(t, s, d);
}
#[arcane]
pub(super) fn raw_to_argb_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    raw_to_argb_row_v3(t, s, d);
}
#[arcane]
pub(super) fn raw_to_rgba_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    raw_to_rgba_row_v3(t, s, d);
}
#[arcane]
pub(super) fn raw_to_rgb24_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    raw_to_rgb24_row_v3(t, s, d);
}
#[arcane]
pub(super) fn argb_to_rgb24_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    argb_to_rgb24_row_v3(t, s, d);
}
#[arcane]
pub(super) fn argb_to_raw_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    argb_to_raw_row_v3(t, s, d);
}

// ===========================================================================
// x86-64 arcane plane wrappers
// ===========================================================================

#[arcane]
pub(super) fn i422_plane_v3(
    t: X64V3Token,
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
            I422Layout::Argb => i422_to_argb_row_v3(t, yr, ur, vr, d, c),
            I422Layout::Rgba => i422_to_rgba_row_v3(t, yr, ur, vr, d, c),
            I422Layout::Rgb24 => i422_to_rgb24_row_v3(t, yr, ur, vr, d, c),
        }
    }
}
