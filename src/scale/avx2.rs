use archmage::prelude::*;
use safe_unaligned_simd::x86_64::{_mm_loadu_si128, _mm_storeu_si128, _mm256_loadu_si256, _mm256_storeu_si256};

use super::scalar;

#[rite]
fn load_64_v3(_token: X64V3Token, s: &[u8; 64]) -> (__m256i, __m256i) {
    let (halves, _) = s.as_chunks::<32>();
    (_mm256_loadu_si256(&halves[0]), _mm256_loadu_si256(&halves[1]))
}

/// packus works per 128-bit lane; 0xD8 restores source order.
#[rite]
fn pack_32_v3(_token: X64V3Token, a: __m256i, b: __m256i) -> __m256i {
    _mm256_permute4x64_epi64::<0xD8>(_mm256_packus_epi16(a, b))
}

// ===========================================================================
// x86-64 AVX2: rite row implementations
// ===========================================================================

#[rite]
pub(super) fn down2_row_v3(t: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let (ss, _) = src.as_chunks::<64>();
    let (ds, _) = dst.as_chunks_mut::<32>();
    let n = ss.len().min(ds.len()) * 32;
    for (s, d) in ss.iter().zip(ds) {
        let (a, b) = load_64_v3(t, s);
        let odd = pack_32_v3(t, _mm256_srli_epi16::<8>(a), _mm256_srli_epi16::<8>(b));
        _mm256_storeu_si256(d, odd);
    }
    scalar::down2_row(&src[n * 2..], &mut dst[n..]);
}

#[rite]
pub(super) fn down2_linear_row_v3(t: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let low = _mm256_set1_epi16(0x00ff);
    let (ss, _) = src.as_chunks::<64>();
    let (ds, _) = dst.as_chunks_mut::<32>();
    let n = ss.len().min(ds.len()) * 32;
    for (s, d) in ss.iter().zip(ds) {
        let (a, b) = load_64_v3(t, s);
        let even = pack_32_v3(t, _mm256_and_si256(a, low), _mm256_and_si256(b, low));
        let odd = pack_32_v3(t, _mm256_srli_epi16::<8>(a), _mm256_srli_epi16::<8>(b));
        _mm256_storeu_si256(d, _mm256_avg_epu8(even, odd));
    }
    scalar::down2_linear_row(&src[n * 2..], &mut dst[n..]);
}

#[rite]
pub(super) fn down2_box_row_v3(t: X64V3Token, src0: &[u8], src1: &[u8], dst: &mut [u8]) {
    let ones = _mm256_set1_epi8(1);
    let two = _mm256_set1_epi16(2);
    let (s0, _) = src0.as_chunks::<64>();
    let (s1, _) = src1.as_chunks::<64>();
    let (ds, _) = dst.as_chunks_mut::<32>();
    let n = s0.len().min(s1.len()).min(ds.len()) * 32;
    for ((a, b), d) in s0.iter().zip(s1).zip(ds) {
        let (a0, a1) = load_64_v3(t, a);
        let (b0, b1) = load_64_v3(t, b);
        // maddubs against 1s sums adjacent byte pairs into 16-bit lanes
        let lo = _mm256_add_epi16(_mm256_maddubs_epi16(a0, ones), _mm256_maddubs_epi16(b0, ones));
        let hi = _mm256_add_epi16(_mm256_maddubs_epi16(a1, ones), _mm256_maddubs_epi16(b1, ones));
        let lo = _mm256_srli_epi16::<2>(_mm256_add_epi16(lo, two));
        let hi = _mm256_srli_epi16::<2>(_mm256_add_epi16(hi, two));
        _mm256_storeu_si256(d, pack_32_v3(t, lo, hi));
    }
    scalar::down2_box_row(&src0[n * 2..], &src1[n * 2..], &mut dst[n..]);
}

#[rite]
pub(super) fn add_row_v3(_token: X64V3Token, src: &[u8], acc: &mut [u16]) {
    let (ss, _) = src.as_chunks::<16>();
    let (accs, _) = bytemuck::cast_slice_mut::<u16, u8>(acc).as_chunks_mut::<32>();
    let n = ss.len().min(accs.len()) * 16;
    for (s, a) in ss.iter().zip(accs) {
        let wide = _mm256_cvtepu8_epi16(_mm_loadu_si128(s));
        let sum = _mm256_adds_epu16(_mm256_loadu_si256(a), wide);
        _mm256_storeu_si256(a, sum);
    }
    scalar::add_row(&src[n..], &mut acc[n..]);
}

#[rite]
pub(super) fn interpolate_row_v3(
    _token: X64V3Token,
    src0: &[u8],
    src1: &[u8],
    dst: &mut [u8],
    fraction: u8,
) {
    if fraction == 0 {
        dst.copy_from_slice(&src0[..dst.len()]);
        return;
    }
    let f1 = _mm256_set1_epi16(i16::from(fraction));
    let f0 = _mm256_set1_epi16(256 - i16::from(fraction));
    let round = _mm256_set1_epi16(128);
    let (a16, _) = src0.as_chunks::<16>();
    let (b16, _) = src1.as_chunks::<16>();
    let (ds, _) = dst.as_chunks_mut::<16>();
    let n = a16.len().min(b16.len()).min(ds.len()) * 16;
    for ((a, b), d) in a16.iter().zip(b16).zip(ds) {
        let a = _mm256_cvtepu8_epi16(_mm_loadu_si128(a));
        let b = _mm256_cvtepu8_epi16(_mm_loadu_si128(b));
        // at most 255 * 256 + 128: fits unsigned 16 bits
        let sum = _mm256_add_epi16(_mm256_mullo_epi16(a, f0), _mm256_mullo_epi16(b, f1));
        let v = _mm256_srli_epi16::<8>(_mm256_add_epi16(sum, round));
        let packed = _mm256_permute4x64_epi64::<0xD8>(_mm256_packus_epi16(v, v));
        _mm_storeu_si128(d, _mm256_castsi256_si128(packed));
    }
    scalar::interpolate_row(&src0[n..], &src1[n..], &mut dst[n..], fraction);
}

// ===========================================================================
// x86-64 arcane contiguous wrappers
// ===========================================================================

#[arcane]
pub(super) fn down2_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    down2_row_v3(t, s, d);
}
#[arcane]
pub(super) fn down2_linear_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    down2_linear_row_v3(t, s, d);
}
#[arcane]
pub(super) fn down2_box_impl_v3(t: X64V3Token, s0: &[u8], s1: &[u8], d: &mut [u8]) {
    down2_box_row_v3(t, s0, s1, d);
}
#[arcane]
pub(super) fn add_row_impl_v3(t: X64V3Token, s: &[u8], acc: &mut [u16]) {
    add_row_v3(t, s, acc);
}
#[arcane]
pub(super) fn interpolate_impl_v3(t: X64V3Token, s0: &[u8], s1: &[u8], d: &mut [u8], f: u8) {
    interpolate_row_v3(t, s0, s1, d, f);
}
