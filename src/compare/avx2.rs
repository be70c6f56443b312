use archmage::prelude::*;
use safe_unaligned_simd::x86_64::{_mm256_loadu_si256, _mm256_storeu_si256};

use super::scalar;

#[rite]
pub(super) fn sse_row_v3(_token: X64V3Token, a: &[u8], b: &[u8]) -> u32 {
    let zero = _mm256_setzero_si256();
    let mut acc = _mm256_setzero_si256();
    let (a32, _) = a.as_chunks::<32>();
    let (b32, _) = b.as_chunks::<32>();
    let n = a32.len().min(b32.len()) * 32;
    for (x, y) in a32.iter().zip(b32) {
        let x = _mm256_loadu_si256(x);
        let y = _mm256_loadu_si256(y);
        let d = _mm256_or_si256(_mm256_subs_epu8(x, y), _mm256_subs_epu8(y, x));
        let lo = _mm256_unpacklo_epi8(d, zero);
        let hi = _mm256_unpackhi_epi8(d, zero);
        acc = _mm256_add_epi32(acc, _mm256_madd_epi16(lo, lo));
        acc = _mm256_add_epi32(acc, _mm256_madd_epi16(hi, hi));
    }
    let mut lanes = [0u8; 32];
    _mm256_storeu_si256(&mut lanes, acc);
    let sum: u32 = bytemuck::cast::<[u8; 32], [u32; 8]>(lanes).iter().sum();
    sum + scalar::sse_row(&a[n..], &b[n..])
}

#[arcane]
pub(super) fn sse_impl_v3(t: X64V3Token, a: &[u8], b: &[u8]) -> u32 {
    sse_row_v3(t, a, b)
}
