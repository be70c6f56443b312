use archmage::{Arm64V2Token, arcane, rite};
use core::arch::aarch64::*;
use safe_unaligned_simd::aarch64 as simd_mem;

use super::scalar;

#[rite]
pub(super) fn sse_row_arm_v2(_token: Arm64V2Token, a: &[u8], b: &[u8]) -> u32 {
    let mut acc = vdupq_n_u32(0);
    let (a16, _) = a.as_chunks::<16>();
    let (b16, _) = b.as_chunks::<16>();
    let n = a16.len().min(b16.len()) * 16;
    for (x, y) in a16.iter().zip(b16) {
        let d = vabdq_u8(simd_mem::vld1q_u8(x), simd_mem::vld1q_u8(y));
        // 255² fits u16; pairwise-accumulate into u32 lanes
        acc = vpadalq_u16(acc, vmull_u8(vget_low_u8(d), vget_low_u8(d)));
        acc = vpadalq_u16(acc, vmull_high_u8(d, d));
    }
    vaddvq_u32(acc) + scalar::sse_row(&a[n..], &b[n..])
}

#[arcane]
pub(super) fn sse_impl_arm_v2(t: Arm64V2Token, a: &[u8], b: &[u8]) -> u32 {
    sse_row_arm_v2(t, a, b)
}
