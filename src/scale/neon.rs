use archmage::{Arm64V2Token, arcane, rite};
use core::arch::aarch64::*;
use safe_unaligned_simd::aarch64 as simd_mem;

use super::scalar;

#[rite]
fn load_32_arm_v2(_token: Arm64V2Token, s: &[u8; 32]) -> (uint8x16_t, uint8x16_t) {
    let (halves, _) = s.as_chunks::<16>();
    (simd_mem::vld1q_u8(&halves[0]), simd_mem::vld1q_u8(&halves[1]))
}

// ===========================================================================
// ARM NEON: rite row implementations
// ===========================================================================

#[rite]
pub(super) fn down2_row_arm_v2(t: Arm64V2Token, src: &[u8], dst: &mut [u8]) {
    let (ss, _) = src.as_chunks::<32>();
    let (ds, _) = dst.as_chunks_mut::<16>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        let (a, b) = load_32_arm_v2(t, s);
        simd_mem::vst1q_u8(d, vuzp2q_u8(a, b));
    }
    scalar::down2_row(&src[n * 2..], &mut dst[n..]);
}

#[rite]
pub(super) fn down2_linear_row_arm_v2(t: Arm64V2Token, src: &[u8], dst: &mut [u8]) {
    let (ss, _) = src.as_chunks::<32>();
    let (ds, _) = dst.as_chunks_mut::<16>();
    let n = ss.len().min(ds.len()) * 16;
    for (s, d) in ss.iter().zip(ds) {
        let (a, b) = load_32_arm_v2(t, s);
        simd_mem::vst1q_u8(d, vrhaddq_u8(vuzp1q_u8(a, b), vuzp2q_u8(a, b)));
    }
    scalar::down2_linear_row(&src[n * 2..], &mut dst[n..]);
}

#[rite]
pub(super) fn down2_box_row_arm_v2(t: Arm64V2Token, src0: &[u8], src1: &[u8], dst: &mut [u8]) {
    let (s0, _) = src0.as_chunks::<32>();
    let (s1, _) = src1.as_chunks::<32>();
    let (ds, _) = dst.as_chunks_mut::<16>();
    let n = s0.len().min(s1.len()).min(ds.len()) * 16;
    for ((a, b), d) in s0.iter().zip(s1).zip(ds) {
        let (a0, a1) = load_32_arm_v2(t, a);
        let (b0, b1) = load_32_arm_v2(t, b);
        let lo = vpadalq_u8(vpaddlq_u8(a0), b0);
        let hi = vpadalq_u8(vpaddlq_u8(a1), b1);
        let out = vcombine_u8(vrshrn_n_u16::<2>(lo), vrshrn_n_u16::<2>(hi));
        simd_mem::vst1q_u8(d, out);
    }
    scalar::down2_box_row(&src0[n * 2..], &src1[n * 2..], &mut dst[n..]);
}

#[rite]
pub(super) fn add_row_arm_v2(_token: Arm64V2Token, src: &[u8], acc: &mut [u16]) {
    let (ss, _) = src.as_chunks::<8>();
    let (accs, _) = acc.as_chunks_mut::<8>();
    let n = ss.len().min(accs.len()) * 8;
    for (s, a) in ss.iter().zip(accs.iter_mut()) {
        let sum = vqaddq_u16(simd_mem::vld1q_u16(a), vmovl_u8(simd_mem::vld1_u8(s)));
        simd_mem::vst1q_u16(a, sum);
    }
    scalar::add_row(&src[n..], &mut acc[n..]);
}

#[rite]
pub(super) fn interpolate_row_arm_v2(
    _token: Arm64V2Token,
    src0: &[u8],
    src1: &[u8],
    dst: &mut [u8],
    fraction: u8,
) {
    if fraction == 0 {
        dst.copy_from_slice(&src0[..dst.len()]);
        return;
    }
    let f1 = vdup_n_u8(fraction);
    let f0 = vdup_n_u8(fraction.wrapping_neg());
    let (a16, _) = src0.as_chunks::<16>();
    let (b16, _) = src1.as_chunks::<16>();
    let (ds, _) = dst.as_chunks_mut::<16>();
    let n = a16.len().min(b16.len()).min(ds.len()) * 16;
    for ((a, b), d) in a16.iter().zip(b16).zip(ds) {
        let a = simd_mem::vld1q_u8(a);
        let b = simd_mem::vld1q_u8(b);
        let lo = vmlal_u8(vmull_u8(vget_low_u8(a), f0), vget_low_u8(b), f1);
        let hi = vmlal_u8(vmull_u8(vget_high_u8(a), f0), vget_high_u8(b), f1);
        simd_mem::vst1q_u8(d, vcombine_u8(vrshrn_n_u16::<8>(lo), vrshrn_n_u16::<8>(hi)));
    }
    scalar::interpolate_row(&src0[n..], &src1[n..], &mut dst[n..], fraction);
}

// ===========================================================================
// ARM arcane contiguous wrappers
// ===========================================================================

#[arcane]
pub(super) fn down2_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u8]) {
    down2_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn down2_linear_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u8]) {
    down2_linear_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn down2_box_impl_arm_v2(t: Arm64V2Token, s0: &[u8], s1: &[u8], d: &mut [u8]) {
    down2_box_row_arm_v2(t, s0, s1, d);
}
#[arcane]
pub(super) fn add_row_impl_arm_v2(t: Arm64V2Token, s: &[u8], acc: &mut [u16]) {
    add_row_arm_v2(t, s, acc);
}
#[arcane]
pub(super) fn interpolate_impl_arm_v2(t: Arm64V2Token, s0: &[u8], s1: &[u8], d: &mut [u8], f: u8) {
    interpolate_row_arm_v2(t, s0, s1, d, f);
}
