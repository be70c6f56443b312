extern crate alloc;
extern crate std;
use super::*;
use alloc::{vec, vec::Vec};
use archmage::testing::{CompileTimePolicy, for_each_token_permutation};

fn policy() -> CompileTimePolicy {
    if std::env::var_os("CI").is_some() {
        CompileTimePolicy::Fail
    } else {
        CompileTimePolicy::WarnStderr
    }
}

fn make_bytes(n: usize, seed: u32) -> Vec<u8> {
    let mut s = seed.wrapping_mul(2_654_435_761).max(1);
    (0..n)
        .map(|_| {
            s ^= s << 13;
            s ^= s >> 17;
            s ^= s << 5;
            s as u8
        })
        .collect()
}

fn ref_sse(a: &[u8], b: &[u8]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = i64::from(x) - i64::from(y);
            (d * d) as u64
        })
        .sum()
}

#[test]
fn permutation_sum_square_error_block() {
    let report = for_each_token_permutation(policy(), |perm| {
        for n in [0, 1, 15, 16, 17, 31, 32, 33, 63, 64, 65, 100, 1000, SSE_BLOCK] {
            let a = make_bytes(n, 1);
            let b = make_bytes(n, 2);
            let got = sum_square_error_block(&a, &b).unwrap();
            assert_eq!(u64::from(got), ref_sse(&a, &b), "n={n} tier={perm}");
        }
    });
    std::eprintln!("sum_square_error_block: {report}");
}

#[test]
fn permutation_compute_sum_square_error() {
    let report = for_each_token_permutation(policy(), |perm| {
        for n in [SSE_BLOCK - 1, SSE_BLOCK, SSE_BLOCK + 7, 2 * SSE_BLOCK + 45, 3 * SSE_BLOCK + 16] {
            let a = make_bytes(n, 3);
            let b = make_bytes(n, 4);
            assert_eq!(compute_sum_square_error_u64(&a, &b).unwrap(), ref_sse(&a, &b), "n={n} tier={perm}");
        }
    });
    std::eprintln!("compute_sum_square_error: {report}");
}

#[test]
fn worst_case_block_fits_u32() {
    let a = vec![0u8; SSE_BLOCK_MAX];
    let b = vec![255u8; SSE_BLOCK_MAX];
    let got = sum_square_error_block(&a, &b).unwrap();
    assert_eq!(u64::from(got), SSE_BLOCK_MAX as u64 * 255 * 255);
    assert_eq!(
        sum_square_error_block(&[0; SSE_BLOCK_MAX + 1], &[0; SSE_BLOCK_MAX + 1]),
        Err(SizeError::UnsupportedGeometry)
    );
}

#[test]
fn large_totals_widen() {
    let n = 3 * SSE_BLOCK + 5;
    let a = vec![0u8; n];
    let b = vec![255u8; n];
    assert_eq!(compute_sum_square_error_u64(&a, &b).unwrap(), n as u64 * 65025);
}

#[test]
fn self_error_is_zero_and_symmetric() {
    let a = make_bytes(5000, 5);
    let b = make_bytes(5000, 6);
    assert_eq!(compute_sum_square_error_u64(&a, &a).unwrap(), 0);
    assert_eq!(
        compute_sum_square_error_u64(&a, &b).unwrap(),
        compute_sum_square_error_u64(&b, &a).unwrap()
    );
}

#[test]
fn length_mismatch_rejected() {
    assert_eq!(compute_sum_square_error_u64(&[1, 2], &[1]), Err(SizeError::DimensionMismatch));
    assert_eq!(sum_square_error_block(&[1], &[]), Err(SizeError::DimensionMismatch));
}

#[cfg(feature = "std")]
#[test]
fn psnr_caps_and_decreases() {
    assert_eq!(compute_psnr(0.0, 1000), MAX_PSNR);
    assert_eq!(compute_psnr(0.0, 1), MAX_PSNR);
    // every sample off by one: 10 * log10(255²) ≈ 48.13
    let p = compute_psnr(1000.0, 1000);
    assert!((p - 48.1308).abs() < 1e-3, "{p}");
    assert!(compute_psnr(4000.0, 1000) < p);
}

#[cfg(feature = "std")]
#[test]
fn float_total_feeds_psnr() {
    let a = vec![0u8; 1000];
    let b = vec![1u8; 1000];
    let sse = compute_sum_square_error(&a, &b).unwrap();
    assert_eq!(sse, 1000.0);
    assert_eq!(compute_psnr(sse, 1000), compute_psnr(1000.0, 1000));
    assert_eq!(compute_sum_square_error(&a, &a).unwrap(), 0.0);
    assert_eq!(compute_sum_square_error(&a, &b[..3]), Err(SizeError::DimensionMismatch));
}

#[test]
fn planes_with_stride() {
    // 2x2 inside stride 3; padding bytes differ and must be ignored
    let a = [10u8, 20, 0, 30, 40, 0];
    let b = [11u8, 18, 99, 30, 43, 99];
    let pa = Plane::new(&a, 2, 2, 3).unwrap();
    let pb = Plane::new(&b, 2, 2, 3).unwrap();
    assert_eq!(plane_sum_square_error(pa, pb).unwrap(), 1 + 4 + 9);
    #[cfg(feature = "std")]
    {
        let expected = 10.0 * (255.0f64 * 255.0 * 4.0 / 14.0).log10();
        assert!((plane_psnr(pa, pb).unwrap() - expected).abs() < 1e-9);
    }
    assert_eq!(
        plane_sum_square_error(pa, Plane::packed(&b, 3, 2).unwrap()),
        Err(SizeError::DimensionMismatch)
    );
}
