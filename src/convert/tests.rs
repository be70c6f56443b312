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

// --- Helpers to generate test data ---

fn make_bytes(n: usize, seed: usize) -> Vec<u8> {
    (0..n).map(|i| ((i * 7 + seed * 13) % 251) as u8).collect()
}

fn make_words(n: usize) -> Vec<u16> {
    (0..n).map(|i| (i as u16).wrapping_mul(40503) ^ 0x5a5a).collect()
}

// --- Reference implementations, written against the formulas directly ---

fn ref_yuv(y: u8, u: u8, v: u8, c: &YuvConstants) -> [u8; 3] {
    let [ub, vr, ug, vg] = c.uv_coeff.map(i32::from);
    let [yg, bb, bg, br] = c.rgb_coeff_bias.map(i32::from);
    let (u, v) = (i32::from(u), i32::from(v));
    let y1 = (i32::from(y) * 257 * yg) >> 16;
    let clip = |x: i32| (x.max(0) >> 6).min(255) as u8;
    [
        clip(y1 + u * ub - bb),
        clip(y1 + bg - (u * ug + v * vg)),
        clip(y1 + v * vr - br),
    ]
}

fn ref_i422(y: &[u8], u: &[u8], v: &[u8], c: &YuvConstants) -> Vec<[u8; 3]> {
    y.iter()
        .enumerate()
        .map(|(x, &yv)| ref_yuv(yv, u[x / 2], v[x / 2], c))
        .collect()
}

const TEST_PIXEL_COUNTS: &[usize] = &[1, 2, 3, 7, 8, 15, 16, 17, 31, 32, 33, 47, 63, 64, 65, 100];

const MATRICES: &[YuvConstants] = &[
    YuvConstants::BT601,
    YuvConstants::JPEG,
    YuvConstants::BT709,
    YuvConstants::BT709_FULL,
    YuvConstants::BT2020,
    YuvConstants::BT2020_FULL,
];

// -----------------------------------------------------------------------
// SIMD-dispatched operations: tested at every capability tier
// -----------------------------------------------------------------------

#[test]
fn permutation_i422_to_argb() {
    let report = for_each_token_permutation(policy(), |perm| {
        for c in MATRICES {
            for &n in TEST_PIXEL_COUNTS {
                let y = make_bytes(n, 1);
                let u = make_bytes(n.div_ceil(2), 2);
                let v = make_bytes(n.div_ceil(2), 3);
                let expected: Vec<u8> = ref_i422(&y, &u, &v, c)
                    .into_iter()
                    .flat_map(|[b, g, r]| [b, g, r, 255])
                    .collect();
                let mut dst = vec![0u8; n * 4];
                i422_to_argb(&y, &u, &v, &mut dst, n, c).unwrap();
                assert_eq!(dst, expected, "i422_to_argb n={n} tier={perm}");
            }
        }
    });
    std::eprintln!("i422_to_argb: {report}");
}

#[test]
fn permutation_i422_to_rgba_and_rgb24() {
    let report = for_each_token_permutation(policy(), |perm| {
        for &n in TEST_PIXEL_COUNTS {
            let c = &YuvConstants::BT709;
            let y = make_bytes(n, 4);
            let u = make_bytes(n.div_ceil(2), 5);
            let v = make_bytes(n.div_ceil(2), 6);
            let px = ref_i422(&y, &u, &v, c);

            let expected: Vec<u8> = px.iter().flat_map(|&[b, g, r]| [255, b, g, r]).collect();
            let mut dst = vec![0u8; n * 4];
            i422_to_rgba(&y, &u, &v, &mut dst, n, c).unwrap();
            assert_eq!(dst, expected, "i422_to_rgba n={n} tier={perm}");

            let expected: Vec<u8> = px.iter().flatten().copied().collect();
            let mut dst = vec![0u8; n * 3];
            i422_to_rgb24(&y, &u, &v, &mut dst, n, c).unwrap();
            assert_eq!(dst, expected, "i422_to_rgb24 n={n} tier={perm}");
        }
    });
    std::eprintln!("i422_to_rgba_and_rgb24: {report}");
}

#[test]
fn permutation_i422_to_abgr() {
    let report = for_each_token_permutation(policy(), |perm| {
        for &n in TEST_PIXEL_COUNTS {
            let c = &YuvConstants::JPEG;
            let y = make_bytes(n, 7);
            let u = make_bytes(n.div_ceil(2), 8);
            let v = make_bytes(n.div_ceil(2), 9);
            let expected: Vec<u8> = ref_i422(&y, &u, &v, c)
                .into_iter()
                .flat_map(|[b, g, r]| [r, g, b, 255])
                .collect();
            let mut dst = vec![0u8; n * 4];
            i422_to_abgr(&y, &u, &v, &mut dst, n, c).unwrap();
            assert_eq!(dst, expected, "i422_to_abgr n={n} tier={perm}");
        }
    });
    std::eprintln!("i422_to_abgr: {report}");
}

#[test]
fn permutation_expand_contract() {
    let report = for_each_token_permutation(policy(), |perm| {
        for &n in TEST_PIXEL_COUNTS {
            let src = make_bytes(n * 4, 10);

            let mut wide = vec![0u16; n * 4];
            argb_to_ar64(&src, &mut wide, n).unwrap();
            let expected: Vec<u16> = src.iter().map(|&v| u16::from(v) << 8 | u16::from(v)).collect();
            assert_eq!(wide, expected, "argb_to_ar64 n={n} tier={perm}");

            let mut swapped = vec![0u16; n * 4];
            argb_to_ab64(&src, &mut swapped, n).unwrap();
            for (s, d) in expected.chunks_exact(4).zip(swapped.chunks_exact(4)) {
                assert_eq!([s[2], s[1], s[0], s[3]], d, "argb_to_ab64 n={n} tier={perm}");
            }

            let noisy = make_words(n * 4);
            let mut narrow = vec![0u8; n * 4];
            ar64_to_argb(&noisy, &mut narrow, n).unwrap();
            let expected: Vec<u8> = noisy.iter().map(|&v| (v >> 8) as u8).collect();
            assert_eq!(narrow, expected, "ar64_to_argb n={n} tier={perm}");

            ab64_to_argb(&noisy, &mut narrow, n).unwrap();
            for (s, d) in expected.chunks_exact(4).zip(narrow.chunks_exact(4)) {
                assert_eq!([s[2], s[1], s[0], s[3]], d, "ab64_to_argb n={n} tier={perm}");
            }
        }
    });
    std::eprintln!("expand_contract: {report}");
}

#[test]
fn permutation_three_to_four() {
    let report = for_each_token_permutation(policy(), |perm| {
        for &n in TEST_PIXEL_COUNTS {
            let src = make_bytes(n * 3, 11);
            let mut dst = vec![0u8; n * 4];

            rgb24_to_argb(&src, &mut dst, n).unwrap();
            for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact(4)) {
                assert_eq!(d, [s[0], s[1], s[2], 255], "rgb24_to_argb n={n} tier={perm}");
            }

            raw_to_argb(&src, &mut dst, n).unwrap();
            for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact(4)) {
                assert_eq!(d, [s[2], s[1], s[0], 255], "raw_to_argb n={n} tier={perm}");
            }

            raw_to_rgba(&src, &mut dst, n).unwrap();
            for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact(4)) {
                assert_eq!(d, [255, s[2], s[1], s[0]], "raw_to_rgba n={n} tier={perm}");
            }
        }
    });
    std::eprintln!("three_to_four: {report}");
}

#[test]
fn permutation_four_to_three() {
    let report = for_each_token_permutation(policy(), |perm| {
        for &n in TEST_PIXEL_COUNTS {
            let src = make_bytes(n * 4, 12);
            let mut dst = vec![0u8; n * 3];

            argb_to_rgb24(&src, &mut dst, n).unwrap();
            for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact(3)) {
                assert_eq!(d, &s[..3], "argb_to_rgb24 n={n} tier={perm}");
            }

            argb_to_raw(&src, &mut dst, n).unwrap();
            for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact(3)) {
                assert_eq!(d, [s[2], s[1], s[0]], "argb_to_raw n={n} tier={perm}");
            }

            let raw = make_bytes(n * 3, 13);
            raw_to_rgb24(&raw, &mut dst, n).unwrap();
            for (s, d) in raw.chunks_exact(3).zip(dst.chunks_exact(3)) {
                assert_eq!(d, [s[2], s[1], s[0]], "raw_to_rgb24 n={n} tier={perm}");
            }
        }
    });
    std::eprintln!("four_to_three: {report}");
}

#[test]
fn permutation_split_merge() {
    let report = for_each_token_permutation(policy(), |perm| {
        for &n in TEST_PIXEL_COUNTS {
            let rgb = make_bytes(n * 3, 14);
            let (mut r, mut g, mut b, mut a) = (vec![0; n], vec![0; n], vec![0; n], vec![0; n]);
            split_rgb(&rgb, &mut r, &mut g, &mut b, n).unwrap();
            for (i, s) in rgb.chunks_exact(3).enumerate() {
                assert_eq!([r[i], g[i], b[i]], s, "split_rgb n={n} tier={perm}");
            }
            let mut back = vec![0u8; n * 3];
            merge_rgb(&r, &g, &b, &mut back, n).unwrap();
            assert_eq!(back, rgb, "merge_rgb n={n} tier={perm}");

            let argb = make_bytes(n * 4, 15);
            split_argb(&argb, &mut r, &mut g, &mut b, &mut a, n).unwrap();
            for (i, s) in argb.chunks_exact(4).enumerate() {
                assert_eq!([b[i], g[i], r[i], a[i]], s, "split_argb n={n} tier={perm}");
            }
            let mut back = vec![0u8; n * 4];
            merge_argb(&r, &g, &b, &a, &mut back, n).unwrap();
            assert_eq!(back, argb, "merge_argb n={n} tier={perm}");
        }
    });
    std::eprintln!("split_merge: {report}");
}

#[test]
fn permutation_i422_planes_with_negative_stride() {
    let report = for_each_token_permutation(policy(), |perm| {
        let (w, h) = (37, 5);
        let cw = w / 2 + 1;
        let y = make_bytes(w * h, 16);
        let u = make_bytes(cw * h, 17);
        let v = make_bytes(cw * h, 18);
        let c = &YuvConstants::BT601;

        let mut out = vec![0u8; w * 4 * h];
        let dst = PlaneMut::packed(&mut out, w * 4, h).unwrap().flipped();
        i422_to_argb_plane(
            Plane::packed(&y, w, h).unwrap(),
            Plane::packed(&u, cw, h).unwrap(),
            Plane::packed(&v, cw, h).unwrap(),
            dst,
            c,
        )
        .unwrap();

        for row in 0..h {
            let mut expected = vec![0u8; w * 4];
            i422_to_argb(
                &y[row * w..],
                &u[row * cw..],
                &v[row * cw..],
                &mut expected,
                w,
                c,
            )
            .unwrap();
            let flipped = h - 1 - row;
            assert_eq!(
                &out[flipped * w * 4..][..w * 4],
                &expected[..],
                "i422 plane row={row} tier={perm}"
            );
        }
    });
    std::eprintln!("i422_planes: {report}");
}

// -----------------------------------------------------------------------
// Contract properties
// -----------------------------------------------------------------------

#[test]
fn expand_then_contract_is_identity() {
    let src: Vec<u8> = (0..=255).collect();
    let mut wide = vec![0u16; 256];
    let mut back = vec![0u8; 256];
    argb_to_ar64(&src, &mut wide, 64).unwrap();
    ar64_to_argb(&wide, &mut back, 64).unwrap();
    assert_eq!(back, src);
    assert_eq!(wide[0x12], 0x1212);
    assert_eq!(wide[255], 0xFFFF);
}

#[test]
fn synthesized_alpha_is_opaque() {
    let src = vec![0u8; 3 * 40];
    let mut dst = vec![0u8; 4 * 40];
    rgb24_to_argb(&src, &mut dst, 40).unwrap();
    assert!(dst.chunks_exact(4).all(|p| p[3] == 255));
    let (r, g, b) = (vec![1u8; 9], vec![2u8; 9], vec![3u8; 9]);
    merge_xrgb(&r, &g, &b, &mut dst, 9).unwrap();
    assert!(dst[..36].chunks_exact(4).all(|p| p == [3, 2, 1, 255]));
}

#[test]
fn split_xrgb_drops_alpha() {
    let src = [10u8, 20, 30, 40, 50, 60, 70, 80];
    let (mut r, mut g, mut b) = ([0u8; 2], [0u8; 2], [0u8; 2]);
    split_xrgb(&src, &mut r, &mut g, &mut b, 2).unwrap();
    assert_eq!((r, g, b), ([30, 70], [20, 60], [10, 50]));
}

#[test]
fn neutral_chroma_gives_gray() {
    let y: Vec<u8> = (0..16).map(|i| i * 16).collect();
    let u = [128u8; 8];
    let mut dst = [0u8; 64];
    i422_to_argb(&y, &u, &u, &mut dst, 16, &YuvConstants::BT601).unwrap();
    for px in dst.chunks_exact(4) {
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 255);
    }
    // studio-swing black and mid gray
    assert_eq!(dst[4], 0);
    assert_eq!(dst[8 * 4], 130);
}

#[test]
fn odd_width_reuses_last_chroma() {
    let y = [90u8, 90, 90];
    let (u, v) = ([10u8, 200], [240u8, 30]);
    let mut dst = [0u8; 12];
    i422_to_argb(&y, &u, &v, &mut dst, 3, &YuvConstants::BT601).unwrap();
    assert_eq!(&dst[8..12], &{
        let [b, g, r] = ref_yuv(90, 200, 30, &YuvConstants::BT601);
        [b, g, r, 255]
    });
    assert_ne!(dst[0..4], dst[8..12]);
}

#[test]
fn zero_width_is_a_no_op() {
    let mut dst = [7u8; 4];
    i422_to_argb(&[], &[], &[], &mut dst, 0, &YuvConstants::BT601).unwrap();
    raw_to_argb(&[], &mut dst, 0).unwrap();
    assert_eq!(dst, [7; 4]);
}

#[test]
fn short_buffers_are_rejected() {
    let mut dst = [0u8; 7];
    assert_eq!(
        rgb24_to_argb(&[0; 6], &mut dst, 2),
        Err(SizeError::BufferTooSmall { needed: 8, actual: 7 })
    );
    assert!(i422_to_argb(&[0; 4], &[0; 1], &[0; 2], &mut [0; 16], 4, &YuvConstants::BT601).is_err());
}

#[test]
fn scalar_pixel_matches_reference_everywhere() {
    for c in MATRICES {
        for y in (0..=255).step_by(5) {
            for u in (0..=255).step_by(17) {
                for v in (0..=255).step_by(15) {
                    assert_eq!(scalar::yuv_pixel(y, u, v, c), ref_yuv(y, u, v, c));
                }
            }
        }
    }
}
