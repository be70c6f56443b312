extern crate alloc;
extern crate std;
use super::*;
use crate::{Plane, PlaneMut};
use alloc::{vec, vec::Vec};
use archmage::testing::{CompileTimePolicy, for_each_token_permutation};

fn policy() -> CompileTimePolicy {
    if std::env::var_os("CI").is_some() {
        CompileTimePolicy::Fail
    } else {
        CompileTimePolicy::WarnStderr
    }
}

fn make_bytes(n: usize, seed: usize) -> Vec<u8> {
    (0..n).map(|i| ((i * 37 + seed * 101) % 256) as u8).collect()
}

const TEST_WIDTHS: &[usize] = &[1, 2, 3, 7, 15, 16, 17, 31, 32, 33, 63, 64, 65, 100];

// -----------------------------------------------------------------------
// SIMD-dispatched rows: tested at every capability tier
// -----------------------------------------------------------------------

#[test]
fn permutation_down2() {
    let report = for_each_token_permutation(policy(), |perm| {
        for &w in TEST_WIDTHS {
            let s0 = make_bytes(w * 2, 1);
            let s1 = make_bytes(w * 2, 2);
            let mut dst = vec![0u8; w];

            let expected: Vec<u8> = (0..w).map(|x| s0[2 * x + 1]).collect();
            scale_row_down2(&s0, &mut dst, w).unwrap();
            assert_eq!(dst, expected, "down2 w={w} tier={perm}");

            let expected: Vec<u8> = (0..w)
                .map(|x| ((u32::from(s0[2 * x]) + u32::from(s0[2 * x + 1]) + 1) >> 1) as u8)
                .collect();
            scale_row_down2_linear(&s0, &mut dst, w).unwrap();
            assert_eq!(dst, expected, "down2_linear w={w} tier={perm}");

            let expected: Vec<u8> = (0..w)
                .map(|x| {
                    let sum: u32 = [s0[2 * x], s0[2 * x + 1], s1[2 * x], s1[2 * x + 1]]
                        .into_iter()
                        .map(u32::from)
                        .sum();
                    ((sum + 2) >> 2) as u8
                })
                .collect();
            scale_row_down2_box(&s0, &s1, &mut dst, w).unwrap();
            assert_eq!(dst, expected, "down2_box w={w} tier={perm}");
        }
    });
    std::eprintln!("down2: {report}");
}

#[test]
fn permutation_add_row() {
    let report = for_each_token_permutation(policy(), |perm| {
        for &w in TEST_WIDTHS {
            let src = make_bytes(w, 3);
            let mut acc: Vec<u16> = (0..w).map(|i| (i * 1000) as u16).collect();
            acc[0] = u16::MAX - 10;
            let expected: Vec<u16> = acc
                .iter()
                .zip(&src)
                .map(|(&a, &s)| a.saturating_add(u16::from(s)))
                .collect();
            scale_add_row(&src, &mut acc, w).unwrap();
            assert_eq!(acc, expected, "add_row w={w} tier={perm}");
        }
    });
    std::eprintln!("add_row: {report}");
}

#[test]
fn permutation_interpolate_row() {
    let report = for_each_token_permutation(policy(), |perm| {
        for &w in TEST_WIDTHS {
            let s0 = make_bytes(w, 4);
            let s1 = make_bytes(w, 5);
            for f in [0u8, 1, 64, 128, 200, 255] {
                let expected: Vec<u8> = s0
                    .iter()
                    .zip(&s1)
                    .map(|(&a, &b)| {
                        let f = u32::from(f);
                        ((u32::from(a) * (256 - f) + u32::from(b) * f + 128) >> 8) as u8
                    })
                    .collect();
                let mut dst = vec![0u8; w];
                interpolate_row(&s0, &s1, &mut dst, w, f).unwrap();
                assert_eq!(dst, expected, "interpolate w={w} f={f} tier={perm}");
            }
        }
    });
    std::eprintln!("interpolate_row: {report}");
}

#[test]
fn permutation_scale_plane_half() {
    let report = for_each_token_permutation(policy(), |perm| {
        let (sw, sh) = (70, 10);
        let src = make_bytes(sw * sh, 6);
        let plane = Plane::packed(&src, sw, sh).unwrap();
        let mut out = vec![0u8; 35 * 5];
        scale_plane(plane, PlaneMut::packed(&mut out, 35, 5).unwrap(), FilterMode::Box).unwrap();
        for y in 0..5 {
            let mut row = vec![0u8; 35];
            scale_row_down2_box(plane.row(2 * y), plane.row(2 * y + 1), &mut row, 35).unwrap();
            assert_eq!(&out[y * 35..][..35], &row[..], "row {y} tier={perm}");
        }
    });
    std::eprintln!("scale_plane_half: {report}");
}

// -----------------------------------------------------------------------
// Row kernels against hand-worked values
// -----------------------------------------------------------------------

#[test]
fn down2_of_four_pixels() {
    let src = [10u8, 20, 30, 40];
    let mut dst = [0u8; 2];
    scale_row_down2(&src, &mut dst, 2).unwrap();
    assert_eq!(dst, [20, 40]);
    scale_row_down2_linear(&src, &mut dst, 2).unwrap();
    assert_eq!(dst, [15, 35]);
    scale_row_down2_box(&src, &src, &mut dst, 2).unwrap();
    assert_eq!(dst, [15, 35]);
}

#[test]
fn down4_picks_third_pixel_and_box_rounds() {
    let src: Vec<u8> = (0..8).collect();
    let mut dst = [0u8; 2];
    scale_row_down4(&src, &mut dst, 2).unwrap();
    assert_eq!(dst, [2, 6]);
    let r = [0u8, 0, 0, 1, 255, 255, 255, 255];
    scale_row_down4_box([&r, &r, &r, &r], &mut dst, 2).unwrap();
    // 4 / 16 rounds to 0; 4080 / 16 is exact
    assert_eq!(dst, [0, 255]);
}

#[test]
fn down34_taps() {
    let s = [0u8, 40, 80, 120];
    let t = [100u8, 100, 100, 100];
    let mut dst = [0u8; 3];
    scale_row_down34(&s, &mut dst, 3).unwrap();
    assert_eq!(dst, [0, 40, 120]);
    // horizontal taps of s: 10, 60, 110
    scale_row_down34_0_box(&s, &s, &mut dst, 3).unwrap();
    assert_eq!(dst, [10, 60, 110]);
    // (3 * tap + 100 + 2) >> 2
    scale_row_down34_0_box(&s, &t, &mut dst, 3).unwrap();
    assert_eq!(dst, [33, 70, 108]);
    scale_row_down34_1_box(&s, &t, &mut dst, 3).unwrap();
    assert_eq!(dst, [55, 80, 105]);
}

#[test]
fn down38_box_means() {
    let row: Vec<u8> = (1..=8).collect();
    let mut dst = [0u8; 3];
    scale_row_down38(&row, &mut dst, 3).unwrap();
    assert_eq!(dst, [1, 4, 7]);
    scale_row_down38_3_box(&row, &row, &row, &mut dst, 3).unwrap();
    assert_eq!(dst, [2, 5, 7]);
    scale_row_down38_2_box(&row, &row, &mut dst, 3).unwrap();
    assert_eq!(dst, [2, 5, 7]);

    let flat = [255u8; 8];
    scale_row_down38_3_box(&flat, &flat, &flat, &mut dst, 3).unwrap();
    assert_eq!(dst, [255; 3]);
    scale_row_down38_2_box(&flat, &flat, &mut dst, 3).unwrap();
    assert_eq!(dst, [255; 3]);
}

#[test]
fn thirds_need_multiple_of_three() {
    let src = [0u8; 16];
    let mut dst = [0u8; 4];
    assert_eq!(scale_row_down34(&src, &mut dst, 4), Err(SizeError::UnsupportedGeometry));
    assert_eq!(
        scale_row_down38_2_box(&src, &src, &mut dst, 2),
        Err(SizeError::UnsupportedGeometry)
    );
}

#[test]
fn filter_cols_seven_bit_weights() {
    let src = [0u8, 128, 255];
    let mut dst = [0u8; 4];
    // positions 0.0, 0.5, 1.0, 1.5
    scale_filter_cols(&src, &mut dst, 4, 0, 0x8000).unwrap();
    assert_eq!(dst, [0, 64, 128, 192]);
    // right tap of the last pixel repeats it
    let mut one = [0u8; 1];
    scale_filter_cols(&src, &mut one, 1, (2 << 16) + 0x8000, 0).unwrap();
    assert_eq!(one, [255]);
}

#[test]
fn filter_cols_reads_right_tap_past_the_walk() {
    // the walk ends at 1.5, so sample 2 is only needed as a right tap
    let src = [0u8, 100, 200, 50];
    let mut dst = [0u8; 2];
    scale_filter_cols(&src, &mut dst, 2, 0x8000, 0x1_0000).unwrap();
    assert_eq!(dst, [50, 150]);
    scale_filter_cols(&src[..3], &mut dst, 2, 0x8000, 0x1_0000).unwrap();
    assert_eq!(dst, [50, 150]);
    // without it the last position clamps to sample 1
    scale_filter_cols(&src[..2], &mut dst, 2, 0x8000, 0x1_0000).unwrap();
    assert_eq!(dst, [50, 100]);
    assert!(matches!(
        scale_filter_cols(&src[..1], &mut dst, 2, 0x8000, 0x1_0000),
        Err(SizeError::BufferTooSmall { needed: 2, actual: 1 })
    ));
}

#[test]
fn cols_point_and_up2() {
    let src = [1u8, 2, 3, 4];
    let mut dst = [0u8; 2];
    scale_cols(&src, &mut dst, 2, 0x1_0000, 0x2_0000).unwrap();
    assert_eq!(dst, [2, 4]);
    let mut up = [0u8; 7];
    scale_cols_up2(&src, &mut up, 7).unwrap();
    assert_eq!(up, [1, 1, 2, 2, 3, 3, 4]);
    assert!(matches!(
        scale_cols(&src, &mut dst, 2, 0x1_0000, 0x3_0000),
        Err(SizeError::BufferTooSmall { needed: 5, actual: 4 })
    ));
    assert_eq!(scale_cols(&src, &mut dst, 2, -1, 0x1_0000), Err(SizeError::UnsupportedGeometry));
}

#[test]
fn up2_linear_edges_copy() {
    let src = [0u8, 100];
    let mut dst = [0u8; 4];
    scale_row_up2_linear(&src, &mut dst, 4).unwrap();
    assert_eq!(dst, [0, 25, 75, 100]);
    let mut odd = [0u8; 3];
    scale_row_up2_linear(&src, &mut odd, 3).unwrap();
    assert_eq!(odd, [0, 25, 100]);
}

#[test]
fn up2_bilinear_weights() {
    let s = [0u8, 160];
    let t = [16u8, 16];
    let mut d0 = [0u8; 4];
    let mut d1 = [0u8; 4];
    scale_row_up2_bilinear(&s, &t, &mut d0, &mut d1, 4).unwrap();
    // corners are 3:1 vertical blends
    assert_eq!((d0[0], d1[0]), (4, 12));
    assert_eq!((d0[3], d1[3]), (124, 52));
    // (0*9 + 160*3 + 16*3 + 16 + 8) >> 4 = 34
    assert_eq!(d0[1], 34);
    // (0*3 + 160 + 16*9 + 16*3 + 8) >> 4 = 22
    assert_eq!(d1[1], 22);
}

#[test]
fn argb_and_uv_rows() {
    let src: Vec<u8> = (0..16).collect();
    let mut dst = [0u8; 8];
    scale_argb_row_down2(&src, &mut dst, 2).unwrap();
    assert_eq!(dst, [4, 5, 6, 7, 12, 13, 14, 15]);
    scale_argb_row_down2_linear(&src, &mut dst, 2).unwrap();
    assert_eq!(dst, [2, 3, 4, 5, 10, 11, 12, 13]);
    scale_argb_row_down2_box(&src, &src, &mut dst, 2).unwrap();
    assert_eq!(dst, [2, 3, 4, 5, 10, 11, 12, 13]);

    let mut one = [0u8; 4];
    scale_argb_row_down_even(&src, 3, &mut one, 1).unwrap();
    assert_eq!(one, [0, 1, 2, 3]);
    let mut two = [0u8; 8];
    scale_argb_row_down_even(&src, 3, &mut two, 2).unwrap();
    assert_eq!(two, [0, 1, 2, 3, 12, 13, 14, 15]);
    scale_argb_row_down_even_box(&src, &src, 2, &mut two, 2).unwrap();
    assert_eq!(two, [2, 3, 4, 5, 10, 11, 12, 13]);
    assert_eq!(
        scale_argb_row_down_even(&src, 0, &mut two, 2),
        Err(SizeError::UnsupportedGeometry)
    );

    let uv = [10u8, 200, 20, 100];
    let mut out = [0u8; 2];
    scale_uv_row_down2_box(&uv, &uv, &mut out, 1).unwrap();
    assert_eq!(out, [15, 150]);
}

#[test]
fn argb_column_walks() {
    let src: Vec<u8> = (0..16).collect();
    let mut dst = [0u8; 8];
    // pixels 1 and 3
    scale_argb_cols(&src, &mut dst, 2, 0x1_0000, 0x2_0000).unwrap();
    assert_eq!(dst, [4, 5, 6, 7, 12, 13, 14, 15]);
    assert!(matches!(
        scale_argb_cols(&src, &mut dst, 2, 0x1_0000, 0x3_0000),
        Err(SizeError::BufferTooSmall { needed: 20, actual: 16 })
    ));

    let mut up = [0u8; 12];
    scale_argb_cols_up2(&src[..8], &mut up, 3).unwrap();
    assert_eq!(up, [0, 1, 2, 3, 0, 1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn argb_filter_cols_weights_sum_to_127() {
    let src = [0u8, 100, 200, 255, 128, 100, 0, 255];
    let mut dst = [0u8; 8];
    // positions 0.0 and 0.5
    scale_argb_filter_cols(&src, &mut dst, 2, 0, 0x8000).unwrap();
    // f = 0: a * 127 >> 7
    assert_eq!(dst[..4], [0, 99, 198, 253]);
    // f = 64: (a * 63 + b * 64) >> 7
    assert_eq!(dst[4..], [64, 99, 98, 253]);

    // the last position blends into a pixel beyond the walk
    let mut one = [0u8; 4];
    scale_argb_filter_cols(&src, &mut one, 1, 0x8000, 0).unwrap();
    assert_eq!(one, [64, 99, 98, 253]);
    // and repeats the last pixel when there is none
    scale_argb_filter_cols(&src[..4], &mut one, 1, 0x8000, 0).unwrap();
    assert_eq!(one, [0, 99, 198, 253]);
    assert!(matches!(
        scale_argb_filter_cols(&src[..3], &mut one, 1, 0, 0),
        Err(SizeError::BufferTooSmall { needed: 4, actual: 3 })
    ));
}

#[test]
fn up2_sixteen_bit_rows() {
    let src = [0u16, 40000];
    let mut dst = [0u16; 4];
    scale_row_up2_linear_16(&src, &mut dst, 4).unwrap();
    // (3 * near + far + 2) >> 2 without 16-bit overflow
    assert_eq!(dst, [0, 10000, 30000, 40000]);

    let flat = [65535u16; 3];
    let mut d0 = [0u16; 6];
    let mut d1 = [0u16; 6];
    scale_row_up2_linear_16(&flat, &mut d0, 5).unwrap();
    assert_eq!(d0[..5], [65535; 5]);
    scale_row_up2_bilinear_16(&flat, &flat, &mut d0, &mut d1, 6).unwrap();
    assert_eq!((d0, d1), ([65535; 6], [65535; 6]));

    let s = [0u16, 16000];
    let t = [1600u16, 1600];
    let (mut d0, mut d1) = ([0u16; 4], [0u16; 4]);
    scale_row_up2_bilinear_16(&s, &t, &mut d0, &mut d1, 4).unwrap();
    // corners are 3:1 vertical blends
    assert_eq!((d0[0], d1[0]), (400, 1200));
    // (0 * 9 + (16000 + 1600) * 3 + 1600 + 8) >> 4
    assert_eq!(d0[1], 3400);
    assert_eq!(
        scale_row_up2_linear_16(&src, &mut dst, 5),
        Err(SizeError::BufferTooSmall { needed: 3, actual: 2 })
    );
}

#[test]
fn zero_width_is_noop() {
    let mut dst: [u8; 0] = [];
    scale_row_down2(&[], &mut dst, 0).unwrap();
    scale_row_up2_linear(&[], &mut dst, 0).unwrap();
    scale_filter_cols(&[], &mut dst, 0, 0, 0).unwrap();
    interpolate_row(&[], &[], &mut dst, 0, 77).unwrap();
}

#[test]
fn short_buffers_rejected() {
    let mut dst = [0u8; 4];
    assert_eq!(
        scale_row_down2(&[0; 7], &mut dst, 4),
        Err(SizeError::BufferTooSmall { needed: 8, actual: 7 })
    );
    assert_eq!(
        scale_row_down2_box(&[0; 8], &[0; 8], &mut dst[..3], 4),
        Err(SizeError::BufferTooSmall { needed: 4, actual: 3 })
    );
}

// -----------------------------------------------------------------------
// Plane scaler
// -----------------------------------------------------------------------

fn scale_flat(value: u8, sw: usize, sh: usize, dw: usize, dh: usize, filter: FilterMode) -> Vec<u8> {
    let src = vec![value; sw * sh];
    let mut dst = vec![0u8; dw * dh];
    scale_plane(
        Plane::packed(&src, sw, sh).unwrap(),
        PlaneMut::packed(&mut dst, dw, dh).unwrap(),
        filter,
    )
    .unwrap();
    dst
}

#[test]
fn uniform_planes_stay_uniform() {
    // one case per selection path, plus odd ratios
    let cases: &[(usize, usize, usize, usize)] = &[
        (16, 16, 16, 16), // copy
        (16, 16, 16, 7),  // vertical
        (16, 16, 12, 12), // 3/4
        (16, 16, 8, 8),   // 1/2
        (16, 16, 6, 6),   // 3/8
        (16, 16, 4, 4),   // 1/4
        (100, 90, 13, 11),
        (9, 7, 18, 14), // 2x
        (9, 7, 17, 13),
        (10, 10, 37, 23),
        (37, 23, 10, 10),
        (5, 40, 3, 2),
        (1, 1, 5, 5),
    ];
    for &(sw, sh, dw, dh) in cases {
        for filter in [FilterMode::None, FilterMode::Linear, FilterMode::Bilinear, FilterMode::Box] {
            for value in [0u8, 1, 128, 254, 255] {
                let out = scale_flat(value, sw, sh, dw, dh, filter);
                assert!(
                    out.iter().all(|&v| v == value),
                    "{sw}x{sh} -> {dw}x{dh} {filter:?} value={value}: {out:?}"
                );
            }
        }
    }
}

#[test]
fn point_upscale_duplicates() {
    let src = [1u8, 2, 3, 4];
    let mut dst = [0u8; 16];
    scale_plane(
        Plane::packed(&src, 2, 2).unwrap(),
        PlaneMut::packed(&mut dst, 4, 4).unwrap(),
        FilterMode::None,
    )
    .unwrap();
    assert_eq!(dst, [1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]);
}

#[test]
fn point_half_takes_odd_samples() {
    let src: Vec<u8> = (0..16).collect();
    let mut dst = [0u8; 4];
    scale_plane(
        Plane::packed(&src, 4, 4).unwrap(),
        PlaneMut::packed(&mut dst, 2, 2).unwrap(),
        FilterMode::None,
    )
    .unwrap();
    assert_eq!(dst, [5, 7, 13, 15]);
}

#[test]
fn box_averages_blocks() {
    // 3x downscale: each output is the mean of a 3x3 block
    let (sw, sh) = (9, 6);
    let src: Vec<u8> = (0..sw * sh).map(|i| (i % sw * 10) as u8).collect();
    let mut dst = [0u8; 6];
    scale_plane(
        Plane::packed(&src, sw, sh).unwrap(),
        PlaneMut::packed(&mut dst, 3, 2).unwrap(),
        FilterMode::Box,
    )
    .unwrap();
    assert_eq!(dst, [10, 40, 70, 10, 40, 70]);
}

#[test]
fn box_thumbnail_of_tall_boxes() {
    // 300-row boxes overflow a u16 column sum
    assert!(ScaleGeometry::new(1200, 1200, 4, 4, FilterMode::Box).unwrap().max_box_height() > 257);
    let out = scale_flat(77, 1200, 1200, 4, 4, FilterMode::Box);
    assert!(out.iter().all(|&v| v == 77), "{out:?}");
    let out = scale_flat(255, 1200, 1200, 4, 4, FilterMode::Box);
    assert!(out.iter().all(|&v| v == 255), "{out:?}");
}

#[test]
fn box_thumbnail_averages_bands() {
    // rows alternate between 0 and 200 within each 300x300 box
    let (sw, sh) = (600, 600);
    let src: Vec<u8> = (0..sw * sh).map(|i| if (i / sw) % 2 == 0 { 0 } else { 200 }).collect();
    let mut dst = [0u8; 4];
    scale_plane(
        Plane::packed(&src, sw, sh).unwrap(),
        PlaneMut::packed(&mut dst, 2, 2).unwrap(),
        FilterMode::Box,
    )
    .unwrap();
    assert_eq!(dst, [100; 4]);
}

#[test]
fn flipped_destination_is_upside_down() {
    let src: Vec<u8> = (0..8).map(|i| i * 10).collect();
    let mut a = [0u8; 16];
    let mut b = [0u8; 16];
    let plane = Plane::packed(&src, 2, 4).unwrap();
    scale_plane(plane, PlaneMut::packed(&mut a, 4, 4).unwrap(), FilterMode::Bilinear).unwrap();
    scale_plane(plane, PlaneMut::packed(&mut b, 4, 4).unwrap().flipped(), FilterMode::Bilinear).unwrap();
    for y in 0..4 {
        assert_eq!(a[y * 4..][..4], b[(3 - y) * 4..][..4]);
    }
}

#[test]
fn empty_destination_is_noop() {
    let src = [1u8; 4];
    let mut dst: [u8; 0] = [];
    scale_plane(
        Plane::packed(&src, 2, 2).unwrap(),
        PlaneMut::packed(&mut dst, 0, 0).unwrap(),
        FilterMode::Box,
    )
    .unwrap();
}
