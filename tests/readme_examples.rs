//! Validates the code examples from README.md compile and behave correctly.

#[test]
fn readme_convert() {
    use pixmill::{YuvConstants, i422_to_argb};

    let y = [128u8, 128];
    let u = [128u8];
    let v = [128u8];
    let mut argb = [0u8; 8];
    i422_to_argb(&y, &u, &v, &mut argb, 2, &YuvConstants::JPEG).unwrap();
    assert_eq!(argb[3], 255);
    assert_eq!(argb[..4], argb[4..]);
}

#[test]
fn readme_scale() {
    use pixmill::{FilterMode, Plane, PlaneMut, scale_plane};

    let src = vec![50u8; 640 * 480];
    let mut dst = vec![0u8; 320 * 240];
    scale_plane(
        Plane::packed(&src, 640, 480).unwrap(),
        PlaneMut::packed(&mut dst, 320, 240).unwrap(),
        FilterMode::Box,
    )
    .unwrap();
    assert!(dst.iter().all(|&p| p == 50));
}

#[test]
fn bottom_up_destination() {
    use pixmill::{Plane, PlaneMut, transpose_plane};

    // transposing into a negative-stride plane also flips vertically
    let src = [1u8, 2, 3, 4];
    let mut dst = [0u8; 4];
    transpose_plane(
        Plane::packed(&src, 2, 2).unwrap(),
        PlaneMut::new(&mut dst, 2, 2, -2).unwrap(),
    )
    .unwrap();
    assert_eq!(dst, [2, 4, 1, 3]);
}

#[cfg(feature = "std")]
#[test]
fn psnr_of_identical_planes() {
    use pixmill::{MAX_PSNR, Plane, plane_psnr};

    let a = vec![9u8; 100];
    let p = Plane::packed(&a, 10, 10).unwrap();
    assert_eq!(plane_psnr(p, p).unwrap(), MAX_PSNR);
}

#[cfg(feature = "rgb")]
#[test]
fn readme_typed() {
    use pixmill::{YuvConstants, typed};
    use rgb::Bgra;

    let y = vec![128u8; 4];
    let uv = vec![128u8; 2];
    let mut px = vec![Bgra::default(); 4];
    typed::i422_to_bgra(&y, &uv, &uv, &mut px, &YuvConstants::JPEG).unwrap();
    assert!(px.iter().all(|p| p.a == 255 && p.r == p.g && p.g == p.b));
}

#[cfg(feature = "imgref")]
#[test]
fn readme_imgref() {
    use ::imgref::ImgVec;
    use pixmill::img;

    let src = ImgVec::new((0..12u8).collect::<Vec<_>>(), 4, 3);
    let turned = img::rotate_270(src.as_ref()).unwrap();
    assert_eq!((turned.width(), turned.height()), (3, 4));
    let back = img::rotate_90(turned.as_ref()).unwrap();
    assert_eq!(back.buf(), src.buf());
}
