//! Whole-plane scaling: picks a row kernel by ratio and walks the rows.

use alloc::vec;

use super::geometry::fixed_div;
use super::scalar::*;
use super::{
    FilterMode, ScaleGeometry, add_row_dispatch, down2_box_dispatch, down2_dispatch,
    down2_linear_dispatch, interpolate_dispatch,
};
use crate::{Plane, PlaneMut, SizeError};

/// Tallest box whose column sums fit a `u16`: 257 * 255 = 65535.
const MAX_BOX_HEIGHT_U16: usize = 257;

/// Scale `src` into `dst` using `filter`.
///
/// The filter is first reduced to the cheapest equivalent for the ratio
/// (see [`ScaleGeometry`]). Exact 3/4, 1/2, 3/8 and 1/4 reductions and 2x
/// enlargements take dedicated row kernels; other ratios use box averaging,
/// bilinear filtering, or point sampling.
///
/// An empty `dst` is a no-op. Dimensions must stay below 32768.
pub fn scale_plane(src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>, filter: FilterMode) -> Result<(), SizeError> {
    if dst.is_empty() {
        return Ok(());
    }
    if src.is_empty() {
        return Err(SizeError::DimensionMismatch);
    }
    let g = ScaleGeometry::new(src.width(), src.height(), dst.width(), dst.height(), filter)?;
    let (sw, sh, dw, dh) = (g.src_width, g.src_height, g.dst_width, g.dst_height);

    if sw == dw && sh == dh {
        for y in 0..dh {
            dst.row_mut(y).copy_from_slice(src.row(y));
        }
        return Ok(());
    }
    if sw == dw && g.filter != FilterMode::Box {
        vertical(src, dst, &g);
        return Ok(());
    }
    if dw <= sw && dh <= sh {
        if 4 * dw == 3 * sw && 4 * dh == 3 * sh {
            down34(src, dst, g.filter);
            return Ok(());
        }
        if 2 * dw == sw && 2 * dh == sh {
            down2(src, dst, g.filter);
            return Ok(());
        }
        if 8 * dw == 3 * sw && 8 * dh == 3 * sh {
            down38(src, dst, g.filter);
            return Ok(());
        }
        if 4 * dw == sw && 4 * dh == sh && matches!(g.filter, FilterMode::None | FilterMode::Box) {
            down4(src, dst, g.filter);
            return Ok(());
        }
    }
    match g.filter {
        FilterMode::Box => {
            box_filter(src, dst, &g);
            Ok(())
        }
        FilterMode::Linear if dw.div_ceil(2) == sw => {
            up2_linear(src, dst);
            Ok(())
        }
        FilterMode::Bilinear if dw.div_ceil(2) == sw && dh.div_ceil(2) == sh => {
            up2_bilinear(src, dst);
            Ok(())
        }
        FilterMode::Linear | FilterMode::Bilinear => {
            bilinear(src, dst, &g);
            Ok(())
        }
        FilterMode::None => {
            point(src, dst, &g);
            Ok(())
        }
    }
}

/// Row `y` clamped into the plane.
#[inline]
fn clamped_row<'a>(src: &Plane<'a, u8>, y: i64) -> &'a [u8] {
    let last = src.height() - 1;
    src.row((y.max(0) as usize).min(last))
}

fn vertical(src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>, g: &ScaleGeometry) {
    let max_y = ((g.src_height - 1) as i64) << 16;
    let mut y = i64::from(g.y);
    for j in 0..g.dst_height {
        let yc = y.clamp(0, max_y);
        let yi = yc >> 16;
        let yf = if g.filter == FilterMode::Bilinear { ((yc >> 8) & 255) as u8 } else { 0 };
        interpolate_dispatch(clamped_row(&src, yi), clamped_row(&src, yi + 1), dst.row_mut(j), yf);
        y += i64::from(g.dy);
    }
}

fn down2(src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>, filter: FilterMode) {
    for y in 0..dst.height() {
        let d = dst.row_mut(y);
        match filter {
            FilterMode::None => down2_dispatch(src.row(2 * y + 1), d),
            FilterMode::Linear => down2_linear_dispatch(src.row(2 * y), d),
            FilterMode::Bilinear | FilterMode::Box => {
                down2_box_dispatch(src.row(2 * y), src.row(2 * y + 1), d);
            }
        }
    }
}

fn down4(src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>, filter: FilterMode) {
    for y in 0..dst.height() {
        let d = dst.row_mut(y);
        if filter == FilterMode::None {
            down4_row(src.row(4 * y + 2), d);
        } else {
            let r = 4 * y;
            down4_box_row([src.row(r), src.row(r + 1), src.row(r + 2), src.row(r + 3)], d);
        }
    }
}

// Each group of four source rows makes three output rows: rows 0+1 blended
// 3:1, rows 1+2 blended 1:1, rows 3+2 blended 3:1. Linear filters each row
// only horizontally and None point samples rows 0, 1 and 3.
fn down34(src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>, filter: FilterMode) {
    for group in 0..dst.height() / 3 {
        let (r, o) = (group * 4, group * 3);
        let row = |k: usize| src.row(r + k);
        match filter {
            FilterMode::None => {
                down34_row(row(0), dst.row_mut(o));
                down34_row(row(1), dst.row_mut(o + 1));
                down34_row(row(3), dst.row_mut(o + 2));
            }
            FilterMode::Linear => {
                down34_0_box_row(row(0), row(0), dst.row_mut(o));
                down34_1_box_row(row(1), row(1), dst.row_mut(o + 1));
                down34_0_box_row(row(3), row(3), dst.row_mut(o + 2));
            }
            FilterMode::Bilinear | FilterMode::Box => {
                down34_0_box_row(row(0), row(1), dst.row_mut(o));
                down34_1_box_row(row(1), row(2), dst.row_mut(o + 1));
                down34_0_box_row(row(3), row(2), dst.row_mut(o + 2));
            }
        }
    }
}

// Each group of eight source rows makes three output rows from rows 0..3,
// 3..6 and 6..8.
fn down38(src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>, filter: FilterMode) {
    for group in 0..dst.height() / 3 {
        let (r, o) = (group * 8, group * 3);
        let row = |k: usize| src.row(r + k);
        match filter {
            FilterMode::None => {
                down38_row(row(0), dst.row_mut(o));
                down38_row(row(3), dst.row_mut(o + 1));
                down38_row(row(6), dst.row_mut(o + 2));
            }
            FilterMode::Linear => {
                down38_3_box_row(row(0), row(0), row(0), dst.row_mut(o));
                down38_3_box_row(row(3), row(3), row(3), dst.row_mut(o + 1));
                down38_2_box_row(row(6), row(6), dst.row_mut(o + 2));
            }
            FilterMode::Bilinear | FilterMode::Box => {
                down38_3_box_row(row(0), row(1), row(2), dst.row_mut(o));
                down38_3_box_row(row(3), row(4), row(5), dst.row_mut(o + 1));
                down38_2_box_row(row(6), row(7), dst.row_mut(o + 2));
            }
        }
    }
}

// Boxes up to 257 rows tall sum into the vectorized `u16` accumulator;
// taller ones use `u32` sums.
fn box_filter(src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>, g: &ScaleGeometry) {
    if g.max_box_height() <= MAX_BOX_HEIGHT_U16 {
        let mut acc = vec![0u16; g.src_width];
        box_rows(&src, &mut dst, g, &mut acc[..], add_row_dispatch);
    } else {
        let mut acc = vec![0u32; g.src_width];
        box_rows(&src, &mut dst, g, &mut acc[..], add_row_wide);
    }
}

fn box_rows<A: Copy + Default + Into<u64>>(
    src: &Plane<'_, u8>,
    dst: &mut PlaneMut<'_, u8>,
    g: &ScaleGeometry,
    acc: &mut [A],
    add_row: fn(&[u8], &mut [A]),
) {
    let max_y = (g.src_height as i64) << 16;
    let mut y = i64::from(g.y);
    for j in 0..g.dst_height {
        let iy = y >> 16;
        y = (y + i64::from(g.dy)).min(max_y);
        let box_height = ((y >> 16) - iy).max(1);
        acc.fill(A::default());
        for k in 0..box_height {
            add_row(clamped_row(src, iy + k), acc);
        }
        add_cols_row(acc, dst.row_mut(j), box_height as usize, g.x, g.dx);
    }
}

// Rows are blended first into a scratch row, then filtered across.
fn bilinear(src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>, g: &ScaleGeometry) {
    let max_y = ((g.src_height - 1) as i64) << 16;
    let mut scratch = vec![0u8; g.src_width];
    let mut y = i64::from(g.y);
    for j in 0..g.dst_height {
        let yc = y.clamp(0, max_y);
        let yi = yc >> 16;
        let row = if g.filter == FilterMode::Bilinear {
            let yf = ((yc >> 8) & 255) as u8;
            interpolate_dispatch(clamped_row(&src, yi), clamped_row(&src, yi + 1), &mut scratch, yf);
            &scratch[..]
        } else {
            clamped_row(&src, yi)
        };
        filter_cols_row(row, dst.row_mut(j), g.x, g.dx);
        y += i64::from(g.dy);
    }
}

fn point(src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>, g: &ScaleGeometry) {
    let up2 = g.src_width * 2 == g.dst_width && g.x < 0x8000;
    let mut y = i64::from(g.y);
    for j in 0..g.dst_height {
        let row = clamped_row(&src, y >> 16);
        if up2 {
            cols_up2_row(row, dst.row_mut(j));
        } else {
            cols_row(row, dst.row_mut(j), g.x, g.dx);
        }
        y += i64::from(g.dy);
    }
}

// Rows are point sampled from pixel centers spread across the source.
fn up2_linear(src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>) {
    let (sh, dh) = (src.height(), dst.height());
    if dh == 1 {
        up2_linear_row(src.row((sh - 1) / 2), dst.row_mut(0));
        return;
    }
    let dy = i64::from(fixed_div(sh - 1, dh - 1));
    let mut y: i64 = (1 << 15) - 1;
    for j in 0..dh {
        up2_linear_row(clamped_row(&src, y >> 16), dst.row_mut(j));
        y += dy;
    }
}

// First and (for even heights) last output rows only see one source row.
fn up2_bilinear(src: Plane<'_, u8>, mut dst: PlaneMut<'_, u8>) {
    let (sh, dh) = (src.height(), dst.height());
    up2_linear_row(src.row(0), dst.row_mut(0));
    for i in 0..sh - 1 {
        let (d0, d1) = dst.row_pair_mut(2 * i + 1, 2 * i + 2);
        up2_bilinear_row(src.row(i), src.row(i + 1), d0, d1);
    }
    if dh % 2 == 0 {
        up2_linear_row(src.row(sh - 1), dst.row_mut(dh - 1));
    }
}
