//! Filter selection and 16.16 stepping for plane scaling.

use crate::SizeError;

/// How source samples are combined into each destination sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Point sampling.
    None,
    /// Horizontal interpolation only; rows are point sampled.
    Linear,
    /// Horizontal and vertical interpolation.
    #[default]
    Bilinear,
    /// Area average. Falls back to bilinear when either axis shrinks by
    /// less than half.
    Box,
}

/// 16.16 `num / div`, truncated.
#[inline]
pub(crate) fn fixed_div(num: usize, div: usize) -> i32 {
    (((num as i64) << 16) / div as i64) as i32
}

/// 16.16 `(num - 1) / (div - 1)` that lands the last sample exactly on the
/// last source pixel when upsampling.
#[inline]
pub(crate) fn fixed_div1(num: usize, div: usize) -> i32 {
    ((((num as i64) << 16) - 0x0001_0001) / (div as i64 - 1)) as i32
}

/// Source position (16.16) and step for each axis of one scale operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleGeometry {
    pub src_width: usize,
    pub src_height: usize,
    pub dst_width: usize,
    pub dst_height: usize,
    /// Effective filter after reduction for the given ratio.
    pub filter: FilterMode,
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
}

impl ScaleGeometry {
    /// Derive the walk for scaling `src` to `dst` with `filter`.
    ///
    /// Dimensions must be non-zero and fit in 15 bits so that every 16.16
    /// position fits an `i32`.
    pub fn new(
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
        filter: FilterMode,
    ) -> Result<Self, SizeError> {
        const MAX_DIM: usize = 1 << 15;
        if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
            return Err(SizeError::UnsupportedGeometry);
        }
        if src_width >= MAX_DIM || src_height >= MAX_DIM || dst_width >= MAX_DIM || dst_height >= MAX_DIM {
            return Err(SizeError::UnsupportedGeometry);
        }
        let filter = reduce_filter(src_width, src_height, dst_width, dst_height, filter);
        let (x, dx) = axis(src_width, dst_width, filter, true);
        let (y, dy) = axis(src_height, dst_height, filter, false);
        Ok(Self {
            src_width,
            src_height,
            dst_width,
            dst_height,
            filter,
            x,
            y,
            dx,
            dy,
        })
    }

    /// Largest number of source rows any output row of the box filter sums.
    pub fn max_box_height(&self) -> usize {
        (self.dy as usize).div_ceil(1 << 16).max(1)
    }
}

/// Start and step along one axis. `horizontal` matters only for `Linear`,
/// which interpolates columns but point-samples rows.
fn axis(src: usize, dst: usize, filter: FilterMode, horizontal: bool) -> (i32, i32) {
    let interpolate = match filter {
        FilterMode::Bilinear => true,
        FilterMode::Linear => horizontal,
        FilterMode::None | FilterMode::Box => false,
    };
    match filter {
        FilterMode::Box => (0, fixed_div(src, dst)),
        _ if interpolate => {
            if dst <= src {
                let d = fixed_div(src, dst);
                ((d >> 1) - 32768, d)
            } else if src > 1 && dst > 1 {
                (0, fixed_div1(src, dst))
            } else {
                (0, 0)
            }
        }
        _ => {
            let d = fixed_div(src, dst);
            (d >> 1, d)
        }
    }
}

/// Drop to the cheapest filter that gives the same result for this ratio.
pub(crate) fn reduce_filter(
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
    mut filter: FilterMode,
) -> FilterMode {
    if filter == FilterMode::Box && (dst_width * 2 >= src_width || dst_height * 2 >= src_height) {
        filter = FilterMode::Bilinear;
    }
    if filter == FilterMode::Bilinear {
        if src_height == 1 || dst_height == src_height || dst_height * 3 == src_height {
            filter = FilterMode::Linear;
        }
        if src_width == 1 {
            filter = FilterMode::None;
        }
    }
    if filter == FilterMode::Linear
        && (src_width == 1 || dst_width == src_width || dst_width * 3 == src_width)
    {
        filter = FilterMode::None;
    }
    filter
}
