//! Strided views over a single channel plane.
//!
//! Width and stride are counted in elements of `T`, not bytes. A negative
//! stride stores the image bottom-up: row 0 is the last row in memory, which
//! is how vertical flips and 90°/270° rotations are expressed without copies.

use crate::SizeError;

fn validate(len: usize, width: usize, height: usize, stride: isize) -> Result<(), SizeError> {
    let pitch = stride.unsigned_abs();
    if pitch < width {
        return Err(SizeError::InvalidStride);
    }
    if width == 0 || height == 0 {
        return Ok(());
    }
    let needed = (height - 1)
        .checked_mul(pitch)
        .and_then(|n| n.checked_add(width))
        .ok_or(SizeError::InvalidStride)?;
    crate::error::check_len(len, needed)
}

#[inline(always)]
fn row_offset(y: usize, height: usize, stride: isize) -> usize {
    if stride >= 0 {
        y * stride as usize
    } else {
        (height - 1 - y) * stride.unsigned_abs()
    }
}

/// Read-only plane of `width × height` samples.
#[derive(Debug)]
pub struct Plane<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: isize,
}

impl<T> Clone for Plane<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Plane<'_, T> {}

impl<'a, T> Plane<'a, T> {
    /// Wrap `data` with an explicit stride. Fails if any row would fall
    /// outside `data` or if `|stride| < width`.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: isize) -> Result<Self, SizeError> {
        validate(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Tightly packed, top-down plane (`stride == width`).
    pub fn packed(data: &'a [T], width: usize, height: usize) -> Result<Self, SizeError> {
        let stride = isize::try_from(width).map_err(|_| SizeError::InvalidStride)?;
        Self::new(data, width, height, stride)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Row `y`, exactly `width` samples long. Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height);
        let start = row_offset(y, self.height, self.stride);
        &self.data[start..start + self.width]
    }

    /// Same samples, opposite vertical order.
    #[inline]
    pub fn flipped(self) -> Self {
        Self {
            stride: -self.stride,
            ..self
        }
    }

    /// Rows top to bottom.
    pub fn rows(self) -> impl ExactSizeIterator<Item = &'a [T]> {
        (0..self.height).map(move |y| self.row(y))
    }
}

/// Mutable plane of `width × height` samples.
#[derive(Debug)]
pub struct PlaneMut<'a, T> {
    data: &'a mut [T],
    width: usize,
    height: usize,
    stride: isize,
}

impl<'a, T> PlaneMut<'a, T> {
    /// Wrap `data` with an explicit stride. Fails if any row would fall
    /// outside `data` or if `|stride| < width`.
    pub fn new(
        data: &'a mut [T],
        width: usize,
        height: usize,
        stride: isize,
    ) -> Result<Self, SizeError> {
        validate(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Tightly packed, top-down plane (`stride == width`).
    pub fn packed(data: &'a mut [T], width: usize, height: usize) -> Result<Self, SizeError> {
        let stride = isize::try_from(width).map_err(|_| SizeError::InvalidStride)?;
        Self::new(data, width, height, stride)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height);
        let start = row_offset(y, self.height, self.stride);
        &self.data[start..start + self.width]
    }

    /// Mutable row `y`, exactly `width` samples long. Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height);
        let start = row_offset(y, self.height, self.stride);
        &mut self.data[start..start + self.width]
    }

    /// Two distinct rows at once. Panics if `y0 == y1` or either is out of range.
    pub fn row_pair_mut(&mut self, y0: usize, y1: usize) -> (&mut [T], &mut [T]) {
        assert!(y0 != y1 && y0 < self.height && y1 < self.height);
        let (w, h, s) = (self.width, self.height, self.stride);
        let (o0, o1) = (row_offset(y0, h, s), row_offset(y1, h, s));
        if o0 < o1 {
            let (lo, hi) = self.data.split_at_mut(o1);
            (&mut lo[o0..o0 + w], &mut hi[..w])
        } else {
            let (lo, hi) = self.data.split_at_mut(o0);
            (&mut hi[..w], &mut lo[o1..o1 + w])
        }
    }

    /// Read-only view of the same samples.
    #[inline]
    pub fn as_plane(&self) -> Plane<'_, T> {
        Plane {
            data: self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    /// Shorter-lived mutable view, for passing to a kernel without giving
    /// up the plane.
    #[inline]
    pub fn reborrow(&mut self) -> PlaneMut<'_, T> {
        PlaneMut {
            data: self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }

    /// Same samples, opposite vertical order.
    #[inline]
    pub fn flipped(self) -> Self {
        Self {
            stride: -self.stride,
            ..self
        }
    }
}
