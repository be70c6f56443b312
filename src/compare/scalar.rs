use archmage::prelude::*;

/// `Σ (a[i] - b[i])²` over the shorter of the two slices.
pub(super) fn sse_row(a: &[u8], b: &[u8]) -> u32 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = u32::from(x.abs_diff(y));
            d * d
        })
        .sum()
}

pub(super) fn sse_impl_scalar(_t: ScalarToken, a: &[u8], b: &[u8]) -> u32 {
    sse_row(a, b)
}
