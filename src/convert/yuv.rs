//! YUV→RGB coefficient tables.
//!
//! Coefficients are pre-scaled by 64 so the kernels can finish with a
//! truncating `>> 6`. Luma gain is applied to `Y * 0x0101` with a 16-bit
//! multiply-high.

/// One color matrix in the layout every kernel tier reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct YuvConstants {
    /// `[UB, VR, UG, VG]`
    pub uv_coeff: [u8; 4],
    /// `[YG, BB, BG, BR]`
    pub rgb_coeff_bias: [u16; 4],
}

impl YuvConstants {
    /// BT.601 limited range ("I601").
    pub const BT601: Self = Self::from_matrix(18997, -1160, 128, 25, 52, 102);
    /// BT.601 full range (JPEG).
    pub const JPEG: Self = Self::from_matrix(16320, 32, 113, 22, 46, 90);
    /// BT.709 limited range ("H709").
    pub const BT709: Self = Self::from_matrix(18997, -1160, 128, 14, 34, 115);
    /// BT.709 full range ("F709").
    pub const BT709_FULL: Self = Self::from_matrix(16320, 32, 119, 12, 30, 101);
    /// BT.2020 limited range ("U2020").
    pub const BT2020: Self = Self::from_matrix(19003, -1160, 128, 12, 42, 107);
    /// BT.2020 full range ("V2020").
    pub const BT2020_FULL: Self = Self::from_matrix(16320, 32, 120, 11, 37, 94);

    /// Build a table from luma gain `yg`, luma bias `yb` and the four chroma
    /// gains. Biases fold in the `-128` chroma offset.
    ///
    /// `yg` is `round(y_scale * 64 * 65536 / 257)`, `yb` is
    /// `y_scale * 64 * -y_offset + 32`.
    pub const fn from_matrix(yg: u16, yb: i32, ub: u8, ug: u8, vg: u8, vr: u8) -> Self {
        let bb = ub as i32 * 128 - yb;
        let bg = ug as i32 * 128 + vg as i32 * 128 + yb;
        let br = vr as i32 * 128 - yb;
        Self {
            uv_coeff: [ub, vr, ug, vg],
            rgb_coeff_bias: [yg, bb as u16, bg as u16, br as u16],
        }
    }

    /// The same matrix with U and V roles exchanged.
    ///
    /// Feeding V in the U slot and U in the V slot through this table
    /// produces R where B was and B where R was, which turns an ARGB
    /// kernel into an ABGR one.
    pub const fn yvu(self) -> Self {
        let [ub, vr, ug, vg] = self.uv_coeff;
        let [yg, bb, bg, br] = self.rgb_coeff_bias;
        Self {
            uv_coeff: [vr, ub, vg, ug],
            rgb_coeff_bias: [yg, br, bg, bb],
        }
    }
}

impl Default for YuvConstants {
    fn default() -> Self {
        Self::BT601
    }
}
