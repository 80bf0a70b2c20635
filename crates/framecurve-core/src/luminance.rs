//! Luma calculation with selectable ITU-R BT.601 / BT.709 weights.
//!
//! Used by the pixel transform when the curve is applied to luma rather than
//! to a single color channel.

/// ITU-R BT.709 coefficient for red channel in luma calculation.
pub const REC709_R: f64 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luma calculation.
pub const REC709_G: f64 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luma calculation.
pub const REC709_B: f64 = 0.0722;

/// ITU-R BT.601 coefficient for red channel in luma calculation.
pub const REC601_R: f64 = 0.299;

/// ITU-R BT.601 coefficient for green channel in luma calculation.
pub const REC601_G: f64 = 0.587;

/// ITU-R BT.601 coefficient for blue channel in luma calculation.
pub const REC601_B: f64 = 0.114;

/// Luma weighting formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LumaFormula {
    Rec601,
    #[default]
    Rec709,
}

impl LumaFormula {
    /// Convert from the host's boolean encoding (false = Rec. 601, true = Rec. 709).
    pub fn from_flag(rec709: bool) -> Self {
        if rec709 {
            LumaFormula::Rec709
        } else {
            LumaFormula::Rec601
        }
    }

    pub fn is_rec709(self) -> bool {
        self == LumaFormula::Rec709
    }

    /// Red, green and blue weights.
    pub fn coefficients(self) -> (f64, f64, f64) {
        match self {
            LumaFormula::Rec601 => (REC601_R, REC601_G, REC601_B),
            LumaFormula::Rec709 => (REC709_R, REC709_G, REC709_B),
        }
    }

    /// Calculate luma from u8 RGB values (0 to 255).
    ///
    /// # Returns
    /// Luma value (0-255), rounded
    #[inline]
    pub fn luma_u8(self, r: u8, g: u8, b: u8) -> u8 {
        let (kr, kg, kb) = self.coefficients();
        let luma = kr * r as f64 + kg * g as f64 + kb * b as f64;
        luma.round().clamp(0.0, 255.0) as u8
    }
}
