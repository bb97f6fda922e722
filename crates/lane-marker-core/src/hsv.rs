use serde::{Deserialize, Serialize};

/// Largest hue value in the 8-bit convention (degrees / 2).
pub const HUE_MAX: u8 = 179;
/// Largest saturation / value.
pub const SAT_VAL_MAX: u8 = 255;

/// 8-bit HSV triple: `h` in `0..=179`, `s` and `v` in `0..=255`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Convert one RGB pixel to 8-bit HSV.
///
/// `V = max(r, g, b)`, `S = 255 * (V - min) / V`, and hue is computed in
/// degrees, halved and rounded, so it fits a byte. Gray pixels get `h = 0`.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = (v - min) as f32;

    let s = if v == 0 {
        0
    } else {
        (255.0 * diff / v as f32).round() as u8
    };

    if diff == 0.0 {
        return Hsv { h: 0, s, v };
    }

    let mut deg = if v == r {
        60.0 * (gf - bf) / diff
    } else if v == g {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    if deg < 0.0 {
        deg += 360.0;
    }

    let mut h = (deg * 0.5).round() as u16;
    if h > HUE_MAX as u16 {
        h -= HUE_MAX as u16 + 1;
    }
    Hsv { h: h as u8, s, v }
}

/// Inclusive per-channel acceptance range in HSV space.
///
/// Construction and deserialization both go through [`HsvRange::clamped`],
/// so a value of this type always satisfies `lower <= upper` per channel and
/// `upper.h <= HUE_MAX`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHsvRange")]
pub struct HsvRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

#[derive(Deserialize)]
struct RawHsvRange {
    lower: Hsv,
    upper: Hsv,
}

impl From<RawHsvRange> for HsvRange {
    fn from(raw: RawHsvRange) -> Self {
        HsvRange::new(raw.lower, raw.upper)
    }
}

impl Default for HsvRange {
    /// Yellow tape under indoor lighting.
    fn default() -> Self {
        Self {
            lower: Hsv::new(18, 80, 50),
            upper: Hsv::new(35, SAT_VAL_MAX, SAT_VAL_MAX),
        }
    }
}

impl HsvRange {
    pub fn new(lower: Hsv, upper: Hsv) -> Self {
        Self { lower, upper }.clamped()
    }

    /// Restore the range invariants.
    ///
    /// Hue bounds are capped at [`HUE_MAX`]; a lower bound above its upper
    /// bound is pulled down to the upper bound (the upper bound wins, as a
    /// slider pair would behave when "min" is dragged past "max").
    pub fn clamped(self) -> Self {
        let upper = Hsv {
            h: self.upper.h.min(HUE_MAX),
            ..self.upper
        };
        let lower = Hsv {
            h: self.lower.h.min(HUE_MAX).min(upper.h),
            s: self.lower.s.min(upper.s),
            v: self.lower.v.min(upper.v),
        };
        Self { lower, upper }
    }

    #[inline]
    pub fn contains(&self, px: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&px.h)
            && (self.lower.s..=self.upper.s).contains(&px.s)
            && (self.lower.v..=self.upper.v).contains(&px.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_colors_match_8bit_convention() {
        assert_eq!(rgb_to_hsv(255, 0, 0), Hsv::new(0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), Hsv::new(60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), Hsv::new(120, 255, 255));
        assert_eq!(rgb_to_hsv(255, 255, 0), Hsv::new(30, 255, 255));
    }

    #[test]
    fn gray_and_black_have_no_hue_or_saturation() {
        assert_eq!(rgb_to_hsv(0, 0, 0), Hsv::new(0, 0, 0));
        assert_eq!(rgb_to_hsv(128, 128, 128), Hsv::new(0, 0, 128));
    }

    #[test]
    fn hue_wraps_near_red() {
        // 359 degrees halves to 179.5 and must wrap to 0 rather than overflow the range.
        let h = rgb_to_hsv(255, 0, 4).h;
        assert!(h <= HUE_MAX);
        assert!(h == 0 || h >= 178);
    }

    #[test]
    fn default_preset_accepts_yellow() {
        let range = HsvRange::default();
        assert!(range.contains(rgb_to_hsv(255, 255, 0)));
        assert!(range.contains(rgb_to_hsv(230, 200, 40)));
        assert!(!range.contains(rgb_to_hsv(0, 0, 255)));
        assert!(!range.contains(rgb_to_hsv(255, 255, 255)));
    }

    #[test]
    fn inverted_bounds_are_clamped_to_upper() {
        let range = HsvRange::new(Hsv::new(40, 200, 10), Hsv::new(30, 100, 255));
        assert_eq!(range.lower, Hsv::new(30, 100, 10));
        assert_eq!(range.upper, Hsv::new(30, 100, 255));
    }

    #[test]
    fn hue_above_limit_is_capped() {
        let range = HsvRange::new(Hsv::new(200, 0, 0), Hsv::new(250, 255, 255));
        assert_eq!(range.upper.h, HUE_MAX);
        assert_eq!(range.lower.h, HUE_MAX);
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = HsvRange::new(Hsv::new(10, 10, 10), Hsv::new(20, 20, 20));
        assert!(range.contains(Hsv::new(10, 10, 10)));
        assert!(range.contains(Hsv::new(20, 20, 20)));
        assert!(!range.contains(Hsv::new(21, 20, 20)));
        assert!(!range.contains(Hsv::new(20, 9, 20)));
    }

    #[test]
    fn deserialization_clamps() {
        let json = r#"{"lower":{"h":50,"s":0,"v":0},"upper":{"h":35,"s":255,"v":255}}"#;
        let range: HsvRange = serde_json::from_str(json).unwrap();
        assert_eq!(range.lower.h, 35);
    }
}
