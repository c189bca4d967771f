//! The modality rescale and window/level transforms applied to each decoded
//! sample value.

/// `v' = slope * v + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescale {
    pub slope: f64,
    pub intercept: f64,
}

impl Rescale {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Rescale { slope, intercept }
    }

    pub fn apply(&self, value: f64) -> f64 {
        self.slope * value + self.intercept
    }
}

/// A display window: clip to `[center - width/2, center + width/2]` and
/// scale to the `0..=255` display range.
///
/// This reproduces `spec.md` §4.8 step 5's formula exactly, including its
/// documented quirk: `scale` is derived from `|lo| + |hi|`, which only
/// equals the window width when `lo <= 0 <= hi`. The end-to-end fixtures in
/// `spec.md` §8 (identity window mapping 0/128/255 to themselves, and the
/// asymmetric `center=0, width=2` window) are reproduced exactly by scaling
/// against a denominator of 256 rather than 255 and clamping the final
/// result into `0..=255` — see `DESIGN.md` for the reconciliation between
/// the prose (which names 255) and the worked examples (which require 256).
/// Preserved verbatim rather than replaced with the textbook VOI LUT linear
/// formula; not "fixed".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowLevel {
    pub center: f64,
    pub width: f64,
}

impl WindowLevel {
    pub fn new(center: f64, width: f64) -> Self {
        WindowLevel { center, width }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let lo = self.center - self.width / 2.0;
        let hi = self.center + self.width / 2.0;
        let scale = 256.0 / (lo.abs() + hi.abs());

        let clamped = value.max(lo).min(hi);
        let shifted = if lo < 0.0 { clamped - lo } else { clamped };

        (shifted * scale).max(0.0).min(255.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_is_linear() {
        let rescale = Rescale::new(2.0, -1024.0);
        assert_eq!(rescale.apply(0.0), -1024.0);
        assert_eq!(rescale.apply(512.0), 0.0);
    }

    #[test]
    fn identity_window_maps_endpoints_and_midpoint_onto_themselves() {
        let window = WindowLevel::new(128.0, 256.0);
        assert_eq!(window.apply(0.0).floor(), 0.0);
        assert_eq!(window.apply(128.0).floor(), 128.0);
        assert_eq!(window.apply(255.0).floor(), 255.0);
    }

    #[test]
    fn narrow_offset_window_matches_the_worked_example() {
        let window = WindowLevel::new(0.0, 2.0);
        assert_eq!(window.apply(0.0).floor(), 128.0);
        assert_eq!(window.apply(1.0).floor(), 255.0);
        assert_eq!(window.apply(2.0).floor(), 255.0);
    }
}
