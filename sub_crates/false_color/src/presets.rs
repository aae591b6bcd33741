//! Suggested band colors and band widths.
//!
//! Colors follow the usual cinema false-color convention: deep blue for
//! crushed shadows, green around middle grey, and red approaching clip.
//! They are picked from the Tailwind palette, which is defined in OKLCH.

use crate::{color::oklch_to_hex, engine::request::ExposureMode};

/// Tailwind swatches as (family, shade, (L, C, H)).
pub const TAILWIND_COLORS: &[(&str, &str, (f64, f64, f64))] = &[
    ("violet", "800", (0.432, 0.232, 292.759)),
    ("blue", "600", (0.546, 0.245, 262.881)),
    ("sky", "400", (0.746, 0.160, 232.661)),
    ("teal", "400", (0.777, 0.152, 181.912)),
    ("green", "500", (0.723, 0.219, 149.579)),
    ("lime", "400", (0.841, 0.238, 128.850)),
    ("yellow", "400", (0.852, 0.199, 91.936)),
    ("orange", "500", (0.705, 0.213, 47.604)),
    ("red", "600", (0.577, 0.245, 27.325)),
    ("zinc", "700", (0.370, 0.013, 285.805)),
];

pub fn tailwind_oklch(family: &str, shade: &str) -> Option<(f64, f64, f64)> {
    TAILWIND_COLORS
        .iter()
        .find(|(f, s, _)| *f == family && *s == shade)
        .map(|(_, _, lch)| *lch)
}

/// Upper bounds (inclusive), checked in order.  Anything above the last
/// goes to the fallback.
const STOP_THRESHOLDS: &[(f64, &str, &str)] = &[
    (-3.0, "violet", "800"),
    (-2.0, "blue", "600"),
    (-1.0, "sky", "400"),
    (-0.3, "teal", "400"),
    (0.3, "green", "500"),
    (1.0, "lime", "400"),
    (2.0, "yellow", "400"),
    (3.0, "orange", "500"),
];

/// Middle grey sits around 42 IRE on a Rec.709 display.
const IRE_THRESHOLDS: &[(f64, &str, &str)] = &[
    (10.0, "violet", "800"),
    (25.0, "blue", "600"),
    (35.0, "sky", "400"),
    (38.0, "teal", "400"),
    (46.0, "green", "500"),
    (55.0, "lime", "400"),
    (65.0, "yellow", "400"),
    (80.0, "orange", "500"),
];

const FALLBACK: (&str, &str) = ("red", "600");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSuggestion {
    pub family: &'static str,
    pub shade: &'static str,
    pub hex: String,
}

pub fn suggest_color_for_stop(stop: f64) -> ColorSuggestion {
    suggest(stop, STOP_THRESHOLDS)
}

pub fn suggest_color_for_ire(ire: f64) -> ColorSuggestion {
    suggest(ire, IRE_THRESHOLDS)
}

pub fn suggest_color(value: f64, mode: ExposureMode) -> ColorSuggestion {
    match mode {
        ExposureMode::Stops => suggest_color_for_stop(value),
        ExposureMode::Ire => suggest_color_for_ire(value),
    }
}

fn suggest(value: f64, thresholds: &[(f64, &'static str, &'static str)]) -> ColorSuggestion {
    let (family, shade) = thresholds
        .iter()
        .find(|(max, _, _)| value <= *max)
        .map(|(_, f, s)| (*f, *s))
        .unwrap_or(FALLBACK);

    // Every family/shade in the tables above is in `TAILWIND_COLORS`.
    let (l, c, h) = tailwind_oklch(family, shade).unwrap_or((0.5, 0.0, 0.0));

    ColorSuggestion {
        family,
        shade,
        hex: oklch_to_hex(l, c, h),
    }
}

//-------------------------------------------------------------

/// A named band half-width.  `width` is `None` for "enter your own".
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WidthPreset {
    pub label: &'static str,
    pub width: Option<f64>,
    pub description: &'static str,
}

/// Coverage figures assume a scene with a roughly normal exposure
/// distribution.
pub const WIDTH_PRESETS: &[WidthPreset] = &[
    WidthPreset {
        label: "Razor   ±0.05 stops",
        width: Some(0.05),
        description: "Hair-thin lines. ~5% of a well-exposed image is painted. \
                      Ideal for monitoring while recording: the image looks almost \
                      completely clean and false color appears as faint waves.",
    },
    WidthPreset {
        label: "Thin    ±0.10 stops",
        width: Some(0.10),
        description: "Very subtle bands. ~10% coverage. Still looks like a normal \
                      image at a glance but exposure structure is clearly visible.",
    },
    WidthPreset {
        label: "Narrow  ±0.20 stops",
        width: Some(0.20),
        description: "Visible but restrained. ~20% coverage. Good balance between \
                      readability and keeping the image usable.",
    },
    WidthPreset {
        label: "Standard ±0.30 stops",
        width: Some(0.30),
        description: "Default. ~30% coverage. Clear false color, comfortable for \
                      exposure checking in a dedicated monitoring context.",
    },
    WidthPreset {
        label: "Wide    ±0.50 stops",
        width: Some(0.50),
        description: "Broad bands. ~50% coverage. Best for quick on-set checks \
                      when you need to see the full exposure map at a glance.",
    },
    WidthPreset {
        label: "Custom",
        width: None,
        description: "Enter any value manually.",
    },
];

/// IRE widths are absolute signal percentages.  ±5 IRE around 42 IRE
/// covers roughly what ±0.3 stops covers around middle grey.
pub const IRE_WIDTH_PRESETS: &[WidthPreset] = &[
    WidthPreset {
        label: "Razor    ±1 IRE",
        width: Some(1.0),
        description: "Hair-thin lines. Only the exact target IRE shows color.",
    },
    WidthPreset {
        label: "Thin     ±2 IRE",
        width: Some(2.0),
        description: "Very subtle bands. Useful for precision monitoring.",
    },
    WidthPreset {
        label: "Narrow   ±3 IRE",
        width: Some(3.0),
        description: "Visible but restrained. Good for checking specific levels.",
    },
    WidthPreset {
        label: "Standard ±5 IRE",
        width: Some(5.0),
        description: "Default. Clear bands that cover a comfortable range.",
    },
    WidthPreset {
        label: "Wide     ±8 IRE",
        width: Some(8.0),
        description: "Broad bands. Best for quick on-set checks.",
    },
    WidthPreset {
        label: "Custom",
        width: None,
        description: "Enter any value manually (in IRE).",
    },
];

pub fn width_presets(mode: ExposureMode) -> &'static [WidthPreset] {
    match mode {
        ExposureMode::Stops => WIDTH_PRESETS,
        ExposureMode::Ire => IRE_WIDTH_PRESETS,
    }
}

/// The "Standard" width for the given mode.
pub fn default_width(mode: ExposureMode) -> f64 {
    match mode {
        ExposureMode::Stops => 0.30,
        ExposureMode::Ire => 5.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_suggestions() {
        assert_eq!(suggest_color_for_stop(-5.0).family, "violet");
        assert_eq!(suggest_color_for_stop(-3.0).family, "violet");
        assert_eq!(suggest_color_for_stop(-2.5).family, "blue");
        assert_eq!(suggest_color_for_stop(0.0).family, "green");
        assert_eq!(suggest_color_for_stop(0.3).family, "green");
        assert_eq!(suggest_color_for_stop(0.31).family, "lime");
        assert_eq!(suggest_color_for_stop(2.5).family, "orange");
        assert_eq!(suggest_color_for_stop(3.5).family, "red");
        assert_eq!(suggest_color_for_stop(3.5).shade, "600");
    }

    #[test]
    fn ire_suggestions() {
        assert_eq!(suggest_color_for_ire(0.0).family, "violet");
        assert_eq!(suggest_color_for_ire(42.0).family, "green");
        assert_eq!(suggest_color_for_ire(60.0).family, "yellow");
        assert_eq!(suggest_color_for_ire(95.0).family, "red");
        assert_eq!(suggest_color(42.0, ExposureMode::Ire), suggest_color_for_ire(42.0));
    }

    #[test]
    fn suggestions_are_valid_hex() {
        for v in [-4.0, -2.5, -1.5, -0.5, 0.0, 0.5, 1.5, 2.5, 4.0] {
            let s = suggest_color_for_stop(v);
            assert!(crate::color::hex_to_rgb(&s.hex).is_ok(), "{}", s.hex);
        }
    }

    #[test]
    fn suggested_colors_are_distinct() {
        let hexes: Vec<String> = STOP_THRESHOLDS
            .iter()
            .map(|(t, _, _)| suggest_color_for_stop(*t).hex)
            .collect();
        for i in 0..hexes.len() {
            for j in (i + 1)..hexes.len() {
                assert_ne!(hexes[i], hexes[j]);
            }
        }
    }

    #[test]
    fn every_threshold_color_exists() {
        for (_, family, shade) in STOP_THRESHOLDS.iter().chain(IRE_THRESHOLDS) {
            assert!(tailwind_oklch(family, shade).is_some());
        }
        assert!(tailwind_oklch(FALLBACK.0, FALLBACK.1).is_some());
    }

    #[test]
    fn width_preset_tables() {
        for mode in [ExposureMode::Stops, ExposureMode::Ire] {
            let presets = width_presets(mode);
            assert_eq!(presets.last().unwrap().width, None);
            assert!(presets.iter().any(|p| p.width == Some(default_width(mode))));

            let widths: Vec<f64> = presets.iter().filter_map(|p| p.width).collect();
            assert!(widths.windows(2).all(|w| w[0] < w[1]));
            assert!(widths.iter().all(|w| *w > 0.0));
        }
    }
}
