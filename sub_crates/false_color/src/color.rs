//! Hex and perceptual color conversions, for band and indicator colors.

use palette::{Clamp, FromColor, Oklch, Srgb};

use crate::{Error, Result, Rgb};

/// Parses `"#RRGGBB"` (or `"RRGGBB"`) into RGB values in [0.0, 1.0].
pub fn hex_to_rgb(hex: &str) -> Result<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidHexFormat(hex.into()));
    }

    let mut rgb = [0.0f64; 3];
    for (i, n) in rgb.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&digits[(i * 2)..(i * 2 + 2)], 16)
            .map_err(|_| Error::InvalidHexFormat(hex.into()))?;
        *n = byte as f64 / 255.0;
    }

    Ok(rgb)
}

/// Formats RGB values as `"#rrggbb"`, clamping each channel to [0.0, 1.0].
pub fn rgb_to_hex(rgb: Rgb) -> String {
    let [r, g, b] = rgb.map(|n| (n.max(0.0).min(1.0) * 255.0).round() as u8);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Converts an OKLCH color to the nearest sRGB hex string.
///
/// `l` is lightness in [0.0, 1.0], `c` is chroma, and `h` is hue in
/// degrees.
///
/// Colors outside of the sRGB gamut are clipped into it, the same way
/// browsers display wide-gamut OKLCH colors on an sRGB display.  This
/// never fails: out-of-gamut input is the common case for saturated
/// swatches.
pub fn oklch_to_hex(l: f64, c: f64, h: f64) -> String {
    let rgb: Srgb = Srgb::from_color(Oklch::new(l as f32, c as f32, h as f32)).clamp();
    let rgb8: Srgb<u8> = rgb.into_format();
    format!("#{:02x}{:02x}{:02x}", rgb8.red, rgb8.green, rgb8.blue)
}

/// Same as `oklch_to_hex()`, but returns RGB values in [0.0, 1.0],
/// quantized to 8 bits per channel.
pub fn oklch_to_rgb(l: f64, c: f64, h: f64) -> Rgb {
    let hex = oklch_to_hex(l, c, h);
    // Our own output is always well formed.
    hex_to_rgb(&hex).unwrap_or([0.0; 3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(hex_to_rgb("#FF00FF").unwrap(), [1.0, 0.0, 1.0]);
        assert_eq!(hex_to_rgb("ff00ff").unwrap(), [1.0, 0.0, 1.0]);
        assert_eq!(hex_to_rgb("#000000").unwrap(), [0.0, 0.0, 0.0]);

        let rgb = hex_to_rgb("#336699").unwrap();
        assert!((rgb[0] - 0.2).abs() < 1.0e-12);
        assert!((rgb[1] - 0.4).abs() < 1.0e-12);
        assert!((rgb[2] - 0.6).abs() < 1.0e-12);
    }

    #[test]
    fn hex_parsing_rejects_malformed() {
        for bad in ["", "#", "#FFF", "FF00F", "#FF00FF0", "##FF00FF", "#GG0000", "#ff 0ff", "#ÿÿÿ"] {
            match hex_to_rgb(bad) {
                Err(Error::InvalidHexFormat(s)) => assert_eq!(s, bad),
                r => panic!("expected InvalidHexFormat for {:?}, got {:?}", bad, r),
            }
        }
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(rgb_to_hex([1.0, 0.0, 1.0]), "#ff00ff");
        assert_eq!(rgb_to_hex([2.0, -1.0, 0.2]), "#ff0033");
        assert_eq!(rgb_to_hex(hex_to_rgb("#1a2b3c").unwrap()), "#1a2b3c");
    }

    #[test]
    fn oklch_in_gamut() {
        assert_eq!(oklch_to_hex(1.0, 0.0, 0.0), "#ffffff");
        assert_eq!(oklch_to_hex(0.0, 0.0, 0.0), "#000000");

        // Pure sRGB red.
        assert_eq!(oklch_to_hex(0.627_955, 0.257_683, 29.233_9), "#ff0000");
    }

    #[test]
    fn oklch_out_of_gamut_is_clipped() {
        // Far too much chroma for sRGB: clipped, not an error.
        let hex = oklch_to_hex(0.7, 0.4, 150.0);
        assert!(hex_to_rgb(&hex).is_ok());

        // Lightness beyond white clips to white.
        assert_eq!(oklch_to_hex(1.5, 0.0, 0.0), "#ffffff");

        // Every channel of a clipped color is within range.
        for h in (0..360).step_by(15) {
            let rgb = oklch_to_rgb(0.6, 0.5, h as f64);
            assert!(rgb.iter().all(|n| (0.0..=1.0).contains(n)));
        }
    }
}
