//! Parsing of `--band` arguments.

use false_color::{
    color::hex_to_rgb,
    presets::{default_width, suggest_color},
    ExposureMode,
};
use lib::config::BandConfig;

/// Parses `CENTER[:HEX[:WIDTH]]`.  A missing color is filled in with the
/// suggested color for the center, and a missing width with the standard
/// width for the mode.
pub fn parse(text: &str, mode: ExposureMode) -> Result<BandConfig, String> {
    let mut parts = text.split(':');

    let center_text = parts.next().unwrap_or("").trim();
    let center: f64 = center_text
        .parse()
        .map_err(|_| format!("bad band center \"{}\" in \"{}\"", center_text, text))?;

    let color = match parts.next().map(str::trim) {
        None | Some("") => suggest_color(center, mode).hex,
        Some(hex) => {
            hex_to_rgb(hex).map_err(|e| e.to_string())?;
            hex.to_string()
        }
    };

    let width = match parts.next().map(str::trim) {
        None | Some("") => default_width(mode),
        Some(w) => w
            .parse()
            .map_err(|_| format!("bad band width \"{}\" in \"{}\"", w, text))?,
    };

    if parts.next().is_some() {
        return Err(format!(
            "too many fields in band \"{}\", expected CENTER[:HEX[:WIDTH]]",
            text
        ));
    }

    Ok(BandConfig {
        center,
        color,
        width,
    })
}
