//! A one-line terminal preview of which exposure ranges get painted.

use false_color::{
    color::oklch_to_rgb, presets::tailwind_oklch, profiles::CameraProfile, ExposureMode,
    GenerationRequest, Rgb,
};

/// The range covered by the bar, in the request's exposure unit.
pub fn bar_range(camera: &CameraProfile, mode: ExposureMode) -> (f64, f64) {
    match mode {
        ExposureMode::Stops => (camera.black_clip_stops, camera.white_clip_stops),
        ExposureMode::Ire => (0.0, 100.0),
    }
}

/// The exposure value at the center of bar cell `i`.
fn cell_value(range: (f64, f64), width: usize, i: usize) -> f64 {
    range.0 + (range.1 - range.0) * ((i as f64 + 0.5) / width as f64)
}

/// One color per bar cell.  Unpainted cells are neutral grey.
///
/// Bands paint last-wins, and enabled clip indicators paint the cell at
/// each end of the bar on top of the bands.
pub fn exposure_bar(camera: &CameraProfile, request: &GenerationRequest, width: usize) -> Vec<Rgb> {
    let (l, c, h) = tailwind_oklch("zinc", "700").unwrap_or((0.37, 0.0, 0.0));
    let unassigned = oklch_to_rgb(l, c, h);
    let range = bar_range(camera, request.mode);

    let mut bar: Vec<Rgb> = (0..width)
        .map(|i| {
            let value = cell_value(range, width, i);
            request
                .bands
                .iter()
                .rev()
                .find(|band| band.contains(value))
                .map(|band| band.color)
                .unwrap_or(unassigned)
        })
        .collect();

    if width > 0 {
        if let Some(color) = request.black_clip.active() {
            bar[0] = color;
        }
        if let Some(color) = request.white_clip.active() {
            bar[width - 1] = color;
        }
    }

    bar
}

/// Renders the bar with 24-bit ANSI colors, followed by a ruler line
/// marking whole stops (or every 10 IRE).
pub fn render_ansi(bar: &[Rgb], range: (f64, f64), mode: ExposureMode) -> String {
    let mut out = String::new();
    for rgb in bar.iter() {
        let [r, g, b] = rgb.map(|n| (n.max(0.0).min(1.0) * 255.0).round() as u8);
        out.push_str(&format!("\x1b[48;2;{};{};{}m \x1b[0m", r, g, b));
    }
    out.push('\n');
    out.push_str(&ruler(bar.len(), range, mode));
    out
}

/// Tick labels, placed at the cells nearest each tick value.
fn ruler(width: usize, range: (f64, f64), mode: ExposureMode) -> String {
    let step = match mode {
        ExposureMode::Stops => 1.0,
        ExposureMode::Ire => 10.0,
    };

    if width == 0 || range.1 <= range.0 {
        return String::new();
    }
    let mut line = vec![' '; width];

    let mut tick = (range.0 / step).ceil() * step;
    let mut next_free = 0;
    while tick <= range.1 {
        let pos = (((tick - range.0) / (range.1 - range.0)) * width as f64) as usize;
        let label = match mode {
            ExposureMode::Stops => format!("{:+}", tick as i64),
            ExposureMode::Ire => format!("{}", tick as i64),
        };
        let pos = pos.min(width.saturating_sub(label.len()));
        if pos >= next_free && pos + label.len() <= width {
            for (i, ch) in label.chars().enumerate() {
                line[pos + i] = ch;
            }
            next_free = pos + label.len() + 1;
        }
        tick += step;
    }

    line.into_iter().collect::<String>().trim_end().to_string()
}
