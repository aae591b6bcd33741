//! The descriptive comment block at the top of generated .cube files.
//!
//! The header is deterministic: no timestamps, so generating the same
//! request twice gives byte-identical files.

use crate::{
    color::rgb_to_hex,
    profiles::{CameraProfile, TargetProfile},
};

use super::{
    request::{BandBlend, ClipStrategy, ExposureMode, GenerationRequest},
    ExposureDomain,
};

pub fn build(
    camera: &CameraProfile,
    target: &TargetProfile,
    request: &GenerationRequest,
    domain: &ExposureDomain,
) -> Vec<String> {
    let size = request.cube_size;
    let mut lines = vec![
        format!("Tool        : false_color {}", env!("CARGO_PKG_VERSION")),
        format!("Cube size   : {}x{}x{}", size, size, size),
        format!(
            "Mode        : {}",
            match request.mode {
                ExposureMode::Stops => "stops from middle grey (scene luminance)",
                ExposureMode::Ire => "IRE (display signal level)",
            }
        ),
        String::new(),
        format!("Source      : {}", camera.name),
        format!("  Gamut     : {}", camera.gamut.name),
        format!("  Log       : {}", camera.log_curve.name()),
        format!("  Log floor : {:.4}", camera.log_floor),
        format!("  Log ceil  : {:.4}", camera.log_ceiling),
        format!(
            "  Domain    : {:+.2} to {:+.2} stops from middle grey",
            domain.min_stops, domain.max_stops
        ),
        format!(
            "  Black clip: {:+.2} stops from middle grey{}",
            domain.black_stops,
            if domain.black_exceeds_domain(camera) {
                format!(
                    "  (sensor limit {:+.1}, LUT domain min {:+.2})",
                    camera.black_clip_stops, domain.min_stops
                )
            } else {
                String::new()
            }
        ),
        format!(
            "  White clip: {:+.2} stops from middle grey{}",
            domain.white_stops,
            if domain.white_exceeds_domain(camera) {
                format!(
                    "  (sensor limit {:+.1}, LUT domain max {:+.2})",
                    camera.white_clip_stops, domain.max_stops
                )
            } else {
                String::new()
            }
        ),
        String::new(),
        format!("Target      : {}", target.name),
        format!("  Gamut     : {}", target.gamut.name),
        format!(
            "  Transfer  : {} ({})",
            target.transfer_function.name(),
            target.transfer_function.kind().as_str()
        ),
        String::new(),
        format!("Monochrome  : {}", yes_no(request.monochrome)),
        format!("Legal range : {}", yes_no(request.legal_range)),
        format!(
            "Band blend  : {}",
            match request.band_blend {
                BandBlend::Overwrite => "overwrite".to_string(),
                BandBlend::Opacity(opacity) => format!("opacity {:.2}", opacity),
            }
        ),
        String::new(),
    ];

    // Bands, sorted for reading.
    if request.bands.is_empty() {
        lines.push("False Color Bands: none".into());
    } else {
        let mut bands = request.bands.clone();
        bands.sort_by(|a, b| a.center.total_cmp(&b.center));

        lines.push("False Color Bands:".into());
        for band in bands.iter() {
            lines.push(match request.mode {
                ExposureMode::Stops => format!(
                    "  Stop {:+.1}  ±{:.2} stops  ->  {}",
                    band.center,
                    band.width,
                    rgb_to_hex(band.color)
                ),
                ExposureMode::Ire => format!(
                    "  IRE {:.1}  ±{:.2} IRE  ->  {}",
                    band.center,
                    band.width,
                    rgb_to_hex(band.color)
                ),
            });
        }
    }
    lines.push(String::new());

    // Clip indicators.
    let mut clip_lines = Vec::new();
    let (black_desc, white_desc) = match request.clip_strategy {
        ClipStrategy::CodeValue => (
            format!("log code <= {:.4}", domain.black_code),
            format!("log code >= {:.4}", domain.white_code),
        ),
        ClipStrategy::SceneStops => (
            format!("scene stops <= {:+.2}", domain.black_stops),
            format!("scene stops >= {:+.2}", domain.white_stops),
        ),
    };
    if let Some(color) = request.black_clip.active() {
        clip_lines.push(format!(
            "  Crushed blacks  ->  {}  ({})",
            rgb_to_hex(color),
            black_desc
        ));
    }
    if let Some(color) = request.white_clip.active() {
        clip_lines.push(format!(
            "  Clipped whites  ->  {}  ({})",
            rgb_to_hex(color),
            white_desc
        ));
    }

    if clip_lines.is_empty() {
        lines.push("Clipping Indicators: none".into());
    } else {
        lines.push(match request.clip_strategy {
            ClipStrategy::CodeValue => "Clipping Indicators:".into(),
            ClipStrategy::SceneStops => {
                "Clipping Indicators (legacy scene-stop thresholds, may not match sensor clip):"
                    .into()
            }
        });
        lines.extend(clip_lines);
    }

    lines
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::request::{Band, ClipIndicator},
        profiles::{CameraProfileDef, CAMERA_PROFILES, TARGET_PROFILES},
        ProfileRegistry,
    };

    fn header_for(request: &GenerationRequest) -> Vec<String> {
        let registry = ProfileRegistry::builtin().unwrap();
        let camera = registry.camera(&request.camera).unwrap();
        let target = registry.target(&request.target).unwrap();
        let domain = ExposureDomain::new(camera, request.cube_size);
        build(camera, target, request, &domain)
    }

    #[test]
    fn describes_profiles() {
        let req = GenerationRequest::new("Sony S-Log3", "ACEScct", 33, "x.cube");
        let lines = header_for(&req);
        assert!(lines.contains(&"Cube size   : 33x33x33".to_string()));
        assert!(lines.contains(&"Source      : Sony S-Log3".to_string()));
        assert!(lines.contains(&"  Log       : S-Log3".to_string()));
        assert!(lines.contains(&"  Transfer  : ACEScct (LOG)".to_string()));
        assert!(lines.contains(&"False Color Bands: none".to_string()));
        assert!(lines.contains(&"Clipping Indicators: none".to_string()));
    }

    #[test]
    fn bands_are_sorted() {
        let mut req = GenerationRequest::new("Sony S-Log3", "Rec.709", 17, "x.cube");
        req.bands.push(Band::new(2.0, [1.0, 1.0, 0.0], 0.3));
        req.bands.push(Band::new(-1.0, [0.0, 0.0, 1.0], 0.3));
        req.bands.push(Band::new(0.0, [0.0, 1.0, 0.0], 0.3));
        let lines = header_for(&req);

        let start = lines.iter().position(|l| l == "False Color Bands:").unwrap();
        assert_eq!(lines[start + 1], "  Stop -1.0  ±0.30 stops  ->  #0000ff");
        assert_eq!(lines[start + 2], "  Stop +0.0  ±0.30 stops  ->  #00ff00");
        assert_eq!(lines[start + 3], "  Stop +2.0  ±0.30 stops  ->  #ffff00");
    }

    #[test]
    fn reports_applied_clip_thresholds() {
        let mut req = GenerationRequest::new("Sony S-Log3", "Rec.709", 17, "x.cube");
        req.black_clip = ClipIndicator::on([1.0, 0.0, 1.0]);
        req.white_clip = ClipIndicator::on([1.0, 0.0, 0.0]);
        let lines = header_for(&req);

        // 0.035 + half a step, and 0.94 - half a step.
        assert!(lines
            .iter()
            .any(|l| l.starts_with("  Crushed blacks  ->  #ff00ff  (log code <= 0.066")));
        assert!(lines
            .iter()
            .any(|l| l.starts_with("  Clipped whites  ->  #ff0000  (log code >= 0.908")));
    }

    #[test]
    fn notes_white_limit_beyond_domain() {
        // S-Log3 code 1.0 is a little under +8 stops.
        let cameras = [CameraProfileDef {
            name: "Overrated",
            white_clip_stops: 12.0,
            ..CAMERA_PROFILES[0]
        }];
        let registry = ProfileRegistry::from_definitions(&cameras, TARGET_PROFILES).unwrap();
        let camera = registry.camera("Overrated").unwrap();
        let target = registry.target("Rec.709").unwrap();
        let req = GenerationRequest::new("Overrated", "Rec.709", 17, "x.cube");
        let domain = ExposureDomain::new(camera, 17);
        assert!(domain.white_exceeds_domain(camera));
        assert!(domain.white_stops < 12.0);

        let lines = build(camera, target, &req, &domain);
        let white = lines.iter().find(|l| l.starts_with("  White clip:")).unwrap();
        assert!(white.contains("sensor limit +12.0"), "{}", white);
        assert!(white.contains("LUT domain max +7."), "{}", white);

        // Built-in S-Log3 fits.
        let lines = header_for(&GenerationRequest::new("Sony S-Log3", "Rec.709", 17, "x.cube"));
        assert!(lines.contains(&"  White clip: +6.00 stops from middle grey".to_string()));
    }

    #[test]
    fn legacy_strategy_is_flagged() {
        let mut req = GenerationRequest::new("Sony S-Log3", "Rec.709", 17, "x.cube");
        req.white_clip = ClipIndicator::on([1.0, 0.0, 0.0]);
        req.clip_strategy = ClipStrategy::SceneStops;
        let lines = header_for(&req);
        assert!(lines.iter().any(|l| l.contains("legacy scene-stop")));
        assert!(lines.iter().any(|l| l.contains("scene stops >=")));
    }

    #[test]
    fn deterministic() {
        let req = GenerationRequest::new("Canon Log 3", "Rec.2020", 17, "x.cube");
        assert_eq!(header_for(&req), header_for(&req));
    }
}
