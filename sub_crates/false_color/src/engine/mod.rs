//! The LUT generation pipeline.
//!
//! Every grid node goes through the same fixed sequence of steps:
//!
//! 1. The node's coordinates are a log-encoded camera RGB value.
//! 2. Decode to scene-linear, in the camera's gamut.
//! 3. Measure scene luminance in stops from middle grey.
//! 4. Convert to the target gamut, flooring negatives at zero.
//! 5. Optionally collapse to the target gamut's luminance.
//! 6. Encode with the target's transfer function, and measure IRE.
//! 7. Paint false-color bands, in order.
//! 8. Paint clip indicators, measured on the original log values.
//! 9. Optionally rescale to legal range.
//! 10. Clamp to [0, 1].
//!
//! Nodes are independent of each other, so they're evaluated in parallel.

pub mod header;
pub mod legal_range;
pub mod request;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use lut::{matrix, matrix::Matrix, Lut3D};
use rayon::prelude::*;

use crate::{
    profiles::{CameraProfile, ProfileRegistry, TargetProfile},
    Error, Result, Rgb, MIDDLE_GREY,
};

use request::{ClipStrategy, ExposureMode, GenerationRequest};

/// Largest accepted cube size.  Memory use is cubic in this.
pub const MAX_CUBE_SIZE: usize = 256;

/// The cube sizes offered to users.
pub const SUPPORTED_CUBE_SIZES: &[usize] = &[17, 33, 65];

/// Floor applied to luminance before taking its log, so that zero and
/// negative light don't produce -inf stops.
pub const LUMINANCE_EPSILON: f64 = 1.0e-6;

/// Scene luminance -> stops from middle grey.
#[inline]
pub fn exposure_stops(luminance: f64) -> f64 {
    (luminance.max(LUMINANCE_EPSILON) / MIDDLE_GREY).log2()
}

/// The IRE that a neutral scene value `stops` from middle grey encodes to
/// on the given target.
///
/// For neutral colors the encoded channels are all equal, and the
/// luminance row sums to one, so the IRE is just the encoded value.
pub fn ire_for_stops(target: &TargetProfile, stops: f64) -> f64 {
    let linear = MIDDLE_GREY * 2.0f64.powf(stops);
    100.0 * target.transfer_function.encode(linear)
}

/// Where the camera's clip indicators fire, and what the cube can
/// represent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ExposureDomain {
    /// Half a grid step in code values.
    pub tolerance: f64,

    /// Code value thresholds actually applied: black clips at or below
    /// `black_code`, white at or above `white_code`.
    pub black_code: f64,
    pub white_code: f64,

    /// Stops at log code 0.0 and 1.0.
    pub min_stops: f64,
    pub max_stops: f64,

    /// The profile's stop limits clamped into `min_stops..=max_stops`.
    pub black_stops: f64,
    pub white_stops: f64,
}

impl ExposureDomain {
    pub fn new(camera: &CameraProfile, cube_size: usize) -> ExposureDomain {
        let tolerance = 0.5 / (cube_size.max(2) - 1) as f64;
        let stops_at = |cv: f64| {
            let linear = camera.log_curve.to_linear(cv);
            exposure_stops(camera.gamut.luminance([linear; 3]))
        };
        let min_stops = stops_at(0.0);
        let max_stops = stops_at(1.0);

        ExposureDomain {
            tolerance,
            black_code: camera.log_floor + tolerance,
            white_code: camera.log_ceiling - tolerance,
            min_stops,
            max_stops,
            black_stops: camera.black_clip_stops.max(min_stops),
            white_stops: camera.white_clip_stops.min(max_stops),
        }
    }

    /// Whether the profile's nominal white limit is beyond what the cube
    /// can represent.
    pub fn white_exceeds_domain(&self, camera: &CameraProfile) -> bool {
        camera.white_clip_stops > self.max_stops
    }

    pub fn black_exceeds_domain(&self, camera: &CameraProfile) -> bool {
        camera.black_clip_stops < self.min_stops
    }
}

/// A fully computed LUT that hasn't been written anywhere yet.
#[derive(Debug, Clone)]
pub struct RenderedLut {
    pub title: String,
    pub header: Vec<String>,
    pub domain: ExposureDomain,
    pub lut: Lut3D,
}

impl RenderedLut {
    pub fn write_cube<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        lut::write_cube_3d(out, &self.title, &self.header, &self.lut)
    }
}

/// A LUT that has been written to disk.
#[derive(Debug, Clone)]
pub struct LutArtifact {
    pub path: PathBuf,
    pub rendered: RenderedLut,
}

/// Generates LUTs from requests, using the profiles of a registry.
#[derive(Debug, Copy, Clone)]
pub struct LutEngine<'a> {
    registry: &'a ProfileRegistry,
}

impl<'a> LutEngine<'a> {
    pub fn new(registry: &'a ProfileRegistry) -> LutEngine<'a> {
        LutEngine { registry }
    }

    pub fn registry(&self) -> &'a ProfileRegistry {
        self.registry
    }

    /// Computes the LUT and its header, in memory.
    pub fn render(&self, request: &GenerationRequest) -> Result<RenderedLut> {
        request.validate()?;
        let camera = self.registry.camera(&request.camera)?;
        let target = self.registry.target(&request.target)?;

        let domain = ExposureDomain::new(camera, request.cube_size);
        tracing::debug!(
            "{}: black clip at code <= {:.4}, white clip at code >= {:.4}, domain {:+.2} to {:+.2} stops",
            camera.name,
            domain.black_code,
            domain.white_code,
            domain.min_stops,
            domain.max_stops,
        );
        if domain.white_exceeds_domain(camera) {
            tracing::warn!(
                "{}: nominal white clip of {:+.1} stops exceeds the LUT domain maximum of {:+.2} stops.",
                camera.name,
                camera.white_clip_stops,
                domain.max_stops,
            );
        }

        // Both gamuts were validated by the registry, so this only fails
        // for pathological definitions.
        let gamut_matrix = matrix::rgb_to_rgb(camera.gamut.chroma, target.gamut.chroma)
            .ok_or_else(|| {
                Error::InvalidProfileDefinition(vec![format!(
                    "  [{} -> {}] No conversion between gamuts \"{}\" and \"{}\".",
                    camera.name, target.name, camera.gamut.name, target.gamut.name
                )])
            })?;

        let pipeline = Pipeline {
            camera,
            target,
            request,
            domain,
            gamut_matrix,
        };

        let res = request.cube_size;
        let mut lut = Lut3D {
            resolution: res,
            table: Vec::new(),
        };
        lut.table = (0..(res * res * res))
            .into_par_iter()
            .map(|i| {
                let [r, g, b] = lut.coords(i);
                pipeline.eval([lut.input_value(r), lut.input_value(g), lut.input_value(b)])
            })
            .collect();

        Ok(RenderedLut {
            title: format!("{} to {} False Color", camera.name, target.name),
            header: header::build(camera, target, request, &domain),
            domain,
            lut,
        })
    }

    /// Computes the LUT and writes it to `request.output`.
    ///
    /// Nothing is written unless the whole LUT was computed.  The file is
    /// written to a temporary sibling first and then moved into place, so
    /// a failed write doesn't leave a truncated file behind either.
    pub fn generate(&self, request: &GenerationRequest) -> Result<LutArtifact> {
        tracing::info!(
            "Generating {}^3 LUT: {} -> {}, {} band(s), writing to \"{}\".",
            request.cube_size,
            request.camera,
            request.target,
            request.bands.len(),
            request.output.display(),
        );

        let rendered = self.render(request)?;
        write_atomic(&request.output, &rendered).map_err(|source| Error::WriteFailure {
            path: request.output.clone(),
            source,
        })?;

        tracing::info!("Wrote \"{}\".", request.output.display());

        Ok(LutArtifact {
            path: request.output.clone(),
            rendered,
        })
    }
}

fn write_atomic(path: &Path, rendered: &RenderedLut) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "lut.cube".into());
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let result = (|| -> std::io::Result<()> {
        let mut out = std::io::BufWriter::new(std::fs::File::create(&temp_path)?);
        rendered.write_cube(&mut out)?;
        out.flush()?;
        drop(out);
        std::fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }

    result
}

/// Everything needed to evaluate a single grid node.
struct Pipeline<'a> {
    camera: &'a CameraProfile,
    target: &'a TargetProfile,
    request: &'a GenerationRequest,
    domain: ExposureDomain,
    gamut_matrix: Matrix,
}

impl<'a> Pipeline<'a> {
    fn eval(&self, log_rgb: Rgb) -> Rgb {
        let req = self.request;

        // Log -> scene linear, camera gamut.
        let curve = self.camera.log_curve;
        let linear = log_rgb.map(|n| curve.to_linear(n));
        let stops = exposure_stops(self.camera.gamut.luminance(linear));

        // Camera gamut -> target gamut.  Out-of-gamut light has no
        // display representation, so negatives are floored.
        let mut rgb = matrix::multiply_vec_mat(linear, self.gamut_matrix).map(|n| n.max(0.0));

        if req.monochrome {
            rgb = [self.target.gamut.luminance(rgb); 3];
        }

        let tf = self.target.transfer_function;
        let encoded = rgb.map(|n| tf.encode(n));
        let mut out = encoded;

        // Bands.
        let metric = match req.mode {
            ExposureMode::Stops => stops,
            ExposureMode::Ire => 100.0 * self.target.gamut.luminance(encoded),
        };
        for band in req.bands.iter() {
            if band.contains(metric) {
                out = req.band_blend.apply(out, band.color);
            }
        }

        // Clip indicators, black then white.
        let (clips_black, clips_white) = match req.clip_strategy {
            ClipStrategy::CodeValue => {
                let min = log_rgb[0].min(log_rgb[1]).min(log_rgb[2]);
                let max = log_rgb[0].max(log_rgb[1]).max(log_rgb[2]);
                (min <= self.domain.black_code, max >= self.domain.white_code)
            }
            ClipStrategy::SceneStops => (
                stops <= self.domain.black_stops,
                stops >= self.domain.white_stops,
            ),
        };
        if let (true, Some(color)) = (clips_black, req.black_clip.active()) {
            out = color;
        }
        if let (true, Some(color)) = (clips_white, req.white_clip.active()) {
            out = color;
        }

        if req.legal_range {
            out = legal_range::rgb_to_legal(out);
        }

        out.map(|n| n.max(0.0).min(1.0))
    }
}
