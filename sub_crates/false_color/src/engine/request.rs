//! The fully resolved input to the engine.

use std::path::PathBuf;

use crate::{color::hex_to_rgb, engine::MAX_CUBE_SIZE, Error, Result, Rgb};

/// Which exposure metric band centers and widths are measured in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ExposureMode {
    /// Stops from middle grey, measured on scene luminance.
    #[default]
    Stops,

    /// Display signal level, 0-100, measured on the encoded output.
    Ire,
}

impl ExposureMode {
    pub fn unit(&self) -> &'static str {
        match *self {
            ExposureMode::Stops => "stops",
            ExposureMode::Ire => "IRE",
        }
    }
}

/// A false-color band.  Samples whose exposure metric lies within
/// `[center - width, center + width]` get painted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Band {
    pub center: f64,
    pub color: Rgb,
    pub width: f64,
}

impl Band {
    pub fn new(center: f64, color: Rgb, width: f64) -> Band {
        Band {
            center,
            color,
            width,
        }
    }

    pub fn from_hex(center: f64, hex: &str, width: f64) -> Result<Band> {
        Ok(Band::new(center, hex_to_rgb(hex)?, width))
    }

    #[inline]
    pub fn contains(&self, metric: f64) -> bool {
        metric >= (self.center - self.width) && metric <= (self.center + self.width)
    }
}

/// A clip indicator toggle and its color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClipIndicator {
    pub enabled: bool,
    pub color: Rgb,
}

impl ClipIndicator {
    pub fn off() -> ClipIndicator {
        ClipIndicator {
            enabled: false,
            color: [0.0; 3],
        }
    }

    pub fn on(color: Rgb) -> ClipIndicator {
        ClipIndicator {
            enabled: true,
            color,
        }
    }

    pub fn from_hex(hex: &str) -> Result<ClipIndicator> {
        Ok(ClipIndicator::on(hex_to_rgb(hex)?))
    }

    /// The color to paint, if enabled.
    pub fn active(&self) -> Option<Rgb> {
        if self.enabled {
            Some(self.color)
        } else {
            None
        }
    }
}

impl Default for ClipIndicator {
    fn default() -> ClipIndicator {
        ClipIndicator::off()
    }
}

/// How band colors combine with the image underneath.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum BandBlend {
    #[default]
    Overwrite,

    /// `color * opacity + base * (1 - opacity)`.  Opacity is clamped to
    /// [0.0, 1.0].
    Opacity(f64),
}

impl BandBlend {
    #[inline]
    pub fn apply(&self, base: Rgb, color: Rgb) -> Rgb {
        match *self {
            BandBlend::Overwrite => color,
            BandBlend::Opacity(opacity) => {
                let a = opacity.max(0.0).min(1.0);
                [
                    color[0] * a + base[0] * (1.0 - a),
                    color[1] * a + base[1] * (1.0 - a),
                    color[2] * a + base[2] * (1.0 - a),
                ]
            }
        }
    }

    pub fn opacity(&self) -> f64 {
        match *self {
            BandBlend::Overwrite => 1.0,
            BandBlend::Opacity(opacity) => opacity,
        }
    }
}

/// Where clip indicators are measured.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ClipStrategy {
    /// Against the raw log code values and the profile's floor and
    /// ceiling.
    #[default]
    CodeValue,

    /// Legacy: against scene luminance in stops, using the profile's stop
    /// limits clamped into the range the cube can represent.  This can
    /// disagree with where the sensor actually clips.
    SceneStops,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub camera: String,
    pub target: String,
    pub cube_size: usize,

    /// Applied in order.  Later bands win where they overlap.
    pub bands: Vec<Band>,
    pub mode: ExposureMode,

    pub black_clip: ClipIndicator,
    pub white_clip: ClipIndicator,

    pub monochrome: bool,
    pub legal_range: bool,
    pub band_blend: BandBlend,
    pub clip_strategy: ClipStrategy,

    pub output: PathBuf,
}

impl GenerationRequest {
    /// A request with no bands, no clip indicators, and default options.
    pub fn new<P: Into<PathBuf>>(camera: &str, target: &str, cube_size: usize, output: P) -> Self {
        GenerationRequest {
            camera: camera.into(),
            target: target.into(),
            cube_size,
            bands: Vec::new(),
            mode: ExposureMode::default(),
            black_clip: ClipIndicator::off(),
            white_clip: ClipIndicator::off(),
            monochrome: false,
            legal_range: false,
            band_blend: BandBlend::default(),
            clip_strategy: ClipStrategy::default(),
            output: output.into(),
        }
    }

    /// Checks the fields that don't need the profile registry.
    pub fn validate(&self) -> Result<()> {
        if self.cube_size < 2 || self.cube_size > MAX_CUBE_SIZE {
            return Err(Error::UnsupportedCubeSize(self.cube_size));
        }

        for (index, band) in self.bands.iter().enumerate() {
            if !band.center.is_finite() {
                return Err(Error::InvalidBand {
                    index,
                    reason: format!("center must be a finite number, got {}", band.center),
                });
            }
            if !band.width.is_finite() || band.width <= 0.0 {
                return Err(Error::InvalidBand {
                    index,
                    reason: format!("width must be greater than zero, got {}", band.width),
                });
            }
            if !in_unit_range(band.color) {
                return Err(Error::InvalidBand {
                    index,
                    reason: format!("color channels must be in [0, 1], got {:?}", band.color),
                });
            }
        }

        for (which, clip) in [("black", &self.black_clip), ("white", &self.white_clip)] {
            if let Some(color) = clip.active() {
                if !in_unit_range(color) {
                    return Err(Error::InvalidClipColor {
                        which,
                        reason: format!("color channels must be in [0, 1], got {:?}", color),
                    });
                }
            }
        }

        Ok(())
    }
}

fn in_unit_range(color: Rgb) -> bool {
    color.iter().all(|n| (0.0..=1.0).contains(n))
}
