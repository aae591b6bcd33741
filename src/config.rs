//! Saved sessions.
//!
//! A session is a flat JSON record of everything needed to regenerate a
//! LUT without going through the options again.

use std::path::{Path, PathBuf};

use false_color::{
    color::{hex_to_rgb, rgb_to_hex},
    Band, BandBlend, ClipIndicator, ClipStrategy, ExposureMode, GenerationRequest,
};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not access session file \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed session file \"{}\": {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Request(#[from] false_color::Error),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModeConfig {
    #[default]
    Stops,
    Ire,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClipStrategyConfig {
    #[default]
    CodeValue,
    SceneStops,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    /// Stops or IRE, depending on the session's mode.
    #[serde(alias = "stop")]
    pub center: f64,
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub profile: String,
    pub target: String,
    #[serde(default = "default_cube_size")]
    pub cube_size: usize,
    #[serde(default)]
    pub bands: Vec<BandConfig>,
    #[serde(default)]
    pub mode: ModeConfig,

    #[serde(default)]
    pub black_clip: bool,
    #[serde(default)]
    pub black_hex: Option<String>,
    #[serde(default)]
    pub white_clip: bool,
    #[serde(default)]
    pub white_hex: Option<String>,

    #[serde(default)]
    pub monochrome: bool,
    #[serde(default)]
    pub legal_range: bool,
    #[serde(default = "default_opacity")]
    pub band_opacity: f64,
    #[serde(default)]
    pub clip_strategy: ClipStrategyConfig,

    /// Defaults to a name built from the profile and target.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_cube_size() -> usize {
    33
}

fn default_opacity() -> f64 {
    1.0
}

/// Spaces and dots are dropped, e.g. "Sony S-Log3" + "Rec.709" ->
/// "SonyS-Log3_Rec709.cube".
pub fn default_output_name(profile: &str, target: &str) -> PathBuf {
    let clean = |s: &str| -> String { s.chars().filter(|c| *c != ' ' && *c != '.').collect() };
    PathBuf::from(format!("{}_{}.cube", clean(profile), clean(target)))
}

impl SessionConfig {
    pub fn new(profile: &str, target: &str) -> SessionConfig {
        SessionConfig {
            profile: profile.into(),
            target: target.into(),
            cube_size: default_cube_size(),
            bands: Vec::new(),
            mode: ModeConfig::default(),
            black_clip: false,
            black_hex: None,
            white_clip: false,
            white_hex: None,
            monochrome: false,
            legal_range: false,
            band_opacity: default_opacity(),
            clip_strategy: ClipStrategyConfig::default(),
            output: None,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<SessionConfig, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.into(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.into(),
            source,
        })?;

        tracing::debug!("Loaded session from \"{}\".", path.display());
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.into(),
            source,
        })?;
        std::fs::write(path, text + "\n").map_err(|source| ConfigError::Io {
            path: path.into(),
            source,
        })?;

        tracing::info!("Saved session to \"{}\".", path.display());
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_name(&self.profile, &self.target))
    }

    /// Resolves the session into an engine request.  Hex colors are
    /// validated here.
    pub fn to_request(&self) -> Result<GenerationRequest, ConfigError> {
        let mut request =
            GenerationRequest::new(&self.profile, &self.target, self.cube_size, self.output_path());

        for band in self.bands.iter() {
            request
                .bands
                .push(Band::from_hex(band.center, &band.color, band.width)?);
        }

        request.mode = match self.mode {
            ModeConfig::Stops => ExposureMode::Stops,
            ModeConfig::Ire => ExposureMode::Ire,
        };
        request.black_clip = clip_indicator(self.black_clip, self.black_hex.as_deref())?;
        request.white_clip = clip_indicator(self.white_clip, self.white_hex.as_deref())?;
        request.monochrome = self.monochrome;
        request.legal_range = self.legal_range;
        request.band_blend = if self.band_opacity >= 1.0 {
            BandBlend::Overwrite
        } else {
            BandBlend::Opacity(self.band_opacity)
        };
        request.clip_strategy = match self.clip_strategy {
            ClipStrategyConfig::CodeValue => ClipStrategy::CodeValue,
            ClipStrategyConfig::SceneStops => ClipStrategy::SceneStops,
        };

        Ok(request)
    }

    pub fn from_request(request: &GenerationRequest) -> SessionConfig {
        let hex_if_on = |clip: &ClipIndicator| clip.active().map(rgb_to_hex);

        SessionConfig {
            profile: request.camera.clone(),
            target: request.target.clone(),
            cube_size: request.cube_size,
            bands: request
                .bands
                .iter()
                .map(|b| BandConfig {
                    center: b.center,
                    color: rgb_to_hex(b.color),
                    width: b.width,
                })
                .collect(),
            mode: match request.mode {
                ExposureMode::Stops => ModeConfig::Stops,
                ExposureMode::Ire => ModeConfig::Ire,
            },
            black_clip: request.black_clip.enabled,
            black_hex: hex_if_on(&request.black_clip),
            white_clip: request.white_clip.enabled,
            white_hex: hex_if_on(&request.white_clip),
            monochrome: request.monochrome,
            legal_range: request.legal_range,
            band_opacity: request.band_blend.opacity(),
            clip_strategy: match request.clip_strategy {
                ClipStrategy::CodeValue => ClipStrategyConfig::CodeValue,
                ClipStrategy::SceneStops => ClipStrategyConfig::SceneStops,
            },
            output: Some(request.output.clone()),
        }
    }
}

/// A clip indicator is only on if it's both enabled and has a color.
fn clip_indicator(enabled: bool, hex: Option<&str>) -> Result<ClipIndicator, ConfigError> {
    match (enabled, hex) {
        (true, Some(hex)) if !hex.is_empty() => Ok(ClipIndicator::on(hex_to_rgb(hex)?)),
        _ => Ok(ClipIndicator::off()),
    }
}
