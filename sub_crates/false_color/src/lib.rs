//! False-color exposure LUT generation.
//!
//! Takes footage in a camera's log encoding to a display encoding, and
//! paints exposure bands and sensor clipping indicators on top.

pub mod color;
pub mod engine;
pub mod error;
pub mod presets;
pub mod profiles;

pub use engine::{
    request::{Band, BandBlend, ClipIndicator, ClipStrategy, ExposureMode, GenerationRequest},
    LutArtifact, LutEngine, RenderedLut,
};
pub use error::{Error, ErrorCategory, ProfileKind, Result};
pub use profiles::ProfileRegistry;

/// Linear RGB or encoded RGB, depending on context.
pub type Rgb = [f64; 3];

/// Scene-linear reflectance of middle grey.
pub const MIDDLE_GREY: f64 = 0.18;
