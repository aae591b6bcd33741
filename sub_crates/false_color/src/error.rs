use std::path::PathBuf;

use thiserror::Error;

/// Which kind of profile a lookup was for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProfileKind {
    Camera,
    Target,
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileKind::Camera => write!(f, "camera"),
            ProfileKind::Target => write!(f, "target"),
        }
    }
}

/// Broad classes of failure, for callers that only care whether to fix
/// the profile tables, fix the request, or look at the filesystem.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Request,
    Io,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid profile definitions:\n{}", .0.join("\n"))]
    InvalidProfileDefinition(Vec<String>),

    #[error("unknown {kind} profile: \"{name}\"")]
    UnknownProfile { kind: ProfileKind, name: String },

    #[error("invalid band #{index}: {reason}")]
    InvalidBand { index: usize, reason: String },

    #[error("invalid {which} clip color: {reason}")]
    InvalidClipColor { which: &'static str, reason: String },

    #[error("unsupported cube size: {0} (must be between 2 and {})", crate::engine::MAX_CUBE_SIZE)]
    UnsupportedCubeSize(usize),

    #[error("invalid hex color \"{0}\": expected 6 hex digits, optionally prefixed with '#'")]
    InvalidHexFormat(String),

    #[error("failed to write LUT to \"{}\": {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidProfileDefinition(_) => ErrorCategory::Configuration,
            Error::UnknownProfile { .. }
            | Error::InvalidBand { .. }
            | Error::InvalidClipColor { .. }
            | Error::UnsupportedCubeSize(_)
            | Error::InvalidHexFormat(_) => ErrorCategory::Request,
            Error::WriteFailure { .. } => ErrorCategory::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
