//! Broadcast legal ("video") range.
//!
//! Maps full-range [0, 1] onto the 10-bit 64-940 code window.

use crate::Rgb;

pub const LEGAL_MIN: f64 = 64.0 / 1023.0;
pub const LEGAL_MAX: f64 = 940.0 / 1023.0;

/// Full range -> legal range.  Input is clamped to [0, 1] first.
#[inline]
pub fn to_legal(n: f64) -> f64 {
    let n = n.max(0.0).min(1.0);
    // Written as a lerp so that the end points land exactly.
    LEGAL_MIN * (1.0 - n) + LEGAL_MAX * n
}

/// Legal range -> full range.  The inverse of `to_legal()`.
#[inline]
pub fn from_legal(n: f64) -> f64 {
    (n - LEGAL_MIN) / (LEGAL_MAX - LEGAL_MIN)
}

pub fn rgb_to_legal(rgb: Rgb) -> Rgb {
    rgb.map(to_legal)
}
