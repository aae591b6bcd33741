//! Camera log curves and display transfer functions.
//!
//! Every module has a `from_linear()` (encode) and `to_linear()`
//! (decode) pair operating on normalized code values, where 1.0 is the
//! maximum code value (e.g. 1023 for 10-bit).

/// Rec.709 OETF.
pub mod rec709 {
    const ALPHA: f64 = 1.099;
    const BETA: f64 = 0.018;

    /// Linear -> Rec.709 (OETF function).
    #[inline]
    pub fn from_linear(n: f64) -> f64 {
        if n < BETA {
            n * 4.5
        } else {
            (ALPHA * n.powf(0.45)) - (ALPHA - 1.0)
        }
    }

    /// Rec.709 -> Linear (inverse OETF).
    #[inline]
    pub fn to_linear(n: f64) -> f64 {
        if n < (BETA * 4.5) {
            n / 4.5
        } else {
            ((n + (ALPHA - 1.0)) / ALPHA).powf(1.0 / 0.45)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn from_linear_test() {
            assert_eq!(from_linear(0.0), 0.0);
            assert!((from_linear(1.0) - 1.0).abs() < 0.000_000_1);
            assert!((from_linear(0.018) - 0.081).abs() < 0.001);
            assert!((from_linear(0.18) - 0.409).abs() < 0.001);
        }

        #[test]
        fn to_linear_test() {
            assert_eq!(to_linear(0.0), 0.0);
            assert!((to_linear(1.0) - 1.0).abs() < 0.000_000_1);
            assert!((to_linear(from_linear(0.5)) - 0.5).abs() < 0.000_000_1);
        }
    }
}

/// Rec.2020 OETF.
///
/// Same shape as Rec.709, but with the higher-precision constants from
/// BT.2020 so that it's accurate at 12 bits.
pub mod rec2020 {
    const ALPHA: f64 = 1.099_296_826_809_44;
    const BETA: f64 = 0.018_053_968_510_807;

    /// Linear -> Rec.2020 (OETF function).
    #[inline]
    pub fn from_linear(n: f64) -> f64 {
        if n < BETA {
            n * 4.5
        } else {
            (ALPHA * n.powf(0.45)) - (ALPHA - 1.0)
        }
    }

    /// Rec.2020 -> Linear (inverse OETF).
    #[inline]
    pub fn to_linear(n: f64) -> f64 {
        if n < (BETA * 4.5) {
            n / 4.5
        } else {
            ((n + (ALPHA - 1.0)) / ALPHA).powf(1.0 / 0.45)
        }
    }

}

/// Sony's S-Log3 curve.
///
/// Note: these are mappings between "scene linear" and "code values".
/// Scene-linear 0.0 maps to code value 95/1023, and scene-linear values
/// can be both less than 0.0 and greater than 1.0.
pub mod sony_slog3 {
    /// From scene linear to (normalized) code values.
    ///
    /// For example, to get 10-bit code values do
    /// `from_linear(scene_linear_in) * 1023.0`
    pub fn from_linear(x: f64) -> f64 {
        if x < 0.01125000 {
            (x * (171.2102946929 - 95.0) / 0.01125000 + 95.0) / 1023.0
        } else {
            (420.0 + ((x + 0.01) / (0.18 + 0.01)).log10() * 261.5) / 1023.0
        }
    }

    /// From (normalized) code values to scene linear.
    ///
    /// For example, if using 10-bit code values do
    /// `to_linear(10_bit_cv_in / 1023.0)`
    pub fn to_linear(x: f64) -> f64 {
        if x < (171.2102946929 / 1023.0) {
            (x * 1023.0 - 95.0) * 0.01125000 / (171.2102946929 - 95.0)
        } else {
            (10.0f64.powf((x * 1023.0 - 420.0) / 261.5)) * (0.18 + 0.01) - 0.01
        }
    }

}

/// Panasonic's V-Log curve.
pub mod panasonic_vlog {
    const CUT1: f64 = 0.01;
    const CUT2: f64 = 0.181;
    const B: f64 = 0.00873;
    const C: f64 = 0.241514;
    const D: f64 = 0.598206;

    /// Linear -> V-Log
    pub fn from_linear(x: f64) -> f64 {
        if x < CUT1 {
            5.6 * x + 0.125
        } else {
            C * (x + B).log10() + D
        }
    }

    /// V-Log -> Linear
    pub fn to_linear(x: f64) -> f64 {
        if x < CUT2 {
            (x - 0.125) / 5.6
        } else {
            10.0f64.powf((x - D) / C) - B
        }
    }

}

/// Canon Log 3.
///
/// Note: Canon specifies these curves in terms of a linear value where
/// 18% grey reflectance is 0.2 (i.e. reflectance / 0.9).  This module
/// implements the curve exactly as specified, without that scaling.
pub mod canon_log3 {
    const A: f64 = 14.98325;
    const B: f64 = 1.9754798;
    const C: f64 = 0.36726845;
    const D: f64 = 0.12783901;
    const E: f64 = 0.12512219;
    const F: f64 = 0.12240537;

    /// Linear -> Canon Log 3
    pub fn from_linear(x: f64) -> f64 {
        const BOUND: f64 = 0.014;
        if x < -BOUND {
            -C * (1.0 - (A * x)).log10() + D
        } else if x <= BOUND {
            (B * x) + E
        } else {
            C * (1.0 + (A * x)).log10() + F
        }
    }

    /// Canon Log 3 -> Linear
    pub fn to_linear(x: f64) -> f64 {
        const BOUND1: f64 = 0.097465473;
        const BOUND2: f64 = 0.15277891;
        if x < BOUND1 {
            -(10.0f64.powf((D - x) / C) - 1.0) / A
        } else if x <= BOUND2 {
            (x - E) / B
        } else {
            (10.0f64.powf((x - F) / C) - 1.0) / A
        }
    }

}

/// ARRI LogC3, at EI 800.
pub mod arri_logc3 {
    const CUT: f64 = 0.010591;
    const A: f64 = 5.555556;
    const B: f64 = 0.052272;
    const C: f64 = 0.247190;
    const D: f64 = 0.385537;
    const E: f64 = 5.367655;
    const F: f64 = 0.092809;

    /// Linear -> LogC3
    pub fn from_linear(x: f64) -> f64 {
        if x > CUT {
            C * (A * x + B).log10() + D
        } else {
            E * x + F
        }
    }

    /// LogC3 -> Linear
    pub fn to_linear(x: f64) -> f64 {
        if x > (E * CUT + F) {
            (10.0f64.powf((x - D) / C) - B) / A
        } else {
            (x - F) / E
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn from_linear_test() {
            // Invariants from "ALEXA Log C Curve - Usage in VFX", ARRI,
            // June 2017: 18% grey lands on 10-bit code value 400.
            assert!((from_linear(0.0) - 0.092809).abs() < 0.000_001);
            assert!((from_linear(0.18) - (400.0 / 1023.0)).abs() < 0.001);
        }

        #[test]
        fn to_linear_test() {
            assert!((to_linear(0.092809) - 0.0).abs() < 0.000_001);
            assert!((to_linear(400.0 / 1023.0) - 0.18).abs() < 0.001);
        }
    }
}

/// RED's Log3G10 curve (version 3, with the 0.01 black offset).
pub mod red_log3g10 {
    const A: f64 = 0.224282;
    const B: f64 = 155.975327;
    const C: f64 = 0.01;
    const G: f64 = 15.1927;

    /// Linear -> Log3G10
    pub fn from_linear(x: f64) -> f64 {
        let x = x + C;
        if x < 0.0 {
            x * G
        } else {
            A * (x * B + 1.0).log10()
        }
    }

    /// Log3G10 -> Linear
    pub fn to_linear(y: f64) -> f64 {
        if y < 0.0 {
            (y / G) - C
        } else {
            ((10.0f64.powf(y / A) - 1.0) / B) - C
        }
    }

}

/// ACEScct, the log encoding used for grading in ACES.
pub mod aces_cct {
    const X_BRK: f64 = 0.0078125;
    const Y_BRK: f64 = 0.155_251_141_552_511;
    const A: f64 = 10.540_237_741_654_5;
    const B: f64 = 0.072_905_534_195_835_5;

    /// Linear -> ACEScct
    pub fn from_linear(x: f64) -> f64 {
        if x <= X_BRK {
            A * x + B
        } else {
            (x.log2() + 9.72) / 17.52
        }
    }

    /// ACEScct -> Linear
    pub fn to_linear(y: f64) -> f64 {
        if y <= Y_BRK {
            (y - B) / A
        } else {
            2.0f64.powf(y * 17.52 - 9.72).min(65504.0)
        }
    }

}
