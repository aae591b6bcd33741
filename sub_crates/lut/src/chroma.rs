//! Chromaticities of the RGB color spaces we know about.
//!
//! All coordinates are CIE 1931 xy.

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Chromaticities {
    pub r: (f64, f64),
    pub g: (f64, f64),
    pub b: (f64, f64),
    pub w: (f64, f64),
}

/// D65 white point.
pub const WHITE_D65: (f64, f64) = (0.3127, 0.3290);

/// The ACES white point (approximately D60).
pub const WHITE_ACES: (f64, f64) = (0.32168, 0.33767);

pub const REC709: Chromaticities = Chromaticities {
    r: (0.640, 0.330),
    g: (0.300, 0.600),
    b: (0.150, 0.060),
    w: WHITE_D65,
};

pub const REC2020: Chromaticities = Chromaticities {
    r: (0.708, 0.292),
    g: (0.170, 0.797),
    b: (0.131, 0.046),
    w: WHITE_D65,
};

/// ACES AP1, the primaries of ACEScg and ACEScct.
pub const ACES_AP1: Chromaticities = Chromaticities {
    r: (0.713, 0.293),
    g: (0.165, 0.830),
    b: (0.128, 0.044),
    w: WHITE_ACES,
};

pub const SONY_S_GAMUT3_CINE: Chromaticities = Chromaticities {
    r: (0.766, 0.275),
    g: (0.225, 0.800),
    b: (0.089, -0.087),
    w: WHITE_D65,
};

pub const PANASONIC_V_GAMUT: Chromaticities = Chromaticities {
    r: (0.730, 0.280),
    g: (0.165, 0.840),
    b: (0.100, -0.030),
    w: WHITE_D65,
};

pub const CANON_CINEMA_GAMUT: Chromaticities = Chromaticities {
    r: (0.740, 0.270),
    g: (0.170, 1.140),
    b: (0.080, -0.100),
    w: WHITE_D65,
};

/// ARRI Wide Gamut 3, a.k.a. Alexa Wide Gamut.
pub const ARRI_WIDE_GAMUT_3: Chromaticities = Chromaticities {
    r: (0.6840, 0.3130),
    g: (0.2210, 0.8480),
    b: (0.0861, -0.1020),
    w: WHITE_D65,
};

pub const RED_WIDE_GAMUT_RGB: Chromaticities = Chromaticities {
    r: (0.780308, 0.304253),
    g: (0.121595, 1.493994),
    b: (0.095612, -0.084589),
    w: WHITE_D65,
};

/// Every named gamut, as `(name, chromaticities)` pairs.
pub const GAMUTS: &[(&str, Chromaticities)] = &[
    ("ITU-R BT.709", REC709),
    ("ITU-R BT.2020", REC2020),
    ("ACES AP1", ACES_AP1),
    ("S-Gamut3.Cine", SONY_S_GAMUT3_CINE),
    ("V-Gamut", PANASONIC_V_GAMUT),
    ("Cinema Gamut", CANON_CINEMA_GAMUT),
    ("ARRI Wide Gamut 3", ARRI_WIDE_GAMUT_3),
    ("REDWideGamutRGB", RED_WIDE_GAMUT_RGB),
];

/// Looks up a gamut by its registered name.
pub fn by_name(name: &str) -> Option<Chromaticities> {
    GAMUTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, chroma)| *chroma)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(by_name("ITU-R BT.709"), Some(REC709));
        assert_eq!(by_name("S-Gamut3.Cine"), Some(SONY_S_GAMUT3_CINE));
        assert_eq!(by_name("S-Gamut3"), None);
    }

    #[test]
    fn names_are_unique() {
        for (i, (a, _)) in GAMUTS.iter().enumerate() {
            for (b, _) in GAMUTS[(i + 1)..].iter() {
                assert_ne!(a, b);
            }
        }
    }
}
