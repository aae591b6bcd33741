//! 3x3 color matrix utilities.
//!
//! Matrices are row-major and are applied to column vectors, so
//! `multiply_vec_mat(v, m)` computes `m * v`.

use crate::chroma::Chromaticities;

pub type Matrix = [[f64; 3]; 3];

pub const IDENTITY: Matrix = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Port of the RGBtoXYZ function from the ACES CTL reference implementation.
/// See lib/IlmCtlMath/CtlColorSpace.cpp in the CTL reference implementation.
///
/// This takes the chromaticities of an RGB colorspace and generates a
/// transform matrix from that space to XYZ.
///
/// * `chroma` is the chromaticities.
/// * `y` is the XYZ "Y" value that should map to RGB (1,1,1)
///
/// Note: the generated matrix will *not* do any chromatic adaptation.
pub fn rgb_to_xyz(chroma: Chromaticities, y: f64) -> Matrix {
    // X and Z values of RGB value (1, 1, 1), or "white".
    let x = chroma.w.0 * y / chroma.w.1;
    let z = (1.0 - chroma.w.0 - chroma.w.1) * y / chroma.w.1;

    // Scale factors for matrix rows.
    let d = chroma.r.0 * (chroma.b.1 - chroma.g.1)
        + chroma.b.0 * (chroma.g.1 - chroma.r.1)
        + chroma.g.0 * (chroma.r.1 - chroma.b.1);

    let sr = (x * (chroma.b.1 - chroma.g.1)
        - chroma.g.0 * (y * (chroma.b.1 - 1.0) + chroma.b.1 * (x + z))
        + chroma.b.0 * (y * (chroma.g.1 - 1.0) + chroma.g.1 * (x + z)))
        / d;

    let sg = (x * (chroma.r.1 - chroma.b.1)
        + chroma.r.0 * (y * (chroma.b.1 - 1.0) + chroma.b.1 * (x + z))
        - chroma.b.0 * (y * (chroma.r.1 - 1.0) + chroma.r.1 * (x + z)))
        / d;

    let sb = (x * (chroma.g.1 - chroma.r.1)
        - chroma.r.0 * (y * (chroma.g.1 - 1.0) + chroma.g.1 * (x + z))
        + chroma.g.0 * (y * (chroma.r.1 - 1.0) + chroma.r.1 * (x + z)))
        / d;

    [
        [sr * chroma.r.0, sg * chroma.g.0, sb * chroma.b.0],
        [sr * chroma.r.1, sg * chroma.g.1, sb * chroma.b.1],
        [
            sr * (1.0 - chroma.r.0 - chroma.r.1),
            sg * (1.0 - chroma.g.0 - chroma.g.1),
            sb * (1.0 - chroma.b.0 - chroma.b.1),
        ],
    ]
}

/// The row of the RGB -> XYZ matrix that produces CIE Y.
///
/// These are the luminance weights of the color space, and they add up
/// to 1.0.
pub fn luminance_row(chroma: Chromaticities) -> [f64; 3] {
    rgb_to_xyz(chroma, 1.0)[1]
}

/// Creates a matrix to chromatically adapt CIE 1931 XYZ colors
/// from one whitepoint to another, using the Bradford transform.
///
/// - `src_wp`: the xy chromaticity coordinates of the white point to convert from.
/// - `dst_wp`: the xy chromaticity coordinates of the white point to convert to.
pub fn bradford_adaptation(src_wp: (f64, f64), dst_wp: (f64, f64)) -> Matrix {
    const TO_LMS: Matrix = [
        [0.8951, 0.2664, -0.1614],
        [-0.7502, 1.7135, 0.0367],
        [0.0389, -0.0685, 1.0296],
    ];
    const FROM_LMS: Matrix = [
        [0.9869929, -0.1470543, 0.1599627],
        [0.4323053, 0.5183603, 0.0492912],
        [-0.0085287, 0.0400428, 0.9684867],
    ];

    let src_wp_xyz = [
        src_wp.0 / src_wp.1,
        1.0,
        (1.0 - src_wp.0 - src_wp.1) / src_wp.1,
    ];
    let dst_wp_xyz = [
        dst_wp.0 / dst_wp.1,
        1.0,
        (1.0 - dst_wp.0 - dst_wp.1) / dst_wp.1,
    ];

    let src_wp_lms = multiply_vec_mat(src_wp_xyz, TO_LMS);
    let dst_wp_lms = multiply_vec_mat(dst_wp_xyz, TO_LMS);

    // Fold the ratio between the whitepoints into the LMS -> XYZ matrix.
    let wp_ratio = [
        dst_wp_lms[0] / src_wp_lms[0],
        dst_wp_lms[1] / src_wp_lms[1],
        dst_wp_lms[2] / src_wp_lms[2],
    ];
    let mut adapted_lms_to_xyz = FROM_LMS;
    for row in adapted_lms_to_xyz.iter_mut() {
        for (n, ratio) in row.iter_mut().zip(wp_ratio.iter()) {
            *n *= ratio;
        }
    }

    multiply(TO_LMS, adapted_lms_to_xyz)
}

/// Builds the linear transform from one RGB space to another, going
/// through XYZ and adapting the white point if the two spaces differ.
///
/// Returns `None` if either set of chromaticities is degenerate.
pub fn rgb_to_rgb(src: Chromaticities, dst: Chromaticities) -> Option<Matrix> {
    let to_xyz = rgb_to_xyz(src, 1.0);
    let from_xyz = inverse(rgb_to_xyz(dst, 1.0))?;
    if !is_finite(to_xyz) {
        return None;
    }

    let adapt = if src.w == dst.w {
        IDENTITY
    } else {
        bradford_adaptation(src.w, dst.w)
    };

    Some(compose(&[to_xyz, adapt, from_xyz]))
}

/// Calculates the inverse of the given 3x3 matrix.
///
/// Ported to Rust from `gjInverse()` in IlmBase's Imath/ImathMatrix.h
///
/// Returns `None` if the matrix is singular.
pub fn inverse(m: Matrix) -> Option<Matrix> {
    let mut s = IDENTITY;
    let mut t = m;

    if !is_finite(m) {
        return None;
    }

    // Forward elimination
    for i in 0..2 {
        let mut pivot = i;
        let mut pivotsize = t[i][i].abs();

        for j in (i + 1)..3 {
            let tmp = t[j][i].abs();
            if tmp > pivotsize {
                pivot = j;
                pivotsize = tmp;
            }
        }

        if pivotsize == 0.0 {
            return None;
        }

        if pivot != i {
            t.swap(i, pivot);
            s.swap(i, pivot);
        }

        for j in (i + 1)..3 {
            let f = t[j][i] / t[i][i];

            for k in 0..3 {
                t[j][k] -= f * t[i][k];
                s[j][k] -= f * s[i][k];
            }
        }
    }

    // Backward substitution
    for i in (0..3).rev() {
        let f = t[i][i];

        if f == 0.0 {
            return None;
        }

        for j in 0..3 {
            t[i][j] /= f;
            s[i][j] /= f;
        }

        for j in 0..i {
            let f = t[j][i];

            for k in 0..3 {
                t[j][k] -= f * t[i][k];
                s[j][k] -= f * s[i][k];
            }
        }
    }

    Some(s)
}

/// Multiplies two matrices together.
///
/// The result is a matrix that is equivalent to first
/// multiplying by `a` and then by `b`.
pub fn multiply(a: Matrix, b: Matrix) -> Matrix {
    let mut c = [[0.0f64; 3]; 3];

    for i in 0..3 {
        for j in 0..3 {
            c[i][j] = (b[i][0] * a[0][j]) + (b[i][1] * a[1][j]) + (b[i][2] * a[2][j]);
        }
    }

    c
}

/// Composes a list of matrices, applied in list order.
pub fn compose(matrices: &[Matrix]) -> Matrix {
    matrices.iter().fold(IDENTITY, |acc, m| multiply(acc, *m))
}

#[inline]
pub fn multiply_vec_mat(a: [f64; 3], b: Matrix) -> [f64; 3] {
    [
        (a[0] * b[0][0]) + (a[1] * b[0][1]) + (a[2] * b[0][2]),
        (a[0] * b[1][0]) + (a[1] * b[1][1]) + (a[2] * b[1][2]),
        (a[0] * b[2][0]) + (a[1] * b[2][1]) + (a[2] * b[2][2]),
    ]
}

fn is_finite(m: Matrix) -> bool {
    m.iter().flatten().all(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chroma::{ACES_AP1, REC2020, REC709, SONY_S_GAMUT3_CINE};

    fn vec_max_diff(a: [f64; 3], b: [f64; 3]) -> f64 {
        let x = (a[0] - b[0]).abs();
        let y = (a[1] - b[1]).abs();
        let z = (a[2] - b[2]).abs();

        x.max(y.max(z))
    }

    #[test]
    fn rec709_luminance_row() {
        let row = luminance_row(REC709);
        assert!((row[0] - 0.2126).abs() < 0.0001);
        assert!((row[1] - 0.7152).abs() < 0.0001);
        assert!((row[2] - 0.0722).abs() < 0.0001);
    }

    #[test]
    fn rec2020_luminance_row() {
        let row = luminance_row(REC2020);
        assert!((row[0] - 0.2627).abs() < 0.0001);
        assert!((row[1] - 0.6780).abs() < 0.0001);
        assert!((row[2] - 0.0593).abs() < 0.0001);
    }

    #[test]
    fn luminance_rows_sum_to_one() {
        for (_, chroma) in crate::chroma::GAMUTS {
            let row = luminance_row(*chroma);
            assert!((row[0] + row[1] + row[2] - 1.0).abs() < 1.0e-12);
        }
    }

    #[test]
    fn multiply_matches_sequential_application() {
        let a = rgb_to_xyz(REC709, 1.0);
        let b = inverse(rgb_to_xyz(REC2020, 1.0)).unwrap();
        let combined = multiply(a, b);

        for v in [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
        ] {
            assert!(
                vec_max_diff(
                    multiply_vec_mat(multiply_vec_mat(v, a), b),
                    multiply_vec_mat(v, combined),
                ) < 1.0e-14
            );
        }
    }

    #[test]
    fn inverse_round_trip() {
        let m = rgb_to_xyz(SONY_S_GAMUT3_CINE, 1.0);
        let mi = inverse(m).unwrap();
        let id = multiply(m, mi);
        for i in 0..3 {
            assert!(vec_max_diff(id[i], IDENTITY[i]) < 1.0e-12);
        }
    }

    #[test]
    fn inverse_singular() {
        assert_eq!(inverse([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]), None);
        assert_eq!(inverse([[f64::NAN, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]), None);
    }

    #[test]
    fn rgb_to_rgb_preserves_white() {
        // Same white point: RGB white stays RGB white.
        let m = rgb_to_rgb(SONY_S_GAMUT3_CINE, REC709).unwrap();
        assert!(vec_max_diff(multiply_vec_mat([1.0; 3], m), [1.0; 3]) < 1.0e-12);

        // Different white points: adaptation maps white to white.
        let m = rgb_to_rgb(REC709, ACES_AP1).unwrap();
        assert!(vec_max_diff(multiply_vec_mat([1.0; 3], m), [1.0; 3]) < 1.0e-4);
    }

    #[test]
    fn rgb_to_rgb_degenerate() {
        let mut broken = REC709;
        broken.g = broken.r;
        assert_eq!(rgb_to_rgb(REC709, broken), None);
    }

    #[test]
    fn bradford_identity() {
        let m = bradford_adaptation((0.3127, 0.3290), (0.3127, 0.3290));
        for i in 0..3 {
            assert!(vec_max_diff(m[i], IDENTITY[i]) < 1.0e-6);
        }
    }
}
