//! CIEDE2000 perceptual colour difference.
//!
//! The full CIE 2000 formula: chroma-dependent a-axis correction, hue
//! averaging with wraparound, the rotation term, and the lightness /
//! chroma / hue weighting functions. This is the single distance metric
//! shared by palette training and dithering.

use std::f64::consts::PI;

use super::lab::Lab;

/// Empirical ceiling of the CIEDE2000 distance over the 8-bit sRGB gamut.
///
/// Percentage-valued thresholds are scaled against this to obtain
/// absolute distances.
pub const CIEDE2000_SRGB_CEILING: f64 = 119.475;

/// 25^7, the constant of the chroma correction and rotation terms.
const POW25_7: f64 = 6_103_515_625.0;

/// CIEDE2000 colour difference between two Lab colours.
///
/// Symmetric, and zero for identical inputs. Typical just-noticeable
/// differences are around 1.0; the sRGB gamut spans up to
/// [`CIEDE2000_SRGB_CEILING`].
pub fn ciede2000(lab1: Lab, lab2: Lab) -> f64 {
    let dl = lab2.l - lab1.l;
    let avg_l = (lab1.l + lab2.l) / 2.0;

    let c1 = (lab1.a.powi(2) + lab1.b.powi(2)).sqrt();
    let c2 = (lab2.a.powi(2) + lab2.b.powi(2)).sqrt();
    let avg_c = (c1 + c2) / 2.0;

    let c_term = 1.0 - (avg_c.powi(7) / (avg_c.powi(7) + POW25_7)).sqrt();
    let a_corr1 = lab1.a + (lab1.a / 2.0) * c_term;
    let a_corr2 = lab2.a + (lab2.a / 2.0) * c_term;

    let c_corr1 = (a_corr1.powi(2) + lab1.b.powi(2)).sqrt();
    let c_corr2 = (a_corr2.powi(2) + lab2.b.powi(2)).sqrt();
    let delta_c_corr = c_corr2 - c_corr1;
    let avg_c_corr = (c_corr1 + c_corr2) / 2.0;

    let mut h1 = 0.0;
    if lab1.b != 0.0 || a_corr1 != 0.0 {
        h1 = lab1.b.atan2(a_corr1);
        if h1 < 0.0 {
            h1 += 2.0 * PI;
        }
    }
    let mut h2 = 0.0;
    if lab2.b != 0.0 || a_corr2 != 0.0 {
        h2 = lab2.b.atan2(a_corr2);
        if h2 < 0.0 {
            h2 += 2.0 * PI;
        }
    }

    let dh = if (h1 - h2).abs() <= PI {
        h2 - h1
    } else if h2 <= h1 {
        h2 - h1 + 2.0 * PI
    } else {
        h2 - h1 - 2.0 * PI
    };

    let avg_h = if (h1 - h2).abs() <= PI {
        (h1 + h2) / 2.0
    } else if h1 + h2 < 2.0 * PI {
        (h1 + h2 + 2.0 * PI) / 2.0
    } else {
        (h1 + h2 - 2.0 * PI) / 2.0
    };

    let delta_h_corr = 2.0 * (c_corr1 * c_corr2).sqrt() * (dh / 2.0).sin();

    let t = 1.0 - 0.17 * (avg_h - PI / 6.0).cos() + 0.24 * (2.0 * avg_h).cos()
        + 0.32 * (3.0 * avg_h + PI * 6.0 / 180.0).cos()
        - 0.20 * (4.0 * avg_h - PI * 63.0 / 180.0).cos();

    let sl = 1.0 + 0.015 * (avg_l - 50.0).powi(2) / (20.0 + (avg_l - 50.0).powi(2)).sqrt();
    let sc = 1.0 + 0.045 * avg_c_corr;
    let sh = 1.0 + 0.015 * avg_c_corr * t;

    let rotation = -2.0
        * (avg_c_corr.powi(7) / (avg_c_corr.powi(7) + POW25_7)).sqrt()
        * ((PI / 3.0)
            * (-((avg_h - 275.0 * PI / 180.0) / (25.0 * PI / 180.0)).powi(2)).exp())
        .sin();
    let corr_term = rotation * delta_c_corr * delta_h_corr / (sc * sh);

    ((dl / sl).powi(2) + (delta_c_corr / sc).powi(2) + (delta_h_corr / sh).powi(2) + corr_term)
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{LinearRgb, Srgb, Xyz};

    fn lab_of(srgb: Srgb) -> Lab {
        Lab::from(Xyz::from(LinearRgb::from(srgb)))
    }

    #[test]
    fn test_identity_is_zero() {
        let colours = [
            Srgb::new(0, 0, 0),
            Srgb::new(255, 255, 255),
            Srgb::new(200, 30, 90),
            Srgb::new(17, 255, 0),
        ];
        for c in colours {
            let lab = lab_of(c);
            assert_eq!(ciede2000(lab, lab), 0.0, "self-distance of {c:?}");
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (Srgb::new(10, 20, 30), Srgb::new(200, 180, 160)),
            (Srgb::new(255, 0, 0), Srgb::new(0, 0, 255)),
            (Srgb::new(90, 90, 91), Srgb::new(90, 91, 90)),
        ];
        for (a, b) in pairs {
            let d_ab = ciede2000(lab_of(a), lab_of(b));
            let d_ba = ciede2000(lab_of(b), lab_of(a));
            assert!(
                (d_ab - d_ba).abs() < 1e-12,
                "asymmetric for {a:?}/{b:?}: {d_ab} vs {d_ba}"
            );
        }
    }

    #[test]
    fn test_black_to_white_is_100() {
        // Pure lightness difference: only dL/Sl contributes, Sl = 1 at avgL 50.
        let black = Lab::new(0.0, 0.0, 0.0);
        let white = Lab::new(100.0, 0.0, 0.0);
        let d = ciede2000(black, white);
        assert!((d - 100.0).abs() < 1e-9, "black-white distance = {d}");
    }

    /// Values from the Sharma, Wu & Dalal (2005) reference data set.
    #[test]
    fn test_reference_pairs() {
        let cases = [
            (
                Lab::new(50.0, 2.6772, -79.7751),
                Lab::new(50.0, 0.0, -82.7485),
                2.0425,
            ),
            (
                Lab::new(50.0, 3.1571, -77.2803),
                Lab::new(50.0, 0.0, -82.7485),
                2.8615,
            ),
            (
                Lab::new(50.0, 2.8361, -74.0200),
                Lab::new(50.0, 0.0, -82.7485),
                3.4412,
            ),
        ];
        for (a, b, expected) in cases {
            let d = ciede2000(a, b);
            assert!(
                (d - expected).abs() < 1e-3,
                "expected {expected}, got {d} for {a:?}/{b:?}"
            );
        }
    }

    #[test]
    fn test_gamut_ceiling_not_exceeded_on_extremes() {
        // Opposite gamut corners stay below the documented ceiling.
        let corners = [
            (Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)),
            (Srgb::new(255, 0, 0), Srgb::new(0, 255, 0)),
            (Srgb::new(0, 0, 255), Srgb::new(255, 255, 0)),
            (Srgb::new(0, 255, 0), Srgb::new(255, 0, 255)),
        ];
        for (a, b) in corners {
            let d = ciede2000(lab_of(a), lab_of(b));
            assert!(
                d <= CIEDE2000_SRGB_CEILING + 0.01,
                "{a:?}/{b:?} distance {d} exceeds ceiling"
            );
        }
    }
}
