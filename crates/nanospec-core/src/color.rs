//! Colour derivation: spectrum → CIE XYZ → sRGB → HSV.
//!
//! The stimulus is weighted by the CIE 1931 2° colour-matching functions
//! under illuminant D65. Both are tabulated every 10 nm between 380 and
//! 780 nm and linearly interpolated onto the wavelength grid; outside that
//! window they are zero. Tristimulus values are normalised by
//! $\sum \bar{y} D_{65}$, so a unit stimulus lands on the D65 white point and
//! maps to sRGB (1, 1, 1).

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::types::{wavelengths, ColorMode, NLAMBDA};

/// First tabulated wavelength (nm).
const CIE_START_NM: f64 = 380.0;
/// Tabulation step (nm).
const CIE_STEP_NM: f64 = 10.0;

/// XYZ → linear sRGB (D65).
const XYZ_TO_SRGB: [[f64; 3]; 3] = [
    [3.240_454_2, -1.537_138_5, -0.498_531_4],
    [-0.969_266_0, 1.876_010_8, 0.041_556_0],
    [0.055_643_4, -0.204_025_9, 1.057_225_2],
];

/// Display RGB, each component in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Hue in degrees [0, 360), saturation and value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl Rgb {
    pub fn to_hsv(self) -> Hsv {
        let Rgb { r, g, b } = self;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        if max == 0.0 {
            return Hsv::default();
        }
        let saturation = delta / max;
        if delta == 0.0 {
            return Hsv {
                hue: 0.0,
                saturation,
                value: max,
            };
        }

        let sector = if r == max {
            (g - b) / delta
        } else if g == max {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        let mut hue = sector * 60.0;
        if hue < 0.0 {
            hue += 360.0;
        }
        if hue >= 360.0 {
            hue = 0.0;
        }

        Hsv {
            hue,
            saturation,
            value: max,
        }
    }

    /// `#rrggbb` hex code.
    pub fn to_hex(self) -> String {
        let byte = |c: f64| (c * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

/// Colour-matching functions times D65 on the wavelength grid.
struct Observer {
    weights: [Vec<f64>; 3],
    y_norm: f64,
}

fn observer() -> &'static Observer {
    static OBSERVER: OnceLock<Observer> = OnceLock::new();
    OBSERVER.get_or_init(|| {
        let mut weights = [vec![0.0; NLAMBDA], vec![0.0; NLAMBDA], vec![0.0; NLAMBDA]];
        for (i, &wl) in wavelengths().iter().enumerate() {
            let d65 = tabulated(&D65, wl);
            for (channel, table) in [&CIE_X, &CIE_Y, &CIE_Z].into_iter().enumerate() {
                weights[channel][i] = tabulated(table, wl) * d65;
            }
        }
        let y_norm = weights[1].iter().sum();
        Observer { weights, y_norm }
    })
}

/// Linear interpolation in a 10 nm table starting at 380 nm; zero outside.
fn tabulated(table: &[f64; 41], wavelength_nm: f64) -> f64 {
    let position = (wavelength_nm - CIE_START_NM) / CIE_STEP_NM;
    if position < 0.0 || position > (table.len() - 1) as f64 {
        return 0.0;
    }
    let lo = position.floor() as usize;
    if lo == table.len() - 1 {
        return table[lo];
    }
    let t = position - lo as f64;
    table[lo] + (table[lo + 1] - table[lo]) * t
}

/// Stimulus for `spectrum` under `mode`. Absorbed light keeps its magnitude,
/// so a stronger absorber gives a brighter colour.
fn stimulus(spectrum: &[f64], mode: ColorMode) -> Vec<f64> {
    match mode {
        ColorMode::Absorbed => spectrum.iter().map(|&v| v.max(0.0)).collect(),
        ColorMode::Transmitted => spectrum.iter().map(|v| 10f64.powf(-v)).collect(),
    }
}

/// CIE XYZ of `spectrum` (800 points on the grid).
pub fn tristimulus(spectrum: &[f64], mode: ColorMode) -> [f64; 3] {
    let observer = observer();
    let stimulus = stimulus(spectrum, mode);
    let mut xyz = [0.0; 3];
    for (component, weights) in xyz.iter_mut().zip(&observer.weights) {
        let sum: f64 = weights.iter().zip(&stimulus).map(|(w, s)| w * s).sum();
        *component = sum / observer.y_norm;
    }
    xyz
}

/// sRGB transfer function.
fn gamma_encode(linear: f64) -> f64 {
    if linear > 0.003_130_8 {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * linear
    }
}

fn clamp_unit(c: f64) -> f64 {
    if c.is_nan() {
        0.0
    } else {
        c.clamp(0.0, 1.0)
    }
}

/// Display RGB for XYZ values.
pub fn xyz_to_rgb(xyz: [f64; 3]) -> Rgb {
    let [r, g, b] = XYZ_TO_SRGB.map(|row| {
        let linear: f64 = row.iter().zip(&xyz).map(|(m, c)| m * c).sum();
        clamp_unit(gamma_encode(clamp_unit(linear)))
    });
    Rgb { r, g, b }
}

/// Display RGB of `spectrum`.
pub fn spectrum_to_rgb(spectrum: &[f64], mode: ColorMode) -> Rgb {
    xyz_to_rgb(tristimulus(spectrum, mode))
}

// CIE 1931 2° standard observer, 380–780 nm every 10 nm.
#[rustfmt::skip]
const CIE_X: [f64; 41] = [
    0.001368, 0.004243, 0.014310, 0.043510, 0.134380, 0.283900, 0.348280, 0.336200,
    0.290800, 0.195360, 0.095640, 0.032010, 0.004900, 0.009300, 0.063270, 0.165500,
    0.290400, 0.433450, 0.594500, 0.762100, 0.916300, 1.026300, 1.062200, 1.002600,
    0.854450, 0.642400, 0.447900, 0.283500, 0.164900, 0.087400, 0.046770, 0.022700,
    0.011359, 0.005790, 0.002899, 0.001440, 0.000690, 0.000332, 0.000166, 0.000083,
    0.000042,
];

#[rustfmt::skip]
const CIE_Y: [f64; 41] = [
    0.000039, 0.000120, 0.000396, 0.001210, 0.004000, 0.011600, 0.023000, 0.038000,
    0.060000, 0.090980, 0.139020, 0.208020, 0.323000, 0.503000, 0.710000, 0.862000,
    0.954000, 0.994950, 0.995000, 0.952000, 0.870000, 0.757000, 0.631000, 0.503000,
    0.381000, 0.265000, 0.175000, 0.107000, 0.061000, 0.032000, 0.017000, 0.008210,
    0.004102, 0.002091, 0.001047, 0.000520, 0.000249, 0.000120, 0.000060, 0.000030,
    0.000015,
];

#[rustfmt::skip]
const CIE_Z: [f64; 41] = [
    0.006450, 0.020050, 0.067850, 0.207400, 0.645600, 1.385600, 1.747060, 1.772110,
    1.669200, 1.287640, 0.812950, 0.465180, 0.272000, 0.158200, 0.078250, 0.042160,
    0.020300, 0.008750, 0.003900, 0.002100, 0.001650, 0.001100, 0.000800, 0.000340,
    0.000190, 0.000050, 0.000020, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000,
    0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000,
    0.000000,
];

// CIE standard illuminant D65, relative spectral power.
#[rustfmt::skip]
const D65: [f64; 41] = [
    49.9755, 54.6482, 82.7549, 91.4860, 93.4318, 86.6823, 104.865, 117.008,
    117.812, 114.861, 115.923, 108.811, 109.354, 107.802, 104.790, 107.689,
    104.405, 104.046, 100.000, 96.3342, 95.7880, 88.6856, 90.0062, 89.5991,
    87.6987, 83.2886, 83.6992, 80.0268, 80.2146, 82.2778, 78.2842, 69.7213,
    71.6091, 74.3490, 61.6040, 69.8856, 75.0870, 63.5927, 46.4182, 66.8054,
    63.3828,
];
