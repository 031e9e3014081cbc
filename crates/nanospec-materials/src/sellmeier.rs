//! Sellmeier dispersion for transparent dielectrics.
//!
//! $n^2(\lambda) = 1 + \sum_i B_i \lambda^2 / (\lambda^2 - C_i)$ with
//! $\lambda$ in µm. These materials are lossless ($k = 0$) over the
//! 200–1000 nm window.

use num_complex::Complex64;

use crate::provider::{check_range, MaterialError, MaterialProvider};

/// A three-term Sellmeier dielectric.
pub struct SellmeierMaterial {
    name: String,
    /// Oscillator strengths $B_i$.
    b: [f64; 3],
    /// Resonance wavelengths squared $C_i$ (µm²).
    c: [f64; 3],
    range_nm: (f64, f64),
}

impl SellmeierMaterial {
    pub fn new(name: impl Into<String>, b: [f64; 3], c: [f64; 3], range_nm: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            b,
            c,
            range_nm,
        }
    }

    /// Fused silica, I. H. Malitson, *J. Opt. Soc. Am.* **55**, 1205 (1965).
    pub fn fused_silica() -> Self {
        Self::new(
            "SiO₂ (fused silica, Malitson)",
            [0.696_166_3, 0.407_942_6, 0.897_479_4],
            [0.068_404_3_f64.powi(2), 0.116_241_4_f64.powi(2), 9.896_161_f64.powi(2)],
            (180.0, 3000.0),
        )
    }

    /// Borosilicate crown glass (Schott N-BK7).
    pub fn bk7() -> Self {
        Self::new(
            "N-BK7 glass (Schott)",
            [1.039_612_12, 0.231_792_344, 1.010_469_45],
            [0.006_000_698_67, 0.020_017_914_4, 103.560_653],
            (200.0, 2500.0),
        )
    }

    fn index_squared(&self, wavelength_nm: f64) -> f64 {
        let l2 = (wavelength_nm * 1.0e-3).powi(2);
        1.0 + self
            .b
            .iter()
            .zip(self.c.iter())
            .map(|(b, c)| b * l2 / (l2 - c))
            .sum::<f64>()
    }
}

impl MaterialProvider for SellmeierMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn wavelength_range(&self) -> (f64, f64) {
        self.range_nm
    }

    fn dielectric_function(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError> {
        check_range(wavelength_nm, self.range_nm)?;
        Ok(Complex64::new(self.index_squared(wavelength_nm), 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fused_silica_sodium_d_line() {
        let silica = SellmeierMaterial::fused_silica();
        let n = silica.refractive_index(589.3).unwrap();
        assert_abs_diff_eq!(n.re, 1.4585, epsilon = 1e-3);
        assert_eq!(n.im, 0.0);
    }

    #[test]
    fn test_bk7_sodium_d_line() {
        let glass = SellmeierMaterial::bk7();
        let n = glass.refractive_index(587.6).unwrap();
        assert_abs_diff_eq!(n.re, 1.5168, epsilon = 1e-3);
    }

    #[test]
    fn test_normal_dispersion() {
        let silica = SellmeierMaterial::fused_silica();
        let blue = silica.refractive_index(400.0).unwrap().re;
        let red = silica.refractive_index(700.0).unwrap().re;
        assert!(blue > red);
    }
}
