//! Palik handbook data for rutile TiO₂.
//!
//! E. D. Palik, *Handbook of Optical Constants of Solids* (Academic Press, 1985).
//!
//! Tabulated $(n, k)$ values are converted to $\epsilon = (n + ik)^2$ and
//! interpolated with a natural cubic spline.

use num_complex::Complex64;

use crate::provider::{check_range, MaterialError, MaterialProvider};
use crate::spline::DielectricSpline;

/// Palik handbook material with spline-interpolated dielectric function.
pub struct PalikMaterial {
    name: String,
    spline: DielectricSpline,
}

impl PalikMaterial {
    /// Construct from `(wavelength_nm, n, k)` rows sorted by wavelength.
    pub fn from_nk_table(name: impl Into<String>, table: &[(f64, f64, f64)]) -> Self {
        Self {
            name: name.into(),
            spline: DielectricSpline::from_nk(table),
        }
    }

    /// Rutile TiO₂ (ordinary ray), 200–1000 nm.
    ///
    /// A high-index dielectric (n ≈ 2.5–2.7 in the visible) with its
    /// absorption edge near 380 nm; below 300 nm the interband region gives
    /// k > 1.
    pub fn tio2() -> Self {
        Self::from_nk_table("TiO₂ (Palik)", TIO2_RUTILE)
    }
}

impl MaterialProvider for PalikMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn wavelength_range(&self) -> (f64, f64) {
        self.spline.domain()
    }

    fn dielectric_function(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError> {
        check_range(wavelength_nm, self.wavelength_range())?;
        Ok(self.spline.evaluate(wavelength_nm))
    }
}

// (λ/nm, n, k)
const TIO2_RUTILE: &[(f64, f64, f64)] = &[
    (200.0, 1.900, 1.400),
    (210.0, 2.000, 1.500),
    (220.0, 2.150, 1.600),
    (230.0, 2.300, 1.700),
    (240.0, 2.450, 1.750),
    (250.0, 2.650, 1.750),
    (260.0, 2.850, 1.700),
    (270.0, 3.050, 1.600),
    (280.0, 3.250, 1.400),
    (290.0, 3.350, 1.150),
    (300.0, 3.340, 0.880),
    (310.0, 3.140, 0.660),
    (320.0, 2.990, 0.480),
    (330.0, 2.870, 0.330),
    (340.0, 2.780, 0.220),
    (350.0, 2.720, 0.140),
    (360.0, 2.680, 0.080),
    (370.0, 2.655, 0.040),
    (380.0, 2.640, 0.018),
    (390.0, 2.629, 0.008),
    (400.0, 2.620, 0.003),
    (420.0, 2.607, 0.001),
    (440.0, 2.596, 0.000),
    (460.0, 2.587, 0.000),
    (480.0, 2.579, 0.000),
    (500.0, 2.572, 0.000),
    (520.0, 2.566, 0.000),
    (540.0, 2.560, 0.000),
    (560.0, 2.555, 0.000),
    (580.0, 2.551, 0.000),
    (600.0, 2.547, 0.000),
    (620.0, 2.543, 0.000),
    (640.0, 2.540, 0.000),
    (660.0, 2.537, 0.000),
    (680.0, 2.534, 0.000),
    (700.0, 2.531, 0.000),
    (720.0, 2.529, 0.000),
    (740.0, 2.527, 0.000),
    (760.0, 2.525, 0.000),
    (780.0, 2.523, 0.000),
    (800.0, 2.521, 0.000),
    (820.0, 2.519, 0.000),
    (840.0, 2.518, 0.000),
    (860.0, 2.516, 0.000),
    (880.0, 2.515, 0.000),
    (900.0, 2.513, 0.000),
    (920.0, 2.512, 0.000),
    (940.0, 2.511, 0.000),
    (960.0, 2.510, 0.000),
    (980.0, 2.508, 0.000),
    (1000.0, 2.507, 0.000),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tio2_high_index_in_visible() {
        let tio2 = PalikMaterial::tio2();
        let n = tio2.refractive_index(550.0).unwrap();
        assert!(n.re > 2.5 && n.re < 2.6, "TiO₂ n(550) = {}", n.re);
        assert!(n.im.abs() < 1e-3);
    }

    #[test]
    fn test_tio2_absorbs_in_ultraviolet() {
        let tio2 = PalikMaterial::tio2();
        let eps = tio2.dielectric_function(250.0).unwrap();
        assert!(eps.im > 5.0, "TiO₂ ε₂(250) = {}", eps.im);
    }

    #[test]
    fn test_tio2_never_reports_gain() {
        // The spline must not ring below zero across the transparent region.
        let tio2 = PalikMaterial::tio2();
        for wl in (400..=1000).step_by(7) {
            let eps = tio2.dielectric_function(wl as f64).unwrap();
            assert!(eps.im >= 0.0, "ε₂({}) = {}", wl, eps.im);
        }
    }
}
