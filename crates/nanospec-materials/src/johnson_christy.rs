//! Johnson & Christy tabulated optical constants for the noble metals.
//!
//! P. B. Johnson and R. W. Christy, *Phys. Rev. B* **6**, 4370 (1972).
//!
//! The tables are the published $(E, n, k)$ triples at photon energies
//! 0.64–6.60 eV (188–1937 nm). They are embedded at compile time, converted
//! to $\epsilon = (n + ik)^2$ on a wavelength axis, and interpolated with
//! natural cubic splines.

use num_complex::Complex64;

use crate::drude::{DrudeParameters, HC_EV_NM};
use crate::provider::{check_range, MaterialError, MaterialProvider};
use crate::spline::DielectricSpline;

/// Johnson & Christy material with spline-interpolated dielectric function.
pub struct JohnsonChristyMaterial {
    name: String,
    spline: DielectricSpline,
    drude: DrudeParameters,
}

impl JohnsonChristyMaterial {
    /// Construct from a table of `(energy_eV, n, k)` rows in any energy order.
    pub fn from_energy_table(
        name: impl Into<String>,
        table: &[(f64, f64, f64)],
        drude: DrudeParameters,
    ) -> Self {
        let mut rows: Vec<(f64, Complex64)> = table
            .iter()
            .map(|&(ev, n, k)| (HC_EV_NM / ev, Complex64::new(n, k).powu(2)))
            .collect();
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));

        Self {
            name: name.into(),
            spline: DielectricSpline::new(&rows),
            drude,
        }
    }

    /// Silver (Ag).
    pub fn silver() -> Self {
        Self::from_energy_table("Ag (Johnson & Christy)", SILVER, DrudeParameters::SILVER)
    }

    /// Gold (Au).
    pub fn gold() -> Self {
        Self::from_energy_table("Au (Johnson & Christy)", GOLD, DrudeParameters::GOLD)
    }

    /// Copper (Cu).
    pub fn copper() -> Self {
        Self::from_energy_table("Cu (Johnson & Christy)", COPPER, DrudeParameters::COPPER)
    }
}

impl MaterialProvider for JohnsonChristyMaterial {
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

    fn drude_parameters(&self) -> Option<DrudeParameters> {
        Some(self.drude)
    }
}

// (E / eV, n, k)
const SILVER: &[(f64, f64, f64)] = &[
    (0.64, 0.24, 14.08),
    (0.77, 0.15, 11.85),
    (0.89, 0.13, 10.10),
    (1.02, 0.09, 8.828),
    (1.14, 0.04, 7.795),
    (1.26, 0.04, 6.992),
    (1.39, 0.04, 6.312),
    (1.51, 0.04, 5.727),
    (1.64, 0.03, 5.242),
    (1.76, 0.04, 4.838),
    (1.88, 0.05, 4.483),
    (2.01, 0.06, 4.152),
    (2.13, 0.05, 3.858),
    (2.26, 0.06, 3.586),
    (2.38, 0.05, 3.324),
    (2.50, 0.05, 3.093),
    (2.63, 0.05, 2.869),
    (2.75, 0.04, 2.657),
    (2.88, 0.04, 2.462),
    (3.00, 0.05, 2.275),
    (3.12, 0.05, 2.070),
    (3.25, 0.05, 1.864),
    (3.37, 0.07, 1.657),
    (3.50, 0.10, 1.419),
    (3.62, 0.14, 1.142),
    (3.74, 0.17, 0.829),
    (3.87, 0.81, 0.392),
    (3.99, 1.13, 0.616),
    (4.12, 1.34, 0.964),
    (4.24, 1.39, 1.161),
    (4.36, 1.41, 1.264),
    (4.49, 1.41, 1.331),
    (4.61, 1.38, 1.372),
    (4.74, 1.35, 1.387),
    (4.86, 1.33, 1.393),
    (4.98, 1.31, 1.389),
    (5.11, 1.30, 1.378),
    (5.23, 1.28, 1.367),
    (5.36, 1.28, 1.357),
    (5.48, 1.26, 1.344),
    (5.60, 1.25, 1.342),
    (5.73, 1.22, 1.336),
    (5.85, 1.20, 1.325),
    (5.98, 1.18, 1.312),
    (6.10, 1.15, 1.296),
    (6.22, 1.14, 1.277),
    (6.35, 1.12, 1.255),
    (6.47, 1.10, 1.232),
    (6.60, 1.07, 1.212),
];

const GOLD: &[(f64, f64, f64)] = &[
    (0.64, 0.92, 13.78),
    (0.77, 0.56, 11.21),
    (0.89, 0.43, 9.519),
    (1.02, 0.35, 8.145),
    (1.14, 0.27, 7.150),
    (1.26, 0.22, 6.350),
    (1.39, 0.17, 5.663),
    (1.51, 0.16, 5.083),
    (1.64, 0.14, 4.542),
    (1.76, 0.13, 4.103),
    (1.88, 0.14, 3.697),
    (2.01, 0.21, 3.272),
    (2.13, 0.29, 2.863),
    (2.26, 0.43, 2.455),
    (2.38, 0.62, 2.081),
    (2.50, 1.04, 1.833),
    (2.63, 1.31, 1.849),
    (2.75, 1.38, 1.914),
    (2.88, 1.45, 1.948),
    (3.00, 1.46, 1.958),
    (3.12, 1.47, 1.952),
    (3.25, 1.46, 1.933),
    (3.37, 1.48, 1.895),
    (3.50, 1.50, 1.866),
    (3.62, 1.48, 1.871),
    (3.74, 1.48, 1.883),
    (3.87, 1.54, 1.898),
    (3.99, 1.53, 1.893),
    (4.12, 1.53, 1.889),
    (4.24, 1.49, 1.878),
    (4.36, 1.47, 1.869),
    (4.49, 1.43, 1.847),
    (4.61, 1.38, 1.803),
    (4.74, 1.35, 1.749),
    (4.86, 1.33, 1.688),
    (4.98, 1.33, 1.631),
    (5.11, 1.32, 1.577),
    (5.23, 1.32, 1.536),
    (5.36, 1.30, 1.497),
    (5.48, 1.31, 1.460),
    (5.60, 1.30, 1.427),
    (5.73, 1.30, 1.387),
    (5.85, 1.30, 1.350),
    (5.98, 1.30, 1.304),
    (6.10, 1.33, 1.277),
    (6.22, 1.33, 1.251),
    (6.35, 1.34, 1.226),
    (6.47, 1.32, 1.203),
    (6.60, 1.28, 1.188),
];

const COPPER: &[(f64, f64, f64)] = &[
    (0.64, 1.09, 13.43),
    (0.77, 0.76, 11.12),
    (0.89, 0.60, 9.439),
    (1.02, 0.48, 8.245),
    (1.14, 0.36, 7.217),
    (1.26, 0.32, 6.421),
    (1.39, 0.30, 5.768),
    (1.51, 0.26, 5.180),
    (1.64, 0.24, 4.665),
    (1.76, 0.21, 4.205),
    (1.88, 0.22, 3.747),
    (2.01, 0.30, 3.205),
    (2.13, 0.70, 2.704),
    (2.26, 1.02, 2.577),
    (2.38, 1.18, 2.608),
    (2.50, 1.22, 2.564),
    (2.63, 1.25, 2.483),
    (2.75, 1.24, 2.397),
    (2.88, 1.25, 2.305),
    (3.00, 1.28, 2.207),
    (3.12, 1.32, 2.116),
    (3.25, 1.33, 2.045),
    (3.37, 1.36, 1.975),
    (3.50, 1.37, 1.916),
    (3.62, 1.36, 1.864),
    (3.74, 1.34, 1.821),
    (3.87, 1.38, 1.783),
    (3.99, 1.38, 1.729),
    (4.12, 1.40, 1.679),
    (4.24, 1.42, 1.633),
    (4.36, 1.45, 1.633),
    (4.49, 1.46, 1.646),
    (4.61, 1.45, 1.668),
    (4.74, 1.41, 1.691),
    (4.86, 1.41, 1.741),
    (4.98, 1.37, 1.783),
    (5.11, 1.34, 1.799),
    (5.23, 1.28, 1.802),
    (5.36, 1.23, 1.792),
    (5.48, 1.18, 1.768),
    (5.60, 1.13, 1.737),
    (5.73, 1.08, 1.699),
    (5.85, 1.04, 1.651),
    (5.98, 1.01, 1.599),
    (6.10, 0.99, 1.550),
    (6.22, 0.98, 1.493),
    (6.35, 0.97, 1.440),
    (6.47, 0.95, 1.388),
    (6.60, 0.94, 1.337),
];
