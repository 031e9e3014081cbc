//! Quasistatic (Gans) theory for confocal spheroidal shells.
//!
//! The particle is a spheroid with semi-axis `z` along the symmetry axis and
//! two equal semi-axes `xy`. In the electrostatic limit each axis responds
//! independently through its depolarisation factor $L$. A core inside a
//! shell is replaced by an effective dielectric,
//!
//! $$\epsilon_{\text{eff}} = \epsilon_2 + \frac{f \epsilon_2 (\epsilon_1 - \epsilon_2)}
//! {\epsilon_2 + (\epsilon_1 - \epsilon_2)(L_1 - f L_2)}$$
//!
//! with $f = V_1/V_2$, folding the stack from the core outwards. The
//! orientation-averaged efficiencies of the volume-equivalent sphere follow
//! from the normalised polarisabilities of the outer surface.
//!
//! The approximation degrades quickly once the particle is no longer small
//! compared with the wavelength; size parameters above
//! [`SIZE_LIMIT`] are rejected.

use std::f64::consts::PI;

use num_complex::Complex64;

use super::{
    check_finite, equivalent_radius, size_parameter, KernelError, LayerStack, ScatteringKernel,
    MIN_SIZE_PARAMETER,
};
use crate::types::Efficiencies;

/// Size parameters beyond this are rejected.
pub const SIZE_LIMIT: f64 = 3.5;

/// Size parameters beyond this log an accuracy warning.
pub const SIZE_WARNING: f64 = 3.0;

/// Eccentricities squared below this use the series expansion.
const NEAR_SPHERE: f64 = 1.0e-6;

/// Quasistatic solution for confocal spheroidal shells.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuasistaticKernel;

impl ScatteringKernel for QuasistaticKernel {
    fn scatter(
        &self,
        stack: &LayerStack,
        wavelength_nm: f64,
        medium_index: f64,
    ) -> Result<Efficiencies, KernelError> {
        let outer = stack.outermost()?;
        let x = size_parameter(equivalent_radius(outer.outer_radius), wavelength_nm, medium_index);
        if x < MIN_SIZE_PARAMETER {
            return Ok(Efficiencies::default());
        }
        if x > SIZE_LIMIT {
            return Err(KernelError::SizeLimit {
                size_parameter: x,
                limit: SIZE_LIMIT,
            });
        }
        if x > SIZE_WARNING {
            log::warn!(
                "Quasistatic size parameter {:.3} at {} nm is beyond {}; results are approximate",
                x,
                wavelength_nm,
                SIZE_WARNING
            );
        }

        let eps_medium = medium_index * medium_index;
        let z = axis_polarisability(stack, eps_medium, Axis::Z);
        let xy = axis_polarisability(stack, eps_medium, Axis::Xy);
        let mean = (z + 2.0 * xy) / 3.0;

        let absorption = 4.0 * x * mean.im;
        let scattering = 8.0 / 3.0 * x.powi(4) * mean.norm_sqr();
        check_finite(Efficiencies::new(absorption + scattering, scattering))
    }

    fn method_name(&self) -> &str {
        "Quasistatic (Gans)"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Z,
    Xy,
}

/// Polarisability along `axis`, normalised to $3V$:
/// $(\epsilon_{\text{eff}} - \epsilon_m) / (3(\epsilon_m + L(\epsilon_{\text{eff}} - \epsilon_m)))$.
fn axis_polarisability(stack: &LayerStack, eps_medium: f64, axis: Axis) -> Complex64 {
    let mut layers = stack.layers.iter();
    let Some(core) = layers.next() else {
        return Complex64::default();
    };

    let mut eps_eff = core.epsilon;
    let mut inner_l = depolarisation(core.outer_radius).get(axis);
    let mut inner_volume = volume(core.outer_radius);

    for shell in layers {
        let outer_l = depolarisation(shell.outer_radius).get(axis);
        let outer_volume = volume(shell.outer_radius);
        let f = inner_volume / outer_volume;
        let eps2 = shell.epsilon;
        let diff = eps_eff - eps2;
        eps_eff = eps2 + f * eps2 * diff / (eps2 + diff * (inner_l - f * outer_l));
        inner_l = outer_l;
        inner_volume = outer_volume;
    }

    let contrast = eps_eff - eps_medium;
    contrast / (3.0 * (eps_medium + inner_l * contrast))
}

fn volume([z, xy]: [f64; 2]) -> f64 {
    4.0 / 3.0 * PI * z * xy * xy
}

/// Depolarisation factors of a spheroid along its symmetry axis and
/// perpendicular to it. They sum to one: `z + 2·xy = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Depolarisation {
    pub z: f64,
    pub xy: f64,
}

impl Depolarisation {
    fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Z => self.z,
            Axis::Xy => self.xy,
        }
    }
}

/// Depolarisation factors for semi-axes `[z, xy]` (Bohren & Huffman §5.3).
pub fn depolarisation([z, xy]: [f64; 2]) -> Depolarisation {
    if z > xy {
        // Prolate: long axis along z.
        let e2 = 1.0 - (xy / z).powi(2);
        let lz = if e2 < NEAR_SPHERE {
            1.0 / 3.0 - 2.0 * e2 / 15.0
        } else {
            let e = e2.sqrt();
            (1.0 - e2) / e2 * (-1.0 + ((1.0 + e) / (1.0 - e)).ln() / (2.0 * e))
        };
        Depolarisation {
            z: lz,
            xy: (1.0 - lz) / 2.0,
        }
    } else if z < xy {
        // Oblate: short axis along z.
        let e2 = 1.0 - (z / xy).powi(2);
        let lz = if e2 < NEAR_SPHERE {
            1.0 / 3.0 + 2.0 * e2 / 15.0
        } else {
            let g = ((1.0 - e2) / e2).sqrt();
            // π/2 − atan(g) = atan(1/g)
            let lxy = g / (2.0 * e2) * g.recip().atan() - g * g / 2.0;
            1.0 - 2.0 * lxy
        };
        Depolarisation {
            z: lz,
            xy: (1.0 - lz) / 2.0,
        }
    } else {
        Depolarisation {
            z: 1.0 / 3.0,
            xy: 1.0 / 3.0,
        }
    }
}
