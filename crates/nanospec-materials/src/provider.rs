//! Material property provider trait.
//!
//! Every optical-constant source implements [`MaterialProvider`], which
//! returns the complex dielectric function $\epsilon(\lambda)$ and, derived
//! from it, the complex refractive index $\tilde{n} = n + ik$.

use num_complex::Complex64;
use thiserror::Error;

use crate::drude::DrudeParameters;

/// Errors from material providers and the material database.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterialError {
    #[error("Wavelength {wavelength_nm} nm is outside the data range [{min}, {max}] nm")]
    OutOfRange {
        wavelength_nm: f64,
        min: f64,
        max: f64,
    },

    #[error("Material not found: {0}")]
    NotFound(String),

    #[error("No material with index {0}")]
    InvalidIndex(usize),
}

/// Provides wavelength-dependent optical constants for one material.
///
/// Implementations include tabulated experimental data (Johnson & Christy,
/// Palik) and analytic dispersion models (Sellmeier, Drude).
pub trait MaterialProvider: Send + Sync {
    /// Human-readable name of this material.
    fn name(&self) -> &str;

    /// Wavelength range over which the data is valid (nm).
    fn wavelength_range(&self) -> (f64, f64);

    /// Complex dielectric function $\epsilon(\lambda)$ at a given wavelength.
    fn dielectric_function(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError>;

    /// Complex refractive index $\tilde{n} = n + ik$ at a given wavelength.
    ///
    /// Default implementation derives from $\epsilon = \tilde{n}^2$.
    fn refractive_index(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError> {
        let eps = self.dielectric_function(wavelength_nm)?;
        Ok(eps.sqrt())
    }

    /// Free-electron parameters used for finite-size damping, if the
    /// material is a metal with a known Drude description.
    fn drude_parameters(&self) -> Option<DrudeParameters> {
        None
    }
}

/// Reject wavelengths outside `(min, max)` with [`MaterialError::OutOfRange`].
pub(crate) fn check_range(wavelength_nm: f64, (min, max): (f64, f64)) -> Result<(), MaterialError> {
    if wavelength_nm < min || wavelength_nm > max || !wavelength_nm.is_finite() {
        return Err(MaterialError::OutOfRange {
            wavelength_nm,
            min,
            max,
        });
    }
    Ok(())
}
