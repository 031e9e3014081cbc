//! Drude free-electron model and finite-size damping.
//!
//! Conduction electrons in a metal contribute
//! $\epsilon_{\text{free}}(\omega) = 1 - \omega_p^2 / (\omega(\omega + i\gamma))$
//! to the dielectric function. In a particle whose radius approaches the
//! electron mean free path, surface scattering adds a damping term
//! $\hbar v_F / r$, which broadens and damps the plasmon resonance.
//!
//! Parameters are from Rakić *et al.*, *Appl. Opt.* **37**, 5271 (1998);
//! Fermi velocities from Ashcroft & Mermin.

use num_complex::Complex64;

use crate::provider::{check_range, MaterialError, MaterialProvider};

/// Reduced Planck constant in eV·s.
pub const HBAR_EV_S: f64 = 6.582_119_569e-16;

/// Photon energy–wavelength product $hc$ in eV·nm.
pub const HC_EV_NM: f64 = 1239.841_984;

/// Convert a vacuum wavelength in nm to a photon energy in eV.
pub fn wavelength_to_ev(wavelength_nm: f64) -> f64 {
    HC_EV_NM / wavelength_nm
}

/// Free-electron parameters of a metal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrudeParameters {
    /// Plasma energy $\hbar\omega_p$ (eV).
    pub plasma_energy_ev: f64,
    /// Bulk damping $\hbar\gamma$ (eV).
    pub damping_ev: f64,
    /// Fermi velocity (m/s).
    pub fermi_velocity_m_s: f64,
}

impl DrudeParameters {
    pub const SILVER: Self = Self::new(9.01, 0.048, 1.39e6);
    pub const ALUMINIUM: Self = Self::new(14.98, 0.047, 2.03e6);
    pub const GOLD: Self = Self::new(9.03, 0.053, 1.40e6);
    pub const COPPER: Self = Self::new(10.83, 0.030, 1.57e6);

    pub const fn new(plasma_energy_ev: f64, damping_ev: f64, fermi_velocity_m_s: f64) -> Self {
        Self {
            plasma_energy_ev,
            damping_ev,
            fermi_velocity_m_s,
        }
    }

    /// Free-electron susceptibility term $\omega_p^2 / (\omega(\omega + i\gamma))$.
    fn free_electron_term(&self, omega_ev: f64, damping_ev: f64) -> Complex64 {
        let wp2 = self.plasma_energy_ev * self.plasma_energy_ev;
        Complex64::from(wp2) / (omega_ev * Complex64::new(omega_ev, damping_ev))
    }

    /// Drude dielectric function $1 - \omega_p^2 / (\omega(\omega + i\gamma))$.
    pub fn dielectric(&self, wavelength_nm: f64) -> Complex64 {
        let omega = wavelength_to_ev(wavelength_nm);
        Complex64::from(1.0) - self.free_electron_term(omega, self.damping_ev)
    }

    /// Extra damping (eV) from electron scattering at a surface of radius `radius_nm`.
    pub fn surface_damping_ev(&self, radius_nm: f64) -> f64 {
        self.fermi_velocity_m_s * HBAR_EV_S / (radius_nm * 1.0e-9)
    }

    /// Replace bulk damping by bulk plus surface damping in a measured
    /// dielectric function.
    ///
    /// $\epsilon_{\text{corr}} = \epsilon + D(\gamma) - D(\gamma + \hbar v_F / r)$
    /// with $D(\gamma) = \omega_p^2 / (\omega(\omega + i\gamma))$. Materials
    /// with a zero plasma energy are returned unchanged.
    pub fn size_corrected(&self, epsilon: Complex64, wavelength_nm: f64, radius_nm: f64) -> Complex64 {
        if self.plasma_energy_ev == 0.0 {
            return epsilon;
        }
        let omega = wavelength_to_ev(wavelength_nm);
        let bulk = self.free_electron_term(omega, self.damping_ev);
        let confined =
            self.free_electron_term(omega, self.damping_ev + self.surface_damping_ev(radius_nm));
        epsilon + bulk - confined
    }
}

/// A metal described entirely by the Drude model.
pub struct DrudeMaterial {
    name: String,
    parameters: DrudeParameters,
    range_nm: (f64, f64),
}

impl DrudeMaterial {
    pub fn new(name: impl Into<String>, parameters: DrudeParameters, range_nm: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            parameters,
            range_nm,
        }
    }

    /// Aluminium. Its free-electron plasma sits deep in the UV, so a pure
    /// Drude description holds across the 200–1000 nm window apart from the
    /// weak interband feature near 800 nm.
    pub fn aluminium() -> Self {
        Self::new("Al (Drude, Rakić)", DrudeParameters::ALUMINIUM, (100.0, 2000.0))
    }
}

impl MaterialProvider for DrudeMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn wavelength_range(&self) -> (f64, f64) {
        self.range_nm
    }

    fn dielectric_function(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError> {
        check_range(wavelength_nm, self.range_nm)?;
        Ok(self.parameters.dielectric(wavelength_nm))
    }

    fn drude_parameters(&self) -> Option<DrudeParameters> {
        Some(self.parameters)
    }
}
