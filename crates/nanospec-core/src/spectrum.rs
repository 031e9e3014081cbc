//! Spectral engine: runs a scattering kernel across the wavelength grid.
//!
//! For every sampled wavelength the engine looks up the optical constants
//! of each shell, optionally adds finite-size damping for free-electron
//! metals, calls the kernel for the particle shape and converts the
//! efficiencies into the requested units. Wavelengths skipped by the
//! sampling increment are filled by linear interpolation; the first and last
//! grid points are always computed.

use std::f64::consts::{LN_10, PI};

use nanospec_materials::{MaterialDatabase, MaterialIndex};

use crate::error::ParticleError;
use crate::solver::{equivalent_radius, kernel_for, LayerStack, ShellLayer};
use crate::types::{wavelengths, Efficiencies, Shape, Spectra, SpectraType, NLAMBDA};

/// Avogadro constant (mol⁻¹).
pub const AVOGADRO: f64 = 6.022_141_292_7e23;

/// nm² per particle → M⁻¹ cm⁻¹: 1e-14 cm²/nm², 1000 cm³/L, decadic log.
pub const MOLAR_SCALE: f64 = 1.0e-14 * AVOGADRO / (1000.0 * LN_10);

/// Layers adding less than this fraction of the particle volume are skipped.
const THIN_LAYER_FRACTION: f64 = 1.0e-12;

/// One layer of the particle as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellSpec {
    /// 1-based layer number, used in error reports.
    pub layer: usize,
    pub material: MaterialIndex,
    /// Outer semi-axes `[z, xy]` in nm.
    pub outer_radius: [f64; 2],
}

/// Everything needed to compute a spectrum, detached from the particle.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumRequest {
    pub shape: Shape,
    /// Layers from the core outwards.
    pub shells: Vec<ShellSpec>,
    pub medium_index: f64,
    pub size_correct: bool,
    pub increment: usize,
    pub spectra_type: SpectraType,
    /// Cuvette path length (cm).
    pub path_length: f64,
    /// Particle concentration (M).
    pub concentration: f64,
}

impl SpectrumRequest {
    /// Radius of the sphere with the particle's volume (nm).
    pub fn equivalent_radius(&self) -> f64 {
        self.shells
            .last()
            .map(|shell| equivalent_radius(shell.outer_radius))
            .unwrap_or(0.0)
    }

    /// Factor taking an efficiency into `spectra_type` units.
    pub fn unit_factor(&self) -> f64 {
        let r = self.equivalent_radius();
        let cross_section = PI * r * r;
        match self.spectra_type {
            SpectraType::Efficiency => 1.0,
            SpectraType::CrossSection => cross_section,
            SpectraType::Molar => cross_section * MOLAR_SCALE,
            SpectraType::Absorption => {
                cross_section * MOLAR_SCALE * self.path_length * self.concentration
            }
        }
    }

    /// Shells that contribute volume. A layer whose relative radius is zero
    /// sits on top of the one beneath it and is dropped.
    fn solid_shells(&self) -> Vec<ShellSpec> {
        let shell_volume = |shell: &ShellSpec| {
            let [z, xy] = shell.outer_radius;
            z * xy * xy
        };
        let total = self.shells.last().map(shell_volume).unwrap_or(0.0);
        let mut inner = 0.0;
        let mut kept = Vec::with_capacity(self.shells.len());
        for shell in &self.shells {
            let volume = shell_volume(shell);
            if volume - inner > THIN_LAYER_FRACTION * total {
                kept.push(*shell);
                inner = volume;
            }
        }
        kept
    }
}

/// Grid indices at which the kernel is evaluated.
pub fn sample_indices(increment: usize) -> Vec<usize> {
    let step = increment.max(1);
    let mut indices: Vec<usize> = (0..NLAMBDA).step_by(step).collect();
    if indices.last() != Some(&(NLAMBDA - 1)) {
        indices.push(NLAMBDA - 1);
    }
    indices
}

/// Computes spectra against a material database.
pub struct SpectralEngine<'a> {
    database: &'a dyn MaterialDatabase,
}

impl<'a> SpectralEngine<'a> {
    pub fn new(database: &'a dyn MaterialDatabase) -> Self {
        Self { database }
    }

    /// All three channels over the full grid, in the requested units.
    pub fn calculate(&self, request: &SpectrumRequest) -> Result<Spectra, ParticleError> {
        let shells = request.solid_shells();
        let kernel = kernel_for(request.shape);
        let indices = sample_indices(request.increment);
        let r_eq = request.equivalent_radius();
        let factor = request.unit_factor();
        let grid = wavelengths();

        log::debug!(
            "{} spectrum ({}): {} of {} wavelengths, {} of {} layers, r_eq = {:.3} nm",
            kernel.method_name(),
            request.spectra_type,
            indices.len(),
            NLAMBDA,
            shells.len(),
            request.shells.len(),
            r_eq
        );

        let mut sampled = Vec::with_capacity(indices.len());
        for &i in &indices {
            let wavelength = grid[i];
            let stack = self.layer_stack(&shells, wavelength, request.size_correct, r_eq)?;
            let q = kernel
                .scatter(&stack, wavelength, request.medium_index)
                .map_err(|source| ParticleError::Kernel {
                    wavelength_nm: wavelength,
                    source,
                })?;
            log::trace!(
                "λ = {} nm: Q_ext = {:.6e}, Q_sca = {:.6e}, Q_abs = {:.6e}",
                wavelength,
                q.extinction,
                q.scattering,
                q.absorption
            );
            sampled.push(q.scaled(factor));
        }

        let channel = |select: fn(&Efficiencies) -> f64| {
            let values: Vec<f64> = sampled.iter().map(select).collect();
            interpolate(&indices, &values)
        };

        Ok(Spectra {
            spectra_type: request.spectra_type,
            extinction: channel(|q| q.extinction),
            scattering: channel(|q| q.scattering),
            absorbance: channel(|q| q.absorption),
        })
    }

    /// Dielectric stack at one wavelength.
    fn layer_stack(
        &self,
        shells: &[ShellSpec],
        wavelength_nm: f64,
        size_correct: bool,
        r_eq: f64,
    ) -> Result<LayerStack, ParticleError> {
        let mut layers = Vec::with_capacity(shells.len());
        for shell in shells {
            let n = self
                .database
                .refractive_index(shell.material, wavelength_nm)
                .map_err(|source| ParticleError::Material { layer: shell.layer, source })?;
            let mut epsilon = n * n;
            if size_correct {
                let drude = self
                    .database
                    .drude_parameters(shell.material)
                    .map_err(|source| ParticleError::Material { layer: shell.layer, source })?;
                if let Some(drude) = drude {
                    epsilon = drude.size_corrected(epsilon, wavelength_nm, r_eq);
                }
            }
            layers.push(ShellLayer {
                epsilon,
                outer_radius: shell.outer_radius,
            });
        }
        Ok(LayerStack::new(layers))
    }
}

/// Expand values known at ascending grid `indices` (first 0, last
/// `NLAMBDA − 1`) onto the full grid by linear interpolation.
fn interpolate(indices: &[usize], values: &[f64]) -> Vec<f64> {
    let mut full = vec![0.0; NLAMBDA];
    for (&i, &v) in indices.iter().zip(values) {
        full[i] = v;
    }
    for (window, pair) in indices.windows(2).zip(values.windows(2)) {
        let (lo, hi) = (window[0], window[1]);
        let (v_lo, v_hi) = (pair[0], pair[1]);
        let span = (hi - lo) as f64;
        for (offset, slot) in full[lo + 1..hi].iter_mut().enumerate() {
            let t = (offset + 1) as f64 / span;
            *slot = v_lo + (v_hi - v_lo) * t;
        }
    }
    full
}
