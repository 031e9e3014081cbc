//! Scattering kernels.
//!
//! The [`ScatteringKernel`] trait defines the interface every method
//! implements: given a layered dielectric stack, a vacuum wavelength and the
//! refractive index of the medium, return extinction, scattering and
//! absorption efficiencies. Kernels are stateless; [`kernel_for`] picks the
//! one that matches a particle shape.
//!
//! - [`mie::MieKernel`]: exact multilayer Mie theory for concentric spheres.
//! - [`quasistatic::QuasistaticKernel`]: Gans theory for confocal spheroids.

pub mod mie;
pub mod quasistatic;

use std::f64::consts::PI;

use num_complex::Complex64;
use thiserror::Error;

use crate::types::{Efficiencies, Shape};

pub use mie::{MieEfficiencies, MieKernel};
pub use quasistatic::QuasistaticKernel;

/// Size parameters below this give zero efficiencies.
pub const MIN_SIZE_PARAMETER: f64 = 1.0e-7;

/// Errors that can occur inside a kernel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    #[error("Layer stack is empty")]
    EmptyStack,

    #[error("Mie recursion unstable at boundary {boundary}: Im(m)·x = {value:.2} exceeds 20")]
    Unstable { boundary: usize, value: f64 },

    #[error("Size parameter {size_parameter:.3} exceeds the quasistatic limit {limit}")]
    SizeLimit { size_parameter: f64, limit: f64 },

    #[error("Kernel produced a non-finite {0}")]
    NonFinite(&'static str),
}

/// One shell of a layered particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellLayer {
    /// Complex dielectric function of the shell material.
    pub epsilon: Complex64,
    /// Outer semi-axes `[z, xy]` in nm. Equal for a sphere.
    pub outer_radius: [f64; 2],
}

/// Shells ordered from the core outwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerStack {
    pub layers: Vec<ShellLayer>,
}

impl LayerStack {
    pub fn new(layers: Vec<ShellLayer>) -> Self {
        Self { layers }
    }

    /// Homogeneous sphere of radius `radius_nm`.
    pub fn sphere(epsilon: Complex64, radius_nm: f64) -> Self {
        Self::new(vec![ShellLayer {
            epsilon,
            outer_radius: [radius_nm, radius_nm],
        }])
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn outermost(&self) -> Result<&ShellLayer, KernelError> {
        self.layers.last().ok_or(KernelError::EmptyStack)
    }

    /// Radius of the sphere with the same volume as the whole particle.
    pub fn equivalent_radius(&self) -> f64 {
        self.layers
            .last()
            .map(|layer| equivalent_radius(layer.outer_radius))
            .unwrap_or(0.0)
    }
}

/// Radius of the sphere with the same volume as a spheroid with semi-axes
/// `[z, xy]`.
pub fn equivalent_radius([z, xy]: [f64; 2]) -> f64 {
    (z * xy * xy).cbrt()
}

/// Size parameter $x = 2\pi n_m r / \lambda$.
pub fn size_parameter(radius_nm: f64, wavelength_nm: f64, medium_index: f64) -> f64 {
    2.0 * PI * radius_nm * medium_index / wavelength_nm
}

/// The core trait that all scattering methods implement.
pub trait ScatteringKernel: Send + Sync {
    /// Efficiencies of `stack` at `wavelength_nm` in a medium of refractive
    /// index `medium_index`, normalised to the geometric cross-section of the
    /// volume-equivalent sphere.
    fn scatter(
        &self,
        stack: &LayerStack,
        wavelength_nm: f64,
        medium_index: f64,
    ) -> Result<Efficiencies, KernelError>;

    /// Human-readable name of the method.
    fn method_name(&self) -> &str;
}

/// Kernel for particles of `shape`.
pub fn kernel_for(shape: Shape) -> &'static dyn ScatteringKernel {
    static MIE: MieKernel = MieKernel;
    static QUASISTATIC: QuasistaticKernel = QuasistaticKernel;
    match shape {
        Shape::Sphere => &MIE,
        Shape::Ellipsoid => &QUASISTATIC,
    }
}

fn check_finite(q: Efficiencies) -> Result<Efficiencies, KernelError> {
    if !q.extinction.is_finite() {
        return Err(KernelError::NonFinite("extinction"));
    }
    if !q.scattering.is_finite() {
        return Err(KernelError::NonFinite("scattering"));
    }
    Ok(q)
}
