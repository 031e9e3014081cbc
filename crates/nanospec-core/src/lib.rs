//! # NanoSpec Core
//!
//! Optical spectra and perceived colour of layered (core-shell)
//! nanoparticles. A [`Particle`](particle::Particle) holds a validated
//! configuration; [`calculate_spectrum`](particle::Particle::calculate_spectrum)
//! runs the matching scattering kernel across a fixed 200–999 nm grid and the
//! result can be read back as a spectrum or as an RGB/HSV colour.
//!
//! ## Architecture
//!
//! Kernels implement the [`solver::ScatteringKernel`] trait and are chosen by
//! particle shape: multilayer Mie theory for spheres and the quasistatic
//! (Gans) approximation for spheroids. Optical constants come from any
//! [`MaterialDatabase`](nanospec_materials::MaterialDatabase).
//!
//! ## Modules
//!
//! - [`types`]: wavelength grid, enumerations, efficiency and spectrum containers.
//! - [`geometry`]: relative layer radii that always sum to one.
//! - [`particle`]: the validated particle configuration and its results.
//! - [`solver`]: scattering kernels (Mie, quasistatic).
//! - [`spectrum`]: sampling, unit conversion and interpolation over the grid.
//! - [`color`]: CIE 1931 colour derivation.
//! - [`error`]: error types.
//!
//! ## Example
//!
//! ```no_run
//! use nanospec_core::particle::Particle;
//! use nanospec_core::types::SpectraProperty;
//!
//! let mut particle = Particle::new();
//! particle.set_n_layers(2)?;
//! particle.set_layer_material(1, "Au")?;
//! particle.set_sphere_layer_relative_radius(1, 0.6)?;
//! particle.calculate_spectrum()?;
//! let extinction = particle.channel(SpectraProperty::Extinction)?;
//! println!("{} points, colour {}", extinction.len(), particle.rgb()?.to_hex());
//! # Ok::<(), nanospec_core::error::ParticleError>(())
//! ```

pub mod color;
pub mod error;
pub mod geometry;
pub mod particle;
pub mod solver;
pub mod spectrum;
pub mod types;

pub use error::{ErrorKind, ParticleError};
pub use particle::Particle;
pub use types::{ColorMode, Shape, SpectraProperty, SpectraType, NLAMBDA};
