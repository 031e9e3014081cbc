//! Core types shared across the NanoSpec crates.
//!
//! This module defines the wavelength grid, the closed enumerations that
//! select particle shape and spectral units, and the containers that carry
//! efficiencies and spectra between the kernels, the spectral engine and the
//! colour pipeline.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ParticleError;

/// Number of points on the wavelength grid.
pub const NLAMBDA: usize = 800;

/// Maximum number of layers in a particle.
pub const MAX_LAYERS: usize = 10;

/// First grid wavelength (nm).
pub const WAVELENGTH_START_NM: f64 = 200.0;

/// Grid spacing (nm).
pub const WAVELENGTH_STEP_NM: f64 = 1.0;

/// The fixed wavelength grid, 200–999 nm in 1 nm steps.
pub fn wavelengths() -> &'static [f64; NLAMBDA] {
    static GRID: OnceLock<[f64; NLAMBDA]> = OnceLock::new();
    GRID.get_or_init(|| {
        let mut grid = [0.0; NLAMBDA];
        for (i, wl) in grid.iter_mut().enumerate() {
            *wl = WAVELENGTH_START_NM + WAVELENGTH_STEP_NM * i as f64;
        }
        grid
    })
}

/// Particle geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Concentric spherical shells, solved with multilayer Mie theory.
    #[default]
    Sphere = 0,
    /// Confocal spheroidal shells with z as the symmetry axis, solved in the
    /// quasistatic (Gans) limit.
    Ellipsoid = 1,
}

/// Units in which a spectrum is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectraType {
    /// Dimensionless efficiency Q = C / (π r²).
    #[default]
    Efficiency = 0,
    /// Cross-section C (nm²).
    CrossSection = 1,
    /// Molar coefficient (M⁻¹ cm⁻¹).
    Molar = 2,
    /// Decadic absorbance for the configured path length and concentration.
    Absorption = 3,
}

/// Physical channel of the spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectraProperty {
    /// Total loss, absorption plus scattering.
    Extinction = 0,
    /// Absorbed part only, extinction minus scattering.
    #[default]
    Absorbance = 1,
    /// Scattered part only.
    Scattering = 2,
}

impl SpectraProperty {
    pub const ALL: [SpectraProperty; 3] = [
        SpectraProperty::Extinction,
        SpectraProperty::Absorbance,
        SpectraProperty::Scattering,
    ];
}

/// How a spectrum is turned into a colour stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// The spectrum itself is the stimulus, magnitude included.
    #[default]
    Absorbed,
    /// The stimulus is the transmittance 10^(−spectrum).
    Transmitted,
}

macro_rules! impl_enum_codes {
    ($ty:ident, $field:literal, [$($variant:ident),+]) => {
        impl TryFrom<i32> for $ty {
            type Error = ParticleError;

            fn try_from(code: i32) -> Result<Self, Self::Error> {
                $(
                    if code == $ty::$variant as i32 {
                        return Ok($ty::$variant);
                    }
                )+
                Err(ParticleError::UnknownCode { field: $field, code })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let name = match self {
                    $($ty::$variant => stringify!($variant),)+
                };
                f.write_str(name)
            }
        }
    };
}

impl_enum_codes!(Shape, "shape", [Sphere, Ellipsoid]);
impl_enum_codes!(SpectraType, "spectra_type", [Efficiency, CrossSection, Molar, Absorption]);
impl_enum_codes!(SpectraProperty, "spectra_property", [Extinction, Absorbance, Scattering]);
impl_enum_codes!(ColorMode, "color_mode", [Absorbed, Transmitted]);

/// Optical efficiencies at a single wavelength.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Efficiencies {
    /// Extinction efficiency Q_ext.
    pub extinction: f64,
    /// Scattering efficiency Q_sca.
    pub scattering: f64,
    /// Absorption efficiency Q_abs = Q_ext − Q_sca.
    pub absorption: f64,
}

impl Efficiencies {
    pub fn new(extinction: f64, scattering: f64) -> Self {
        Self {
            extinction,
            scattering,
            absorption: extinction - scattering,
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            extinction: self.extinction * factor,
            scattering: self.scattering * factor,
            absorption: self.absorption * factor,
        }
    }

    pub fn get(&self, property: SpectraProperty) -> f64 {
        match property {
            SpectraProperty::Extinction => self.extinction,
            SpectraProperty::Absorbance => self.absorption,
            SpectraProperty::Scattering => self.scattering,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.extinction.is_finite() && self.scattering.is_finite() && self.absorption.is_finite()
    }
}

/// The three spectral channels over the full wavelength grid, in the units
/// of `spectra_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectra {
    pub spectra_type: SpectraType,
    pub extinction: Vec<f64>,
    pub scattering: Vec<f64>,
    pub absorbance: Vec<f64>,
}

impl Spectra {
    /// The channel for `property`.
    pub fn channel(&self, property: SpectraProperty) -> &[f64] {
        match property {
            SpectraProperty::Extinction => &self.extinction,
            SpectraProperty::Absorbance => &self.absorbance,
            SpectraProperty::Scattering => &self.scattering,
        }
    }

    /// Index and value of the largest point in `property`.
    pub fn peak(&self, property: SpectraProperty) -> Option<(usize, f64)> {
        self.channel(property)
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_spans_200_to_999() {
        let grid = wavelengths();
        assert_eq!(grid.len(), NLAMBDA);
        assert_eq!(grid[0], 200.0);
        assert_eq!(grid[250], 450.0);
        assert_eq!(grid[NLAMBDA - 1], 999.0);
    }

    #[test]
    fn test_numeric_codes() {
        assert_eq!(Shape::try_from(1).unwrap(), Shape::Ellipsoid);
        assert_eq!(SpectraType::try_from(2).unwrap(), SpectraType::Molar);
        assert_eq!(SpectraProperty::try_from(0).unwrap(), SpectraProperty::Extinction);
        assert!(SpectraType::try_from(4).is_err());
        assert!(Shape::try_from(-1).is_err());
        assert_eq!(SpectraType::CrossSection as i32, 1);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Shape::default(), Shape::Sphere);
        assert_eq!(SpectraType::default(), SpectraType::Efficiency);
        assert_eq!(SpectraProperty::default(), SpectraProperty::Absorbance);
        assert_eq!(ColorMode::default(), ColorMode::Absorbed);
    }

    #[test]
    fn test_absorption_is_extinction_minus_scattering() {
        let q = Efficiencies::new(3.0, 1.25);
        assert_eq!(q.get(SpectraProperty::Absorbance), 1.75);
        assert_eq!(q.scaled(2.0).absorption, 3.5);
    }

    #[test]
    fn test_enum_serde_names() {
        let json = serde_json::to_string(&SpectraType::CrossSection).unwrap();
        assert_eq!(json, "\"cross_section\"");
        let back: SpectraProperty = serde_json::from_str("\"scattering\"").unwrap();
        assert_eq!(back, SpectraProperty::Scattering);
    }
}
