//! Errors raised by the particle API.

use nanospec_materials::MaterialError;
use thiserror::Error;

use crate::solver::KernelError;

/// Broad classification of a [`ParticleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Layer index outside `1..=n_layers`.
    Index,
    /// Numeric value outside its valid domain.
    Range,
    /// Unknown material name.
    Lookup,
    /// Result requested before a successful calculation.
    State,
    /// The scattering calculation failed for the given inputs.
    Computation,
}

/// Errors from [`Particle`](crate::particle::Particle) setters, calculations
/// and result accessors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParticleError {
    #[error("Layer index {index} is outside 1..={n_layers}")]
    LayerIndex { index: usize, n_layers: usize },

    #[error("Invalid {field} = {value}: must be {expected}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("Invalid increment {0}: must be a positive divisor of 800")]
    Increment(i64),

    #[error("Unknown {field} code {code}")]
    UnknownCode { field: &'static str, code: i32 },

    #[error("Unknown material '{name}' for layer {layer}")]
    UnknownMaterial { layer: usize, name: String },

    #[error("No spectrum has been calculated for the current configuration")]
    NotCalculated,

    #[error("Scattering calculation failed at {wavelength_nm} nm: {source}")]
    Kernel {
        wavelength_nm: f64,
        #[source]
        source: KernelError,
    },

    #[error("Optical constants unavailable for layer {layer}: {source}")]
    Material {
        layer: usize,
        #[source]
        source: MaterialError,
    },
}

impl ParticleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParticleError::LayerIndex { .. } => ErrorKind::Index,
            ParticleError::OutOfRange { .. }
            | ParticleError::Increment(_)
            | ParticleError::UnknownCode { .. } => ErrorKind::Range,
            ParticleError::UnknownMaterial { .. } => ErrorKind::Lookup,
            ParticleError::NotCalculated => ErrorKind::State,
            ParticleError::Kernel { .. } | ParticleError::Material { .. } => ErrorKind::Computation,
        }
    }

    pub(crate) fn out_of_range(field: &'static str, value: f64, expected: &'static str) -> Self {
        ParticleError::OutOfRange {
            field,
            value,
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ParticleError::LayerIndex { index: 0, n_layers: 1 }.kind(),
            ErrorKind::Index
        );
        assert_eq!(ParticleError::Increment(7).kind(), ErrorKind::Range);
        assert_eq!(ParticleError::NotCalculated.kind(), ErrorKind::State);
        assert_eq!(
            ParticleError::UnknownMaterial { layer: 1, name: "Kryptonite".into() }.kind(),
            ErrorKind::Lookup
        );
        assert_eq!(
            ParticleError::Kernel {
                wavelength_nm: 200.0,
                source: KernelError::Unstable { boundary: 1, value: 25.0 },
            }
            .kind(),
            ErrorKind::Computation
        );
    }

    #[test]
    fn test_message_names_field_and_value() {
        let err = ParticleError::out_of_range("sphere_radius", 0.0, "positive");
        assert_eq!(err.to_string(), "Invalid sphere_radius = 0: must be positive");
    }
}
