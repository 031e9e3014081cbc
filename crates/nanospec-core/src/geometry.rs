//! Layer geometry: relative radii that always sum to one.
//!
//! Each layer owns a fraction of the particle radius along an axis. The
//! outer boundary of layer `i` sits at the cumulative sum of the fractions of
//! layers `1..=i`, so the outermost layer always ends on the particle
//! surface.
//!
//! Setting one layer's fraction moves the difference onto the other layers
//! in a fixed cascade order: the layers after it (outwards), then the layers
//! before it (inwards). Growing a layer drains its neighbours one at a time
//! down to zero; shrinking a layer hands the whole freed fraction to the
//! first layer in the cascade.

use serde::{Deserialize, Serialize};

use crate::error::ParticleError;

/// One relative-radius sequence, indexed from 1 in the public API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeRadii {
    values: Vec<f64>,
}

impl RelativeRadii {
    /// Default pattern for `n_layers`: the core takes the whole radius.
    pub fn new(n_layers: usize) -> Self {
        let mut values = vec![0.0; n_layers.max(1)];
        values[0] = 1.0;
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Fraction of layer `index` (1-based).
    pub fn get(&self, index: usize) -> Result<f64, ParticleError> {
        self.check_index(index)?;
        Ok(self.values[index - 1])
    }

    /// Running sums: the outer boundary of each layer as a fraction of the
    /// particle radius.
    pub fn cumulative(&self) -> Vec<f64> {
        self.values
            .iter()
            .scan(0.0, |acc, &v| {
                *acc += v;
                Some(*acc)
            })
            .collect()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Set layer `index` to `value`, redistributing the difference.
    pub fn set(&mut self, index: usize, value: f64, field: &'static str) -> Result<(), ParticleError> {
        self.validate(index, value, field)?;
        self.apply(index, value);
        Ok(())
    }

    pub(crate) fn validate(&self, index: usize, value: f64, field: &'static str) -> Result<(), ParticleError> {
        self.check_index(index)?;
        if !(0.0..=1.0).contains(&value) {
            return Err(ParticleError::out_of_range(field, value, "within [0, 1]"));
        }
        if self.values.len() == 1 && value != 1.0 {
            return Err(ParticleError::out_of_range(field, value, "1 for a single-layer particle"));
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), ParticleError> {
        if index == 0 || index > self.values.len() {
            return Err(ParticleError::LayerIndex {
                index,
                n_layers: self.values.len(),
            });
        }
        Ok(())
    }

    /// Apply a validated update.
    pub(crate) fn apply(&mut self, index: usize, value: f64) {
        let i = index - 1;
        let delta = value - self.values[i];

        if delta > 0.0 {
            let mut remaining = delta;
            for j in cascade_order(i, self.values.len()) {
                if remaining <= 0.0 {
                    break;
                }
                let taken = remaining.min(self.values[j]);
                self.values[j] -= taken;
                remaining -= taken;
            }
        } else if delta < 0.0 {
            if let Some(j) = cascade_order(i, self.values.len()).next() {
                self.values[j] -= delta;
            }
        }

        self.values[i] = value;
    }
}

/// Zero-based cascade order for layer `i` of `n`: `i+1..n`, then `i-1` down to 0.
fn cascade_order(i: usize, n: usize) -> impl Iterator<Item = usize> {
    (i + 1..n).chain((0..i).rev())
}

/// The three relative-radius sequences of a particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerGeometry {
    pub sphere: RelativeRadii,
    pub ellipsoid_z: RelativeRadii,
    pub ellipsoid_xy: RelativeRadii,
}

impl LayerGeometry {
    pub fn new(n_layers: usize) -> Self {
        Self {
            sphere: RelativeRadii::new(n_layers),
            ellipsoid_z: RelativeRadii::new(n_layers),
            ellipsoid_xy: RelativeRadii::new(n_layers),
        }
    }

    pub fn n_layers(&self) -> usize {
        self.sphere.len()
    }

    /// Resize every sequence to `n_layers` and restore the default pattern.
    pub fn reset(&mut self, n_layers: usize) {
        *self = Self::new(n_layers);
    }

    /// Set both ellipsoid fractions of one layer. Either both sequences
    /// change or neither does.
    pub fn set_ellipsoid(&mut self, index: usize, z: f64, xy: f64) -> Result<(), ParticleError> {
        self.ellipsoid_z.validate(index, z, "ellipsoid_z_relative_radius")?;
        self.ellipsoid_xy.validate(index, xy, "ellipsoid_xy_relative_radius")?;
        self.ellipsoid_z.apply(index, z);
        self.ellipsoid_xy.apply(index, xy);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_sequence(radii: &RelativeRadii, expected: &[f64]) {
        assert_eq!(radii.len(), expected.len());
        for (got, want) in radii.as_slice().iter().zip(expected) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(radii.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_default_pattern() {
        assert_eq!(RelativeRadii::new(3).as_slice(), &[1.0, 0.0, 0.0]);
        assert_eq!(RelativeRadii::new(1).as_slice(), &[1.0]);
    }

    #[test]
    fn test_cascade_order() {
        assert_eq!(cascade_order(1, 4).collect::<Vec<_>>(), vec![2, 3, 0]);
        assert_eq!(cascade_order(3, 4).collect::<Vec<_>>(), vec![2, 1, 0]);
        assert_eq!(cascade_order(0, 1).count(), 0);
    }

    #[test]
    fn test_shrink_feeds_first_layer_in_cascade() {
        let mut radii = RelativeRadii::new(4);
        radii.set(1, 0.3, "r").unwrap();
        assert_sequence(&radii, &[0.3, 0.7, 0.0, 0.0]);
    }

    #[test]
    fn test_grow_drains_in_cascade_order() {
        let mut radii = RelativeRadii::new(4);
        radii.set(1, 0.3, "r").unwrap();
        radii.set(2, 0.15, "r").unwrap();
        radii.set(3, 0.2, "r").unwrap();
        assert_sequence(&radii, &[0.3, 0.15, 0.2, 0.35]);

        radii.set(2, 0.5, "r").unwrap();
        assert_sequence(&radii, &[0.3, 0.5, 0.0, 0.2]);

        radii.set(4, 0.1, "r").unwrap();
        assert_sequence(&radii, &[0.3, 0.5, 0.1, 0.1]);

        radii.set(3, 0.9, "r").unwrap();
        assert_sequence(&radii, &[0.1, 0.0, 0.9, 0.0]);
    }

    #[test]
    fn test_single_layer_cannot_shrink() {
        let mut radii = RelativeRadii::new(1);
        radii.set(1, 1.0, "r").unwrap();
        let err = radii.set(1, 0.5, "r").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Range);
        assert_sequence(&radii, &[1.0]);
    }

    #[test]
    fn test_invalid_updates_leave_sequence_untouched() {
        let mut radii = RelativeRadii::new(2);
        let before = radii.clone();
        assert!(radii.set(2, 1.1, "r").is_err());
        assert!(radii.set(2, -0.1, "r").is_err());
        assert!(radii.set(2, f64::NAN, "r").is_err());
        assert!(radii.set(0, 0.5, "r").is_err());
        assert!(radii.set(3, 0.5, "r").is_err());
        assert_eq!(radii, before);
    }

    #[test]
    fn test_cumulative_boundaries() {
        let mut radii = RelativeRadii::new(3);
        radii.set(1, 0.5, "r").unwrap();
        radii.set(2, 0.25, "r").unwrap();
        let outer = radii.cumulative();
        assert_abs_diff_eq!(outer[0], 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(outer[1], 0.75, epsilon = 1e-15);
        assert_abs_diff_eq!(outer[2], 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_ellipsoid_sequences_update_together() {
        let mut geometry = LayerGeometry::new(2);
        geometry.set_ellipsoid(1, 0.6, 0.4).unwrap();
        assert_sequence(&geometry.ellipsoid_z, &[0.6, 0.4]);
        assert_sequence(&geometry.ellipsoid_xy, &[0.4, 0.6]);

        geometry.set_ellipsoid(2, 0.7, 0.6).unwrap();
        assert_sequence(&geometry.ellipsoid_z, &[0.3, 0.7]);
        assert_sequence(&geometry.ellipsoid_xy, &[0.4, 0.6]);

        geometry.set_ellipsoid(1, 1.0, 1.0).unwrap();
        assert_sequence(&geometry.ellipsoid_z, &[1.0, 0.0]);
        assert_sequence(&geometry.ellipsoid_xy, &[1.0, 0.0]);
    }

    #[test]
    fn test_ellipsoid_update_is_atomic() {
        let mut geometry = LayerGeometry::new(2);
        let before = geometry.clone();
        assert!(geometry.set_ellipsoid(1, 0.5, 1.5).is_err());
        assert!(geometry.set_ellipsoid(1, -0.5, 0.5).is_err());
        assert_eq!(geometry, before);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut geometry = LayerGeometry::new(3);
        geometry.sphere.set(1, 0.2, "r").unwrap();
        geometry.reset(5);
        assert_eq!(geometry.n_layers(), 5);
        assert_eq!(geometry.sphere.as_slice(), &[1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(geometry.ellipsoid_xy.as_slice(), &[1.0, 0.0, 0.0, 0.0, 0.0]);
    }
}
