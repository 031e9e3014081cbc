//! Integration test: validated setters and the relative-radius allocator.
//!
//! Every rejected call must leave the particle untouched, and each
//! relative-radius sequence must keep summing to one.

use approx::assert_abs_diff_eq;
use nanospec_core::error::{ErrorKind, ParticleError};
use nanospec_core::particle::Particle;
use nanospec_core::types::{ColorMode, Shape, SpectraProperty, SpectraType};
use nanospec_materials::MaterialDatabase;

fn sphere_radii(p: &Particle) -> Vec<f64> {
    p.geometry().sphere.as_slice().to_vec()
}

fn assert_radii(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
    }
}

#[test]
fn test_cascade_sequence_on_four_layers() {
    let mut p = Particle::new();
    p.set_n_layers(4).unwrap();
    assert_radii(&sphere_radii(&p), &[1.0, 0.0, 0.0, 0.0]);

    p.set_sphere_layer_relative_radius(1, 0.3).unwrap();
    p.set_sphere_layer_relative_radius(2, 0.15).unwrap();
    p.set_sphere_layer_relative_radius(3, 0.2).unwrap();
    assert_radii(&sphere_radii(&p), &[0.3, 0.15, 0.2, 0.35]);

    p.set_sphere_layer_relative_radius(2, 0.5).unwrap();
    assert_radii(&sphere_radii(&p), &[0.3, 0.5, 0.0, 0.2]);

    p.set_sphere_layer_relative_radius(4, 0.1).unwrap();
    assert_radii(&sphere_radii(&p), &[0.3, 0.5, 0.1, 0.1]);

    p.set_sphere_layer_relative_radius(3, 0.9).unwrap();
    assert_radii(&sphere_radii(&p), &[0.1, 0.0, 0.9, 0.0]);
}

#[test]
fn test_sum_stays_one_over_many_updates() {
    let mut p = Particle::new();
    p.set_n_layers(7).unwrap();
    // A fixed pseudo-random walk over layers and values.
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    for _ in 0..500 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let layer = (state % 7) as usize + 1;
        let value = (state >> 11) as f64 / (1u64 << 53) as f64;
        p.set_sphere_layer_relative_radius(layer, value).unwrap();
        p.set_ellipsoid_layer_relative_radius(8 - layer, value, 1.0 - value)
            .unwrap();

        let g = p.geometry();
        for sequence in [&g.sphere, &g.ellipsoid_z, &g.ellipsoid_xy] {
            assert_abs_diff_eq!(sequence.sum(), 1.0, epsilon = 1e-9);
            assert!(sequence.as_slice().iter().all(|&f| (0.0..=1.0 + 1e-12).contains(&f)));
        }
    }
}

#[test]
fn test_layer_count_limits() {
    let mut p = Particle::new();
    p.set_n_layers(3).unwrap();
    for bad in [0, 11] {
        let err = p.set_n_layers(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(p.n_layers(), 3);
    }
    p.set_n_layers(10).unwrap();
    assert_eq!(p.n_layers(), 10);
}

#[test]
fn test_relative_radius_checks() {
    let mut p = Particle::new();
    p.set_n_layers(2).unwrap();
    for bad in [1.1, -0.1, f64::NAN] {
        let err = p.set_sphere_layer_relative_radius(2, bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }
    for index in [0, 3] {
        let err = p.set_sphere_layer_relative_radius(index, 0.5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Index);
    }
    assert_radii(&sphere_radii(&p), &[1.0, 0.0]);
}

#[test]
fn test_ellipsoid_update_is_all_or_nothing() {
    let mut p = Particle::new();
    p.set_n_layers(2).unwrap();
    p.set_ellipsoid_layer_relative_radius(2, 0.4, 0.25).unwrap();
    assert_radii(p.geometry().ellipsoid_z.as_slice(), &[0.6, 0.4]);
    assert_radii(p.geometry().ellipsoid_xy.as_slice(), &[0.75, 0.25]);

    let err = p
        .set_ellipsoid_layer_relative_radius(1, 0.5, 1.5)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    assert_radii(p.geometry().ellipsoid_z.as_slice(), &[0.6, 0.4]);
    assert_eq!(p.ellipsoid_layer_z_relative_radius(1).unwrap(), 0.6);
    assert_eq!(p.ellipsoid_layer_xy_relative_radius(2).unwrap(), 0.25);
}

#[test]
fn test_positive_quantities() {
    let mut p = Particle::new();

    let err = p.set_sphere_radius(0.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    assert_eq!(err.to_string(), "Invalid sphere_radius = 0: must be positive");
    assert_eq!(p.sphere_radius(), 10.0);

    assert!(p.set_ellipsoid_radius(5.0, -1.0).is_err());
    assert_eq!((p.ellipsoid_z_radius(), p.ellipsoid_xy_radius()), (10.0, 10.0));

    assert!(p.set_path_length(0.0).is_err());
    assert!(p.set_concentration(-1e-9).is_err());
    assert!(p.set_medium_refractive_index(f64::INFINITY).is_err());
    assert_eq!(p.path_length(), 1.0);
    assert_eq!(p.concentration(), 1.0e-6);
    assert_eq!(p.medium_refractive_index(), 1.0);

    p.set_ellipsoid_radius(30.0, 12.0).unwrap();
    p.set_medium_refractive_index(1.33).unwrap();
    assert_eq!((p.ellipsoid_z_radius(), p.ellipsoid_xy_radius()), (30.0, 12.0));
    assert_eq!(p.medium_refractive_index(), 1.33);
}

#[test]
fn test_materials_resolve_through_database() {
    let mut p = Particle::new();
    p.set_n_layers(2).unwrap();
    p.set_layer_material(1, "Au").unwrap();
    p.set_layer_material(2, "TiO2").unwrap();
    assert_eq!(p.layer_material(1).unwrap(), "Au");
    assert_eq!(p.layer_index(1).unwrap(), p.database().resolve("Au").unwrap());
    assert_eq!(p.layer_index(2).unwrap(), p.database().resolve("TiO2").unwrap());

    let err = p.set_layer_material(1, "Kryptonite").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert!(err.to_string().contains("Kryptonite"));
    assert_eq!(p.layer_material(1).unwrap(), "Au");

    assert_eq!(p.set_layer_material(3, "Ag").unwrap_err().kind(), ErrorKind::Index);
    assert_eq!(p.layer_index(0).unwrap_err().kind(), ErrorKind::Index);
}

#[test]
fn test_increment_must_divide_grid() {
    let mut p = Particle::new();
    p.set_increment(5).unwrap();
    assert_eq!(p.increment(), 5);

    for bad in [7, -1, 0, 801] {
        let err = p.set_increment(bad).unwrap_err();
        assert!(matches!(err, ParticleError::Increment(k) if k == bad));
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(p.increment(), 5);
    }
    p.set_increment(800).unwrap();
}

#[test]
fn test_results_before_calculation_are_state_errors() {
    let p = Particle::new();
    assert!(!p.is_calculated());
    assert_eq!(p.spectrum().unwrap_err().kind(), ErrorKind::State);
    assert_eq!(p.rgb().unwrap_err().kind(), ErrorKind::State);
    assert_eq!(p.hsv().unwrap_err().kind(), ErrorKind::State);
    assert_eq!(p.opacity().unwrap_err().kind(), ErrorKind::State);
}

#[test]
fn test_enum_codes() {
    assert_eq!(Shape::try_from(1_i32).unwrap(), Shape::Ellipsoid);
    assert_eq!(SpectraType::try_from(3_i32).unwrap(), SpectraType::Absorption);
    assert_eq!(SpectraProperty::try_from(2_i32).unwrap(), SpectraProperty::Scattering);
    assert_eq!(Shape::try_from(2_i32).unwrap_err().kind(), ErrorKind::Range);

    let mut p = Particle::new();
    p.set_shape(Shape::Ellipsoid);
    p.set_spectra_type(SpectraType::Molar);
    p.set_spectra_property(SpectraProperty::Extinction);
    p.set_color_mode(ColorMode::Transmitted);
    assert_eq!(p.shape(), Shape::Ellipsoid);
    assert_eq!(p.spectra_type(), SpectraType::Molar);
    assert_eq!(p.spectra_property(), SpectraProperty::Extinction);
    assert_eq!(p.color_mode(), ColorMode::Transmitted);
}
