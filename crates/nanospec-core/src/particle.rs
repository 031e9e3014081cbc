//! The particle: validated configuration plus the most recent spectra.
//!
//! Every setter checks its arguments before touching any state, so a failed
//! call leaves the particle exactly as it was. Any successful change to the
//! physical configuration discards the stored spectra; switching the
//! reported property or the colour mode only changes which stored channel is
//! read.

use std::sync::Arc;

use nanospec_materials::{MaterialCatalogue, MaterialDatabase, MaterialIndex, SILVER};

use crate::color::{spectrum_to_rgb, Hsv, Rgb};
use crate::error::ParticleError;
use crate::geometry::LayerGeometry;
use crate::spectrum::{ShellSpec, SpectralEngine, SpectrumRequest};
use crate::types::{ColorMode, Shape, Spectra, SpectraProperty, SpectraType, MAX_LAYERS, NLAMBDA};

/// Material given to new layers.
pub const DEFAULT_MATERIAL: &str = "Ag";

/// A layered nanoparticle in a homogeneous medium.
#[derive(Clone)]
pub struct Particle {
    database: Arc<dyn MaterialDatabase>,
    default_material: MaterialIndex,

    shape: Shape,
    materials: Vec<MaterialIndex>,
    geometry: LayerGeometry,
    sphere_radius: f64,
    ellipsoid_radius: [f64; 2],
    medium_refractive_index: f64,
    path_length: f64,
    concentration: f64,
    size_correct: bool,
    increment: usize,

    spectra_type: SpectraType,
    spectra_property: SpectraProperty,
    color_mode: ColorMode,

    spectra: Option<Spectra>,
}

impl std::fmt::Debug for Particle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Particle")
            .field("shape", &self.shape)
            .field("materials", &self.materials)
            .field("geometry", &self.geometry)
            .field("sphere_radius", &self.sphere_radius)
            .field("ellipsoid_radius", &self.ellipsoid_radius)
            .field("medium_refractive_index", &self.medium_refractive_index)
            .field("size_correct", &self.size_correct)
            .field("increment", &self.increment)
            .field("spectra_type", &self.spectra_type)
            .field("spectra_property", &self.spectra_property)
            .field("calculated", &self.spectra.is_some())
            .finish()
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::new()
    }
}

impl Particle {
    /// A 10 nm silver sphere in vacuum, using the built-in material catalogue.
    pub fn new() -> Self {
        Self::build(MaterialCatalogue::shared(), SILVER)
    }

    /// Default particle backed by another material database, which must
    /// provide [`DEFAULT_MATERIAL`].
    pub fn with_database(database: Arc<dyn MaterialDatabase>) -> Result<Self, ParticleError> {
        let silver = database
            .resolve(DEFAULT_MATERIAL)
            .map_err(|_| ParticleError::UnknownMaterial {
                layer: 1,
                name: DEFAULT_MATERIAL.to_string(),
            })?;
        Ok(Self::build(database, silver))
    }

    fn build(database: Arc<dyn MaterialDatabase>, default_material: MaterialIndex) -> Self {
        Self {
            database,
            default_material,
            shape: Shape::Sphere,
            materials: vec![default_material],
            geometry: LayerGeometry::new(1),
            sphere_radius: 10.0,
            ellipsoid_radius: [10.0, 10.0],
            medium_refractive_index: 1.0,
            path_length: 1.0,
            concentration: 1.0e-6,
            size_correct: false,
            increment: 1,
            spectra_type: SpectraType::Efficiency,
            spectra_property: SpectraProperty::Absorbance,
            color_mode: ColorMode::Absorbed,
            spectra: None,
        }
    }

    fn invalidate(&mut self) {
        self.spectra = None;
    }

    fn check_layer(&self, index: usize) -> Result<(), ParticleError> {
        if index == 0 || index > self.materials.len() {
            return Err(ParticleError::LayerIndex {
                index,
                n_layers: self.materials.len(),
            });
        }
        Ok(())
    }

    fn check_positive(field: &'static str, value: f64) -> Result<(), ParticleError> {
        if value > 0.0 && value.is_finite() {
            Ok(())
        } else {
            Err(ParticleError::out_of_range(field, value, "positive"))
        }
    }

    // ---- Setters ----

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.invalidate();
    }

    /// Change the number of layers. All relative radii return to the
    /// default pattern; existing layer materials are kept and new layers
    /// get the default material.
    pub fn set_n_layers(&mut self, n_layers: usize) -> Result<(), ParticleError> {
        if !(1..=MAX_LAYERS).contains(&n_layers) {
            return Err(ParticleError::out_of_range(
                "n_layers",
                n_layers as f64,
                "between 1 and 10",
            ));
        }
        self.materials.resize(n_layers, self.default_material);
        self.geometry.reset(n_layers);
        self.invalidate();
        Ok(())
    }

    pub fn set_sphere_radius(&mut self, radius: f64) -> Result<(), ParticleError> {
        Self::check_positive("sphere_radius", radius)?;
        self.sphere_radius = radius;
        self.invalidate();
        Ok(())
    }

    /// Semi-axis along the symmetry axis (`z`) and the two equal
    /// perpendicular semi-axes (`xy`).
    pub fn set_ellipsoid_radius(&mut self, z: f64, xy: f64) -> Result<(), ParticleError> {
        Self::check_positive("ellipsoid_z_radius", z)?;
        Self::check_positive("ellipsoid_xy_radius", xy)?;
        self.ellipsoid_radius = [z, xy];
        self.invalidate();
        Ok(())
    }

    pub fn set_layer_material(&mut self, index: usize, name: &str) -> Result<(), ParticleError> {
        self.check_layer(index)?;
        let material = self
            .database
            .resolve(name)
            .map_err(|_| ParticleError::UnknownMaterial {
                layer: index,
                name: name.to_string(),
            })?;
        self.materials[index - 1] = material;
        self.invalidate();
        Ok(())
    }

    pub fn set_sphere_layer_relative_radius(&mut self, index: usize, value: f64) -> Result<(), ParticleError> {
        self.geometry
            .sphere
            .set(index, value, "sphere_layer_relative_radius")?;
        self.invalidate();
        Ok(())
    }

    /// Set both ellipsoid relative radii of one layer; neither changes if
    /// either is invalid.
    pub fn set_ellipsoid_layer_relative_radius(
        &mut self,
        index: usize,
        z: f64,
        xy: f64,
    ) -> Result<(), ParticleError> {
        self.geometry.set_ellipsoid(index, z, xy)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_path_length(&mut self, path_length: f64) -> Result<(), ParticleError> {
        Self::check_positive("path_length", path_length)?;
        self.path_length = path_length;
        self.invalidate();
        Ok(())
    }

    pub fn set_concentration(&mut self, concentration: f64) -> Result<(), ParticleError> {
        Self::check_positive("concentration", concentration)?;
        self.concentration = concentration;
        self.invalidate();
        Ok(())
    }

    pub fn set_medium_refractive_index(&mut self, index: f64) -> Result<(), ParticleError> {
        Self::check_positive("medium_refractive_index", index)?;
        self.medium_refractive_index = index;
        self.invalidate();
        Ok(())
    }

    /// Compute every `increment`-th wavelength and interpolate the rest.
    /// Must divide the 800-point grid evenly.
    pub fn set_increment(&mut self, increment: i64) -> Result<(), ParticleError> {
        if increment <= 0 || NLAMBDA as i64 % increment != 0 {
            return Err(ParticleError::Increment(increment));
        }
        self.increment = increment as usize;
        self.invalidate();
        Ok(())
    }

    pub fn set_size_correct(&mut self, size_correct: bool) {
        self.size_correct = size_correct;
        self.invalidate();
    }

    pub fn set_spectra_type(&mut self, spectra_type: SpectraType) {
        self.spectra_type = spectra_type;
        self.invalidate();
    }

    pub fn set_spectra_property(&mut self, property: SpectraProperty) {
        self.spectra_property = property;
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }

    // ---- Getters ----

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn n_layers(&self) -> usize {
        self.materials.len()
    }

    pub fn sphere_radius(&self) -> f64 {
        self.sphere_radius
    }

    pub fn ellipsoid_z_radius(&self) -> f64 {
        self.ellipsoid_radius[0]
    }

    pub fn ellipsoid_xy_radius(&self) -> f64 {
        self.ellipsoid_radius[1]
    }

    pub fn geometry(&self) -> &LayerGeometry {
        &self.geometry
    }

    pub fn sphere_layer_relative_radius(&self, index: usize) -> Result<f64, ParticleError> {
        self.geometry.sphere.get(index)
    }

    pub fn ellipsoid_layer_z_relative_radius(&self, index: usize) -> Result<f64, ParticleError> {
        self.geometry.ellipsoid_z.get(index)
    }

    pub fn ellipsoid_layer_xy_relative_radius(&self, index: usize) -> Result<f64, ParticleError> {
        self.geometry.ellipsoid_xy.get(index)
    }

    /// Database index of the material in layer `index`.
    pub fn layer_index(&self, index: usize) -> Result<MaterialIndex, ParticleError> {
        self.check_layer(index)?;
        Ok(self.materials[index - 1])
    }

    /// Name of the material in layer `index`.
    pub fn layer_material(&self, index: usize) -> Result<&str, ParticleError> {
        let material = self.layer_index(index)?;
        self.database
            .name_of(material)
            .map_err(|source| ParticleError::Material { layer: index, source })
    }

    pub fn medium_refractive_index(&self) -> f64 {
        self.medium_refractive_index
    }

    pub fn path_length(&self) -> f64 {
        self.path_length
    }

    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    pub fn size_correct(&self) -> bool {
        self.size_correct
    }

    pub fn increment(&self) -> usize {
        self.increment
    }

    pub fn spectra_type(&self) -> SpectraType {
        self.spectra_type
    }

    pub fn spectra_property(&self) -> SpectraProperty {
        self.spectra_property
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn database(&self) -> &Arc<dyn MaterialDatabase> {
        &self.database
    }

    /// Whether spectra for the current configuration are available.
    pub fn is_calculated(&self) -> bool {
        self.spectra.is_some()
    }

    // ---- Calculation ----

    /// Snapshot of the configuration as the spectral engine sees it.
    pub fn spectrum_request(&self) -> SpectrumRequest {
        let outer_radii: Vec<[f64; 2]> = match self.shape {
            Shape::Sphere => self
                .geometry
                .sphere
                .cumulative()
                .into_iter()
                .map(|f| [f * self.sphere_radius; 2])
                .collect(),
            Shape::Ellipsoid => {
                let [z, xy] = self.ellipsoid_radius;
                self.geometry
                    .ellipsoid_z
                    .cumulative()
                    .into_iter()
                    .zip(self.geometry.ellipsoid_xy.cumulative())
                    .map(|(fz, fxy)| [fz * z, fxy * xy])
                    .collect()
            }
        };

        let shells = self
            .materials
            .iter()
            .zip(outer_radii)
            .enumerate()
            .map(|(i, (&material, outer_radius))| ShellSpec {
                layer: i + 1,
                material,
                outer_radius,
            })
            .collect();

        SpectrumRequest {
            shape: self.shape,
            shells,
            medium_index: self.medium_refractive_index,
            size_correct: self.size_correct,
            increment: self.increment,
            spectra_type: self.spectra_type,
            path_length: self.path_length,
            concentration: self.concentration,
        }
    }

    /// Compute all spectral channels for the current configuration.
    ///
    /// On failure no spectra are stored.
    pub fn calculate_spectrum(&mut self) -> Result<(), ParticleError> {
        self.spectra = None;
        let request = self.spectrum_request();
        let spectra = SpectralEngine::new(self.database.as_ref()).calculate(&request)?;
        self.spectra = Some(spectra);
        Ok(())
    }

    // ---- Results ----

    /// All three channels from the last calculation.
    pub fn spectra(&self) -> Result<&Spectra, ParticleError> {
        self.spectra.as_ref().ok_or(ParticleError::NotCalculated)
    }

    /// The channel selected by the spectra property, 800 points.
    pub fn spectrum(&self) -> Result<&[f64], ParticleError> {
        self.channel(self.spectra_property)
    }

    pub fn channel(&self, property: SpectraProperty) -> Result<&[f64], ParticleError> {
        Ok(self.spectra()?.channel(property))
    }

    pub fn rgb(&self) -> Result<Rgb, ParticleError> {
        Ok(spectrum_to_rgb(self.spectrum()?, self.color_mode))
    }

    pub fn hsv(&self) -> Result<Hsv, ParticleError> {
        Ok(self.rgb()?.to_hsv())
    }

    /// The HSV value component of the current colour.
    pub fn opacity(&self) -> Result<f64, ParticleError> {
        Ok(self.hsv()?.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let p = Particle::new();
        assert_eq!(p.shape(), Shape::Sphere);
        assert_eq!(p.n_layers(), 1);
        assert_eq!(p.layer_material(1).unwrap(), "Ag");
        assert_eq!(p.layer_index(1).unwrap(), SILVER);
        assert_eq!(MaterialCatalogue::shared().name_of(SILVER).unwrap(), DEFAULT_MATERIAL);
        assert_eq!(p.sphere_radius(), 10.0);
        assert_eq!(p.ellipsoid_z_radius(), 10.0);
        assert_eq!(p.ellipsoid_xy_radius(), 10.0);
        assert_eq!(p.path_length(), 1.0);
        assert_eq!(p.concentration(), 1.0e-6);
        assert_eq!(p.medium_refractive_index(), 1.0);
        assert!(!p.size_correct());
        assert_eq!(p.increment(), 1);
        assert_eq!(p.spectra_type(), SpectraType::Efficiency);
        assert_eq!(p.spectra_property(), SpectraProperty::Absorbance);
        assert_eq!(p.sphere_layer_relative_radius(1).unwrap(), 1.0);
        assert!(!p.is_calculated());
    }

    #[test]
    fn test_growing_layers_keeps_materials() {
        let mut p = Particle::new();
        p.set_n_layers(2).unwrap();
        p.set_layer_material(1, "Au").unwrap();
        p.set_sphere_layer_relative_radius(1, 0.4).unwrap();
        p.set_n_layers(3).unwrap();
        assert_eq!(p.layer_material(1).unwrap(), "Au");
        assert_eq!(p.layer_material(3).unwrap(), "Ag");
        assert_eq!(p.geometry().sphere.as_slice(), &[1.0, 0.0, 0.0]);
        p.set_n_layers(1).unwrap();
        assert_eq!(p.layer_material(1).unwrap(), "Au");
    }

    #[test]
    fn test_request_uses_cumulative_radii() {
        let mut p = Particle::new();
        p.set_n_layers(2).unwrap();
        p.set_sphere_radius(20.0).unwrap();
        p.set_sphere_layer_relative_radius(1, 0.25).unwrap();
        let request = p.spectrum_request();
        assert_eq!(request.shells[0].outer_radius, [5.0, 5.0]);
        assert_eq!(request.shells[1].outer_radius, [20.0, 20.0]);

        p.set_shape(Shape::Ellipsoid);
        p.set_ellipsoid_radius(30.0, 10.0).unwrap();
        p.set_ellipsoid_layer_relative_radius(1, 0.5, 0.8).unwrap();
        let request = p.spectrum_request();
        assert_eq!(request.shells[0].outer_radius, [15.0, 8.0]);
        assert_eq!(request.shells[1].outer_radius, [30.0, 10.0]);
    }

    #[test]
    fn test_rejected_setters_change_nothing() {
        let mut p = Particle::new();
        assert_eq!(p.set_ellipsoid_radius(5.0, -1.0).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(p.ellipsoid_z_radius(), 10.0);
        assert_eq!(p.set_medium_refractive_index(0.0).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(p.set_path_length(f64::NAN).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(p.set_concentration(-1e-9).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(p.set_layer_material(2, "Au").unwrap_err().kind(), ErrorKind::Index);
        assert_eq!(p.layer_index(0).unwrap_err().kind(), ErrorKind::Index);
        assert_eq!(p.medium_refractive_index(), 1.0);
        assert_eq!(p.path_length(), 1.0);
        assert_eq!(p.concentration(), 1.0e-6);
    }
}
