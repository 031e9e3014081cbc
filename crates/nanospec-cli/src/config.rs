//! TOML configuration deserialisation for spectrum jobs.
//!
//! ```toml
//! [particle]
//! shape = "sphere"
//! sphere_radius = 20.0
//! medium_refractive_index = 1.33
//!
//! [[particle.layer]]
//! material = "Au"
//! relative_radius = 0.7
//!
//! [[particle.layer]]
//! material = "Quartz"
//!
//! [spectrum]
//! spectra_type = "efficiency"
//! property = "extinction"
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use nanospec_core::types::{ColorMode, Shape, SpectraProperty, SpectraType};

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub particle: ParticleConfig,
    #[serde(default)]
    pub spectrum: SpectrumConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The particle and its surroundings.
#[derive(Debug, Deserialize)]
pub struct ParticleConfig {
    #[serde(default)]
    pub shape: Shape,
    #[serde(default = "default_radius")]
    pub sphere_radius: f64,
    /// `[z, xy]` semi-axes in nm.
    #[serde(default = "default_ellipsoid_radius")]
    pub ellipsoid_radius: [f64; 2],
    #[serde(default = "default_medium_index")]
    pub medium_refractive_index: f64,
    #[serde(default)]
    pub size_correct: bool,
    /// Layers from the core outwards.
    #[serde(rename = "layer", default = "default_layers")]
    pub layers: Vec<LayerConfig>,
}

/// One layer. Relative radii are applied in file order through the
/// particle's allocator; omitted values keep whatever the allocator leaves.
#[derive(Debug, Deserialize)]
pub struct LayerConfig {
    pub material: String,
    #[serde(default)]
    pub relative_radius: Option<f64>,
    /// `[z, xy]` fractions for spheroids.
    #[serde(default)]
    pub ellipsoid_relative_radius: Option<[f64; 2]>,
}

/// Units, channel and sampling of the spectrum.
#[derive(Debug, Deserialize)]
pub struct SpectrumConfig {
    #[serde(default)]
    pub spectra_type: SpectraType,
    #[serde(default)]
    pub property: SpectraProperty,
    #[serde(default)]
    pub color_mode: ColorMode,
    #[serde(default = "default_increment")]
    pub increment: i64,
    /// Cuvette path length (cm).
    #[serde(default = "default_path_length")]
    pub path_length: f64,
    /// Particle concentration (M).
    #[serde(default = "default_concentration")]
    pub concentration: f64,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            spectra_type: SpectraType::default(),
            property: SpectraProperty::default(),
            color_mode: ColorMode::default(),
            increment: default_increment(),
            path_length: default_path_length(),
            concentration: default_concentration(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save the spectrum as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_spectrum: bool,
    /// Whether to also save it as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_spectrum: true,
            save_json: false,
        }
    }
}

fn default_radius() -> f64 {
    10.0
}
fn default_ellipsoid_radius() -> [f64; 2] {
    [10.0, 10.0]
}
fn default_medium_index() -> f64 {
    1.0
}
fn default_layers() -> Vec<LayerConfig> {
    vec![LayerConfig {
        material: nanospec_core::particle::DEFAULT_MATERIAL.into(),
        relative_radius: None,
        ellipsoid_relative_radius: None,
    }]
}
fn default_increment() -> i64 {
    1
}
fn default_path_length() -> f64 {
    1.0
}
fn default_concentration() -> f64 {
    1.0e-6
}
fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Parse a TOML job description.
pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    Ok(config)
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid job file {}", path.display()))
}
