//! Job runner: builds a particle from a job file, computes its spectrum and
//! writes the results.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use nanospec_core::color::{Hsv, Rgb};
use nanospec_core::particle::Particle;
use nanospec_core::types::{wavelengths, Shape, Spectra, SpectraType};

use crate::config::{JobConfig, ParticleConfig, SpectrumConfig};

/// Results from a job run.
#[derive(Debug, Serialize)]
pub struct JobOutput {
    pub method: String,
    pub wavelengths_nm: Vec<f64>,
    pub spectra: Spectra,
    pub rgb: Rgb,
    pub hsv: Hsv,
    pub opacity: f64,
}

/// Configure a particle through its validated setters.
pub fn build_particle(job: &JobConfig) -> Result<Particle> {
    let mut particle = Particle::new();
    apply_particle(&mut particle, &job.particle)?;
    apply_spectrum(&mut particle, &job.spectrum)?;
    log::debug!("Configured {:?}", particle);
    Ok(particle)
}

fn apply_particle(particle: &mut Particle, config: &ParticleConfig) -> Result<()> {
    particle.set_shape(config.shape);
    particle
        .set_n_layers(config.layers.len())
        .context("particle.layer")?;
    particle
        .set_sphere_radius(config.sphere_radius)
        .context("particle.sphere_radius")?;
    let [z, xy] = config.ellipsoid_radius;
    particle
        .set_ellipsoid_radius(z, xy)
        .context("particle.ellipsoid_radius")?;
    particle
        .set_medium_refractive_index(config.medium_refractive_index)
        .context("particle.medium_refractive_index")?;
    particle.set_size_correct(config.size_correct);

    for (i, layer) in config.layers.iter().enumerate() {
        let index = i + 1;
        particle
            .set_layer_material(index, &layer.material)
            .with_context(|| format!("particle.layer[{}].material", index))?;
        if let Some(value) = layer.relative_radius {
            particle
                .set_sphere_layer_relative_radius(index, value)
                .with_context(|| format!("particle.layer[{}].relative_radius", index))?;
        }
        if let Some([z, xy]) = layer.ellipsoid_relative_radius {
            particle
                .set_ellipsoid_layer_relative_radius(index, z, xy)
                .with_context(|| format!("particle.layer[{}].ellipsoid_relative_radius", index))?;
        }
    }
    Ok(())
}

fn apply_spectrum(particle: &mut Particle, config: &SpectrumConfig) -> Result<()> {
    particle.set_spectra_type(config.spectra_type);
    particle.set_spectra_property(config.property);
    particle.set_color_mode(config.color_mode);
    particle
        .set_increment(config.increment)
        .context("spectrum.increment")?;
    particle
        .set_path_length(config.path_length)
        .context("spectrum.path_length")?;
    particle
        .set_concentration(config.concentration)
        .context("spectrum.concentration")?;
    Ok(())
}

/// Print the configured particle.
pub fn describe(particle: &Particle) -> Result<()> {
    match particle.shape() {
        Shape::Sphere => println!("  Sphere, radius {} nm", particle.sphere_radius()),
        Shape::Ellipsoid => println!(
            "  Spheroid, semi-axes z = {} nm, xy = {} nm",
            particle.ellipsoid_z_radius(),
            particle.ellipsoid_xy_radius()
        ),
    }
    for index in 1..=particle.n_layers() {
        let fraction = match particle.shape() {
            Shape::Sphere => format!("{:.4}", particle.sphere_layer_relative_radius(index)?),
            Shape::Ellipsoid => format!(
                "z {:.4}, xy {:.4}",
                particle.ellipsoid_layer_z_relative_radius(index)?,
                particle.ellipsoid_layer_xy_relative_radius(index)?
            ),
        };
        println!(
            "  Layer {}: {} ({})",
            index,
            particle.layer_material(index)?,
            fraction
        );
    }
    println!(
        "  Medium n = {}, size correction {}",
        particle.medium_refractive_index(),
        if particle.size_correct() { "on" } else { "off" }
    );
    Ok(())
}

/// Run a job from a parsed configuration.
pub fn run_job(job: &JobConfig) -> Result<JobOutput> {
    let mut particle = build_particle(job)?;
    describe(&particle)?;

    let request = particle.spectrum_request();
    let method = nanospec_core::solver::kernel_for(request.shape)
        .method_name()
        .to_string();
    println!(
        "Method: {} ({} of {} wavelengths sampled)",
        method,
        nanospec_core::spectrum::sample_indices(particle.increment()).len(),
        nanospec_core::NLAMBDA
    );

    particle
        .calculate_spectrum()
        .context("Spectrum calculation failed")?;

    let spectra = particle.spectra()?.clone();
    if let Some((i, value)) = spectra.peak(particle.spectra_property()) {
        println!(
            "Peak {}: {:.6e} {} at {} nm",
            particle.spectra_property(),
            value,
            units(particle.spectra_type()),
            wavelengths()[i]
        );
    }

    Ok(JobOutput {
        method,
        wavelengths_nm: wavelengths().to_vec(),
        spectra,
        rgb: particle.rgb()?,
        hsv: particle.hsv()?,
        opacity: particle.opacity()?,
    })
}

fn units(spectra_type: SpectraType) -> &'static str {
    match spectra_type {
        SpectraType::Efficiency => "(efficiency)",
        SpectraType::CrossSection => "nm²",
        SpectraType::Molar => "M⁻¹ cm⁻¹",
        SpectraType::Absorption => "(absorbance)",
    }
}

/// Write all three channels to a CSV file with a metadata header.
pub fn write_spectrum_csv(output: &JobOutput, path: &Path, job: &JobConfig) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }

    let mut file = std::io::BufWriter::new(
        std::fs::File::create(path).with_context(|| format!("Cannot create {}", path.display()))?,
    );

    // Metadata header
    writeln!(file, "# NanoSpec spectrum")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# method: {}", output.method)?;
    writeln!(file, "# shape: {}", job.particle.shape)?;
    writeln!(file, "# medium_refractive_index: {}", job.particle.medium_refractive_index)?;
    for (i, layer) in job.particle.layers.iter().enumerate() {
        writeln!(file, "# layer {}: material={}", i + 1, layer.material)?;
    }
    writeln!(
        file,
        "# spectra_type: {} {}",
        output.spectra.spectra_type,
        units(output.spectra.spectra_type)
    )?;
    writeln!(file, "#")?;

    writeln!(file, "wavelength_nm,extinction,scattering,absorbance")?;
    let spectra = &output.spectra;
    for (i, wl) in output.wavelengths_nm.iter().enumerate() {
        writeln!(
            file,
            "{:.1},{:.6e},{:.6e},{:.6e}",
            wl, spectra.extinction[i], spectra.scattering[i], spectra.absorbance[i]
        )?;
    }
    file.flush()?;

    println!("Spectrum written to: {}", path.display());
    Ok(())
}

/// Write the full result to a JSON file.
pub fn write_spectrum_json(output: &JobOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(output).context("JSON serialisation error")?;
    std::fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))?;

    println!("Spectrum (JSON) written to: {}", path.display());
    Ok(())
}

/// Print the colour summary.
pub fn print_colour(output: &JobOutput) {
    let Rgb { r, g, b } = output.rgb;
    let Hsv { hue, saturation, value } = output.hsv;
    println!("Colour: RGB ({:.4}, {:.4}, {:.4}) {}", r, g, b, output.rgb.to_hex());
    println!("        HSV ({:.1}°, {:.4}, {:.4})", hue, saturation, value);
    println!("Opacity: {:.4}", output.opacity);
}
