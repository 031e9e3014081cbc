//! # NanoSpec Materials
//!
//! Optical constants for the NanoSpec nanoparticle solver. Every material
//! implements the [`MaterialProvider`](provider::MaterialProvider) trait, and
//! the [`MaterialCatalogue`](database::MaterialCatalogue) maps material names
//! onto stable integer indices through the
//! [`MaterialDatabase`](database::MaterialDatabase) trait.
//!
//! ## Available data sources
//!
//! | Source | Module | Materials |
//! |--------|--------|-----------|
//! | Johnson & Christy (1972) | [`johnson_christy`] | Ag, Au, Cu |
//! | Palik handbook (1985) | [`palik`] | TiO2 |
//! | Sellmeier dispersion | [`sellmeier`] | Quartz, Glass |
//! | Drude free-electron model | [`drude`] | Al |
//!
//! ## Interpolation
//!
//! Tabulated data is interpolated with a natural cubic spline of the complex
//! $\epsilon(\lambda)$ ([`spline::DielectricSpline`]).

pub mod database;
pub mod drude;
pub mod johnson_christy;
pub mod palik;
pub mod provider;
pub mod sellmeier;
pub mod spline;

pub use database::{MaterialCatalogue, MaterialDatabase, MaterialIndex, SILVER};
pub use drude::DrudeParameters;
pub use provider::{MaterialError, MaterialProvider};
