//! Named material catalogue.
//!
//! Particle layers refer to materials by a small integer index so that a
//! layer stack can be stored and compared cheaply. The catalogue assigns
//! those indices in alphabetical order of the short material names:
//!
//! | Index | Name | Source |
//! |-------|------|--------|
//! | 0 | `Ag` | Johnson & Christy |
//! | 1 | `Al` | Drude |
//! | 2 | `Au` | Johnson & Christy |
//! | 3 | `Cu` | Johnson & Christy |
//! | 4 | `Glass` | Sellmeier (N-BK7) |
//! | 5 | `Quartz` | Sellmeier (fused silica) |
//! | 6 | `TiO2` | Palik |

use std::sync::{Arc, OnceLock};

use num_complex::Complex64;

use crate::drude::{DrudeMaterial, DrudeParameters};
use crate::johnson_christy::JohnsonChristyMaterial;
use crate::palik::PalikMaterial;
use crate::provider::{MaterialError, MaterialProvider};
use crate::sellmeier::SellmeierMaterial;

/// Stable identifier of a material within a [`MaterialDatabase`].
pub type MaterialIndex = usize;

/// Index of `Ag` in [`MaterialCatalogue::standard`].
pub const SILVER: MaterialIndex = 0;

/// Name-to-index lookup plus optical constants by index.
pub trait MaterialDatabase: Send + Sync {
    /// Index of the material with the given short name (exact match).
    fn resolve(&self, name: &str) -> Result<MaterialIndex, MaterialError>;

    /// Short name of the material at `index`.
    fn name_of(&self, index: MaterialIndex) -> Result<&str, MaterialError>;

    /// Complex refractive index of material `index` at `wavelength_nm`.
    fn refractive_index(&self, index: MaterialIndex, wavelength_nm: f64)
        -> Result<Complex64, MaterialError>;

    /// Free-electron parameters of material `index`, if it is a Drude metal.
    fn drude_parameters(&self, index: MaterialIndex) -> Result<Option<DrudeParameters>, MaterialError>;

    /// All short names in index order.
    fn names(&self) -> Vec<&str>;
}

struct Entry {
    name: &'static str,
    provider: Box<dyn MaterialProvider>,
}

/// The built-in set of metals and dielectrics.
pub struct MaterialCatalogue {
    entries: Vec<Entry>,
}

impl MaterialCatalogue {
    /// Build the standard catalogue. Spline construction runs once per call,
    /// so prefer [`MaterialCatalogue::shared`].
    pub fn standard() -> Self {
        let entries = vec![
            Entry { name: "Ag", provider: Box::new(JohnsonChristyMaterial::silver()) },
            Entry { name: "Al", provider: Box::new(DrudeMaterial::aluminium()) },
            Entry { name: "Au", provider: Box::new(JohnsonChristyMaterial::gold()) },
            Entry { name: "Cu", provider: Box::new(JohnsonChristyMaterial::copper()) },
            Entry { name: "Glass", provider: Box::new(SellmeierMaterial::bk7()) },
            Entry { name: "Quartz", provider: Box::new(SellmeierMaterial::fused_silica()) },
            Entry { name: "TiO2", provider: Box::new(PalikMaterial::tio2()) },
        ];
        log::debug!("Material catalogue built with {} entries", entries.len());
        Self { entries }
    }

    /// Process-wide instance of the standard catalogue.
    pub fn shared() -> Arc<MaterialCatalogue> {
        static SHARED: OnceLock<Arc<MaterialCatalogue>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Self::standard())).clone()
    }

    /// The provider backing material `index`.
    pub fn provider(&self, index: MaterialIndex) -> Result<&dyn MaterialProvider, MaterialError> {
        self.entries
            .get(index)
            .map(|entry| entry.provider.as_ref())
            .ok_or(MaterialError::InvalidIndex(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MaterialDatabase for MaterialCatalogue {
    fn resolve(&self, name: &str) -> Result<MaterialIndex, MaterialError> {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .ok_or_else(|| MaterialError::NotFound(name.to_string()))
    }

    fn name_of(&self, index: MaterialIndex) -> Result<&str, MaterialError> {
        self.entries
            .get(index)
            .map(|entry| entry.name)
            .ok_or(MaterialError::InvalidIndex(index))
    }

    fn refractive_index(
        &self,
        index: MaterialIndex,
        wavelength_nm: f64,
    ) -> Result<Complex64, MaterialError> {
        self.provider(index)?.refractive_index(wavelength_nm)
    }

    fn drude_parameters(&self, index: MaterialIndex) -> Result<Option<DrudeParameters>, MaterialError> {
        Ok(self.provider(index)?.drude_parameters())
    }

    fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }
}
