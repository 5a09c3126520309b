//! Material entity and catalog lookup
//!
//! Bows and arrows are modeled from the mechanical properties of what they are
//! made of. The host may supply its own catalog; a built-in one covers the usual
//! bow woods, horn, sinew, metals and modern composites.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Mechanical properties of one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub name: String,
    /// Density in pounds per cubic inch
    pub density_lbs_cu_in: f64,
    /// Young's modulus in psi
    pub elastic_modulus_psi: f64,
    /// Ultimate tensile strength in psi
    #[serde(alias = "tensileStrengthPsi")]
    pub tensile_st_psi: f64,
    /// Earliest tech level the material is available
    pub tl: u8,
    /// Price per pound of finished material
    #[serde(alias = "a")]
    pub cost_per_lb: f64,
}

impl Material {
    pub fn new(
        name: impl Into<String>,
        density_lbs_cu_in: f64,
        elastic_modulus_psi: f64,
        tensile_st_psi: f64,
        tl: u8,
        cost_per_lb: f64,
    ) -> Self {
        Self {
            name: name.into(),
            density_lbs_cu_in,
            elastic_modulus_psi,
            tensile_st_psi,
            tl,
            cost_per_lb,
        }
    }

    /// Average two materials, as for a laminated (back/belly) limb.
    pub fn blend(&self, other: &Material) -> Material {
        if self.name.eq_ignore_ascii_case(&other.name) {
            return self.clone();
        }
        Material {
            name: format!("{}/{}", self.name, other.name),
            density_lbs_cu_in: (self.density_lbs_cu_in + other.density_lbs_cu_in) / 2.0,
            elastic_modulus_psi: (self.elastic_modulus_psi + other.elastic_modulus_psi) / 2.0,
            tensile_st_psi: (self.tensile_st_psi + other.tensile_st_psi) / 2.0,
            tl: self.tl.max(other.tl),
            cost_per_lb: (self.cost_per_lb + other.cost_per_lb) / 2.0,
        }
    }

    /// Fails when a property the formulas divide by is zero or negative.
    pub fn ensure_physical(&self) -> Result<(), DomainError> {
        let checks = [
            ("material density", self.density_lbs_cu_in),
            ("material elastic modulus", self.elastic_modulus_psi),
            ("material tensile strength", self.tensile_st_psi),
        ];
        for (quantity, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(DomainError::computation(
                    quantity,
                    format!("'{}' has non-positive value {}", self.name, value),
                ));
            }
        }
        Ok(())
    }
}

/// Two materials used together (back and belly, or a self-made part twice).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPair {
    pub first: String,
    pub second: String,
}

impl MaterialPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Both halves of the pair made from the same material.
    pub fn single(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            first: name.clone(),
            second: name,
        }
    }

    /// Look up and blend both halves; the first missing name fails the lookup.
    pub fn resolve(&self, catalog: &dyn MaterialCatalog) -> Result<Material, DomainError> {
        let first = catalog.require(&self.first)?;
        let second = catalog.require(&self.second)?;
        Ok(first.blend(&second))
    }
}

/// Read-only material lookup supplied by the host.
pub trait MaterialCatalog: Send + Sync {
    /// Case-insensitive lookup by name.
    fn get_by_name(&self, name: &str) -> Option<Material>;

    fn require(&self, name: &str) -> Result<Material, DomainError> {
        self.get_by_name(name)
            .ok_or_else(|| DomainError::resolution("material", name))
    }
}

/// A catalog backed by a list the caller owns.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMaterialCatalog {
    by_name: HashMap<String, Material>,
}

impl InMemoryMaterialCatalog {
    pub fn from_materials(materials: impl IntoIterator<Item = Material>) -> Self {
        let by_name = materials
            .into_iter()
            .map(|m| (m.name.trim().to_ascii_lowercase(), m))
            .collect();
        Self { by_name }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl MaterialCatalog for InMemoryMaterialCatalog {
    fn get_by_name(&self, name: &str) -> Option<Material> {
        self.by_name.get(&name.trim().to_ascii_lowercase()).cloned()
    }
}

static BUILT_IN_MATERIALS: Lazy<InMemoryMaterialCatalog> = Lazy::new(|| {
    InMemoryMaterialCatalog::from_materials([
        // Woods
        Material::new("Yew", 0.0242, 1_400_000.0, 15_000.0, 0, 1.0),
        Material::new("Ash", 0.0242, 1_600_000.0, 15_000.0, 0, 1.0),
        Material::new("Elm", 0.0202, 1_300_000.0, 12_000.0, 0, 0.8),
        Material::new("Hickory", 0.0289, 2_200_000.0, 20_000.0, 0, 1.2),
        Material::new("Oak", 0.0271, 1_800_000.0, 14_000.0, 0, 1.0),
        Material::new("Osage Orange", 0.0300, 1_700_000.0, 19_000.0, 0, 2.0),
        Material::new("Bamboo", 0.0253, 2_500_000.0, 25_000.0, 0, 0.5),
        Material::new("Cedar", 0.0135, 1_100_000.0, 8_000.0, 0, 1.0),
        Material::new("Pine", 0.0162, 1_300_000.0, 9_000.0, 0, 0.5),
        Material::new("Reed", 0.0120, 800_000.0, 7_000.0, 0, 0.2),
        // Animal
        Material::new("Horn", 0.0470, 290_000.0, 16_000.0, 1, 10.0),
        Material::new("Sinew", 0.0470, 218_000.0, 22_000.0, 1, 10.0),
        // Metals
        Material::new("Bronze", 0.3180, 16_000_000.0, 60_000.0, 1, 20.0),
        Material::new("Steel", 0.2840, 29_000_000.0, 100_000.0, 3, 5.0),
        Material::new("Aluminium", 0.0975, 10_000_000.0, 40_000.0, 6, 8.0),
        // Composites
        Material::new("Fiberglass", 0.0722, 5_500_000.0, 100_000.0, 7, 20.0),
        Material::new("Carbon Fiber", 0.0578, 20_000_000.0, 250_000.0, 8, 100.0),
    ])
});

/// The built-in material table. Immutable for the life of the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMaterialCatalog;

impl StaticMaterialCatalog {
    pub fn table() -> &'static InMemoryMaterialCatalog {
        &BUILT_IN_MATERIALS
    }
}

impl MaterialCatalog for StaticMaterialCatalog {
    fn get_by_name(&self, name: &str) -> Option<Material> {
        BUILT_IN_MATERIALS.get_by_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_lookup_is_case_insensitive() {
        let yew = StaticMaterialCatalog.get_by_name("yew").unwrap();
        assert_eq!(yew.name, "Yew");
        assert!(StaticMaterialCatalog.get_by_name(" CARBON FIBER ").is_some());
        assert!(StaticMaterialCatalog.get_by_name("Mithril").is_none());
    }

    #[test]
    fn require_reports_missing_name() {
        let err = StaticMaterialCatalog.require("Mithril").unwrap_err();
        assert_eq!(err, DomainError::resolution("material", "Mithril"));
    }

    #[test]
    fn built_in_table_is_physical() {
        let table = StaticMaterialCatalog::table();
        assert!(table.len() >= 15);
        for name in ["Yew", "Horn", "Sinew", "Steel", "Fiberglass"] {
            table.get_by_name(name).unwrap().ensure_physical().unwrap();
        }
    }

    #[test]
    fn blend_averages_properties() {
        let horn = StaticMaterialCatalog.get_by_name("Horn").unwrap();
        let sinew = StaticMaterialCatalog.get_by_name("Sinew").unwrap();
        let blended = horn.blend(&sinew);
        assert_eq!(blended.name, "Horn/Sinew");
        assert!((blended.elastic_modulus_psi - 254_000.0).abs() < 1e-6);
        assert!((blended.tensile_st_psi - 19_000.0).abs() < 1e-6);
    }

    #[test]
    fn single_pair_resolves_to_the_material() {
        let pair = MaterialPair::single("Ash");
        let ash = pair.resolve(&StaticMaterialCatalog).unwrap();
        assert_eq!(ash.name, "Ash");
    }

    #[test]
    fn zero_density_is_not_physical() {
        let foam = Material::new("Foam", 0.0, 1000.0, 10.0, 7, 1.0);
        assert!(matches!(
            foam.ensure_physical(),
            Err(DomainError::Computation { quantity: "material density", .. })
        ));
    }

    #[test]
    fn host_catalog_from_json() {
        let materials: Vec<Material> = serde_json::from_str(
            r#"[{"name": "Ironwood", "densityLbsCuIn": 0.04, "elasticModulusPsi": 2500000,
                 "tensileStPsi": 21000, "tl": 0, "a": 3}]"#,
        )
        .unwrap();
        let catalog = InMemoryMaterialCatalog::from_materials(materials);
        assert_eq!(catalog.get_by_name("ironwood").unwrap().cost_per_lb, 3.0);
    }
}
