//! Validated catalog lookups.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::Serialize;

use crate::error::CatalogError;
use crate::material::MaterialDef;
use crate::module::ModuleDef;
use crate::standard;

/// Validated, immutable material and module tables keyed by id.
///
/// Construction is the only place consistency is checked. Once a
/// `Catalog` exists every module cost is known to reference real
/// materials, so lookups never need to re-validate.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    materials: BTreeMap<String, MaterialDef>,
    modules: BTreeMap<String, ModuleDef>,
}

impl Catalog {
    /// Build a catalog from raw tables, rejecting any inconsistency.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found: duplicate ids, costs
    /// referencing unknown materials, non-positive costs, zero slot cost,
    /// non-positive build time, or non-finite numeric fields.
    pub fn new(materials: Vec<MaterialDef>, modules: Vec<ModuleDef>) -> Result<Self, CatalogError> {
        let mut material_index = BTreeMap::new();
        for material in materials {
            check_id(&material.id)?;
            match material_index.entry(material.id.clone()) {
                Entry::Occupied(_) => return Err(CatalogError::DuplicateMaterial(material.id)),
                Entry::Vacant(slot) => {
                    slot.insert(material);
                }
            }
        }

        let mut module_index = BTreeMap::new();
        for module in modules {
            check_id(&module.id)?;
            validate_module(&module, &material_index)?;
            match module_index.entry(module.id.clone()) {
                Entry::Occupied(_) => return Err(CatalogError::DuplicateModule(module.id)),
                Entry::Vacant(slot) => {
                    slot.insert(module);
                }
            }
        }

        tracing::debug!(
            materials = material_index.len(),
            modules = module_index.len(),
            "Catalog validated"
        );

        Ok(Self {
            materials: material_index,
            modules: module_index,
        })
    }

    /// Build and validate the shipped tables from [`standard`].
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the shipped tables are inconsistent.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(standard::materials(), standard::modules())
    }

    /// Look up a material definition.
    pub fn material(&self, id: &str) -> Option<&MaterialDef> {
        self.materials.get(id)
    }

    /// Look up a module definition.
    pub fn module(&self, id: &str) -> Option<&ModuleDef> {
        self.modules.get(id)
    }

    /// Whether `id` names a known material.
    pub fn is_valid_material(&self, id: &str) -> bool {
        self.materials.contains_key(id)
    }

    /// All materials, ordered by id.
    pub fn materials(&self) -> impl Iterator<Item = &MaterialDef> {
        self.materials.values()
    }

    /// All modules, ordered by id.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleDef> {
        self.modules.values()
    }
}

fn check_id(id: &str) -> Result<(), CatalogError> {
    if id.is_empty() || id.trim() != id {
        return Err(CatalogError::InvalidId(id.to_owned()));
    }
    Ok(())
}

fn validate_module(
    module: &ModuleDef,
    materials: &BTreeMap<String, MaterialDef>,
) -> Result<(), CatalogError> {
    if module.slot_cost == 0 {
        return Err(CatalogError::ZeroSlotCost {
            module: module.id.clone(),
        });
    }
    if !module.power_delta.is_finite() {
        return Err(CatalogError::NonFinite {
            module: module.id.clone(),
            field: "power_delta".to_owned(),
        });
    }
    if !(module.build_time.is_finite() && module.build_time > 0.0) {
        return Err(CatalogError::NonPositiveBuildTime {
            module: module.id.clone(),
            build_time: module.build_time,
        });
    }

    for (material, amount) in &module.cost {
        if !materials.contains_key(material) {
            return Err(CatalogError::UnknownCostMaterial {
                module: module.id.clone(),
                material: material.clone(),
            });
        }
        if !(amount.is_finite() && *amount > 0.0) {
            return Err(CatalogError::NonPositiveCost {
                module: module.id.clone(),
                material: material.clone(),
                amount: *amount,
            });
        }
    }

    for (key, delta) in &module.effects {
        if !delta.is_finite() {
            return Err(CatalogError::NonFinite {
                module: module.id.clone(),
                field: format!("effects.{key}"),
            });
        }
    }

    Ok(())
}
