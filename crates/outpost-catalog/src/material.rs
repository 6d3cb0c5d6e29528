//! Material definitions.
//!
//! A material definition answers "what is `iron_ore`?", never "how much
//! `iron_ore` does a station hold?". Amounts live in station inventories.

use serde::{Deserialize, Serialize};

/// Broad grouping of materials by processing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    /// Raw extracted ore.
    Ore,
    /// Smelted or otherwise refined stock.
    Refined,
    /// Manufactured parts and components.
    Parts,
}

/// Immutable definition of a material type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Stable identifier referenced by inventories and module costs.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Processing stage.
    pub category: MaterialCategory,
}

impl MaterialDef {
    /// Build a material definition from string slices.
    pub fn new(id: &str, name: &str, category: MaterialCategory) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            category,
        }
    }
}
