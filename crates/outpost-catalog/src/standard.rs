//! The shipped material and module tables.
//!
//! These functions return raw tables; [`Catalog::standard`] validates them.
//! Values are tuned for the early game: every module fits a bare station's
//! base budget on its own, but not all of them at once.
//!
//! [`Catalog::standard`]: crate::Catalog::standard

use std::collections::BTreeMap;

use crate::material::{MaterialCategory, MaterialDef};
use crate::module::{ModuleCategory, ModuleDef, effect};

/// Build an owned `material -> amount` map from a literal table.
fn amounts(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(id, amount)| ((*id).to_owned(), *amount))
        .collect()
}

/// The canonical material list.
pub fn materials() -> Vec<MaterialDef> {
    vec![
        // ---- Ore ----
        MaterialDef::new("iron_ore", "Iron Ore", MaterialCategory::Ore),
        MaterialDef::new("copper_ore", "Copper Ore", MaterialCategory::Ore),
        // ---- Refined ----
        MaterialDef::new("iron_bar", "Iron Bar", MaterialCategory::Refined),
        MaterialDef::new("copper_bar", "Copper Bar", MaterialCategory::Refined),
        MaterialDef::new("glass_pane", "Glass Pane", MaterialCategory::Refined),
        MaterialDef::new("alloy_plate", "Alloy Plate", MaterialCategory::Refined),
        // ---- Parts ----
        MaterialDef::new("computer_chip", "Computer Chip", MaterialCategory::Parts),
        MaterialDef::new("computer_screen", "Computer Screen", MaterialCategory::Parts),
        MaterialDef::new("parts_basic", "Basic Parts", MaterialCategory::Parts),
    ]
}

/// The canonical module list.
#[allow(clippy::too_many_lines)] // One literal per module; splitting would obscure the table.
pub fn modules() -> Vec<ModuleDef> {
    vec![
        // ---- Infrastructure ----
        ModuleDef {
            id: "solar_array_1".to_owned(),
            name: "Solar Array I".to_owned(),
            category: ModuleCategory::Infrastructure,
            power_delta: 4.0,
            crew_required: 0,
            slot_cost: 1,
            build_time: 60.0,
            cost: amounts(&[("iron_bar", 4.0), ("copper_bar", 2.0), ("glass_pane", 2.0)]),
            effects: amounts(&[(effect::POWER_CAP, 4.0)]),
        },
        ModuleDef {
            id: "habitat_pod_1".to_owned(),
            name: "Habitat Pod I".to_owned(),
            category: ModuleCategory::Infrastructure,
            power_delta: -1.0,
            crew_required: 0,
            slot_cost: 1,
            build_time: 90.0,
            cost: amounts(&[("iron_bar", 4.0), ("glass_pane", 2.0), ("alloy_plate", 1.0)]),
            effects: amounts(&[(effect::CREW_CAP, 5.0)]),
        },
        ModuleDef {
            id: "storage_bay_1".to_owned(),
            name: "Storage Bay I".to_owned(),
            category: ModuleCategory::Infrastructure,
            power_delta: -1.0,
            crew_required: 0,
            slot_cost: 1,
            build_time: 90.0,
            cost: amounts(&[("iron_bar", 6.0), ("alloy_plate", 2.0)]),
            effects: amounts(&[(effect::CARGO_CAP, 50.0)]),
        },
        // ---- Logistics / Info ----
        ModuleDef {
            id: "docking_clamp_1".to_owned(),
            name: "Docking Clamp I".to_owned(),
            category: ModuleCategory::Logistics,
            power_delta: -1.0,
            crew_required: 1,
            slot_cost: 1,
            build_time: 120.0,
            cost: amounts(&[
                ("iron_bar", 4.0),
                ("alloy_plate", 2.0),
                ("computer_chip", 1.0),
            ]),
            effects: amounts(&[(effect::DOCK_CAP, 1.0)]),
        },
        ModuleDef {
            id: "scanner_array_1".to_owned(),
            name: "Scanner Array I".to_owned(),
            category: ModuleCategory::Info,
            power_delta: -2.0,
            crew_required: 1,
            slot_cost: 1,
            build_time: 120.0,
            cost: amounts(&[
                ("iron_bar", 2.0),
                ("copper_bar", 2.0),
                ("computer_chip", 2.0),
                ("computer_screen", 1.0),
            ]),
            effects: amounts(&[(effect::SCAN_LEVEL, 1.0)]),
        },
        // ---- Industry ----
        ModuleDef {
            id: "basic_refinery_1".to_owned(),
            name: "Basic Refinery I".to_owned(),
            category: ModuleCategory::Industry,
            power_delta: -3.0,
            crew_required: 2,
            slot_cost: 1,
            build_time: 180.0,
            cost: amounts(&[
                ("iron_bar", 6.0),
                ("copper_bar", 2.0),
                ("alloy_plate", 2.0),
                ("computer_chip", 1.0),
            ]),
            effects: amounts(&[("refine_level", 1.0)]),
        },
        ModuleDef {
            id: "workshop_1".to_owned(),
            name: "Workshop I".to_owned(),
            category: ModuleCategory::Industry,
            power_delta: -3.0,
            crew_required: 2,
            slot_cost: 1,
            build_time: 180.0,
            cost: amounts(&[
                ("iron_bar", 4.0),
                ("copper_bar", 2.0),
                ("alloy_plate", 2.0),
                ("computer_chip", 2.0),
                ("computer_screen", 1.0),
            ]),
            effects: amounts(&[("manufacture_level", 1.0)]),
        },
        // ---- Defense ----
        ModuleDef {
            id: "shield_emitter_1".to_owned(),
            name: "Shield Emitter I".to_owned(),
            category: ModuleCategory::Defense,
            power_delta: -3.0,
            crew_required: 1,
            slot_cost: 1,
            build_time: 180.0,
            cost: amounts(&[
                ("alloy_plate", 4.0),
                ("copper_bar", 2.0),
                ("computer_chip", 2.0),
            ]),
            effects: amounts(&[(effect::DEFENSE, 10.0)]),
        },
        ModuleDef {
            id: "point_defense_1".to_owned(),
            name: "Point Defense I".to_owned(),
            category: ModuleCategory::Defense,
            power_delta: -2.0,
            crew_required: 1,
            slot_cost: 1,
            build_time: 150.0,
            cost: amounts(&[
                ("iron_bar", 4.0),
                ("alloy_plate", 2.0),
                ("computer_chip", 1.0),
            ]),
            effects: amounts(&[(effect::DEFENSE, 6.0)]),
        },
    ]
}
