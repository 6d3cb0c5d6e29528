//! Fixtures shared by the unit tests in this crate.

use std::collections::BTreeMap;

use outpost_catalog::{
    Catalog, MaterialCategory, MaterialDef, ModuleCategory, ModuleDef, effect,
};
use outpost_types::{Station, StationId, UniverseState, UserId};

fn amounts(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
}

fn module(id: &str, power_delta: f64, build_time: f64, cost: &[(&str, f64)]) -> ModuleDef {
    ModuleDef {
        id: id.to_owned(),
        name: id.to_owned(),
        category: ModuleCategory::Infrastructure,
        power_delta,
        crew_required: 0,
        slot_cost: 1,
        build_time,
        cost: amounts(cost),
        effects: BTreeMap::new(),
    }
}

/// A small catalog with predictable numbers.
///
/// - `frame`: costs 4 `iron_bar`, builds in 60s, draws 1 power.
/// - `generator`: raises `power_cap` by 4.
/// - `drill`: draws 10 power, so it only fits next to a generator.
/// - `bay_a` .. `bay_e`: one slot each, nothing else.
#[allow(clippy::unwrap_used)]
pub fn catalog() -> Catalog {
    let materials = vec![
        MaterialDef::new("iron_ore", "Iron Ore", MaterialCategory::Ore),
        MaterialDef::new("copper_ore", "Copper Ore", MaterialCategory::Ore),
        MaterialDef::new("iron_bar", "Iron Bar", MaterialCategory::Refined),
    ];

    let mut generator = module("generator", 4.0, 30.0, &[("iron_bar", 1.0)]);
    generator.effects = amounts(&[(effect::POWER_CAP, 4.0)]);

    let mut modules = vec![
        module("frame", -1.0, 60.0, &[("iron_bar", 4.0)]),
        generator,
        module("drill", -10.0, 30.0, &[("iron_bar", 1.0)]),
    ];
    for bay in ["bay_a", "bay_b", "bay_c", "bay_d", "bay_e"] {
        modules.push(module(bay, 0.0, 10.0, &[("iron_ore", 1.0)]));
    }

    Catalog::new(materials, modules).unwrap()
}

/// An owned station with the given modules and no inventory.
pub fn station(id: u64, modules: &[&str]) -> Station {
    Station {
        id: StationId::new(id),
        name: format!("Station {id}"),
        owner_user_id: Some(UserId::new(id)),
        system: "Sol".to_owned(),
        x: 0.0,
        y: 0.0,
        credits: 0.0,
        inventory: BTreeMap::new(),
        modules: modules.iter().map(|m| (*m).to_owned()).collect(),
    }
}

/// A document holding a single station.
pub fn state_with(station: Station) -> UniverseState {
    UniverseState {
        stations: vec![station],
        ..UniverseState::default()
    }
}
