//! Starter content and load-time repair of the universe document.

use std::collections::{BTreeMap, BTreeSet};

use outpost_catalog::Catalog;
use outpost_types::{Body, BodyId, BodyType, Station, StationId, UniverseState, UserId};

use crate::config::EconomyConfig;
use crate::events::sort_queue;
use crate::inventory;

fn weights(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
}

/// The fixed set of bodies a fresh universe starts with.
pub fn starter_bodies() -> Vec<Body> {
    vec![
        Body {
            id: BodyId::new(1),
            system: "Sol".to_owned(),
            name: "Sol - Inner Belt".to_owned(),
            body_type: BodyType::AsteroidBelt,
            x: 25.0,
            y: 5.0,
            materials: weights(&[("iron_ore", 0.7), ("copper_ore", 0.2)]),
        },
        Body {
            id: BodyId::new(2),
            system: "Sol".to_owned(),
            name: "Sol - Outer Belt".to_owned(),
            body_type: BodyType::AsteroidBelt,
            x: -40.0,
            y: 10.0,
            materials: weights(&[("iron_ore", 0.5), ("copper_ore", 0.1)]),
        },
    ]
}

/// A new player station carrying the configured starting grants.
pub fn player_station(id: StationId, user: UserId, username: &str, economy: &EconomyConfig) -> Station {
    Station {
        id,
        name: format!("{username}'s Station"),
        owner_user_id: Some(user),
        system: economy.home_system.clone(),
        x: 0.0,
        y: 0.0,
        credits: economy.starting_credits,
        inventory: economy.starting_inventory.clone(),
        modules: Vec::new(),
    }
}

/// Bring one station back to a well-formed shape.
///
/// Prunes the inventory, collapses duplicate module ids (first occurrence
/// wins), and resets a non-finite credit balance to zero. Returns whether
/// anything changed.
pub fn repair_station(station: &mut Station, catalog: &Catalog) -> bool {
    let mut changed = inventory::clean(&mut station.inventory, catalog);

    let mut seen = BTreeSet::new();
    let before = station.modules.len();
    station.modules.retain(|m| seen.insert(m.clone()));
    changed |= station.modules.len() != before;

    if !station.credits.is_finite() {
        station.credits = 0.0;
        changed = true;
    }
    changed
}

/// Repair every station and re-sort the event queue.
///
/// Returns the number of stations that were touched.
pub fn normalize(doc: &mut UniverseState, catalog: &Catalog) -> usize {
    sort_queue(&mut doc.events);
    if !doc.sim_time.is_finite() || doc.sim_time < 0.0 {
        doc.sim_time = 0.0;
    }
    doc.stations
        .iter_mut()
        .map(|station| repair_station(station, catalog))
        .filter(|changed| *changed)
        .count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn starter_bodies_reference_catalog_materials() {
        let catalog = Catalog::standard().unwrap();
        for body in starter_bodies() {
            for material in body.materials.keys() {
                assert!(catalog.is_valid_material(material), "{material}");
            }
        }
    }

    #[test]
    fn player_station_gets_grants() {
        let economy = EconomyConfig::default();
        let station = player_station(StationId::new(3), UserId::new(9), "ada", &economy);
        assert_eq!(station.name, "ada's Station");
        assert_eq!(station.owner_user_id, Some(UserId::new(9)));
        assert!((station.credits - 1000.0).abs() < f64::EPSILON);
        assert!((station.amount_of("iron_ore") - 5.0).abs() < f64::EPSILON);
        assert!((station.amount_of("copper_ore") - 2.0).abs() < f64::EPSILON);
        assert!(station.modules.is_empty());
    }

    #[test]
    fn repair_dedupes_and_prunes() {
        let catalog = testing::catalog();
        let mut station = testing::station(1, &["frame", "bay_a", "frame"]);
        station.inventory.insert("unobtainium".to_owned(), 3.0);
        station.credits = f64::NAN;

        assert!(repair_station(&mut station, &catalog));
        assert_eq!(station.modules, vec!["frame".to_owned(), "bay_a".to_owned()]);
        assert!(station.inventory.is_empty());
        assert!(station.credits.abs() < f64::EPSILON);
        assert!(!repair_station(&mut station, &catalog));
    }

    #[test]
    fn normalize_counts_touched_stations() {
        let catalog = testing::catalog();
        let mut doc = testing::state_with(testing::station(1, &["frame"]));
        let mut dirty = testing::station(2, &["bay_a", "bay_a"]);
        dirty.inventory.insert("iron_ore".to_owned(), 0.0);
        doc.stations.push(dirty);

        assert_eq!(normalize(&mut doc, &catalog), 1);
        assert_eq!(normalize(&mut doc, &catalog), 0);
    }
}
