//! Derived station capacities, usage, and budget checks.
//!
//! Everything here is a pure function of a station's installed modules and
//! the catalog. Budgets are never stored; they are recomputed on demand.

use std::collections::BTreeMap;

use outpost_catalog::{Catalog, effect};
use outpost_types::Station;
use serde::Serialize;

/// Tolerance applied when comparing usage against caps.
pub const BUDGET_EPSILON: f64 = 1e-9;

/// Capacities every station has before any module is installed.
pub fn base_caps() -> BTreeMap<String, f64> {
    [
        (effect::SLOT_CAP, 4.0),
        (effect::POWER_CAP, 8.0),
        (effect::CREW_CAP, 5.0),
        (effect::CARGO_CAP, 25.0),
        (effect::DOCK_CAP, 0.0),
        (effect::DEFENSE, 0.0),
        (effect::SCAN_LEVEL, 0.0),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_owned(), value))
    .collect()
}

/// Resources demanded by the installed modules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Usage {
    /// Sum of power drawn by consuming modules.
    pub power_used: f64,
    /// Sum of crew required.
    pub crew_used: f64,
    /// Sum of slots occupied.
    pub slots_used: f64,
}

/// Aggregate view of a station's modules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedStats {
    /// Capability key to capacity, base table plus module effects.
    pub caps: BTreeMap<String, f64>,
    /// Resources consumed.
    pub usage: Usage,
    /// Installed module ids that the catalog recognises.
    pub modules: Vec<String>,
}

impl DerivedStats {
    /// Capacity for a capability key, zero when absent.
    pub fn cap(&self, key: &str) -> f64 {
        self.caps.get(key).copied().unwrap_or(0.0)
    }

    /// Every violated budget, formatted as `Label: used / cap`.
    ///
    /// Slots, crew, and power are checked independently and all violations
    /// are reported. An empty list means the station is within budget.
    pub fn budget_problems(&self) -> Vec<String> {
        let checks = [
            ("Slots", self.usage.slots_used, self.cap(effect::SLOT_CAP)),
            ("Crew", self.usage.crew_used, self.cap(effect::CREW_CAP)),
            ("Power", self.usage.power_used, self.cap(effect::POWER_CAP)),
        ];
        checks
            .into_iter()
            .filter(|(_, used, cap)| *used > cap + BUDGET_EPSILON)
            .map(|(label, used, cap)| format!("{label}: {used} / {cap}"))
            .collect()
    }

    /// Whether no budget is exceeded.
    pub fn within_budget(&self) -> bool {
        self.budget_problems().is_empty()
    }
}

/// Compute caps and usage for a station. Unknown module ids are skipped.
pub fn compute_stats(station: &Station, catalog: &Catalog) -> DerivedStats {
    stats_for(station.modules.iter().map(String::as_str), catalog)
}

/// Stats as if `module_id` were appended to the station's modules.
///
/// The station itself is not touched.
pub fn preview_stats_after_add(station: &Station, module_id: &str, catalog: &Catalog) -> DerivedStats {
    stats_for(
        station
            .modules
            .iter()
            .map(String::as_str)
            .chain(core::iter::once(module_id)),
        catalog,
    )
}

fn stats_for<'a>(module_ids: impl Iterator<Item = &'a str>, catalog: &Catalog) -> DerivedStats {
    let mut caps = base_caps();
    let mut usage = Usage::default();
    let mut modules = Vec::new();

    for id in module_ids {
        let Some(def) = catalog.module(id) else {
            continue;
        };
        for (key, delta) in &def.effects {
            *caps.entry(key.clone()).or_insert(0.0) += delta;
        }
        usage.power_used += def.power_draw();
        usage.crew_used += f64::from(def.crew_required);
        usage.slots_used += f64::from(def.slot_cost);
        modules.push(def.id.clone());
    }

    DerivedStats {
        caps,
        usage,
        modules,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn empty_station_has_base_caps() {
        let catalog = Catalog::standard().unwrap();
        let stats = compute_stats(&testing::station(1, &[]), &catalog);
        assert_eq!(stats.caps, base_caps());
        assert_eq!(stats.usage, Usage::default());
        assert!(stats.modules.is_empty());
        assert!(stats.within_budget());
    }

    #[test]
    fn effects_accumulate_and_usage_sums() {
        let catalog = Catalog::standard().unwrap();
        let station = testing::station(1, &["solar_array_1", "basic_refinery_1"]);
        let stats = compute_stats(&station, &catalog);

        let refinery = catalog.module("basic_refinery_1").unwrap();
        assert!((stats.cap(effect::POWER_CAP) - 12.0).abs() < BUDGET_EPSILON);
        assert!((stats.usage.power_used - refinery.power_draw()).abs() < BUDGET_EPSILON);
        assert!((stats.usage.slots_used - 2.0).abs() < BUDGET_EPSILON);
        assert_eq!(stats.modules.len(), 2);
    }

    #[test]
    fn generation_does_not_offset_usage() {
        let catalog = Catalog::standard().unwrap();
        let stats = compute_stats(&testing::station(1, &["solar_array_1"]), &catalog);
        assert!(stats.usage.power_used.abs() < BUDGET_EPSILON);
    }

    #[test]
    fn unknown_modules_are_skipped() {
        let catalog = Catalog::standard().unwrap();
        let stats = compute_stats(&testing::station(1, &["warp_core", "solar_array_1"]), &catalog);
        assert_eq!(stats.modules, vec!["solar_array_1".to_owned()]);
        assert!((stats.usage.slots_used - 1.0).abs() < BUDGET_EPSILON);
    }

    #[test]
    fn preview_does_not_mutate() {
        let catalog = testing::catalog();
        let station = testing::station(1, &["bay_a"]);
        let preview = preview_stats_after_add(&station, "bay_b", &catalog);
        assert!((preview.usage.slots_used - 2.0).abs() < BUDGET_EPSILON);
        assert_eq!(station.modules, vec!["bay_a".to_owned()]);
    }

    #[test]
    fn every_violation_is_reported() {
        let stats = DerivedStats {
            caps: base_caps(),
            usage: Usage {
                power_used: 9.0,
                crew_used: 5.0,
                slots_used: 5.0,
            },
            modules: Vec::new(),
        };
        assert_eq!(
            stats.budget_problems(),
            vec!["Slots: 5 / 4".to_owned(), "Power: 9 / 8".to_owned()]
        );
    }

    #[test]
    fn usage_at_cap_is_within_budget() {
        let stats = DerivedStats {
            caps: base_caps(),
            usage: Usage {
                power_used: 8.0 + BUDGET_EPSILON / 2.0,
                crew_used: 5.0,
                slots_used: 4.0,
            },
            modules: Vec::new(),
        };
        assert!(stats.within_budget());
    }
}
