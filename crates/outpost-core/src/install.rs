//! Validation shared by every path that installs a module.
//!
//! Direct installs, queued builds, and event processing all check the
//! same two things: the module is known and absent, and the station stays
//! within budget with it added.

use outpost_catalog::{Catalog, ModuleDef};
use outpost_types::Station;

use crate::error::UniverseError;
use crate::stats::preview_stats_after_add;

/// Look up a module that is not yet installed on the station.
pub fn resolve_module<'c>(
    station: &Station,
    catalog: &'c Catalog,
    module_id: &str,
) -> Result<&'c ModuleDef, UniverseError> {
    let def = catalog
        .module(module_id)
        .ok_or_else(|| UniverseError::ModuleNotFound(module_id.to_owned()))?;
    if station.has_module(module_id) {
        return Err(UniverseError::ModuleAlreadyInstalled {
            station: station.id,
            module: module_id.to_owned(),
        });
    }
    Ok(def)
}

/// Fail with `over_budget` if adding the module would exceed any cap.
pub fn check_budget(station: &Station, catalog: &Catalog, module_id: &str) -> Result<(), UniverseError> {
    let problems = preview_stats_after_add(station, module_id, catalog).budget_problems();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(UniverseError::OverBudget { problems })
    }
}

/// Both checks, in order.
pub fn validate_install<'c>(
    station: &Station,
    catalog: &'c Catalog,
    module_id: &str,
) -> Result<&'c ModuleDef, UniverseError> {
    let def = resolve_module(station, catalog, module_id)?;
    check_budget(station, catalog, module_id)?;
    Ok(def)
}
