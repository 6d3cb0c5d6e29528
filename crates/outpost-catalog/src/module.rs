//! Station module definitions.
//!
//! A [`ModuleDef`] is pure data: what a module costs, how long it takes to
//! build, what it demands from the station budget, and which capability
//! caps it raises once installed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known capability keys used in module `effects` and derived caps.
///
/// Effects are an open string-keyed map so new capabilities can be added to
/// the tables without a code change; these constants name the ones the
/// budget rules and the base table know about.
pub mod effect {
    /// Number of module slots available.
    pub const SLOT_CAP: &str = "slot_cap";
    /// Power available to consuming modules.
    pub const POWER_CAP: &str = "power_cap";
    /// Crew berths available.
    pub const CREW_CAP: &str = "crew_cap";
    /// Cargo volume.
    pub const CARGO_CAP: &str = "cargo_cap";
    /// Docking ports.
    pub const DOCK_CAP: &str = "dock_cap";
    /// Defensive rating.
    pub const DEFENSE: &str = "defense";
    /// Sensor tier.
    pub const SCAN_LEVEL: &str = "scan_level";
}

/// Functional grouping of station modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleCategory {
    /// Power, habitation, and storage.
    Infrastructure,
    /// Refining and manufacturing.
    Industry,
    /// Docking and transport.
    Logistics,
    /// Shields and point defense.
    Defense,
    /// Sensors and scanning.
    Info,
}

/// Immutable definition of an installable station module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDef {
    /// Stable identifier stored in a station's module list.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Functional grouping.
    pub category: ModuleCategory,
    /// Power generated (positive) or consumed (negative).
    ///
    /// Only consumption counts toward usage. Generation is expressed through
    /// a `power_cap` entry in [`effects`](Self::effects).
    pub power_delta: f64,
    /// Crew the module needs to operate.
    pub crew_required: u32,
    /// Station slots the module occupies.
    pub slot_cost: u32,
    /// Sim-seconds from queueing to completion.
    pub build_time: f64,
    /// Materials paid up front when a build is queued.
    pub cost: BTreeMap<String, f64>,
    /// Capability deltas added to the station caps while installed.
    pub effects: BTreeMap<String, f64>,
}

impl ModuleDef {
    /// Power this module draws from the station budget.
    ///
    /// Generating modules draw nothing; their output only raises `power_cap`
    /// through their effects.
    pub fn power_draw(&self) -> f64 {
        if self.power_delta < 0.0 {
            -self.power_delta
        } else {
            0.0
        }
    }
}
