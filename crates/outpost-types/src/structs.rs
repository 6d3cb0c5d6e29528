//! Core records of the universe document.
//!
//! [`UniverseState`] is the single persisted aggregate. Everything else in
//! this module is owned by it. Fields that older documents may lack carry
//! serde defaults so legacy saves load without hand-written migrations.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::enums::{BodyType, EventKind};
use crate::ids::{BodyId, EventId, StationId, UserId};

/// Current version of the persisted document layout.
pub const UNIVERSE_SCHEMA_VERSION: u32 = 1;

const fn default_version() -> u32 {
    UNIVERSE_SCHEMA_VERSION
}

/// Read an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Station
// ---------------------------------------------------------------------------

/// A station owned by a player or left to the NPC side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Station {
    /// Unique station id.
    pub id: StationId,
    /// Display name.
    pub name: String,
    /// Owning user; `None` for unowned or NPC stations.
    #[serde(default)]
    pub owner_user_id: Option<UserId>,
    /// Zone name, e.g. `Sol`.
    pub system: String,
    /// Advisory x coordinate.
    #[serde(default)]
    pub x: f64,
    /// Advisory y coordinate.
    #[serde(default)]
    pub y: f64,
    /// Credit balance. Never clamped.
    #[serde(default, deserialize_with = "null_as_default")]
    pub credits: f64,
    /// Material id to amount held.
    #[serde(default, deserialize_with = "null_as_default")]
    pub inventory: BTreeMap<String, f64>,
    /// Installed module ids, without duplicates.
    #[serde(default, deserialize_with = "null_as_default")]
    pub modules: Vec<String>,
}

impl Station {
    /// Whether the given module id is installed.
    pub fn has_module(&self, module_id: &str) -> bool {
        self.modules.iter().any(|m| m == module_id)
    }

    /// Whether a user owns this station.
    pub const fn is_owned(&self) -> bool {
        self.owner_user_id.is_some()
    }

    /// Amount of a material held, zero when absent.
    pub fn amount_of(&self, material_id: &str) -> f64 {
        self.inventory.get(material_id).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// A celestial body or resource site. Immutable after bootstrap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Body {
    /// Unique body id.
    pub id: BodyId,
    /// Zone name.
    pub system: String,
    /// Display name.
    pub name: String,
    /// Kind of body.
    #[serde(rename = "type")]
    pub body_type: BodyType,
    /// Advisory x coordinate.
    pub x: f64,
    /// Advisory y coordinate.
    pub y: f64,
    /// Relative extraction weights per material id (not amounts).
    #[serde(default)]
    pub materials: BTreeMap<String, f64>,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// Payload of an event.
///
/// Install events carry `station_id` and `module_id`. Both are optional on
/// the wire so an event written by another build still loads; any other
/// keys are kept in [`extra`](Self::extra) and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventData {
    /// Station the event applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_id: Option<StationId>,
    /// Module to install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,
    /// Keys this build does not interpret.
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl EventData {
    /// Payload for installing `module_id` on `station_id`.
    pub fn install(station_id: StationId, module_id: &str) -> Self {
        Self {
            station_id: Some(station_id),
            module_id: Some(module_id.to_owned()),
            extra: BTreeMap::new(),
        }
    }

    /// The station and module of an install payload, if both are present.
    pub fn install_target(&self) -> Option<(StationId, &str)> {
        Some((self.station_id?, self.module_id.as_deref()?))
    }
}

/// A deferred action that fires once sim time reaches [`time`](Self::time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Unique event id.
    pub id: EventId,
    /// Sim time at which the event becomes due.
    pub time: f64,
    /// Stored kind tag; see [`EventKind`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Action payload.
    #[serde(default)]
    pub data: EventData,
}

impl Event {
    /// The parsed kind, or `None` for a tag this build does not know.
    pub fn known_kind(&self) -> Option<EventKind> {
        EventKind::from_tag(&self.kind)
    }
}

// ---------------------------------------------------------------------------
// UniverseState
// ---------------------------------------------------------------------------

/// The whole persisted universe.
///
/// `sim_time` is the single clock every other time field is relative to
/// and only ever increases. `events` is kept sorted ascending by
/// `(time, id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UniverseState {
    /// Document layout version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Simulated seconds since the universe began.
    #[serde(default)]
    pub sim_time: f64,
    /// All stations, in creation order.
    #[serde(default)]
    pub stations: Vec<Station>,
    /// All bodies, in creation order.
    #[serde(default)]
    pub bodies: Vec<Body>,
    /// Pending events, sorted by due time.
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Default for UniverseState {
    fn default() -> Self {
        Self {
            version: UNIVERSE_SCHEMA_VERSION,
            sim_time: 0.0,
            stations: Vec::new(),
            bodies: Vec::new(),
            events: Vec::new(),
        }
    }
}

impl UniverseState {
    /// Find a station by id.
    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Find a station by id for mutation.
    pub fn station_mut(&mut self, id: StationId) -> Option<&mut Station> {
        self.stations.iter_mut().find(|s| s.id == id)
    }

    /// Find the station owned by a user.
    pub fn station_owned_by(&self, user: UserId) -> Option<&Station> {
        self.stations.iter().find(|s| s.owner_user_id == Some(user))
    }

    /// The id a newly created station receives: `max + 1`, or 1 when empty.
    ///
    /// Returns `None` only if the largest existing id is `u64::MAX`.
    pub fn next_station_id(&self) -> Option<StationId> {
        self.stations
            .iter()
            .map(|s| s.id)
            .max()
            .map_or(Some(StationId::FIRST), StationId::next)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn station(id: u64) -> Station {
        Station {
            id: StationId::new(id),
            name: format!("Station {id}"),
            owner_user_id: None,
            system: "Sol".to_owned(),
            x: 0.0,
            y: 0.0,
            credits: 0.0,
            inventory: BTreeMap::new(),
            modules: Vec::new(),
        }
    }

    #[test]
    fn legacy_station_gets_defaults() {
        let json = r#"{"id": 3, "name": "Old", "owner_user_id": 9, "system": "Sol", "x": 1.5, "y": 2}"#;
        let st: Station = serde_json::from_str(json).unwrap();
        assert_eq!(st.id, StationId::new(3));
        assert_eq!(st.owner_user_id, Some(UserId::new(9)));
        assert!(st.inventory.is_empty());
        assert!(st.modules.is_empty());
        assert!(st.credits.abs() < f64::EPSILON);
    }

    #[test]
    fn event_kind_is_stored_under_type() {
        let event = Event {
            id: EventId::new(1),
            time: 60.0,
            kind: EventKind::BuildModuleComplete.tag().to_owned(),
            data: EventData::install(StationId::new(2), "solar_array_1"),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "build_module_complete");
        assert_eq!(value["data"]["station_id"], 2);
        assert_eq!(event.known_kind(), Some(EventKind::BuildModuleComplete));
    }

    #[test]
    fn null_station_fields_load_as_defaults() {
        let json = r#"{"id": 1, "name": "Old", "system": "Sol", "credits": null, "inventory": null, "modules": null}"#;
        let st: Station = serde_json::from_str(json).unwrap();
        assert!(st.credits.abs() < f64::EPSILON);
        assert!(st.inventory.is_empty());
        assert!(st.modules.is_empty());
    }

    #[test]
    fn foreign_event_payload_loads_and_round_trips() {
        let json = r#"{"events": [
            {"id": 1, "time": 5.0, "type": "mine_asteroid", "data": {"station_id": 1, "body_id": 2}},
            {"id": 2, "time": 6.0, "type": "build_module_complete",
             "data": {"station_id": 1, "module_id": "solar_array_1", "queued_by": 7}}
        ]}"#;
        let original: serde_json::Value = serde_json::from_str(json).unwrap();
        let state: UniverseState = serde_json::from_value(original.clone()).unwrap();

        let mining = &state.events[0].data;
        assert_eq!(mining.station_id, Some(StationId::new(1)));
        assert_eq!(mining.module_id, None);
        assert_eq!(mining.install_target(), None);
        assert_eq!(mining.extra["body_id"], 2);

        let build = &state.events[1].data;
        assert_eq!(build.install_target(), Some((StationId::new(1), "solar_array_1")));

        let written = serde_json::to_value(&state).unwrap();
        assert_eq!(written["events"], original["events"]);
    }

    #[test]
    fn event_without_data_loads() {
        let json = r#"{"id": 3, "time": 1.0, "type": "install_module"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.data, EventData::default());
    }

    #[test]
    fn empty_document_loads_with_defaults() {
        let state: UniverseState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, UniverseState::default());
        assert_eq!(state.version, UNIVERSE_SCHEMA_VERSION);
    }

    #[test]
    fn document_round_trips() {
        let mut state = UniverseState::default();
        state.sim_time = 42.25;
        let mut st = station(1);
        st.inventory.insert("iron_bar".to_owned(), 6.0);
        st.modules.push("solar_array_1".to_owned());
        state.stations.push(st);
        state.bodies.push(Body {
            id: BodyId::new(1),
            system: "Sol".to_owned(),
            name: "Sol - Inner Belt".to_owned(),
            body_type: BodyType::AsteroidBelt,
            x: 25.0,
            y: 5.0,
            materials: BTreeMap::from([("iron_ore".to_owned(), 0.7)]),
        });

        let text = serde_json::to_string(&state).unwrap();
        let back: UniverseState = serde_json::from_str(&text).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn next_station_id_is_max_plus_one() {
        let mut state = UniverseState::default();
        assert_eq!(state.next_station_id(), Some(StationId::FIRST));
        state.stations.push(station(4));
        state.stations.push(station(2));
        assert_eq!(state.next_station_id(), Some(StationId::new(5)));
    }

    #[test]
    fn lookups_by_owner() {
        let mut state = UniverseState::default();
        let mut owned = station(1);
        owned.owner_user_id = Some(UserId::new(77));
        state.stations.push(station(2));
        state.stations.push(owned);
        assert_eq!(
            state.station_owned_by(UserId::new(77)).map(|s| s.id),
            Some(StationId::new(1))
        );
        assert!(state.station_owned_by(UserId::new(78)).is_none());
    }
}
