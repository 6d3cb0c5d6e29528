//! The `advance` step, due-event processing, and catch-up planning.
//!
//! [`advance`] is the only place simulation time moves forward. Catch-up
//! after downtime and the live loop both call it, so a second of sim time
//! behaves the same no matter which path produced it.

use chrono::{DateTime, Utc};
use outpost_catalog::Catalog;
use outpost_types::{Event, EventKind, UniverseState};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{EconomyConfig, UniverseConfig};
use crate::error::UniverseError;
use crate::events::take_due;
use crate::install::validate_install;

/// Remainders shorter than this are not replayed during catch-up.
pub const CATCHUP_EPSILON: f64 = 1e-6;

/// Monotonic engine counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UniverseMetrics {
    /// Calls to [`advance`] that moved time.
    pub ticks: u64,
    /// Successful saves.
    pub saves: u64,
    /// Events that installed their module.
    pub events_processed: u64,
    /// Events discarded without effect.
    pub events_dropped: u64,
}

/// Everything the engine lock protects.
#[derive(Debug, Clone)]
pub struct World {
    /// The universe document.
    pub doc: UniverseState,
    /// Wall time of the last successful save.
    pub last_update: DateTime<Utc>,
    /// `sim_time` at the last autosave.
    pub last_autosave_sim: f64,
    /// Counters.
    pub metrics: UniverseMetrics,
}

impl World {
    /// Wrap a freshly loaded document.
    pub fn new(doc: UniverseState, last_update: DateTime<Utc>) -> Self {
        let last_autosave_sim = doc.sim_time;
        Self {
            doc,
            last_update,
            last_autosave_sim,
            metrics: UniverseMetrics::default(),
        }
    }
}

/// Outcome of one [`advance`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickSummary {
    /// `sim_time` after the step.
    pub sim_time: f64,
    /// Events that installed a module.
    pub installed: u64,
    /// Events that were dropped.
    pub dropped: u64,
}

/// Why a due event was discarded.
#[derive(Debug, thiserror::Error)]
pub enum DropReason {
    /// The event's type tag is not one this build handles.
    #[error("unknown event type")]
    UnknownKind,

    /// The payload lacks the station or module an install needs.
    #[error("event data is missing station_id or module_id")]
    MalformedData,

    /// The install failed validation at firing time.
    #[error("{0}")]
    Rejected(#[from] UniverseError),
}

/// Move simulation time forward by `dt` seconds.
///
/// A no-op unless `dt > 0`. Pays passive income to owned stations in
/// proportion to `dt`, then fires every event that has come due.
pub fn advance(
    world: &mut World,
    catalog: &Catalog,
    economy: &EconomyConfig,
    dt: f64,
) -> TickSummary {
    if dt.is_nan() || dt <= 0.0 {
        return TickSummary {
            sim_time: world.doc.sim_time,
            ..TickSummary::default()
        };
    }

    world.doc.sim_time += dt;
    let income = economy.passive_income_per_sec * dt;
    for station in world.doc.stations.iter_mut().filter(|s| s.is_owned()) {
        station.credits += income;
    }
    world.metrics.ticks = world.metrics.ticks.saturating_add(1);

    let summary = process_due_events(world, catalog);
    debug!(
        sim_time = summary.sim_time,
        installed = summary.installed,
        dropped = summary.dropped,
        "advanced"
    );
    summary
}

/// Fire every event due at the current `sim_time`, in queue order.
///
/// Each event is removed before it is applied and is never retried. An
/// event that can no longer be applied is dropped with a warning; one
/// failure never stops the events behind it. Materials spent when a build
/// was queued are not refunded.
pub fn process_due_events(world: &mut World, catalog: &Catalog) -> TickSummary {
    let due = take_due(&mut world.doc.events, world.doc.sim_time);
    let mut summary = TickSummary {
        sim_time: world.doc.sim_time,
        ..TickSummary::default()
    };

    for event in due {
        match apply_event(&mut world.doc, catalog, &event) {
            Ok(()) => {
                summary.installed = summary.installed.saturating_add(1);
                world.metrics.events_processed = world.metrics.events_processed.saturating_add(1);
            }
            Err(reason) => {
                warn!(
                    event_id = %event.id,
                    event_type = %event.kind,
                    station_id = ?event.data.station_id,
                    module_id = ?event.data.module_id,
                    reason = %reason,
                    "dropping event"
                );
                summary.dropped = summary.dropped.saturating_add(1);
                world.metrics.events_dropped = world.metrics.events_dropped.saturating_add(1);
            }
        }
    }
    summary
}

fn apply_event(doc: &mut UniverseState, catalog: &Catalog, event: &Event) -> Result<(), DropReason> {
    match event.known_kind() {
        Some(EventKind::BuildModuleComplete | EventKind::InstallModule) => {}
        None => return Err(DropReason::UnknownKind),
    }

    let (station_id, module_id) = event
        .data
        .install_target()
        .ok_or(DropReason::MalformedData)?;
    let station = doc
        .station_mut(station_id)
        .ok_or(UniverseError::StationNotFound(station_id))?;
    let module_id = module_id.trim();
    validate_install(station, catalog, module_id)?;
    station.modules.push(module_id.to_owned());
    Ok(())
}

/// How much offline time to replay, and in what steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchUpPlan {
    /// Wall seconds since the last save, floored at zero.
    pub offline: f64,
    /// Seconds that will actually be replayed, at most `catchup_max`.
    pub replay: f64,
    tick_dt: f64,
}

impl CatchUpPlan {
    /// Plan catch-up for the gap between `last_update` and `now`.
    pub fn new(last_update: DateTime<Utc>, now: DateTime<Utc>, config: &UniverseConfig) -> Self {
        let offline = ((now - last_update).num_milliseconds() as f64 / 1000.0).max(0.0);
        Self {
            offline,
            replay: offline.min(config.catchup_max.max(0.0)),
            tick_dt: config.tick_dt,
        }
    }

    /// Whether the replay was shortened by `catchup_max`.
    pub fn clamped(&self) -> bool {
        self.offline > self.replay
    }

    /// Step sizes: whole `tick_dt` steps, then one partial step for the rest.
    pub fn steps(&self) -> impl Iterator<Item = f64> + use<> {
        let tick_dt = self.tick_dt;
        let mut remaining = if tick_dt > 0.0 { self.replay } else { 0.0 };
        core::iter::from_fn(move || {
            if remaining <= CATCHUP_EPSILON {
                return None;
            }
            let step = remaining.min(tick_dt);
            remaining -= step;
            Some(step)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;
    use outpost_types::{EventData, StationId, UserId};

    use super::*;
    use crate::events::enqueue;
    use crate::testing;

    fn world_with(station: outpost_types::Station) -> World {
        World::new(testing::state_with(station), DateTime::UNIX_EPOCH)
    }

    fn install_event(world: &mut World, at: f64, kind: EventKind, module: &str) {
        enqueue(
            &mut world.doc.events,
            at,
            kind,
            EventData::install(StationId::new(1), module),
        )
        .unwrap();
    }

    #[test]
    fn zero_and_negative_dt_are_no_ops() {
        let catalog = testing::catalog();
        let economy = EconomyConfig::default();
        let mut world = world_with(testing::station(1, &[]));

        advance(&mut world, &catalog, &economy, 5.0);
        let after = world.doc.clone();
        advance(&mut world, &catalog, &economy, 0.0);
        advance(&mut world, &catalog, &economy, -3.0);
        advance(&mut world, &catalog, &economy, f64::NAN);
        assert_eq!(world.doc, after);
        assert_eq!(world.metrics.ticks, 1);
    }

    #[test]
    fn income_goes_to_owned_stations_only() {
        let catalog = testing::catalog();
        let economy = EconomyConfig::default();
        let mut world = world_with(testing::station(1, &[]));
        let mut npc = testing::station(2, &[]);
        npc.owner_user_id = None;
        world.doc.stations.push(npc);

        advance(&mut world, &catalog, &economy, 10.0);
        assert!((world.doc.stations[0].credits - 1.0).abs() < 1e-9);
        assert!(world.doc.stations[1].credits.abs() < 1e-9);
    }

    #[test]
    fn due_event_installs_module() {
        let catalog = testing::catalog();
        let mut world = world_with(testing::station(1, &[]));
        install_event(&mut world, 2.0, EventKind::BuildModuleComplete, "frame");

        let summary = advance(&mut world, &catalog, &EconomyConfig::default(), 1.0);
        assert_eq!(summary.installed, 0);
        let summary = advance(&mut world, &catalog, &EconomyConfig::default(), 1.0);
        assert_eq!(summary.installed, 1);
        assert_eq!(world.doc.stations[0].modules, vec!["frame".to_owned()]);
        assert!(world.doc.events.is_empty());
    }

    #[test]
    fn bad_events_are_dropped_without_stopping_the_rest() {
        let catalog = testing::catalog();
        let mut world = world_with(testing::station(1, &["bay_a"]));
        install_event(&mut world, 1.0, EventKind::InstallModule, "bay_a");
        install_event(&mut world, 1.0, EventKind::InstallModule, "warp_core");
        install_event(&mut world, 1.0, EventKind::InstallModule, "bay_b");
        world.doc.events[0].kind = "mine_asteroid".to_owned();

        let summary = advance(&mut world, &catalog, &EconomyConfig::default(), 1.0);
        assert_eq!(summary.dropped, 2);
        assert_eq!(summary.installed, 1);
        assert_eq!(world.metrics.events_dropped, 2);
        assert_eq!(world.metrics.events_processed, 1);
        assert_eq!(
            world.doc.stations[0].modules,
            vec!["bay_a".to_owned(), "bay_b".to_owned()]
        );
        assert!(world.doc.events.is_empty());
    }

    #[test]
    fn event_for_missing_station_is_dropped() {
        let catalog = testing::catalog();
        let mut world = world_with(testing::station(1, &[]));
        world.doc.stations[0].id = StationId::new(5);
        world.doc.stations[0].owner_user_id = Some(UserId::new(5));
        install_event(&mut world, 0.5, EventKind::InstallModule, "frame");

        let summary = advance(&mut world, &catalog, &EconomyConfig::default(), 1.0);
        assert_eq!(summary.dropped, 1);
    }

    #[test]
    fn long_outage_is_clamped() {
        let config = UniverseConfig::default();
        let last = DateTime::UNIX_EPOCH;
        let plan = CatchUpPlan::new(last, last + TimeDelta::seconds(1000), &config);
        assert!(plan.clamped());
        assert!((plan.replay - 300.0).abs() < 1e-9);
        assert_eq!(plan.steps().count(), 300);
        assert!((plan.steps().sum::<f64>() - 300.0).abs() < 1e-6);
    }

    #[test]
    fn partial_step_covers_remainder() {
        let config = UniverseConfig::default();
        let last = DateTime::UNIX_EPOCH;
        let plan = CatchUpPlan::new(last, last + TimeDelta::milliseconds(2500), &config);
        let steps: Vec<f64> = plan.steps().collect();
        assert_eq!(steps.len(), 3);
        assert!((steps[2] - 0.5).abs() < 1e-9);
        assert!(!plan.clamped());
    }

    #[test]
    fn clock_skew_replays_nothing() {
        let config = UniverseConfig::default();
        let now = DateTime::UNIX_EPOCH + TimeDelta::seconds(100);
        let plan = CatchUpPlan::new(now, DateTime::UNIX_EPOCH, &config);
        assert!(plan.offline.abs() < f64::EPSILON);
        assert_eq!(plan.steps().count(), 0);
    }

    #[test]
    fn catch_up_matches_live_ticking() {
        let catalog = testing::catalog();
        let economy = EconomyConfig::default();
        let config = UniverseConfig::default();

        let mut caught_up = world_with(testing::station(1, &[]));
        install_event(&mut caught_up, 1.5, EventKind::InstallModule, "frame");
        let mut live = caught_up.clone();

        let last = DateTime::UNIX_EPOCH;
        let plan = CatchUpPlan::new(last, last + TimeDelta::milliseconds(2500), &config);
        for dt in plan.steps() {
            advance(&mut caught_up, &catalog, &economy, dt);
        }
        for dt in [1.0, 1.0, 0.5] {
            advance(&mut live, &catalog, &economy, dt);
        }
        assert_eq!(caught_up.doc, live.doc);
    }
}
