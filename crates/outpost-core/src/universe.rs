//! [`Universe`]: the engine that owns the document and the lock around it.
//!
//! Every read that must be consistent and every write goes through the
//! single [`tokio::sync::Mutex`] inside [`Universe`]. The live tick loop
//! takes the same lock, so a mutation never interleaves with a tick.
//! Saves happen while the lock is held; only one save is ever in flight.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use outpost_catalog::Catalog;
use outpost_types::{
    Body, Event, EventData, EventId, EventKind, Station, StationId, UniverseState, UserId,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::bootstrap::{normalize, player_station, repair_station, starter_bodies};
use crate::clock::{SystemClock, WallClock};
use crate::config::{EconomyConfig, SimulationConfig, UniverseConfig};
use crate::error::UniverseError;
use crate::events::{enqueue, has_pending_build, next_event_id};
use crate::install::{check_budget, resolve_module, validate_install};
use crate::inventory;
use crate::runner::{self, LoopHandle};
use crate::stats::{DerivedStats, compute_stats};
use crate::store::{StoreError, UniverseStore};
use crate::tick::{self, CatchUpPlan, TickSummary, UniverseMetrics, World};

/// Result of a successful [`Universe::queue_build`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueuedBuild {
    /// Id of the `build_module_complete` event.
    pub event_id: EventId,
    /// Sim time at which the build completes.
    pub finishes_at: f64,
}

/// Result of a successful [`Universe::schedule_install`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledInstall {
    /// Id of the `install_module` event.
    pub event_id: EventId,
    /// Sim time at which the install fires.
    pub fires_at: f64,
}

/// What [`Universe::catch_up`] replayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchUpReport {
    /// Wall seconds the universe was offline.
    pub offline: f64,
    /// Sim seconds actually replayed.
    pub replayed: f64,
    /// Number of `advance` steps taken.
    pub steps: u64,
}

/// A station together with its derived stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationView {
    /// The station record.
    #[serde(flatten)]
    pub station: Station,
    /// Caps, usage, and recognised modules.
    pub derived: DerivedStats,
}

impl StationView {
    fn new(station: Station, catalog: &Catalog) -> Self {
        let derived = compute_stats(&station, catalog);
        Self { station, derived }
    }
}

/// A full snapshot with derived stats attached to every station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniverseView {
    /// Document layout version.
    pub version: u32,
    /// Current sim time.
    pub sim_time: f64,
    /// Stations with stats.
    pub stations: Vec<StationView>,
    /// Bodies.
    pub bodies: Vec<Body>,
    /// Pending events.
    pub events: Vec<Event>,
}

/// State shared between [`Universe`] and its tick loop.
pub(crate) struct Shared<S, C> {
    world: Mutex<World>,
    store: Arc<S>,
    clock: Arc<C>,
    catalog: Arc<Catalog>,
    universe: UniverseConfig,
    economy: EconomyConfig,
}

impl<S: UniverseStore, C: WallClock> Shared<S, C> {
    pub(crate) const fn universe_config(&self) -> &UniverseConfig {
        &self.universe
    }

    /// Write the document and reset the autosave marker.
    async fn persist(&self, world: &mut World) -> Result<(), StoreError> {
        let at = self.clock.now();
        self.store.save(&world.doc, at).await?;
        world.last_update = at;
        world.last_autosave_sim = world.doc.sim_time;
        world.metrics.saves = world.metrics.saves.saturating_add(1);
        debug!(sim_time = world.doc.sim_time, "universe saved");
        Ok(())
    }

    fn advance(&self, world: &mut World, dt: f64) -> TickSummary {
        tick::advance(world, &self.catalog, &self.economy, dt)
    }

    /// One live tick: advance by `tick_dt`, autosave when due.
    pub(crate) async fn live_tick(&self) {
        let mut world = self.world.lock().await;
        self.advance(&mut world, self.universe.tick_dt);
        if world.doc.sim_time - world.last_autosave_sim >= self.universe.autosave_dt {
            if let Err(e) = self.persist(&mut world).await {
                warn!(error = %e, sim_time = world.doc.sim_time, "autosave failed");
            }
        }
    }
}

/// The universe engine.
///
/// Construct with [`Universe::load`], then [`start`](Self::start) the live
/// loop. [`stop`](Self::stop) ends the loop and saves one last time.
pub struct Universe<S, C = SystemClock> {
    shared: Arc<Shared<S, C>>,
    runner: Mutex<Option<LoopHandle>>,
}

impl<S: UniverseStore, C: WallClock> Universe<S, C> {
    /// Load the document from `store` and repair it.
    ///
    /// Inventories are pruned, duplicate modules collapsed, and the event
    /// queue re-sorted. The repaired document is not saved until the next
    /// persist.
    ///
    /// # Errors
    ///
    /// Returns [`UniverseError::Store`] if the document is missing or
    /// unreadable.
    pub async fn load(
        store: Arc<S>,
        clock: Arc<C>,
        catalog: Arc<Catalog>,
        config: &SimulationConfig,
    ) -> Result<Self, UniverseError> {
        let stored = store.load().await?;
        let mut doc = stored.state;
        let repaired = normalize(&mut doc, &catalog);

        info!(
            sim_time = doc.sim_time,
            stations = doc.stations.len(),
            bodies = doc.bodies.len(),
            events = doc.events.len(),
            repaired_stations = repaired,
            last_update = %stored.last_update,
            "universe loaded"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                world: Mutex::new(World::new(doc, stored.last_update)),
                store,
                clock,
                catalog,
                universe: config.universe.clone(),
                economy: config.economy.clone(),
            }),
            runner: Mutex::new(None),
        })
    }

    /// Replay offline time, then start the live tick loop.
    ///
    /// Calling it while the loop is already running only re-runs catch-up,
    /// which replays nothing because catch-up just saved.
    pub async fn start(&self) -> Result<CatchUpReport, UniverseError> {
        let report = self.catch_up().await?;
        let mut slot = self.runner.lock().await;
        if slot.is_none() {
            *slot = Some(runner::spawn(Arc::clone(&self.shared)));
        }
        Ok(report)
    }

    /// Replay up to `catchup_max` seconds of offline time and save.
    ///
    /// Nothing is saved when there is nothing to replay.
    pub async fn catch_up(&self) -> Result<CatchUpReport, UniverseError> {
        let mut world = self.shared.world.lock().await;
        let plan = CatchUpPlan::new(world.last_update, self.shared.clock.now(), &self.shared.universe);

        let mut steps: u64 = 0;
        for dt in plan.steps() {
            self.shared.advance(&mut world, dt);
            steps = steps.saturating_add(1);
        }
        if steps > 0 {
            self.shared.persist(&mut world).await?;
        }

        let report = CatchUpReport {
            offline: plan.offline,
            replayed: plan.replay,
            steps,
        };
        if plan.clamped() {
            warn!(
                offline = plan.offline,
                replayed = plan.replay,
                "offline time exceeds catchup_max, remainder discarded"
            );
        }
        info!(offline = report.offline, replayed = report.replayed, steps, "catch-up complete");
        Ok(report)
    }

    /// Stop the live loop, if running, and save unconditionally.
    pub async fn stop(&self) -> Result<(), UniverseError> {
        let handle = self.runner.lock().await.take();
        if let Some(handle) = handle {
            handle.shutdown().await;
        }
        let mut world = self.shared.world.lock().await;
        self.shared.persist(&mut world).await?;
        info!(sim_time = world.doc.sim_time, "universe stopped");
        Ok(())
    }

    /// Whether the live loop is running.
    pub async fn is_running(&self) -> bool {
        self.runner.lock().await.is_some()
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    /// An independent copy of the whole document.
    pub async fn snapshot(&self) -> UniverseState {
        self.shared.world.lock().await.doc.clone()
    }

    /// Snapshot with derived stats attached to each station.
    pub async fn snapshot_with_stats(&self) -> UniverseView {
        let doc = self.snapshot().await;
        let catalog = &self.shared.catalog;
        UniverseView {
            version: doc.version,
            sim_time: doc.sim_time,
            stations: doc
                .stations
                .into_iter()
                .map(|s| StationView::new(s, catalog))
                .collect(),
            bodies: doc.bodies,
            events: doc.events,
        }
    }

    /// Every station owned by `user`, with stats.
    pub async fn stations_owned_by(&self, user: UserId) -> Vec<StationView> {
        let mine: Vec<Station> = {
            let world = self.shared.world.lock().await;
            world
                .doc
                .stations
                .iter()
                .filter(|s| s.owner_user_id == Some(user))
                .cloned()
                .collect()
        };
        mine.into_iter()
            .map(|s| StationView::new(s, &self.shared.catalog))
            .collect()
    }

    /// A station the user owns, with stats.
    pub async fn owned_station(&self, user: UserId, station: StationId) -> Result<StationView, UniverseError> {
        let found = {
            let world = self.shared.world.lock().await;
            world.doc.station(station).cloned()
        };
        let found = found.ok_or(UniverseError::StationNotFound(station))?;
        if found.owner_user_id != Some(user) {
            return Err(UniverseError::NotStationOwner { station, user });
        }
        Ok(StationView::new(found, &self.shared.catalog))
    }

    /// Derived stats for one station.
    pub async fn station_stats(&self, station: StationId) -> Result<DerivedStats, UniverseError> {
        let world = self.shared.world.lock().await;
        let found = world
            .doc
            .station(station)
            .ok_or(UniverseError::StationNotFound(station))?;
        Ok(compute_stats(found, &self.shared.catalog))
    }

    /// Current sim time.
    pub async fn sim_time(&self) -> f64 {
        self.shared.world.lock().await.doc.sim_time
    }

    /// Engine counters.
    pub async fn metrics(&self) -> UniverseMetrics {
        self.shared.world.lock().await.metrics
    }

    /// The catalog this engine validates against.
    pub fn catalog(&self) -> &Catalog {
        &self.shared.catalog
    }

    /// Wall time of the last successful save.
    pub async fn last_update(&self) -> DateTime<Utc> {
        self.shared.world.lock().await.last_update
    }

    // -----------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------

    /// Advance by `dt` under the lock without saving.
    pub async fn advance(&self, dt: f64) -> TickSummary {
        let mut world = self.shared.world.lock().await;
        self.shared.advance(&mut world, dt)
    }

    /// Advance by `dt`, save, and return the new document.
    pub async fn advance_manual(&self, dt: f64) -> Result<UniverseState, UniverseError> {
        if dt.is_nan() || dt < 0.0 {
            return Err(UniverseError::DtMustBeNonNegative(dt));
        }
        let mut world = self.shared.world.lock().await;
        self.shared.advance(&mut world, dt);
        self.shared.persist(&mut world).await?;
        Ok(world.doc.clone())
    }

    /// Install a module immediately, at no material cost.
    pub async fn install_module_direct(&self, station: StationId, module_id: &str) -> Result<(), UniverseError> {
        let module_id = required_module_id(module_id)?;
        let mut world = self.shared.world.lock().await;
        let target = world
            .doc
            .station_mut(station)
            .ok_or(UniverseError::StationNotFound(station))?;
        validate_install(target, &self.shared.catalog, module_id)?;
        target.modules.push(module_id.to_owned());

        info!(station_id = %station, module_id, "module installed");
        self.shared.persist(&mut world).await?;
        Ok(())
    }

    /// Pay for a module now and install it after its build time.
    ///
    /// All checks run before anything is spent. The resulting event may
    /// still be dropped when it fires if the station no longer has room;
    /// the materials are not refunded in that case.
    pub async fn queue_build(&self, station: StationId, module_id: &str) -> Result<QueuedBuild, UniverseError> {
        let module_id = required_module_id(module_id)?;
        let catalog = Arc::clone(&self.shared.catalog);
        let mut world = self.shared.world.lock().await;
        let doc = &mut world.doc;

        let target = doc
            .station(station)
            .ok_or(UniverseError::StationNotFound(station))?;
        let def = resolve_module(target, &catalog, module_id)?;
        if has_pending_build(&doc.events, station) {
            return Err(UniverseError::BuildInProgress(station));
        }
        check_budget(target, &catalog, module_id)?;
        if !inventory::has_materials(&target.inventory, &def.cost) {
            return Err(UniverseError::InsufficientMaterials {
                station,
                module: module_id.to_owned(),
            });
        }
        next_event_id(&doc.events).ok_or(UniverseError::IdSpaceExhausted)?;

        let finishes_at = doc.sim_time + def.build_time;
        let target = doc
            .station_mut(station)
            .ok_or(UniverseError::StationNotFound(station))?;
        if !inventory::try_spend(&mut target.inventory, &def.cost) {
            return Err(UniverseError::InsufficientMaterials {
                station,
                module: module_id.to_owned(),
            });
        }
        let event_id = enqueue(
            &mut doc.events,
            finishes_at,
            EventKind::BuildModuleComplete,
            EventData::install(station, module_id),
        )
        .ok_or(UniverseError::IdSpaceExhausted)?;

        info!(station_id = %station, module_id, %event_id, finishes_at, "build queued");
        self.shared.persist(&mut world).await?;
        Ok(QueuedBuild {
            event_id,
            finishes_at,
        })
    }

    /// Enqueue an `install_module` event `delay` sim seconds from now.
    ///
    /// Nothing is spent and the module is only validated when the event
    /// fires.
    pub async fn schedule_install(
        &self,
        station: StationId,
        module_id: &str,
        delay: f64,
    ) -> Result<ScheduledInstall, UniverseError> {
        let module_id = required_module_id(module_id)?;
        if delay.is_nan() || delay < 0.0 {
            return Err(UniverseError::DelayMustBeNonNegative(delay));
        }
        let mut world = self.shared.world.lock().await;
        let doc = &mut world.doc;
        if doc.station(station).is_none() {
            return Err(UniverseError::StationNotFound(station));
        }

        let fires_at = doc.sim_time + delay;
        let event_id = enqueue(
            &mut doc.events,
            fires_at,
            EventKind::InstallModule,
            EventData::install(station, module_id),
        )
        .ok_or(UniverseError::IdSpaceExhausted)?;

        debug!(station_id = %station, module_id, %event_id, fires_at, "install scheduled");
        self.shared.persist(&mut world).await?;
        Ok(ScheduledInstall { event_id, fires_at })
    }

    /// Uninstall a module.
    pub async fn remove_module(&self, station: StationId, module_id: &str) -> Result<(), UniverseError> {
        let module_id = required_module_id(module_id)?;
        let mut world = self.shared.world.lock().await;
        let target = world
            .doc
            .station_mut(station)
            .ok_or(UniverseError::StationNotFound(station))?;
        let Some(index) = target.modules.iter().position(|m| m == module_id) else {
            return Err(UniverseError::ModuleNotInstalled {
                station,
                module: module_id.to_owned(),
            });
        };
        target.modules.remove(index);

        info!(station_id = %station, module_id, "module removed");
        self.shared.persist(&mut world).await?;
        Ok(())
    }

    /// Add materials to a station without any budget check.
    ///
    /// Returns the amount now held.
    pub async fn grant_inventory(
        &self,
        station: StationId,
        material_id: &str,
        amount: f64,
    ) -> Result<f64, UniverseError> {
        let material_id = material_id.trim();
        if material_id.is_empty() || !amount.is_finite() || amount <= 0.0 {
            return Err(UniverseError::MaterialIdAndPositiveAmountRequired);
        }
        if !self.shared.catalog.is_valid_material(material_id) {
            return Err(UniverseError::MaterialNotFound(material_id.to_owned()));
        }
        let mut world = self.shared.world.lock().await;
        let target = world
            .doc
            .station_mut(station)
            .ok_or(UniverseError::StationNotFound(station))?;
        inventory::add(&mut target.inventory, material_id, amount);
        let held = target.amount_of(material_id);

        debug!(station_id = %station, material_id, amount, held, "inventory granted");
        self.shared.persist(&mut world).await?;
        Ok(held)
    }

    /// Return the user's station, creating it with starter grants if needed.
    ///
    /// An existing station is repaired in place and saved only if the
    /// repair changed something.
    pub async fn ensure_player_station(&self, user: UserId, username: &str) -> Result<StationId, UniverseError> {
        let mut world = self.shared.world.lock().await;

        let existing = world
            .doc
            .stations
            .iter_mut()
            .find(|s| s.owner_user_id == Some(user))
            .map(|s| (s.id, repair_station(s, &self.shared.catalog)));
        if let Some((id, repaired)) = existing {
            if repaired {
                self.shared.persist(&mut world).await?;
            }
            return Ok(id);
        }

        let id = world.doc.next_station_id().ok_or(UniverseError::IdSpaceExhausted)?;
        world
            .doc
            .stations
            .push(player_station(id, user, username, &self.shared.economy));

        info!(station_id = %id, user_id = %user, "player station created");
        self.shared.persist(&mut world).await?;
        Ok(id)
    }

    /// Populate the starter bodies if the universe has none.
    ///
    /// Returns whether anything was added.
    pub async fn ensure_bootstrap_world(&self) -> Result<bool, UniverseError> {
        let mut world = self.shared.world.lock().await;
        if !world.doc.bodies.is_empty() {
            return Ok(false);
        }
        world.doc.bodies = starter_bodies();

        info!(bodies = world.doc.bodies.len(), "starter bodies created");
        self.shared.persist(&mut world).await?;
        Ok(true)
    }
}

impl<S, C> Drop for Universe<S, C> {
    fn drop(&mut self) {
        if let Some(handle) = self.runner.get_mut().as_ref() {
            handle.abort();
        }
    }
}

fn required_module_id(module_id: &str) -> Result<&str, UniverseError> {
    let trimmed = module_id.trim();
    if trimmed.is_empty() {
        Err(UniverseError::ModuleIdRequired)
    } else {
        Ok(trimmed)
    }
}
