//! Universe engine for the Outpost simulation.
//!
//! This crate owns the in-memory universe document and everything that
//! moves it forward: the tick primitive, bounded catch-up after downtime,
//! the live tick loop, the time-ordered event queue, and the
//! budget-checked mutation API that every write path funnels through.
//!
//! # Modules
//!
//! - [`bootstrap`] -- Starter bodies, player stations, and load-time repair.
//! - [`clock`] -- [`WallClock`] abstraction over real time.
//! - [`config`] -- Configuration loading from `outpost-config.yaml`.
//! - [`error`] -- [`UniverseError`] and its stable error codes.
//! - [`events`] -- Event queue operations over the document's `events`.
//! - [`install`] -- Checks shared by every path that installs a module.
//! - [`inventory`] -- Spending, granting, and pruning station inventories.
//! - [`stats`] -- Derived station capacities, usage, and budget checks.
//! - [`store`] -- [`UniverseStore`] persistence seam and an in-memory store.
//! - [`tick`] -- The `advance` step, event processing, and catch-up planning.
//! - [`universe`] -- [`Universe`], the lock-owning engine and mutation API.
//!
//! [`WallClock`]: clock::WallClock
//! [`UniverseError`]: error::UniverseError
//! [`UniverseStore`]: store::UniverseStore
//! [`Universe`]: universe::Universe

pub mod bootstrap;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod install;
pub mod inventory;
pub mod stats;
pub mod store;
pub mod tick;
pub mod universe;

mod runner;

#[cfg(test)]
mod testing;

pub use clock::{ManualClock, SystemClock, WallClock};
pub use config::{ConfigError, SimulationConfig};
pub use error::{ErrorKind, UniverseError};
pub use stats::DerivedStats;
pub use store::{MemoryStore, StoreError, StoredUniverse, UniverseStore};
pub use tick::{TickSummary, UniverseMetrics};
pub use universe::{
    CatchUpReport, QueuedBuild, ScheduledInstall, StationView, Universe, UniverseView,
};
