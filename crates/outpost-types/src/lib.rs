//! Shared type definitions for the Outpost universe.
//!
//! This crate defines the persisted universe document and the records it
//! contains. The document is stored as a single JSON value, so the serde
//! shape of these types is part of the storage contract. Types flow to
//! `TypeScript` via `ts-rs` for the web client.
//!
//! # Modules
//!
//! - [`ids`] -- Integer id newtypes for stations, bodies, events, and users
//! - [`enums`] -- Body types and event kinds
//! - [`structs`] -- [`Station`], [`Body`], [`Event`], and [`UniverseState`]

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::{BodyType, EventKind};
pub use ids::{BodyId, EventId, StationId, UserId};
pub use structs::{Body, Event, EventData, Station, UNIVERSE_SCHEMA_VERSION, UniverseState};
