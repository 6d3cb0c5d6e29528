//! `PostgreSQL` storage for the Outpost universe.
//!
//! The engine persists exactly one document. This crate provides the
//! connection pool, the migration that creates and seeds the
//! `universe_state` table, and [`PgUniverseStore`], the
//! [`UniverseStore`](outpost_core::UniverseStore) implementation the
//! engine binary uses.
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`universe_store`] -- Load and save of the universe row
//! - [`error`] -- Shared error types

pub mod error;
pub mod postgres;
pub mod universe_store;

pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use universe_store::{PgUniverseStore, UniverseRow};
