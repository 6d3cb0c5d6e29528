//! Static reference data for the Outpost universe.
//!
//! The catalog is the single source of truth for which materials exist and
//! which modules a station can install. It is built once at process start,
//! validated for internal consistency, and never mutated afterwards.
//!
//! # Modules
//!
//! - [`material`] -- [`MaterialDef`] and its category.
//! - [`module`] -- [`ModuleDef`], module categories, and the well-known
//!   capability keys used in module `effects`.
//! - [`standard`] -- The shipped material and module tables.
//! - [`error`] -- [`CatalogError`] raised when the tables are inconsistent.
//!
//! [`MaterialDef`]: material::MaterialDef
//! [`ModuleDef`]: module::ModuleDef
//! [`CatalogError`]: error::CatalogError

pub mod error;
pub mod material;
pub mod module;
pub mod standard;

mod catalog;

pub use catalog::Catalog;
pub use error::CatalogError;
pub use material::{MaterialCategory, MaterialDef};
pub use module::{ModuleCategory, ModuleDef, effect};
