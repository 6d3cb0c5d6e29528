//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup, run, and
//! shutdown so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: outpost_core::ConfigError,
    },

    /// The module or material catalog is inconsistent.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: outpost_catalog::CatalogError,
    },

    /// Connecting to or migrating the database failed.
    #[error("database error: {source}")]
    Database {
        /// The underlying database error.
        #[from]
        source: outpost_db::DbError,
    },

    /// The universe engine failed.
    #[error("universe error: {source}")]
    Universe {
        /// The underlying universe error.
        #[from]
        source: outpost_core::UniverseError,
    },

    /// Waiting for the shutdown signal failed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
