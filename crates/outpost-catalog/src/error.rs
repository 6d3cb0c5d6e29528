//! Error types for catalog construction.
//!
//! Every variant describes a consistency violation in the static tables.
//! These are fatal: the process must not start with a broken catalog.

/// Errors raised while validating the material and module tables.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// Two materials share the same id.
    #[error("duplicate material id: {0}")]
    DuplicateMaterial(String),

    /// Two modules share the same id.
    #[error("duplicate module id: {0}")]
    DuplicateModule(String),

    /// A module cost references a material that is not in the catalog.
    #[error("{module}: unknown material id in cost: {material}")]
    UnknownCostMaterial {
        /// The offending module.
        module: String,
        /// The unknown material id.
        material: String,
    },

    /// A module cost amount is zero, negative, or not finite.
    #[error("{module}: cost {material} must be > 0 (got {amount})")]
    NonPositiveCost {
        /// The offending module.
        module: String,
        /// The material whose amount is invalid.
        material: String,
        /// The rejected amount.
        amount: f64,
    },

    /// A module occupies no slots.
    #[error("{module}: slot_cost must be >= 1")]
    ZeroSlotCost {
        /// The offending module.
        module: String,
    },

    /// A module builds instantly or has a non-finite build time.
    #[error("{module}: build_time must be > 0 (got {build_time})")]
    NonPositiveBuildTime {
        /// The offending module.
        module: String,
        /// The rejected build time.
        build_time: f64,
    },

    /// A numeric module field holds NaN or infinity.
    #[error("{module}: {field} must be finite")]
    NonFinite {
        /// The offending module.
        module: String,
        /// Name of the field, or `effects.<key>` for an effect entry.
        field: String,
    },

    /// An id is empty or surrounded by whitespace.
    #[error("invalid catalog id: {0:?}")]
    InvalidId(String),
}
