//! Error types for the `outpost-core` crate.
//!
//! Every mutation of the universe returns [`UniverseError`] on failure.
//! Each variant carries a stable machine code (see [`UniverseError::code`])
//! that the presentation layer can forward verbatim, and its `Display`
//! output is prefixed with that code.

use outpost_types::{StationId, UserId};

use crate::store::StoreError;

/// Broad category of a [`UniverseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced station, module, or material does not exist.
    NotFound,
    /// The operation is inconsistent with the station's current state.
    Conflict,
    /// Budget or material preconditions are not met.
    Resource,
    /// The caller supplied a malformed argument.
    Validation,
    /// The caller does not own the station.
    Forbidden,
    /// Persistence failed.
    Storage,
}

/// Errors returned by the universe mutation and read API.
#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    /// No station with this id exists.
    #[error("station_not_found: station {0}")]
    StationNotFound(StationId),

    /// The module id is not in the catalog.
    #[error("module_not_found: {0}")]
    ModuleNotFound(String),

    /// The material id is not in the catalog.
    #[error("material_not_found: {0}")]
    MaterialNotFound(String),

    /// The module is already installed on the station.
    #[error("module_already_installed: {module} on station {station}")]
    ModuleAlreadyInstalled {
        /// The station.
        station: StationId,
        /// The module id.
        module: String,
    },

    /// The module is not installed on the station.
    #[error("module_not_installed: {module} on station {station}")]
    ModuleNotInstalled {
        /// The station.
        station: StationId,
        /// The module id.
        module: String,
    },

    /// The station already has a queued build.
    #[error("build_in_progress: station {0}")]
    BuildInProgress(StationId),

    /// Installing the module would exceed one or more capacities.
    #[error("over_budget: {}", problems.join("; "))]
    OverBudget {
        /// Every violated constraint, formatted as `Label: used / cap`.
        problems: Vec<String>,
    },

    /// The station does not hold enough materials to pay for the build.
    #[error("insufficient_materials: station {station} cannot pay for {module}")]
    InsufficientMaterials {
        /// The station.
        station: StationId,
        /// The module being built.
        module: String,
    },

    /// The station exists but is owned by someone else.
    #[error("not_station_owner: user {user} does not own station {station}")]
    NotStationOwner {
        /// The station.
        station: StationId,
        /// The requesting user.
        user: UserId,
    },

    /// An empty module id was supplied.
    #[error("module_id_required")]
    ModuleIdRequired,

    /// A grant had an empty material id or a non-positive amount.
    #[error("material_id_and_positive_amount_required")]
    MaterialIdAndPositiveAmountRequired,

    /// A negative time step was requested.
    #[error("dt_must_be_non_negative: {0}")]
    DtMustBeNonNegative(f64),

    /// A negative scheduling delay was requested.
    #[error("delay_must_be_non_negative: {0}")]
    DelayMustBeNonNegative(f64),

    /// Station or event ids have reached `u64::MAX`.
    #[error("id_space_exhausted")]
    IdSpaceExhausted,

    /// Loading or saving the universe document failed.
    #[error("storage_error: {0}")]
    Store(#[from] StoreError),
}

impl UniverseError {
    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::StationNotFound(_) => "station_not_found",
            Self::ModuleNotFound(_) => "module_not_found",
            Self::MaterialNotFound(_) => "material_not_found",
            Self::ModuleAlreadyInstalled { .. } => "module_already_installed",
            Self::ModuleNotInstalled { .. } => "module_not_installed",
            Self::BuildInProgress(_) => "build_in_progress",
            Self::OverBudget { .. } => "over_budget",
            Self::InsufficientMaterials { .. } => "insufficient_materials",
            Self::NotStationOwner { .. } => "not_station_owner",
            Self::ModuleIdRequired => "module_id_required",
            Self::MaterialIdAndPositiveAmountRequired => "material_id_and_positive_amount_required",
            Self::DtMustBeNonNegative(_) => "dt_must_be_non_negative",
            Self::DelayMustBeNonNegative(_) => "delay_must_be_non_negative",
            Self::IdSpaceExhausted => "id_space_exhausted",
            Self::Store(_) => "storage_error",
        }
    }

    /// Category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::StationNotFound(_) | Self::ModuleNotFound(_) | Self::MaterialNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::ModuleAlreadyInstalled { .. }
            | Self::ModuleNotInstalled { .. }
            | Self::BuildInProgress(_) => ErrorKind::Conflict,
            Self::OverBudget { .. } | Self::InsufficientMaterials { .. } | Self::IdSpaceExhausted => {
                ErrorKind::Resource
            }
            Self::NotStationOwner { .. } => ErrorKind::Forbidden,
            Self::ModuleIdRequired
            | Self::MaterialIdAndPositiveAmountRequired
            | Self::DtMustBeNonNegative(_)
            | Self::DelayMustBeNonNegative(_) => ErrorKind::Validation,
            Self::Store(_) => ErrorKind::Storage,
        }
    }
}
