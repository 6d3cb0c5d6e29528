//! Enumeration types for the universe document.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Kind of celestial body or resource site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BodyType {
    /// A planet.
    Planet,
    /// A moon orbiting a planet.
    Moon,
    /// A field of minable asteroids.
    AsteroidBelt,
}

/// Known event kinds.
///
/// Events store their kind as a free string tag so a document written by a
/// newer build still loads; [`EventKind::from_tag`] maps the tags this build
/// understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A queued build has finished; install the module.
    BuildModuleComplete,
    /// A scheduled direct install.
    InstallModule,
}

impl EventKind {
    /// The stored tag for this kind.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::BuildModuleComplete => "build_module_complete",
            Self::InstallModule => "install_module",
        }
    }

    /// Map a stored tag to a known kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "build_module_complete" => Some(Self::BuildModuleComplete),
            "install_module" => Some(Self::InstallModule),
            _ => None,
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}
