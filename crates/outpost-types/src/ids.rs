//! Type-safe identifier wrappers around `u64`.
//!
//! Every entity in the universe document has a strongly-typed id so a
//! station id can never be passed where an event id is expected. Ids are
//! positive and allocated as `max existing + 1`; they serialize as plain
//! JSON numbers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(#[ts(type = "number")] pub u64);

        impl $name {
            /// The first id handed out in an empty collection.
            pub const FIRST: Self = Self(1);

            /// Wrap a raw integer id.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Return the inner integer value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }

            /// The id following this one, or `None` on overflow.
            pub const fn next(self) -> Option<Self> {
                match self.0.checked_add(1) {
                    Some(raw) => Some(Self(raw)),
                    None => None,
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a station.
    StationId
}

define_id! {
    /// Unique identifier for a celestial body or resource site.
    BodyId
}

define_id! {
    /// Unique identifier for a queued event.
    EventId
}

define_id! {
    /// Identifier of a user account in the surrounding system.
    UserId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_numbers() {
        let json = serde_json::to_string(&StationId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: StationId = serde_json::from_str("7").unwrap();
        assert_eq!(back, StationId::new(7));
    }

    #[test]
    fn next_increments() {
        assert_eq!(EventId::FIRST.next(), Some(EventId::new(2)));
    }

    #[test]
    fn next_reports_overflow() {
        assert_eq!(EventId::new(u64::MAX).next(), None);
    }

    #[test]
    fn display_is_the_raw_number() {
        assert_eq!(BodyId::new(12).to_string(), "12");
    }
}
