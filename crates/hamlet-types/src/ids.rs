//! Type-safe identifier wrappers around [`String`].
//!
//! Agents are identified by their unique name, and locations and storages
//! by the short slugs given in the village catalog (`"house-1"`,
//! `"granary"`). Wrapping each kind of identifier in its own newtype keeps
//! them from being mixed up at compile time. Identifiers synthesized at
//! runtime (emergency homes) embed a UUID v7 to stay unique.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Create a fresh identifier of the form `{prefix}-{uuid}` using
            /// UUID v7 (time-ordered).
            pub fn generate(prefix: &str) -> Self {
                Self(format!("{prefix}-{}", Uuid::now_v7()))
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl core::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a villager. Equal to the villager's name.
    AgentId
}

define_id! {
    /// Unique identifier for a location in the village catalog.
    LocationId
}

define_id! {
    /// Unique identifier for a resource storage.
    StorageId
}
