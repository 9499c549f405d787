//! Deployed resource model.
//!
//! This module defines what a collected resource looks like once it reaches
//! the comparison: the resource type tags, limit kinds, and the typed
//! [`ResourceRecord`] built from a collector's flat field mapping.

mod record;
mod types;

pub use record::{
    CAPACITY_FIELD, CONTAINER_FIELD, DEFAULT_NAMESPACE, DimensionMap, NAME_FIELD,
    NAMESPACE_FIELD, RawFields, ResourceRecord,
};
pub use types::{LimitKind, NOT_SPECIFIED, PVC_KIND, ResourceType};
