//! Baseline module.
//!
//! This module handles the approved-values side of a comparison:
//! - Typed baseline entries for workloads and PVCs
//! - Loading and validating the JSON baseline file
//! - Fingerprinting a baseline for report metadata

mod hash;
mod loader;
mod types;

pub use hash::BaselineHasher;
pub use loader::BaselineLoader;
pub use types::{
    BaselineDimensions, BaselineDocument, BaselineSet, ContainerBaseline, PvcBaseline, Quantity,
    WorkloadBaseline,
};
