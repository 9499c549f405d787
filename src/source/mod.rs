//! Resource collection module.
//!
//! This module provides the seam through which deployed resources reach the
//! comparison, plus a snapshot-file implementation of it.

mod snapshot;
mod store;

pub use snapshot::SnapshotSource;
pub use store::ResourceSource;
