//! Baseline differ.
//!
//! This module is the decision core of the tool: a pure, synchronous
//! comparison between deployed resource records and baseline entries,
//! producing a differences map and a not-in-baseline map.

mod diff;
mod outcome;

pub use diff::BaselineDiffer;
pub use outcome::{
    CapacityDiff, Comparison, ContainerDifference, DifferenceRecord, LimitDiff,
    NotInBaselineEntry, NotInBaselineRecord, ResourceDifference,
};
