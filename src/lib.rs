// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Resource Baseline
//!
//! Compares deployed Kubernetes resources against an approved baseline.
//!
//! ## Overview
//!
//! For each namespace and resource type, the deployed resources are checked
//! against the baseline filed under the namespace's alias:
//!
//! - Workloads (deployments, statefulsets, cronjobs, daemonsets) are compared
//!   per container on `limits` and `requests`
//! - Persistent volume claims are compared on capacity
//! - Resources the baseline does not list are reported separately
//!
//! ## Modules
//!
//! - [`resource`]: Deployed resource records and resource types
//! - [`baseline`]: Baseline document model, loading and fingerprinting
//! - [`differ`]: The comparison itself
//! - [`source`]: Where deployed resources come from
//! - [`monitor`]: Runs the comparison across namespaces and resource types
//! - [`report`]: Detail text, tabular rows and workbook export
//! - [`config`]: Configuration parsing and validation
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! baseline:
//!   path: config/baseline.json
//! snapshot:
//!   path: snapshot.json
//! namespaces:
//!   - name: eric-eo-cm
//!     alias: cm
//! resource_types: [deployments, pvc]
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod baseline;
pub mod cli;
pub mod config;
pub mod differ;
pub mod error;
pub mod monitor;
pub mod report;
pub mod resource;
pub mod source;

// ============================================================================
// Re-exports
// ============================================================================

pub use baseline::{BaselineDocument, BaselineHasher, BaselineLoader, BaselineSet};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, MonitorConfig};
pub use differ::{BaselineDiffer, Comparison, DifferenceRecord, NotInBaselineRecord};
pub use error::{ResbaseError, Result};
pub use monitor::{AggregateReport, BaselineMonitor, ComparisonKey, MonitorRun, ResourceInventory};
pub use report::{ReportWriter, ResourceDetails, Workbook};
pub use resource::{LimitKind, ResourceRecord, ResourceType};
pub use source::{ResourceSource, SnapshotSource};
