//! Report generation module.
//!
//! This module turns an aggregate report into the detail text file, the
//! tabular rows and the workbook export, and writes the resource details of
//! every collected record.

mod resources;
mod rows;
mod writer;

pub use resources::{ResourceDetails, resources_file_name};
pub use rows::{
    DIFFERING_DETAILS_SHEET, DifferenceRow, NOT_IN_BASELINE_SHEET, NotInBaselineRow, Workbook,
    difference_rows, not_in_baseline_rows,
};
pub use writer::{ReportWriter, render_differences};
