//! Query-and-hierarchy engine behind a live task-monitoring table.
//!
//! Task records flow in from a distributed processing pipeline and land in a
//! registry; this crate answers data-grid style queries over that registry:
//! free-text filtering, column sort, optional grouping into ancestry forests,
//! and offset/length pagination with total/filtered counts.

pub mod hierarchy;
pub mod query;
pub mod registry;
