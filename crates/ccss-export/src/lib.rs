//! Graph export for CCSS standards.
//!
//! Joins standards records and sanitized relationships into the node/link
//! document consumed by force-directed graph viewers.

pub mod graph;
pub mod labels;
