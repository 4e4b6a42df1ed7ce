//! Core types and transforms for the CCSS standards graph.
//!
//! Provides the reference data model ([`model::ReferenceRecord`]), the short-id
//! lookup table ([`reference::ReferenceIndex`]), identifier canonicalization,
//! relationship sanitizing and validation, and the CSV/JSON plumbing the CLI
//! reads from and writes to.

pub mod canonical;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod reference;
pub mod relationship;
pub mod sanitize;
pub mod storage;
pub mod table;
pub mod validate;

pub use error::{CcssError, Result};
