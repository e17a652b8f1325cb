//! # cdm-schema: The Common Data Model Schema
//!
//! Defines the CDM schema the checker validates against, and the compiler
//! that derives it from CMOR-style definition tables.
//!
//! ## Schema Model (`model`)
//!
//! [`CdmSchema`] holds the ordered list of recommended global attributes,
//! the coordinate definitions, and the data-variable definitions. It is
//! loaded once per process, from a JSON artifact or from the copy bundled
//! with this crate ([`CdmSchema::bundled`]), and is never mutated by the
//! checker.
//!
//! ## Schema Compiler (`compile`)
//!
//! [`compile_tables`] turns `axis_entry` / `variable_entry` tables into a
//! schema, keeping only the fields that are meaningful at schema level
//! (no epoch-relative units, no default `stored_direction`).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cdm-*` crates.
//! - Schema output is byte-stable for identical input: sorted keys,
//!   fixed indentation, trailing newline.

pub mod compile;
pub mod error;
pub mod model;

pub use compile::{
    compile_tables, load_table, open_cmor_tables, CmorEntry, CmorTable, CMOR_TABLE_FILES,
};
pub use error::SchemaError;
pub use model::{CdmSchema, Definition, StoredDirection, DEFAULT_GLOBAL_ATTRIBUTES};
