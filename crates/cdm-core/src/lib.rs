//! # cdm-core: Foundational Types for the CDM Tools
//!
//! Every other crate in the workspace builds on the types defined here.
//! `cdm-core` depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Diagnostics are data, not control flow.** Schema deviations are
//!    appended to a [`DiagnosticSink`] through a [`Reporter`]; only I/O and
//!    decoding failures surface as `Result::Err` in the crates above.
//!
//! 2. **No process-wide logger.** A `Reporter` is created by the caller and
//!    threaded explicitly through every check. Contextual fields are bound
//!    per scope with [`Reporter::bind`] and never mutate diagnostics that
//!    were already emitted.
//!
//! 3. **Foreign keys are modelled, not assumed away.** Dataset mappings use
//!    [`AttrKey`], which can carry non-string keys; they are sanitized to
//!    string keys before any lookup.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cdm-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod array;
pub mod diagnostic;
pub mod key;

pub use array::{ArrayValues, ElementKind, Step};
pub use diagnostic::{
    CountingSink, Diagnostic, DiagnosticSink, NullSink, Reporter, Severity, TracingSink,
};
pub use key::{AttrKey, Attributes, SanitisedMap};
