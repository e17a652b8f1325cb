//! # cdm-check: The CDM Validation Engine
//!
//! Checks that a decoded dataset's structural metadata conforms to a
//! [`cdm_schema::CdmSchema`]: global attributes, variable and coordinate
//! attributes, units, dimension/coordinate association, and the stored
//! direction of coordinate axes.
//!
//! ## Usage
//!
//! ```no_run
//! use cdm_check::Checker;
//! use cdm_core::{CountingSink, Reporter, TracingSink};
//! use cdm_schema::CdmSchema;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = CdmSchema::bundled()?;
//! let checker = Checker::new(&schema);
//! let mut sink = CountingSink::new(TracingSink);
//! checker.check_file("dataset.json", &mut Reporter::new(&mut sink))?;
//! println!("{} errors", sink.errors());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - `sanitise`: string keys for every mapping read from the dataset.
//! - `resolve`: name-to-definition matching with `standard_name` recovery.
//! - `attrs`: global and per-entity attribute checks, including units.
//! - `data`: dimension association and monotonicity.
//! - `engine`: the [`Checker`] that runs them in order.
//! - `dataset`: the [`DataEntity`] capability and the JSON provider.
//! - `config`: deployment options ([`CheckOptions`]).
//!
//! ## Crate Policy
//!
//! - Checks are total: data-quality findings are diagnostics, never errors.
//! - Only dataset and options loading return `Result::Err`.
//! - The dataset and schema are never mutated.

pub mod attrs;
pub mod config;
pub mod data;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod resolve;
pub mod sanitise;

pub use attrs::{check_dataset_attrs, check_variable_attrs, Role};
pub use config::CheckOptions;
pub use data::{check_coordinate_data, check_variable_data};
pub use dataset::{DataEntity, Dataset, Entity};
pub use engine::{Checker, Partition};
pub use error::{ConfigError, DatasetError};
pub use resolve::{guess_definition, resolve_definition};
pub use sanitise::{sanitise_attributes, sanitise_mapping};
