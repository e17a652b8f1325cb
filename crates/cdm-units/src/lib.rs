//! # cdm-units: CF Unit Expressions
//!
//! Parses the UDUNITS-style unit strings found in CF `units` attributes and
//! answers the two questions the CDM checks ask:
//!
//! - [`Unit::is_equivalent`]: are the two units convertible at all?
//!   (same dimensions, both or neither epoch-relative)
//! - [`Unit::is_equal`]: are they the same unit? (equivalent, and the
//!   same scale, offset and reference epoch)
//!
//! Data values are never converted; only unit metadata is compared.
//!
//! ```rust
//! use cdm_units::{Compatibility, Unit};
//!
//! let kelvin = Unit::parse("K").unwrap();
//! let celsius = Unit::parse("Celsius").unwrap();
//! assert_eq!(celsius.compare(&kelvin), Compatibility::Equivalent);
//!
//! let flux = Unit::parse("kg m-2 s-1").unwrap();
//! assert_eq!(flux.compare(&Unit::parse("kg/m2/s").unwrap()), Compatibility::Equal);
//! ```

pub mod error;
mod parse;
mod table;
pub mod unit;

pub use error::UnitError;
pub use unit::{Compatibility, Dimensions, GeoAxis, Unit};
