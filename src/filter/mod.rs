//! Filter expression parsing, validation and matching
//!
//! A filter is a set of field/value equality tests that must all hold, plus at
//! most one group of alternatives of which at least one must hold.
//!
//! # Syntax
//!
//! Two surface syntaxes are supported, selected with `--syntax`:
//!
//! ```text
//! or-wrapped (default)
//!   field,value;field,value;or(field,value;field,value)
//!
//! quoted
//!   field,value field,'value with space' "field 3","value 3"
//! ```
//!
//! The `or-wrapped` syntax skips segments that are not `field,value` pairs.
//! The `quoted` syntax has no alternatives group and rejects the whole
//! expression if any token is malformed.
//!
//! # Examples
//!
//! ```text
//! Company,Kalle                          # rows where Company is Kalle
//! Company,Kalle;City,Boras               # Kalle rows in Boras
//! or(Company,Kalle;Company,Olle)         # Kalle or Olle rows
//! City,Boras;or(Company,Kalle;Year,2024) # Boras rows that are Kalle or from 2024
//! ```

pub mod error;
pub mod matcher;
pub mod parser;
pub mod validator;

pub use error::{FilterParseError, UnknownFieldsError};
pub use matcher::{filter_records, matches};
pub use parser::{DisjunctionGroup, FilterExpression, FilterSyntax};
pub use validator::{unknown_fields, validate_fields};
