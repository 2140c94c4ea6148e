//! # recordcsv
//!
//! Render a homogeneous list of records as CSV text, with the column layout
//! derived from a description of the record type rather than hand-written
//! formatting code.
//!
//! ## Key Features
//!
//! - **Descriptor-driven layout** - fields, inherited fields, renames and ignored fields
//! - **Map columns** - dictionary-valued fields expand to one column per key
//! - **Column inference** - key sets discovered from the data, in first-seen order
//! - **Declared key lists** - fixed key order, optionally filtered to keys present in the data
//! - **Serde records** - render any `Serialize` type (feature `serde-records`)
//!
//! ## Quick Start
//!
//! ```
//! use recordcsv::*;
//! use std::collections::BTreeMap;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let ty = RecordTypeDescriptor::new("Result")
//!     .scalar("name")
//!     .map("scores", MapKeyPolicy::Dynamic);
//!
//! let rows: Vec<BTreeMap<String, Value>> = vec![
//!     BTreeMap::from([
//!         ("name".into(), "A".into()),
//!         ("scores".into(), MapValue::new().with("x", 1u32).into()),
//!     ]),
//!     BTreeMap::from([
//!         ("name".into(), "B".into()),
//!         ("scores".into(), MapValue::new().with("x", 2u32).with("y", 3u32).into()),
//!     ]),
//! ];
//!
//! let csv = generate(&ty, &rows)?;
//! assert_eq!(csv, "\"name\",\"x\",\"y\"\n\"A\",\"1\",\"\"\n\"B\",\"2\",\"3\"\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Record type descriptors
//!
//! A [`RecordTypeDescriptor`] lists a type's fields and optionally a parent
//! type. Parent fields come first in the output. Each [`FieldDescriptor`] is
//! either a scalar (one column) or a map with a [`MapKeyPolicy`]:
//!
//! - [`MapKeyPolicy::explicit`] - the declared keys, always, in declared order
//! - [`MapKeyPolicy::explicit_non_null`] - the declared keys that appear in the data
//! - [`MapKeyPolicy::Dynamic`] - every key that appears in the data, first-seen order
//!
//! ### Field access
//!
//! Records expose their fields through [`FieldAccess`]. Implementations are
//! provided for `HashMap<String, Value>`, `BTreeMap<String, Value>` and JSON
//! objects; types that know their own descriptor implement [`CsvRecord`].
//!
//! ### Output format
//!
//! The first line is the header, then one line per record in input order.
//! Every cell is wrapped in double quotes and cells are joined with `,`.
//! Cell text is written verbatim: quotes, commas and newlines inside values
//! are **not** escaped. Absent values render as `""`.
//!
//! ## Module Overview
//!
//! - [`descriptor`] - record type descriptors and field resolution
//! - [`value`] - runtime field values
//! - [`record`] - the field access capability
//! - [`scan`] - observed-key collection
//! - [`planner`] - column-set planning
//! - [`emit`] - header and row rendering
//! - [`generator`] - the public entry points
//! - [`testing`] - assertions and fixtures for tests

pub mod descriptor;
pub mod emit;
pub mod error;
pub mod generator;
pub mod planner;
pub mod record;
pub mod scan;
pub mod testing;
pub mod value;

pub use descriptor::{
    FieldDescriptor, FieldKind, MapKeyPolicy, RecordTypeDescriptor, resolve_fields,
};
pub use error::{GenerationError, GenerationResult, Stage};
pub use generator::{CsvGenerator, generate, generate_records};
pub use planner::{ColumnPlan, KeySource, PlannedField};
pub use record::{CsvRecord, FieldAccess};
pub use value::{MapValue, Value};

#[cfg(feature = "serde-records")]
pub use generator::generate_serialized;
