//! Testing utilities for CSV generation.
//!
//! This module provides helpers for writing tests against generated CSV text:
//!
//! - **Assertions**: compare generated text line by line with readable failures
//! - **Parsing helpers**: split output into lines and header cells
//! - **Fixtures**: ready-made record types covering inheritance, renames,
//!   ignored fields and every map key policy
//!
//! # Quick Start
//!
//! ```
//! use recordcsv::*;
//! use recordcsv::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let csv = generate_records(&sample_students())?;
//! assert_row_count(&csv, 3);
//! assert_eq!(header_columns(&csv)[0], "name");
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
