//! Column-set planner.
//!
//! Turns the resolved field list into a [`ColumnPlan`]: for every field, the
//! columns it contributes. Scalar fields contribute one column named by
//! [`FieldDescriptor::header_name`]. Map fields contribute one column per
//! resolved key:
//!
//! 1. **explicit, `include_null = true`** - declared keys, in declared order
//! 2. **explicit, `include_null = false`** - declared keys that were observed
//!    in the data, in declared order
//! 3. **dynamic** - observed keys, in the order first seen
//!
//! The scan (see [`crate::scan`]) runs only when some field falls under 2 or
//! 3. The plan is built once per generation call and reused for the header
//! and every row.

use crate::descriptor::{FieldDescriptor, MapKeyPolicy};
use crate::error::GenerationResult;
use crate::record::FieldAccess;
use crate::scan::{KeySet, ScanRequest, scan};
use std::fmt::{Display, Formatter, Result as FormatResult};

/// Where a map field's resolved keys came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Declared list used as is, minus repeats.
    Declared,
    /// Declared list filtered to keys observed in the data.
    Filtered,
    /// Keys discovered in the data.
    Discovered,
}

/// The columns contributed by one resolved field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedField<'a> {
    Scalar(&'a FieldDescriptor),
    Map {
        field: &'a FieldDescriptor,
        keys: Vec<String>,
        source: KeySource,
    },
}

impl<'a> PlannedField<'a> {
    pub fn descriptor(&self) -> &'a FieldDescriptor {
        match self {
            PlannedField::Scalar(field) | PlannedField::Map { field, .. } => *field,
        }
    }

    pub fn column_count(&self) -> usize {
        match self {
            PlannedField::Scalar(_) => 1,
            PlannedField::Map { keys, .. } => keys.len(),
        }
    }
}

/// The resolved output layout for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan<'a> {
    fields: Vec<PlannedField<'a>>,
    scanned: bool,
}

impl<'a> ColumnPlan<'a> {
    pub fn fields(&self) -> &[PlannedField<'a>] {
        &self.fields
    }

    /// Whether building this plan required a pass over the records.
    pub fn scanned(&self) -> bool {
        self.scanned
    }

    /// Header text of every column, in output order.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(self.column_count());
        for planned in &self.fields {
            match planned {
                PlannedField::Scalar(field) => names.push(field.header_name()),
                PlannedField::Map { keys, .. } => names.extend(keys.iter().map(String::as_str)),
            }
        }
        names
    }

    pub fn column_count(&self) -> usize {
        self.fields.iter().map(PlannedField::column_count).sum()
    }

    /// Resolved keys of the first map field named `name`.
    pub fn keys_for(&self, name: &str) -> Option<&[String]> {
        self.fields.iter().find_map(|planned| match planned {
            PlannedField::Map { field, keys, .. } if field.name == name => Some(keys.as_slice()),
            _ => None,
        })
    }
}

impl Display for ColumnPlan<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        writeln!(f, "Column Plan")?;
        writeln!(f, "===========")?;
        writeln!(
            f,
            "{} field(s), {} column(s), data scan: {}",
            self.fields.len(),
            self.column_count(),
            if self.scanned { "yes" } else { "no" }
        )?;
        for (i, planned) in self.fields.iter().enumerate() {
            match planned {
                PlannedField::Scalar(field) => {
                    write!(f, "  {}. {} (scalar)", i + 1, field.name)?;
                    if let Some(ref display) = field.rename {
                        write!(f, " as \"{display}\"")?;
                    }
                    writeln!(f)?;
                }
                PlannedField::Map { field, keys, source } => {
                    let how = match source {
                        KeySource::Declared => "declared",
                        KeySource::Filtered => "declared, filtered by data",
                        KeySource::Discovered => "discovered",
                    };
                    writeln!(f, "  {}. {} (map, {how}): [{}]", i + 1, field.name, keys.join(", "))?;
                }
            }
        }
        Ok(())
    }
}

/// Declared keys with repeats dropped, first occurrence wins.
fn declared(keys: &[String]) -> KeySet {
    let mut set = KeySet::new();
    set.extend(keys.iter().map(String::as_str));
    set
}

/// Build the column plan for `fields` over `records`.
///
/// `fields` is the output of [`resolve_fields`](crate::descriptor::resolve_fields).
/// The records are only read when some map field needs data.
pub fn plan_columns<'a, R: FieldAccess>(
    fields: &[&'a FieldDescriptor],
    records: &[R],
) -> GenerationResult<ColumnPlan<'a>> {
    let mut request = ScanRequest::default();
    for (idx, &field) in fields.iter().enumerate() {
        match field.map_policy() {
            Some(MapKeyPolicy::Dynamic) => request.dynamic.push((idx, field)),
            Some(MapKeyPolicy::Explicit {
                include_null: false,
                ..
            }) => request.filtered.push((idx, field)),
            _ => {}
        }
    }

    let scanned = !request.is_empty();
    let mut observed = if scanned {
        Some(scan(records, &request)?)
    } else {
        tracing::trace!("no map field needs data; skipping scan");
        None
    };

    let mut planned = Vec::with_capacity(fields.len());
    for (idx, &field) in fields.iter().enumerate() {
        let entry = match field.map_policy() {
            None => PlannedField::Scalar(field),
            Some(MapKeyPolicy::Explicit {
                keys,
                include_null: true,
            }) => PlannedField::Map {
                field,
                keys: declared(keys).into_vec(),
                source: KeySource::Declared,
            },
            Some(MapKeyPolicy::Explicit {
                keys,
                include_null: false,
            }) => {
                let keep = declared(keys)
                    .into_vec()
                    .into_iter()
                    .filter(|k| observed.as_ref().is_some_and(|o| o.shared().contains(k)))
                    .collect();
                PlannedField::Map {
                    field,
                    keys: keep,
                    source: KeySource::Filtered,
                }
            }
            Some(MapKeyPolicy::Dynamic) => PlannedField::Map {
                field,
                keys: observed
                    .as_mut()
                    .map(|o| o.take_field(idx).into_vec())
                    .unwrap_or_default(),
                source: KeySource::Discovered,
            },
        };
        planned.push(entry);
    }

    Ok(ColumnPlan {
        fields: planned,
        scanned,
    })
}
