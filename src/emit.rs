//! Header and row emitters.
//!
//! Both render a sequence of cells as one line: each cell wrapped in double
//! quotes, cells joined by `,`, line ended by `\n`. Cell text is written
//! verbatim. Embedded quotes, commas and newlines are not escaped, so values
//! containing them produce lines a strict CSV reader will split differently.
//! Absent values (null scalars, null maps, missing keys) render as `""`.

use crate::error::{GenerationError, GenerationResult, Stage};
use crate::planner::{ColumnPlan, PlannedField};
use crate::record::{FieldAccess, as_declared_map, read_field};
use crate::value::Value;
use anyhow::anyhow;

/// Append one quoted, comma-separated line.
fn push_line<'s, I>(out: &mut String, cells: I)
where
    I: IntoIterator<Item = &'s str>,
{
    for (i, cell) in cells.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(cell);
        out.push('"');
    }
    out.push('\n');
}

/// Append the header line for `plan`.
pub fn write_header(out: &mut String, plan: &ColumnPlan<'_>) {
    push_line(out, plan.column_names());
}

/// Render the header line for `plan`.
pub fn header_line(plan: &ColumnPlan<'_>) -> String {
    let mut out = String::new();
    write_header(&mut out, plan);
    out
}

/// Append the data line for `record`, projected onto `plan`.
///
/// `index` is the record's position in the input and only used for error
/// context. Nothing is appended if reading any field fails.
pub fn write_row<R: FieldAccess + ?Sized>(
    out: &mut String,
    record: &R,
    index: usize,
    plan: &ColumnPlan<'_>,
) -> GenerationResult<()> {
    let mut cells: Vec<String> = Vec::with_capacity(plan.column_count());
    for planned in plan.fields() {
        match planned {
            PlannedField::Scalar(field) => {
                let value = read_field(record, field, index, Stage::Emit)?;
                if let Value::Map(_) = value {
                    return Err(GenerationError::new(
                        Stage::Emit,
                        anyhow!(
                            "unexpected value shape: field `{}` is declared as a scalar but holds a map",
                            field.name
                        ),
                    )
                    .with_field(field.name.as_str())
                    .with_record(index));
                }
                cells.push(value.to_string());
            }
            PlannedField::Map { field, keys, .. } => {
                let value = read_field(record, field, index, Stage::Emit)?;
                let map = as_declared_map(&value, field).map_err(|e| {
                    GenerationError::new(Stage::Emit, e)
                        .with_field(field.name.as_str())
                        .with_record(index)
                })?;
                for key in keys {
                    let cell = map
                        .and_then(|m| m.get(key))
                        .map(Value::to_string)
                        .unwrap_or_default();
                    cells.push(cell);
                }
            }
        }
    }
    push_line(out, cells.iter().map(String::as_str));
    Ok(())
}
