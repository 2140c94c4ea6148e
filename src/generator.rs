//! Report assembly: the public entry points.
//!
//! A generation call always runs the same sequence:
//!
//! 1. resolve the output fields from the descriptor
//! 2. plan the columns (scanning the records only when a map field needs it)
//! 3. emit the header
//! 4. emit one row per record, in input order
//!
//! The plan lives only for the duration of the call. Reusing a
//! [`CsvGenerator`] across calls never reuses a previous plan.

use crate::descriptor::{FieldDescriptor, RecordTypeDescriptor, resolve_fields};
use crate::emit::{write_header, write_row};
use crate::error::GenerationResult;
use crate::planner::{ColumnPlan, plan_columns};
use crate::record::{CsvRecord, FieldAccess};

/// A CSV generator bound to one record type.
#[derive(Debug, Clone)]
pub struct CsvGenerator {
    record_type: RecordTypeDescriptor,
}

impl CsvGenerator {
    pub fn new(record_type: RecordTypeDescriptor) -> Self {
        Self { record_type }
    }

    /// Generator for a record type that describes itself.
    pub fn for_record<R: CsvRecord>() -> Self {
        Self::new(R::record_type())
    }

    pub fn record_type(&self) -> &RecordTypeDescriptor {
        &self.record_type
    }

    /// Fields that take part in output, root ancestor first.
    pub fn fields(&self) -> Vec<&FieldDescriptor> {
        resolve_fields(&self.record_type)
    }

    /// Resolve the column layout for `records` without emitting anything.
    ///
    /// # Errors
    /// Fails if reading a map field during the key scan fails.
    pub fn plan<R: FieldAccess>(&self, records: &[R]) -> GenerationResult<ColumnPlan<'_>> {
        let fields = self.fields();
        plan_columns(&fields, records)
    }

    /// Render `records` as CSV text: a header line, then one line per record.
    ///
    /// # Errors
    /// Any field access failure aborts the call; no partial text is returned.
    pub fn generate<R: FieldAccess>(&self, records: &[R]) -> GenerationResult<String> {
        generate(&self.record_type, records)
    }

    /// Serialize each record to JSON, then render as with [`generate`](Self::generate).
    ///
    /// # Errors
    /// Fails if a record does not serialize, or on any field access failure.
    #[cfg(feature = "serde-records")]
    pub fn generate_serialized<T: serde::Serialize>(
        &self,
        records: &[T],
    ) -> GenerationResult<String> {
        generate_serialized(&self.record_type, records)
    }
}

/// Render `records` of type `record_type` as CSV text.
///
/// # Errors
/// Returns a [`GenerationError`](crate::GenerationError) if reading any
/// field fails, whether during the key scan or while emitting rows.
pub fn generate<R: FieldAccess>(
    record_type: &RecordTypeDescriptor,
    records: &[R],
) -> GenerationResult<String> {
    let fields = resolve_fields(record_type);
    tracing::debug!(
        record_type = %record_type.name,
        fields = fields.len(),
        records = records.len(),
        "generating CSV"
    );

    let plan = plan_columns(&fields, records)?;
    tracing::debug!(
        record_type = %record_type.name,
        columns = plan.column_count(),
        scanned = plan.scanned(),
        "resolved column plan"
    );

    let mut out = String::new();
    write_header(&mut out, &plan);
    for (index, record) in records.iter().enumerate() {
        write_row(&mut out, record, index, &plan)?;
    }
    tracing::debug!(
        record_type = %record_type.name,
        rows = records.len(),
        bytes = out.len(),
        "generated CSV"
    );
    Ok(out)
}

/// Render records that describe their own type.
///
/// # Errors
/// See [`generate`].
pub fn generate_records<R: CsvRecord>(records: &[R]) -> GenerationResult<String> {
    generate(&R::record_type(), records)
}

/// Render `Serialize` records, reading fields from their JSON form.
///
/// Each record must serialize to a JSON object holding every non-ignored
/// field. Map fields keep the key order the record's map serializes in.
///
/// # Errors
/// A record that fails to serialize gives a [`Stage::Convert`](crate::Stage::Convert)
/// error; other failures are as for [`generate`].
#[cfg(feature = "serde-records")]
pub fn generate_serialized<T: serde::Serialize>(
    record_type: &RecordTypeDescriptor,
    records: &[T],
) -> GenerationResult<String> {
    use crate::error::{GenerationError, Stage};

    let converted = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::to_value(record)
                .map_err(|e| GenerationError::new(Stage::Convert, e).with_record(index))
        })
        .collect::<GenerationResult<Vec<_>>>()?;
    generate(record_type, &converted)
}
