//! Failure propagation: any field access error aborts the whole call.

use anyhow::{Result, anyhow, bail};
use recordcsv::*;
use std::cell::Cell;
use std::error::Error as _;

/// A record whose `flaky` field fails for one configured row.
struct Flaky {
    row: usize,
    fail_on: usize,
    reads: Cell<usize>,
}

impl Flaky {
    fn rows(n: usize, fail_on: usize) -> Vec<Flaky> {
        (0..n)
            .map(|row| Flaky {
                row,
                fail_on,
                reads: Cell::new(0),
            })
            .collect()
    }
}

impl FieldAccess for Flaky {
    fn field_value(&self, field: &FieldDescriptor) -> Result<Value> {
        self.reads.set(self.reads.get() + 1);
        match field.name.as_str() {
            "row" => Ok(Value::from(self.row)),
            "flaky" if self.row == self.fail_on => Err(anyhow!("access denied")),
            "flaky" => Ok(Value::Map(MapValue::new().with("k", self.row))),
            other => bail!("no field `{other}`"),
        }
    }
}

#[test]
fn scan_failure_aborts_before_any_row() {
    let ty = RecordTypeDescriptor::new("Flaky")
        .scalar("row")
        .map("flaky", MapKeyPolicy::Dynamic);
    let records = Flaky::rows(4, 2);

    let err = generate(&ty, &records).unwrap_err();
    assert_eq!(err.stage(), Stage::Scan);
    assert_eq!(err.field(), Some("flaky"));
    assert_eq!(err.record_index(), Some(2));
    assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("access denied"));
    // The scan stopped at the failing record; no row was emitted.
    assert_eq!(records[3].reads.get(), 0);
    assert_eq!(records[0].reads.get(), 1);
}

#[test]
fn emit_failure_when_no_scan_is_needed() {
    let ty = RecordTypeDescriptor::new("Flaky")
        .scalar("row")
        .map("flaky", MapKeyPolicy::explicit(["k"]));
    let records = Flaky::rows(3, 1);

    let err = generate(&ty, &records).unwrap_err();
    assert_eq!(err.stage(), Stage::Emit);
    assert_eq!(err.record_index(), Some(1));
    assert_eq!(
        err.to_string(),
        "CSV generation failed while emitting rows (field `flaky`, record #1): access denied"
    );
}

#[test]
fn unknown_field_is_an_access_failure() {
    let ty = RecordTypeDescriptor::new("Flaky").scalar("row").scalar("missing");
    let records = Flaky::rows(1, usize::MAX);

    let err = generate(&ty, &records).unwrap_err();
    assert_eq!(err.field(), Some("missing"));
    assert_eq!(err.cause().to_string(), "no field `missing`");
}

#[test]
fn map_field_holding_a_scalar_is_rejected() {
    let ty = RecordTypeDescriptor::new("T").map("row", MapKeyPolicy::explicit_non_null(["a"]));
    let records = Flaky::rows(2, usize::MAX);

    let err = generate(&ty, &records).unwrap_err();
    assert_eq!(err.stage(), Stage::Scan);
    assert_eq!(err.record_index(), Some(0));
    assert!(err.cause().to_string().starts_with("unexpected value shape"));
}

#[test]
fn successful_rows_do_not_leak_into_failed_output() {
    let ty = RecordTypeDescriptor::new("Flaky")
        .scalar("row")
        .map("flaky", MapKeyPolicy::explicit(["k"]));
    let ok = Flaky::rows(2, usize::MAX);
    assert_eq!(
        generate(&ty, &ok).unwrap(),
        "\"row\",\"k\"\n\"0\",\"0\"\n\"1\",\"1\"\n"
    );

    let failing = Flaky::rows(2, 1);
    assert!(generate(&ty, &failing).is_err());
}
