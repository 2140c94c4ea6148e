//! Generation from `Serialize` records and JSON descriptor tables.

#![cfg(feature = "serde-records")]

use anyhow::Result;
use recordcsv::testing::*;
use recordcsv::*;
use serde::{Serialize, Serializer};

#[test]
fn serialized_measurements() -> Result<()> {
    let csv = generate_serialized(&Measurement::descriptor(), &sample_measurements())?;
    assert_csv_eq(
        &csv,
        concat!(
            "\"Sensor\",\"site\",\"humidity\",\"temp\",\"pressure\"\n",
            "\"s-1\",\"roof\",\"40\",\"21.5\",\"\"\n",
            "\"s-2\",\"\",\"\",\"\",\"1013.25\"\n",
        ),
    );
    Ok(())
}

#[test]
fn serialized_students_match_field_access() -> Result<()> {
    let students = sample_students();
    let generator = CsvGenerator::for_record::<Student>();
    assert_eq!(
        generator.generate_serialized(&students)?,
        generator.generate(&students)?
    );
    Ok(())
}

#[test]
fn descriptor_from_json() -> Result<()> {
    let ty = RecordTypeDescriptor::from_json(
        r#"{
            "name": "Measurement",
            "fields": [
                { "name": "sensor" },
                { "name": "site", "ignored": true },
                { "name": "readings", "kind": { "map": { "explicit": { "keys": ["temp", "wind"], "include_null": false } } } }
            ]
        }"#,
    )?;
    let csv = generate_serialized(&ty, &sample_measurements())?;
    assert_csv_eq(&csv, "\"sensor\",\"temp\"\n\"s-1\",\"21.5\"\n\"s-2\",\"\"\n");
    Ok(())
}

#[test]
fn json_values_are_records() -> Result<()> {
    let ty = RecordTypeDescriptor::new("T")
        .scalar("id")
        .scalar("tags")
        .map("extra", MapKeyPolicy::Dynamic);
    let records = vec![
        serde_json::json!({"id": 1, "tags": ["a", "b"], "extra": {"k2": true, "k1": null}}),
        serde_json::json!({"id": -2, "tags": null, "extra": null}),
    ];
    let csv = generate(&ty, &records)?;
    assert_csv_eq(
        &csv,
        "\"id\",\"tags\",\"k2\",\"k1\"\n\"1\",\"[a, b]\",\"true\",\"\"\n\"-2\",\"\",\"\",\"\"\n",
    );
    Ok(())
}

struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("cannot serialize"))
    }
}

#[test]
fn serialization_failure_is_a_convert_error() {
    let ty = RecordTypeDescriptor::new("T").scalar("a");
    let err = generate_serialized(&ty, &[Unserializable]).unwrap_err();
    assert_eq!(err.stage(), Stage::Convert);
    assert_eq!(err.record_index(), Some(0));
    assert!(err.to_string().contains("cannot serialize"));
}

#[test]
fn records_that_are_not_objects_fail() {
    let ty = RecordTypeDescriptor::new("T").scalar("a");
    let err = generate_serialized(&ty, &[1u32, 2]).unwrap_err();
    assert_eq!(err.stage(), Stage::Emit);
    assert_eq!(err.field(), Some("a"));
}
