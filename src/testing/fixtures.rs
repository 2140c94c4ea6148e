//! Pre-built record types and datasets for common testing scenarios.
//!
//! - [`Person`] / [`Student`]: a two-level hierarchy exercising inherited
//!   fields, a rename, an ignored field and all three map key policies
//! - [`Measurement`]: a plain `Serialize` struct for the serde path

use crate::descriptor::{FieldDescriptor, MapKeyPolicy, RecordTypeDescriptor};
use crate::record::{CsvRecord, FieldAccess};
use crate::value::Value;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base record type: `name`, `dob` (shown as "Date Of Birth"), and an
/// ignored `password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub dob: Option<String>,
    pub password: String,
}

impl Person {
    pub fn descriptor() -> RecordTypeDescriptor {
        RecordTypeDescriptor::new("Person")
            .scalar("name")
            .scalar_as("dob", "Date Of Birth")
            .ignore("password")
    }
}

impl FieldAccess for Person {
    fn field_value(&self, field: &FieldDescriptor) -> Result<Value> {
        Ok(match field.name.as_str() {
            "name" => Value::from(&self.name),
            "dob" => Value::from(self.dob.clone()),
            "password" => Value::from(&self.password),
            other => bail!("Person has no field `{other}`"),
        })
    }
}

impl CsvRecord for Person {
    fn record_type() -> RecordTypeDescriptor {
        Self::descriptor()
    }
}

/// Derived record type adding `school` and three map fields:
///
/// - `grades`: explicit `[math, science, art]`, always present
/// - `activities`: explicit `[sports, music, clubs]`, only those observed
/// - `attributes`: dynamic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(flatten)]
    pub person: Person,
    pub school: String,
    pub grades: Option<BTreeMap<String, u32>>,
    pub activities: Option<BTreeMap<String, String>>,
    pub attributes: Option<BTreeMap<String, String>>,
}

impl Student {
    pub fn descriptor() -> RecordTypeDescriptor {
        RecordTypeDescriptor::new("Student")
            .extends(Person::descriptor())
            .scalar("school")
            .map("grades", MapKeyPolicy::explicit(["math", "science", "art"]))
            .map(
                "activities",
                MapKeyPolicy::explicit_non_null(["sports", "music", "clubs"]),
            )
            .map("attributes", MapKeyPolicy::Dynamic)
    }
}

impl FieldAccess for Student {
    fn field_value(&self, field: &FieldDescriptor) -> Result<Value> {
        Ok(match field.name.as_str() {
            "school" => Value::from(&self.school),
            "grades" => Value::from(self.grades.clone()),
            "activities" => Value::from(self.activities.clone()),
            "attributes" => Value::from(self.attributes.clone()),
            _ => return self.person.field_value(field),
        })
    }
}

impl CsvRecord for Student {
    fn record_type() -> RecordTypeDescriptor {
        Self::descriptor()
    }
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Three students with partially overlapping map contents.
///
/// - `activities` keys observed overall: `music`, `clubs`, `chess` (undeclared)
/// - `attributes` keys in first-seen order: `house`, `locker`, `bus`
///
/// # Example
///
/// ```
/// use recordcsv::testing::sample_students;
///
/// let students = sample_students();
/// assert_eq!(students.len(), 3);
/// ```
#[must_use]
pub fn sample_students() -> Vec<Student> {
    vec![
        Student {
            person: Person {
                name: "Ana".to_string(),
                dob: Some("2008-04-01".to_string()),
                password: "hunter2".to_string(),
            },
            school: "North".to_string(),
            grades: Some(BTreeMap::from([
                ("math".to_string(), 90),
                ("art".to_string(), 75),
            ])),
            activities: Some(string_map(&[("music", "piano")])),
            attributes: Some(string_map(&[("house", "red")])),
        },
        Student {
            person: Person {
                name: "Ben".to_string(),
                dob: None,
                password: "swordfish".to_string(),
            },
            school: "South".to_string(),
            grades: None,
            activities: Some(string_map(&[("chess", "yes"), ("clubs", "robotics")])),
            attributes: Some(string_map(&[("locker", "12"), ("house", "blue")])),
        },
        Student {
            person: Person {
                name: "Cy".to_string(),
                dob: Some("2007-11-30".to_string()),
                password: "letmein".to_string(),
            },
            school: "North".to_string(),
            grades: Some(BTreeMap::from([("science".to_string(), 88)])),
            activities: None,
            attributes: Some(string_map(&[("bus", "7")])),
        },
    ]
}

/// A sensor reading with free-form named values, used through serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub sensor: String,
    pub site: Option<String>,
    pub readings: BTreeMap<String, f64>,
}

impl Measurement {
    pub fn descriptor() -> RecordTypeDescriptor {
        RecordTypeDescriptor::new("Measurement")
            .scalar_as("sensor", "Sensor")
            .scalar("site")
            .map("readings", MapKeyPolicy::Dynamic)
    }
}

/// Two measurements whose reading names differ.
///
/// # Example
///
/// ```
/// use recordcsv::testing::sample_measurements;
///
/// assert_eq!(sample_measurements().len(), 2);
/// ```
#[must_use]
pub fn sample_measurements() -> Vec<Measurement> {
    vec![
        Measurement {
            sensor: "s-1".to_string(),
            site: Some("roof".to_string()),
            readings: BTreeMap::from([
                ("temp".to_string(), 21.5),
                ("humidity".to_string(), 40.0),
            ]),
        },
        Measurement {
            sensor: "s-2".to_string(),
            site: None,
            readings: BTreeMap::from([("pressure".to_string(), 1013.25)]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::resolve_fields;

    #[test]
    fn student_inherits_person_fields_first() {
        let ty = Student::record_type();
        let names: Vec<_> = resolve_fields(&ty).iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["name", "dob", "school", "grades", "activities", "attributes"]
        );
    }

    #[test]
    fn student_delegates_person_fields() {
        let student = &sample_students()[0];
        let v = student.field_value(&FieldDescriptor::scalar("name")).unwrap();
        assert_eq!(v, Value::from("Ana"));
        assert!(student.field_value(&FieldDescriptor::scalar("gpa")).is_err());
    }
}
