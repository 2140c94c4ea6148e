//! Field access capability.
//!
//! The generator never inspects record internals itself. A record type makes
//! its fields readable by implementing [`FieldAccess`]; types that also know
//! their own layout implement [`CsvRecord`] so the descriptor can be derived
//! from the type alone.
//!
//! ```
//! use anyhow::bail;
//! use recordcsv::*;
//! use std::collections::BTreeMap;
//!
//! struct Score {
//!     name: String,
//!     points: BTreeMap<String, u32>,
//! }
//!
//! impl FieldAccess for Score {
//!     fn field_value(&self, field: &FieldDescriptor) -> anyhow::Result<Value> {
//!         Ok(match field.name.as_str() {
//!             "name" => self.name.as_str().into(),
//!             "points" => self.points.clone().into(),
//!             other => bail!("Score has no field `{other}`"),
//!         })
//!     }
//! }
//!
//! impl CsvRecord for Score {
//!     fn record_type() -> RecordTypeDescriptor {
//!         RecordTypeDescriptor::new("Score")
//!             .scalar("name")
//!             .map("points", MapKeyPolicy::Dynamic)
//!     }
//! }
//!
//! let rows = vec![Score { name: "A".into(), points: BTreeMap::from([("x".into(), 1)]) }];
//! let csv = generate_records(&rows)?;
//! assert_eq!(csv, "\"name\",\"x\"\n\"A\",\"1\"\n");
//! # anyhow::Result::<()>::Ok(())
//! ```

use crate::descriptor::{FieldDescriptor, RecordTypeDescriptor};
use crate::error::{GenerationError, GenerationResult, Stage};
use crate::value::{MapValue, Value};
use anyhow::{Result, anyhow};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

/// Read a declared field's runtime value off a record.
pub trait FieldAccess {
    /// Return the value of `field` on this record.
    ///
    /// An `Err` aborts the whole generation call. Returning [`Value::Null`]
    /// for an absent value is not an error.
    fn field_value(&self, field: &FieldDescriptor) -> Result<Value>;
}

/// A record type that knows its own descriptor.
pub trait CsvRecord: FieldAccess {
    fn record_type() -> RecordTypeDescriptor;
}

impl<T: FieldAccess + ?Sized> FieldAccess for &T {
    fn field_value(&self, field: &FieldDescriptor) -> Result<Value> {
        (**self).field_value(field)
    }
}

impl<T: FieldAccess + ?Sized> FieldAccess for Box<T> {
    fn field_value(&self, field: &FieldDescriptor) -> Result<Value> {
        (**self).field_value(field)
    }
}

impl<T: FieldAccess + ?Sized> FieldAccess for Rc<T> {
    fn field_value(&self, field: &FieldDescriptor) -> Result<Value> {
        (**self).field_value(field)
    }
}

impl<T: FieldAccess + ?Sized> FieldAccess for Arc<T> {
    fn field_value(&self, field: &FieldDescriptor) -> Result<Value> {
        (**self).field_value(field)
    }
}

/// Loosely typed records: a missing entry is an access failure, not a null.
impl<S: BuildHasher> FieldAccess for HashMap<String, Value, S> {
    fn field_value(&self, field: &FieldDescriptor) -> Result<Value> {
        self.get(&field.name)
            .cloned()
            .ok_or_else(|| anyhow!("record has no field `{}`", field.name))
    }
}

impl FieldAccess for BTreeMap<String, Value> {
    fn field_value(&self, field: &FieldDescriptor) -> Result<Value> {
        self.get(&field.name)
            .cloned()
            .ok_or_else(|| anyhow!("record has no field `{}`", field.name))
    }
}

impl FieldAccess for MapValue {
    fn field_value(&self, field: &FieldDescriptor) -> Result<Value> {
        self.get(&field.name)
            .cloned()
            .ok_or_else(|| anyhow!("record has no field `{}`", field.name))
    }
}

/// JSON objects, typically produced by serializing a `Serialize` record.
#[cfg(feature = "serde-records")]
impl FieldAccess for serde_json::Value {
    fn field_value(&self, field: &FieldDescriptor) -> Result<Value> {
        let obj = self
            .as_object()
            .ok_or_else(|| anyhow!("record is not a JSON object"))?;
        obj.get(&field.name)
            .cloned()
            .map(Value::from)
            .ok_or_else(|| anyhow!("record has no field `{}`", field.name))
    }
}

/// Read `field` off record `index`, tagging any failure with where it happened.
pub(crate) fn read_field<R: FieldAccess + ?Sized>(
    record: &R,
    field: &FieldDescriptor,
    index: usize,
    stage: Stage,
) -> GenerationResult<Value> {
    record.field_value(field).map_err(|e| {
        GenerationError::new(stage, e)
            .with_field(field.name.as_str())
            .with_record(index)
    })
}

/// View a map-declared field's value as a map. Null means "no keys".
pub(crate) fn as_declared_map<'v>(
    value: &'v Value,
    field: &FieldDescriptor,
) -> Result<Option<&'v MapValue>> {
    match value {
        Value::Null => Ok(None),
        Value::Map(m) => Ok(Some(m)),
        other => Err(anyhow!(
            "unexpected value shape: field `{}` is declared as a map but holds a value of kind {}",
            field.name,
            other.kind_name()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashmap_records_report_missing_fields() {
        let mut rec: HashMap<String, Value> = HashMap::new();
        rec.insert("a".into(), Value::from(1u32));
        let present = rec.field_value(&FieldDescriptor::scalar("a")).unwrap();
        assert_eq!(present, Value::UInt(1));
        let err = rec.field_value(&FieldDescriptor::scalar("b")).unwrap_err();
        assert_eq!(err.to_string(), "record has no field `b`");
    }

    #[test]
    fn references_delegate() {
        let mut rec = BTreeMap::new();
        rec.insert("a".to_string(), Value::from("x"));
        let by_ref: &BTreeMap<String, Value> = &rec;
        let boxed: Box<dyn FieldAccess> = Box::new(rec.clone());
        let field = FieldDescriptor::scalar("a");
        assert_eq!(by_ref.field_value(&field).unwrap(), Value::from("x"));
        assert_eq!(boxed.field_value(&field).unwrap(), Value::from("x"));
    }

    #[test]
    fn declared_maps_reject_scalars() {
        let field = FieldDescriptor::map("m", crate::MapKeyPolicy::Dynamic);
        assert!(as_declared_map(&Value::Null, &field).unwrap().is_none());
        let map = Value::Map(MapValue::new().with("k", 1u32));
        assert_eq!(as_declared_map(&map, &field).unwrap().map(MapValue::len), Some(1));
        let err = as_declared_map(&Value::from(5u32), &field).unwrap_err();
        assert!(err.to_string().contains("declared as a map but holds a value of kind integer"));
    }

    #[cfg(feature = "serde-records")]
    #[test]
    fn json_non_objects_fail() {
        let rec = serde_json::json!([1, 2]);
        let err = rec.field_value(&FieldDescriptor::scalar("a")).unwrap_err();
        assert!(err.to_string().contains("not a JSON object"));
    }
}
