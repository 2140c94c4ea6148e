//! Record type descriptors and the field resolver.
//!
//! A [`RecordTypeDescriptor`] describes the shape of a record type: its own
//! declared fields plus an optional parent type whose fields are inherited.
//! Each [`FieldDescriptor`] carries the per-field markers that drive CSV
//! layout:
//!
//! - `ignored` - the field never produces a column
//! - `rename` - header text for a scalar field (defaults to the field name)
//! - [`MapKeyPolicy`] - for map-typed fields, which keys become columns
//!
//! [`resolve_fields`] flattens the hierarchy into the ordered list of fields
//! that take part in output, root ancestor first.
//!
//! Descriptors are plain data and derive serde, so a descriptor table can be
//! kept in a config file:
//!
//! ```
//! # #[cfg(feature = "serde-records")]
//! # fn main() -> anyhow::Result<()> {
//! use recordcsv::descriptor::RecordTypeDescriptor;
//!
//! let ty = RecordTypeDescriptor::from_json(r#"{
//!     "name": "Reading",
//!     "fields": [
//!         { "name": "sensor", "rename": "Sensor" },
//!         { "name": "internal_id", "ignored": true },
//!         { "name": "values", "kind": { "map": "dynamic" } }
//!     ]
//! }"#)?;
//! assert_eq!(ty.declared_fields().len(), 3);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "serde-records"))]
//! # fn main() {}
//! ```

use serde::{Deserialize, Serialize};

/// Which map keys of a map-typed field become columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapKeyPolicy {
    /// A declared, ordered key list.
    ///
    /// With `include_null = true` the declared keys are always used. With
    /// `include_null = false` only declared keys observed in at least one
    /// record survive. Either way the declared order is kept and a repeated
    /// key yields a single column.
    Explicit {
        keys: Vec<String>,
        #[serde(default = "default_include_null")]
        include_null: bool,
    },
    /// No declared keys; the key set is discovered from the data.
    #[default]
    Dynamic,
}

fn default_include_null() -> bool {
    true
}

impl MapKeyPolicy {
    /// Declared keys, used whether or not any record has them.
    pub fn explicit<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MapKeyPolicy::Explicit {
            keys: keys.into_iter().map(Into::into).collect(),
            include_null: true,
        }
    }

    /// Declared keys acting as an allow-list over the keys seen in the data.
    pub fn explicit_non_null<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MapKeyPolicy::Explicit {
            keys: keys.into_iter().map(Into::into).collect(),
            include_null: false,
        }
    }

    pub fn dynamic() -> Self {
        MapKeyPolicy::Dynamic
    }

    /// Whether resolving this policy requires a pass over the records.
    pub fn needs_scan(&self) -> bool {
        match self {
            MapKeyPolicy::Explicit { include_null, .. } => !include_null,
            MapKeyPolicy::Dynamic => true,
        }
    }
}

/// Value kind of a field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Scalar,
    Map(MapKeyPolicy),
}

/// One declared field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub ignored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
}

impl FieldDescriptor {
    pub fn scalar<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Scalar,
            ignored: false,
            rename: None,
        }
    }

    pub fn map<S: Into<String>>(name: S, policy: MapKeyPolicy) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Map(policy),
            ignored: false,
            rename: None,
        }
    }

    /// Header text override. Only scalar fields use it; a map field's
    /// columns are always named after its keys.
    #[must_use]
    pub fn renamed<S: Into<String>>(mut self, display: S) -> Self {
        self.rename = Some(display.into());
        self
    }

    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Header text for a scalar field.
    pub fn header_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    pub fn is_map(&self) -> bool {
        matches!(self.kind, FieldKind::Map(_))
    }

    pub fn map_policy(&self) -> Option<&MapKeyPolicy> {
        match &self.kind {
            FieldKind::Map(policy) => Some(policy),
            FieldKind::Scalar => None,
        }
    }
}

/// The shape of a record type: own fields plus an optional parent type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTypeDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<RecordTypeDescriptor>>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl RecordTypeDescriptor {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
        }
    }

    /// Inherit all fields of `parent`; they are output before this type's own.
    #[must_use]
    pub fn extends(mut self, parent: RecordTypeDescriptor) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn scalar<S: Into<String>>(self, name: S) -> Self {
        self.field(FieldDescriptor::scalar(name))
    }

    #[must_use]
    pub fn scalar_as<S: Into<String>, D: Into<String>>(self, name: S, display: D) -> Self {
        self.field(FieldDescriptor::scalar(name).renamed(display))
    }

    #[must_use]
    pub fn map<S: Into<String>>(self, name: S, policy: MapKeyPolicy) -> Self {
        self.field(FieldDescriptor::map(name, policy))
    }

    /// Declare a scalar field that never reaches the output.
    #[must_use]
    pub fn ignore<S: Into<String>>(self, name: S) -> Self {
        self.field(FieldDescriptor::scalar(name).ignored())
    }

    /// Fields declared directly on this type, ignored ones included.
    pub fn declared_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The type chain from the root ancestor down to `self`.
    pub fn ancestry(&self) -> Vec<&RecordTypeDescriptor> {
        let mut chain = Vec::new();
        let mut cur = Some(self);
        while let Some(ty) = cur {
            chain.push(ty);
            cur = ty.parent.as_deref();
        }
        chain.reverse();
        chain
    }

    /// Parse a descriptor table from JSON.
    #[cfg(feature = "serde-records")]
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        serde_json::from_str(text).context("parse record type descriptor")
    }
}

/// Ordered output-eligible fields of `record_type`.
///
/// Walks from the root ancestor down to `record_type`, keeping declaration
/// order within each level and dropping ignored fields. An empty result is
/// valid and yields an empty header.
pub fn resolve_fields(record_type: &RecordTypeDescriptor) -> Vec<&FieldDescriptor> {
    record_type
        .ancestry()
        .into_iter()
        .flat_map(|ty| ty.fields.iter())
        .filter(|f| !f.ignored)
        .collect()
}
