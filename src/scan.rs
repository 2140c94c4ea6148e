//! Data scanner: one pass over the records to collect observed map keys.
//!
//! Only map fields whose policy needs data (see
//! [`MapKeyPolicy::needs_scan`](crate::MapKeyPolicy::needs_scan)) take part:
//!
//! - **dynamic** fields get their own [`KeySet`], in first-seen order
//! - **explicit, `include_null = false`** fields feed one shared pool; the
//!   planner only asks "was this key seen anywhere" for them
//!
//! A null map on a record contributes no keys. Any access failure aborts the
//! pass.

use crate::descriptor::FieldDescriptor;
use crate::error::{GenerationError, GenerationResult, Stage};
use crate::record::{FieldAccess, as_declared_map, read_field};
use std::collections::{HashMap, HashSet};

/// An insertion-ordered set of map keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key`; returns `false` if it was already present.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_owned());
        self.order.push(key.to_owned());
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Keys in first-seen order.
    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<'a> Extend<&'a str> for KeySet {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

/// Map fields that need the scan, identified by their position in the
/// resolved field list.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest<'a> {
    pub dynamic: Vec<(usize, &'a FieldDescriptor)>,
    pub filtered: Vec<(usize, &'a FieldDescriptor)>,
}

impl ScanRequest<'_> {
    pub fn is_empty(&self) -> bool {
        self.dynamic.is_empty() && self.filtered.is_empty()
    }
}

/// Keys collected by [`scan`].
#[derive(Debug, Clone, Default)]
pub struct ObservedKeys {
    per_field: HashMap<usize, KeySet>,
    shared: KeySet,
}

impl ObservedKeys {
    /// Keys seen for the dynamic field at position `field`, in discovery order.
    pub fn for_field(&self, field: usize) -> Option<&KeySet> {
        self.per_field.get(&field)
    }

    /// Keys seen across all explicit, non-null-including fields.
    pub fn shared(&self) -> &KeySet {
        &self.shared
    }

    /// Take the discovered keys of a dynamic field, leaving it empty.
    pub(crate) fn take_field(&mut self, field: usize) -> KeySet {
        self.per_field.remove(&field).unwrap_or_default()
    }
}

/// Walk `records` once and collect the keys requested by `request`.
pub fn scan<R: FieldAccess>(
    records: &[R],
    request: &ScanRequest<'_>,
) -> GenerationResult<ObservedKeys> {
    let mut observed = ObservedKeys::default();
    for &(idx, _) in &request.dynamic {
        observed.per_field.entry(idx).or_default();
    }

    for (row, record) in records.iter().enumerate() {
        for &(idx, field) in &request.dynamic {
            let value = read_field(record, field, row, Stage::Scan)?;
            if let Some(map) = as_declared_map(&value, field).map_err(|e| tag(e, field, row))? {
                observed.per_field.entry(idx).or_default().extend(map.keys());
            }
        }
        for &(_, field) in &request.filtered {
            let value = read_field(record, field, row, Stage::Scan)?;
            if let Some(map) = as_declared_map(&value, field).map_err(|e| tag(e, field, row))? {
                observed.shared.extend(map.keys());
            }
        }
    }

    for &(idx, field) in &request.dynamic {
        tracing::trace!(
            field = %field.name,
            keys = observed.for_field(idx).map_or(0, KeySet::len),
            "discovered map keys"
        );
    }
    Ok(observed)
}

fn tag(cause: anyhow::Error, field: &FieldDescriptor, row: usize) -> GenerationError {
    GenerationError::new(Stage::Scan, cause)
        .with_field(field.name.as_str())
        .with_record(row)
}
