//! The single error type raised by CSV generation.
//!
//! Every failure while reading a field off a record (during the key scan or
//! while emitting rows) aborts the whole call and surfaces as a
//! [`GenerationError`]. The original cause is kept as an [`anyhow::Error`] so
//! accessor implementations can attach their own context.

use std::error::Error as StdError;
use std::fmt;

/// Result alias for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Where in the generation sequence a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Collecting observed map keys before the header is built.
    Scan,
    /// Rendering a data row.
    Emit,
    /// Converting a record into an accessible form (serde records only).
    Convert,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Scan => "scanning map keys",
            Stage::Emit => "emitting rows",
            Stage::Convert => "converting records",
        };
        f.write_str(s)
    }
}

/// A failure that aborted CSV generation. No partial output accompanies it.
#[derive(Debug)]
pub struct GenerationError {
    stage: Stage,
    field: Option<String>,
    record: Option<usize>,
    cause: anyhow::Error,
}

impl GenerationError {
    /// Wrap `cause` as a failure at `stage`.
    pub fn new(stage: Stage, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            stage,
            field: None,
            record: None,
            cause: cause.into(),
        }
    }

    /// Attach the name of the field being read.
    #[must_use]
    pub fn with_field<S: Into<String>>(mut self, field: S) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach the zero-based index of the record being read.
    #[must_use]
    pub fn with_record(mut self, index: usize) -> Self {
        self.record = Some(index);
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Zero-based index of the offending record, if the failure is tied to one.
    pub fn record_index(&self) -> Option<usize> {
        self.record
    }

    /// The underlying failure reported by the accessor.
    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    pub fn into_cause(self) -> anyhow::Error {
        self.cause
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CSV generation failed while {}", self.stage)?;
        if let Some(ref field) = self.field {
            write!(f, " (field `{field}`")?;
            if let Some(idx) = self.record {
                write!(f, ", record #{idx}")?;
            }
            f.write_str(")")?;
        } else if let Some(idx) = self.record {
            write!(f, " (record #{idx})")?;
        }
        write!(f, ": {}", self.cause)
    }
}

impl StdError for GenerationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        let cause: &(dyn StdError + 'static) = self.cause.as_ref();
        Some(cause)
    }
}
