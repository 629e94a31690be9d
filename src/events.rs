//! Error callbacks installed by callers on readers and writers.
//!
//! The engine never retries or recovers on its own. Instead, it offers two
//! hook points and treats an unhandled error as fatal:
//!
//! - [`RecordErrorEvent`]: a whole record failed (bad quoting, wrong shape, or
//!   a column error nobody substituted). Setting `handled` skips the record.
//! - [`ColumnErrorEvent`]: one field failed to convert. Setting `handled`
//!   replaces the value with `substitute` (null when left `None`).
//!
//! ## Examples
//!
//! ```rust
//! use flatfile::{ColumnCodec, DelimitedOptions, DelimitedReader, RecordReader, Schema, Value};
//!
//! let schema = Schema::new().with_column(ColumnCodec::int32("Id")).unwrap();
//! let mut reader = DelimitedReader::with_schema("1\nx\n3".as_bytes(), schema, DelimitedOptions::new()).unwrap();
//! reader.on_column_error(|event| {
//!     event.substitute = Some(Value::Int(-1));
//!     event.handled = true;
//! });
//!
//! let mut ids = Vec::new();
//! while reader.read().unwrap() {
//!     ids.push(reader.get_values().unwrap()[0].clone());
//! }
//! assert_eq!(ids, vec![Value::Int(1), Value::Int(-1), Value::Int(3)]);
//! ```

use crate::{Error, Value};

/// Context for a failed record.
#[derive(Debug)]
pub struct RecordErrorEvent<'a> {
    /// Physical record number (1-based, counting headers and skipped records).
    pub record_number: usize,
    pub error: &'a Error,
    /// Set to `true` to skip the record and keep going.
    pub handled: bool,
}

/// Context for a single field that failed to parse or format.
#[derive(Debug)]
pub struct ColumnErrorEvent<'a> {
    pub record_number: usize,
    pub column: &'a str,
    /// The raw text, when parsing.
    pub raw: Option<&'a str>,
    /// The value, when formatting.
    pub value: Option<&'a Value>,
    pub error: &'a Error,
    /// Replacement used when `handled` is set.
    pub substitute: Option<Value>,
    pub handled: bool,
}

pub type RecordErrorHandler = Box<dyn FnMut(&mut RecordErrorEvent<'_>)>;
pub type ColumnErrorHandler = Box<dyn FnMut(&mut ColumnErrorEvent<'_>)>;

/// Offers `error` to an optional record handler; returns `true` when handled.
pub(crate) fn offer_record_error(
    handler: Option<&mut RecordErrorHandler>,
    record_number: usize,
    error: &Error,
) -> bool {
    let Some(handler) = handler else {
        return false;
    };
    let mut event = RecordErrorEvent {
        record_number,
        error,
        handled: false,
    };
    handler(&mut event);
    if event.handled {
        log::warn!("skipping record {}: {}", record_number, error);
    }
    event.handled
}
