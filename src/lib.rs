//! # flatfile
//!
//! Streaming readers and writers for flat files: delimited text (CSV, TSV,
//! pipe-separated and friends) and fixed-width text.
//!
//! ## Key Features
//!
//! - **Streaming**: records are tokenized from any `io::Read` through a
//!   growable ring buffer; only the current record is held in memory
//! - **Arbitrary Separators**: field and record separators of any length,
//!   matched longest-first without backtracking
//! - **Typed Columns**: a [`Schema`] of [`ColumnCodec`]s turns raw text into
//!   [`Value`]s and back, with configurable nulls, number formats and hooks
//! - **Error Hooks**: callers decide per record or per column whether a
//!   failure is fatal, skipped, or substituted
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! flatfile = "0.1"
//! ```
//!
//! ### Reading and Writing Delimited Text
//!
//! ```rust
//! use flatfile::{record, ColumnCodec, DelimitedOptions, Schema};
//!
//! let schema = Schema::new()
//!     .with_column(ColumnCodec::int32("Id")).unwrap()
//!     .with_column(ColumnCodec::string("Name")).unwrap();
//! let options = DelimitedOptions::new().with_record_separator("\n");
//!
//! let records = vec![record![1, "Ada"], record![2, "Smith, Bob"]];
//! let text = flatfile::to_delimited_string(&records, &schema, options.clone()).unwrap();
//! assert_eq!(text, "1,Ada\n2,\"Smith, Bob\"\n");
//!
//! let back = flatfile::from_delimited_str(&text, &schema, options).unwrap();
//! assert_eq!(back, records);
//! ```
//!
//! ### Fixed-Width Text
//!
//! ```rust
//! use flatfile::{record, Alignment, ColumnCodec, FixedWidthOptions, FixedWidthSchema, Window};
//!
//! let schema = FixedWidthSchema::new()
//!     .with_column(ColumnCodec::int32("Id"), Window::new(5).with_alignment(Alignment::Right)).unwrap()
//!     .with_column(ColumnCodec::string("Name"), Window::new(8)).unwrap();
//! let options = FixedWidthOptions::new().with_record_separator("\n");
//!
//! let text = flatfile::to_fixed_width_string(&[record![42, "Ada"]], &schema, options.clone()).unwrap();
//! assert_eq!(text, "   42Ada     \n");
//!
//! let back = flatfile::from_fixed_width_str(&text, &schema, options).unwrap();
//! assert_eq!(back, vec![record![42, "Ada"]]);
//! ```
//!
//! ### Streaming with Error Handling
//!
//! ```rust
//! use flatfile::{ColumnCodec, DelimitedOptions, DelimitedReader, RecordReader, Schema};
//!
//! let schema = Schema::new().with_column(ColumnCodec::int32("Id")).unwrap();
//! let text = "1\n2,extra\n3\n";
//! let mut reader = DelimitedReader::with_schema(text.as_bytes(), schema, DelimitedOptions::new()).unwrap();
//! reader.on_record_error(|event| event.handled = event.error.is_record_shape());
//!
//! let count = reader.records().filter(Result::is_ok).count();
//! assert_eq!(count, 2);
//! ```
//!
//! ## Format Reference
//!
//! See the [`format`] module for the exact reading and writing rules of both
//! layouts.

pub mod column;
mod cursor;
pub mod decimal;
pub mod delimited;
pub mod error;
pub mod events;
pub mod fixed_width;
pub mod format;
pub mod macros;
pub mod mapper;
pub mod options;
pub mod ring_buffer;
pub mod schema;
pub mod selector;
mod source;
pub mod traits;
pub mod value;

pub use column::{
    ByteEncoding, ColumnCodec, ColumnType, CustomConverter, EnumFormat, FloatKind, GuidFormat,
    IntegerKind, NullFormatter, NumberFormat,
};
pub use decimal::Decimal;
pub use delimited::{DelimitedReader, DelimitedWriter};
pub use error::{Error, Result};
pub use events::{ColumnErrorEvent, ColumnErrorHandler, RecordErrorEvent, RecordErrorHandler};
pub use fixed_width::{FixedWidthReader, FixedWidthWriter};
pub use mapper::TypeMapper;
pub use options::{
    Alignment, DelimitedOptions, Encoding, FixedWidthOptions, QuoteBehavior, TruncationPolicy,
};
pub use ring_buffer::RingBuffer;
pub use schema::{FixedWidthSchema, Schema, Window};
pub use selector::SchemaSelector;
pub use traits::{RecordReader, RecordWriter, Records};
pub use value::Value;

use std::io;

/// Reads every record of delimited `text` with `schema`.
///
/// # Examples
///
/// ```rust
/// use flatfile::{ColumnCodec, DelimitedOptions, Schema, Value};
///
/// let schema = Schema::new().with_column(ColumnCodec::boolean("Active")).unwrap();
/// let records = flatfile::from_delimited_str("true\nfalse", &schema, DelimitedOptions::new()).unwrap();
/// assert_eq!(records, vec![vec![Value::Bool(true)], vec![Value::Bool(false)]]);
/// ```
///
/// # Errors
///
/// Returns the first unhandled syntax, shape, or conversion error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_delimited_str(
    text: &str,
    schema: &Schema,
    options: DelimitedOptions,
) -> Result<Vec<Vec<Value>>> {
    from_delimited_reader(text.as_bytes(), schema, options)
}

/// Reads every record from a delimited byte stream with `schema`.
///
/// # Errors
///
/// Returns the first unhandled error, including I/O and encoding failures.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_delimited_reader<R: io::Read>(
    source: R,
    schema: &Schema,
    options: DelimitedOptions,
) -> Result<Vec<Vec<Value>>> {
    DelimitedReader::with_schema(source, schema.clone(), options)?
        .records()
        .collect()
}

/// Writes `records` as delimited text.
///
/// A header is written first when the options ask for one.
///
/// # Errors
///
/// Returns the first formatting or shape error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_delimited_string(
    records: &[Vec<Value>],
    schema: &Schema,
    options: DelimitedOptions,
) -> Result<String> {
    let mut buffer = Vec::new();
    to_delimited_writer(&mut buffer, records, schema, options)?;
    String::from_utf8(buffer).map_err(Error::format)
}

/// Writes `records` as delimited text to `writer`.
///
/// # Errors
///
/// Returns the first formatting, shape, or I/O error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_delimited_writer<W: io::Write>(
    writer: W,
    records: &[Vec<Value>],
    schema: &Schema,
    options: DelimitedOptions,
) -> Result<()> {
    let header = options.is_first_record_schema;
    let mut writer = DelimitedWriter::with_schema(writer, schema.clone(), options)?;
    if header {
        writer.write_schema()?;
    }
    for record in records {
        writer.write(record)?;
    }
    writer.flush()
}

/// Reads every record of fixed-width `text` with `schema`.
///
/// # Errors
///
/// Returns the first unhandled width or conversion error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_fixed_width_str(
    text: &str,
    schema: &FixedWidthSchema,
    options: FixedWidthOptions,
) -> Result<Vec<Vec<Value>>> {
    FixedWidthReader::new(text.as_bytes(), schema.clone(), options)?
        .records()
        .collect()
}

/// Writes `records` as fixed-width text.
///
/// # Errors
///
/// Returns the first formatting or shape error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_fixed_width_string(
    records: &[Vec<Value>],
    schema: &FixedWidthSchema,
    options: FixedWidthOptions,
) -> Result<String> {
    let mut writer = FixedWidthWriter::new(Vec::new(), schema.clone(), options)?;
    for record in records {
        writer.write(record)?;
    }
    String::from_utf8(writer.into_inner()?).map_err(Error::format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Schema {
        Schema::new()
            .with_column(ColumnCodec::int32("Id"))
            .unwrap()
            .with_column(ColumnCodec::string("Name"))
            .unwrap()
    }

    #[test]
    fn test_delimited_round_trip_with_header() {
        let options = DelimitedOptions::new()
            .with_record_separator("\n")
            .with_first_record_schema(true);
        let records = vec![record![1, "Ada"], record![2, "Grace"]];

        let text = to_delimited_string(&records, &people(), options.clone()).unwrap();
        assert_eq!(text, "Id,Name\n1,Ada\n2,Grace\n");

        let back = from_delimited_str(&text, &people(), options).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_empty_input_has_no_records() {
        let records = from_delimited_str("", &people(), DelimitedOptions::new()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_fixed_width_round_trip() {
        let schema = FixedWidthSchema::new()
            .with_column(ColumnCodec::int32("Id"), Window::new(4))
            .unwrap()
            .with_column(ColumnCodec::string("Name"), Window::new(6))
            .unwrap();
        let options = FixedWidthOptions::new().with_record_separator("\n");
        let records = vec![record![1, "Ada"], record![1234, "Grace"]];

        let text = to_fixed_width_string(&records, &schema, options.clone()).unwrap();
        assert_eq!(text, "1   Ada   \n1234Grace \n");
        assert_eq!(from_fixed_width_str(&text, &schema, options).unwrap(), records);
    }

    #[test]
    fn test_field_count_mismatch_is_reported() {
        let err = from_delimited_str("1,Ada,extra", &people(), DelimitedOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::FieldCount {
                record: 1,
                expected: 2,
                found: 3
            }
        ));
    }
}
