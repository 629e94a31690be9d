//! Delimited (separated-value) files.
//!
//! Fields are split by a separator and records by a record separator; both
//! may be any non-empty string. A field that starts with the quote character
//! runs to the matching closing quote, may contain separators and line
//! breaks, and spells a literal quote by doubling it.
//!
//! Unless whitespace is preserved, whitespace around unquoted fields and
//! between a closing quote and the next separator is dropped. With
//! whitespace preserved, a quote only opens a quoted field as the field's
//! very first character.
//!
//! A newline record separator (`"\n"` or `"\r\n"`) accepts either line
//! ending on read.
//!
//! ## Examples
//!
//! ```rust
//! use flatfile::{DelimitedOptions, DelimitedReader, RecordReader, Value};
//!
//! let options = DelimitedOptions::new().with_first_record_schema(true);
//! let mut reader = DelimitedReader::new("name,city\nAda,London\n".as_bytes(), options).unwrap();
//!
//! assert_eq!(reader.schema().unwrap().column_names(), vec!["name", "city"]);
//! assert!(reader.read().unwrap());
//! assert_eq!(reader.get_values().unwrap()[1], Value::from("London"));
//! assert_eq!(reader.physical_record_number(), 2);
//! assert_eq!(reader.logical_record_number(), 1);
//! ```

mod parser;
mod reader;
mod writer;

pub use reader::DelimitedReader;
pub use writer::DelimitedWriter;
