//! Error types for flat-file reading and writing.
//!
//! This module provides error reporting with enough context to find the
//! offending record and column in the source file.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: malformed quoting in delimited text
//! - **Shape Errors**: wrong field count or wrong record width against a schema
//! - **Value Errors**: a single column's text fails type conversion
//! - **I/O Errors**: reading/writing the underlying stream failed
//!
//! Syntax and shape errors are record-level: they carry the physical record
//! number. Value errors are wrapped in [`Error::Column`] once the schema knows
//! which column and record they belong to.
//!
//! ## Examples
//!
//! ```rust
//! use flatfile::{DelimitedOptions, DelimitedReader, RecordReader};
//!
//! let mut reader = DelimitedReader::new("\"abc".as_bytes(), DelimitedOptions::new()).unwrap();
//! let err = reader.read().unwrap_err();
//! assert!(err.is_syntax());
//! assert_eq!(err.record_number(), Some(1));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while reading or writing flat files.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The byte stream is not valid in the configured text encoding
    #[error("Invalid {encoding} text at byte offset {offset}")]
    Encoding {
        encoding: &'static str,
        offset: u64,
    },

    /// Malformed quoting in a delimited record
    #[error("Syntax error in record {record}: {message}")]
    Syntax { record: usize, message: String },

    /// A record has a different number of fields than the schema declares
    #[error("Record {record} has {found} fields, but the schema declares {expected}")]
    FieldCount {
        record: usize,
        expected: usize,
        found: usize,
    },

    /// A fixed-width record has a different length than its windows add up to
    #[error("Record {record} is {found} characters wide, but the windows add up to {expected}")]
    RecordWidth {
        record: usize,
        expected: usize,
        found: usize,
    },

    /// No schema of a selector accepted the record
    #[error("No schema matches record {record}")]
    NoMatchingSchema { record: usize },

    /// A column failed to parse or format a value
    #[error("Column '{column}' failed in record {record}: {source}")]
    Column {
        column: String,
        record: usize,
        #[source]
        source: Box<Error>,
    },

    /// Raw text could not be converted to the column's type
    #[error("Cannot convert '{value}' to {target}: {message}")]
    Conversion {
        value: String,
        target: &'static str,
        message: String,
    },

    /// A value could not be formatted by its column
    #[error("Format error: {0}")]
    Format(String),

    /// Column names must contain something other than whitespace
    #[error("Invalid column name: '{0}'")]
    InvalidColumnName(String),

    /// Column names are unique (case-insensitively) within a schema
    #[error("Duplicate column name: '{0}'")]
    DuplicateColumn(String),

    /// The operation needs a schema and none was given or read
    #[error("No schema is defined")]
    SchemaNotDefined,

    /// The reader or writer is not in a state that allows the operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Options are inconsistent
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error for the given physical record.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatfile::Error;
    ///
    /// let err = Error::syntax(10, "unterminated quote");
    /// assert!(err.to_string().contains("record 10"));
    /// ```
    pub fn syntax(record: usize, message: &str) -> Self {
        Error::Syntax {
            record,
            message: message.to_string(),
        }
    }

    /// Creates a conversion error for text that does not fit the target type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatfile::Error;
    ///
    /// let err = Error::conversion("abc", "i32", "invalid digit");
    /// assert!(err.to_string().contains("'abc'"));
    /// ```
    pub fn conversion<M: fmt::Display>(value: &str, target: &'static str, message: M) -> Self {
        Error::Conversion {
            value: value.to_string(),
            target,
            message: message.to_string(),
        }
    }

    /// Wraps a value error with the column and record it occurred in.
    pub fn column(column: &str, record: usize, source: Error) -> Self {
        Error::Column {
            column: column.to_string(),
            record,
            source: Box::new(source),
        }
    }

    /// Creates a format error.
    pub fn format<M: fmt::Display>(message: M) -> Self {
        Error::Format(message.to_string())
    }

    /// Creates an invalid state error.
    pub fn invalid_state(message: &str) -> Self {
        Error::InvalidState(message.to_string())
    }

    /// Creates a configuration error.
    pub fn configuration(message: &str) -> Self {
        Error::Configuration(message.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatfile::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns `true` for malformed quoting.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. })
    }

    /// Returns `true` for field-count and record-width mismatches, and for
    /// records no selector schema accepts.
    #[must_use]
    pub fn is_record_shape(&self) -> bool {
        matches!(
            self,
            Error::FieldCount { .. } | Error::RecordWidth { .. } | Error::NoMatchingSchema { .. }
        )
    }

    /// The physical record number this error is tied to, if any.
    #[must_use]
    pub fn record_number(&self) -> Option<usize> {
        match self {
            Error::Syntax { record, .. }
            | Error::FieldCount { record, .. }
            | Error::RecordWidth { record, .. }
            | Error::NoMatchingSchema { record }
            | Error::Column { record, .. } => Some(*record),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
