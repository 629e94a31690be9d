//! Schemas: ordered, name-indexed collections of column codecs.
//!
//! A [`Schema`] turns a raw record (one string per field) into typed values
//! and back. It enforces that the record has exactly one field per declared
//! column, and routes per-field failures through an optional
//! [`ColumnErrorHandler`](crate::ColumnErrorHandler).
//!
//! A [`FixedWidthSchema`] pairs each codec with a [`Window`] describing where
//! the column sits in a fixed-width record.
//!
//! Column names are trimmed, must not be blank, and are unique without regard
//! to case. Once built, a schema is immutable and can be shared by any number
//! of readers and writers.
//!
//! ## Examples
//!
//! ```rust
//! use flatfile::{ColumnCodec, Schema, Value};
//!
//! let schema = Schema::new()
//!     .with_column(ColumnCodec::int32("Id")).unwrap()
//!     .with_column(ColumnCodec::string("Name")).unwrap();
//!
//! assert_eq!(schema.index_of("name"), Some(1));
//! let values = schema.parse_values(&["1".into(), "Bob".into()], 1, None).unwrap();
//! assert_eq!(values, vec![Value::Int(1), Value::from("Bob")]);
//!
//! assert!(schema.parse_values(&["1".into()], 7, None).is_err());
//! ```

use indexmap::IndexMap;

use crate::events::{ColumnErrorEvent, ColumnErrorHandler};
use crate::options::{Alignment, TruncationPolicy};
use crate::{ColumnCodec, Error, Result, Value};

/// An ordered sequence of column codecs keyed by case-insensitive name.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    columns: IndexMap<String, ColumnCodec>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColumnName`] for a blank name and
    /// [`Error::DuplicateColumn`] when the name is already taken.
    pub fn add_column(&mut self, column: ColumnCodec) -> Result<&mut Self> {
        let name = column.name();
        if name.is_empty() {
            return Err(Error::InvalidColumnName(name.to_string()));
        }
        let key = name.to_lowercase();
        if self.columns.contains_key(&key) {
            return Err(Error::DuplicateColumn(name.to_string()));
        }
        self.columns.insert(key, column);
        Ok(self)
    }

    /// Builder form of [`add_column`](Self::add_column).
    pub fn with_column(mut self, column: ColumnCodec) -> Result<Self> {
        self.add_column(column)?;
        Ok(self)
    }

    /// Number of physical fields, ignored columns included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of values in a parsed record (ignored columns excluded).
    #[must_use]
    pub fn logical_len(&self) -> usize {
        self.columns.values().filter(|c| !c.is_ignored()).count()
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColumnCodec> {
        self.columns.values()
    }

    /// Looks up a column by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnCodec> {
        self.columns.get(&name.trim().to_lowercase())
    }

    /// Physical position of a column.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(&name.trim().to_lowercase())
    }

    /// Names of every column, ignored columns included.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.values().map(ColumnCodec::name).collect()
    }

    /// Converts a raw record into typed values, one per non-ignored column.
    ///
    /// `record_number` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldCount`] when the record does not have one field
    /// per column, and [`Error::Column`] for an unhandled conversion failure.
    pub fn parse_values(
        &self,
        raw: &[String],
        record_number: usize,
        mut handler: Option<&mut ColumnErrorHandler>,
    ) -> Result<Vec<Value>> {
        if raw.len() != self.columns.len() {
            return Err(Error::FieldCount {
                record: record_number,
                expected: self.columns.len(),
                found: raw.len(),
            });
        }

        let mut values = Vec::with_capacity(raw.len());
        for (column, text) in self.columns.values().zip(raw) {
            if column.is_ignored() {
                continue;
            }
            let value = match column.parse(text) {
                Ok(value) => value,
                Err(error) => {
                    let mut event = ColumnErrorEvent {
                        record_number,
                        column: column.name(),
                        raw: Some(text),
                        value: None,
                        error: &error,
                        substitute: None,
                        handled: false,
                    };
                    substitute_or_fail(handler.as_deref_mut(), &mut event)?
                }
            };
            values.push(value);
        }
        Ok(values)
    }

    /// Converts typed values into raw field text, one per column.
    ///
    /// Ignored columns receive an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldCount`] when `values` does not match
    /// [`logical_len`](Self::logical_len), and [`Error::Column`] for an
    /// unhandled formatting failure.
    pub fn format_values(
        &self,
        values: &[Value],
        record_number: usize,
        mut handler: Option<&mut ColumnErrorHandler>,
    ) -> Result<Vec<String>> {
        let expected = self.logical_len();
        if values.len() != expected {
            return Err(Error::FieldCount {
                record: record_number,
                expected,
                found: values.len(),
            });
        }

        let mut texts = Vec::with_capacity(self.columns.len());
        let mut values = values.iter();
        for column in self.columns.values() {
            if column.is_ignored() {
                texts.push(String::new());
                continue;
            }
            let Some(value) = values.next() else {
                break;
            };
            let text = match column.format(value) {
                Ok(text) => text,
                Err(error) => {
                    let mut event = ColumnErrorEvent {
                        record_number,
                        column: column.name(),
                        raw: None,
                        value: Some(value),
                        error: &error,
                        substitute: None,
                        handled: false,
                    };
                    let substitute = substitute_or_fail(handler.as_deref_mut(), &mut event)?;
                    column
                        .format(&substitute)
                        .map_err(|e| Error::column(column.name(), record_number, e))?
                }
            };
            texts.push(text);
        }
        Ok(texts)
    }
}

fn substitute_or_fail(
    handler: Option<&mut ColumnErrorHandler>,
    event: &mut ColumnErrorEvent<'_>,
) -> Result<Value> {
    if let Some(handler) = handler {
        handler(event);
        if event.handled {
            log::warn!(
                "substituting a value for column '{}' in record {}: {}",
                event.column,
                event.record_number,
                event.error
            );
            return Ok(event.substitute.take().unwrap_or_default());
        }
    }
    Err(Error::column(
        event.column,
        event.record_number,
        event.error.clone(),
    ))
}

/// Where a column sits in a fixed-width record.
///
/// Unset alignment, fill and truncation fall back to the reader or writer
/// options; on read, a window without an alignment trims fill on both sides.
///
/// # Examples
///
/// ```rust
/// use flatfile::{Alignment, Window};
///
/// let window = Window::new(10).with_alignment(Alignment::Right).with_fill('0');
/// assert_eq!(window.width, 10);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub width: usize,
    pub alignment: Option<Alignment>,
    pub fill: Option<char>,
    pub truncation: Option<TruncationPolicy>,
}

impl Window {
    #[must_use]
    pub const fn new(width: usize) -> Self {
        Window {
            width,
            alignment: None,
            fill: None,
            truncation: None,
        }
    }

    #[must_use]
    pub const fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    #[must_use]
    pub const fn with_fill(mut self, fill: char) -> Self {
        self.fill = Some(fill);
        self
    }

    #[must_use]
    pub const fn with_truncation(mut self, policy: TruncationPolicy) -> Self {
        self.truncation = Some(policy);
        self
    }
}

/// A schema plus one [`Window`] per column, index for index.
///
/// # Examples
///
/// ```rust
/// use flatfile::{ColumnCodec, FixedWidthSchema, Window};
///
/// let schema = FixedWidthSchema::new()
///     .with_column(ColumnCodec::int32("Id"), Window::new(5)).unwrap()
///     .with_column(ColumnCodec::string("Name"), Window::new(10)).unwrap();
/// assert_eq!(schema.total_width(), 15);
/// ```
#[derive(Clone, Debug, Default)]
pub struct FixedWidthSchema {
    schema: Schema,
    windows: Vec<Window>,
}

impl FixedWidthSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column together with its window.
    ///
    /// # Errors
    ///
    /// Same as [`Schema::add_column`].
    pub fn add_column(&mut self, column: ColumnCodec, window: Window) -> Result<&mut Self> {
        self.schema.add_column(column)?;
        self.windows.push(window);
        Ok(self)
    }

    pub fn with_column(mut self, column: ColumnCodec, window: Window) -> Result<Self> {
        self.add_column(column, window)?;
        Ok(self)
    }

    #[inline]
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[inline]
    #[must_use]
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// Sum of all window widths: the length of every record.
    #[must_use]
    pub fn total_width(&self) -> usize {
        self.windows.iter().map(|w| w.width).sum()
    }
}
