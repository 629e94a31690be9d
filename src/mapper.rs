//! Binding user types to records without reflection.
//!
//! A [`TypeMapper`] is an ordered list of `(column, getter, setter)` triples.
//! From it come the [`Schema`] to read or write with, and conversions
//! between a value of the user type and one record of [`Value`]s. Because
//! the mapper only talks to [`RecordReader`] and [`RecordWriter`], the same
//! mapper works with either engine.
//!
//! ## Examples
//!
//! ```rust
//! use flatfile::{ColumnCodec, DelimitedOptions, DelimitedReader, DelimitedWriter, RecordWriter, TypeMapper, Value};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     id: i64,
//!     name: String,
//! }
//!
//! let mapper = TypeMapper::<Person>::new()
//!     .map(ColumnCodec::int32("Id"), |p| Value::from(p.id), |p, v| {
//!         p.id = i64::try_from(v)?;
//!         Ok(())
//!     })
//!     .map(ColumnCodec::string("Name"), |p| Value::from(p.name.as_str()), |p, v| {
//!         p.name = String::try_from(v)?;
//!         Ok(())
//!     });
//!
//! let people = vec![
//!     Person { id: 1, name: "Ada".to_string() },
//!     Person { id: 2, name: "Grace".to_string() },
//! ];
//!
//! let options = DelimitedOptions::new().with_record_separator("\n");
//! let mut writer = DelimitedWriter::with_schema(Vec::new(), mapper.schema().unwrap(), options.clone()).unwrap();
//! mapper.write_all(&mut writer, &people).unwrap();
//! let text = writer.into_inner().unwrap();
//!
//! let mut reader = DelimitedReader::with_schema(text.as_slice(), mapper.schema().unwrap(), options).unwrap();
//! assert_eq!(mapper.read_all(&mut reader).unwrap(), people);
//! ```

use std::fmt;

use crate::{
    ColumnCodec, Error, FixedWidthSchema, RecordReader, RecordWriter, Result, Schema, Value,
    Window,
};

type Getter<T> = Box<dyn Fn(&T) -> Value>;
type Setter<T> = Box<dyn Fn(&mut T, Value) -> Result<()>>;

struct Binding<T> {
    column: ColumnCodec,
    get: Getter<T>,
    set: Setter<T>,
}

/// Ordered column bindings for `T`.
pub struct TypeMapper<T> {
    bindings: Vec<Binding<T>>,
}

impl<T> TypeMapper<T> {
    #[must_use]
    pub fn new() -> Self {
        TypeMapper {
            bindings: Vec::new(),
        }
    }

    /// Binds the next column to a getter used for writing and a setter used
    /// for reading.
    #[must_use]
    pub fn map<G, S>(mut self, column: ColumnCodec, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Value + 'static,
        S: Fn(&mut T, Value) -> Result<()> + 'static,
    {
        self.bindings.push(Binding {
            column,
            get: Box::new(get),
            set: Box::new(set),
        });
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Builds the schema of the bound columns.
    ///
    /// # Errors
    ///
    /// Fails on blank or duplicate column names.
    pub fn schema(&self) -> Result<Schema> {
        let mut schema = Schema::new();
        for binding in &self.bindings {
            schema.add_column(binding.column.clone())?;
        }
        Ok(schema)
    }

    /// Builds a fixed-width schema, one window per bound column.
    pub fn fixed_width_schema(&self, windows: &[Window]) -> Result<FixedWidthSchema> {
        if windows.len() != self.bindings.len() {
            return Err(Error::configuration(
                "a fixed-width mapping needs exactly one window per column",
            ));
        }
        let mut schema = FixedWidthSchema::new();
        for (binding, window) in self.bindings.iter().zip(windows) {
            schema.add_column(binding.column.clone(), *window)?;
        }
        Ok(schema)
    }

    /// One value per bound column, ignored columns excluded.
    pub fn to_values(&self, item: &T) -> Vec<Value> {
        self.values_bound().map(|binding| (binding.get)(item)).collect()
    }

    // Ignored columns hold a physical field but no value, so their getter
    // and setter never run.
    fn values_bound(&self) -> impl Iterator<Item = &Binding<T>> {
        self.bindings.iter().filter(|binding| !binding.column.is_ignored())
    }

    fn value_count(&self) -> usize {
        self.values_bound().count()
    }

    /// Builds a `T` from one record's values, in binding order.
    pub fn from_values(&self, values: &[Value]) -> Result<T>
    where
        T: Default,
    {
        let expected = self.value_count();
        if values.len() != expected {
            return Err(Error::format(format!(
                "expected {} values, found {}",
                expected,
                values.len()
            )));
        }
        let mut item = T::default();
        for (binding, value) in self.values_bound().zip(values) {
            (binding.set)(&mut item, value.clone())?;
        }
        Ok(item)
    }

    /// Reads every remaining record into a `T`.
    ///
    /// Setter failures are reported as [`Error::Column`] for the record
    /// they occurred in.
    pub fn read_all<R: RecordReader>(&self, reader: &mut R) -> Result<Vec<T>>
    where
        T: Default,
    {
        let expected = self.value_count();
        let mut items = Vec::new();
        while reader.read()? {
            let record = reader.physical_record_number();
            let values = reader.get_values()?;
            if values.len() != expected {
                return Err(Error::FieldCount {
                    record,
                    expected,
                    found: values.len(),
                });
            }
            let mut item = T::default();
            for (binding, value) in self.values_bound().zip(values) {
                (binding.set)(&mut item, value.clone())
                    .map_err(|e| Error::column(binding.column.name(), record, e))?;
            }
            items.push(item);
        }
        Ok(items)
    }

    /// Writes every item and returns how many were written.
    pub fn write_all<'a, W, I>(&self, writer: &mut W, items: I) -> Result<usize>
    where
        W: RecordWriter,
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut count = 0;
        for item in items {
            writer.write(&self.to_values(item))?;
            count += 1;
        }
        writer.flush()?;
        log::debug!("wrote {} mapped records", count);
        Ok(count)
    }
}

impl<T> Default for TypeMapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TypeMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.bindings.iter().map(|binding| binding.column.name()))
            .finish()
    }
}
