use std::io::Read;

use super::parser::{split_record, FixedWidthParser};
use crate::cursor::RecordCursor;
use crate::events::{ColumnErrorEvent, RecordErrorEvent};
use crate::options::FixedWidthOptions;
use crate::{Error, FixedWidthSchema, RecordReader, Result, Schema, SchemaSelector, Value};

enum ReadSchema {
    Fixed(FixedWidthSchema),
    Selected {
        selector: SchemaSelector<str, FixedWidthSchema>,
        current: Option<usize>,
    },
}

/// Reads typed records from fixed-width text.
///
/// # Examples
///
/// ```rust
/// use flatfile::{ColumnCodec, FixedWidthOptions, FixedWidthReader, FixedWidthSchema, RecordReader, Value, Window};
///
/// let schema = FixedWidthSchema::new()
///     .with_column(ColumnCodec::int32("Id"), Window::new(3)).unwrap()
///     .with_column(ColumnCodec::string("Name"), Window::new(6)).unwrap();
/// let mut reader = FixedWidthReader::new("1  Bob   \n22 Alice \n".as_bytes(), schema, FixedWidthOptions::new()).unwrap();
///
/// assert!(reader.read().unwrap());
/// assert_eq!(reader.get_values().unwrap(), &[Value::Int(1), Value::from("Bob")]);
/// assert!(reader.read().unwrap());
/// assert_eq!(reader.get_values().unwrap(), &[Value::Int(22), Value::from("Alice")]);
/// assert!(!reader.read().unwrap());
/// ```
pub struct FixedWidthReader<R> {
    parser: FixedWidthParser<R>,
    options: FixedWidthOptions,
    schema: ReadSchema,
    header_pending: bool,
    cursor: RecordCursor,
}

impl<R: Read> FixedWidthReader<R> {
    pub fn new(source: R, schema: FixedWidthSchema, options: FixedWidthOptions) -> Result<Self> {
        Self::build(source, ReadSchema::Fixed(schema), options)
    }

    /// Creates a reader that picks a schema per record from the raw line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when records are not separated, since
    /// the record width is only known once a schema is chosen.
    pub fn with_selector(
        source: R,
        selector: SchemaSelector<str, FixedWidthSchema>,
        options: FixedWidthOptions,
    ) -> Result<Self> {
        if !options.has_record_separator {
            return Err(Error::configuration(
                "selecting schemas per record requires a record separator",
            ));
        }
        let schema = ReadSchema::Selected {
            selector,
            current: None,
        };
        Self::build(source, schema, options)
    }

    fn build(source: R, schema: ReadSchema, options: FixedWidthOptions) -> Result<Self> {
        options.validate()?;
        Ok(FixedWidthReader {
            parser: FixedWidthParser::new(source, &options),
            header_pending: options.is_first_record_header,
            options,
            schema,
            cursor: RecordCursor::new(),
        })
    }

    pub fn on_record_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut RecordErrorEvent<'_>) + 'static,
    {
        self.cursor.on_record_error = Some(Box::new(handler));
        self
    }

    pub fn on_column_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut ColumnErrorEvent<'_>) + 'static,
    {
        self.cursor.on_column_error = Some(Box::new(handler));
        self
    }

    /// The fixed-width schema of the current record.
    pub fn fixed_width_schema(&self) -> Result<&FixedWidthSchema> {
        match &self.schema {
            ReadSchema::Fixed(schema) => Ok(schema),
            ReadSchema::Selected { selector, current } => current
                .and_then(|position| selector.get(position))
                .ok_or(Error::SchemaNotDefined),
        }
    }

    fn record_width(&self) -> usize {
        match &self.schema {
            ReadSchema::Fixed(schema) => schema.total_width(),
            // Only used without separators, which selectors rule out.
            ReadSchema::Selected { .. } => 0,
        }
    }

    fn skip_header(&mut self) -> Result<()> {
        self.header_pending = false;
        if self.parser.read_record(self.record_width())?.is_some() {
            self.cursor.next_physical();
            log::debug!("skipped fixed-width header record");
        }
        Ok(())
    }

    fn parse_record(&mut self, line: &str, number: usize) -> Result<Vec<Value>> {
        let handler = self.cursor.on_column_error.as_mut();
        let schema = match &mut self.schema {
            ReadSchema::Fixed(schema) => &*schema,
            ReadSchema::Selected { selector, current } => {
                let position = selector
                    .position(line)
                    .ok_or(Error::NoMatchingSchema { record: number })?;
                *current = Some(position);
                selector
                    .get(position)
                    .ok_or(Error::NoMatchingSchema { record: number })?
            }
        };
        let fields = split_record(line, schema.windows(), &self.options, number)?;
        schema.schema().parse_values(&fields, number, handler)
    }
}

impl<R: Read> RecordReader for FixedWidthReader<R> {
    fn read(&mut self) -> Result<bool> {
        if !self.cursor.ensure_readable()? {
            return Ok(false);
        }
        if self.header_pending {
            if let Err(error) = self.skip_header() {
                return Err(self.cursor.fail(error));
            }
        }

        loop {
            let line = match self.parser.read_record(self.record_width()) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.cursor.finish();
                    return Ok(false);
                }
                Err(error) => return Err(self.cursor.fail(error)),
            };
            let number = self.cursor.next_physical();

            match self.parse_record(&line, number) {
                Ok(values) => {
                    self.cursor.accept(values);
                    return Ok(true);
                }
                Err(error) => {
                    if !self.cursor.offer(number, &error) {
                        return Err(self.cursor.fail(error));
                    }
                }
            }
        }
    }

    fn get_values(&self) -> Result<&[Value]> {
        self.cursor.values()
    }

    fn schema(&mut self) -> Result<&Schema> {
        self.fixed_width_schema().map(FixedWidthSchema::schema)
    }

    fn physical_record_number(&self) -> usize {
        self.cursor.physical()
    }

    fn logical_record_number(&self) -> usize {
        self.cursor.logical()
    }
}
