use std::io::Read;

use super::parser::DelimitedParser;
use crate::cursor::RecordCursor;
use crate::events::{ColumnErrorEvent, RecordErrorEvent};
use crate::options::DelimitedOptions;
use crate::{ColumnCodec, Error, RecordReader, Result, Schema, SchemaSelector, Value};

enum ReadSchema {
    /// Values are the raw field strings.
    Untyped,
    Fixed(Schema),
    Selected {
        selector: SchemaSelector<[String], Schema>,
        current: Option<usize>,
    },
}

/// Reads typed records from delimited text.
///
/// # Examples
///
/// ```rust
/// use flatfile::{ColumnCodec, DelimitedOptions, DelimitedReader, RecordReader, Schema, Value};
///
/// let schema = Schema::new()
///     .with_column(ColumnCodec::int32("Id")).unwrap()
///     .with_column(ColumnCodec::string("Name")).unwrap();
/// let mut reader = DelimitedReader::with_schema(
///     "1,'a,b'\n2,'it''s'\n".as_bytes(),
///     schema,
///     DelimitedOptions::new().with_quote('\''),
/// ).unwrap();
///
/// assert!(reader.read().unwrap());
/// assert_eq!(reader.get_values().unwrap(), &[Value::Int(1), Value::from("a,b")]);
/// assert!(reader.read().unwrap());
/// assert_eq!(reader.get_values().unwrap()[1], Value::from("it's"));
/// assert!(!reader.read().unwrap());
/// ```
pub struct DelimitedReader<R> {
    parser: DelimitedParser<R>,
    schema: ReadSchema,
    header_pending: bool,
    cursor: RecordCursor,
}

impl<R: Read> DelimitedReader<R> {
    /// Creates a reader without a schema.
    ///
    /// Records come back as [`Value::String`]s, unless the options say the
    /// first record is a header, in which case the header defines a schema
    /// of string columns.
    pub fn new(source: R, options: DelimitedOptions) -> Result<Self> {
        Self::build(source, ReadSchema::Untyped, options)
    }

    /// Creates a reader that parses every record with `schema`.
    ///
    /// A header record, if the options announce one, is skipped.
    pub fn with_schema(source: R, schema: Schema, options: DelimitedOptions) -> Result<Self> {
        Self::build(source, ReadSchema::Fixed(schema), options)
    }

    /// Creates a reader that picks a schema per record from its raw fields.
    pub fn with_selector(
        source: R,
        selector: SchemaSelector<[String], Schema>,
        options: DelimitedOptions,
    ) -> Result<Self> {
        let schema = ReadSchema::Selected {
            selector,
            current: None,
        };
        Self::build(source, schema, options)
    }

    fn build(source: R, schema: ReadSchema, options: DelimitedOptions) -> Result<Self> {
        options.validate()?;
        Ok(DelimitedReader {
            parser: DelimitedParser::new(source, &options),
            schema,
            header_pending: options.is_first_record_schema,
            cursor: RecordCursor::new(),
        })
    }

    /// Installs a handler for records that fail as a whole.
    pub fn on_record_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut RecordErrorEvent<'_>) + 'static,
    {
        self.cursor.on_record_error = Some(Box::new(handler));
        self
    }

    /// Installs a handler for fields that fail to convert.
    pub fn on_column_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut ColumnErrorEvent<'_>) + 'static,
    {
        self.cursor.on_column_error = Some(Box::new(handler));
        self
    }

    fn read_header(&mut self) -> Result<()> {
        self.header_pending = false;
        let number = self.cursor.physical() + 1;
        let Some(names) = self.parser.read_record(number)? else {
            return Ok(());
        };
        self.cursor.next_physical();

        if let ReadSchema::Untyped = self.schema {
            let mut schema = Schema::new();
            for name in &names {
                schema.add_column(ColumnCodec::string(name))?;
            }
            log::debug!("inferred {} string columns from the header", schema.len());
            self.schema = ReadSchema::Fixed(schema);
        } else {
            log::debug!("skipped header record with {} fields", names.len());
        }
        Ok(())
    }

    fn parse_record(&mut self, raw: Vec<String>, number: usize) -> Result<Vec<Value>> {
        let handler = self.cursor.on_column_error.as_mut();
        match &mut self.schema {
            ReadSchema::Untyped => Ok(raw.into_iter().map(Value::String).collect()),
            ReadSchema::Fixed(schema) => schema.parse_values(&raw, number, handler),
            ReadSchema::Selected { selector, current } => {
                let position = selector
                    .position(&raw)
                    .ok_or(Error::NoMatchingSchema { record: number })?;
                *current = Some(position);
                let schema = selector
                    .get(position)
                    .ok_or(Error::NoMatchingSchema { record: number })?;
                schema.parse_values(&raw, number, handler)
            }
        }
    }
}

impl<R: Read> RecordReader for DelimitedReader<R> {
    fn read(&mut self) -> Result<bool> {
        if !self.cursor.ensure_readable()? {
            return Ok(false);
        }
        if self.header_pending {
            if let Err(error) = self.read_header() {
                return Err(self.cursor.fail(error));
            }
        }

        loop {
            let number = self.cursor.physical() + 1;
            let raw = match self.parser.read_record(number) {
                Ok(Some(raw)) => {
                    self.cursor.next_physical();
                    raw
                }
                Ok(None) => {
                    self.cursor.finish();
                    return Ok(false);
                }
                Err(error) if error.is_syntax() => {
                    self.cursor.next_physical();
                    if !self.cursor.offer(number, &error) {
                        return Err(self.cursor.fail(error));
                    }
                    if let Err(error) = self.parser.skip_to_record_end() {
                        return Err(self.cursor.fail(error));
                    }
                    continue;
                }
                Err(error) => return Err(self.cursor.fail(error)),
            };

            match self.parse_record(raw, number) {
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
        if self.header_pending && self.cursor.ensure_readable()? {
            if let Err(error) = self.read_header() {
                return Err(self.cursor.fail(error));
            }
        }
        match &self.schema {
            ReadSchema::Untyped => Err(Error::SchemaNotDefined),
            ReadSchema::Fixed(schema) => Ok(schema),
            ReadSchema::Selected { selector, current } => current
                .and_then(|position| selector.get(position))
                .ok_or(Error::SchemaNotDefined),
        }
    }

    fn physical_record_number(&self) -> usize {
        self.cursor.physical()
    }

    fn logical_record_number(&self) -> usize {
        self.cursor.logical()
    }
}
