use std::io::Write;

use crate::events::{ColumnErrorEvent, ColumnErrorHandler};
use crate::options::{DelimitedOptions, QuoteBehavior};
use crate::{Error, RecordWriter, Result, Schema, SchemaSelector, Value};

enum WriteSchema {
    Untyped,
    Fixed(Schema),
    Selected(SchemaSelector<[Value], Schema>),
}

/// Writes records as delimited text.
///
/// # Examples
///
/// ```rust
/// use flatfile::{ColumnCodec, DelimitedOptions, DelimitedWriter, RecordWriter, Schema, Value};
///
/// let schema = Schema::new()
///     .with_column(ColumnCodec::int32("Id")).unwrap()
///     .with_column(ColumnCodec::string("Name")).unwrap();
/// let options = DelimitedOptions::new()
///     .with_record_separator("\n")
///     .with_first_record_schema(true);
///
/// let mut writer = DelimitedWriter::with_schema(Vec::new(), schema, options).unwrap();
/// writer.write(&[Value::Int(1), Value::from("Smith, Bob")]).unwrap();
/// let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(text, "Id,Name\n1,\"Smith, Bob\"\n");
/// ```
pub struct DelimitedWriter<W: Write> {
    writer: W,
    options: DelimitedOptions,
    schema: WriteSchema,
    header_written: bool,
    records_written: usize,
    on_column_error: Option<ColumnErrorHandler>,
}

impl<W: Write> DelimitedWriter<W> {
    /// Creates a writer without a schema; values are written with their
    /// display form and nulls as empty fields.
    pub fn new(writer: W, options: DelimitedOptions) -> Result<Self> {
        Self::build(writer, WriteSchema::Untyped, options)
    }

    pub fn with_schema(writer: W, schema: Schema, options: DelimitedOptions) -> Result<Self> {
        Self::build(writer, WriteSchema::Fixed(schema), options)
    }

    /// Creates a writer that picks a schema per record from its values.
    pub fn with_selector(
        writer: W,
        selector: SchemaSelector<[Value], Schema>,
        options: DelimitedOptions,
    ) -> Result<Self> {
        Self::build(writer, WriteSchema::Selected(selector), options)
    }

    fn build(writer: W, schema: WriteSchema, options: DelimitedOptions) -> Result<Self> {
        options.validate()?;
        Ok(DelimitedWriter {
            writer,
            options,
            schema,
            header_written: false,
            records_written: 0,
            on_column_error: None,
        })
    }

    /// Installs a handler for values that fail to format.
    pub fn on_column_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut ColumnErrorEvent<'_>) + 'static,
    {
        self.on_column_error = Some(Box::new(handler));
        self
    }

    /// Writes pre-formatted fields, bypassing the schema. Quoting still applies.
    pub fn write_raw(&mut self, fields: &[&str]) -> Result<()> {
        self.write_fields(fields.iter().copied())?;
        self.records_written += 1;
        Ok(())
    }

    /// Writes `text` followed by the record separator, unquoted and unchecked.
    pub fn write_comment(&mut self, text: &str) -> Result<()> {
        let mut line = String::with_capacity(text.len() + self.options.record_separator.len());
        line.push_str(text);
        line.push_str(&self.options.record_separator);
        self.write_text(&line)
    }

    /// Records written so far, header excluded.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_fields<'a, I>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut line = String::new();
        for (index, field) in fields.into_iter().enumerate() {
            if index > 0 {
                line.push_str(&self.options.separator);
            }
            self.push_field(&mut line, field)?;
        }
        line.push_str(&self.options.record_separator);
        self.write_text(&line)
    }

    fn push_field(&self, line: &mut String, field: &str) -> Result<()> {
        let structural = self.is_structural(field);
        let padded = !self.options.preserve_whitespace
            && (field.starts_with(char::is_whitespace) || field.ends_with(char::is_whitespace));

        let quote = match self.options.quote_behavior {
            QuoteBehavior::Default => structural || padded,
            QuoteBehavior::AlwaysQuote => true,
            QuoteBehavior::Never if structural => {
                return Err(Error::format(format!(
                    "field '{}' must be quoted, but quoting is disabled",
                    field
                )))
            }
            QuoteBehavior::Never => false,
        };
        if !quote {
            line.push_str(field);
            return Ok(());
        }

        let Some(mark) = self.options.quote else {
            return Err(Error::format(format!(
                "field '{}' must be quoted, but no quote character is configured",
                field
            )));
        };
        line.push(mark);
        for ch in field.chars() {
            if ch == mark {
                line.push(mark);
            }
            line.push(ch);
        }
        line.push(mark);
        Ok(())
    }

    // A separator may straddle the field boundary, so any character that
    // begins one forces quoting, not just a whole separator.
    fn is_structural(&self, field: &str) -> bool {
        let starts = |separator: &str, ch: char| separator.starts_with(ch);
        field.chars().any(|ch| {
            ch == '\r'
                || ch == '\n'
                || starts(&self.options.separator, ch)
                || starts(&self.options.record_separator, ch)
                || self.options.quote == Some(ch)
        })
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        let bytes = self.options.encoding.encode(text)?;
        self.writer.write_all(&bytes)?;
        Ok(())
    }

    fn format_record(&mut self, values: &[Value], number: usize) -> Result<Vec<String>> {
        let handler = self.on_column_error.as_mut();
        match &self.schema {
            WriteSchema::Untyped => Ok(values
                .iter()
                .map(|value| {
                    if value.is_null() {
                        String::new()
                    } else {
                        value.to_string()
                    }
                })
                .collect()),
            WriteSchema::Fixed(schema) => schema.format_values(values, number, handler),
            WriteSchema::Selected(selector) => selector
                .select(values)
                .ok_or(Error::NoMatchingSchema { record: number })?
                .format_values(values, number, handler),
        }
    }
}

impl<W: Write> RecordWriter for DelimitedWriter<W> {
    fn write(&mut self, values: &[Value]) -> Result<()> {
        if self.options.is_first_record_schema
            && !self.header_written
            && self.records_written == 0
            && matches!(self.schema, WriteSchema::Fixed(_))
        {
            self.write_schema()?;
        }
        let number = self.records_written + usize::from(self.header_written) + 1;
        let fields = self.format_record(values, number)?;
        self.write_fields(fields.iter().map(String::as_str))?;
        self.records_written += 1;
        Ok(())
    }

    fn write_schema(&mut self) -> Result<()> {
        if self.header_written {
            return Ok(());
        }
        if self.records_written > 0 {
            return Err(Error::invalid_state(
                "the header must be written before any data records",
            ));
        }
        let names: Vec<String> = self
            .schema()?
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.write_fields(names.iter().map(String::as_str))?;
        self.header_written = true;
        log::debug!("wrote header with {} columns", names.len());
        Ok(())
    }

    fn schema(&self) -> Result<&Schema> {
        match &self.schema {
            WriteSchema::Fixed(schema) => Ok(schema),
            WriteSchema::Untyped | WriteSchema::Selected(_) => Err(Error::SchemaNotDefined),
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
