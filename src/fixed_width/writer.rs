use std::io::Write;

use crate::events::{ColumnErrorEvent, ColumnErrorHandler};
use crate::options::{Alignment, FixedWidthOptions};
use crate::{Error, FixedWidthSchema, RecordWriter, Result, Schema, SchemaSelector, Value, Window};

enum WriteSchema {
    Fixed(FixedWidthSchema),
    Selected(SchemaSelector<[Value], FixedWidthSchema>),
}

/// Writes records as fixed-width text.
///
/// Each field is cut to its window by the truncation policy, then padded
/// with fill on the side opposite its alignment.
///
/// # Examples
///
/// ```rust
/// use flatfile::{Alignment, ColumnCodec, FixedWidthOptions, FixedWidthSchema, FixedWidthWriter, RecordWriter, Value, Window};
///
/// let schema = FixedWidthSchema::new()
///     .with_column(ColumnCodec::int32("Id"), Window::new(4).with_alignment(Alignment::Right).with_fill('0')).unwrap()
///     .with_column(ColumnCodec::string("Fruit"), Window::new(5)).unwrap();
/// let options = FixedWidthOptions::new().with_record_separator("\n");
///
/// let mut writer = FixedWidthWriter::new(Vec::new(), schema, options).unwrap();
/// writer.write(&[Value::Int(7), Value::from("Pineapple")]).unwrap();
/// let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(text, "0007apple\n");
/// ```
pub struct FixedWidthWriter<W: Write> {
    writer: W,
    options: FixedWidthOptions,
    schema: WriteSchema,
    header_written: bool,
    records_written: usize,
    on_column_error: Option<ColumnErrorHandler>,
}

impl<W: Write> FixedWidthWriter<W> {
    pub fn new(writer: W, schema: FixedWidthSchema, options: FixedWidthOptions) -> Result<Self> {
        Self::build(writer, WriteSchema::Fixed(schema), options)
    }

    /// Creates a writer that picks a schema per record from its values.
    pub fn with_selector(
        writer: W,
        selector: SchemaSelector<[Value], FixedWidthSchema>,
        options: FixedWidthOptions,
    ) -> Result<Self> {
        Self::build(writer, WriteSchema::Selected(selector), options)
    }

    fn build(writer: W, schema: WriteSchema, options: FixedWidthOptions) -> Result<Self> {
        options.validate()?;
        Ok(FixedWidthWriter {
            writer,
            options,
            schema,
            header_written: false,
            records_written: 0,
            on_column_error: None,
        })
    }

    pub fn on_column_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut ColumnErrorEvent<'_>) + 'static,
    {
        self.on_column_error = Some(Box::new(handler));
        self
    }

    /// Writes pre-formatted fields into the windows of the fixed schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldCount`] when there is not one field per window,
    /// and [`Error::SchemaNotDefined`] for a selector-driven writer.
    pub fn write_raw(&mut self, fields: &[&str]) -> Result<()> {
        let number = self.next_record_number();
        let WriteSchema::Fixed(schema) = &self.schema else {
            return Err(Error::SchemaNotDefined);
        };
        let windows = schema.windows();
        if fields.len() != windows.len() {
            return Err(Error::FieldCount {
                record: number,
                expected: windows.len(),
                found: fields.len(),
            });
        }
        let line = self.layout(fields.iter().copied(), windows);
        self.write_line(line)?;
        self.records_written += 1;
        Ok(())
    }

    /// Writes `text` verbatim as its own record, ignoring the windows.
    pub fn write_comment(&mut self, text: &str) -> Result<()> {
        self.write_line(text.to_string())
    }

    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn next_record_number(&self) -> usize {
        self.records_written + usize::from(self.header_written) + 1
    }

    fn layout<'a, I>(&self, fields: I, windows: &[Window]) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut line = String::new();
        for (field, window) in fields.into_iter().zip(windows) {
            let truncation = window.truncation.unwrap_or(self.options.truncation_policy);
            let text = truncation.truncate(field, window.width);
            let padding = window.width - text.chars().count();
            let fill = window.fill.unwrap_or(self.options.fill_character);
            match window.alignment.unwrap_or(self.options.alignment) {
                Alignment::Left => {
                    line.push_str(&text);
                    line.extend(std::iter::repeat(fill).take(padding));
                }
                Alignment::Right => {
                    line.extend(std::iter::repeat(fill).take(padding));
                    line.push_str(&text);
                }
            }
        }
        line
    }

    fn write_line(&mut self, mut line: String) -> Result<()> {
        if self.options.has_record_separator {
            line.push_str(&self.options.record_separator);
        }
        let bytes = self.options.encoding.encode(&line)?;
        self.writer.write_all(&bytes)?;
        Ok(())
    }
}

impl<W: Write> RecordWriter for FixedWidthWriter<W> {
    fn write(&mut self, values: &[Value]) -> Result<()> {
        if self.options.is_first_record_header
            && !self.header_written
            && self.records_written == 0
            && matches!(self.schema, WriteSchema::Fixed(_))
        {
            self.write_schema()?;
        }
        let number = self.next_record_number();
        let handler = self.on_column_error.as_mut();
        let schema = match &self.schema {
            WriteSchema::Fixed(schema) => schema,
            WriteSchema::Selected(selector) => selector
                .select(values)
                .ok_or(Error::NoMatchingSchema { record: number })?,
        };
        let fields = schema.schema().format_values(values, number, handler)?;
        let line = self.layout(fields.iter().map(String::as_str), schema.windows());
        self.write_line(line)?;
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
        let WriteSchema::Fixed(schema) = &self.schema else {
            return Err(Error::SchemaNotDefined);
        };
        let line = self.layout(schema.schema().column_names(), schema.windows());
        self.write_line(line)?;
        self.header_written = true;
        log::debug!("wrote fixed-width header");
        Ok(())
    }

    fn schema(&self) -> Result<&Schema> {
        match &self.schema {
            WriteSchema::Fixed(schema) => Ok(schema.schema()),
            WriteSchema::Selected(_) => Err(Error::SchemaNotDefined),
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
