//! The record-level interfaces shared by the delimited and fixed-width engines.
//!
//! Code that only moves records around can be written once against
//! [`RecordReader`] and [`RecordWriter`] and handed either engine.
//!
//! ## Examples
//!
//! ```rust
//! use flatfile::{
//!     ColumnCodec, DelimitedOptions, DelimitedReader, FixedWidthOptions, FixedWidthSchema,
//!     FixedWidthWriter, RecordReader, RecordWriter, Schema, Window,
//! };
//!
//! fn copy<R: RecordReader, W: RecordWriter>(reader: &mut R, writer: &mut W) -> flatfile::Result<usize> {
//!     let mut count = 0;
//!     while reader.read()? {
//!         writer.write(reader.get_values()?)?;
//!         count += 1;
//!     }
//!     writer.flush()?;
//!     Ok(count)
//! }
//!
//! let schema = Schema::new().with_column(ColumnCodec::int32("Id")).unwrap();
//! let mut reader = DelimitedReader::with_schema("1\n22\n".as_bytes(), schema, DelimitedOptions::new()).unwrap();
//!
//! let layout = FixedWidthSchema::new().with_column(ColumnCodec::int32("Id"), Window::new(4)).unwrap();
//! let mut out = Vec::new();
//! let mut writer = FixedWidthWriter::new(&mut out, layout, FixedWidthOptions::new().with_record_separator("\n")).unwrap();
//!
//! assert_eq!(copy(&mut reader, &mut writer).unwrap(), 2);
//! drop(writer);
//! assert_eq!(String::from_utf8(out).unwrap(), "1   \n22  \n");
//! ```

use crate::{Result, Schema, Value};

/// Pull-based record input.
pub trait RecordReader {
    /// Advances to the next record.
    ///
    /// Returns `false` once the input is exhausted. After an error that no
    /// record handler accepted, every later call fails with
    /// [`Error::InvalidState`](crate::Error::InvalidState).
    fn read(&mut self) -> Result<bool>;

    /// The values of the current record.
    ///
    /// Calling this repeatedly without `read` returns the same values.
    fn get_values(&self) -> Result<&[Value]>;

    /// The schema in effect, reading a header record first when one is expected.
    fn schema(&mut self) -> Result<&Schema>;

    /// Records consumed from the input so far, including headers and skipped records.
    fn physical_record_number(&self) -> usize;

    /// Records returned by `read` so far.
    fn logical_record_number(&self) -> usize;

    /// Turns the reader into an iterator over owned records.
    fn records(self) -> Records<Self>
    where
        Self: Sized,
    {
        Records {
            reader: self,
            done: false,
        }
    }
}

/// Push-based record output.
pub trait RecordWriter {
    /// Writes one record of values.
    fn write(&mut self, values: &[Value]) -> Result<()>;

    /// Writes the column names as a header record.
    ///
    /// A no-op once the header is out; an error once data records are.
    fn write_schema(&mut self) -> Result<()>;

    fn schema(&self) -> Result<&Schema>;

    fn flush(&mut self) -> Result<()>;
}

/// Iterator returned by [`RecordReader::records`].
///
/// Stops after the first error.
#[derive(Debug)]
pub struct Records<R> {
    reader: R,
    done: bool,
}

impl<R> Records<R> {
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: RecordReader> Iterator for Records<R> {
    type Item = Result<Vec<Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read() {
            Ok(true) => Some(self.reader.get_values().map(<[Value]>::to_vec)),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}
