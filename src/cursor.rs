//! Record bookkeeping shared by the delimited and fixed-width readers.

use crate::events::{offer_record_error, ColumnErrorHandler, RecordErrorHandler};
use crate::{Error, Result, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Initial,
    Record,
    EndOfStream,
    Failed,
}

/// Position, current values and error handlers of a reader.
pub(crate) struct RecordCursor {
    phase: Phase,
    values: Vec<Value>,
    physical: usize,
    logical: usize,
    pub(crate) on_record_error: Option<RecordErrorHandler>,
    pub(crate) on_column_error: Option<ColumnErrorHandler>,
}

impl RecordCursor {
    pub(crate) fn new() -> Self {
        RecordCursor {
            phase: Phase::Initial,
            values: Vec::new(),
            physical: 0,
            logical: 0,
            on_record_error: None,
            on_column_error: None,
        }
    }

    /// Fails fast after an unhandled error; returns `false` once the stream has ended.
    pub(crate) fn ensure_readable(&self) -> Result<bool> {
        match self.phase {
            Phase::Failed => Err(Error::invalid_state(
                "the reader failed on an earlier record and cannot continue",
            )),
            Phase::EndOfStream => Ok(false),
            Phase::Initial | Phase::Record => Ok(true),
        }
    }

    /// Counts a physical record and returns its number.
    pub(crate) fn next_physical(&mut self) -> usize {
        self.physical += 1;
        self.physical
    }

    #[inline]
    pub(crate) fn physical(&self) -> usize {
        self.physical
    }

    #[inline]
    pub(crate) fn logical(&self) -> usize {
        self.logical
    }

    pub(crate) fn accept(&mut self, values: Vec<Value>) {
        self.values = values;
        self.logical += 1;
        self.phase = Phase::Record;
    }

    pub(crate) fn finish(&mut self) {
        self.values.clear();
        self.phase = Phase::EndOfStream;
    }

    /// Marks the reader failed and hands the error back.
    pub(crate) fn fail(&mut self, error: Error) -> Error {
        log::debug!("reader failed: {}", error);
        self.values.clear();
        self.phase = Phase::Failed;
        error
    }

    /// Offers a record-level error to the handler; `true` means skip the record.
    pub(crate) fn offer(&mut self, record_number: usize, error: &Error) -> bool {
        offer_record_error(self.on_record_error.as_mut(), record_number, error)
    }

    pub(crate) fn values(&self) -> Result<&[Value]> {
        match self.phase {
            Phase::Record => Ok(&self.values),
            Phase::Initial => Err(Error::invalid_state("read() has not been called")),
            Phase::EndOfStream => Err(Error::invalid_state("the end of the stream was reached")),
            Phase::Failed => Err(Error::invalid_state(
                "the reader failed on an earlier record and cannot continue",
            )),
        }
    }
}
