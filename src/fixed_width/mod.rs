//! Fixed-width files.
//!
//! Every column occupies a [`Window`](crate::Window) of known width. Values
//! shorter than their window are padded with a fill character; longer values
//! are truncated on write according to a
//! [`TruncationPolicy`](crate::TruncationPolicy). Records are either
//! separated by a record separator or follow each other directly, in which
//! case each record is exactly the sum of the window widths.

mod parser;
mod reader;
mod writer;

pub use reader::FixedWidthReader;
pub use writer::FixedWidthWriter;
