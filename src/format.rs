//! File format reference
//!
//! This module documents the two flat-file layouts as read and written by
//! this library.
//!
//! # Delimited
//!
//! A delimited file is a sequence of records separated by the record
//! separator. Each record is a sequence of fields separated by the field
//! separator.
//!
//! ```text
//! Id,Name,Joined
//! 1,Ada,2024-01-15
//! 2,"Hopper, Grace",2024-02-01
//! ```
//!
//! | Option | Default | Notes |
//! |--------|---------|-------|
//! | `separator` | `,` | any non-empty string |
//! | `record_separator` | platform newline | any non-empty string, must differ from `separator` |
//! | `quote` | `"` | may be disabled; must not begin a separator |
//! | `is_first_record_schema` | `false` | first record holds column names |
//! | `preserve_whitespace` | `false` | keep spaces around unquoted fields |
//! | `quote_behavior` | `Default` | `Default`, `AlwaysQuote` or `Never` |
//! | `encoding` | UTF-8 | UTF-8 or Latin-1 |
//!
//! ## Separators
//!
//! At every position the reader tries all separators and takes the longest
//! one that fully matches. When none matches, one character is taken
//! literally, even if it begins a separator. With separator `xxa` and record
//! separator `xxb`, the input `axxcb` is a single field.
//!
//! A record separator of `\n` or `\r\n` accepts both line endings on read.
//!
//! ## Quoting
//!
//! A field that begins with the quote character ends at the next lone quote.
//! Inside, a doubled quote stands for one quote, and separators and line
//! breaks are literal:
//!
//! | Text | Field |
//! |------|-------|
//! | `"a,b"` | `a,b` |
//! | `"say ""hi"""` | `say "hi"` |
//! | `"line 1`⏎`line 2"` | two lines |
//!
//! After the closing quote only whitespace (when not preserved), a separator
//! or the end of input may follow. Anything else, or end of input before
//! the closing quote, is a syntax error for that record.
//!
//! Writers quote a field when it contains the quote character, a line break,
//! or any character that begins a separator, or, unless whitespace is
//! preserved, when it begins or ends with whitespace. Embedded quotes are
//! doubled. With separator `::`, the field `a:` is written quoted, since
//! `a:::` would read back as `a` followed by `:`.
//!
//! ## Empty records
//!
//! An empty line is a record of one empty field. Text after the last record
//! separator forms a final record; a trailing record separator does not
//! start an empty one.
//!
//! # Fixed-width
//!
//! Every column occupies a window of a fixed number of characters:
//!
//! ```text
//! 0001Ada       2024-01-15
//! 0002Grace     2024-02-01
//! ```
//!
//! | Option | Default | Notes |
//! |--------|---------|-------|
//! | `fill_character` | space | used when a window sets no fill |
//! | `has_record_separator` | `true` | otherwise records are back to back |
//! | `record_separator` | platform newline | |
//! | `alignment` | `Left` | used on write when a window sets none |
//! | `truncation_policy` | `TruncateLeading` | used when a window sets none |
//! | `is_first_record_header` | `false` | first record is skipped on read |
//! | `preserve_whitespace` | `false` | keep fill on read |
//!
//! ## Windows
//!
//! On write, text longer than its window is truncated: `TruncateLeading`
//! keeps the trailing characters (`Pineapple` in 5 columns is `apple`),
//! `TruncateTrailing` keeps the leading ones (`Pinea`). Shorter text is
//! padded with fill on the side opposite its alignment.
//!
//! On read, a left-aligned window loses trailing fill, a right-aligned
//! window loses leading fill, and a window without an alignment loses fill
//! on both sides. A record whose length differs from the sum of the window
//! widths is an error for that record.
//!
//! # Nulls
//!
//! A field is null when its column's null formatter says so. By default
//! that is any field that is empty or all whitespace; a constant such as
//! `NULL` can be configured instead. Nulls are written with the same
//! formatter.
//!
//! # Record numbering
//!
//! Physical record numbers count every record consumed from the input,
//! header and skipped records included, starting at 1. Logical record
//! numbers count only the records handed back by `read`.
