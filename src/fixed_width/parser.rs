//! Tokenizer for fixed-width text.
//!
//! Reads one record of characters at a time, either up to the record
//! separator or, when records are not separated, exactly the total window
//! width. [`split_record`] then cuts the record into windows and strips fill.

use std::io::Read;

use crate::options::{Alignment, FixedWidthOptions};
use crate::source::{CharReader, TokenMatcher};
use crate::{Error, Result, Window};

pub(crate) struct FixedWidthParser<R> {
    reader: CharReader<R>,
    // `None` when records are not separated.
    matcher: Option<TokenMatcher>,
}

impl<R: Read> FixedWidthParser<R> {
    pub(crate) fn new(source: R, options: &FixedWidthOptions) -> Self {
        let matcher = options
            .has_record_separator
            .then(|| TokenMatcher::new(None, Some(&options.record_separator)));
        FixedWidthParser {
            reader: CharReader::new(source, options.encoding),
            matcher,
        }
    }

    /// Reads the next record, or `None` at the end of the stream.
    ///
    /// Without record separators, `width` characters are taken; the last
    /// record may come back short.
    pub(crate) fn read_record(&mut self, width: usize) -> Result<Option<String>> {
        if self.reader.at_end()? {
            return Ok(None);
        }
        let mut line = String::with_capacity(width);
        match &self.matcher {
            Some(matcher) => loop {
                if let Some((_, len)) = matcher.match_at(&mut self.reader)? {
                    self.reader.advance(len);
                    break;
                }
                match self.reader.next()? {
                    Some(ch) => line.push(ch),
                    None => break,
                }
            },
            None => {
                for _ in 0..width {
                    match self.reader.next()? {
                        Some(ch) => line.push(ch),
                        None => break,
                    }
                }
            }
        }
        Ok(Some(line))
    }
}

/// Cuts `line` into one field per window.
///
/// Fill is stripped on the side opposite the window's alignment, or on both
/// sides for windows without an alignment, unless whitespace is preserved.
pub(crate) fn split_record(
    line: &str,
    windows: &[Window],
    options: &FixedWidthOptions,
    record_number: usize,
) -> Result<Vec<String>> {
    let chars: Vec<char> = line.chars().collect();
    let expected: usize = windows.iter().map(|w| w.width).sum();
    if chars.len() != expected {
        return Err(Error::RecordWidth {
            record: record_number,
            expected,
            found: chars.len(),
        });
    }

    let mut fields = Vec::with_capacity(windows.len());
    let mut offset = 0;
    for window in windows {
        let raw: String = chars[offset..offset + window.width].iter().collect();
        offset += window.width;
        if options.preserve_whitespace {
            fields.push(raw);
            continue;
        }
        let fill = window.fill.unwrap_or(options.fill_character);
        let trimmed = match window.alignment {
            Some(Alignment::Left) => raw.trim_end_matches(fill),
            Some(Alignment::Right) => raw.trim_start_matches(fill),
            None => raw.trim_matches(fill),
        };
        fields.push(trimmed.to_string());
    }
    Ok(fields)
}
