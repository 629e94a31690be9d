//! Tokenizer for delimited text.
//!
//! Splits a character stream into records of raw field strings. Separators
//! may be several characters long; at each position the longest separator
//! that fully matches wins, otherwise one literal character is consumed.

use std::io::Read;

use crate::options::DelimitedOptions;
use crate::source::{CharReader, Terminator, TokenMatcher};
use crate::{Error, Result};

/// How a field ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldEnd {
    Separator,
    Record,
    Eof,
}

impl From<Terminator> for FieldEnd {
    fn from(terminator: Terminator) -> Self {
        match terminator {
            Terminator::Field => FieldEnd::Separator,
            Terminator::Record => FieldEnd::Record,
        }
    }
}

pub(crate) struct DelimitedParser<R> {
    reader: CharReader<R>,
    matcher: TokenMatcher,
    quote: Option<char>,
    preserve_whitespace: bool,
}

impl<R: Read> DelimitedParser<R> {
    pub(crate) fn new(source: R, options: &DelimitedOptions) -> Self {
        DelimitedParser {
            reader: CharReader::new(source, options.encoding),
            matcher: TokenMatcher::new(Some(&options.separator), Some(&options.record_separator)),
            quote: options.quote,
            preserve_whitespace: options.preserve_whitespace,
        }
    }

    /// Reads the next record, or `None` at the end of the stream.
    ///
    /// `record_number` labels syntax errors.
    pub(crate) fn read_record(&mut self, record_number: usize) -> Result<Option<Vec<String>>> {
        if self.reader.at_end()? {
            return Ok(None);
        }
        let mut fields = Vec::new();
        loop {
            let (field, end) = self.read_field(record_number)?;
            fields.push(field);
            if end != FieldEnd::Separator {
                return Ok(Some(fields));
            }
        }
    }

    /// Discards input through the next record separator.
    ///
    /// Used to resynchronize after a syntax error the caller chose to skip.
    pub(crate) fn skip_to_record_end(&mut self) -> Result<()> {
        loop {
            if let Some((terminator, len)) = self.matcher.match_at(&mut self.reader)? {
                self.reader.advance(len);
                if terminator == Terminator::Record {
                    return Ok(());
                }
                continue;
            }
            if self.reader.next()?.is_none() {
                return Ok(());
            }
        }
    }

    fn read_field(&mut self, record_number: usize) -> Result<(String, FieldEnd)> {
        if !self.preserve_whitespace {
            self.skip_whitespace()?;
        }
        if let Some(quote) = self.quote {
            if self.reader.peek(0)? == Some(quote) {
                self.reader.advance(1);
                return self.read_quoted(quote, record_number);
            }
        }

        let mut token = String::new();
        let end = loop {
            match self.reader.peek(0)? {
                None => break FieldEnd::Eof,
                Some(ch) if !self.matcher.could_start(ch) => {
                    token.push(ch);
                    self.reader.advance(1);
                }
                Some(ch) => match self.matcher.match_at(&mut self.reader)? {
                    Some((terminator, len)) => {
                        self.reader.advance(len);
                        break terminator.into();
                    }
                    None => {
                        token.push(ch);
                        self.reader.advance(1);
                    }
                },
            }
        };
        if !self.preserve_whitespace {
            token.truncate(token.trim_end().len());
        }
        Ok((token, end))
    }

    fn read_quoted(&mut self, quote: char, record_number: usize) -> Result<(String, FieldEnd)> {
        let mut token = String::new();
        loop {
            match self.reader.next()? {
                None => return Err(Error::syntax(record_number, "unterminated quoted field")),
                Some(ch) if ch == quote => {
                    if self.reader.peek(0)? == Some(quote) {
                        self.reader.advance(1);
                        token.push(quote);
                    } else {
                        break;
                    }
                }
                Some(ch) => token.push(ch),
            }
        }

        if !self.preserve_whitespace {
            self.skip_whitespace()?;
        }
        match self.matcher.match_at(&mut self.reader)? {
            Some((terminator, len)) => {
                self.reader.advance(len);
                Ok((token, terminator.into()))
            }
            None if self.reader.at_end()? => Ok((token, FieldEnd::Eof)),
            None => Err(Error::syntax(
                record_number,
                "unexpected character after a closing quote",
            )),
        }
    }

    // Whitespace that begins a separator is left in place.
    fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(ch) = self.reader.peek(0)? {
            if !ch.is_whitespace() || self.matcher.match_at(&mut self.reader)?.is_some() {
                break;
            }
            self.reader.advance(1);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(text: &str, options: &DelimitedOptions) -> Result<Vec<Vec<String>>> {
        let mut parser = DelimitedParser::new(text.as_bytes(), options);
        let mut records = Vec::new();
        while let Some(record) = parser.read_record(records.len() + 1)? {
            records.push(record);
        }
        Ok(records)
    }

    #[test]
    fn test_simple_records() {
        let records = parse_all("a,b\nc,d\n", &DelimitedOptions::new()).unwrap();
        assert_eq!(records, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_crlf_and_lf_both_end_records() {
        let records = parse_all("a\r\nb\nc", &DelimitedOptions::new()).unwrap();
        assert_eq!(records, vec![vec!["a"], vec!["b"], vec!["c"]]);
    }

    #[test]
    fn test_trailing_separator_adds_empty_field() {
        let records = parse_all("a,b,\n", &DelimitedOptions::new()).unwrap();
        assert_eq!(records, vec![vec!["a", "b", ""]]);
    }

    #[test]
    fn test_empty_line_is_one_empty_field() {
        let records = parse_all("a\n\nb", &DelimitedOptions::new()).unwrap();
        assert_eq!(records, vec![vec!["a"], vec![""], vec!["b"]]);
    }

    #[test]
    fn test_whitespace_trimmed_unless_preserved() {
        let records = parse_all("  a  ,\" b \"  ,c", &DelimitedOptions::new()).unwrap();
        assert_eq!(records, vec![vec!["a", " b ", "c"]]);

        let options = DelimitedOptions::new().with_preserve_whitespace(true);
        let records = parse_all(" a , b", &options).unwrap();
        assert_eq!(records, vec![vec![" a ", " b"]]);
    }

    #[test]
    fn test_quoted_field_keeps_separators_and_newlines() {
        let records = parse_all("\"a,b\nc\",d", &DelimitedOptions::new()).unwrap();
        assert_eq!(records, vec![vec!["a,b\nc", "d"]]);
    }

    #[test]
    fn test_multi_char_separators() {
        let options = DelimitedOptions::new()
            .with_separator("||")
            .with_record_separator("<EOR>");
        let records = parse_all("a||b<EOR>c|d||e<EOR>", &options).unwrap();
        assert_eq!(records, vec![vec!["a", "b"], vec!["c|d", "e"]]);
    }

    #[test]
    fn test_stray_character_after_quote_is_syntax_error() {
        let err = parse_all("\"a\"b,c", &DelimitedOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Syntax { record: 1, .. }));
    }

    #[test]
    fn test_resync_after_syntax_error() {
        let options = DelimitedOptions::new();
        let mut parser = DelimitedParser::new("\"a\"b,c\nd,e\n".as_bytes(), &options);
        assert!(parser.read_record(1).is_err());
        parser.skip_to_record_end().unwrap();
        assert_eq!(parser.read_record(2).unwrap(), Some(vec!["d".to_string(), "e".to_string()]));
        assert_eq!(parser.read_record(3).unwrap(), None);
    }
}
