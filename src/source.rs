//! Character input for the tokenizers.
//!
//! [`CharReader`] decodes an `io::Read` incrementally into a
//! [`RingBuffer<char>`](crate::RingBuffer) and offers bounded lookahead, so a
//! tokenizer can test a multi-character separator against upcoming text
//! without consuming it. Only as much text as the longest lookahead needs is
//! ever buffered beyond one read chunk.
//!
//! [`TokenMatcher`] holds the separators of a format and reports the longest
//! one that fully matches at the current position.

use std::io::{ErrorKind, Read};

use crate::options::Encoding;
use crate::{Error, Result, RingBuffer};

const READ_CHUNK: usize = 8 * 1024;
const INITIAL_CHARS: usize = 4 * 1024;

/// Decoding, buffering character reader with lookahead.
pub(crate) struct CharReader<R> {
    source: R,
    encoding: Encoding,
    chars: RingBuffer<char>,
    scratch: Vec<u8>,
    // Bytes of an incomplete UTF-8 sequence at the end of the last chunk.
    pending: Vec<u8>,
    byte_offset: u64,
    eof: bool,
}

impl<R: Read> CharReader<R> {
    pub(crate) fn new(source: R, encoding: Encoding) -> Self {
        CharReader {
            source,
            encoding,
            chars: RingBuffer::with_capacity(INITIAL_CHARS),
            scratch: vec![0; READ_CHUNK],
            pending: Vec::new(),
            byte_offset: 0,
            eof: false,
        }
    }

    /// Returns the character `index` positions ahead without consuming it.
    pub(crate) fn peek(&mut self, index: usize) -> Result<Option<char>> {
        while self.chars.len() <= index && !self.eof {
            self.read_chunk()?;
        }
        Ok(self.chars.get(index))
    }

    /// Consumes and returns the next character.
    pub(crate) fn next(&mut self) -> Result<Option<char>> {
        let ch = self.peek(0)?;
        if ch.is_some() {
            self.chars.dequeue(1);
        }
        Ok(ch)
    }

    pub(crate) fn advance(&mut self, n: usize) {
        self.chars.dequeue(n);
    }

    pub(crate) fn at_end(&mut self) -> Result<bool> {
        Ok(self.peek(0)?.is_none())
    }

    /// Returns `true` when the upcoming characters spell `token`.
    pub(crate) fn starts_with(&mut self, token: &[char]) -> Result<bool> {
        for (index, expected) in token.iter().enumerate() {
            if self.peek(index)? != Some(*expected) {
                return Ok(false);
            }
        }
        Ok(!token.is_empty())
    }

    fn read_chunk(&mut self) -> Result<()> {
        let read = loop {
            match self.source.read(&mut self.scratch) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if read == 0 {
            self.eof = true;
            if !self.pending.is_empty() {
                return Err(Error::Encoding {
                    encoding: self.encoding.as_str(),
                    offset: self.byte_offset,
                });
            }
            return Ok(());
        }

        match self.encoding {
            Encoding::Latin1 => {
                let block = self.chars.prepare_block(read);
                for (slot, byte) in block.iter_mut().zip(&self.scratch[..read]) {
                    *slot = char::from(*byte);
                }
                self.chars.record_growth(read);
                self.byte_offset += read as u64;
            }
            Encoding::Utf8 => {
                self.pending.extend_from_slice(&self.scratch[..read]);
                let valid = match std::str::from_utf8(&self.pending) {
                    Ok(_) => self.pending.len(),
                    Err(e) if e.error_len().is_none() => e.valid_up_to(),
                    Err(e) => {
                        return Err(Error::Encoding {
                            encoding: self.encoding.as_str(),
                            offset: self.byte_offset + e.valid_up_to() as u64,
                        })
                    }
                };
                let text = std::str::from_utf8(&self.pending[..valid]).map_err(|e| Error::Encoding {
                    encoding: self.encoding.as_str(),
                    offset: self.byte_offset + e.valid_up_to() as u64,
                })?;
                let count = text.chars().count();
                let block = self.chars.prepare_block(count);
                for (slot, ch) in block.iter_mut().zip(text.chars()) {
                    *slot = ch;
                }
                self.chars.record_growth(count);
                self.byte_offset += valid as u64;
                self.pending.drain(..valid);
            }
        }
        Ok(())
    }
}

/// What a matched separator ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Terminator {
    Field,
    Record,
}

/// The separators of one format, longest first.
#[derive(Clone, Debug)]
pub(crate) struct TokenMatcher {
    tokens: Vec<(Vec<char>, Terminator)>,
}

impl TokenMatcher {
    /// Builds a matcher for an optional field separator and a record separator.
    ///
    /// A newline record separator also accepts the other common line ending.
    pub(crate) fn new(field: Option<&str>, record: Option<&str>) -> Self {
        let mut tokens = Vec::new();
        if let Some(field) = field {
            tokens.push((field.chars().collect(), Terminator::Field));
        }
        if let Some(record) = record {
            if record == "\n" || record == "\r\n" {
                tokens.push(("\r\n".chars().collect(), Terminator::Record));
                tokens.push((vec!['\n'], Terminator::Record));
            } else {
                tokens.push((record.chars().collect(), Terminator::Record));
            }
        }
        tokens.sort_by_key(|(token, _)| std::cmp::Reverse(token.len()));
        TokenMatcher { tokens }
    }

    /// Returns the longest separator that fully matches at the reader's
    /// position, with its length, without consuming anything.
    pub(crate) fn match_at<R: Read>(
        &self,
        reader: &mut CharReader<R>,
    ) -> Result<Option<(Terminator, usize)>> {
        for (token, terminator) in &self.tokens {
            if reader.starts_with(token)? {
                return Ok(Some((*terminator, token.len())));
            }
        }
        Ok(None)
    }

    /// Returns `true` if `ch` could start any separator.
    pub(crate) fn could_start(&self, ch: char) -> bool {
        self.tokens.iter().any(|(token, _)| token.first() == Some(&ch))
    }
}
