//! Configuration options for delimited and fixed-width files.
//!
//! This module provides types to customize how records are split and joined:
//!
//! - [`DelimitedOptions`]: separators, quoting and header handling for delimited text
//! - [`FixedWidthOptions`]: fill character, alignment and truncation for fixed-width text
//! - [`Encoding`]: text encoding of the underlying byte stream
//!
//! Both option structs implement serde's `Serialize` and `Deserialize` with
//! `#[serde(default)]`, so partial configuration files are accepted.
//!
//! ## Examples
//!
//! ```rust
//! use flatfile::{Alignment, DelimitedOptions, FixedWidthOptions, TruncationPolicy};
//!
//! let options = DelimitedOptions::new()
//!     .with_separator("|")
//!     .with_quote('\'')
//!     .with_first_record_schema(true);
//! assert_eq!(options.separator, "|");
//!
//! let options = FixedWidthOptions::new()
//!     .with_fill_character('0')
//!     .with_alignment(Alignment::Right)
//!     .with_truncation_policy(TruncationPolicy::TruncateTrailing);
//! assert_eq!(options.fill_character, '0');
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The record separator used when none is configured.
#[cfg(windows)]
pub const DEFAULT_RECORD_SEPARATOR: &str = "\r\n";
/// The record separator used when none is configured.
#[cfg(not(windows))]
pub const DEFAULT_RECORD_SEPARATOR: &str = "\n";

/// Text encoding of the byte stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte is one character.
    Latin1,
}

impl Encoding {
    /// Returns the display name of this encoding.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Latin1 => "Latin-1",
        }
    }

    /// Encodes text for output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] for a character Latin-1 cannot represent.
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>> {
        match self {
            Encoding::Utf8 => Ok(Cow::Borrowed(text.as_bytes())),
            Encoding::Latin1 => text
                .chars()
                .map(|ch| {
                    u8::try_from(u32::from(ch)).map_err(|_| {
                        Error::format(format!("'{}' cannot be encoded as {}", ch, self.as_str()))
                    })
                })
                .collect::<Result<Vec<u8>>>()
                .map(Cow::Owned),
        }
    }
}

/// When writers wrap delimited fields in quotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuoteBehavior {
    /// Quote only fields that would otherwise not read back verbatim.
    #[default]
    Default,
    /// Quote every field.
    AlwaysQuote,
    /// Never quote; writing a field that needs quotes is an error.
    Never,
}

/// Which side of a fixed-width window a value hugs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    /// Value first, fill on the right.
    #[default]
    Left,
    /// Fill first, value on the right.
    Right,
}

/// How an over-long value is cut down to its fixed-width window.
///
/// # Examples
///
/// ```rust
/// use flatfile::TruncationPolicy;
///
/// assert_eq!(TruncationPolicy::TruncateLeading.truncate("Pineapple", 5), "apple");
/// assert_eq!(TruncationPolicy::TruncateTrailing.truncate("Pineapple", 5), "Pinea");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TruncationPolicy {
    /// Drop characters from the front, keeping the trailing `width` characters.
    #[default]
    TruncateLeading,
    /// Drop characters from the back, keeping the leading `width` characters.
    TruncateTrailing,
}

impl TruncationPolicy {
    /// Cuts `value` down to at most `width` characters.
    #[must_use]
    pub fn truncate(self, value: &str, width: usize) -> String {
        let length = value.chars().count();
        if length <= width {
            return value.to_string();
        }
        match self {
            TruncationPolicy::TruncateLeading => value.chars().skip(length - width).collect(),
            TruncationPolicy::TruncateTrailing => value.chars().take(width).collect(),
        }
    }
}

/// Configuration for delimited files.
///
/// # Examples
///
/// ```rust
/// use flatfile::{DelimitedOptions, QuoteBehavior};
///
/// let options = DelimitedOptions::new();
/// assert_eq!(options.separator, ",");
/// assert_eq!(options.quote, Some('"'));
/// assert_eq!(options.quote_behavior, QuoteBehavior::Default);
///
/// let tsv = DelimitedOptions::new().with_separator("\t").without_quote();
/// assert_eq!(tsv.quote, None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimitedOptions {
    pub separator: String,
    pub record_separator: String,
    pub quote: Option<char>,
    pub is_first_record_schema: bool,
    pub preserve_whitespace: bool,
    pub quote_behavior: QuoteBehavior,
    pub encoding: Encoding,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        DelimitedOptions {
            separator: ",".to_string(),
            record_separator: DEFAULT_RECORD_SEPARATOR.to_string(),
            quote: Some('"'),
            is_first_record_schema: false,
            preserve_whitespace: false,
            quote_behavior: QuoteBehavior::default(),
            encoding: Encoding::default(),
        }
    }
}

impl DelimitedOptions {
    /// Creates default options (comma separator, platform newline, double quotes).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field separator. Multi-character separators are allowed.
    #[must_use]
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Sets the record separator. Multi-character separators are allowed.
    #[must_use]
    pub fn with_record_separator(mut self, separator: &str) -> Self {
        self.record_separator = separator.to_string();
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = Some(quote);
        self
    }

    /// Disables quoting entirely; quote characters become ordinary content.
    #[must_use]
    pub fn without_quote(mut self) -> Self {
        self.quote = None;
        self
    }

    /// Treats the first record as the column names.
    #[must_use]
    pub fn with_first_record_schema(mut self, value: bool) -> Self {
        self.is_first_record_schema = value;
        self
    }

    /// Keeps whitespace around unquoted fields instead of trimming it.
    #[must_use]
    pub fn with_preserve_whitespace(mut self, value: bool) -> Self {
        self.preserve_whitespace = value;
        self
    }

    #[must_use]
    pub fn with_quote_behavior(mut self, behavior: QuoteBehavior) -> Self {
        self.quote_behavior = behavior;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Checks that the separators and quote can be told apart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for empty or identical separators, or a
    /// quote character that begins a separator.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(Error::configuration("the field separator cannot be empty"));
        }
        if self.record_separator.is_empty() {
            return Err(Error::configuration("the record separator cannot be empty"));
        }
        if self.separator == self.record_separator {
            return Err(Error::configuration(
                "the field and record separators must differ",
            ));
        }
        if let Some(quote) = self.quote {
            if self.separator.starts_with(quote) || self.record_separator.starts_with(quote) {
                return Err(Error::configuration(
                    "the quote character cannot begin a separator",
                ));
            }
        }
        Ok(())
    }
}

/// Configuration for fixed-width files.
///
/// # Examples
///
/// ```rust
/// use flatfile::{Alignment, FixedWidthOptions, TruncationPolicy};
///
/// let options = FixedWidthOptions::new();
/// assert_eq!(options.fill_character, ' ');
/// assert!(options.has_record_separator);
/// assert_eq!(options.alignment, Alignment::Left);
/// assert_eq!(options.truncation_policy, TruncationPolicy::TruncateLeading);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedWidthOptions {
    pub fill_character: char,
    pub has_record_separator: bool,
    pub record_separator: String,
    pub alignment: Alignment,
    pub truncation_policy: TruncationPolicy,
    pub is_first_record_header: bool,
    pub preserve_whitespace: bool,
    pub encoding: Encoding,
}

impl Default for FixedWidthOptions {
    fn default() -> Self {
        FixedWidthOptions {
            fill_character: ' ',
            has_record_separator: true,
            record_separator: DEFAULT_RECORD_SEPARATOR.to_string(),
            alignment: Alignment::default(),
            truncation_policy: TruncationPolicy::default(),
            is_first_record_header: false,
            preserve_whitespace: false,
            encoding: Encoding::default(),
        }
    }
}

impl FixedWidthOptions {
    /// Creates default options (space fill, newline-separated, left-aligned).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fill_character(mut self, fill: char) -> Self {
        self.fill_character = fill;
        self
    }

    /// Records follow each other directly when `false`; each is exactly the
    /// sum of the window widths long.
    #[must_use]
    pub fn with_record_separator_present(mut self, value: bool) -> Self {
        self.has_record_separator = value;
        self
    }

    #[must_use]
    pub fn with_record_separator(mut self, separator: &str) -> Self {
        self.record_separator = separator.to_string();
        self
    }

    /// Sets the alignment used when writing windows that do not declare one.
    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_truncation_policy(mut self, policy: TruncationPolicy) -> Self {
        self.truncation_policy = policy;
        self
    }

    #[must_use]
    pub fn with_first_record_header(mut self, value: bool) -> Self {
        self.is_first_record_header = value;
        self
    }

    /// Keeps fill characters around values instead of trimming them.
    #[must_use]
    pub fn with_preserve_whitespace(mut self, value: bool) -> Self {
        self.preserve_whitespace = value;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when a record separator is expected but empty.
    pub fn validate(&self) -> Result<()> {
        if self.has_record_separator && self.record_separator.is_empty() {
            return Err(Error::configuration("the record separator cannot be empty"));
        }
        Ok(())
    }
}
