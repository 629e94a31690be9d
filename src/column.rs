//! Column codecs: conversion between raw field text and typed [`Value`]s.
//!
//! A [`ColumnCodec`] is declared once per column of a [`Schema`](crate::Schema).
//! It owns the column's name, its [`ColumnType`], how a null is spelled in the
//! file ([`NullFormatter`]), whether nulls are allowed, and four optional hooks:
//!
//! | Hook | Runs | Signature |
//! |------|------|-----------|
//! | preprocessor | before parsing | `&str -> String` |
//! | on_parsed | after parsing | `Value -> Value` |
//! | on_formatting | before formatting | `Value -> Value` |
//! | on_formatted | after formatting | `String -> String` |
//!
//! ## Examples
//!
//! ```rust
//! use flatfile::{ColumnCodec, Value};
//!
//! let price = ColumnCodec::decimal("Price")
//!     .with_preprocessor(|raw| raw.trim_start_matches('$').to_string());
//! assert_eq!(price.parse("$12.50").unwrap().to_string(), "12.50");
//!
//! let id = ColumnCodec::int32("Id");
//! assert_eq!(id.parse("42").unwrap(), Value::Int(42));
//! assert_eq!(id.parse("  ").unwrap(), Value::Null);
//! assert_eq!(id.format(&Value::Null).unwrap(), "");
//! ```

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::{Decimal, Error, Result, Value};

pub type Preprocessor = Arc<dyn Fn(&str) -> String + Send + Sync>;
pub type ValueHook = Arc<dyn Fn(Value) -> Value + Send + Sync>;
pub type TextHook = Arc<dyn Fn(String) -> String + Send + Sync>;

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATETIME_FALLBACK_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.fZ"];

/// User-supplied conversion for [`ColumnType::Custom`].
pub trait CustomConverter: Send + Sync {
    /// Name used in conversion errors.
    fn type_name(&self) -> &'static str;

    /// Converts non-null raw text to a value.
    fn parse(&self, text: &str) -> Result<Value>;

    /// Converts a non-null value to raw text.
    fn format(&self, value: &Value) -> Result<String>;
}

/// How a logical null is written, and recognized on input.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum NullFormatter {
    /// Empty or whitespace-only text is null; null is written as nothing.
    #[default]
    Blank,
    /// The given text (trimmed, case-insensitive) is null and is written for null.
    Constant(String),
}

impl NullFormatter {
    #[must_use]
    pub fn is_null(&self, text: &str) -> bool {
        match self {
            NullFormatter::Blank => text.trim().is_empty(),
            NullFormatter::Constant(token) => text.trim().eq_ignore_ascii_case(token),
        }
    }

    #[must_use]
    pub fn format_null(&self) -> String {
        match self {
            NullFormatter::Blank => String::new(),
            NullFormatter::Constant(token) => token.clone(),
        }
    }
}

/// Culture-like number conventions applied around numeric conversions.
///
/// # Examples
///
/// ```rust
/// use flatfile::{ColumnCodec, NumberFormat, Value};
///
/// let european = NumberFormat::new()
///     .with_decimal_separator(',')
///     .with_group_separator('.')
///     .with_thousands(true);
/// let amount = ColumnCodec::float64("Amount").with_number_format(european);
/// assert_eq!(amount.parse("1.234,5").unwrap(), Value::Float(1234.5));
/// assert_eq!(amount.format(&Value::Float(0.25)).unwrap(), "0,25");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal_separator: char,
    pub group_separator: char,
    pub allow_thousands: bool,
    pub currency_symbol: Option<String>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            decimal_separator: '.',
            group_separator: ',',
            allow_thousands: false,
            currency_symbol: None,
        }
    }
}

impl NumberFormat {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    #[must_use]
    pub fn with_group_separator(mut self, separator: char) -> Self {
        self.group_separator = separator;
        self
    }

    /// Accepts group separators in parsed numbers.
    #[must_use]
    pub fn with_thousands(mut self, allow: bool) -> Self {
        self.allow_thousands = allow;
        self
    }

    /// Accepts (and strips) a currency symbol before or after parsed numbers.
    #[must_use]
    pub fn with_currency_symbol(mut self, symbol: &str) -> Self {
        self.currency_symbol = Some(symbol.to_string());
        self
    }

    /// Reduces `text` to the plain `-123.45` form Rust's parsers accept.
    fn normalize(&self, text: &str) -> String {
        let mut text = text.trim();
        if let Some(symbol) = self.currency_symbol.as_deref().filter(|s| !s.is_empty()) {
            text = text.strip_prefix(symbol).unwrap_or(text);
            text = text.strip_suffix(symbol).unwrap_or(text).trim();
        }
        text.chars()
            .filter(|c| !(self.allow_thousands && *c == self.group_separator))
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect()
    }

    fn localize(&self, text: String) -> String {
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegerKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntegerKind {
    const fn name(self) -> &'static str {
        match self {
            IntegerKind::I8 => "i8",
            IntegerKind::I16 => "i16",
            IntegerKind::I32 => "i32",
            IntegerKind::I64 => "i64",
            IntegerKind::U8 => "u8",
            IntegerKind::U16 => "u16",
            IntegerKind::U32 => "u32",
            IntegerKind::U64 => "u64",
        }
    }

    const fn is_signed(self) -> bool {
        matches!(
            self,
            IntegerKind::I8 | IntegerKind::I16 | IntegerKind::I32 | IntegerKind::I64
        )
    }

    fn fits_signed(self, v: i64) -> bool {
        match self {
            IntegerKind::I8 => i8::try_from(v).is_ok(),
            IntegerKind::I16 => i16::try_from(v).is_ok(),
            IntegerKind::I32 => i32::try_from(v).is_ok(),
            IntegerKind::I64 => true,
            _ => u64::try_from(v).map_or(false, |u| self.fits_unsigned(u)),
        }
    }

    fn fits_unsigned(self, v: u64) -> bool {
        match self {
            IntegerKind::U8 => u8::try_from(v).is_ok(),
            IntegerKind::U16 => u16::try_from(v).is_ok(),
            IntegerKind::U32 => u32::try_from(v).is_ok(),
            IntegerKind::U64 => true,
            _ => i64::try_from(v).map_or(false, |i| self.fits_signed(i)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatKind {
    F32,
    F64,
}

/// Exact textual layout of a GUID column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GuidFormat {
    /// `67e55044-10b1-426f-9247-bb680e5fe0c8`
    #[default]
    Hyphenated,
    /// `67e5504410b1426f9247bb680e5fe0c8`
    Simple,
    /// `{67e55044-10b1-426f-9247-bb680e5fe0c8}`
    Braced,
    /// `urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8`
    Urn,
}

impl GuidFormat {
    fn render(self, guid: Uuid) -> String {
        match self {
            GuidFormat::Hyphenated => guid.hyphenated().to_string(),
            GuidFormat::Simple => guid.simple().to_string(),
            GuidFormat::Braced => guid.braced().to_string(),
            GuidFormat::Urn => guid.urn().to_string(),
        }
    }
}

/// How enumeration members are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EnumFormat {
    #[default]
    Name,
    Number,
}

/// How byte-array columns are spelled in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ByteEncoding {
    /// The field text itself, as UTF-8 bytes.
    #[default]
    Utf8,
    /// Two hexadecimal digits per byte.
    Hex,
}

/// The semantic type of a column and its type-specific settings.
#[derive(Clone)]
pub enum ColumnType {
    String { trim: bool },
    Char,
    Integer(IntegerKind),
    Float { kind: FloatKind, precision: Option<usize> },
    Decimal { scale: Option<u32> },
    Boolean { true_text: String, false_text: String },
    Date { format: Option<String> },
    DateTime { format: Option<String> },
    Guid(GuidFormat),
    Enum { members: Vec<(String, i64)>, format: EnumFormat },
    Bytes(ByteEncoding),
    /// Occupies a field or window in the file but produces no value.
    Ignored,
    Custom(Arc<dyn CustomConverter>),
}

impl ColumnType {
    /// Name used in conversion errors.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::String { .. } => "string",
            ColumnType::Char => "char",
            ColumnType::Integer(kind) => kind.name(),
            ColumnType::Float { kind: FloatKind::F32, .. } => "f32",
            ColumnType::Float { kind: FloatKind::F64, .. } => "f64",
            ColumnType::Decimal { .. } => "decimal",
            ColumnType::Boolean { .. } => "boolean",
            ColumnType::Date { .. } => "date",
            ColumnType::DateTime { .. } => "date-time",
            ColumnType::Guid(_) => "guid",
            ColumnType::Enum { .. } => "enum",
            ColumnType::Bytes(_) => "bytes",
            ColumnType::Ignored => "ignored",
            ColumnType::Custom(converter) => converter.type_name(),
        }
    }

    fn parse(&self, text: &str, numbers: &NumberFormat) -> Result<Value> {
        let target = self.type_name();
        match self {
            ColumnType::String { trim: true } => Ok(Value::String(text.trim().to_string())),
            ColumnType::String { trim: false } => Ok(Value::String(text.to_string())),
            ColumnType::Char => {
                let trimmed = if text.chars().count() == 1 { text } else { text.trim() };
                let mut chars = trimmed.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(Error::conversion(text, target, "expected exactly one character")),
                }
            }
            ColumnType::Integer(kind) => {
                let normalized = numbers.normalize(text);
                if kind.is_signed() {
                    let v: i64 = normalized
                        .parse()
                        .map_err(|e| Error::conversion(text, target, e))?;
                    if !kind.fits_signed(v) {
                        return Err(Error::conversion(text, target, "out of range"));
                    }
                    Ok(Value::Int(v))
                } else {
                    let v: u64 = normalized
                        .parse()
                        .map_err(|e| Error::conversion(text, target, e))?;
                    if !kind.fits_unsigned(v) {
                        return Err(Error::conversion(text, target, "out of range"));
                    }
                    Ok(Value::UInt(v))
                }
            }
            ColumnType::Float { kind, .. } => {
                let normalized = numbers.normalize(text);
                match kind {
                    FloatKind::F32 => normalized
                        .parse::<f32>()
                        .map(|v| Value::Float(f64::from(v)))
                        .map_err(|e| Error::conversion(text, target, e)),
                    FloatKind::F64 => normalized
                        .parse::<f64>()
                        .map(Value::Float)
                        .map_err(|e| Error::conversion(text, target, e)),
                }
            }
            ColumnType::Decimal { .. } => numbers
                .normalize(text)
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|_| Error::conversion(text, target, "invalid decimal")),
            ColumnType::Boolean {
                true_text,
                false_text,
            } => {
                let trimmed = text.trim();
                if trimmed.eq_ignore_ascii_case(true_text) {
                    Ok(Value::Bool(true))
                } else if trimmed.eq_ignore_ascii_case(false_text) {
                    Ok(Value::Bool(false))
                } else {
                    Err(Error::conversion(
                        text,
                        target,
                        format!("expected '{}' or '{}'", true_text, false_text),
                    ))
                }
            }
            ColumnType::Date { format } => {
                let format = format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
                NaiveDate::parse_from_str(text.trim(), format)
                    .map(Value::Date)
                    .map_err(|e| Error::conversion(text, target, e))
            }
            ColumnType::DateTime { format: Some(format) } => {
                NaiveDateTime::parse_from_str(text.trim(), format)
                    .map(Value::DateTime)
                    .map_err(|e| Error::conversion(text, target, e))
            }
            ColumnType::DateTime { format: None } => parse_datetime_any(text.trim())
                .map(Value::DateTime)
                .ok_or_else(|| Error::conversion(text, target, "unrecognized date-time layout")),
            ColumnType::Guid(format) => {
                let trimmed = text.trim();
                let guid =
                    Uuid::parse_str(trimmed).map_err(|e| Error::conversion(text, target, e))?;
                if !format.render(guid).eq_ignore_ascii_case(trimmed) {
                    return Err(Error::conversion(
                        text,
                        target,
                        format!("expected the {:?} layout", format),
                    ));
                }
                Ok(Value::Guid(guid))
            }
            ColumnType::Enum { members, .. } => {
                let trimmed = text.trim();
                let member = match trimmed.parse::<i64>() {
                    Ok(number) => members.iter().find(|(_, n)| *n == number),
                    Err(_) => members
                        .iter()
                        .find(|(name, _)| name.eq_ignore_ascii_case(trimmed)),
                };
                member
                    .map(|(name, _)| Value::Enum(name.clone()))
                    .ok_or_else(|| Error::conversion(text, target, "not a member"))
            }
            ColumnType::Bytes(ByteEncoding::Utf8) => Ok(Value::Bytes(text.as_bytes().to_vec())),
            ColumnType::Bytes(ByteEncoding::Hex) => decode_hex(text.trim())
                .map(Value::Bytes)
                .ok_or_else(|| Error::conversion(text, target, "invalid hexadecimal")),
            ColumnType::Ignored => Ok(Value::Null),
            ColumnType::Custom(converter) => converter.parse(text),
        }
    }

    fn format(&self, value: &Value, numbers: &NumberFormat) -> Result<String> {
        let mismatch = || {
            Error::format(format!(
                "cannot write a {} value to a {} column",
                value.type_name(),
                self.type_name()
            ))
        };
        match self {
            ColumnType::String { .. } => match value {
                Value::String(s) | Value::Enum(s) => Ok(s.clone()),
                Value::Char(c) => Ok(c.to_string()),
                _ => Err(mismatch()),
            },
            ColumnType::Char => match value {
                Value::Char(c) => Ok(c.to_string()),
                Value::String(s) if s.chars().count() == 1 => Ok(s.clone()),
                _ => Err(mismatch()),
            },
            ColumnType::Integer(kind) => {
                let fits = match value {
                    Value::Int(i) => kind.fits_signed(*i),
                    Value::UInt(u) => kind.fits_unsigned(*u),
                    _ => return Err(mismatch()),
                };
                if !fits {
                    return Err(Error::format(format!("{} is out of range for {}", value, kind.name())));
                }
                Ok(value.to_string())
            }
            ColumnType::Float { kind, precision } => {
                let v = match value {
                    Value::Float(_) | Value::Int(_) | Value::UInt(_) | Value::Decimal(_) => {
                        value.as_f64().ok_or_else(mismatch)?
                    }
                    _ => return Err(mismatch()),
                };
                let text = match (precision, kind) {
                    (Some(p), _) => format!("{:.*}", p, v),
                    (None, FloatKind::F32) => (v as f32).to_string(),
                    (None, FloatKind::F64) => v.to_string(),
                };
                Ok(numbers.localize(text))
            }
            ColumnType::Decimal { scale } => {
                let decimal = match value {
                    Value::Decimal(d) => d.clone(),
                    Value::Int(i) => Decimal::from(*i),
                    _ => return Err(mismatch()),
                };
                let decimal = match scale {
                    Some(scale) => decimal.rescale(*scale),
                    None => decimal,
                };
                Ok(numbers.localize(decimal.to_string()))
            }
            ColumnType::Boolean {
                true_text,
                false_text,
            } => match value {
                Value::Bool(true) => Ok(true_text.clone()),
                Value::Bool(false) => Ok(false_text.clone()),
                _ => Err(mismatch()),
            },
            ColumnType::Date { format } => {
                let date = match value {
                    Value::Date(_) | Value::DateTime(_) => value.as_date().ok_or_else(mismatch)?,
                    _ => return Err(mismatch()),
                };
                render_date(date.format(format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)), value)
            }
            ColumnType::DateTime { format } => {
                let datetime = match value {
                    Value::Date(_) | Value::DateTime(_) => {
                        value.as_datetime().ok_or_else(mismatch)?
                    }
                    _ => return Err(mismatch()),
                };
                render_date(
                    datetime.format(format.as_deref().unwrap_or(DEFAULT_DATETIME_FORMAT)),
                    value,
                )
            }
            ColumnType::Guid(format) => value
                .as_guid()
                .map(|guid| format.render(guid))
                .ok_or_else(mismatch),
            ColumnType::Enum { members, format } => {
                let member = match value {
                    Value::Enum(name) | Value::String(name) => members
                        .iter()
                        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name)),
                    Value::Int(_) | Value::UInt(_) => {
                        let number = value.as_i64();
                        members.iter().find(|(_, n)| Some(*n) == number)
                    }
                    _ => return Err(mismatch()),
                };
                let (name, number) = member
                    .ok_or_else(|| Error::format(format!("'{}' is not an enum member", value)))?;
                Ok(match format {
                    EnumFormat::Name => name.clone(),
                    EnumFormat::Number => number.to_string(),
                })
            }
            ColumnType::Bytes(encoding) => {
                let bytes = match value {
                    Value::Bytes(b) => b.as_slice(),
                    Value::String(s) => s.as_bytes(),
                    _ => return Err(mismatch()),
                };
                match encoding {
                    ByteEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                        .map_err(Error::format),
                    ByteEncoding::Hex => Ok(Value::Bytes(bytes.to_vec()).to_string()),
                }
            }
            ColumnType::Ignored => Ok(String::new()),
            ColumnType::Custom(converter) => converter.format(value),
        }
    }
}

impl fmt::Debug for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

// chrono reports a bad specifier as `fmt::Error`, which `to_string` would turn
// into a panic.
fn render_date(formatted: impl fmt::Display, value: &Value) -> Result<String> {
    let mut text = String::new();
    write!(text, "{}", formatted)
        .map_err(|_| Error::format(format!("invalid date format for {}", value)))?;
    Ok(text)
}

fn parse_count<T: FromStr>(text: &str, what: &str) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| Error::configuration(&format!("'{}' is not a valid {}", text, what)))
}

fn parse_datetime_any(text: &str) -> Option<NaiveDateTime> {
    std::iter::once(DEFAULT_DATETIME_FORMAT)
        .chain(DATETIME_FALLBACK_FORMATS)
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DEFAULT_DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn decode_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 || !text.is_ascii() {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
        .collect()
}

/// One declared column: its name, type, null handling and hooks.
#[derive(Clone)]
pub struct ColumnCodec {
    name: String,
    column_type: ColumnType,
    nullable: bool,
    default_value: Option<Value>,
    null_formatter: NullFormatter,
    number_format: NumberFormat,
    preprocessor: Option<Preprocessor>,
    on_parsed: Option<ValueHook>,
    on_formatting: Option<ValueHook>,
    on_formatted: Option<TextHook>,
}

impl ColumnCodec {
    /// Creates a nullable column with the blank null formatter and no hooks.
    #[must_use]
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        ColumnCodec {
            name: name.trim().to_string(),
            column_type,
            nullable: true,
            default_value: None,
            null_formatter: NullFormatter::default(),
            number_format: NumberFormat::default(),
            preprocessor: None,
            on_parsed: None,
            on_formatting: None,
            on_formatted: None,
        }
    }

    /// A string column that trims surrounding whitespace.
    #[must_use]
    pub fn string(name: &str) -> Self {
        Self::new(name, ColumnType::String { trim: true })
    }

    #[must_use]
    pub fn char(name: &str) -> Self {
        Self::new(name, ColumnType::Char)
    }

    #[must_use]
    pub fn integer(name: &str, kind: IntegerKind) -> Self {
        Self::new(name, ColumnType::Integer(kind))
    }

    #[must_use]
    pub fn int16(name: &str) -> Self {
        Self::integer(name, IntegerKind::I16)
    }

    #[must_use]
    pub fn int32(name: &str) -> Self {
        Self::integer(name, IntegerKind::I32)
    }

    #[must_use]
    pub fn int64(name: &str) -> Self {
        Self::integer(name, IntegerKind::I64)
    }

    #[must_use]
    pub fn float32(name: &str) -> Self {
        Self::new(
            name,
            ColumnType::Float {
                kind: FloatKind::F32,
                precision: None,
            },
        )
    }

    #[must_use]
    pub fn float64(name: &str) -> Self {
        Self::new(
            name,
            ColumnType::Float {
                kind: FloatKind::F64,
                precision: None,
            },
        )
    }

    #[must_use]
    pub fn decimal(name: &str) -> Self {
        Self::new(name, ColumnType::Decimal { scale: None })
    }

    /// A boolean column reading and writing `true`/`false`.
    #[must_use]
    pub fn boolean(name: &str) -> Self {
        Self::new(
            name,
            ColumnType::Boolean {
                true_text: "true".to_string(),
                false_text: "false".to_string(),
            },
        )
    }

    /// A date column using ISO `YYYY-MM-DD` unless a format is set.
    #[must_use]
    pub fn date(name: &str) -> Self {
        Self::new(name, ColumnType::Date { format: None })
    }

    #[must_use]
    pub fn datetime(name: &str) -> Self {
        Self::new(name, ColumnType::DateTime { format: None })
    }

    #[must_use]
    pub fn guid(name: &str) -> Self {
        Self::new(name, ColumnType::Guid(GuidFormat::default()))
    }

    /// An enumeration column over `(name, discriminant)` members.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatfile::{ColumnCodec, Value};
    ///
    /// let color = ColumnCodec::enumeration("Color", &[("Red", 1), ("Green", 2)]);
    /// assert_eq!(color.parse("2").unwrap(), Value::Enum("Green".into()));
    /// assert_eq!(color.parse("red").unwrap(), Value::Enum("Red".into()));
    /// assert!(color.parse("Blue").is_err());
    /// ```
    #[must_use]
    pub fn enumeration(name: &str, members: &[(&str, i64)]) -> Self {
        Self::new(
            name,
            ColumnType::Enum {
                members: members
                    .iter()
                    .map(|(member, number)| (member.to_string(), *number))
                    .collect(),
                format: EnumFormat::default(),
            },
        )
    }

    #[must_use]
    pub fn bytes(name: &str, encoding: ByteEncoding) -> Self {
        Self::new(name, ColumnType::Bytes(encoding))
    }

    /// A placeholder column for filler fields or windows.
    #[must_use]
    pub fn ignored(name: &str) -> Self {
        Self::new(name, ColumnType::Ignored)
    }

    #[must_use]
    pub fn custom(name: &str, converter: Arc<dyn CustomConverter>) -> Self {
        Self::new(name, ColumnType::Custom(converter))
    }

    /// Sets an exact format: a chrono format string for date columns, a
    /// digit count for float columns, a scale for decimal columns. Other
    /// column types ignore it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a date format with an unknown
    /// specifier, or a precision or scale that is not a whole number.
    pub fn with_format(mut self, format: &str) -> Result<Self> {
        match &mut self.column_type {
            ColumnType::Date { format: f } | ColumnType::DateTime { format: f } => {
                if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                    return Err(Error::configuration(&format!(
                        "invalid date format '{}'",
                        format
                    )));
                }
                *f = Some(format.to_string());
            }
            ColumnType::Float { precision, .. } => {
                *precision = Some(parse_count(format, "float precision")?);
            }
            ColumnType::Decimal { scale } => *scale = Some(parse_count(format, "decimal scale")?),
            _ => {}
        }
        Ok(self)
    }

    /// Turns trimming of string columns on or off.
    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        if let ColumnType::String { trim: t } = &mut self.column_type {
            *t = trim;
        }
        self
    }

    #[must_use]
    pub fn with_guid_format(mut self, format: GuidFormat) -> Self {
        if let ColumnType::Guid(f) = &mut self.column_type {
            *f = format;
        }
        self
    }

    #[must_use]
    pub fn with_enum_format(mut self, format: EnumFormat) -> Self {
        if let ColumnType::Enum { format: f, .. } = &mut self.column_type {
            *f = format;
        }
        self
    }

    /// Sets the words a boolean column reads and writes.
    #[must_use]
    pub fn with_bool_text(mut self, true_text: &str, false_text: &str) -> Self {
        if let ColumnType::Boolean {
            true_text: t,
            false_text: f,
        } = &mut self.column_type
        {
            *t = true_text.to_string();
            *f = false_text.to_string();
        }
        self
    }

    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Value used in place of null when the column is not nullable.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_null_formatter(mut self, formatter: NullFormatter) -> Self {
        self.null_formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    #[must_use]
    pub fn with_preprocessor<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.preprocessor = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_parsed<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.on_parsed = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_formatting<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.on_formatting = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_formatted<F>(mut self, hook: F) -> Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.on_formatted = Some(Arc::new(hook));
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    #[inline]
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[inline]
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self.column_type, ColumnType::Ignored)
    }

    /// Converts raw field text to a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] when the text does not fit the column
    /// type, or when it is null and the column is neither nullable nor has a
    /// default.
    pub fn parse(&self, raw: &str) -> Result<Value> {
        let text = match &self.preprocessor {
            Some(preprocess) => Cow::Owned(preprocess(raw)),
            None => Cow::Borrowed(raw),
        };
        let value = if self.null_formatter.is_null(&text) {
            self.null_substitute()
                .ok_or_else(|| Error::conversion(&text, self.column_type.type_name(), "null is not allowed"))?
        } else {
            self.column_type.parse(&text, &self.number_format)?
        };
        Ok(match &self.on_parsed {
            Some(hook) => hook(value),
            None => value,
        })
    }

    /// Converts a value to raw field text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] when the value's type does not fit the column,
    /// or when it is null and the column is neither nullable nor has a default.
    pub fn format(&self, value: &Value) -> Result<String> {
        let value = match &self.on_formatting {
            Some(hook) => Cow::Owned(hook(value.clone())),
            None => Cow::Borrowed(value),
        };
        let text = if value.is_null() {
            match self.null_substitute() {
                Some(Value::Null) => self.null_formatter.format_null(),
                Some(default) => self.column_type.format(&default, &self.number_format)?,
                None => {
                    return Err(Error::format(format!(
                        "column '{}' does not allow null",
                        self.name
                    )))
                }
            }
        } else {
            self.column_type.format(&value, &self.number_format)?
        };
        Ok(match &self.on_formatted {
            Some(hook) => hook(text),
            None => text,
        })
    }

    fn null_substitute(&self) -> Option<Value> {
        if self.nullable {
            Some(Value::Null)
        } else {
            self.default_value.clone()
        }
    }
}

impl fmt::Debug for ColumnCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnCodec")
            .field("name", &self.name)
            .field("column_type", &self.column_type)
            .field("nullable", &self.nullable)
            .field("null_formatter", &self.null_formatter)
            .finish_non_exhaustive()
    }
}
