//! Per-record schema selection for files that mix record layouts.
//!
//! A [`SchemaSelector`] holds `(predicate, schema)` pairs tested in the order
//! they were added, plus an optional fallback. The first predicate that
//! accepts a record decides its schema. What a predicate sees depends on
//! where the selector is used:
//!
//! - delimited readers pass the raw fields (`[String]`)
//! - fixed-width readers pass the raw line (`str`)
//! - writers pass the values about to be written (`[Value]`)
//!
//! A record no predicate accepts, with no fallback configured, fails with
//! [`Error::NoMatchingSchema`](crate::Error::NoMatchingSchema).
//!
//! ## Examples
//!
//! ```rust
//! use flatfile::{ColumnCodec, DelimitedOptions, DelimitedReader, RecordReader, Schema, SchemaSelector, Value};
//!
//! let header = Schema::new()
//!     .with_column(ColumnCodec::string("Kind")).unwrap()
//!     .with_column(ColumnCodec::date("Created").with_format("%Y-%m-%d").unwrap()).unwrap();
//! let detail = Schema::new()
//!     .with_column(ColumnCodec::string("Kind")).unwrap()
//!     .with_column(ColumnCodec::int32("Amount")).unwrap();
//!
//! let selector = SchemaSelector::new()
//!     .when(|fields: &[String]| fields[0] == "H", header)
//!     .otherwise(detail);
//!
//! let text = "H,2024-01-31\nD,12\nD,30\n";
//! let mut reader = DelimitedReader::with_selector(text.as_bytes(), selector, DelimitedOptions::new()).unwrap();
//! let mut total = 0;
//! while reader.read().unwrap() {
//!     if let Value::Int(amount) = reader.get_values().unwrap()[1] {
//!         total += amount;
//!     }
//! }
//! assert_eq!(total, 42);
//! ```

use std::fmt;

type Predicate<I> = Box<dyn Fn(&I) -> bool>;

/// Ordered predicates mapping records to schemas.
pub struct SchemaSelector<I: ?Sized, S> {
    cases: Vec<(Predicate<I>, S)>,
    fallback: Option<S>,
}

impl<I: ?Sized, S> SchemaSelector<I, S> {
    #[must_use]
    pub fn new() -> Self {
        SchemaSelector {
            cases: Vec::new(),
            fallback: None,
        }
    }

    /// Uses `schema` for records `predicate` accepts.
    #[must_use]
    pub fn when<F>(mut self, predicate: F, schema: S) -> Self
    where
        F: Fn(&I) -> bool + 'static,
    {
        self.cases.push((Box::new(predicate), schema));
        self
    }

    /// Uses `schema` for records no predicate accepts.
    #[must_use]
    pub fn otherwise(mut self, schema: S) -> Self {
        self.fallback = Some(schema);
        self
    }

    /// Returns the schema for `input`, if any.
    pub fn select(&self, input: &I) -> Option<&S> {
        self.position(input).and_then(|position| self.get(position))
    }

    /// Number of predicate cases (the fallback is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty() && self.fallback.is_none()
    }

    // The fallback sits one past the last case.
    pub(crate) fn position(&self, input: &I) -> Option<usize> {
        self.cases
            .iter()
            .position(|(predicate, _)| predicate(input))
            .or_else(|| self.fallback.as_ref().map(|_| self.cases.len()))
    }

    pub(crate) fn get(&self, position: usize) -> Option<&S> {
        match self.cases.get(position) {
            Some((_, schema)) => Some(schema),
            None if position == self.cases.len() => self.fallback.as_ref(),
            None => None,
        }
    }
}

impl<I: ?Sized, S> Default for SchemaSelector<I, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ?Sized, S: fmt::Debug> fmt::Debug for SchemaSelector<I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaSelector")
            .field("cases", &self.cases.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_case_wins() {
        let selector: SchemaSelector<str, &str> = SchemaSelector::new()
            .when(|line: &str| line.starts_with('A'), "first")
            .when(|line: &str| line.len() > 2, "second");

        assert_eq!(selector.select("Abcd"), Some(&"first"));
        assert_eq!(selector.select("bcd"), Some(&"second"));
        assert_eq!(selector.select("b"), None);
    }

    #[test]
    fn test_fallback_position() {
        let selector: SchemaSelector<str, u8> = SchemaSelector::new()
            .when(|line: &str| line == "x", 1)
            .otherwise(2);

        assert_eq!(selector.position("y"), Some(1));
        assert_eq!(selector.get(1), Some(&2));
        assert_eq!(selector.get(2), None);
    }
}
