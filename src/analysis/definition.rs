//! Aggregate definitions.
//!
//! An aggregate definition is static configuration: a label, a key
//! extractor, the field names the chart expects, and an accumulation mode.

use std::fmt;

/// Derives a bucketing key from a record. `None` drops the record.
pub type KeyFn<T> = fn(&T) -> Option<String>;

/// How bucket counts turn into point values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Each point holds the number of records in its bucket.
    #[default]
    Count,
    /// Keys are sorted ascending and each point holds the running total.
    Cumulative,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Count => "count",
            Mode::Cumulative => "cumulative",
        };
        f.pad(name)
    }
}

/// A named rule turning a list of `T` records into a chart series.
pub struct AggregateDefinition<T> {
    pub label: &'static str,
    pub key_fn: KeyFn<T>,
    pub key_field: &'static str,
    pub value_field: &'static str,
    pub mode: Mode,
}

impl<T> AggregateDefinition<T> {
    /// Switch to cumulative accumulation.
    pub fn cumulative(mut self) -> Self {
        self.mode = Mode::Cumulative;
        self
    }

    /// Extract the bucketing key for a single record.
    pub fn key_of(&self, record: &T) -> Option<String> {
        (self.key_fn)(record)
    }
}

// Manual impls: `T` itself need not be Clone or Debug.
impl<T> Clone for AggregateDefinition<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AggregateDefinition<T> {}

impl<T> fmt::Debug for AggregateDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateDefinition")
            .field("label", &self.label)
            .field("key_field", &self.key_field)
            .field("value_field", &self.value_field)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Build a count-mode aggregate definition.
pub fn define_aggregate<T>(
    label: &'static str,
    key_fn: KeyFn<T>,
    key_field: &'static str,
    value_field: &'static str,
) -> AggregateDefinition<T> {
    AggregateDefinition {
        label,
        key_fn,
        key_field,
        value_field,
        mode: Mode::Count,
    }
}
