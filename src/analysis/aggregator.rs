//! Record aggregation.
//!
//! This module buckets records by the key their definition extracts and
//! turns the bucket counts into an ordered series of data points.

use super::definition::{AggregateDefinition, Mode};
use crate::models::{DataPoint, Series};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Result of an aggregation together with how many records contributed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregation {
    pub points: Vec<DataPoint>,
    /// Records that produced a key.
    pub included: usize,
    /// Records whose key could not be extracted.
    pub dropped: usize,
}

/// Aggregate records into data points.
pub fn aggregate<T>(definition: &AggregateDefinition<T>, records: &[T]) -> Vec<DataPoint> {
    aggregate_with_stats(definition, records).points
}

/// Aggregate records, also reporting included and dropped record counts.
pub fn aggregate_with_stats<T>(definition: &AggregateDefinition<T>, records: &[T]) -> Aggregation {
    let keys = records
        .iter()
        .filter_map(|record| definition.key_of(record))
        .filter(|key| !key.is_empty());

    let buckets = count_by_first_occurrence(keys);
    let included: usize = buckets.iter().map(|(_, count)| *count as usize).sum();
    let dropped = records.len() - included;

    if dropped > 0 {
        debug!(
            "{}: dropped {} of {} records without a key",
            definition.label,
            dropped,
            records.len()
        );
    }

    let points = match definition.mode {
        Mode::Count => buckets
            .into_iter()
            .map(|(key, count)| DataPoint::new(key, count))
            .collect(),
        Mode::Cumulative => accumulate(buckets),
    };

    Aggregation {
        points,
        included,
        dropped,
    }
}

impl Aggregation {
    /// Wrap the points with the definition's label and field names.
    pub fn into_series<T>(self, definition: &AggregateDefinition<T>) -> Series {
        Series {
            label: definition.label,
            key_field: definition.key_field,
            value_field: definition.value_field,
            points: self.points,
        }
    }
}

/// Count keys, preserving the order in which each key first appears.
fn count_by_first_occurrence(keys: impl Iterator<Item = String>) -> Vec<(String, u64)> {
    let mut buckets: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for key in keys {
        match index.get(&key) {
            Some(&i) => buckets[i].1 += 1,
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, 1));
            }
        }
    }

    buckets
}

/// Sort buckets by key and replace each count with the running total.
fn accumulate(buckets: Vec<(String, u64)>) -> Vec<DataPoint> {
    let sorted: BTreeMap<String, u64> = buckets.into_iter().collect();

    let mut total = 0;
    sorted
        .into_iter()
        .map(|(key, count)| {
            total += count;
            DataPoint::new(key, total)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::definition::define_aggregate;

    fn word(s: &&str) -> Option<String> {
        match *s {
            "" => None,
            "bad" => Some(String::new()),
            other => Some(other.to_string()),
        }
    }

    fn counts() -> AggregateDefinition<&'static str> {
        define_aggregate("Words", word, "word", "count")
    }

    fn totals() -> AggregateDefinition<&'static str> {
        define_aggregate("Words", word, "word", "total").cumulative()
    }

    #[test]
    fn test_count_preserves_first_occurrence() {
        let points = aggregate(&counts(), &["b", "a", "b", "c", "a", "b"]);

        assert_eq!(
            points,
            vec![
                DataPoint::new("b", 3),
                DataPoint::new("a", 2),
                DataPoint::new("c", 1),
            ]
        );
    }

    #[test]
    fn test_count_sum_matches_included_records() {
        let records = ["x", "", "y", "bad", "x", "z", ""];
        let result = aggregate_with_stats(&counts(), &records);

        let sum: u64 = result.points.iter().map(|p| p.value).sum();
        assert_eq!(sum, 4);
        assert_eq!(result.included, 4);
        assert_eq!(result.dropped, 3);
    }

    #[test]
    fn test_cumulative_sorts_and_accumulates() {
        let points = aggregate(
            &totals(),
            &["2024-01-02", "2024-01-01", "2024-01-01"],
        );

        assert_eq!(
            points,
            vec![
                DataPoint::new("2024-01-01", 2),
                DataPoint::new("2024-01-02", 3),
            ]
        );
    }

    #[test]
    fn test_cumulative_is_non_decreasing_and_ends_at_total() {
        let records = [
            "2024-03-01", "2023-12-31", "", "2024-01-15", "2024-03-01", "bad", "2023-12-31",
            "2024-02-29",
        ];
        let result = aggregate_with_stats(&totals(), &records);

        assert!(result.points.windows(2).all(|w| w[0].value <= w[1].value));
        assert!(result.points.windows(2).all(|w| w[0].key < w[1].key));
        assert_eq!(
            result.points.last().map(|p| p.value),
            Some(result.included as u64)
        );
        assert_eq!(result.included, 6);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(aggregate(&counts(), &[]).is_empty());
        assert!(aggregate(&totals(), &[]).is_empty());
    }

    #[test]
    fn test_all_records_dropped() {
        let result = aggregate_with_stats(&totals(), &["", "bad"]);
        assert!(result.points.is_empty());
        assert_eq!(result.dropped, 2);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let records = ["b", "a", "", "b"];
        let def = counts();
        assert_eq!(aggregate(&def, &records), aggregate(&def, &records));

        let def = totals();
        assert_eq!(aggregate(&def, &records), aggregate(&def, &records));
    }

    #[test]
    fn test_cumulative_non_date_keys_sort_lexicographically() {
        let points = aggregate(&totals(), &["10", "9", "10"]);
        assert_eq!(points, vec![DataPoint::new("10", 2), DataPoint::new("9", 3)]);
    }

    #[test]
    fn test_into_series_carries_field_names() {
        let def = totals();
        let result = aggregate_with_stats(&def, &["a", "b"]).into_series(&def);
        assert_eq!(result.label, "Words");
        assert_eq!(result.key_field, "word");
        assert_eq!(result.value_field, "total");
        assert_eq!(result.points.len(), 2);
    }
}
