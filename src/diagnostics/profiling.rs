//! Per-type column profiles: numeric summaries and value frequencies.

use super::types::{
    CategoricalProfile, HISTOGRAM_BINS, Histogram, NumericProfile, TOP_VALUES, ValueCount,
};
use crate::frame::sorted_mode;
use crate::ops::stats;
use std::collections::HashMap;

/// Label used for missing cells in value counts.
pub const MISSING_LABEL: &str = "nan";

/// Summary of a numeric column from its present values.
pub fn numeric_profile(values: &[f64]) -> NumericProfile {
    let (min, max) = stats::min_max(values).unzip();
    NumericProfile {
        mean: stats::mean(values),
        median: stats::median(values),
        std: stats::std_dev(values, 1),
        min,
        max,
        histogram: histogram(values, HISTOGRAM_BINS),
    }
}

/// Equal-width histogram over `[min, max]`.
///
/// The last bin includes its right edge. When every value is equal the
/// range widens to `value ± 0.5`. No values gives an empty histogram.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let Some((mut lo, mut hi)) = stats::min_max(values) else {
        return Histogram::default();
    };
    if bins == 0 {
        return Histogram::default();
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let bin_edges = (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect();

    let mut counts = vec![0; bins];
    for &value in values {
        let index = if value >= hi {
            bins - 1
        } else {
            (((value - lo) / width) as usize).min(bins - 1)
        };
        if let Some(count) = counts.get_mut(index) {
            *count += 1;
        }
    }

    Histogram { bin_edges, counts }
}

/// Fraction of values more than 3 sample standard deviations from the mean.
///
/// 0 when the deviation is zero or undefined.
pub fn outlier_fraction(values: &[f64]) -> f64 {
    let (Some(mean), Some(std)) = (stats::mean(values), stats::std_dev(values, 1)) else {
        return 0.0;
    };
    if std <= 0.0 {
        return 0.0;
    }
    let outliers = values
        .iter()
        .filter(|x| (*x - mean).abs() > 3.0 * std)
        .count();
    outliers as f64 / values.len() as f64
}

/// Most frequent value and the leading value counts of a text-like column.
pub fn categorical_profile(labels: &[Option<String>]) -> CategoricalProfile {
    let present: Vec<&str> = labels.iter().flatten().map(String::as_str).collect();
    let (top, freq) = match sorted_mode(present, Ord::cmp) {
        Some((top, freq)) => (Some(top.to_owned()), freq),
        None => (None, 0),
    };
    CategoricalProfile {
        top,
        freq,
        value_counts: value_counts(labels, TOP_VALUES),
    }
}

/// Counts per distinct value, missing cells included, most frequent first.
///
/// Equal counts keep first-appearance order.
pub fn value_counts(labels: &[Option<String>], limit: usize) -> Vec<ValueCount> {
    let mut order: Vec<(Option<&str>, usize)> = Vec::new();
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();
    for label in labels {
        let key = label.as_deref();
        match index.get(&key) {
            Some(&i) => {
                if let Some(entry) = order.get_mut(i) {
                    entry.1 += 1;
                }
            }
            None => {
                index.insert(key, order.len());
                order.push((key, 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(limit)
        .map(|(value, count)| ValueCount {
            value: value.unwrap_or(MISSING_LABEL).to_owned(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_every_value() {
        let h = histogram(&[1.0, 1.0, 2.0, 3.0, 10.0], HISTOGRAM_BINS);
        assert_eq!(h.bin_edges.len(), HISTOGRAM_BINS + 1);
        assert_eq!(h.counts.iter().sum::<usize>(), 5);
        assert_eq!(h.bin_edges.first(), Some(&1.0));
        assert_eq!(h.bin_edges.last(), Some(&10.0));
        // The maximum lands in the closed last bin.
        assert_eq!(h.counts.last(), Some(&1));
    }

    #[test]
    fn test_histogram_single_value() {
        let h = histogram(&[2.0, 2.0, 2.0], HISTOGRAM_BINS);
        assert_eq!(h.counts.len(), 20);
        assert_eq!(h.counts.get(10), Some(&3));
        assert_eq!(h.bin_edges.first(), Some(&1.5));
        assert_eq!(h.bin_edges.last(), Some(&2.5));
    }

    #[test]
    fn test_histogram_empty() {
        assert_eq!(histogram(&[], HISTOGRAM_BINS), Histogram::default());
    }

    #[test]
    fn test_outlier_fraction() {
        let mut values = vec![10.0; 20];
        values.push(1000.0);
        let fraction = outlier_fraction(&values);
        assert!((fraction - 1.0 / 21.0).abs() < 1e-12);
        assert_eq!(outlier_fraction(&[5.0, 5.0, 5.0]), 0.0);
        assert_eq!(outlier_fraction(&[5.0]), 0.0);
    }

    #[test]
    fn test_value_counts_order_and_missing() {
        let labels: Vec<Option<String>> = ["b", "a", "", "a", "b", "c"]
            .iter()
            .map(|s| (!s.is_empty()).then(|| (*s).to_owned()))
            .collect();
        let counts = value_counts(&labels, 3);
        let pairs: Vec<(&str, usize)> = counts.iter().map(|v| (v.value.as_str(), v.count)).collect();
        assert_eq!(pairs, vec![("b", 2), ("a", 2), (MISSING_LABEL, 1)]);
    }

    #[test]
    fn test_categorical_top_prefers_smallest_on_tie() {
        let labels = vec![Some("b".to_owned()), Some("a".to_owned()), None];
        let profile = categorical_profile(&labels);
        assert_eq!(profile.top.as_deref(), Some("a"));
        assert_eq!(profile.freq, 1);
    }
}
