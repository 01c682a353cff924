//! Data-quality scoring and the advice derived from it.

use super::types::DataIssues;
use std::collections::HashMap;

pub const DROP_MISSING: &str = "Consider dropping this column due to excessive missing data.";
pub const IMPUTE_MISSING: &str = "Consider imputing missing values.";
pub const DROP_CONSTANT: &str = "Consider dropping this column as it is nearly constant.";
pub const HIGH_CARDINALITY: &str =
    "Consider dropping or encoding this column due to high cardinality.";
pub const HIGH_OUTLIERS: &str =
    "Consider scaling or transforming this column due to high outlier risk.";

const DROP_MISSING_ABOVE: f64 = 0.5;
const IMPUTE_MISSING_ABOVE: f64 = 0.1;
const CONSTANT_ABOVE: f64 = 0.95;
const CARDINALITY_ABOVE: f64 = 0.8;
const OUTLIER_ABOVE: f64 = 0.1;

/// `part / whole`, 0 for an empty table.
pub fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Share of rows taken by the most frequent value, missing counted as a value.
pub fn constant_fraction(labels: &[Option<String>]) -> f64 {
    let mut counts: HashMap<Option<&str>, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.as_deref()).or_default() += 1;
    }
    let top = counts.values().copied().max().unwrap_or(0);
    fraction(top, labels.len())
}

/// Advice for each score over its threshold, in a fixed order.
///
/// Heavy missingness suggests dropping; moderate missingness suggests
/// imputing. Never both.
pub fn recommendations(issues: &DataIssues) -> Vec<String> {
    let mut advice = Vec::new();
    if issues.missing > DROP_MISSING_ABOVE {
        advice.push(DROP_MISSING);
    } else if issues.missing > IMPUTE_MISSING_ABOVE {
        advice.push(IMPUTE_MISSING);
    }
    if issues.constant > CONSTANT_ABOVE {
        advice.push(DROP_CONSTANT);
    }
    if issues.high_cardinality > CARDINALITY_ABOVE {
        advice.push(HIGH_CARDINALITY);
    }
    if issues.outlier.is_some_and(|o| o > OUTLIER_ABOVE) {
        advice.push(HIGH_OUTLIERS);
    }
    advice.into_iter().map(str::to_owned).collect()
}
