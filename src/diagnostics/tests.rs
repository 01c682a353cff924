#![expect(clippy::unwrap_used)]

use super::health::{
    DROP_CONSTANT, DROP_MISSING, HIGH_CARDINALITY, HIGH_OUTLIERS, IMPUTE_MISSING,
};
use super::*;
use crate::frame::decode;
use polars::prelude::df;
use serde_json::json;

fn report(csv: &str) -> DiagnosticsReport {
    analyze(&decode(csv.as_bytes()).unwrap()).unwrap()
}

#[test]
fn test_numeric_column_summary() {
    let report = report("x\n1\n2\n3\n4\n");
    let x = report.get("x").unwrap();
    assert_eq!(x.count, 4);
    assert_eq!(x.missing_pct, 0.0);
    assert_eq!(x.unique, 4);

    let numeric = x.numeric().unwrap();
    assert_eq!(numeric.mean, Some(2.5));
    assert_eq!(numeric.median, Some(2.5));
    assert_eq!(numeric.min, Some(1.0));
    assert_eq!(numeric.max, Some(4.0));
    assert!((numeric.std.unwrap() - 1.290_994_448_735_805_6).abs() < 1e-12);
    assert_eq!(numeric.histogram.counts.iter().sum::<usize>(), 4);
    assert_eq!(x.data_issues.outlier, Some(0.0));
}

#[test]
fn test_all_missing_column() {
    let report = report("a,b\n1,\n2,\n3,\n");
    let b = report.get("b").unwrap();
    assert_eq!(b.count, 0);
    assert_eq!(b.missing_pct, 100.0);
    assert_eq!(b.unique, 0);
    assert_eq!(b.recommendations.first().map(String::as_str), Some(DROP_MISSING));
}

#[test]
fn test_moderate_missing_suggests_imputing() {
    let report = report("v,w\n1,a\n,b\n3,c\n4,d\n5,e\n");
    let v = report.get("v").unwrap();
    assert_eq!(v.missing_pct, 20.0);
    assert!(v.recommendations.contains(&IMPUTE_MISSING.to_owned()));
    assert!(!v.recommendations.contains(&DROP_MISSING.to_owned()));
}

#[test]
fn test_zero_variance_has_no_outliers() {
    let report = report("k\n7\n7\n7\n7\n");
    let k = report.get("k").unwrap();
    assert_eq!(k.data_issues.outlier, Some(0.0));
    assert_eq!(k.data_issues.constant, 1.0);
    assert!(k.recommendations.contains(&DROP_CONSTANT.to_owned()));
    assert!(!k.recommendations.contains(&HIGH_OUTLIERS.to_owned()));
}

#[test]
fn test_outlier_risk() {
    let mut csv = "v\n".to_owned();
    for _ in 0..8 {
        csv.push_str("1\n");
    }
    csv.push_str("2\n1000\n");
    let report = report(&csv);
    let v = report.get("v").unwrap();
    // A single extreme value among ten is under 3 sample deviations away.
    assert_eq!(v.data_issues.outlier, Some(0.0));

    let mut values = vec![0.0; 60];
    values.extend([100.0, -100.0]);
    let fraction = profiling::outlier_fraction(&values);
    assert!((fraction - 2.0 / 62.0).abs() < 1e-12);
}

#[test]
fn test_text_column_profile() {
    let report = report("city,id\nOslo,1\nLima,2\nOslo,3\n,4\n");
    let city = report.get("city").unwrap();
    assert_eq!(city.data_issues.outlier, None);

    let text = city.categorical().unwrap();
    assert_eq!(text.top.as_deref(), Some("Oslo"));
    assert_eq!(text.freq, 2);
    let counts: Vec<(&str, usize)> = text
        .value_counts
        .iter()
        .map(|v| (v.value.as_str(), v.count))
        .collect();
    assert_eq!(counts, vec![("Oslo", 2), ("Lima", 1), (profiling::MISSING_LABEL, 1)]);

    let id = report.get("id").unwrap();
    assert_eq!(id.data_issues.high_cardinality, 1.0);
    assert!(id.recommendations.contains(&HIGH_CARDINALITY.to_owned()));
}

#[test]
fn test_boolean_column_is_profiled_as_categorical() {
    let df = df!("flag" => [Some(true), Some(false), Some(true), None]).unwrap();
    let report = analyze(&df).unwrap();
    let flag = report.get("flag").unwrap();

    assert_eq!(flag.data_issues.outlier, None);
    assert_eq!(flag.count, 3);
    let profile = flag.categorical().unwrap();
    assert_eq!(profile.top.as_deref(), Some("true"));
    assert_eq!(profile.freq, 2);
}

#[test]
fn test_report_serializes_in_column_order() {
    let report = report("b,a\nx,1\ny,2\n");
    let value = serde_json::to_value(&report).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 2);

    let text = serde_json::to_string(&report).unwrap();
    assert!(text.find("\"b\"").unwrap() < text.find("\"a\"").unwrap());

    let a = &value["a"];
    assert_eq!(a["count"], json!(2));
    assert!(a["histogram"]["bin_edges"].is_array());
    assert_eq!(a["data_issues"]["outlier"], json!(0.0));
    assert!(value["b"]["data_issues"]["outlier"].is_null());
    assert_eq!(value["b"]["top"], json!("x"));
}

#[test]
fn test_empty_table() {
    let report = report("a,b\n");
    assert_eq!(report.len(), 2);
    let a = report.get("a").unwrap();
    assert_eq!(a.count, 0);
    assert_eq!(a.missing_pct, 0.0);
    assert!(a.recommendations.is_empty());
}
