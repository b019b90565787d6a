//! Fallback Report Integration Tests
//!
//! Exercises the in-process report through the same records parsing the CLI
//! uses.

use pothole_analysis_core::parse_records;
use pothole_analysis_engine::fallback::{analyze, analyze_value};
use serde_json::json;

#[test]
fn test_report_from_realistic_payload() {
    let payload = r#"{
        "potholes": [
            {"id": "a1", "severity": "high", "resolved_count": "3", "latitude": "40.71", "longitude": -74.0, "image_url": null},
            {"id": 2, "severity": "low", "resolved_count": 1, "latitude": 40.75, "longitude": "-73.98"},
            {"id": "c3", "severity": "high", "resolved_count": null, "latitude": "bad", "longitude": null, "date": "2024-01-02"},
            {"id": 4, "resolved_count": "7"}
        ]
    }"#;

    let records = parse_records(payload).unwrap();
    let report = analyze(&records);

    assert_eq!(report.count, 4);
    assert_eq!(report.severity_counts.get("high"), Some(&2));
    assert_eq!(report.severity_counts.get("low"), Some(&1));
    assert_eq!(report.severity_counts.get("unknown"), Some(&1));
    assert_eq!(report.most_common_severity.as_deref(), Some("high"));
    assert_eq!(report.average_resolved_reports, 2.75);
    assert_eq!(report.max_resolved_reports, 7.0);
    assert_eq!(report.bounding_box.min_lat, Some(40.71));
    assert_eq!(report.bounding_box.max_lat, Some(40.75));
    assert_eq!(report.bounding_box.min_lon, Some(-74.0));
    assert_eq!(report.bounding_box.max_lon, Some(-73.98));

    let top: Vec<f64> = report
        .top5_by_resolved_reports
        .iter()
        .map(|e| e.resolved_reports)
        .collect();
    assert_eq!(top, vec![7.0, 3.0, 1.0, 0.0]);
}

#[test]
fn test_report_json_shape() {
    let report = analyze_value(&json!([
        {"id": 1, "severity": "low", "latitude": 10},
        {"id": 2, "severity": "high", "latitude": 20},
        {"id": 3, "severity": "low", "latitude": "bad"},
        {"id": 4, "severity": "high", "latitude": null}
    ]));
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["count"], json!(4));
    assert_eq!(value["severityCounts"], json!({"low": 2, "high": 2}));
    assert_eq!(value["mostCommonSeverity"], json!("low"));
    assert_eq!(value["boundingBox"]["minLat"], json!(10.0));
    assert_eq!(value["boundingBox"]["maxLat"], json!(20.0));
    assert!(value["boundingBox"]["minLon"].is_null());
    assert!(value["boundingBox"]["maxLon"].is_null());
    assert_eq!(value["top5ByResolvedReports"][0]["id"], json!(1));
    assert_eq!(value["top5ByResolvedReports"][0]["resolvedReports"], json!(0.0));
}
